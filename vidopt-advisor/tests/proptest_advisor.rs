//! Property-based tests for feature extraction, prediction and optimization.

use proptest::prelude::*;
use vidopt_advisor::{
    FeatureExtractor, FeatureVector, LinearQualityModel, ModelWeights, ParameterOptimizer,
    QualityPredictor, VideoProcessor, FEATURE_LEN, RESERVED_START,
};
use vidopt_core::RasterFrame;

fn arb_frame(max_side: usize) -> impl Strategy<Value = RasterFrame> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(any::<u8>(), rows * cols * 3)
            .prop_map(move |data| RasterFrame::from_array(&[rows, cols, 3], &data).unwrap())
    })
}

fn arb_features() -> impl Strategy<Value = FeatureVector> {
    prop::collection::vec(-10.0f64..10.0, FEATURE_LEN)
        .prop_map(|v| FeatureVector::from_array(v.try_into().unwrap()))
}

fn arb_weights() -> impl Strategy<Value = ModelWeights> {
    prop::collection::vec(-10.0f64..10.0, FEATURE_LEN)
        .prop_map(|v| ModelWeights::from_slice(&v).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Extraction always yields 128 slots with the reserved tail zeroed.
    #[test]
    fn features_have_fixed_layout(frame in arb_frame(24)) {
        let features = FeatureExtractor::new().extract(&frame);
        prop_assert_eq!(features.as_slice().len(), FEATURE_LEN);
        prop_assert!(features.as_slice()[RESERVED_START..].iter().all(|&v| v == 0.0));
    }

    /// Statistics and edge density are normalized.
    #[test]
    fn features_are_normalized(frame in arb_frame(24)) {
        let features = FeatureExtractor::new().extract(&frame);
        for (i, &v) in features.as_slice()[..RESERVED_START].iter().enumerate() {
            prop_assert!((0.0..=1.0).contains(&v), "slot {} = {}", i, v);
        }
    }

    /// Predictions are clamped to the unit interval.
    #[test]
    fn prediction_is_clamped(features in arb_features(), weights in arb_weights()) {
        let prediction = LinearQualityModel::new(weights).predict(&features);
        prop_assert!((0.0..=1.0).contains(&prediction));
    }

    /// The optimizer picks the first grid point whatever the target.
    #[test]
    fn optimize_ignores_target(frame in arb_frame(40), target in -5.0f64..5.0) {
        let params = ParameterOptimizer::default().optimize(&frame, target).unwrap();
        prop_assert_eq!(params.bitrate, 1_000_000);
        prop_assert_eq!(params.width as usize, frame.cols() / 2);
        prop_assert_eq!(params.height as usize, frame.rows() / 2);
        prop_assert_eq!(params.preset.as_str(), "medium");
    }

    /// Wrong-rank arrays never reach the processor.
    #[test]
    fn two_dimensional_arrays_rejected(rows in 1usize..16, cols in 1usize..16) {
        let data = vec![0u8; rows * cols];
        let err = RasterFrame::from_array(&[rows, cols], &data).unwrap_err();
        prop_assert!(err.is_invalid_input());
    }
}

#[test]
fn mid_gray_end_to_end() {
    let mut processor = VideoProcessor::new();
    let frame = RasterFrame::filled(100, 100, [128, 128, 128]);

    assert_eq!(processor.calculate_psnr(&frame, &frame).unwrap(), 100.0);
    assert!((processor.calculate_ssim(&frame, &frame).unwrap() - 1.0).abs() < 1e-9);

    let params = processor.optimize_parameters(&frame, 0.9).unwrap();
    assert_eq!(params.width, 50);
    assert_eq!(params.height, 50);
    assert_eq!(params.bitrate, 1_000_000);
    assert_eq!(params.preset, "medium");

    let features = processor.analyze_frame(&frame);
    assert!(features.as_slice()[RESERVED_START..].iter().all(|&v| v == 0.0));
}
