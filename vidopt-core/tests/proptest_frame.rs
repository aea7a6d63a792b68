//! Property-based tests for frame marshaling.
//!
//! Uses proptest to check that the array boundary accepts exactly the
//! `[rows, cols, 3]` arrays whose buffer matches the shape.

use proptest::prelude::*;
use vidopt_core::{Error, RasterFrame};

proptest! {
    /// Any well-formed 3-D array becomes a frame with the same samples.
    #[test]
    fn accepts_matching_arrays(rows in 1usize..32, cols in 1usize..32, seed in any::<u8>()) {
        let data: Vec<u8> = (0..rows * cols * 3)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect();

        let frame = RasterFrame::from_array(&[rows, cols, 3], &data).unwrap();

        prop_assert_eq!(frame.rows(), rows);
        prop_assert_eq!(frame.cols(), cols);
        prop_assert_eq!(frame.data(), data.as_slice());
    }

    /// Arrays that are not 3-dimensional are rejected with InvalidInput.
    #[test]
    fn rejects_wrong_rank(shape in prop::collection::vec(1usize..8, 0..6)) {
        prop_assume!(shape.len() != 3);
        let len: usize = shape.iter().product();
        let data = vec![0u8; len];

        let result = RasterFrame::from_array(&shape, &data);

        match result {
            Err(Error::InvalidInput(msg)) => {
                prop_assert_eq!(msg, "Input array must be 3-dimensional");
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }

    /// Buffers whose length disagrees with the shape are rejected.
    #[test]
    fn rejects_length_mismatch(rows in 1usize..16, cols in 1usize..16, extra in 1usize..8) {
        let data = vec![0u8; rows * cols * 3 + extra];
        let result = RasterFrame::from_array(&[rows, cols, 3], &data);
        prop_assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    /// Equal content yields equal digests.
    #[test]
    fn digest_is_deterministic(rows in 1usize..16, cols in 1usize..16, value in any::<u8>()) {
        let a = RasterFrame::filled(rows, cols, [value, value, value]);
        let b = RasterFrame::from_fn(rows, cols, |_, _| [value, value, value]);
        prop_assert_eq!(a.digest(), b.digest());
    }
}
