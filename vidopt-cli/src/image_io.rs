//! Image file loading.

use anyhow::Context as _;
use std::path::Path;
use tracing::debug;
use vidopt_core::RasterFrame;

/// Decode an image file into an RGB raster frame.
pub fn load_frame(path: &Path) -> anyhow::Result<RasterFrame> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let image = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();

    let frame = RasterFrame::from_array(&[height as usize, width as usize, 3], image.as_raw())?;
    debug!("Loaded {} ({})", path.display(), frame.shape());
    Ok(frame)
}

/// Load a reference/distorted pair, requiring matching dimensions.
pub fn load_pair(reference: &Path, distorted: &Path) -> anyhow::Result<(RasterFrame, RasterFrame)> {
    let a = load_frame(reference)?;
    let b = load_frame(distorted)?;
    if !a.same_shape(&b) {
        anyhow::bail!(
            "Frame sizes differ: {} is {}, {} is {}",
            reference.display(),
            a.shape(),
            distorted.display(),
            b.shape()
        );
    }
    Ok((a, b))
}
