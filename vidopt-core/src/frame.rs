//! Raster frame abstraction.
//!
//! A [`RasterFrame`] is a packed, row-major, 8-bit, 3-channel image. Every
//! component of the library reads frames through shared references; the
//! sample buffer is never mutated after construction.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of interleaved channels in every raster frame.
pub const CHANNELS: usize = 3;

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameShape {
    /// Number of pixel rows (height).
    pub rows: usize,
    /// Number of pixel columns (width).
    pub cols: usize,
}

impl FrameShape {
    /// Create a new shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of pixels (not samples).
    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of 8-bit samples across all channels.
    pub fn sample_count(&self) -> usize {
        self.pixel_count() * CHANNELS
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Content digest of a frame (SHA-256 over shape and samples).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDigest([u8; 32]);

impl FrameDigest {
    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for FrameDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for FrameDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 3-channel, 8-bit-per-channel raster image.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterFrame {
    shape: FrameShape,
    data: Vec<u8>,
}

impl RasterFrame {
    /// Create a frame from a packed `rows x cols x 3` sample buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        let shape = FrameShape::new(rows, cols);
        if data.len() != shape.sample_count() {
            return Err(Error::InvalidInput(format!(
                "Expected {} bytes for a {} frame, got {}",
                shape.sample_count(),
                shape,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Create a frame where every pixel has the same value.
    pub fn filled(rows: usize, cols: usize, rgb: [u8; CHANNELS]) -> Self {
        let mut data = Vec::with_capacity(rows * cols * CHANNELS);
        for _ in 0..rows * cols {
            data.extend_from_slice(&rgb);
        }
        Self {
            shape: FrameShape::new(rows, cols),
            data,
        }
    }

    /// Create a frame by evaluating `f(row, col)` for every pixel.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [u8; CHANNELS],
    {
        let mut data = Vec::with_capacity(rows * cols * CHANNELS);
        for row in 0..rows {
            for col in 0..cols {
                data.extend_from_slice(&f(row, col));
            }
        }
        Self {
            shape: FrameShape::new(rows, cols),
            data,
        }
    }

    /// Frame dimensions.
    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    /// Number of rows (height).
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    /// Number of columns (width).
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Number of channels, always [`CHANNELS`].
    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// Check if the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Packed sample buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a single sample.
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn sample(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.data[(row * self.shape.cols + col) * CHANNELS + channel]
    }

    /// Get all channels of a pixel.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> [u8; CHANNELS] {
        let idx = (row * self.shape.cols + col) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Iterate over the samples of one channel in row-major order.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().skip(channel).step_by(CHANNELS).copied()
    }

    /// Check whether two frames can be compared sample by sample.
    pub fn same_shape(&self, other: &RasterFrame) -> bool {
        self.shape == other.shape
    }

    /// Compute the content digest of this frame.
    pub fn digest(&self) -> FrameDigest {
        let mut hasher = Sha256::new();
        hasher.update((self.shape.rows as u64).to_le_bytes());
        hasher.update((self.shape.cols as u64).to_le_bytes());
        hasher.update(&self.data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        FrameDigest(out)
    }
}

impl fmt::Debug for RasterFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterFrame")
            .field("rows", &self.shape.rows)
            .field("cols", &self.shape.cols)
            .field("channels", &CHANNELS)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = RasterFrame::new(2, 4, vec![0u8; 24]).unwrap();
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.cols(), 4);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.shape().pixel_count(), 8);
    }

    #[test]
    fn test_frame_length_mismatch() {
        let result = RasterFrame::new(2, 4, vec![0u8; 23]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_filled_frame() {
        let frame = RasterFrame::filled(3, 5, [10, 20, 30]);
        assert_eq!(frame.data().len(), 45);
        assert_eq!(frame.pixel(2, 4), [10, 20, 30]);
        assert!(frame.channel(1).all(|v| v == 20));
    }

    #[test]
    fn test_from_fn_layout() {
        let frame = RasterFrame::from_fn(2, 3, |r, c| [r as u8, c as u8, 7]);
        assert_eq!(frame.sample(1, 2, 0), 1);
        assert_eq!(frame.sample(1, 2, 1), 2);
        assert_eq!(frame.sample(1, 2, 2), 7);
        assert_eq!(frame.channel(1).collect::<Vec<_>>(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = RasterFrame::filled(4, 4, [1, 2, 3]);
        let b = RasterFrame::filled(4, 4, [1, 2, 3]);
        let c = RasterFrame::filled(4, 4, [1, 2, 4]);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest().to_hex().len(), 64);
    }

    #[test]
    fn test_digest_tracks_shape() {
        // Same sample count, different shape.
        let a = RasterFrame::filled(2, 8, [0, 0, 0]);
        let b = RasterFrame::filled(4, 4, [0, 0, 0]);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(FrameShape::new(1080, 1920).to_string(), "1920x1080");
    }
}
