//! Marshaling of caller-supplied sample arrays into raster frames.
//!
//! Host environments hand over an n-dimensional byte array as a shape plus a
//! flat buffer. Only `[rows, cols, 3]` arrays are accepted; anything else is
//! rejected before any sample is read.

use crate::error::{Error, Result};
use crate::frame::{RasterFrame, CHANNELS};

impl RasterFrame {
    /// Build a frame from a shaped byte array (`[rows, cols, channels]`).
    pub fn from_array(shape: &[usize], data: &[u8]) -> Result<Self> {
        let (rows, cols, channels) = match *shape {
            [rows, cols, channels] => (rows, cols, channels),
            _ => return Err(Error::invalid_input("Input array must be 3-dimensional")),
        };

        if channels != CHANNELS {
            return Err(Error::InvalidInput(format!(
                "Input array must have {} channels, got {}",
                CHANNELS, channels
            )));
        }

        let expected = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| Error::invalid_input("Input array shape overflows"))?;

        if data.len() != expected {
            return Err(Error::InvalidInput(format!(
                "Input array holds {} bytes, shape {:?} requires {}",
                data.len(),
                shape,
                expected
            )));
        }

        RasterFrame::new(rows, cols, data.to_vec())
    }
}
