//! Separable Gaussian filtering over floating-point planes.
//!
//! Borders are handled by reflect-101 extension (`gfedcb|abcdefgh|gfedcba`),
//! so the output has the same size as the input.

use crate::error::{QualityError, Result};
use rayon::prelude::*;
use vidopt_core::RasterFrame;

/// Normalized 1-D Gaussian kernel.
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Build a kernel of odd `size` with standard deviation `sigma`.
    pub fn new(size: usize, sigma: f64) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(QualityError::InvalidParameter(format!(
                "Gaussian kernel size must be odd, got {}",
                size
            )));
        }
        if sigma <= 0.0 || !sigma.is_finite() {
            return Err(QualityError::InvalidParameter(format!(
                "Gaussian sigma must be positive, got {}",
                sigma
            )));
        }

        Ok(Self::build(size, sigma))
    }

    /// Build a kernel from parameters that are already known to be valid.
    pub(crate) fn build(size: usize, sigma: f64) -> Self {
        let center = (size - 1) as f64 / 2.0;
        let mut weights: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - center;
                (-(x * x) / (2.0 * sigma * sigma)).exp()
            })
            .collect();

        let sum: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }

        Self { weights }
    }

    /// Kernel taps.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Kernel length.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false; a kernel has at least one tap.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn radius(&self) -> isize {
        (self.weights.len() / 2) as isize
    }
}

/// A single-channel plane of `f64` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Plane width.
    pub width: usize,
    /// Plane height.
    pub height: usize,
    /// Row-major samples.
    pub data: Vec<f64>,
}

impl Plane {
    /// Extract one channel of a frame as raw (unscaled) sample values.
    pub fn from_channel(frame: &RasterFrame, channel: usize) -> Self {
        Self {
            width: frame.cols(),
            height: frame.rows(),
            data: frame.channel(channel).map(f64::from).collect(),
        }
    }

    /// Element-wise product of two planes of equal size.
    pub fn mul(&self, other: &Plane) -> Plane {
        Plane {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a * b)
                .collect(),
        }
    }

    /// Element-wise square.
    pub fn square(&self) -> Plane {
        self.mul(self)
    }

    /// Arithmetic mean of all samples.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

/// Map an out-of-range index back into `0..len` by reflect-101.
#[inline]
fn reflect_101(mut i: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * (len - 1) - i;
        } else {
            return i as usize;
        }
    }
}

/// Blur a plane with a separable Gaussian (horizontal pass, then vertical).
pub fn gaussian_blur(plane: &Plane, kernel: &GaussianKernel) -> Plane {
    let width = plane.width;
    let height = plane.height;
    if width == 0 || height == 0 {
        return plane.clone();
    }

    let taps = kernel.weights();
    let radius = kernel.radius();

    let mut horizontal = vec![0.0f64; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let row = &plane.data[y * width..(y + 1) * width];
            for (x, out) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, w) in taps.iter().enumerate() {
                    let sx = reflect_101(x as isize + k as isize - radius, width);
                    acc += w * row[sx];
                }
                *out = acc;
            }
        });

    let mut output = vec![0.0f64; width * height];
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, w) in taps.iter().enumerate() {
                    let sy = reflect_101(y as isize + k as isize - radius, height);
                    acc += w * horizontal[sy * width + x];
                }
                *out = acc;
            }
        });

    Plane {
        width,
        height,
        data: output,
    }
}
