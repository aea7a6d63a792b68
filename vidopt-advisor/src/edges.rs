//! Dual-threshold edge detection.
//!
//! Gradients come from 3x3 Sobel operators applied to every channel with
//! replicated borders; each pixel keeps the channel with the largest L1
//! magnitude (`|gx| + |gy|`). Thin ridges survive non-maximum suppression
//! along the quantized gradient direction, then hysteresis keeps strong
//! pixels (> high) and weak pixels (> low) 8-connected to a strong one.

use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use vidopt_core::{RasterFrame, CHANNELS};

/// tan(22.5 degrees) in 15-bit fixed point.
const TAN_22_5: i64 = 13573;

/// Hysteresis thresholds on the L1 gradient magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeThresholds {
    /// Weak-edge threshold.
    pub low: f64,
    /// Strong-edge threshold.
    pub high: f64,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 200.0,
        }
    }
}

impl EdgeThresholds {
    /// Create thresholds, swapping them if given in the wrong order.
    pub fn new(low: f64, high: f64) -> Self {
        if low > high {
            Self {
                low: high,
                high: low,
            }
        } else {
            Self { low, high }
        }
    }

    /// Check that both thresholds are finite, non-negative and ordered.
    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low < 0.0 {
            return Err(AdvisorError::ConfigError(format!(
                "Edge thresholds must be finite and non-negative, got {} and {}",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(AdvisorError::ConfigError(format!(
                "Edge low threshold {} exceeds high threshold {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Binary edge map produced by [`EdgeDetector::detect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    width: usize,
    height: usize,
    edges: Vec<bool>,
}

impl EdgeMap {
    /// Map width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether a pixel is an edge.
    pub fn is_edge(&self, row: usize, col: usize) -> bool {
        self.edges[row * self.width + col]
    }

    /// Number of edge pixels.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }

    /// Fraction of pixels marked as edges, in `[0, 1]`.
    pub fn density(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        self.edge_count() as f64 / self.edges.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Weak,
    Strong,
}

/// Dual-threshold edge detector over 3-channel frames.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    thresholds: EdgeThresholds,
}

impl EdgeDetector {
    /// Create a detector with the given thresholds.
    pub fn new(thresholds: EdgeThresholds) -> Self {
        Self { thresholds }
    }

    /// Configured thresholds.
    pub fn thresholds(&self) -> EdgeThresholds {
        self.thresholds
    }

    /// Detect edges in a frame.
    pub fn detect(&self, frame: &RasterFrame) -> EdgeMap {
        let width = frame.cols();
        let height = frame.rows();
        let (gx, gy, magnitude) = gradients(frame);
        let marks = self.suppress(width, height, &gx, &gy, &magnitude);
        let edges = hysteresis(width, height, marks);

        EdgeMap {
            width,
            height,
            edges,
        }
    }

    fn suppress(
        &self,
        width: usize,
        height: usize,
        gx: &[i32],
        gy: &[i32],
        magnitude: &[i32],
    ) -> Vec<Mark> {
        let mag_at = |row: isize, col: isize| -> i32 {
            if row < 0 || col < 0 || row >= height as isize || col >= width as isize {
                0
            } else {
                magnitude[row as usize * width + col as usize]
            }
        };

        let mut marks = vec![Mark::None; width * height];
        for row in 0..height {
            for col in 0..width {
                let idx = row * width + col;
                let m = magnitude[idx];
                if (m as f64) <= self.thresholds.low {
                    continue;
                }

                let (r, c) = (row as isize, col as isize);
                let dx = gx[idx] as i64;
                let dy = gy[idx] as i64;
                let ax = dx.abs();
                let ay = dy.abs() << 15;
                let tg22 = ax * TAN_22_5;

                let is_max = if ay < tg22 {
                    // Near-horizontal gradient: compare left and right.
                    m > mag_at(r, c - 1) && m >= mag_at(r, c + 1)
                } else {
                    let tg67 = tg22 + (ax << 16);
                    if ay > tg67 {
                        // Near-vertical gradient: compare above and below.
                        m > mag_at(r - 1, c) && m >= mag_at(r + 1, c)
                    } else {
                        let s: isize = if (dx < 0) != (dy < 0) { -1 } else { 1 };
                        m > mag_at(r - 1, c - s) && m > mag_at(r + 1, c + s)
                    }
                };

                if is_max {
                    marks[idx] = if (m as f64) > self.thresholds.high {
                        Mark::Strong
                    } else {
                        Mark::Weak
                    };
                }
            }
        }
        marks
    }
}

/// Sobel gradients, picking per pixel the channel with the largest L1 norm.
fn gradients(frame: &RasterFrame) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
    let width = frame.cols();
    let height = frame.rows();
    let n = width * height;
    let mut gx = vec![0i32; n];
    let mut gy = vec![0i32; n];
    let mut magnitude = vec![0i32; n];

    if n == 0 {
        return (gx, gy, magnitude);
    }

    let clamp_row = |r: isize| r.clamp(0, height as isize - 1) as usize;
    let clamp_col = |c: isize| c.clamp(0, width as isize - 1) as usize;

    for row in 0..height {
        let up = clamp_row(row as isize - 1);
        let down = clamp_row(row as isize + 1);
        for col in 0..width {
            let left = clamp_col(col as isize - 1);
            let right = clamp_col(col as isize + 1);
            let idx = row * width + col;

            for ch in 0..CHANNELS {
                let p = |r: usize, c: usize| frame.sample(r, c, ch) as i32;

                let dx = (p(up, right) + 2 * p(row, right) + p(down, right))
                    - (p(up, left) + 2 * p(row, left) + p(down, left));
                let dy = (p(down, left) + 2 * p(down, col) + p(down, right))
                    - (p(up, left) + 2 * p(up, col) + p(up, right));
                let m = dx.abs() + dy.abs();

                if ch == 0 || m > magnitude[idx] {
                    magnitude[idx] = m;
                    gx[idx] = dx;
                    gy[idx] = dy;
                }
            }
        }
    }

    (gx, gy, magnitude)
}

/// Promote weak pixels connected to strong ones; drop the rest.
fn hysteresis(width: usize, height: usize, mut marks: Vec<Mark>) -> Vec<bool> {
    let mut stack: Vec<usize> = marks
        .iter()
        .enumerate()
        .filter(|(_, m)| **m == Mark::Strong)
        .map(|(i, _)| i)
        .collect();

    while let Some(idx) = stack.pop() {
        let row = (idx / width) as isize;
        let col = (idx % width) as isize;
        for dr in -1..=1isize {
            for dc in -1..=1isize {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (r, c) = (row + dr, col + dc);
                if r < 0 || c < 0 || r >= height as isize || c >= width as isize {
                    continue;
                }
                let n = r as usize * width + c as usize;
                if marks[n] == Mark::Weak {
                    marks[n] = Mark::Strong;
                    stack.push(n);
                }
            }
        }
    }

    marks.into_iter().map(|m| m == Mark::Strong).collect()
}
