//! # Vidopt Core
//!
//! Core types shared by the vidopt crates.
//!
//! This crate provides:
//! - Error handling types
//! - The [`RasterFrame`] data object every metric and advisor operates on
//! - Marshaling of shaped byte arrays into frames ([`RasterFrame::from_array`])
//! - Frame content digests for caching

pub mod error;
pub mod frame;
pub mod provider;

pub use error::{Error, Result};
pub use frame::{FrameDigest, FrameShape, RasterFrame, CHANNELS};
