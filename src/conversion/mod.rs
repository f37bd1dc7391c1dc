//! Conversion dispatch
//!
//! This module resolves (source, target) pairs to routes, runs them, and
//! carries the options and statistics around a conversion.

pub mod config;
pub mod engine;
pub mod stats;
pub mod transform;

pub use config::ConversionOptions;
pub use engine::{convert, ConversionEngine, ConversionMetadata, ConversionRequest, Converted, Route};
pub use stats::BatchStatistics;
pub use transform::{transform_for, DelimiterSwap};

pub use crate::error::ConversionResult;
