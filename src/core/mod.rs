//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;

// Re-export main types for cleaner imports
pub use conversion::{Amount, Conversion, ConversionResult};
pub use currency::{RateProvider, RateSnapshot};
