//! TOTAL2 index engine
//!
//! Whole-matrix computation of a volume-weighted altcoin index: alignment
//! onto one daily calendar, trailing volume smoothing with warmup masking,
//! per-day ranking, top-N aggregation and composition extraction.

mod composition;
pub mod engine;
pub mod matrix;
pub mod processor;
pub mod ranking;
pub mod smoothing;

pub use engine::Total2Engine;
pub use matrix::AlignedMatrix;
pub use processor::Total2Processor;
