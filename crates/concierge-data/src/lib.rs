//! # concierge-data
//!
//! Structured data engine: scoped counts, sums and filtered lists against an
//! [`IStructuredStore`](concierge_core::traits::IStructuredStore).
//!
//! This crate has no dependency on any generation backend. Every number it
//! returns was computed from stored records.

pub mod aggregations;
pub mod engine;
pub mod operation;
pub mod time_range;

pub use engine::{DataEngine, DataRequest};
pub use operation::DataOperation;
