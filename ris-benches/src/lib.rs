//! Benchmark support crate for ris.
//!
//! Provides synthetic influence graphs and parameter types used by the
//! Criterion benchmarks for RR-set generation and spread estimation.

pub mod error;
pub mod params;
pub mod source;
