//! # VCR Tools
//!
//! Command-line tools for battle records:
//! - Scenario loading and validation
//! - Single-battle reports
//! - Parallel batch runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod batch;
pub mod report;
pub mod scenario;
pub mod validate;
