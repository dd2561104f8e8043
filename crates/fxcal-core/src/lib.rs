//! Core domain types for the fxcal notifier.
//!
//! This crate provides the pure part of the pipeline:
//! - `EventRecord`, `Impact`: economic calendar rows as scraped
//! - `Quote`, `QuoteValue`: market indicator readings
//! - `clean_number`: display-string to number normalization
//! - `high_impact`, `divergent`: the two filter stages
//! - `build_report`: notification title and body rendering

pub mod error;
pub mod event;
pub mod filter;
pub mod number;
pub mod quote;
pub mod report;
pub mod table;

pub use error::{CoreError, Result};
pub use event::{EventRecord, Impact};
pub use filter::{compare, divergent, high_impact};
pub use number::clean_number;
pub use quote::{Quote, QuoteValue};
pub use report::{build_report, Report};
pub use table::render_table;
