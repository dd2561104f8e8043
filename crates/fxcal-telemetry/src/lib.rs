//! Structured logging and run summaries for fxcal.
//!
//! - `init_logging`: tracing subscriber, JSON in production
//! - `RunSummary`: one structured record per run

pub mod error;
pub mod logging;
pub mod summary;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use summary::RunSummary;
