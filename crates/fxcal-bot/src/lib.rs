//! Economic-calendar divergence notifier.
//!
//! Wires the components into one linear run:
//! - Calendar scrape through a page driver
//! - High-impact and divergence filtering
//! - Market quote lookup
//! - Report formatting and webhook delivery

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
