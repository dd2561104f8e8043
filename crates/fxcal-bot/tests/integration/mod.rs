//! Integration tests for fxcal-bot.
//!
//! These tests run the whole pipeline against local stand-ins:
//! - Calendar page served over HTTP for the snapshot driver
//! - Quote pages, including a failing one
//! - Webhook endpoint recording every post

pub mod common;
