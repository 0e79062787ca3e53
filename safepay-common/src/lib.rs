//! # SafePay Common Library
//!
//! Shared code for SafePay backend services including:
//! - API request/response contract types (`AnalysisResult`, error bodies)
//! - Configuration loading (TOML bootstrap + environment overrides)
//! - Common error types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
