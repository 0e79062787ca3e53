//! API module for shared HTTP API functionality
//!
//! Common request/response types used by the SafePay evidence-analysis
//! gateway and by any future SafePay service that reports verdicts.
//!
//! # Design Principle
//!
//! This module contains ONLY pure types and constructors, no HTTP framework
//! dependencies. The gateway wraps these with framework-specific pieces
//! (Axum extractors, `IntoResponse` impls, etc.).

pub mod types;

pub use types::{AnalysisResult, ErrorBody};
