//! Shared API request/response types
//!
//! The verdict contract and error body shape exposed by the evidence-analysis
//! gateway. Analysis backends reply in their own dialects; these types are
//! what callers of the gateway actually see.

use serde::{Deserialize, Serialize};

// ========================================
// Analysis Verdict Contract
// ========================================

/// Common analysis verdict returned for every evidence modality
///
/// Produced exactly once per request, either from a real backend response or
/// from the degraded-path policy, and never mutated afterwards. Serializes in
/// camelCase (`isScam`, `riskScore`, ...), the shape the mobile client
/// consumes.
///
/// # Examples
///
/// ```
/// use safepay_common::api::types::AnalysisResult;
///
/// let verdict = AnalysisResult::new(
///     true,
///     0.92,
///     0.88,
///     Some("gift_card".to_string()),
///     vec!["urgency".to_string()],
///     "voice_analysis",
/// );
/// assert!(verdict.is_scam);
/// assert_eq!(verdict.confidence, 0.92);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether the evidence was judged fraudulent
    pub is_scam: bool,

    /// Backend confidence in the verdict, always within [0, 1]
    pub confidence: f64,

    /// Relative fraud risk, always within [0, 1]
    pub risk_score: f64,

    /// Scam category when one was identified (e.g. "gift_card")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scam_type: Option<String>,

    /// Signals the verdict was based on, in backend order
    pub indicators: Vec<String>,

    /// Which backend or degraded path produced this verdict
    pub method: String,
}

impl AnalysisResult {
    /// Create a verdict, clamping `confidence` and `risk_score` into [0, 1].
    ///
    /// Backends occasionally report out-of-range or non-finite numbers;
    /// non-finite values clamp to 0.0 so the contract ranges always hold.
    pub fn new(
        is_scam: bool,
        confidence: f64,
        risk_score: f64,
        scam_type: Option<String>,
        indicators: Vec<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            is_scam,
            confidence: clamp_unit(confidence),
            risk_score: clamp_unit(risk_score),
            scam_type,
            indicators,
            method: method.into(),
        }
    }

    /// Deterministic safe-default verdict for a degraded path
    pub fn degraded(method: impl Into<String>) -> Self {
        Self {
            is_scam: false,
            confidence: 0.0,
            risk_score: 0.0,
            scam_type: None,
            indicators: Vec::new(),
            method: method.into(),
        }
    }
}

/// Clamp a backend-reported number into [0, 1]; non-finite becomes 0.0
fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// ========================================
// Error Response Types
// ========================================

/// Error response body
///
/// `error` is a stable machine-readable kind in snake_case; `details` is the
/// human-readable explanation. The two are always distinct so clients can
/// branch on `error` without parsing prose.
///
/// # Examples
///
/// ```
/// use safepay_common::api::types::ErrorBody;
///
/// let body = ErrorBody::new("invalid_evidence", "Audio payload is empty");
/// assert_eq!(body.error, "invalid_evidence");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Error kind identifier
    pub error: String,
    /// Human-readable error message
    pub details: String,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

// ========================================
// Tests
// ========================================
