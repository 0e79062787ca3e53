//! Degraded-path policy
//!
//! On the audio path, once a transcript exists the caller always gets a
//! well-formed verdict: if the analysis backend is down or erroring, the
//! gateway answers with a deterministic safe default instead of a 5xx, and
//! the transcript is still returned. The `method` field tells the caller
//! which degraded path produced the verdict.

use safepay_common::api::types::AnalysisResult;

/// Which degraded path produced a fallback verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedPath {
    /// Transcript obtained, analysis backend failed
    TranscriptionOnly,
    /// Nothing beyond intake succeeded
    Unavailable,
}

impl DegradedPath {
    /// Stable `method` label for this path
    pub fn method_label(self) -> &'static str {
        match self {
            DegradedPath::TranscriptionOnly => "transcription_only",
            DegradedPath::Unavailable => "fallback_unavailable",
        }
    }

    /// Select the degraded path after an analysis failure
    pub fn for_analysis_failure(transcript_present: bool) -> Self {
        if transcript_present {
            DegradedPath::TranscriptionOnly
        } else {
            DegradedPath::Unavailable
        }
    }
}

/// Deterministic safe-default verdict for a degraded path.
///
/// Always `isScam=false`, zero confidence, zero risk, no indicators; only
/// the `method` label varies.
pub fn degraded_result(path: DegradedPath) -> AnalysisResult {
    AnalysisResult::degraded(path.method_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_labels() {
        assert_eq!(
            DegradedPath::TranscriptionOnly.method_label(),
            "transcription_only"
        );
        assert_eq!(
            DegradedPath::Unavailable.method_label(),
            "fallback_unavailable"
        );
    }

    #[test]
    fn test_path_selection() {
        assert_eq!(
            DegradedPath::for_analysis_failure(true),
            DegradedPath::TranscriptionOnly
        );
        assert_eq!(
            DegradedPath::for_analysis_failure(false),
            DegradedPath::Unavailable
        );
    }

    #[test]
    fn test_degraded_verdict_is_safe_default() {
        let verdict = degraded_result(DegradedPath::TranscriptionOnly);
        assert!(!verdict.is_scam);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.risk_score, 0.0);
        assert!(verdict.scam_type.is_none());
        assert!(verdict.indicators.is_empty());
        assert_eq!(verdict.method, "transcription_only");
    }
}
