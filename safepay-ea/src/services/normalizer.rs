//! Response normalization
//!
//! Every analysis backend answers in its own dialect; the gateway promises
//! callers exactly one verdict shape. A normalizer reads the raw backend JSON
//! leniently and produces an [`AnalysisResult`]. Normalization is total: any
//! JSON value, including an empty object or mis-typed fields, yields a
//! well-formed verdict with conservative defaults.

use safepay_common::api::types::AnalysisResult;
use serde_json::Value;

/// Accepted field spellings for one backend dialect
struct DialectKeys {
    is_scam: &'static [&'static str],
    confidence: &'static [&'static str],
    risk_score: &'static [&'static str],
    scam_type: &'static [&'static str],
    indicators: &'static [&'static str],
    method: &'static [&'static str],
}

/// Voice backend: fixed snake_case shape
const VOICE_KEYS: DialectKeys = DialectKeys {
    is_scam: &["is_scam"],
    confidence: &["confidence"],
    risk_score: &["risk_score"],
    scam_type: &["scam_type"],
    indicators: &["scam_indicators"],
    method: &["analysis_method"],
};

/// Text prediction backend: several observed spellings per field
const TEXT_KEYS: DialectKeys = DialectKeys {
    is_scam: &["is_scam", "prediction"],
    confidence: &["confidence"],
    risk_score: &["risk_score", "risk"],
    scam_type: &["scam_type", "category"],
    indicators: &["scam_indicators", "indicators", "keywords"],
    method: &["analysis_method", "method"],
};

/// Video backend: deepfake detection vocabulary
const VIDEO_KEYS: DialectKeys = DialectKeys {
    is_scam: &["is_scam", "is_deepfake"],
    confidence: &["confidence"],
    risk_score: &["risk_score"],
    scam_type: &["scam_type", "detection_type"],
    indicators: &["scam_indicators", "indicators"],
    method: &["analysis_method", "method"],
};

/// WhatsApp screenshot backend
const SCREENSHOT_KEYS: DialectKeys = DialectKeys {
    is_scam: &["is_scam"],
    confidence: &["confidence"],
    risk_score: &["risk_score"],
    scam_type: &["scam_type"],
    indicators: &["scam_indicators", "indicators"],
    method: &["analysis_method", "method"],
};

/// Which backend dialect to read a response in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseNormalizer {
    Voice,
    Text,
    Video,
    Screenshot,
}

impl ResponseNormalizer {
    /// Method label used when the backend does not name one
    pub fn default_method(self) -> &'static str {
        match self {
            ResponseNormalizer::Voice => "voice_analysis",
            ResponseNormalizer::Text => "text_analysis",
            ResponseNormalizer::Video => "video_analysis",
            ResponseNormalizer::Screenshot => "whatsapp_analysis",
        }
    }

    fn keys(self) -> &'static DialectKeys {
        match self {
            ResponseNormalizer::Voice => &VOICE_KEYS,
            ResponseNormalizer::Text => &TEXT_KEYS,
            ResponseNormalizer::Video => &VIDEO_KEYS,
            ResponseNormalizer::Screenshot => &SCREENSHOT_KEYS,
        }
    }

    /// Normalize a raw backend response into the common verdict contract.
    ///
    /// Missing or mis-typed fields fall back to safe defaults (`false`, `0.0`,
    /// empty); numeric ranges are clamped at construction. Indicator order is
    /// preserved as the backend sent it.
    pub fn normalize(self, raw: &Value) -> AnalysisResult {
        let keys = self.keys();

        AnalysisResult::new(
            bool_field(raw, keys.is_scam),
            float_field(raw, keys.confidence),
            float_field(raw, keys.risk_score),
            string_field(raw, keys.scam_type),
            string_list(raw, keys.indicators),
            string_field(raw, keys.method)
                .unwrap_or_else(|| self.default_method().to_string()),
        )
    }
}

/// Read the usable text out of an OCR extraction response.
///
/// Accepts `text` or `extracted_text`; trims whitespace and returns None when
/// nothing readable came back.
pub fn extracted_text(raw: &Value) -> Option<String> {
    string_field(raw, &["text", "extracted_text"])
}

fn bool_field(raw: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .find_map(|key| raw.get(key).and_then(Value::as_bool))
        .unwrap_or(false)
}

fn float_field(raw: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|key| raw.get(key).and_then(Value::as_f64))
        .unwrap_or(0.0)
}

fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| raw.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(raw: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| raw.get(key).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
