//! Evidence intake
//!
//! Validates inbound evidence before any orchestration work starts and
//! stages audio bytes to disk for the transcription upload. Staged files are
//! removed by an RAII guard, so cleanup happens on every exit path: success,
//! failure, timeout, and panic unwind.

use crate::models::{
    EvidenceMetadata, EvidencePayload, EvidenceSubmission, MediaFamily, Modality,
};
use safepay_common::config::GatewayConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Evidence validation and staging errors
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Nothing was submitted (400)
    #[error("Empty {0} payload")]
    EmptyPayload(Modality),

    /// Payload exceeds the configured size cap (400)
    #[error("Payload of {actual} bytes exceeds the {limit} byte limit")]
    TooLarge { actual: usize, limit: usize },

    /// Magic bytes or declared MIME type contradict the modality (400)
    #[error("Content does not look like {expected} data")]
    WrongMediaType { expected: &'static str },

    /// Disk staging failed (500, not the caller's fault)
    #[error("Failed to stage evidence: {0}")]
    StagingFailed(String),
}

/// Evidence validation and staging
pub struct EvidenceIntake {
    uploads_dir: PathBuf,
    max_upload_bytes: usize,
}

impl EvidenceIntake {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            uploads_dir: config.uploads_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Validate a binary upload into a submission.
    ///
    /// Rejects empty payloads, payloads over the size cap, and content whose
    /// sniffed type contradicts the modality's media family. Sniffing uses
    /// magic bytes first and falls back to the declared MIME type; content
    /// that is inconclusive both ways passes, the backend gets final say.
    pub fn binary_submission(
        &self,
        modality: Modality,
        bytes: Vec<u8>,
        original_name: &str,
        declared_mime: Option<String>,
    ) -> Result<EvidenceSubmission, IntakeError> {
        if bytes.is_empty() {
            return Err(IntakeError::EmptyPayload(modality));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(IntakeError::TooLarge {
                actual: bytes.len(),
                limit: self.max_upload_bytes,
            });
        }

        if let Some(family) = modality.media_family() {
            if !media_family_matches(family, &bytes, declared_mime.as_deref()) {
                return Err(IntakeError::WrongMediaType {
                    expected: family_name(family),
                });
            }
        }

        Ok(EvidenceSubmission {
            modality,
            payload: EvidencePayload::Binary(bytes),
            metadata: EvidenceMetadata {
                original_name: original_name.to_string(),
                mime_type: declared_mime.filter(|m| looks_like_mime(m)),
            },
        })
    }

    /// Validate text-borne evidence (free text or a caller-supplied
    /// transcript) into a submission. Whitespace-only input is empty.
    pub fn text_submission(
        &self,
        modality: Modality,
        text: String,
    ) -> Result<EvidenceSubmission, IntakeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::EmptyPayload(modality));
        }
        if trimmed.len() > self.max_upload_bytes {
            return Err(IntakeError::TooLarge {
                actual: trimmed.len(),
                limit: self.max_upload_bytes,
            });
        }

        Ok(EvidenceSubmission {
            modality,
            payload: EvidencePayload::Text(trimmed.to_string()),
            metadata: EvidenceMetadata {
                original_name: format!("{modality}.txt"),
                mime_type: Some("text/plain".to_string()),
            },
        })
    }

    /// Stage binary evidence to the uploads directory.
    ///
    /// Writes to `<uploads_dir>/<uuid>-<sanitized name>`, creating the
    /// directory if missing. The returned guard removes the file on drop.
    pub fn stage(&self, submission: &EvidenceSubmission) -> Result<StagedEvidence, IntakeError> {
        let bytes = match &submission.payload {
            EvidencePayload::Binary(bytes) => bytes,
            EvidencePayload::Text(_) => {
                return Err(IntakeError::StagingFailed(
                    "text evidence is never staged to disk".to_string(),
                ))
            }
        };

        std::fs::create_dir_all(&self.uploads_dir)
            .map_err(|e| IntakeError::StagingFailed(e.to_string()))?;

        let file_name = format!(
            "{}-{}",
            Uuid::new_v4(),
            sanitize_file_name(&submission.metadata.original_name)
        );
        let path = self.uploads_dir.join(file_name);

        std::fs::write(&path, bytes).map_err(|e| IntakeError::StagingFailed(e.to_string()))?;

        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            modality = %submission.modality,
            "Staged evidence file"
        );

        Ok(StagedEvidence { path })
    }
}

/// RAII guard for a staged evidence file
///
/// The file is removed when the guard drops, whichever way the request ends.
#[derive(Debug)]
pub struct StagedEvidence {
    path: PathBuf,
}

impl StagedEvidence {
    /// Path of the staged file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedEvidence {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove staged evidence file"
                );
            }
        }
    }
}

/// Check sniffed content against the modality's media family.
///
/// Magic bytes win when conclusive. A declared MIME type (other than the
/// generic octet-stream) decides otherwise. Content inconclusive both ways
/// is allowed through.
fn media_family_matches(family: MediaFamily, bytes: &[u8], declared_mime: Option<&str>) -> bool {
    if let Some(kind) = infer::get(bytes) {
        return sniffed_family(kind.matcher_type()) == Some(family);
    }

    if let Some(mime) = declared_mime {
        if mime != "application/octet-stream" {
            return mime.starts_with(family.mime_prefix());
        }
    }

    true
}

fn sniffed_family(matcher: infer::MatcherType) -> Option<MediaFamily> {
    match matcher {
        infer::MatcherType::Audio => Some(MediaFamily::Audio),
        infer::MatcherType::Image => Some(MediaFamily::Image),
        infer::MatcherType::Video => Some(MediaFamily::Video),
        _ => None,
    }
}

fn family_name(family: MediaFamily) -> &'static str {
    match family {
        MediaFamily::Audio => "audio",
        MediaFamily::Image => "image",
        MediaFamily::Video => "video",
    }
}

/// Keep only the final path component, with shell-safe characters
fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "evidence".to_string()
    } else {
        cleaned
    }
}

/// Cheap structural MIME check: `type/subtype`, ASCII, no whitespace
fn looks_like_mime(mime: &str) -> bool {
    if !mime.is_ascii() || mime.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    matches!(mime.split_once('/'), Some((t, s)) if !t.is_empty() && !s.is_empty())
}
