//! Evidence submission types
//!
//! One submission per request: the evidence modality decides which analysis
//! backend receives it, in what request shape, and how the response is read.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of scam evidence submitted for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Voice recording or a pre-supplied call transcript
    Voice,
    /// Document or photo to extract text from (OCR), then analyze as text
    Image,
    /// Free text (SMS, chat message, email body)
    Text,
    /// Video clip (deepfake / manipulated media analysis)
    Video,
    /// WhatsApp chat screenshot
    Screenshot,
}

/// Coarse media family a binary submission must belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFamily {
    Audio,
    Image,
    Video,
}

impl Modality {
    /// All supported modalities
    pub const ALL: [Modality; 5] = [
        Modality::Voice,
        Modality::Image,
        Modality::Text,
        Modality::Video,
        Modality::Screenshot,
    ];

    /// Stable lowercase name, used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Voice => "voice",
            Modality::Image => "image",
            Modality::Text => "text",
            Modality::Video => "video",
            Modality::Screenshot => "screenshot",
        }
    }

    /// Media family binary evidence must sniff as, None for text-borne input
    pub fn media_family(self) -> Option<MediaFamily> {
        match self {
            Modality::Voice => Some(MediaFamily::Audio),
            Modality::Image | Modality::Screenshot => Some(MediaFamily::Image),
            Modality::Video => Some(MediaFamily::Video),
            Modality::Text => None,
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MediaFamily {
    /// MIME type prefix for this family (e.g. `audio/`)
    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaFamily::Audio => "audio/",
            MediaFamily::Image => "image/",
            MediaFamily::Video => "video/",
        }
    }
}

/// Raw evidence content
#[derive(Debug, Clone)]
pub enum EvidencePayload {
    /// File bytes (audio, image, video, screenshot)
    Binary(Vec<u8>),
    /// Text content (free text or a caller-supplied transcript)
    Text(String),
}

impl EvidencePayload {
    /// Payload size in bytes
    pub fn len(&self) -> usize {
        match self {
            EvidencePayload::Binary(bytes) => bytes.len(),
            EvidencePayload::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caller-supplied descriptive metadata
#[derive(Debug, Clone)]
pub struct EvidenceMetadata {
    /// Original filename as uploaded (sanitized before touching disk)
    pub original_name: String,

    /// Declared MIME type, if the caller sent one
    pub mime_type: Option<String>,
}

impl EvidenceMetadata {
    /// MIME type to present to backends, octet-stream when undeclared
    pub fn mime_or_default(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("application/octet-stream")
    }
}

/// A validated evidence submission, ready for orchestration
///
/// Constructed only by Evidence Intake after validation; handlers never build
/// one directly from raw request parts.
#[derive(Debug, Clone)]
pub struct EvidenceSubmission {
    /// Evidence kind, decides routing and response normalization
    pub modality: Modality,

    /// The evidence content itself
    pub payload: EvidencePayload,

    /// Descriptive metadata forwarded to backends
    pub metadata: EvidenceMetadata,
}
