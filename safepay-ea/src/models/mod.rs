//! Data models for safepay-ea (Evidence Analysis gateway)
//!
//! Request-scoped value objects: evidence submissions and transcription job
//! state. Nothing here is persisted; every value lives and dies with the
//! request that created it.

pub mod evidence;
pub mod transcription;

pub use evidence::{EvidenceMetadata, EvidencePayload, EvidenceSubmission, MediaFamily, Modality};
pub use transcription::{TranscriptionJob, TranscriptionStatus};
