//! Service modules for the evidence-analysis workflow
//!
//! Orchestration components, each request-scoped and side-effect free except
//! where noted:
//! - Evidence intake (validation + disk staging of audio uploads)
//! - Backend registry (modality to backend routing table)
//! - Transcription client (speech-to-text provider workflow)
//! - Dispatcher (outbound calls to analysis backends)
//! - Normalizer (backend dialects to the one verdict contract)
//! - Fallback policy (degraded verdicts when analysis cannot complete)
//! - Orchestrator (ties the above together per request)

pub mod dispatcher;
pub mod fallback;
pub mod intake;
pub mod normalizer;
pub mod orchestrator;
pub mod registry;
pub mod transcription_client;
pub mod upi;

pub use dispatcher::{BackendDispatcher, DispatchError};
pub use fallback::{degraded_result, DegradedPath};
pub use intake::{EvidenceIntake, IntakeError, StagedEvidence};
pub use normalizer::{extracted_text, ResponseNormalizer};
pub use orchestrator::AnalysisOrchestrator;
pub use registry::{BackendDescriptor, BackendRegistry, RegistryError, RequestShape};
pub use transcription_client::{AssemblyAiClient, PollOutcome, TranscribeError};
pub use upi::{check_upi_id, UpiRiskReport};
