//! Transcription job state
//!
//! A job tracks one speech-to-text request at the external provider. Status
//! moves forward only: a job leaves `Pending` exactly once, to `Completed` or
//! `Failed`, and never changes again.

/// Status of a transcription job at the external provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionStatus {
    /// Queued or processing at the provider
    Pending,
    /// Transcript produced
    Completed,
    /// Provider reported a processing error
    Failed,
}

impl TranscriptionStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TranscriptionStatus::Completed | TranscriptionStatus::Failed
        )
    }
}

/// One transcription job (in-memory, request-scoped)
#[derive(Debug, Clone)]
pub struct TranscriptionJob {
    /// Provider-assigned job identifier
    pub external_id: String,

    /// Current status
    pub status: TranscriptionStatus,

    /// Transcript text, present once the job completed with output
    pub text: Option<String>,
}

impl TranscriptionJob {
    /// Create a new pending job
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            status: TranscriptionStatus::Pending,
            text: None,
        }
    }

    /// Attempt a status transition.
    ///
    /// Only `Pending → Completed` and `Pending → Failed` are accepted.
    /// Anything else (terminal-to-anything, or a `Pending` self-loop) returns
    /// false and leaves the job untouched.
    pub fn transition_to(&mut self, new_status: TranscriptionStatus) -> bool {
        if self.status == TranscriptionStatus::Pending && new_status.is_terminal() {
            self.status = new_status;
            true
        } else {
            false
        }
    }

    /// Whether the job reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_pending() {
        let job = TranscriptionJob::new("abc123");
        assert_eq!(job.status, TranscriptionStatus::Pending);
        assert!(job.text.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_pending_to_completed() {
        let mut job = TranscriptionJob::new("abc123");
        assert!(job.transition_to(TranscriptionStatus::Completed));
        assert_eq!(job.status, TranscriptionStatus::Completed);
        assert!(job.is_terminal());
    }

    #[test]
    fn test_pending_to_failed() {
        let mut job = TranscriptionJob::new("abc123");
        assert!(job.transition_to(TranscriptionStatus::Failed));
        assert_eq!(job.status, TranscriptionStatus::Failed);
    }

    #[test]
    fn test_terminal_status_is_frozen() {
        let mut job = TranscriptionJob::new("abc123");
        assert!(job.transition_to(TranscriptionStatus::Completed));

        // No backward move, no terminal-to-terminal move
        assert!(!job.transition_to(TranscriptionStatus::Pending));
        assert!(!job.transition_to(TranscriptionStatus::Failed));
        assert!(!job.transition_to(TranscriptionStatus::Completed));
        assert_eq!(job.status, TranscriptionStatus::Completed);
    }

    #[test]
    fn test_pending_self_loop_rejected() {
        let mut job = TranscriptionJob::new("abc123");
        assert!(!job.transition_to(TranscriptionStatus::Pending));
        assert_eq!(job.status, TranscriptionStatus::Pending);
    }
}
