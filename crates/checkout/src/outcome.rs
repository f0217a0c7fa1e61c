use checkout_core::models::{ChatId, PaymentError};
use thiserror::Error;

/// Why an operation ended without touching the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skipped {
    #[error("chat {0} is not known locally")]
    UnknownChat(ChatId),
    #[error("backend returned no usable payload")]
    EmptyResult,
    #[error("missing {0}")]
    PreconditionMissing(&'static str),
    #[error("a submission is already pending")]
    AlreadyPending,
    #[error("session changed while the request was in flight")]
    StaleSession,
}

/// Result of one orchestrator operation. Failures are already reflected in
/// the session by the time the caller sees them.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    /// Submission went out but the backend did not confirm payment; the
    /// session stays `pending`.
    Pending,
    Failed(PaymentError),
    Skipped(Skipped),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

impl From<Skipped> for Outcome {
    fn from(reason: Skipped) -> Self {
        Outcome::Skipped(reason)
    }
}
