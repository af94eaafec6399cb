// src/error.rs

use thiserror::Error;

/// Shown when the backend fails without a message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("select at least one pending target before passing")]
    NoSelection,
    #[error("choose an officer to pass the selected targets to")]
    NoAssignee,
    #[error("officer {0} is not in the assignable directory")]
    UnknownAssignee(i64),
    #[error("officer directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("target feed unavailable: {0}")]
    FeedUnavailable(String),
    #[error("{0}")]
    TransactionRejected(String),
    #[error("{0}")]
    TransactionTransportFailure(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("confirm the pass before submitting it")]
    ConfirmationRequired,
    #[error("a pass is already being submitted")]
    PassInFlight,
    #[error("targets changed since revision {0}; refresh and try again")]
    StaleSnapshot(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AllocationError {
    pub fn kind(&self) -> &'static str {
        match self {
            AllocationError::NoSelection => "no_selection",
            AllocationError::NoAssignee => "no_assignee",
            AllocationError::UnknownAssignee(_) => "unknown_assignee",
            AllocationError::DirectoryUnavailable(_) => "directory_unavailable",
            AllocationError::FeedUnavailable(_) => "feed_unavailable",
            AllocationError::TransactionRejected(_) => "transaction_rejected",
            AllocationError::TransactionTransportFailure(_) => "transaction_transport_failure",
            AllocationError::MalformedResponse(_) => "malformed_response",
            AllocationError::ConfirmationRequired => "confirmation_required",
            AllocationError::PassInFlight => "pass_in_flight",
            AllocationError::StaleSnapshot(_) => "stale_snapshot",
            AllocationError::Configuration(_) => "configuration",
        }
    }

    /// Validation failures are resolved locally and never reach the network.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AllocationError::NoSelection
                | AllocationError::NoAssignee
                | AllocationError::UnknownAssignee(_)
                | AllocationError::ConfirmationRequired
                | AllocationError::StaleSnapshot(_)
        )
    }
}
