//! Error types for the reconciliation layer
//!
//! Validation errors (`InvalidDate`, `InvalidIdentifier`) are raised before
//! any mutation is attempted. Remote-call failures carry the gateway error
//! that caused them; for remote-path operations the partitions are left
//! exactly as they were, so the merged view never shows a half-applied state.

use crate::gateway::GatewayError;
use boardsync_model::{DateError, Identity, IdentityError, RemoteId};

/// Main error type of the reconciliation store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Due-date input failed local validation
    #[error("invalid due date: {0}")]
    InvalidDate(#[from] DateError),

    /// Navigation supplied a bad entity identifier
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentityError),

    /// Remote create rejected; both partitions unchanged
    #[error("create failed: {0}")]
    CreateFailed(#[source] GatewayError),

    /// Remote update rejected; the stale entry stays visible
    #[error("update failed: {0}")]
    UpdateFailed(#[source] GatewayError),

    /// Remote delete rejected; the entity stays visible
    #[error("delete failed: {0}")]
    DeleteFailed(#[source] GatewayError),

    /// Remote status change rejected
    #[error("status update failed: {0}")]
    StatusUpdateFailed(#[source] GatewayError),

    /// A standalone refetch of the remote partition failed
    #[error("refetch failed: {0}")]
    RefetchFailed(#[source] GatewayError),

    /// Login rejected or no token issued; carries the message to surface
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// Operation attempted without an active session
    #[error("not logged in")]
    NotLoggedIn,

    /// No project with this identity in the merged view
    #[error("unknown project {0}")]
    UnknownProject(RemoteId),

    /// No task with this identity in the merged view
    #[error("unknown task {0}")]
    UnknownTask(Identity),
}

impl StoreError {
    /// Whether this error came from local validation, before any network call
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::InvalidIdentifier(_))
    }
}
