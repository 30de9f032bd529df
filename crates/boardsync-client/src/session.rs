//! Session context
//!
//! An explicit session object with a defined lifecycle: initialized on a
//! successful login, torn down on logout. Store operations hold a clone of
//! the handle and check it before touching the partitions; once torn down,
//! in-flight remote resolutions are discarded instead of being applied.
//!
//! Token expiry is not validated here; the session only tracks whether the
//! user logged in during this view session.

use crate::error::StoreError;
use crate::gateway::MutationGateway;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug)]
enum SessionState {
    Anonymous,
    Authenticated { token: String },
}

/// Shared handle to the view session.
///
/// Cheap to clone; all clones observe the same lifecycle.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    /// A fresh, anonymous session
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::Anonymous)),
        }
    }

    /// Exchange credentials for a token and activate the session.
    ///
    /// A reply without a token is a failure; its message is surfaced to the
    /// user via [`StoreError::LoginFailed`].
    ///
    /// # Errors
    /// - `StoreError::LoginFailed` when the gateway rejects the call or the
    ///   reply carries no token
    pub async fn login<G: MutationGateway>(
        &self,
        gateway: &G,
        email: &str,
        password: &str,
    ) -> Result<(), StoreError> {
        let reply = gateway
            .login(email, password)
            .await
            .map_err(|err| StoreError::LoginFailed(err.to_string()))?;

        match reply.jwt_token {
            Some(token) => {
                tracing::info!(email, "session activated");
                *self.inner.write() = SessionState::Authenticated { token };
                Ok(())
            }
            None => {
                tracing::warn!(email, message = %reply.message, "login rejected");
                Err(StoreError::LoginFailed(reply.message))
            }
        }
    }

    /// Tear the session down. Idempotent.
    pub fn logout(&self) {
        tracing::info!("session torn down");
        *self.inner.write() = SessionState::Anonymous;
    }

    /// Whether the session is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(*self.inner.read(), SessionState::Authenticated { .. })
    }

    /// The bearer token, while active
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match &*self.inner.read() {
            SessionState::Authenticated { token } => Some(token.clone()),
            SessionState::Anonymous => None,
        }
    }

    /// Fail with [`StoreError::NotLoggedIn`] unless active
    pub(crate) fn ensure_active(&self) -> Result<(), StoreError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StoreError::NotLoggedIn)
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
