//! Entity identity for local and remote entities
//!
//! Remote entities carry a server-assigned id; entities created during the
//! current session carry a clock-derived local id until the remote store
//! confirms them. The two kinds are never comparable as equal, even when the
//! numeric values coincide.

use crate::error::IdentityError;
use chrono::Utc;

/// Server-assigned identifier, positive once persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemoteId(pub i64);

impl RemoteId {
    /// Parse an identifier supplied via navigation (a route parameter).
    ///
    /// Only positive integers are accepted; anything else is rejected before
    /// any query is attempted.
    ///
    /// # Errors
    /// - `IdentityError::InvalidIdentifier` for non-integer or non-positive input
    pub fn parse_route(raw: &str) -> Result<Self, IdentityError> {
        let id: i64 = raw
            .trim()
            .parse()
            .map_err(|_| IdentityError::InvalidIdentifier(raw.to_string()))?;
        if id <= 0 {
            return Err(IdentityError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(id))
    }
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-scoped identifier for entities not yet confirmed remotely.
///
/// Derived from a high-resolution clock reading; unique within the session
/// only. A local id is superseded by a server id on confirmation, never
/// promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalId(pub u64);

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local:{}", self.0)
    }
}

/// Origin tag distinguishing confirmed entities from session-local ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Confirmed by the remote store
    Remote,
    /// Created during this session, not (yet) persisted
    Local,
}

/// Identity of an entity in the merged view.
///
/// Equality requires both the origin and the numeric value to match: a local
/// id and a remote id are never equal, even if numerically coincident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Server-assigned identity
    Remote(RemoteId),
    /// Clock-derived session identity
    Local(LocalId),
}

impl Identity {
    /// Origin tag of this identity
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Origin {
        match self {
            Self::Remote(_) => Origin::Remote,
            Self::Local(_) => Origin::Local,
        }
    }

    /// Whether this identity is session-local
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// The server-assigned id, if confirmed
    #[inline]
    #[must_use]
    pub fn as_remote(&self) -> Option<RemoteId> {
        match self {
            Self::Remote(id) => Some(*id),
            Self::Local(_) => None,
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(id) => write!(f, "{id}"),
            Self::Local(id) => write!(f, "{id}"),
        }
    }
}

impl From<RemoteId> for Identity {
    fn from(id: RemoteId) -> Self {
        Self::Remote(id)
    }
}

impl From<LocalId> for Identity {
    fn from(id: LocalId) -> Self {
        Self::Local(id)
    }
}

/// Mints local identities for the current session.
///
/// Reads the wall clock at microsecond resolution and bumps past the last
/// issued value when the clock has not advanced, so ids are unique and
/// creation-ordered within the session.
#[derive(Debug, Default)]
pub struct IdentityMinter {
    last: u64,
}

impl IdentityMinter {
    /// Create a fresh minter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next local id
    pub fn next_local(&mut self) -> LocalId {
        let now = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
        self.last = now.max(self.last + 1);
        LocalId(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_and_remote_never_equal() {
        let local = Identity::Local(LocalId(42));
        let remote = Identity::Remote(RemoteId(42));
        assert_ne!(local, remote);
        assert_eq!(local.origin(), Origin::Local);
        assert_eq!(remote.origin(), Origin::Remote);
    }

    #[test]
    fn minted_ids_are_strictly_increasing() {
        let mut minter = IdentityMinter::new();
        let a = minter.next_local();
        let b = minter.next_local();
        let c = minter.next_local();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn route_parsing_accepts_positive_integers() {
        assert_eq!(RemoteId::parse_route("7"), Ok(RemoteId(7)));
        assert_eq!(RemoteId::parse_route(" 12 "), Ok(RemoteId(12)));
    }

    #[test]
    fn route_parsing_rejects_bad_input() {
        for raw in ["0", "-3", "abc", "3.5", "", "1e3"] {
            assert!(RemoteId::parse_route(raw).is_err(), "accepted {raw:?}");
        }
    }
}
