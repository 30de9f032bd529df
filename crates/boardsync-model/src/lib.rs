//! Boardsync Model - the leaf vocabulary of the reconciliation layer
//!
//! Defines the types shared by every other crate:
//! - Entity identities (remote-assigned vs. session-local)
//! - Projects, tasks, and the dual-partition task set
//! - Canonical date formatting for the remote store's write path
//! - Derived display status (pending / due / completed)
//!
//! # Example
//!
//! ```rust,ignore
//! use boardsync_model::{DateFormatter, DerivedStatus, derive_project_status};
//!
//! let formatter = DateFormatter::default();
//! let due = formatter.format("2025-12-31T10:30")?;
//! assert_eq!(due.to_string(), "2025-12-31 10:30:00.000000 +0300");
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod date;
pub mod entity;
pub mod error;
pub mod identity;
pub mod status;

// Re-exports for convenience
pub use date::{CanonicalDate, DateFormatter, DEFAULT_OFFSET};
pub use entity::{Project, ProjectDraft, ProjectPatch, Task, TaskDraft, TaskPatch, TaskSet};
pub use error::{DateError, IdentityError};
pub use identity::{Identity, IdentityMinter, LocalId, Origin, RemoteId};
pub use status::{derive_project_status, derive_task_status, far_future, DerivedStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
