//! Boardsync Client - reconciliation between local drafts and the remote store
//!
//! The reconciliation layer of the tracking client:
//! - Merges remote-confirmed entities with session-local pending ones
//! - Routes create/edit/delete by entity origin
//! - Confirms remote mutations with a wholesale refetch (last writer wins)
//! - Gates every operation on an explicit session context
//!
//! # Example
//!
//! ```rust,ignore
//! use boardsync_client::{CreateFallback, ReconciliationStore, Session};
//!
//! # async fn example(gateway: impl boardsync_client::MutationGateway) -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new();
//! session.login(&gateway, "dev@example.com", "hunter42").await?;
//!
//! let store = ReconciliationStore::new(gateway, session);
//! store.refresh_projects().await?;
//! for project in store.projects().await? {
//!     println!("{}", project.name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod gateway;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use error::StoreError;
pub use gateway::{
    CreateProjectArgs, CreateTaskArgs, CreatorRef, GatewayError, LoginReply, MutationGateway,
    ProjectRef, ProjectStatus, RemoteProject, RemoteTask, UpdateProjectArgs, UpdateTaskArgs,
};
pub use session::Session;
pub use store::{CreateFallback, ReconcilePolicy, ReconciliationStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the reconciliation layer
    pub use crate::{
        CreateFallback, GatewayError, MutationGateway, ReconcilePolicy, ReconciliationStore,
        Session, StoreError,
    };
    pub use boardsync_model::{
        derive_project_status, derive_task_status, DerivedStatus, Identity, Project, RemoteId,
        Task, TaskDraft, TaskPatch,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
