//! Mutation gateway - the remote store behind a trait
//!
//! Transport details (GraphQL, HTTP, token headers) live behind this seam.
//! The reconciliation store only sees the request/response contract: queries
//! return ordered sequences of wire records, mutations confirm or fail, and
//! on success the caller refetches authoritative state.

use async_trait::async_trait;
use boardsync_model::RemoteId;
use serde::{Deserialize, Serialize};

/// A remote call was rejected or never reached the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The remote store rejected the call
    #[error("remote store rejected the call: {0}")]
    Rejected(String),

    /// The remote store was unreachable
    #[error("remote store unreachable: {0}")]
    Unreachable(String),
}

/// Remote project status as stored server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Not yet completed
    Pending,
    /// Marked completed
    Completed,
}

impl ProjectStatus {
    /// Status corresponding to a completion flag
    #[inline]
    #[must_use]
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    /// Whether this status means completed
    #[inline]
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Project record as returned by the list-projects query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProject {
    /// Server-assigned id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Stored status
    pub status: ProjectStatus,
}

/// Owning-project reference embedded in a task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Server-assigned project id
    pub id: i64,
}

/// Creator reference embedded in a task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRef {
    /// Server-assigned user id
    pub id: i64,
    /// Creator email
    pub email: String,
}

/// Task record as returned by the list-tasks query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    /// Server-assigned id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Due date in canonical wire form
    pub date_due: String,
    /// Completion stamp in canonical wire form, if completed
    #[serde(default)]
    pub date_completed: Option<String>,
    /// Owning project
    pub project: ProjectRef,
    /// Creating user, when the query includes it
    #[serde(default)]
    pub creator: Option<CreatorRef>,
}

/// Arguments for the create-project mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectArgs {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Due date in canonical wire form
    pub date_due: String,
}

/// Arguments for the update-project mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectArgs {
    /// Target project id
    pub project_id: i64,
    /// New display name
    pub name: String,
    /// New description
    pub description: String,
    /// Due date in canonical wire form
    pub date_due: String,
}

/// Arguments for the create-task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskArgs {
    /// Owning project id
    pub project_id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Due date in canonical wire form
    pub date_due: String,
}

/// Arguments for the update-task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskArgs {
    /// Target task id
    pub task_id: i64,
    /// New display name
    pub name: String,
    /// New description
    pub description: String,
    /// Due date in canonical wire form
    pub date_due: String,
}

/// Reply from the login mutation. A missing token means the login failed and
/// the message is surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    /// Bearer token on success
    #[serde(default)]
    pub jwt_token: Option<String>,
    /// Human-readable outcome message
    pub message: String,
}

/// The remote store's request/response contract.
///
/// Implementations own transport and authentication headers. Every method is
/// a single round trip; no retries are performed here.
#[async_trait]
pub trait MutationGateway: Send + Sync {
    /// List all projects, in server order.
    async fn list_projects(&self) -> Result<Vec<RemoteProject>, GatewayError>;

    /// List the tasks of one project, in server order.
    async fn list_project_tasks(
        &self,
        project_id: RemoteId,
    ) -> Result<Vec<RemoteTask>, GatewayError>;

    /// Create a project; returns the record with its assigned id.
    async fn create_project(
        &self,
        args: CreateProjectArgs,
    ) -> Result<RemoteProject, GatewayError>;

    /// Update a project's fields.
    async fn update_project(
        &self,
        args: UpdateProjectArgs,
    ) -> Result<RemoteProject, GatewayError>;

    /// Set a project's stored status.
    async fn set_project_status(
        &self,
        project_id: RemoteId,
        status: ProjectStatus,
    ) -> Result<RemoteProject, GatewayError>;

    /// Delete a project.
    async fn delete_project(&self, project_id: RemoteId) -> Result<(), GatewayError>;

    /// Create a task scoped to a project; returns the record with its
    /// assigned id.
    async fn create_task(&self, args: CreateTaskArgs) -> Result<RemoteTask, GatewayError>;

    /// Update a task's fields.
    async fn update_task(&self, args: UpdateTaskArgs) -> Result<RemoteTask, GatewayError>;

    /// Delete a task.
    async fn delete_task(&self, task_id: RemoteId) -> Result<(), GatewayError>;

    /// Exchange credentials for a token.
    async fn login(&self, email: &str, password: &str) -> Result<LoginReply, GatewayError>;
}

// A shared gateway handle is itself a gateway, so one transport can serve
// both the session login and the store.
#[async_trait]
impl<G: MutationGateway + ?Sized> MutationGateway for std::sync::Arc<G> {
    async fn list_projects(&self) -> Result<Vec<RemoteProject>, GatewayError> {
        (**self).list_projects().await
    }

    async fn list_project_tasks(
        &self,
        project_id: RemoteId,
    ) -> Result<Vec<RemoteTask>, GatewayError> {
        (**self).list_project_tasks(project_id).await
    }

    async fn create_project(
        &self,
        args: CreateProjectArgs,
    ) -> Result<RemoteProject, GatewayError> {
        (**self).create_project(args).await
    }

    async fn update_project(
        &self,
        args: UpdateProjectArgs,
    ) -> Result<RemoteProject, GatewayError> {
        (**self).update_project(args).await
    }

    async fn set_project_status(
        &self,
        project_id: RemoteId,
        status: ProjectStatus,
    ) -> Result<RemoteProject, GatewayError> {
        (**self).set_project_status(project_id, status).await
    }

    async fn delete_project(&self, project_id: RemoteId) -> Result<(), GatewayError> {
        (**self).delete_project(project_id).await
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<RemoteTask, GatewayError> {
        (**self).create_task(args).await
    }

    async fn update_task(&self, args: UpdateTaskArgs) -> Result<RemoteTask, GatewayError> {
        (**self).update_task(args).await
    }

    async fn delete_task(&self, task_id: RemoteId) -> Result<(), GatewayError> {
        (**self).delete_task(task_id).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginReply, GatewayError> {
        (**self).login(email, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_record_deserializes_from_query_shape() {
        let raw = r#"{
            "id": 3,
            "name": "write docs",
            "description": "draft the handbook",
            "dateDue": "2025-12-31 10:30:00.000000 +0300",
            "dateCompleted": null,
            "project": { "id": 1 },
            "creator": { "id": 9, "email": "dev@example.com" }
        }"#;
        let task: RemoteTask = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, 3);
        assert_eq!(task.project.id, 1);
        assert_eq!(task.creator.unwrap().email, "dev@example.com");
        assert!(task.date_completed.is_none());
    }

    #[test]
    fn project_status_uses_screaming_case_on_the_wire() {
        let raw = r#"{ "id": 1, "name": "p", "status": "COMPLETED" }"#;
        let project: RemoteProject = serde_json::from_str(raw).unwrap();
        assert!(project.status.is_completed());
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }

    #[test]
    fn login_reply_token_is_optional() {
        let raw = r#"{ "message": "bad credentials" }"#;
        let reply: LoginReply = serde_json::from_str(raw).unwrap();
        assert!(reply.jwt_token.is_none());
        assert_eq!(reply.message, "bad credentials");
    }
}
