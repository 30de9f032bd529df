//! Reconciliation store
//!
//! Holds the merged, order-preserving collection of projects and tasks:
//! the remote partition (authoritative, replaced wholesale on every refetch)
//! and the per-project local partitions (session-created tasks that were
//! never confirmed). Mutations route by origin: local entities are spliced
//! synchronously, remote entities go through the gateway and a refetch.
//!
//! All operations take `&self` over locked partitions, so concurrent
//! operations on the single UI thread interleave at await points. Locks are
//! never held across gateway calls; the last refetch to resolve wins the
//! remote partition. A refetch that resolves after the session was torn down
//! is discarded silently.

use crate::error::StoreError;
use crate::gateway::{
    CreateProjectArgs, CreateTaskArgs, GatewayError, MutationGateway, ProjectStatus, RemoteTask,
    UpdateProjectArgs, UpdateTaskArgs,
};
use crate::session::Session;
use boardsync_model::{
    CanonicalDate, DateFormatter, Identity, IdentityMinter, Project, ProjectDraft, ProjectPatch,
    RemoteId, Task, TaskDraft, TaskPatch,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Reconciliation behavior made explicit rather than left to call order.
#[derive(Debug, Clone, Copy)]
pub struct ReconcilePolicy {
    /// Revert the optimistic completion flip when the remote call fails
    pub revert_status_on_failure: bool,
    /// Drop a pending local draft once a matching remote counterpart is
    /// observed in a refetch
    pub dedupe_local_on_confirm: bool,
}

impl ReconcilePolicy {
    /// Corrected defaults: revert and dedupe
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With revert-on-failure
    #[inline]
    #[must_use]
    pub fn with_revert_status_on_failure(mut self, revert: bool) -> Self {
        self.revert_status_on_failure = revert;
        self
    }

    /// With dedupe-on-confirm
    #[inline]
    #[must_use]
    pub fn with_dedupe_local_on_confirm(mut self, dedupe: bool) -> Self {
        self.dedupe_local_on_confirm = dedupe;
        self
    }
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            revert_status_on_failure: true,
            dedupe_local_on_confirm: true,
        }
    }
}

/// What to do when the remote create path fails. Chosen per call site, not
/// globally: some views keep an offline draft, others reject outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFallback {
    /// Leave both partitions untouched and surface the failure; no identity
    /// is minted
    Reject,
    /// Mint a local id and append the draft to the local partition
    LocalDraft,
}

/// The central reconciliation store for one view session.
#[derive(Debug)]
pub struct ReconciliationStore<G> {
    gateway: G,
    session: Session,
    policy: ReconcilePolicy,
    formatter: DateFormatter,
    projects: RwLock<Vec<Project>>,
    minter: Mutex<IdentityMinter>,
}

impl<G: MutationGateway> ReconciliationStore<G> {
    /// Create a store over a gateway and session, with default policy and
    /// date formatter.
    #[must_use]
    pub fn new(gateway: G, session: Session) -> Self {
        Self {
            gateway,
            session,
            policy: ReconcilePolicy::default(),
            formatter: DateFormatter::default(),
            projects: RwLock::new(Vec::new()),
            minter: Mutex::new(IdentityMinter::new()),
        }
    }

    /// With an explicit reconciliation policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// With an explicit date formatter (offset configuration)
    #[inline]
    #[must_use]
    pub fn with_formatter(mut self, formatter: DateFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// The session this store operates under
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ---- reads -----------------------------------------------------------

    /// Snapshot of the merged project collection, in query order.
    ///
    /// # Errors
    /// - `StoreError::NotLoggedIn` without an active session
    pub async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        self.session.ensure_active()?;
        Ok(self.projects.read().await.clone())
    }

    /// Snapshot of one project's merged task sequence: remote entries first,
    /// then local in creation order. No deduplication is performed on read.
    ///
    /// # Errors
    /// - `StoreError::NotLoggedIn` without an active session
    /// - `StoreError::UnknownProject` when the project is not in the view
    pub async fn merged_tasks(&self, project: RemoteId) -> Result<Vec<Task>, StoreError> {
        self.session.ensure_active()?;
        let projects = self.projects.read().await;
        let entry = projects
            .iter()
            .find(|p| p.id == project)
            .ok_or(StoreError::UnknownProject(project))?;
        Ok(entry.tasks.merged().cloned().collect())
    }

    // ---- refetch ---------------------------------------------------------

    /// Refetch the project list, replacing the remote partition wholesale.
    ///
    /// # Errors
    /// - `StoreError::NotLoggedIn` without an active session
    /// - `StoreError::RefetchFailed` when the query fails
    pub async fn refresh_projects(&self) -> Result<(), StoreError> {
        self.session.ensure_active()?;
        self.fetch_projects_with(StoreError::RefetchFailed).await
    }

    /// Refetch one project's tasks, replacing its remote partition wholesale;
    /// the local partition is preserved verbatim (minus entries confirmed
    /// remote, when the policy dedupes).
    ///
    /// # Errors
    /// - `StoreError::NotLoggedIn` without an active session
    /// - `StoreError::RefetchFailed` when the query fails
    pub async fn refresh_tasks(&self, project: RemoteId) -> Result<(), StoreError> {
        self.session.ensure_active()?;
        self.fetch_tasks_with(project, StoreError::RefetchFailed)
            .await
    }

    // ---- project mutations ----------------------------------------------

    /// Create a project through the remote path and refetch.
    ///
    /// Projects have no local-pending state; a failed create leaves the view
    /// unchanged.
    ///
    /// # Errors
    /// - `StoreError::InvalidDate` before any network call
    /// - `StoreError::CreateFailed` when the mutation or refetch fails
    pub async fn create_project(&self, draft: ProjectDraft) -> Result<RemoteId, StoreError> {
        self.session.ensure_active()?;
        let due = self.formatter.format(&draft.date_due)?;
        tracing::info!(name = %draft.name, "creating project");

        let created = self
            .gateway
            .create_project(CreateProjectArgs {
                name: draft.name,
                description: draft.description,
                date_due: due.to_string(),
            })
            .await
            .map_err(|err| {
                tracing::error!(%err, "project create rejected");
                StoreError::CreateFailed(err)
            })?;

        self.fetch_projects_with(StoreError::CreateFailed).await?;
        Ok(RemoteId(created.id))
    }

    /// Update a project's fields through the remote path and refetch.
    ///
    /// # Errors
    /// - `StoreError::InvalidDate` before any network call
    /// - `StoreError::UpdateFailed` when the mutation or refetch fails; the
    ///   stale entry stays visible
    pub async fn update_project(
        &self,
        project: RemoteId,
        patch: ProjectPatch,
    ) -> Result<(), StoreError> {
        self.session.ensure_active()?;
        let due = self.formatter.format(&patch.date_due)?;
        self.ensure_known_project(project).await?;
        tracing::info!(%project, "updating project");

        self.gateway
            .update_project(UpdateProjectArgs {
                project_id: project.0,
                name: patch.name,
                description: patch.description,
                date_due: due.to_string(),
            })
            .await
            .map_err(|err| {
                tracing::error!(%project, %err, "project update rejected");
                StoreError::UpdateFailed(err)
            })?;

        self.fetch_projects_with(StoreError::UpdateFailed).await
    }

    /// Delete a project through the remote path and refetch.
    ///
    /// # Errors
    /// - `StoreError::DeleteFailed` when the mutation or refetch fails; the
    ///   project stays visible
    pub async fn delete_project(&self, project: RemoteId) -> Result<(), StoreError> {
        self.session.ensure_active()?;
        self.ensure_known_project(project).await?;
        tracing::info!(%project, "deleting project");

        self.gateway.delete_project(project).await.map_err(|err| {
            tracing::error!(%project, %err, "project delete rejected");
            StoreError::DeleteFailed(err)
        })?;

        self.fetch_projects_with(StoreError::DeleteFailed).await
    }

    /// Flip a project's completion flag: optimistic flip in the merged view,
    /// remote mutation, then refetch. On failure the flip is reverted when
    /// the policy says so.
    ///
    /// # Errors
    /// - `StoreError::UnknownProject` when the project is not in the view
    /// - `StoreError::StatusUpdateFailed` when the mutation or refetch fails
    pub async fn set_project_status(
        &self,
        project: RemoteId,
        completed: bool,
    ) -> Result<(), StoreError> {
        self.session.ensure_active()?;

        // Optimistic flip, remembering what to revert to.
        let previous = {
            let mut projects = self.projects.write().await;
            let entry = projects
                .iter_mut()
                .find(|p| p.id == project)
                .ok_or(StoreError::UnknownProject(project))?;
            std::mem::replace(&mut entry.completed, completed)
        };
        tracing::info!(%project, completed, "setting project status");

        let status = ProjectStatus::from_completed(completed);
        match self.gateway.set_project_status(project, status).await {
            Ok(_) => self.fetch_projects_with(StoreError::StatusUpdateFailed).await,
            Err(err) => {
                tracing::error!(%project, %err, "status change rejected");
                if self.policy.revert_status_on_failure {
                    let mut projects = self.projects.write().await;
                    if let Some(entry) = projects.iter_mut().find(|p| p.id == project) {
                        entry.completed = previous;
                    }
                }
                Err(StoreError::StatusUpdateFailed(err))
            }
        }
    }

    // ---- task mutations --------------------------------------------------

    /// Create a task: always attempts the remote path first, then refetches.
    /// On failure, `fallback` decides between rejecting (partitions
    /// untouched, no identity minted) and keeping a local draft.
    ///
    /// # Errors
    /// - `StoreError::InvalidDate` before any network call
    /// - `StoreError::UnknownProject` when the project is not in the view
    /// - `StoreError::CreateFailed` when rejected under `Reject`
    pub async fn create_task(
        &self,
        project: RemoteId,
        draft: TaskDraft,
        fallback: CreateFallback,
    ) -> Result<Identity, StoreError> {
        self.session.ensure_active()?;
        let due = self.formatter.format(&draft.date_due)?;
        self.ensure_known_project(project).await?;
        tracing::info!(%project, name = %draft.name, "creating task");

        let attempt = self
            .gateway
            .create_task(CreateTaskArgs {
                project_id: project.0,
                name: draft.name.clone(),
                description: draft.description.clone(),
                date_due: due.to_string(),
            })
            .await;

        match attempt {
            Ok(created) => {
                self.fetch_tasks_with(project, StoreError::CreateFailed)
                    .await?;
                Ok(Identity::Remote(RemoteId(created.id)))
            }
            Err(err) => match fallback {
                CreateFallback::Reject => {
                    tracing::error!(%project, %err, "task create rejected");
                    Err(StoreError::CreateFailed(err))
                }
                CreateFallback::LocalDraft => {
                    tracing::warn!(%project, %err, "task create rejected, keeping local draft");
                    let id = self.minter.lock().next_local();
                    let task = Task {
                        id: Identity::Local(id),
                        name: draft.name,
                        description: draft.description,
                        date_due: due,
                        date_completed: None,
                    };
                    let mut projects = self.projects.write().await;
                    let entry = projects
                        .iter_mut()
                        .find(|p| p.id == project)
                        .ok_or(StoreError::UnknownProject(project))?;
                    entry.tasks.push_local(task);
                    Ok(Identity::Local(id))
                }
            },
        }
    }

    /// Edit a task, routing by origin: local tasks are spliced in place
    /// synchronously with zero network calls; remote tasks go through the
    /// gateway and a refetch.
    ///
    /// # Errors
    /// - `StoreError::InvalidDate` before either path is taken
    /// - `StoreError::UnknownProject` / `StoreError::UnknownTask`
    /// - `StoreError::UpdateFailed` on the remote path; the stale entry stays
    ///   visible
    pub async fn edit_task(
        &self,
        project: RemoteId,
        id: Identity,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        self.session.ensure_active()?;
        let due = self.formatter.format(&patch.date_due)?;

        match id {
            Identity::Local(local) => {
                let mut projects = self.projects.write().await;
                let entry = projects
                    .iter_mut()
                    .find(|p| p.id == project)
                    .ok_or(StoreError::UnknownProject(project))?;
                let task = entry
                    .tasks
                    .local_mut(local)
                    .ok_or(StoreError::UnknownTask(id))?;
                task.name = patch.name;
                task.description = patch.description;
                task.date_due = due;
                tracing::debug!(%project, %id, "local task edited in place");
                Ok(())
            }
            Identity::Remote(remote) => {
                tracing::info!(%project, %id, "updating task");
                self.gateway
                    .update_task(UpdateTaskArgs {
                        task_id: remote.0,
                        name: patch.name,
                        description: patch.description,
                        date_due: due.to_string(),
                    })
                    .await
                    .map_err(|err| {
                        tracing::error!(%project, %id, %err, "task update rejected");
                        StoreError::UpdateFailed(err)
                    })?;
                self.fetch_tasks_with(project, StoreError::UpdateFailed)
                    .await
            }
        }
    }

    /// Delete a task, routing by origin: local tasks are removed immediately
    /// with zero network calls; remote tasks go through the gateway and a
    /// refetch.
    ///
    /// # Errors
    /// - `StoreError::UnknownProject` / `StoreError::UnknownTask`
    /// - `StoreError::DeleteFailed` on the remote path; the entity stays
    ///   visible
    pub async fn delete_task(&self, project: RemoteId, id: Identity) -> Result<(), StoreError> {
        self.session.ensure_active()?;

        match id {
            Identity::Local(local) => {
                let mut projects = self.projects.write().await;
                let entry = projects
                    .iter_mut()
                    .find(|p| p.id == project)
                    .ok_or(StoreError::UnknownProject(project))?;
                if !entry.tasks.remove_local(local) {
                    return Err(StoreError::UnknownTask(id));
                }
                tracing::debug!(%project, %id, "local task removed");
                Ok(())
            }
            Identity::Remote(remote) => {
                tracing::info!(%project, %id, "deleting task");
                self.gateway.delete_task(remote).await.map_err(|err| {
                    tracing::error!(%project, %id, %err, "task delete rejected");
                    StoreError::DeleteFailed(err)
                })?;
                self.fetch_tasks_with(project, StoreError::DeleteFailed)
                    .await
            }
        }
    }

    // ---- internals -------------------------------------------------------

    async fn ensure_known_project(&self, project: RemoteId) -> Result<(), StoreError> {
        let projects = self.projects.read().await;
        if projects.iter().any(|p| p.id == project) {
            Ok(())
        } else {
            Err(StoreError::UnknownProject(project))
        }
    }

    /// Refetch the project list and replace the remote partition, carrying
    /// each surviving project's task set over. A resolution that lands after
    /// session teardown is discarded.
    async fn fetch_projects_with(
        &self,
        wrap: impl Fn(GatewayError) -> StoreError,
    ) -> Result<(), StoreError> {
        let fetched = self.gateway.list_projects().await.map_err(wrap)?;
        if !self.session.is_active() {
            tracing::debug!("project refetch resolved after teardown, discarded");
            return Ok(());
        }

        let mut projects = self.projects.write().await;
        let mut carried: HashMap<i64, Project> = std::mem::take(&mut *projects)
            .into_iter()
            .map(|p| (p.id.0, p))
            .collect();
        *projects = fetched
            .into_iter()
            .map(|wire| {
                let tasks = carried
                    .remove(&wire.id)
                    .map(|p| p.tasks)
                    .unwrap_or_default();
                Project {
                    id: RemoteId(wire.id),
                    name: wire.name,
                    completed: wire.status.is_completed(),
                    tasks,
                }
            })
            .collect();
        Ok(())
    }

    /// Refetch one project's tasks and replace its remote partition. The
    /// local partition is preserved, then deduped against newly confirmed
    /// counterparts when the policy says so.
    async fn fetch_tasks_with(
        &self,
        project: RemoteId,
        wrap: impl Fn(GatewayError) -> StoreError,
    ) -> Result<(), StoreError> {
        let fetched = self
            .gateway
            .list_project_tasks(project)
            .await
            .map_err(wrap)?;
        let tasks = fetched
            .into_iter()
            .map(task_from_wire)
            .collect::<Result<Vec<_>, _>>()?;

        if !self.session.is_active() {
            tracing::debug!(%project, "task refetch resolved after teardown, discarded");
            return Ok(());
        }

        let mut projects = self.projects.write().await;
        let Some(entry) = projects.iter_mut().find(|p| p.id == project) else {
            // Project vanished from a concurrent refetch; nothing to apply.
            return Ok(());
        };
        entry.tasks.replace_remote(tasks);
        if self.policy.dedupe_local_on_confirm {
            entry.tasks.dedupe_confirmed();
        }
        Ok(())
    }
}

fn task_from_wire(wire: RemoteTask) -> Result<Task, StoreError> {
    let date_due = CanonicalDate::from_wire(&wire.date_due)?;
    let date_completed = wire
        .date_completed
        .as_deref()
        .map(CanonicalDate::from_wire)
        .transpose()?;
    Ok(Task {
        id: Identity::Remote(RemoteId(wire.id)),
        name: wire.name,
        description: wire.description,
        date_due,
        date_completed,
    })
}
