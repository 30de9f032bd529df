//! Testing utilities for the Boardsync workspace
//!
//! Shared fixtures plus [`ScriptedGateway`], an in-memory mutation gateway:
//! by default it behaves like a small live remote store (assigning ids,
//! applying mutations, serving refetches from its state); tests can flip it
//! offline to fail every remote call, or script individual list-projects
//! replies with a release gate to control the order refetches resolve in.

#![allow(missing_docs)]

use async_trait::async_trait;
use boardsync_client::gateway::{
    CreateProjectArgs, CreateTaskArgs, CreatorRef, GatewayError, LoginReply, MutationGateway,
    ProjectRef, ProjectStatus, RemoteProject, RemoteTask, UpdateProjectArgs, UpdateTaskArgs,
};
use boardsync_model::RemoteId;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

/// Install a fmt subscriber once for the whole test binary.
pub fn init_tracing() {
    use once_cell::sync::OnceCell;
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Per-operation call counters, for asserting that local-path operations
/// issue zero network calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_projects: usize,
    pub list_project_tasks: usize,
    pub create_project: usize,
    pub update_project: usize,
    pub set_project_status: usize,
    pub delete_project: usize,
    pub create_task: usize,
    pub update_task: usize,
    pub delete_task: usize,
    pub login: usize,
}

impl CallCounts {
    /// Total calls across every operation
    #[must_use]
    pub fn total(&self) -> usize {
        self.list_projects
            + self.list_project_tasks
            + self.create_project
            + self.update_project
            + self.set_project_status
            + self.delete_project
            + self.create_task
            + self.update_task
            + self.delete_task
            + self.login
    }
}

struct GatewayState {
    projects: Vec<RemoteProject>,
    tasks: HashMap<i64, Vec<RemoteTask>>,
    next_id: i64,
    offline: bool,
    login_token: Option<String>,
    calls: CallCounts,
}

struct ScriptedProjects {
    reply: Vec<RemoteProject>,
    gate: Option<oneshot::Receiver<()>>,
}

/// In-memory mutation gateway for tests.
pub struct ScriptedGateway {
    state: Mutex<GatewayState>,
    project_scripts: Mutex<VecDeque<ScriptedProjects>>,
}

impl ScriptedGateway {
    /// Empty gateway with a working login
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GatewayState {
                projects: Vec::new(),
                tasks: HashMap::new(),
                next_id: 1,
                offline: false,
                login_token: Some("jwt-test-token".to_string()),
                calls: CallCounts::default(),
            }),
            project_scripts: Mutex::new(VecDeque::new()),
        }
    }

    /// Gateway seeded with projects and their tasks
    #[must_use]
    pub fn seeded(projects: Vec<RemoteProject>, tasks: HashMap<i64, Vec<RemoteTask>>) -> Self {
        let gateway = Self::new();
        {
            let mut state = gateway.state.lock();
            let max_seen = projects
                .iter()
                .map(|p| p.id)
                .chain(tasks.values().flatten().map(|t| t.id))
                .max()
                .unwrap_or(0);
            state.next_id = max_seen + 1;
            state.projects = projects;
            state.tasks = tasks;
        }
        gateway
    }

    /// Fail every subsequent remote call until turned back on
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Replace the token the login mutation hands out; `None` makes every
    /// login fail with a message and no token
    pub fn set_login_token(&self, token: Option<String>) {
        self.state.lock().login_token = token;
    }

    /// Script the next list-projects reply. The returned sender is a release
    /// gate: the reply does not resolve until the gate fires (or is
    /// dropped). Scripted replies are consumed in call order.
    pub fn push_projects_reply(&self, reply: Vec<RemoteProject>) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.project_scripts.lock().push_back(ScriptedProjects {
            reply,
            gate: Some(receiver),
        });
        sender
    }

    /// Snapshot of the call counters
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    /// Snapshot of the stored projects
    #[must_use]
    pub fn stored_projects(&self) -> Vec<RemoteProject> {
        self.state.lock().projects.clone()
    }

    /// Snapshot of one project's stored tasks
    #[must_use]
    pub fn stored_tasks(&self, project_id: i64) -> Vec<RemoteTask> {
        self.state
            .lock()
            .tasks
            .get(&project_id)
            .cloned()
            .unwrap_or_default()
    }

    fn offline_error(&self) -> Result<(), GatewayError> {
        if self.state.lock().offline {
            Err(GatewayError::Unreachable("scripted outage".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MutationGateway for ScriptedGateway {
    async fn list_projects(&self) -> Result<Vec<RemoteProject>, GatewayError> {
        self.state.lock().calls.list_projects += 1;
        self.offline_error()?;

        let scripted = self.project_scripts.lock().pop_front();
        match scripted {
            Some(mut scripted) => {
                if let Some(gate) = scripted.gate.take() {
                    // Sender dropped counts as released.
                    let _ = gate.await;
                }
                Ok(scripted.reply)
            }
            None => Ok(self.state.lock().projects.clone()),
        }
    }

    async fn list_project_tasks(
        &self,
        project_id: RemoteId,
    ) -> Result<Vec<RemoteTask>, GatewayError> {
        self.state.lock().calls.list_project_tasks += 1;
        self.offline_error()?;
        Ok(self
            .state
            .lock()
            .tasks
            .get(&project_id.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_project(
        &self,
        args: CreateProjectArgs,
    ) -> Result<RemoteProject, GatewayError> {
        let mut state = self.state.lock();
        state.calls.create_project += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        let id = state.next_id;
        state.next_id += 1;
        let project = RemoteProject {
            id,
            name: args.name,
            status: ProjectStatus::Pending,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        args: UpdateProjectArgs,
    ) -> Result<RemoteProject, GatewayError> {
        let mut state = self.state.lock();
        state.calls.update_project += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == args.project_id)
            .ok_or_else(|| GatewayError::Rejected(format!("no project {}", args.project_id)))?;
        project.name = args.name;
        Ok(project.clone())
    }

    async fn set_project_status(
        &self,
        project_id: RemoteId,
        status: ProjectStatus,
    ) -> Result<RemoteProject, GatewayError> {
        let mut state = self.state.lock();
        state.calls.set_project_status += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id.0)
            .ok_or_else(|| GatewayError::Rejected(format!("no project {project_id}")))?;
        project.status = status;
        Ok(project.clone())
    }

    async fn delete_project(&self, project_id: RemoteId) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.calls.delete_project += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        let before = state.projects.len();
        state.projects.retain(|p| p.id != project_id.0);
        if state.projects.len() == before {
            return Err(GatewayError::Rejected(format!("no project {project_id}")));
        }
        state.tasks.remove(&project_id.0);
        Ok(())
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<RemoteTask, GatewayError> {
        let mut state = self.state.lock();
        state.calls.create_task += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        if !state.projects.iter().any(|p| p.id == args.project_id) {
            return Err(GatewayError::Rejected(format!(
                "no project {}",
                args.project_id
            )));
        }
        let id = state.next_id;
        state.next_id += 1;
        let task = RemoteTask {
            id,
            name: args.name,
            description: args.description,
            date_due: args.date_due,
            date_completed: None,
            project: ProjectRef {
                id: args.project_id,
            },
            creator: Some(CreatorRef {
                id: 1,
                email: "dev@example.com".to_string(),
            }),
        };
        state.tasks.entry(args.project_id).or_default().push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, args: UpdateTaskArgs) -> Result<RemoteTask, GatewayError> {
        let mut state = self.state.lock();
        state.calls.update_task += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        let task = state
            .tasks
            .values_mut()
            .flatten()
            .find(|t| t.id == args.task_id)
            .ok_or_else(|| GatewayError::Rejected(format!("no task {}", args.task_id)))?;
        task.name = args.name;
        task.description = args.description;
        task.date_due = args.date_due;
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: RemoteId) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        state.calls.delete_task += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        let mut removed = false;
        for tasks in state.tasks.values_mut() {
            let before = tasks.len();
            tasks.retain(|t| t.id != task_id.0);
            removed |= tasks.len() != before;
        }
        if removed {
            Ok(())
        } else {
            Err(GatewayError::Rejected(format!("no task {task_id}")))
        }
    }

    async fn login(&self, email: &str, _password: &str) -> Result<LoginReply, GatewayError> {
        let mut state = self.state.lock();
        state.calls.login += 1;
        if state.offline {
            return Err(GatewayError::Unreachable("scripted outage".to_string()));
        }
        Ok(match &state.login_token {
            Some(token) => LoginReply {
                jwt_token: Some(token.clone()),
                message: format!("welcome {email}"),
            },
            None => LoginReply {
                jwt_token: None,
                message: "invalid credentials".to_string(),
            },
        })
    }
}

// ---- fixtures -------------------------------------------------------------

/// Project record fixture
#[must_use]
pub fn remote_project(id: i64, name: &str, completed: bool) -> RemoteProject {
    RemoteProject {
        id,
        name: name.to_string(),
        status: ProjectStatus::from_completed(completed),
    }
}

/// Task record fixture with a canonical wire due date
#[must_use]
pub fn remote_task(id: i64, project_id: i64, name: &str, date_due: &str) -> RemoteTask {
    RemoteTask {
        id,
        name: name.to_string(),
        description: format!("{name} description"),
        date_due: date_due.to_string(),
        date_completed: None,
        project: ProjectRef { id: project_id },
        creator: Some(CreatorRef {
            id: 1,
            email: "dev@example.com".to_string(),
        }),
    }
}
