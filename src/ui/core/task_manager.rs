use super::actions::Action;
use crate::backend::AdminBackend;
use crate::constants::SUCCESS_LOGGED_IN;
use crate::fetch::{self, Mutation, MutationError, ViewQuery};
use crate::views::ViewKind;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: std::time::Instant,
}

/// Runs backend calls off the UI loop and reports back as [`Action`]s.
///
/// Requests are never cancelled once issued, except on drop.
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    fn track(&mut self, description: String, handle: JoinHandle<()>) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        self.tasks.insert(
            task_id,
            BackgroundTask {
                id: task_id,
                handle,
                description,
                started_at: std::time::Instant::now(),
            },
        );
        task_id
    }

    /// Load a view; the result is tagged with `generation` so stale loads can be ignored
    pub fn spawn_load(&mut self, backend: Arc<dyn AdminBackend>, query: ViewQuery, generation: u64) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Loading {} (page {})", query.kind.title(), query.page.page());

        let handle = tokio::spawn(async move {
            let state = fetch::load_view(backend.as_ref(), &query).await;
            let _ = action_sender.send(Action::ViewLoaded {
                generation,
                kind: query.kind,
                state,
            });
        });

        self.track(description, handle)
    }

    /// Apply a create/update/delete/activate/assign
    pub fn spawn_mutation(
        &mut self,
        backend: Arc<dyn AdminBackend>,
        kind: ViewKind,
        parent_id: Option<String>,
        mutation: Mutation,
    ) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("{:?} on {}", mutation.action(), kind.title());

        let handle = tokio::spawn(async move {
            let action = match fetch::apply_mutation(backend.as_ref(), kind, parent_id.as_deref(), mutation).await {
                Ok(message) => Action::MutationSucceeded(message.to_string()),
                Err(MutationError::Invalid(message)) => Action::MutationFailed(message),
                Err(MutationError::Api(e)) => Action::MutationFailed(e.user_message()),
            };
            let _ = action_sender.send(action);
        });

        self.track(description, handle)
    }

    pub fn spawn_login(&mut self, backend: Arc<dyn AdminBackend>, username: String, password: String) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Logging in as {}", username);

        let handle = tokio::spawn(async move {
            let action = match backend.login(&username, &password).await {
                Ok(()) => {
                    log::info!("{} as {}", SUCCESS_LOGGED_IN, username);
                    Action::LoginSucceeded
                }
                Err(e) => Action::LoginFailed(e.user_message()),
            };
            let _ = action_sender.send(action);
        });

        self.track(description, handle)
    }

    /// Drop bookkeeping for finished tasks; results already went out on the channel
    pub fn cleanup_finished_tasks(&mut self) -> Vec<BackgroundTask> {
        let finished: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();

        finished.into_iter().filter_map(|id| self.tasks.remove(&id)).collect()
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    /// Get the number of active tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        // Cancel all tasks when the manager is dropped
        self.cancel_all_tasks();
    }
}
