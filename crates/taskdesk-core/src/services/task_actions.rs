//! Task mutations. State only changes through the refetch that follows a
//! confirmed mutation; nothing is applied optimistically.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{NewTask, TaskPatch};
use crate::error::ClientError;
use crate::ports::TaskApi;
use crate::validation;

use super::{SessionStore, TaskQueryController};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    Create,
    Update,
    Toggle,
    Delete,
}

/// Create/update/toggle/delete with per-task busy tracking.
#[derive(Clone)]
pub struct TaskActions {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn TaskApi>,
    session: SessionStore,
    list: TaskQueryController,
    in_flight: Mutex<InFlightCounts>,
}

/// Running calls per `(action, task id)`. Overlapping calls on the same key
/// are counted, so the first to finish does not clear the others.
type InFlightCounts = HashMap<(TaskAction, String), usize>;

/// Marks an action busy for as long as it lives.
struct InFlight<'a> {
    counts: &'a Mutex<InFlightCounts>,
    key: (TaskAction, String),
}

impl<'a> InFlight<'a> {
    fn start(counts: &'a Mutex<InFlightCounts>, action: TaskAction, id: &str) -> Self {
        let key = (action, id.to_string());
        *counts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key.clone())
            .or_insert(0) += 1;
        Self { counts, key }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(count) = counts.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                counts.remove(&self.key);
            }
        }
    }
}

impl TaskActions {
    pub fn new(api: Arc<dyn TaskApi>, session: SessionStore, list: TaskQueryController) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                session,
                list,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Whether `action` is currently running for task `id`
    /// (use `""` for [`TaskAction::Create`]).
    pub fn is_pending(&self, action: TaskAction, id: &str) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&(action, id.to_string()))
    }

    pub async fn create(&self, task: NewTask) -> Result<(), ClientError> {
        validation::validate_new_task(&task)?;

        let task = NewTask {
            title: task.title.trim().to_string(),
            description: task.description.filter(|d| !d.is_empty()),
            ..task
        };

        self.run(TaskAction::Create, "", self.inner.api.create(&task))
            .await
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<(), ClientError> {
        validation::validate_patch(&patch)?;

        let patch = TaskPatch {
            title: patch.title.map(|t| t.trim().to_string()),
            ..patch
        };

        self.run(TaskAction::Update, id, self.inner.api.update(id, &patch))
            .await
    }

    pub async fn toggle(&self, id: &str) -> Result<(), ClientError> {
        self.run(TaskAction::Toggle, id, self.inner.api.toggle(id))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.run(TaskAction::Delete, id, self.inner.api.delete(id))
            .await
    }

    async fn run(
        &self,
        action: TaskAction,
        id: &str,
        request: impl Future<Output = Result<(), ClientError>>,
    ) -> Result<(), ClientError> {
        let result = {
            let _busy = InFlight::start(&self.inner.in_flight, action, id);
            request.await
        };

        if let Err(e) = result {
            tracing::warn!(?action, task_id = %id, error = %e, "Task action failed");
            return Err(self.inner.session.check_error(e).await);
        }

        tracing::info!(?action, task_id = %id, "Task action succeeded");

        if let Err(e) = self.inner.list.fetch_page().await {
            tracing::warn!(error = %e, "Refreshing task list after action failed");
        }
        Ok(())
    }
}
