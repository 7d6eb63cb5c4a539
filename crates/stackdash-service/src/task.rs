//! Task store and lifecycle.

use std::sync::Arc;

use stackdash_core::{Broker, DashError, ResourceId, Task, TaskStatus};

use crate::store::Store;

/// Owns every task and enforces its lifecycle:
/// `Pending -> Queued -> Running -> Exited | Errored`, with `Canceled`
/// reachable from any unfinished state.
pub struct TaskService {
    store: Store<Task>,
}

impl TaskService {
    #[must_use]
    pub fn new(broker: Arc<Broker>) -> Self {
        Self {
            store: Store::new(broker),
        }
    }

    /// Register a pending task.
    pub fn create(&self, task: Task) -> Task {
        self.store.add(task.clone());
        task
    }

    pub fn enqueue(&self, id: ResourceId) -> Result<Task, DashError> {
        self.transition(id, TaskStatus::Queued)
    }

    pub fn start(&self, id: ResourceId) -> Result<Task, DashError> {
        self.transition(id, TaskStatus::Running)
    }

    /// Finish a running task. A zero exit code means `Exited`, anything else
    /// `Errored`.
    pub fn finish(&self, id: ResourceId, exit_code: i32) -> Result<Task, DashError> {
        let to = if exit_code == 0 {
            TaskStatus::Exited
        } else {
            TaskStatus::Errored
        };
        self.store.update(id, |task| {
            check_transition(task, to)?;
            task.status = to;
            task.exit_code = Some(exit_code);
            Ok(())
        })
    }

    pub fn cancel(&self, id: ResourceId) -> Result<Task, DashError> {
        self.transition(id, TaskStatus::Canceled)
    }

    /// Append a line of output; subscribers receive an Updated event.
    pub fn append_output(&self, id: ResourceId, line: impl Into<String>) -> Result<Task, DashError> {
        let line = line.into();
        self.store.update(id, move |task| {
            task.output.write().push(line);
            Ok(())
        })
    }

    /// Number of running tasks.
    #[must_use]
    pub fn counter(&self) -> usize {
        self.store
            .list_by(|t| t.status == TaskStatus::Running)
            .len()
    }

    pub fn get(&self, id: ResourceId) -> Result<Task, DashError> {
        self.store.get(id)
    }

    #[must_use]
    pub fn list(&self, parent: Option<ResourceId>) -> Vec<Task> {
        self.store.list_under(parent)
    }

    pub fn delete(&self, id: ResourceId) -> Result<Task, DashError> {
        self.store.delete(id)
    }

    fn transition(&self, id: ResourceId, to: TaskStatus) -> Result<Task, DashError> {
        self.store.update(id, |task| {
            check_transition(task, to)?;
            task.status = to;
            Ok(())
        })
    }
}

fn check_transition(task: &Task, to: TaskStatus) -> Result<(), DashError> {
    if task.status.can_transition(to) {
        Ok(())
    } else {
        Err(DashError::InvalidState {
            id: task.id,
            from: task.status.to_string(),
            to: to.to_string(),
        })
    }
}
