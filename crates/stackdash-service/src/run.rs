//! Run store.

use std::sync::Arc;

use stackdash_core::{Broker, Changes, DashError, ResourceId, Run, RunStatus};

use crate::store::Store;
use crate::workspace::WorkspaceService;

pub struct RunService {
    workspaces: Arc<WorkspaceService>,
    store: Store<Run>,
}

impl RunService {
    #[must_use]
    pub fn new(workspaces: Arc<WorkspaceService>, broker: Arc<Broker>) -> Self {
        Self {
            workspaces,
            store: Store::new(broker),
        }
    }

    /// Create a pending run for a workspace.
    pub fn create(&self, workspace: ResourceId) -> Result<Run, DashError> {
        let ws = self.workspaces.get(workspace)?;
        let run = Run::new(&ws);
        self.store.add(run.clone());
        Ok(run)
    }

    /// Record a new status, and the change summary once one is known.
    pub fn set_status(
        &self,
        id: ResourceId,
        status: RunStatus,
        changes: Option<Changes>,
    ) -> Result<Run, DashError> {
        self.store.update(id, |run| {
            if run.status.is_finished() {
                return Err(DashError::InvalidState {
                    id,
                    from: run.status.to_string(),
                    to: status.to_string(),
                });
            }
            run.status = status;
            if changes.is_some() {
                run.changes = changes;
            }
            Ok(())
        })
    }

    pub fn get(&self, id: ResourceId) -> Result<Run, DashError> {
        self.store.get(id)
    }

    #[must_use]
    pub fn list(&self, parent: Option<ResourceId>) -> Vec<Run> {
        self.store.list_under(parent)
    }

    pub fn delete(&self, id: ResourceId) -> Result<Run, DashError> {
        self.store.delete(id)
    }
}
