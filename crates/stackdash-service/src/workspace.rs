//! Workspace store.

use std::sync::Arc;

use stackdash_core::{Broker, DashError, ResourceId, Workspace};

use crate::module::ModuleService;
use crate::store::Store;

pub struct WorkspaceService {
    modules: Arc<ModuleService>,
    store: Store<Workspace>,
}

impl WorkspaceService {
    #[must_use]
    pub fn new(modules: Arc<ModuleService>, broker: Arc<Broker>) -> Self {
        Self {
            modules,
            store: Store::new(broker),
        }
    }

    /// Add a workspace to a module. The first workspace of a module becomes
    /// its current workspace.
    pub fn add(&self, module: ResourceId, name: &str) -> Result<Workspace, DashError> {
        let module = self.modules.get(module)?;
        let mut ws = Workspace::new(&module, name);
        ws.current = self.store.list_under(Some(module.id)).is_empty();
        self.store.add(ws.clone());
        Ok(ws)
    }

    /// Make `id` the current workspace of its module.
    pub fn set_current(&self, id: ResourceId) -> Result<Workspace, DashError> {
        let target = self.store.get(id)?;
        for other in self.store.list_under(Some(target.module)) {
            if other.current && other.id != id {
                self.store.update(other.id, |w| {
                    w.current = false;
                    Ok(())
                })?;
            }
        }
        self.store.update(id, |w| {
            w.current = true;
            Ok(())
        })
    }

    /// The module's current workspace, if it has any.
    #[must_use]
    pub fn current(&self, module: ResourceId) -> Option<Workspace> {
        self.store
            .list_under(Some(module))
            .into_iter()
            .find(|w| w.current)
    }

    pub fn get(&self, id: ResourceId) -> Result<Workspace, DashError> {
        self.store.get(id)
    }

    /// Workspaces under `parent`, or all of them.
    #[must_use]
    pub fn list(&self, parent: Option<ResourceId>) -> Vec<Workspace> {
        self.store.list_under(parent)
    }

    pub fn delete(&self, id: ResourceId) -> Result<Workspace, DashError> {
        self.store.delete(id)
    }
}
