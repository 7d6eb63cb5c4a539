//! The service bundle handed to page makers.

use std::path::PathBuf;
use std::sync::Arc;

use stackdash_core::{Broker, DashError, Resource, ResourceId};

use crate::logging::Logger;
use crate::module::{Discovery, ModuleService};
use crate::run::RunService;
use crate::task::TaskService;
use crate::workspace::WorkspaceService;

/// Every service, sharing one broker.
#[derive(Clone)]
pub struct Services {
    pub broker: Arc<Broker>,
    pub modules: Arc<ModuleService>,
    pub workspaces: Arc<WorkspaceService>,
    pub runs: Arc<RunService>,
    pub tasks: Arc<TaskService>,
    pub logger: Arc<Logger>,
}

impl Services {
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        let broker = Arc::new(Broker::new());
        let modules = Arc::new(ModuleService::new(workdir, Arc::clone(&broker)));
        let workspaces = Arc::new(WorkspaceService::new(
            Arc::clone(&modules),
            Arc::clone(&broker),
        ));
        let runs = Arc::new(RunService::new(
            Arc::clone(&workspaces),
            Arc::clone(&broker),
        ));
        let tasks = Arc::new(TaskService::new(Arc::clone(&broker)));
        let logger = Arc::new(Logger::new(Arc::clone(&broker)));
        Self {
            broker,
            modules,
            workspaces,
            runs,
            tasks,
            logger,
        }
    }

    /// Rediscover modules, then delete everything beneath the modules that
    /// disappeared.
    pub fn discover_modules(&self) -> Result<Discovery, DashError> {
        let discovery = self.modules.discover()?;
        for module in &discovery.removed {
            self.delete_descendants(module.id)?;
        }
        Ok(discovery)
    }

    fn delete_descendants(&self, ancestor: ResourceId) -> Result<(), DashError> {
        for task in self.tasks.list(Some(ancestor)) {
            self.tasks.delete(task.id())?;
        }
        for run in self.runs.list(Some(ancestor)) {
            self.runs.delete(run.id)?;
        }
        for ws in self.workspaces.list(Some(ancestor)) {
            self.workspaces.delete(ws.id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackdash_core::{ChangeType, Kind, Task};
    use std::fs;

    #[test]
    fn removed_module_cascades() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/main.tf"), "").unwrap();

        let svc = Services::new(dir.path());
        svc.discover_modules().unwrap();
        let module = svc.modules.get_by_path("a").unwrap();
        let ws = svc.workspaces.add(module.id, "default").unwrap();
        let run = svc.runs.create(ws.id).unwrap();
        svc.tasks.create(Task::new(["plan"]).with_run(&run));

        let rx = svc.broker.subscribe();
        fs::remove_dir_all(dir.path().join("a")).unwrap();
        let discovery = svc.discover_modules().unwrap();
        assert_eq!(discovery.removed.len(), 1);

        let deleted: Vec<Kind> = rx
            .try_iter()
            .filter(|e| e.change == ChangeType::Deleted)
            .map(|e| e.kind)
            .collect();
        // Module delete is published by discovery itself, before the cascade.
        assert_eq!(
            deleted,
            vec![Kind::Module, Kind::Task, Kind::Run, Kind::Workspace]
        );
        assert!(svc.workspaces.list(None).is_empty());
        assert!(svc.runs.list(None).is_empty());
        assert!(svc.tasks.list(None).is_empty());
    }
}
