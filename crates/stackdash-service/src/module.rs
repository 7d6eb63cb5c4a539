//! Module discovery.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stackdash_core::{Broker, DashError, Module, ResourceId};

use crate::store::Store;

/// File extension marking a directory as a module.
const MODULE_FILE_EXT: &str = "tf";

/// Outcome of a discovery pass.
#[derive(Debug, Default, Clone)]
pub struct Discovery {
    pub added: Vec<Module>,
    pub removed: Vec<Module>,
}

/// Tracks the modules found beneath the working directory.
pub struct ModuleService {
    workdir: PathBuf,
    store: Store<Module>,
}

impl ModuleService {
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>, broker: Arc<Broker>) -> Self {
        Self {
            workdir: workdir.into(),
            store: Store::new(broker),
        }
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Rescan the working directory, adding new modules and removing those
    /// whose directory no longer holds configuration.
    pub fn discover(&self) -> Result<Discovery, DashError> {
        let mut found = BTreeSet::new();
        scan(&self.workdir, &self.workdir, &mut found)?;

        let mut discovery = Discovery::default();
        for module in self.store.list() {
            if !found.remove(&module.path) {
                discovery.removed.push(self.store.delete(module.id)?);
            }
        }
        for path in found {
            let module = Module::new(path);
            self.store.add(module.clone());
            discovery.added.push(module);
        }
        tracing::info!(
            added = discovery.added.len(),
            removed = discovery.removed.len(),
            "discovered modules"
        );
        Ok(discovery)
    }

    /// Register a module directly, bypassing discovery.
    pub fn add(&self, module: Module) {
        self.store.add(module);
    }

    pub fn get(&self, id: ResourceId) -> Result<Module, DashError> {
        self.store.get(id)
    }

    #[must_use]
    pub fn get_by_path(&self, path: &str) -> Option<Module> {
        self.store.list_by(|m| m.path == path).into_iter().next()
    }

    #[must_use]
    pub fn list(&self) -> Vec<Module> {
        self.store.list()
    }
}

fn scan(root: &Path, dir: &Path, found: &mut BTreeSet<String>) -> Result<(), DashError> {
    let mut is_module = false;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            scan(root, &path, found)?;
        } else if path.extension().is_some_and(|ext| ext == MODULE_FILE_EXT) {
            is_module = true;
        }
    }
    if is_module {
        found.insert(relative_path(root, dir));
    }
    Ok(())
}

fn relative_path(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    if rel.as_os_str().is_empty() {
        return ".".to_string();
    }
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
