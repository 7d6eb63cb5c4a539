//! The resource pages: one list per resource kind plus the run, task and log
//! detail pages.

mod list;
mod log;
mod log_list;
mod module_list;
mod run;
mod run_list;
mod task;
mod task_list;
mod workspace_list;

pub use list::{ListAction, ListModel};
pub use log::LogModel;
pub use run::RunModel;
pub use task::TaskModel;

use stackdash_core::{DashError, Kind, ResourceId, ID_ENCODED_MAX_LEN};
use stackdash_service::Services;

use crate::cache::Cache;
use crate::columns::{truncate_left, Column};
use crate::page::PageKind;
use crate::table::{RenderedRow, TableItem};

// Id columns leave one cell for the gutter.
const ID_WIDTH: u16 = ID_ENCODED_MAX_LEN + 1;

pub const MODULE: Column = Column::flex("module", "MODULE", 3).truncate_with(truncate_left);
pub const WORKSPACE: Column = Column::flex("workspace", "WORKSPACE", 2);
pub const RUN: Column = Column::fixed("run", "RUN", ID_WIDTH);
pub const TASK: Column = Column::fixed("task", "TASK", ID_WIDTH);
pub const ID: Column = Column::fixed("id", "ID", ID_WIDTH);
pub const STATUS: Column = Column::fixed("status", "STATUS", 11);
pub const CHANGES: Column = Column::fixed("changes", "CHANGES", 14);
pub const COMMAND: Column = Column::flex("command", "COMMAND", 2);
pub const AGE: Column = Column::fixed("age", "AGE", 9).align_right();
pub const TIME: Column = Column::fixed("time", "TIME", 24);
pub const LEVEL: Column = Column::fixed("level", "LEVEL", 6);
pub const MESSAGE: Column = Column::flex("message", "MESSAGE", 1);

/// Register a maker for every page kind.
pub fn register_all(cache: &mut Cache, services: &Services) {
    cache.register(PageKind::ModuleList, module_list::maker(services.clone()));
    cache.register(PageKind::WorkspaceList, workspace_list::maker(services.clone()));
    cache.register(PageKind::RunList, run_list::maker(services.clone()));
    cache.register(PageKind::TaskList, task_list::maker(services.clone()));
    cache.register(PageKind::Run, run::maker(services.clone()));
    cache.register(PageKind::Task, task::maker(services.clone()));
    cache.register(PageKind::LogList, log_list::maker(services.clone()));
    cache.register(PageKind::Log, log::maker(services.clone()));
}

/// Ancestor columns for a list of `items` scoped to `parent`: every ancestor
/// kind below the parent, so a global list shows them all and a list scoped
/// to the immediate parent shows none.
#[must_use]
pub fn parent_columns(items: Kind, parent: Option<Kind>) -> Vec<Column> {
    let parent = parent.unwrap_or(Kind::Global);
    [(Kind::Module, MODULE), (Kind::Workspace, WORKSPACE), (Kind::Run, RUN)]
        .into_iter()
        .filter(|(kind, _)| *kind > parent && *kind < items)
        .map(|(_, col)| col)
        .collect()
}

/// Cells for every ancestor column the item can fill.
#[must_use]
pub fn parent_cells<T: TableItem>(item: &T) -> RenderedRow {
    let mut cells = RenderedRow::new();
    if let Some(path) = item.module_path() {
        cells.insert(MODULE.key, path.to_string());
    }
    if let Some(name) = item.workspace_name() {
        cells.insert(WORKSPACE.key, name.to_string());
    }
    if let Some(run) = item.run() {
        cells.insert(RUN.key, run.to_string());
    }
    cells
}

/// Human readable name of a parent resource, for page titles.
fn describe(services: &Services, id: ResourceId) -> Result<String, DashError> {
    Ok(match id.kind() {
        Kind::Module => services.modules.get(id)?.path,
        Kind::Workspace => {
            let ws = services.workspaces.get(id)?;
            format!("{}:{}", ws.module_path, ws.name)
        }
        Kind::Run => {
            let run = services.runs.get(id)?;
            format!("{}:{}:{}", run.module_path, run.workspace_name, run.id)
        }
        Kind::Task => services.tasks.get(id)?.command_string(),
        Kind::Global | Kind::Log => id.to_string(),
    })
}

/// Title of a list page, naming its scope when it has one.
fn list_title(
    services: &Services,
    label: &str,
    parent: Option<ResourceId>,
) -> Result<String, DashError> {
    match parent {
        Some(id) => Ok(format!("{label} ({})", describe(services, id)?)),
        None => Ok(label.to_string()),
    }
}
