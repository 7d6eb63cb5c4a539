use chrono::Utc;

use stackdash_core::{Kind, Payload, ResourceId, Task};
use stackdash_service::Services;

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::keymap::table as keys;
use crate::messages::{ErrorMsg, Msg};
use crate::model::{ChildModel, Maker};
use crate::page::{PageKind, Position};
use crate::table::Table;
use crate::time::ago;

use super::{list_title, parent_cells, parent_columns, ListModel, AGE, COMMAND, STATUS, TASK};

pub(super) fn maker(services: Services) -> impl Maker {
    move |parent: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let title = list_title(&services, "tasks", parent)
            .map_err(|e| TuiError::make(PageKind::TaskList, e))?;

        let mut columns = parent_columns(Kind::Task, parent.map(ResourceId::kind));
        columns.extend([TASK, COMMAND, STATUS, AGE]);
        let table = Table::new(
            columns,
            |task: &Task| {
                let mut cells = parent_cells(task);
                cells.insert(TASK.key, task.id.to_string());
                cells.insert(COMMAND.key, task.command_string());
                cells.insert(STATUS.key, task.status.to_string());
                cells.insert(AGE.key, ago(Utc::now(), task.created));
                cells
            },
            width,
            height,
        )
        .with_parent(parent)
        .with_sort(|a: &Task, b: &Task| b.id.cmp(&a.id))
        .with_preview(PageKind::Task, Position::BottomRight);

        let tasks = services.tasks.clone();
        let canceler = services.tasks.clone();
        let model = ListModel::new(table, title, move || {
            tasks.list(parent).into_iter().map(Payload::from).collect()
        })
        .with_action(keys::CANCEL, move |table| {
            let ids = table.selected_or_current();
            if ids.is_empty() {
                return Cmd::none();
            }
            let tasks = canceler.clone();
            Cmd::task(move || {
                let n = ids.len();
                for id in ids {
                    if let Err(err) = tasks.cancel(id) {
                        return Some(ErrorMsg::new("canceling task", err).into());
                    }
                }
                Some(Msg::Info(format!("canceled {n} task(s)")))
            })
        });
        Ok(Box::new(model))
    }
}
