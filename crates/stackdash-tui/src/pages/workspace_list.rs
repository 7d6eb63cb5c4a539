use stackdash_core::{Kind, Payload, ResourceId, Workspace};
use stackdash_service::Services;

use crate::columns::Column;
use crate::error::TuiError;
use crate::model::{ChildModel, Maker};
use crate::page::{PageKind, Position};
use crate::table::Table;

use super::{list_title, parent_cells, parent_columns, ListModel, WORKSPACE};

const CURRENT: Column = Column::fixed("current", "CURRENT", 8);

pub(super) fn maker(services: Services) -> impl Maker {
    move |parent: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let make_err = |e| TuiError::make(PageKind::WorkspaceList, e);
        let title = list_title(&services, "workspaces", parent).map_err(make_err)?;

        let mut columns = parent_columns(Kind::Workspace, parent.map(ResourceId::kind));
        columns.extend([WORKSPACE, CURRENT]);
        let table = Table::new(
            columns,
            |ws: &Workspace| {
                let mut cells = parent_cells(ws);
                cells.insert(WORKSPACE.key, ws.name.clone());
                cells.insert(CURRENT.key, if ws.current { "✓" } else { "" }.to_string());
                cells
            },
            width,
            height,
        )
        .with_parent(parent)
        .with_sort(|a: &Workspace, b: &Workspace| {
            (&a.module_path, &a.name).cmp(&(&b.module_path, &b.name))
        })
        .with_preview(PageKind::RunList, Position::BottomRight);

        let workspaces = services.workspaces.clone();
        let model = ListModel::new(table, title, move || {
            workspaces.list(parent).into_iter().map(Payload::from).collect()
        });
        Ok(Box::new(model))
    }
}
