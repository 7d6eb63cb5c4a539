use chrono::Utc;

use stackdash_core::{Kind, Payload, ResourceId, Run};
use stackdash_service::Services;

use crate::error::TuiError;
use crate::model::{ChildModel, Maker};
use crate::page::{PageKind, Position};
use crate::table::Table;
use crate::time::ago;

use super::{list_title, parent_cells, parent_columns, ListModel, AGE, CHANGES, ID, STATUS};

pub(super) fn maker(services: Services) -> impl Maker {
    move |parent: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let title = list_title(&services, "runs", parent)
            .map_err(|e| TuiError::make(PageKind::RunList, e))?;

        let mut columns = parent_columns(Kind::Run, parent.map(ResourceId::kind));
        columns.extend([ID, STATUS, CHANGES, AGE]);
        let table = Table::new(
            columns,
            |run: &Run| {
                let mut cells = parent_cells(run);
                cells.insert(ID.key, run.id.to_string());
                cells.insert(STATUS.key, run.status.to_string());
                cells.insert(
                    CHANGES.key,
                    run.changes.map(|c| c.to_string()).unwrap_or_default(),
                );
                cells.insert(AGE.key, ago(Utc::now(), run.created));
                cells
            },
            width,
            height,
        )
        .with_parent(parent)
        // newest first
        .with_sort(|a: &Run, b: &Run| b.id.cmp(&a.id))
        .with_preview(PageKind::Run, Position::BottomRight);

        let runs = services.runs.clone();
        let model = ListModel::new(table, title, move || {
            runs.list(parent).into_iter().map(Payload::from).collect()
        });
        Ok(Box::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Msg;
    use crate::pages::testing::{drive, lines, services};
    use stackdash_core::{ChangeType, Changes, Event, Module, RunStatus};

    #[test]
    fn runs_show_newest_first_and_follow_updates() {
        let (_dir, services) = services();
        let vpc = Module::new("vpc");
        services.modules.add(vpc.clone());
        let ws = services.workspaces.add(vpc.id, "default").unwrap();
        let first = services.runs.create(ws.id).unwrap();
        let second = services.runs.create(ws.id).unwrap();

        let mut model = maker(services.clone()).make(Some(ws.id), 80, 10).unwrap();
        let init = model.init();
        let _ = drive(model.as_mut(), init);
        let text = lines(model.as_ref());
        assert!(text[0].starts_with("ID"));
        assert!(text[1].starts_with(&second.id.to_string()));
        assert!(text[2].starts_with(&first.id.to_string()));

        let planned = services
            .runs
            .set_status(
                first.id,
                RunStatus::Planned,
                Some(Changes {
                    add: 2,
                    change: 0,
                    destroy: 1,
                }),
            )
            .unwrap();
        let _ = model.update(&Msg::Resource(Event::new(ChangeType::Updated, planned)));
        let text = lines(model.as_ref());
        assert!(text[2].contains("planned"));
        assert!(text[2].contains("+2~0-1"));
        assert!(text[2].trim_end().ends_with("ago"));
    }

    #[test]
    fn global_runs_show_module_and_workspace() {
        let (_dir, services) = services();
        let vpc = Module::new("vpc");
        services.modules.add(vpc.clone());
        let ws = services.workspaces.add(vpc.id, "prod").unwrap();
        services.runs.create(ws.id).unwrap();

        let mut model = maker(services).make(None, 100, 10).unwrap();
        let init = model.init();
        let _ = drive(model.as_mut(), init);
        let text = lines(model.as_ref());
        assert!(text[0].starts_with("MODULE"));
        assert!(text[0].contains("WORKSPACE"));
        assert!(text[1].starts_with("vpc"));
        assert!(text[1].contains("prod"));
    }
}
