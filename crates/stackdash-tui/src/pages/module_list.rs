use stackdash_core::{Module, Payload, ResourceId};
use stackdash_service::Services;

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::keymap::table as keys;
use crate::messages::{ErrorMsg, Msg};
use crate::model::{ChildModel, Maker};
use crate::page::{PageKind, Position};
use crate::table::{RenderedRow, Table};

use super::{ListModel, ID, MODULE};

pub(super) fn maker(services: Services) -> impl Maker {
    move |_: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let table = Table::new(
            vec![MODULE, ID],
            |m: &Module| RenderedRow::from([(MODULE.key, m.path.clone()), (ID.key, m.id.to_string())]),
            width,
            height,
        )
        .with_sort(|a: &Module, b: &Module| a.path.cmp(&b.path))
        .with_preview(PageKind::WorkspaceList, Position::TopRight);

        let modules = services.modules.clone();
        let discover = services.clone();
        let model = ListModel::new(table, "modules", move || {
            modules.list().into_iter().map(Payload::from).collect()
        })
        .with_action(keys::RELOAD, move |_| {
            let services = discover.clone();
            Cmd::task(move || match services.discover_modules() {
                Ok(found) => Some(Msg::Info(format!(
                    "discovered modules: {} added, {} removed",
                    found.added.len(),
                    found.removed.len()
                ))),
                Err(err) => Some(ErrorMsg::new("discovering modules", err).into()),
            })
        });
        Ok(Box::new(model))
    }
}
