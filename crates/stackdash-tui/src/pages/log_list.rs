use std::fmt::Write;

use stackdash_core::{LogMessage, Payload, ResourceId};
use stackdash_service::Services;

use crate::error::TuiError;
use crate::model::{ChildModel, Maker};
use crate::page::{PageKind, Position};
use crate::table::{RenderedRow, Table};

use super::{ListModel, LEVEL, MESSAGE, TIME};

pub(super) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn render(msg: &LogMessage) -> RenderedRow {
    let mut message = msg.message.clone();
    for (key, value) in &msg.attributes {
        let _ = write!(message, " {key}={value}");
    }
    RenderedRow::from([
        (TIME.key, msg.time.format(TIME_FORMAT).to_string()),
        (LEVEL.key, msg.level.to_string()),
        (MESSAGE.key, message),
    ])
}

pub(super) fn maker(services: Services) -> impl Maker {
    move |_: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let table = Table::new(vec![TIME, LEVEL, MESSAGE], render, width, height)
            .with_sort(|a: &LogMessage, b: &LogMessage| b.serial().cmp(&a.serial()))
            .with_selectable(false)
            .with_preview(PageKind::Log, Position::BottomRight);

        let logger = services.logger.clone();
        let model = ListModel::new(table, "logs", move || {
            logger.list(None).into_iter().map(Payload::from).collect()
        });
        Ok(Box::new(model))
    }
}
