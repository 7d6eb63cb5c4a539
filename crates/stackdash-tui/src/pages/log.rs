//! Log page: a single message with its attributes.

use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use stackdash_core::{DashError, Kind, LogMessage, ResourceId};
use stackdash_service::Services;

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::messages::Msg;
use crate::model::{BorderPosition, ChildModel, Maker};
use crate::page::PageKind;
use crate::styles::Theme;

use super::log_list::TIME_FORMAT;

pub struct LogModel {
    msg: LogMessage,
}

impl LogModel {
    #[must_use]
    pub fn new(msg: LogMessage) -> Self {
        Self { msg }
    }

    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("time".to_string(), self.msg.time.format(TIME_FORMAT).to_string()),
            ("level".to_string(), self.msg.level.to_string()),
            ("message".to_string(), self.msg.message.clone()),
        ];
        fields.extend(self.msg.attributes.iter().cloned());
        fields
    }
}

impl ChildModel for LogModel {
    fn init(&mut self) -> Cmd {
        Cmd::none()
    }

    // Log messages never change once recorded.
    fn update(&mut self, _msg: &Msg) -> Cmd {
        Cmd::none()
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        let fields = self.fields();
        let width = fields.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
        let lines: Vec<Line<'static>> = fields
            .into_iter()
            .map(|(key, value)| {
                let style = if key == "level" {
                    theme.log_level_style(self.msg.level)
                } else {
                    theme.text_style()
                };
                Line::from(vec![
                    Span::styled(format!("{key:<width$}  "), theme.muted_style()),
                    Span::styled(value, style),
                ])
            })
            .collect();
        Text::from(lines)
    }

    fn title(&self) -> Option<String> {
        Some(format!("log {}", self.msg.id))
    }

    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        vec![(BorderPosition::TopLeft, self.msg.level.to_string())]
    }
}

pub(super) fn maker(services: Services) -> impl Maker {
    move |parent: Option<ResourceId>, _: u16, _: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let make_err = |e| TuiError::make(PageKind::Log, e);
        let id = parent.ok_or(DashError::MissingParent(Kind::Log)).map_err(make_err)?;
        let msg = services.logger.get(id).map_err(make_err)?;
        Ok(Box::new(LogModel::new(msg)))
    }
}
