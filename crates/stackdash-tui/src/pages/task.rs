//! Task page: the task's output with follow mode.

use std::sync::Arc;

use chrono::Utc;
use ratatui::text::{Line, Text};

use stackdash_core::{ChangeType, DashError, Kind, Payload, ResourceId, Task};
use stackdash_service::{Services, TaskService};

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::keymap::{navigation, table as keys, Binding};
use crate::messages::{ErrorMsg, Msg};
use crate::model::{BorderPosition, ChildModel, Maker};
use crate::page::PageKind;
use crate::scroll::ScrollState;
use crate::styles::Theme;
use crate::time::ago;

pub struct TaskModel {
    task: Task,
    tasks: Arc<TaskService>,
    scroll: ScrollState,
    height: u16,
}

impl TaskModel {
    #[must_use]
    pub fn new(task: Task, tasks: Arc<TaskService>, height: u16) -> Self {
        let mut model = Self {
            task,
            tasks,
            scroll: ScrollState::new(),
            height,
        };
        model.on_content();
        model
    }

    #[must_use]
    pub fn task(&self) -> &Task {
        &self.task
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    fn total(&self) -> usize {
        self.task.output_len()
    }

    fn page(&self) -> usize {
        usize::from(self.height)
    }

    fn on_content(&mut self) {
        let (total, page) = (self.total(), self.page());
        self.scroll.on_content(total, page);
    }

    fn cancel(&self) -> Cmd {
        let tasks = Arc::clone(&self.tasks);
        let id = self.task.id;
        Cmd::task(move || match tasks.cancel(id) {
            Ok(_) => Some(Msg::Info(format!("canceled {id}"))),
            Err(err) => Some(ErrorMsg::new("canceling task", err).into()),
        })
    }

    fn handle_key(&mut self, key: &crossterm::event::KeyEvent) -> Cmd {
        let (total, page) = (self.total(), self.page());
        if navigation::UP.matches(key) {
            self.scroll.scroll_up();
        } else if navigation::DOWN.matches(key) {
            self.scroll.scroll_down(total, page);
        } else if navigation::PAGE_UP.matches(key) {
            self.scroll.page_up(page);
        } else if navigation::PAGE_DOWN.matches(key) {
            self.scroll.page_down(page, total, page);
        } else if navigation::HOME.matches(key) {
            self.scroll.home();
        } else if navigation::END.matches(key) {
            self.scroll.end(total, page);
        } else if keys::CANCEL.matches(key) {
            return self.cancel();
        }
        Cmd::none()
    }
}

impl ChildModel for TaskModel {
    fn init(&mut self) -> Cmd {
        Cmd::none()
    }

    fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::PaneResize { height, .. } => {
                self.height = *height;
                self.on_content();
                Cmd::none()
            }
            Msg::Resource(event) if event.change == ChangeType::Updated => {
                if let Payload::Task(task) = &event.payload {
                    if task.id == self.task.id {
                        self.task = task.clone();
                        self.on_content();
                    }
                }
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        let output = self.task.output.read();
        let lines: Vec<Line<'static>> = output
            .iter()
            .skip(self.scroll.offset)
            .take(self.page())
            .map(|l| Line::styled(l.clone(), theme.text_style()))
            .collect();
        Text::from(lines)
    }

    fn help_bindings(&self) -> Vec<Binding> {
        vec![
            navigation::UP,
            navigation::DOWN,
            navigation::PAGE_UP,
            navigation::PAGE_DOWN,
            navigation::HOME,
            navigation::END,
            keys::CANCEL,
        ]
    }

    fn title(&self) -> Option<String> {
        Some(format!("task {} ({})", self.task.id, self.task.command_string()))
    }

    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        let mut text = vec![
            (BorderPosition::TopLeft, self.task.status.to_string()),
            (BorderPosition::TopMiddle, ago(Utc::now(), self.task.created)),
        ];
        if let Some(pct) = self.scroll.percent(self.total(), self.page()) {
            text.push((BorderPosition::BottomRight, format!("{pct}%")));
        }
        text
    }

    fn tab_status(&self) -> Option<String> {
        match self.task.exit_code {
            Some(code) => Some(format!("{} ({code})", self.task.status)),
            None => Some(self.task.status.to_string()),
        }
    }
}

pub(super) fn maker(services: Services) -> impl Maker {
    move |parent: Option<ResourceId>, _width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let make_err = |e| TuiError::make(PageKind::Task, e);
        let id = parent.ok_or(DashError::MissingParent(Kind::Task)).map_err(make_err)?;
        let task = services.tasks.get(id).map_err(make_err)?;
        Ok(Box::new(TaskModel::new(task, Arc::clone(&services.tasks), height)))
    }
}
