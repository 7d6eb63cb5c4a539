//! Run page: one tab per task of the run.

use ratatui::text::Text;

use stackdash_core::{ChangeType, DashError, Kind, Payload, ResourceId, Run, Task};
use stackdash_service::Services;

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::keymap::Binding;
use crate::messages::Msg;
use crate::model::{BorderPosition, ChildModel, Maker};
use crate::page::PageKind;
use crate::styles::Theme;
use crate::tabs::TabSet;

pub struct RunModel {
    run: Run,
    services: Services,
    tabs: TabSet,
    task_maker: Box<dyn Maker>,
}

impl RunModel {
    #[must_use]
    pub fn new(run: Run, services: Services, width: u16, height: u16) -> Self {
        let task_maker = Box::new(super::task::maker(services.clone()));
        let mut tabs = TabSet::new(width, height);
        tabs.set_info(Some(summary(&run)));
        Self {
            run,
            services,
            tabs,
            task_maker,
        }
    }

    #[must_use]
    pub fn run(&self) -> &Run {
        &self.run
    }

    #[must_use]
    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    fn add_task(&mut self, task: &Task) -> Cmd {
        match self
            .tabs
            .add_tab(self.task_maker.as_ref(), Some(task.id), task.command_string())
        {
            Ok(cmd) => cmd,
            Err(TuiError::DuplicateTab(title)) => {
                tracing::debug!(run = %self.run.id, task = %task.id, %title, "task tab already exists");
                Cmd::none()
            }
            Err(err) => {
                tracing::warn!(run = %self.run.id, task = %task.id, error = %err, "adding task tab");
                Cmd::none()
            }
        }
    }

    /// React to our own run changing and to tasks joining it. Returns `None`
    /// when the event is not ours to handle.
    fn on_event(&mut self, change: ChangeType, payload: &Payload) -> Option<Cmd> {
        match (change, payload) {
            (ChangeType::Updated, Payload::Run(run)) if run.id == self.run.id => {
                self.run = run.clone();
                self.tabs.set_info(Some(summary(run)));
                Some(Cmd::none())
            }
            (ChangeType::Created, Payload::Task(task)) if task.run == Some(self.run.id) => {
                let cmd = self.add_task(task);
                self.tabs.activate_last();
                Some(cmd)
            }
            _ => None,
        }
    }
}

/// Status and planned changes, shown beside the task tabs.
fn summary(run: &Run) -> String {
    match run.changes {
        Some(changes) => format!("{} {changes}", run.status),
        None => run.status.to_string(),
    }
}

impl ChildModel for RunModel {
    fn init(&mut self) -> Cmd {
        let tasks = self.services.tasks.list(Some(self.run.id));
        Cmd::batch(tasks.iter().map(|task| self.add_task(task)).collect::<Vec<_>>())
    }

    fn update(&mut self, msg: &Msg) -> Cmd {
        if let Msg::Resource(event) = msg {
            if let Some(cmd) = self.on_event(event.change, &event.payload) {
                return cmd;
            }
        }
        self.tabs.update(msg)
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        self.tabs.view(theme)
    }

    fn help_bindings(&self) -> Vec<Binding> {
        self.tabs.help_bindings()
    }

    fn title(&self) -> Option<String> {
        Some(format!(
            "run {} ({}:{})",
            self.run.id, self.run.module_path, self.run.workspace_name
        ))
    }

    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        let mut text = vec![(BorderPosition::TopLeft, self.run.status.to_string())];
        if let Some(changes) = self.run.changes {
            text.push((BorderPosition::TopRight, changes.to_string()));
        }
        text
    }

    fn captures_input(&self) -> bool {
        self.tabs.captures_input()
    }
}

pub(super) fn maker(services: Services) -> impl Maker {
    move |parent: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
        let make_err = |e| TuiError::make(PageKind::Run, e);
        let id = parent.ok_or(DashError::MissingParent(Kind::Run)).map_err(make_err)?;
        let run = services.runs.get(id).map_err(make_err)?;
        Ok(Box::new(RunModel::new(run, services.clone(), width, height)))
    }
}
