//! Shared fixtures for the cross-crate integration tests.

use std::collections::VecDeque;
use std::path::Path;

use crossbeam_channel::Receiver;

use stackdash_core::{Event, Module, Run, Task, Workspace};
use stackdash_service::Services;
use stackdash_tui::{register_all, Cache, Cmd, Msg, Navigator, Theme};

/// Terminal size used by the fixtures.
pub const WIDTH: u16 = 120;
pub const HEIGHT: u16 = 40;

/// Upper bound on messages handled by one [`pump`].
const MAX_STEPS: usize = 10_000;

/// One resource of every kind, nested under each other.
pub struct Tree {
    pub module: Module,
    pub workspace: Workspace,
    pub run: Run,
    pub task: Task,
}

/// Populate `services` with a module, workspace, run and a task with `lines`
/// lines of output.
///
/// # Panics
///
/// If a service rejects the fixture.
#[must_use]
pub fn seed(services: &Services, lines: usize) -> Tree {
    let module = Module::new("infra/vpc");
    services.modules.add(module.clone());
    let workspace = services.workspaces.add(module.id, "prod").expect("workspace");
    let run = services.runs.create(workspace.id).expect("run");
    let task = services.tasks.create(Task::new(["terraform", "plan"]).with_run(&run));
    for i in 0..lines {
        services
            .tasks
            .append_output(task.id, format!("line {i}"))
            .expect("output");
    }
    Tree {
        module,
        workspace,
        run,
        task,
    }
}

#[must_use]
pub fn services_in(dir: &Path) -> Services {
    Services::new(dir)
}

/// A navigator with every page registered.
#[must_use]
pub fn navigator(services: &Services) -> Navigator {
    let mut cache = Cache::new();
    register_all(&mut cache, services);
    Navigator::new(cache, Theme::default(), WIDTH, HEIGHT)
}

/// Run `cmd` in place and feed everything it yields back into the navigator
/// until nothing is left. Returns every message handled.
///
/// # Panics
///
/// If the messages never settle.
pub fn pump(nav: &mut Navigator, cmd: Cmd) -> Vec<Msg> {
    let mut handled = Vec::new();
    let mut pending: VecDeque<Msg> = cmd.execute().into();
    while let Some(msg) = pending.pop_front() {
        assert!(handled.len() < MAX_STEPS, "messages did not settle");
        pending.extend(nav.handle_message(msg.clone()).execute());
        handled.push(msg);
    }
    handled
}

/// Deliver every event published so far on `events` to the navigator.
pub fn deliver(nav: &mut Navigator, events: &Receiver<Event>) -> usize {
    let mut n = 0;
    for event in events.try_iter() {
        pump(nav, Cmd::msg(Msg::Resource(event)));
        n += 1;
    }
    n
}

/// The rendered text of a model, one string per line.
#[must_use]
pub fn lines(model: &dyn stackdash_tui::ChildModel) -> Vec<String> {
    model
        .view(&Theme::default())
        .lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}
