//! Navigation across pages backed by real services.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use stackdash_tests::{deliver, lines, navigator, pump, seed, services_in, HEIGHT, WIDTH};
use stackdash_tui::{register_all, Cache, Msg, NavigationMsg, Page, PageKind, Position};

fn key(code: KeyCode) -> Msg {
    Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn open(nav: &mut stackdash_tui::Navigator, msg: NavigationMsg) {
    pump(nav, stackdash_tui::Cmd::msg(Msg::Navigate(msg)));
}

#[test]
fn resolve_builds_once() {
    let dir = tempfile::tempdir().unwrap();
    let services = services_in(dir.path());
    let tree = seed(&services, 3);
    let mut cache = Cache::new();
    register_all(&mut cache, &services);

    let page = Page::new(PageKind::Task).with_parent(tree.task.id);
    let first = {
        let (model, created) = cache.resolve(&page, WIDTH, HEIGHT).unwrap();
        assert!(created);
        std::ptr::from_mut(model).cast::<()>()
    };
    let (model, created) = cache.resolve(&page, WIDTH, HEIGHT).unwrap();
    assert!(!created);
    assert_eq!(std::ptr::from_mut(model).cast::<()>(), first);
    assert_eq!(cache.len(), 1);
}

#[test]
fn returning_to_a_page_keeps_its_scroll_position() {
    let dir = tempfile::tempdir().unwrap();
    let services = services_in(dir.path());
    let tree = seed(&services, 100);
    let mut nav = navigator(&services);
    let task_page = NavigationMsg::new(PageKind::Task).with_parent(tree.task.id);

    open(&mut nav, task_page);
    let model = nav.model(Position::Left).unwrap();
    assert_ne!(lines(model)[0], "line 0");
    assert_eq!(lines(model).last().map(String::as_str), Some("line 99"));

    pump(&mut nav, stackdash_tui::Cmd::msg(key(KeyCode::Home)));
    assert_eq!(lines(nav.model(Position::Left).unwrap())[0], "line 0");

    open(&mut nav, NavigationMsg::new(PageKind::ModuleList));
    assert_eq!(
        nav.current(Position::Left).map(|p| p.kind),
        Some(PageKind::ModuleList)
    );

    open(&mut nav, task_page);
    assert_eq!(nav.current(Position::Left), Some(task_page.page));
    assert_eq!(lines(nav.model(Position::Left).unwrap())[0], "line 0");
}

#[test]
fn escape_walks_back_through_history() {
    let dir = tempfile::tempdir().unwrap();
    let services = services_in(dir.path());
    let tree = seed(&services, 1);
    let mut nav = navigator(&services);

    open(&mut nav, NavigationMsg::new(PageKind::ModuleList));
    open(&mut nav, NavigationMsg::new(PageKind::Run).with_parent(tree.run.id));
    assert_eq!(nav.history(Position::Left).len(), 1);

    pump(&mut nav, stackdash_tui::Cmd::msg(key(KeyCode::Esc)));
    assert_eq!(
        nav.current(Position::Left).map(|p| p.kind),
        Some(PageKind::ModuleList)
    );
    assert!(nav.history(Position::Left).is_empty());
}

#[test]
fn deleting_a_task_evicts_its_page() {
    let dir = tempfile::tempdir().unwrap();
    let services = services_in(dir.path());
    let tree = seed(&services, 5);
    let events = services.broker.subscribe();
    let mut nav = navigator(&services);
    let task_page = NavigationMsg::new(PageKind::Task).with_parent(tree.task.id);

    open(&mut nav, NavigationMsg::new(PageKind::ModuleList));
    open(&mut nav, task_page);
    assert!(nav.cache().contains(&task_page.page));

    services.tasks.delete(tree.task.id).unwrap();
    assert!(deliver(&mut nav, &events) >= 1);

    assert!(!nav.cache().contains(&task_page.page));
    assert_eq!(
        nav.current(Position::Left).map(|p| p.kind),
        Some(PageKind::ModuleList)
    );
    assert_eq!(nav.focused(), Position::Left);

    open(&mut nav, task_page);
    assert!(nav.notice().is_some());
    assert!(!nav.cache().contains(&task_page.page));
}

#[test]
fn run_page_gains_tabs_for_new_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let services = services_in(dir.path());
    let tree = seed(&services, 0);
    let events = services.broker.subscribe();
    let mut nav = navigator(&services);

    open(&mut nav, NavigationMsg::new(PageKind::Run).with_parent(tree.run.id));
    services.tasks.create(
        stackdash_core::Task::new(["terraform", "apply"]).with_run(&tree.run),
    );
    deliver(&mut nav, &events);

    let model = nav.model(Position::Left).unwrap();
    let rendered = lines(model).join("\n");
    assert!(rendered.contains("apply"), "{rendered}");
}

#[test]
fn task_page_renders_title_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let services = services_in(dir.path());
    let tree = seed(&services, 5);
    let mut nav = navigator(&services);
    open(
        &mut nav,
        NavigationMsg::new(PageKind::Task).with_parent(tree.task.id),
    );

    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    let frame = terminal.draw(|frame| nav.render(frame)).unwrap();
    let rows: Vec<String> = (0..HEIGHT)
        .map(|y| {
            (0..WIDTH)
                .map(|x| frame.buffer[(x, y)].symbol().to_string())
                .collect()
        })
        .collect();

    let title = format!("task {} ({})", tree.task.id, tree.task.command_string());
    assert!(rows[3].contains(&title), "{}", rows[3]);
    assert!(rows.iter().any(|r| r.contains("line 4")));
}
