//! Top level dashboard state.
//!
//! The navigator owns the model cache, the page shown in each pane and a
//! bounded history per pane. It is driven by one message at a time from the
//! update loop and is the only thing that touches the models.

use std::collections::VecDeque;

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use stackdash_core::{ChangeType, ResourceId};

use crate::cache::Cache;
use crate::cmd::Cmd;
use crate::dimensions::{
    BORDER_SIZE, CHROME_HEIGHT, DEFAULT_LEFT_PANE_WIDTH, DEFAULT_TOP_RIGHT_PANE_HEIGHT,
    FOOTER_HEIGHT, HEADER_HEIGHT, HISTORY_CAP, MIN_PANE_HEIGHT, MIN_PANE_WIDTH, RESIZE_STEP,
    RULE_HEIGHT, TITLE_HEIGHT,
};
use crate::error::TuiError;
use crate::footer::{render_footer, Notice};
use crate::header::render_header;
use crate::help::full_help_view;
use crate::keymap::{global, map_key, Binding, KeyAction};
use crate::messages::{ErrorMsg, Msg, NavigationMsg};
use crate::model::{BorderPosition, ChildModel};
use crate::page::{Page, PageKind, Position};
use crate::styles::Theme;

type Counter = Box<dyn Fn() -> usize>;

pub struct Navigator {
    cache: Cache,
    theme: Theme,
    current: [Option<Page>; 3],
    history: [VecDeque<Page>; 3],
    focused: Position,
    show_help: bool,
    width: u16,
    height: u16,
    left_width: u16,
    top_right_height: u16,
    notice: Option<Notice>,
    running: Counter,
    should_quit: bool,
}

impl Navigator {
    /// Create a navigator for a terminal of `width` x `height` cells.
    #[must_use]
    pub fn new(cache: Cache, theme: Theme, width: u16, height: u16) -> Self {
        Self {
            cache,
            theme,
            current: [None; 3],
            history: Default::default(),
            focused: Position::Left,
            show_help: false,
            width,
            height,
            left_width: DEFAULT_LEFT_PANE_WIDTH,
            top_right_height: DEFAULT_TOP_RIGHT_PANE_HEIGHT,
            notice: None,
            running: Box::new(|| 0),
            should_quit: false,
        }
    }

    /// Source of the running task count shown in the footer.
    #[must_use]
    pub fn with_task_counter(mut self, counter: impl Fn() -> usize + 'static) -> Self {
        self.running = Box::new(counter);
        self
    }

    /// Show the first page in the left pane.
    pub fn init(&mut self, first: PageKind) -> Cmd {
        self.navigate_or_report(NavigationMsg::new(first))
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn current(&self, position: Position) -> Option<Page> {
        self.current[position.index()]
    }

    #[must_use]
    pub fn focused(&self) -> Position {
        self.focused
    }

    #[must_use]
    pub fn history(&self, position: Position) -> &VecDeque<Page> {
        &self.history[position.index()]
    }

    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Model shown in a pane.
    #[must_use]
    pub fn model(&self, position: Position) -> Option<&dyn ChildModel> {
        self.current(position).and_then(|p| self.cache.get(&p))
    }

    fn focused_model(&self) -> Option<&dyn ChildModel> {
        self.model(self.focused)
    }

    /// Apply one message, returning the work it gives rise to.
    pub fn handle_message(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.resize_panes()
            }
            Msg::Navigate(nav) => self.navigate_or_report(nav),
            Msg::Resource(event) => {
                let change = event.change;
                let id = event.id();
                let mut cmd = self.cache.update_all(&Msg::Resource(event));
                if change == ChangeType::Deleted {
                    cmd.push(self.evict(id));
                }
                cmd
            }
            Msg::Error(err) => {
                tracing::error!(error = %err.error, "{}", err.context);
                self.notice = Some(Notice::Error(err));
                Cmd::none()
            }
            Msg::Info(info) => {
                self.notice = Some(Notice::Info(info));
                Cmd::none()
            }
            Msg::Quit => {
                self.should_quit = true;
                Cmd::none()
            }
            other => self.cache.update_all(&other),
        }
    }

    fn navigate_or_report(&mut self, nav: NavigationMsg) -> Cmd {
        match self.navigate(nav) {
            Ok(cmd) => cmd,
            Err(err) => {
                self.handle_message(ErrorMsg::new(format!("opening {} page", nav.page.kind), err).into())
            }
        }
    }

    /// Make `nav.page` current in its pane.
    ///
    /// A page that fails to build leaves every pane as it was. A request that
    /// does not take focus is ignored when it targets the focused pane.
    pub fn navigate(&mut self, nav: NavigationMsg) -> Result<Cmd, TuiError> {
        let page = nav.page;
        let position = page.position;
        if nav.disable_focus && position == self.focused {
            return Ok(Cmd::none());
        }
        let previous = self.current(position);
        if previous == Some(page) {
            if !nav.disable_focus {
                self.focused = position;
            }
            return Ok(Cmd::none());
        }

        let mut cmd = self.show(page)?;
        if let Some(previous) = previous {
            self.push_history(previous);
        }
        if !nav.disable_focus {
            self.focused = position;
        }
        cmd.push(self.resize_panes());
        Ok(cmd)
    }

    /// Return the focused pane to the page it showed before.
    pub fn go_back(&mut self) -> Cmd {
        let i = self.focused.index();
        let Some(page) = self.history[i].pop_back() else {
            return Cmd::none();
        };
        match self.show(page) {
            Ok(mut cmd) => {
                cmd.push(self.resize_panes());
                cmd
            }
            Err(err) => self.handle_message(ErrorMsg::new("going back", err).into()),
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Put `page` in its pane, building its model if needed.
    fn show(&mut self, page: Page) -> Result<Cmd, TuiError> {
        let i = page.position.index();
        let previous = self.current[i].replace(page);
        let (width, height) = self.content_size(page.position);
        match self.cache.resolve(&page, width, height) {
            Ok((model, true)) => Ok(model.init()),
            Ok((_, false)) => Ok(Cmd::none()),
            Err(err) => {
                self.current[i] = previous;
                Err(err)
            }
        }
    }

    fn push_history(&mut self, page: Page) {
        let history = &mut self.history[page.position.index()];
        history.push_back(page);
        if history.len() > HISTORY_CAP {
            history.pop_front();
        }
    }

    /// Drop the pages scoped to a deleted resource and replace any that were
    /// on screen.
    fn evict(&mut self, id: ResourceId) -> Cmd {
        let evicted = self.cache.evict(id);
        if evicted.is_empty() {
            return Cmd::none();
        }
        for history in &mut self.history {
            history.retain(|p| !evicted.contains(p));
        }

        let mut cmd = Cmd::none();
        for position in Position::ALL {
            let i = position.index();
            if !self.current[i].is_some_and(|p| evicted.contains(&p)) {
                continue;
            }
            self.current[i] = None;
            let fallback = self.history[i].pop_back().or_else(|| {
                (position == Position::Left).then(|| Page::new(PageKind::ModuleList))
            });
            if let Some(page) = fallback {
                match self.show(page) {
                    Ok(c) => cmd.push(c),
                    Err(err) => cmd.push(
                        self.handle_message(ErrorMsg::new("replacing deleted page", err).into()),
                    ),
                }
            }
        }
        if self.current(self.focused).is_none() {
            self.focused = Position::Left;
        }
        cmd.push(self.resize_panes());
        cmd
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd {
        self.notice = None;

        if self.show_help {
            match map_key(key) {
                KeyAction::Help | KeyAction::Escape => self.show_help = false,
                KeyAction::Quit => self.should_quit = true,
                _ => {}
            }
            return Cmd::none();
        }

        let page = self.current(self.focused);
        if let Some(page) = page {
            let captures = self.cache.get(&page).is_some_and(ChildModel::captures_input);
            if captures {
                return self.update_page(&page, &Msg::Key(key));
            }
        }

        match map_key(key) {
            KeyAction::Quit => {
                self.should_quit = true;
                Cmd::none()
            }
            KeyAction::Help => {
                self.toggle_help();
                Cmd::none()
            }
            KeyAction::Escape => self.go_back(),
            KeyAction::Modules => self.navigate_or_report(NavigationMsg::new(PageKind::ModuleList)),
            KeyAction::Workspaces => {
                self.navigate_or_report(NavigationMsg::new(PageKind::WorkspaceList))
            }
            KeyAction::Runs => self.navigate_or_report(NavigationMsg::new(PageKind::RunList)),
            KeyAction::Tasks => self.navigate_or_report(NavigationMsg::new(PageKind::TaskList)),
            KeyAction::Logs => self.navigate_or_report(NavigationMsg::new(PageKind::LogList)),
            KeyAction::NextPane => {
                self.cycle_focus(true);
                Cmd::none()
            }
            KeyAction::PrevPane => {
                self.cycle_focus(false);
                Cmd::none()
            }
            KeyAction::GrowHeight => self.resize_split(0, RESIZE_STEP),
            KeyAction::ShrinkHeight => self.resize_split(0, -RESIZE_STEP),
            KeyAction::GrowWidth => self.resize_split(RESIZE_STEP, 0),
            KeyAction::ShrinkWidth => self.resize_split(-RESIZE_STEP, 0),
            KeyAction::None => match page {
                Some(page) => self.update_page(&page, &Msg::Key(key)),
                None => Cmd::none(),
            },
        }
    }

    fn update_page(&mut self, page: &Page, msg: &Msg) -> Cmd {
        self.cache
            .get_mut(page)
            .map_or_else(Cmd::none, |model| model.update(msg))
    }

    fn visible_positions(&self) -> Vec<Position> {
        Position::ALL
            .into_iter()
            .filter(|p| self.current(*p).is_some())
            .collect()
    }

    fn cycle_focus(&mut self, forward: bool) {
        let visible = self.visible_positions();
        let Some(at) = visible.iter().position(|p| *p == self.focused) else {
            return;
        };
        let n = visible.len();
        let next = if forward { (at + 1) % n } else { (at + n - 1) % n };
        self.focused = visible[next];
    }

    /// Move the splits bordering the focused pane so that it grows by
    /// `dw` columns and `dh` rows.
    fn resize_split(&mut self, dw: i16, dh: i16) -> Cmd {
        let (_, _, panes, _, _) = Self::compute_layout(Rect::new(0, 0, self.width, self.height));
        match self.focused {
            Position::Left => {
                self.left_width = clamp_split(self.left_width, dw, panes.width, MIN_PANE_WIDTH);
            }
            Position::TopRight => {
                self.left_width = clamp_split(self.left_width, -dw, panes.width, MIN_PANE_WIDTH);
                self.top_right_height =
                    clamp_split(self.top_right_height, dh, panes.height, MIN_PANE_HEIGHT);
            }
            Position::BottomRight => {
                self.left_width = clamp_split(self.left_width, -dw, panes.width, MIN_PANE_WIDTH);
                self.top_right_height =
                    clamp_split(self.top_right_height, -dh, panes.height, MIN_PANE_HEIGHT);
            }
        }
        self.resize_panes()
    }

    /// Outer areas of the header, title rule, panes, rule and footer.
    #[must_use]
    pub fn compute_layout(area: Rect) -> (Rect, Rect, Rect, Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(RULE_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);
        (chunks[0], chunks[1], chunks[2], chunks[3], chunks[4])
    }

    /// Outer area of each visible pane within `area`. Hidden panes give their
    /// space to the others.
    #[must_use]
    pub fn pane_areas(&self, area: Rect) -> [Option<Rect>; 3] {
        let visible = |p: Position| self.current(p).is_some();
        let left = visible(Position::Left);
        let top = visible(Position::TopRight);
        let bottom = visible(Position::BottomRight);

        let left_width = if top || bottom {
            self.left_width.min(area.width)
        } else {
            area.width
        };
        let (left_area, right_area) = if left {
            let (l, r) = split_columns(area, left_width);
            (Some(l), r)
        } else {
            (None, area)
        };

        let (top_area, bottom_area) = match (top, bottom) {
            (true, true) => {
                let (t, b) = split_rows(right_area, self.top_right_height.min(right_area.height));
                (Some(t), Some(b))
            }
            (true, false) => (Some(right_area), None),
            (false, true) => (None, Some(right_area)),
            (false, false) => (None, None),
        };
        [left_area, top_area, bottom_area]
    }

    /// Content size of a pane, inside its border.
    #[must_use]
    pub fn content_size(&self, position: Position) -> (u16, u16) {
        let panes = Rect::new(
            0,
            0,
            self.width,
            self.height.saturating_sub(CHROME_HEIGHT),
        );
        self.pane_areas(panes)[position.index()].map_or((0, 0), |r| {
            (
                r.width.saturating_sub(BORDER_SIZE),
                r.height.saturating_sub(BORDER_SIZE),
            )
        })
    }

    /// Tell every pane's current model its size.
    fn resize_panes(&mut self) -> Cmd {
        let mut cmd = Cmd::none();
        for position in Position::ALL {
            if let Some(page) = self.current(position) {
                let (width, height) = self.content_size(position);
                cmd.push(self.update_page(&page, &Msg::PaneResize { width, height }));
            }
        }
        cmd
    }

    fn short_help_bindings(&self) -> Vec<Binding> {
        let mut bindings = self
            .focused_model()
            .map(ChildModel::help_bindings)
            .unwrap_or_default();
        bindings.extend([global::HELP, global::QUIT]);
        bindings
    }

    fn title(&self) -> String {
        if self.show_help {
            return "help".to_string();
        }
        let Some(page) = self.current(self.focused) else {
            return String::new();
        };
        self.cache
            .get(&page)
            .and_then(ChildModel::title)
            .unwrap_or_else(|| page.kind.to_string())
    }

    /// Render the whole dashboard.
    pub fn render(&self, frame: &mut Frame) {
        let (header, title, panes, rule, footer) = Self::compute_layout(frame.area());
        let theme = &self.theme;

        render_header(frame, header, &self.short_help_bindings(), theme);
        frame.render_widget(
            Block::default()
                .title_top(Line::styled(format!(" {} ", self.title()), theme.header_style()).centered())
                .borders(Borders::TOP)
                .border_style(theme.muted_style()),
            title,
        );

        if self.show_help {
            let bindings = self
                .focused_model()
                .map(ChildModel::help_bindings)
                .unwrap_or_default();
            frame.render_widget(Paragraph::new(full_help_view(&bindings, theme)), panes);
        } else {
            for (position, area) in Position::ALL.into_iter().zip(self.pane_areas(panes)) {
                let (Some(area), Some(model)) = (area, self.model(position)) else {
                    continue;
                };
                let mut block = Block::bordered().border_style(theme.border_style(position == self.focused));
                for (at, text) in model.border_text() {
                    let label = Line::styled(format!(" {text} "), theme.muted_style());
                    block = match at {
                        BorderPosition::TopLeft => block.title_top(label.left_aligned()),
                        BorderPosition::TopMiddle => block.title_top(label.centered()),
                        BorderPosition::TopRight => block.title_top(label.right_aligned()),
                        BorderPosition::BottomLeft => block.title_bottom(label.left_aligned()),
                        BorderPosition::BottomMiddle => block.title_bottom(label.centered()),
                        BorderPosition::BottomRight => block.title_bottom(label.right_aligned()),
                    };
                }
                frame.render_widget(Paragraph::new(model.view(theme)).block(block), area);
            }
        }

        frame.render_widget(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.muted_style()),
            rule,
        );
        render_footer(frame, footer, self.notice.as_ref(), (self.running)(), theme);
    }
}

/// Split `area` into a left part `width` columns wide and the rest.
fn split_columns(area: Rect, width: u16) -> (Rect, Rect) {
    let width = width.min(area.width);
    (
        Rect::new(area.x, area.y, width, area.height),
        Rect::new(area.x + width, area.y, area.width - width, area.height),
    )
}

/// Split `area` into a top part `height` rows tall and the rest.
fn split_rows(area: Rect, height: u16) -> (Rect, Rect) {
    let height = height.min(area.height);
    (
        Rect::new(area.x, area.y, area.width, height),
        Rect::new(area.x, area.y + height, area.width, area.height - height),
    )
}

/// Move a split by `delta`, keeping at least `min` cells on both sides of it
/// where `total` allows.
fn clamp_split(value: u16, delta: i16, total: u16, min: u16) -> u16 {
    let moved = value.saturating_add_signed(delta);
    let max = total.saturating_sub(min).max(min);
    moved.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{recorder_maker, Log};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use stackdash_core::{DashError, Event, Kind, Module, Task};

    const WIDTH: u16 = 120;
    const HEIGHT: u16 = 40;

    fn navigator(log: &Log) -> Navigator {
        let mut cache = Cache::new();
        for kind in [
            PageKind::ModuleList,
            PageKind::WorkspaceList,
            PageKind::RunList,
            PageKind::TaskList,
            PageKind::Task,
            PageKind::LogList,
            PageKind::Log,
        ] {
            cache.register(kind, recorder_maker(log));
        }
        cache.register(
            PageKind::Run,
            |_: Option<ResourceId>, _: u16, _: u16| -> Result<Box<dyn ChildModel>, TuiError> {
                Err(TuiError::make(PageKind::Run, DashError::MissingParent(Kind::Run)))
            },
        );
        let mut nav = Navigator::new(cache, Theme::default(), WIDTH, HEIGHT);
        let _ = nav.init(PageKind::ModuleList);
        nav
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn task_page(id: ResourceId) -> NavigationMsg {
        NavigationMsg::new(PageKind::Task).with_parent(id)
    }

    #[test]
    fn init_shows_first_page() {
        let log = Log::default();
        let nav = navigator(&log);
        assert_eq!(nav.current(Position::Left), Some(Page::new(PageKind::ModuleList)));
        assert_eq!(nav.focused(), Position::Left);
        assert!(nav.history(Position::Left).is_empty());
    }

    #[test]
    fn navigation_pushes_history_and_back_pops() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let _ = nav.handle_message(key(KeyCode::Char('T')));
        assert_eq!(nav.current(Position::Left).unwrap().kind, PageKind::TaskList);
        assert_eq!(nav.history(Position::Left).len(), 1);

        let _ = nav.handle_message(key(KeyCode::Esc));
        assert_eq!(nav.current(Position::Left).unwrap().kind, PageKind::ModuleList);
        assert!(nav.history(Position::Left).is_empty());

        // nothing left to go back to
        let _ = nav.handle_message(key(KeyCode::Esc));
        assert_eq!(nav.current(Position::Left).unwrap().kind, PageKind::ModuleList);
    }

    #[test]
    fn revisiting_returns_cached_model() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let t1 = ResourceId::new(Kind::Task);
        let cmd = nav.navigate(task_page(t1)).unwrap();
        // init plus one resize per visible pane
        assert_eq!(cmd.execute().len(), 1);
        let _ = nav.handle_message(key(KeyCode::Char('m')));
        let cmd = nav.navigate(task_page(t1)).unwrap();
        assert!(cmd.execute().is_empty());
        assert_eq!(nav.cache().len(), 2);
    }

    #[test]
    fn history_is_bounded() {
        let log = Log::default();
        let mut nav = navigator(&log);
        for _ in 0..HISTORY_CAP + 10 {
            let _ = nav.navigate(task_page(ResourceId::new(Kind::Task))).unwrap();
        }
        assert_eq!(nav.history(Position::Left).len(), HISTORY_CAP);
    }

    #[test]
    fn failed_navigation_keeps_current_page() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let run = NavigationMsg::new(PageKind::Run).with_parent(ResourceId::new(Kind::Run));
        assert!(nav.navigate(run).is_err());
        assert_eq!(nav.current(Position::Left).unwrap().kind, PageKind::ModuleList);
        assert!(nav.history(Position::Left).is_empty());

        let _ = nav.handle_message(Msg::Navigate(run));
        assert!(matches!(nav.notice(), Some(Notice::Error(e)) if e.context == "opening run page"));
        // any key clears the notice
        let _ = nav.handle_message(key(KeyCode::Char('z')));
        assert!(nav.notice().is_none());
    }

    #[test]
    fn preview_does_not_take_focus() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let module = ResourceId::new(Kind::Module);
        let preview = NavigationMsg::new(PageKind::WorkspaceList)
            .with_parent(module)
            .with_position(Position::TopRight)
            .disable_focus();
        let _ = nav.navigate(preview).unwrap();
        assert_eq!(nav.current(Position::TopRight), Some(preview.page));
        assert_eq!(nav.focused(), Position::Left);
    }

    #[test]
    fn preview_into_focused_pane_is_ignored() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let preview = task_page(ResourceId::new(Kind::Task)).disable_focus();
        let _ = nav.navigate(preview).unwrap();
        assert_eq!(nav.current(Position::Left).unwrap().kind, PageKind::ModuleList);
    }

    #[test]
    fn hidden_panes_give_space_away() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let pane_height = HEIGHT - CHROME_HEIGHT;
        assert_eq!(nav.content_size(Position::Left), (WIDTH - 2, pane_height - 2));

        let top = NavigationMsg::new(PageKind::WorkspaceList)
            .with_parent(ResourceId::new(Kind::Module))
            .with_position(Position::TopRight);
        let _ = nav.navigate(top).unwrap();
        assert_eq!(nav.content_size(Position::Left), (DEFAULT_LEFT_PANE_WIDTH - 2, pane_height - 2));
        assert_eq!(
            nav.content_size(Position::TopRight),
            (WIDTH - DEFAULT_LEFT_PANE_WIDTH - 2, pane_height - 2)
        );

        let bottom = task_page(ResourceId::new(Kind::Task)).with_position(Position::BottomRight);
        let _ = nav.navigate(bottom).unwrap();
        assert_eq!(
            nav.content_size(Position::TopRight),
            (WIDTH - DEFAULT_LEFT_PANE_WIDTH - 2, DEFAULT_TOP_RIGHT_PANE_HEIGHT - 2)
        );
        assert_eq!(
            nav.content_size(Position::BottomRight),
            (
                WIDTH - DEFAULT_LEFT_PANE_WIDTH - 2,
                pane_height - DEFAULT_TOP_RIGHT_PANE_HEIGHT - 2
            )
        );
    }

    #[test]
    fn resize_reaches_current_models_only() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let _ = nav.navigate(task_page(ResourceId::new(Kind::Task))).unwrap();
        log.borrow_mut().clear();

        let _ = nav.handle_message(Msg::Resize {
            width: 100,
            height: 30,
        });
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!(matches!(
            log[0].1,
            Msg::PaneResize {
                width: 98,
                height: 22
            }
        ));
    }

    #[test]
    fn resource_events_reach_every_cached_model() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let _ = nav.navigate(task_page(ResourceId::new(Kind::Task))).unwrap();
        let _ = nav.handle_message(key(KeyCode::Char('l')));
        log.borrow_mut().clear();

        let event = Event::new(ChangeType::Created, Module::new("vpc"));
        let _ = nav.handle_message(Msg::Resource(event));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn deleting_current_page_falls_back_to_history() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let task = Task::new(["plan"]);
        let _ = nav.navigate(task_page(task.id)).unwrap();
        assert_eq!(nav.cache().len(), 2);

        let _ = nav.handle_message(Msg::Resource(Event::new(ChangeType::Deleted, task.clone())));
        assert_eq!(nav.current(Position::Left), Some(Page::new(PageKind::ModuleList)));
        assert!(nav.history(Position::Left).is_empty());
        assert_eq!(nav.cache().len(), 1);

        // the page is rebuilt on the next visit
        let cmd = nav.navigate(task_page(task.id)).unwrap();
        assert_eq!(cmd.execute().len(), 1);
    }

    #[test]
    fn deleting_right_pane_page_hides_it() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let task = Task::new(["apply"]);
        let _ = nav
            .navigate(task_page(task.id).with_position(Position::BottomRight))
            .unwrap();
        assert_eq!(nav.focused(), Position::BottomRight);

        let _ = nav.handle_message(Msg::Resource(Event::new(ChangeType::Deleted, task)));
        assert_eq!(nav.current(Position::BottomRight), None);
        assert_eq!(nav.focused(), Position::Left);
    }

    #[test]
    fn focus_cycles_visible_panes() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let bottom = task_page(ResourceId::new(Kind::Task)).with_position(Position::BottomRight);
        let _ = nav.navigate(bottom).unwrap();
        assert_eq!(nav.focused(), Position::BottomRight);

        let _ = nav.handle_message(key(KeyCode::Char(']')));
        assert_eq!(nav.focused(), Position::Left);
        let _ = nav.handle_message(key(KeyCode::Char('[')));
        assert_eq!(nav.focused(), Position::BottomRight);
    }

    #[test]
    fn split_resizing_respects_minimums() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let top = NavigationMsg::new(PageKind::WorkspaceList)
            .with_parent(ResourceId::new(Kind::Module))
            .with_position(Position::TopRight)
            .disable_focus();
        let _ = nav.navigate(top).unwrap();

        let _ = nav.handle_message(key(KeyCode::Char('>')));
        assert_eq!(nav.content_size(Position::Left).0, DEFAULT_LEFT_PANE_WIDTH + 1 - 2);
        for _ in 0..100 {
            let _ = nav.handle_message(key(KeyCode::Char('<')));
        }
        assert_eq!(nav.content_size(Position::Left).0, MIN_PANE_WIDTH - 2);
    }

    #[test]
    fn help_overlay_toggles() {
        let log = Log::default();
        let mut nav = navigator(&log);
        let _ = nav.handle_message(key(KeyCode::Char('?')));
        assert!(nav.show_help());
        // list keys do nothing while help is shown
        let _ = nav.handle_message(key(KeyCode::Char('T')));
        assert_eq!(nav.current(Position::Left).unwrap().kind, PageKind::ModuleList);
        let _ = nav.handle_message(key(KeyCode::Esc));
        assert!(!nav.show_help());
    }

    #[test]
    fn quit_message_and_key() {
        let log = Log::default();
        let mut nav = navigator(&log);
        assert!(!nav.should_quit());
        let _ = nav.handle_message(key(KeyCode::Char('q')));
        assert!(nav.should_quit());

        let mut nav = navigator(&log);
        let _ = nav.handle_message(Msg::Quit);
        assert!(nav.should_quit());
    }

    #[test]
    fn unhandled_keys_reach_focused_model() {
        let log = Log::default();
        let mut nav = navigator(&log);
        log.borrow_mut().clear();
        let _ = nav.handle_message(key(KeyCode::Char('j')));
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!(matches!(log[0].1, Msg::Key(_)));
    }

    #[test]
    fn render_shows_chrome_and_pane() {
        let log = Log::default();
        let nav = navigator(&log).with_task_counter(|| 2);
        let backend = TestBackend::new(WIDTH, HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let buf = terminal.draw(|frame| nav.render(frame)).unwrap();
        let row = |y: u16| -> String {
            (0..buf.area.width)
                .map(|x| buf.buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("? help"));
        assert!(row(HEADER_HEIGHT).contains(" module list "));
        assert!(row(HEADER_HEIGHT + 1).starts_with('┌'));
        assert!(row(HEADER_HEIGHT + 2).contains("global"));
        assert!(row(HEIGHT - 1).ends_with("2 running"));
    }

    #[test]
    fn render_help_overlay() {
        let log = Log::default();
        let mut nav = navigator(&log);
        nav.toggle_help();
        let backend = TestBackend::new(WIDTH, HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let buf = terminal.draw(|frame| nav.render(frame)).unwrap();
        let row: String = (0..buf.area.width)
            .map(|x| buf.buffer[(x, HEADER_HEIGHT + 1)].symbol().to_string())
            .collect();
        assert!(row.starts_with("Global"));
    }

    #[test]
    fn clamp_split_bounds() {
        assert_eq!(clamp_split(40, 1, 120, 20), 41);
        assert_eq!(clamp_split(20, -1, 120, 20), 20);
        assert_eq!(clamp_split(100, 1, 120, 20), 100);
        // too small for both minimums
        assert_eq!(clamp_split(30, 5, 30, 20), 20);
    }
}
