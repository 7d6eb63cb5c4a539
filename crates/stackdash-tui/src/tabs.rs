//! Tab set: named child models with one active at a time.

use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use stackdash_core::ResourceId;

use crate::cmd::Cmd;
use crate::columns::truncate;
use crate::dimensions::TAB_HEADER_HEIGHT;
use crate::error::TuiError;
use crate::keymap::{navigation, Binding};
use crate::messages::Msg;
use crate::model::{BorderPosition, ChildModel, Maker};
use crate::styles::Theme;

pub struct Tab {
    pub title: String,
    model: Box<dyn ChildModel>,
}

impl Tab {
    #[must_use]
    pub fn model(&self) -> &dyn ChildModel {
        self.model.as_ref()
    }

    fn heading(&self) -> String {
        match self.model.tab_status() {
            Some(status) => format!("{} {status}", self.title),
            None => self.title.clone(),
        }
    }
}

pub struct TabSet {
    tabs: Vec<Tab>,
    active: usize,
    width: u16,
    /// Height allotted to the whole set, headings included.
    height: u16,
    /// Shown right aligned in the space after the headings.
    info: Option<String>,
}

impl TabSet {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            tabs: Vec::new(),
            active: 0,
            width,
            height,
            info: None,
        }
    }

    pub fn set_info(&mut self, info: Option<String>) {
        self.info = info;
    }

    #[must_use]
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    fn content_height(&self) -> u16 {
        self.height.saturating_sub(TAB_HEADER_HEIGHT)
    }

    /// Build a tab's model with `maker` and append it. Returns the model's
    /// initialization work.
    pub fn add_tab(
        &mut self,
        maker: &dyn Maker,
        parent: Option<ResourceId>,
        title: impl Into<String>,
    ) -> Result<Cmd, TuiError> {
        let title = title.into();
        if self.tabs.iter().any(|t| t.title == title) {
            return Err(TuiError::DuplicateTab(title));
        }
        let mut model = maker.make(parent, self.width, self.content_height())?;
        let cmd = model.init();
        self.tabs.push(Tab { title, model });
        Ok(cmd)
    }

    /// Select a tab by index, clamped into range.
    pub fn set_active_tab(&mut self, index: isize) {
        let last = self.tabs.len().saturating_sub(1);
        self.active = usize::try_from(index).map_or(0, |i| i.min(last));
    }

    /// Select the tab with `title`. Unknown titles are ignored.
    pub fn set_active_tab_with_title(&mut self, title: &str) {
        if let Some(i) = self.tabs.iter().position(|t| t.title == title) {
            self.active = i;
        }
    }

    pub fn activate_last(&mut self) {
        self.active = self.tabs.len().saturating_sub(1);
    }

    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(|t| t.title.as_str())
    }

    fn next(&mut self) {
        if !self.tabs.is_empty() {
            self.active = (self.active + 1) % self.tabs.len();
        }
    }

    fn prev(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    fn broadcast(&mut self, msg: &Msg) -> Cmd {
        Cmd::batch(self.tabs.iter_mut().map(|t| t.model.update(msg)))
    }
}

impl ChildModel for TabSet {
    fn init(&mut self) -> Cmd {
        Cmd::none()
    }

    fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::Key(key) => {
                let captured = self
                    .active_tab()
                    .is_some_and(|t| t.model.captures_input());
                if !captured && navigation::TAB_NEXT.matches(key) {
                    self.next();
                    Cmd::none()
                } else if !captured && navigation::TAB_PREV.matches(key) {
                    self.prev();
                    Cmd::none()
                } else {
                    let active = self.active;
                    self.tabs
                        .get_mut(active)
                        .map_or_else(Cmd::none, |t| t.model.update(msg))
                }
            }
            Msg::PaneResize { width, height } => {
                self.width = *width;
                self.height = *height;
                let relay = Msg::PaneResize {
                    width: self.width,
                    height: self.content_height(),
                };
                self.broadcast(&relay)
            }
            _ => self.broadcast(msg),
        }
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        let mut headings = Vec::new();
        let mut underline = Vec::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            let heading = tab.heading();
            let width = heading.width();
            if i == self.active {
                headings.push(Span::styled(heading, theme.active_tab_style()));
                underline.push(Span::styled("━".repeat(width), theme.active_tab_style()));
            } else {
                headings.push(Span::styled(heading, theme.inactive_tab_style()));
                underline.push(Span::styled("─".repeat(width), theme.muted_style()));
            }
            headings.push(Span::raw("  "));
            underline.push(Span::styled("──", theme.muted_style()));
        }

        if let Some(info) = &self.info {
            let used: usize = headings.iter().map(|s| s.content.width()).sum();
            let remaining = usize::from(self.width).saturating_sub(used);
            if remaining > 0 {
                let info = truncate(info, remaining);
                let pad = remaining - info.width();
                headings.push(Span::styled(
                    format!("{}{info}", " ".repeat(pad)),
                    theme.muted_style(),
                ));
                underline.push(Span::styled("─".repeat(remaining), theme.muted_style()));
            }
        }

        let mut lines = vec![Line::from(headings), Line::from(underline)];
        if let Some(tab) = self.active_tab() {
            lines.extend(tab.model.view(theme).lines);
        }
        Text::from(lines)
    }

    fn help_bindings(&self) -> Vec<Binding> {
        let mut bindings = vec![navigation::TAB_NEXT, navigation::TAB_PREV];
        if let Some(tab) = self.active_tab() {
            bindings.extend(tab.model.help_bindings());
        }
        bindings
    }

    fn title(&self) -> Option<String> {
        self.active_tab().and_then(|t| t.model.title())
    }

    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        self.active_tab()
            .map(|t| t.model.border_text())
            .unwrap_or_default()
    }

    fn captures_input(&self) -> bool {
        self.active_tab().is_some_and(|t| t.model.captures_input())
    }
}
