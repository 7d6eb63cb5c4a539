//! Table engine: an ordered, identity indexed set of rows with sorting,
//! filtering, selection and a scrolling viewport.
//!
//! Rows are kept in sort order at all times. [`Table::bulk_insert`] sorts once
//! after merging a batch; [`Table::upsert`] replaces a row in place and only
//! moves it when its new content breaks the order, inserting after any rows
//! that compare equal.
//!
//! A bulk load may arrive after resource events for the same ids. Ids touched
//! by an event while a load is pending keep the event's version.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use stackdash_core::{ChangeType, LogMessage, Module, Payload, Resource, ResourceId, Run, Task, Workspace};

use crate::cmd::Cmd;
use crate::columns::{layout, render_cell, Column};
use crate::keymap::{navigation, table as keys, Binding};
use crate::messages::{Msg, NavigationMsg};
use crate::model::{BorderPosition, ChildModel};
use crate::page::{PageKind, Position};
use crate::styles::Theme;

/// A resource that can be shown as a table row.
pub trait TableItem: Resource + Clone + 'static {
    /// Borrow the item out of an event payload of the matching kind.
    fn from_payload(payload: &Payload) -> Option<&Self>;

    /// Path of the module the item belongs to.
    fn module_path(&self) -> Option<&str> {
        None
    }

    /// Name of the workspace the item belongs to.
    fn workspace_name(&self) -> Option<&str> {
        None
    }
}

impl TableItem for Module {
    fn from_payload(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Module(m) => Some(m),
            _ => None,
        }
    }

    fn module_path(&self) -> Option<&str> {
        Some(&self.path)
    }
}

impl TableItem for Workspace {
    fn from_payload(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Workspace(w) => Some(w),
            _ => None,
        }
    }

    fn module_path(&self) -> Option<&str> {
        Some(&self.module_path)
    }

    fn workspace_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl TableItem for Run {
    fn from_payload(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Run(r) => Some(r),
            _ => None,
        }
    }

    fn module_path(&self) -> Option<&str> {
        Some(&self.module_path)
    }

    fn workspace_name(&self) -> Option<&str> {
        Some(&self.workspace_name)
    }
}

impl TableItem for Task {
    fn from_payload(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Task(t) => Some(t),
            _ => None,
        }
    }

    fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    fn workspace_name(&self) -> Option<&str> {
        self.workspace_name.as_deref()
    }
}

impl TableItem for LogMessage {
    fn from_payload(payload: &Payload) -> Option<&Self> {
        match payload {
            Payload::Log(l) => Some(l),
            _ => None,
        }
    }
}

/// Identifies one table instance, so that a bulk load reaches only the table
/// that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(u64);

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

impl TableId {
    fn next() -> Self {
        Self(NEXT_TABLE_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Cell text keyed by column key.
pub type RenderedRow = HashMap<&'static str, String>;

type Renderer<T> = Box<dyn Fn(&T) -> RenderedRow>;
type SortFn<T> = Box<dyn Fn(&T, &T) -> Ordering>;
type Predicate<T> = Box<dyn Fn(&T) -> bool>;

pub struct Row<T> {
    pub id: ResourceId,
    pub item: T,
    /// Untruncated cell text in column order.
    cells: Vec<String>,
}

#[derive(Debug, Default)]
struct TextFilter {
    text: String,
    focused: bool,
}

impl TextFilter {
    fn visible(&self) -> bool {
        self.focused || !self.text.is_empty()
    }
}

pub struct Table<T: TableItem> {
    id: TableId,
    columns: Vec<Column>,
    widths: Vec<u16>,
    renderer: Renderer<T>,
    sort: SortFn<T>,
    predicate: Option<Predicate<T>>,
    parent: Option<ResourceId>,
    selectable: bool,
    preview: Option<(PageKind, Position)>,

    rows: Vec<Row<T>>,
    /// Indices into `rows` that pass both filters, in row order.
    visible: Vec<usize>,
    selected: HashSet<ResourceId>,
    filter: TextFilter,
    /// Index into `visible`.
    cursor: usize,
    /// First visible row shown in the viewport.
    offset: usize,
    /// A bulk load was requested and has not arrived yet.
    loading: bool,
    /// Ids changed by resource events while loading. The load's copies of
    /// these are older and are skipped.
    touched: HashSet<ResourceId>,

    width: u16,
    height: u16,
}

impl<T: TableItem> Table<T> {
    /// Build a table.
    ///
    /// # Panics
    ///
    /// If two columns share a key.
    pub fn new<F>(columns: Vec<Column>, renderer: F, width: u16, height: u16) -> Self
    where
        F: Fn(&T) -> RenderedRow + 'static,
    {
        let mut keys = HashSet::new();
        for col in &columns {
            assert!(keys.insert(col.key), "duplicate column key {:?}", col.key);
        }
        let widths = layout(&columns, width);
        Self {
            id: TableId::next(),
            columns,
            widths,
            renderer: Box::new(renderer),
            sort: Box::new(|a: &T, b: &T| a.id().cmp(&b.id())),
            predicate: None,
            parent: None,
            selectable: true,
            preview: None,
            rows: Vec::new(),
            visible: Vec::new(),
            selected: HashSet::new(),
            filter: TextFilter::default(),
            cursor: 0,
            offset: 0,
            loading: true,
            touched: HashSet::new(),
            width,
            height,
        }
    }

    #[must_use]
    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.sort = Box::new(sort);
        self.rows.sort_by(|a, b| (self.sort)(&a.item, &b.item));
        self.refresh();
        self
    }

    #[must_use]
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        if !selectable {
            self.selected.clear();
        }
        self
    }

    /// Page shown for a row when it is activated or the cursor lands on it.
    #[must_use]
    pub fn with_preview(mut self, kind: PageKind, position: Position) -> Self {
        self.preview = Some((kind, position));
        self
    }

    #[must_use]
    pub fn with_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.set_filter(predicate);
        self
    }

    /// Accept only items that have `parent` as an ancestor.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<ResourceId>) -> Self {
        self.parent = parent;
        self
    }

    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Note that a bulk load is on its way. Until it arrives, resource events
    /// take precedence over the loaded items for the ids they touch.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.touched.clear();
    }

    /// Hide rows not matching `predicate`. Hidden rows keep their data.
    pub fn set_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self.refresh();
    }

    fn accepts(&self, item: &T) -> bool {
        self.parent.map_or(true, |parent| item.has_ancestor(parent))
    }

    fn render_cells(&self, item: &T) -> Vec<String> {
        let rendered = (self.renderer)(item);
        self.columns
            .iter()
            .map(|col| rendered.get(col.key).cloned().unwrap_or_default())
            .collect()
    }

    fn make_row(&self, item: T) -> Row<T> {
        Row {
            id: item.id(),
            cells: self.render_cells(&item),
            item,
        }
    }

    /// Render the rows in view again, so that time dependent cells keep up.
    fn rerender_viewport(&mut self) {
        let in_view: Vec<usize> = self
            .visible
            .iter()
            .skip(self.offset)
            .take(self.page_size())
            .copied()
            .collect();
        for i in in_view {
            let cells = self.render_cells(&self.rows[i].item);
            self.rows[i].cells = cells;
        }
    }

    fn position(&self, id: ResourceId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Merge a batch of items, replacing rows with the same identity, then
    /// sort once.
    pub fn bulk_insert(&mut self, items: impl IntoIterator<Item = T>) {
        let cursor = self.cursor_id();
        let mut index: HashMap<ResourceId, usize> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();
        for item in items {
            if !self.accepts(&item) {
                continue;
            }
            let row = self.make_row(item);
            match index.get(&row.id) {
                Some(&i) => self.rows[i] = row,
                None => {
                    index.insert(row.id, self.rows.len());
                    self.rows.push(row);
                }
            }
        }
        let sort = &self.sort;
        self.rows.sort_by(|a, b| sort(&a.item, &b.item));
        self.restore(cursor);
    }

    /// Insert or replace a single row.
    pub fn upsert(&mut self, item: T) {
        if !self.accepts(&item) {
            return;
        }
        let cursor = self.cursor_id();
        let row = self.make_row(item);
        match self.position(row.id) {
            Some(i) => {
                self.rows[i] = row;
                if !self.in_order(i) {
                    let row = self.rows.remove(i);
                    self.insert_sorted(row);
                }
            }
            None => self.insert_sorted(row),
        }
        self.restore(cursor);
    }

    /// Remove the row with `id`, if present.
    pub fn delete(&mut self, id: ResourceId) {
        let Some(i) = self.position(id) else {
            return;
        };
        let cursor = self.cursor_id();
        self.rows.remove(i);
        self.selected.remove(&id);
        self.restore(cursor);
    }

    fn in_order(&self, i: usize) -> bool {
        let item = &self.rows[i].item;
        let after_prev = i == 0 || (self.sort)(&self.rows[i - 1].item, item) != Ordering::Greater;
        let before_next = i + 1 >= self.rows.len()
            || (self.sort)(item, &self.rows[i + 1].item) != Ordering::Greater;
        after_prev && before_next
    }

    fn insert_sorted(&mut self, row: Row<T>) {
        let at = self
            .rows
            .partition_point(|r| (self.sort)(&r.item, &row.item) != Ordering::Greater);
        self.rows.insert(at, row);
    }

    /// Recompute the visible rows, keeping the cursor where it was.
    fn refresh(&mut self) {
        let cursor = self.cursor_id();
        self.restore(cursor);
    }

    fn restore(&mut self, cursor: Option<ResourceId>) {
        let needle = self.filter.text.to_lowercase();
        self.visible = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.predicate.as_ref().map_or(true, |p| p(&row.item)))
            .filter(|(_, row)| {
                needle.is_empty() || row.cells.iter().any(|c| c.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();

        let existing: HashSet<ResourceId> = self.rows.iter().map(|r| r.id).collect();
        self.selected.retain(|id| existing.contains(id));

        if let Some(pos) = cursor.and_then(|id| {
            self.visible
                .iter()
                .position(|&i| self.rows[i].id == id)
        }) {
            self.cursor = pos;
        } else {
            self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
        }
        self.scroll_to_cursor();
    }

    /// Rows available for data, below the header and filter line.
    fn page_size(&self) -> usize {
        let chrome = 1 + u16::from(self.filter.visible());
        usize::from(self.height.saturating_sub(chrome)).max(1)
    }

    /// Scroll the minimum amount that brings the cursor into view.
    fn scroll_to_cursor(&mut self) {
        let page = self.page_size();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
        let max_offset = self.visible.len().saturating_sub(page);
        self.offset = self.offset.min(max_offset);
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.widths = layout(&self.columns, width);
        self.scroll_to_cursor();
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Column widths for the current width.
    #[must_use]
    pub fn widths(&self) -> &[u16] {
        &self.widths
    }

    /// Every row in sort order, hidden ones included.
    pub fn rows(&self) -> impl Iterator<Item = &Row<T>> {
        self.rows.iter()
    }

    /// Rows passing the filters, in sort order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row<T>> {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    #[must_use]
    pub fn current_row(&self) -> Option<&Row<T>> {
        self.visible.get(self.cursor).map(|&i| &self.rows[i])
    }

    fn cursor_id(&self) -> Option<ResourceId> {
        self.current_row().map(|r| r.id)
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn is_selected(&self, id: ResourceId) -> bool {
        self.selected.contains(&id)
    }

    /// The selected rows in row order, or the cursor row when nothing is
    /// selected.
    #[must_use]
    pub fn selected_or_current(&self) -> Vec<ResourceId> {
        if self.selected.is_empty() {
            return self.cursor_id().into_iter().collect();
        }
        self.rows
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .map(|r| r.id)
            .collect()
    }

    /// Toggle selection of the cursor row.
    pub fn toggle_selection(&mut self) {
        if !self.selectable {
            return;
        }
        if let Some(id) = self.cursor_id() {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        }
    }

    /// Select every visible row, or clear the selection if they are all
    /// selected already.
    pub fn toggle_select_all(&mut self) {
        if !self.selectable {
            return;
        }
        let visible: Vec<ResourceId> = self.visible_rows().map(|r| r.id).collect();
        if visible.iter().all(|id| self.selected.contains(id)) {
            self.selected.clear();
        } else {
            self.selected.extend(visible);
        }
    }

    /// `visible/total` row counts.
    #[must_use]
    pub fn metadata(&self) -> String {
        format!("{}/{}", self.visible.len(), self.rows.len())
    }

    #[must_use]
    pub fn filter_text(&self) -> &str {
        &self.filter.text
    }

    #[must_use]
    pub fn filter_focused(&self) -> bool {
        self.filter.focused
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter.text = text.into();
        self.refresh();
    }

    fn move_cursor(&mut self, to: usize) {
        self.cursor = to.min(self.visible.len().saturating_sub(1));
        self.scroll_to_cursor();
    }

    fn navigation(&self, focus: bool) -> Cmd {
        let (Some((kind, position)), Some(row)) = (self.preview, self.current_row()) else {
            return Cmd::none();
        };
        let nav = NavigationMsg::new(kind)
            .with_parent(row.id)
            .with_position(position);
        if focus {
            Cmd::msg(nav)
        } else {
            Cmd::msg(nav.disable_focus())
        }
    }

    fn handle_filter_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter = TextFilter::default();
            }
            KeyCode::Enter => self.filter.focused = false,
            KeyCode::Backspace => {
                self.filter.text.pop();
            }
            KeyCode::Char(c) => self.filter.text.push(c),
            _ => return,
        }
        self.refresh();
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Cmd {
        if self.filter.focused {
            self.handle_filter_key(key);
            return Cmd::none();
        }
        let before = self.cursor_id();
        let page = self.page_size();
        if navigation::UP.matches(key) {
            self.move_cursor(self.cursor.saturating_sub(1));
        } else if navigation::DOWN.matches(key) {
            self.move_cursor(self.cursor + 1);
        } else if navigation::PAGE_UP.matches(key) {
            self.move_cursor(self.cursor.saturating_sub(page));
        } else if navigation::PAGE_DOWN.matches(key) {
            self.move_cursor(self.cursor + page);
        } else if navigation::HOME.matches(key) {
            self.move_cursor(0);
        } else if navigation::END.matches(key) {
            self.move_cursor(usize::MAX);
        } else if keys::FILTER.matches(key) {
            self.filter.focused = true;
            self.scroll_to_cursor();
        } else if keys::SELECT.matches(key) {
            self.toggle_selection();
        } else if keys::SELECT_ALL.matches(key) {
            self.toggle_select_all();
        } else if keys::ENTER.matches(key) {
            return self.navigation(true);
        }
        if self.cursor_id() == before {
            Cmd::none()
        } else {
            self.navigation(false)
        }
    }

    /// Apply a message.
    pub fn update(&mut self, msg: &Msg) -> Cmd {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::PaneResize { width, height } => {
                self.set_size(*width, *height);
                Cmd::none()
            }
            Msg::Resource(event) => {
                if let Some(item) = T::from_payload(&event.payload) {
                    if self.loading {
                        self.touched.insert(item.id());
                    }
                    match event.change {
                        ChangeType::Deleted => self.delete(item.id()),
                        ChangeType::Created | ChangeType::Updated => self.upsert(item.clone()),
                    }
                }
                Cmd::none()
            }
            Msg::Tick => {
                self.rerender_viewport();
                Cmd::none()
            }
            Msg::BulkInsert { table, items } if *table == self.id => {
                let before = self.cursor_id();
                let touched = std::mem::take(&mut self.touched);
                self.loading = false;
                self.bulk_insert(
                    items
                        .iter()
                        .filter_map(T::from_payload)
                        .filter(|item| !touched.contains(&item.id()))
                        .cloned(),
                );
                if before.is_none() && self.cursor_id().is_some() {
                    self.navigation(false)
                } else {
                    Cmd::none()
                }
            }
            _ => Cmd::none(),
        }
    }

    /// Render the header, the filter line when active, and the rows in view.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> Text<'static> {
        let mut lines = Vec::with_capacity(self.page_size() + 2);

        let header: String = self
            .columns
            .iter()
            .zip(&self.widths)
            .map(|(col, &w)| render_cell(col, col.title, w))
            .collect();
        lines.push(Line::styled(header, theme.header_style()));

        if self.filter.visible() {
            let cursor = if self.filter.focused { "█" } else { "" };
            lines.push(Line::from(vec![
                Span::styled("Filter: ", theme.muted_style()),
                Span::raw(format!("{}{cursor}", self.filter.text)),
            ]));
        }

        for (n, &i) in self
            .visible
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.page_size())
        {
            let row = &self.rows[i];
            let text: String = self
                .columns
                .iter()
                .zip(&self.widths)
                .zip(&row.cells)
                .map(|((col, &w), cell)| render_cell(col, cell, w))
                .collect();
            let style: Style = theme.row_style(n == self.cursor, self.selected.contains(&row.id));
            lines.push(Line::styled(text, style));
        }
        Text::from(lines)
    }

    /// Bindings the table itself handles.
    #[must_use]
    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings = Vec::new();
        if self.preview.is_some() {
            bindings.push(keys::ENTER);
        }
        bindings.push(keys::FILTER);
        if self.selectable {
            bindings.push(keys::SELECT);
            bindings.push(keys::SELECT_ALL);
        }
        bindings
    }
}

impl<T: TableItem> ChildModel for Table<T> {
    fn init(&mut self) -> Cmd {
        Cmd::none()
    }

    fn update(&mut self, msg: &Msg) -> Cmd {
        Table::update(self, msg)
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        Table::view(self, theme)
    }

    fn help_bindings(&self) -> Vec<Binding> {
        self.bindings()
    }

    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        vec![(BorderPosition::TopMiddle, self.metadata())]
    }

    fn captures_input(&self) -> bool {
        self.filter.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use stackdash_core::{Event, LogLevel};

    fn log(message: &str) -> LogMessage {
        LogMessage::new(LogLevel::Info, message)
    }

    fn log_table(height: u16) -> Table<LogMessage> {
        Table::new(
            vec![
                Column::fixed("serial", "SERIAL", 8),
                Column::flex("message", "MESSAGE", 1),
            ],
            |m: &LogMessage| {
                RenderedRow::from([
                    ("serial", m.serial().to_string()),
                    ("message", m.message.clone()),
                ])
            },
            40,
            height,
        )
        .with_sort(|a: &LogMessage, b: &LogMessage| b.serial().cmp(&a.serial()))
    }

    fn order(table: &Table<LogMessage>) -> Vec<ResourceId> {
        table.rows().map(|r| r.id).collect()
    }

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    #[should_panic(expected = "duplicate column key")]
    fn duplicate_keys_panic() {
        let _ = Table::<Module>::new(
            vec![Column::fixed("a", "A", 1), Column::fixed("a", "B", 1)],
            |_: &Module| RenderedRow::new(),
            10,
            10,
        );
    }

    #[test]
    fn bulk_insert_sorts() {
        let mut table = log_table(10);
        let (a, b, c) = (log("a"), log("b"), log("c"));
        table.bulk_insert([b.clone(), a.clone(), c.clone()]);
        assert_eq!(order(&table), vec![c.id, b.id, a.id]);
        assert_eq!(table.metadata(), "3/3");
    }

    #[test]
    fn bulk_insert_replaces_existing() {
        let mut table = log_table(10);
        let mut a = log("a");
        table.bulk_insert([a.clone()]);
        a.message = "changed".into();
        table.bulk_insert([a.clone()]);
        assert_eq!(table.rows().count(), 1);
        assert_eq!(table.current_row().unwrap().item.message, "changed");
    }

    #[test]
    fn upsert_higher_serial_moves_to_front() {
        let mut table = log_table(10);
        let (a, b) = (log("a"), log("b"));
        table.bulk_insert([a.clone(), b.clone()]);
        let c = log("c");
        table.upsert(c.clone());
        assert_eq!(order(&table), vec![c.id, b.id, a.id]);
    }

    #[test]
    fn upsert_same_key_keeps_position() {
        let mut table = log_table(10);
        let (a, mut b, c) = (log("a"), log("b"), log("c"));
        table.bulk_insert([a.clone(), b.clone(), c.clone()]);
        b.message = "b2".into();
        table.upsert(b.clone());
        assert_eq!(order(&table), vec![c.id, b.id, a.id]);
        assert_eq!(table.rows().nth(1).unwrap().item.message, "b2");
    }

    #[test]
    fn upsert_unknown_is_insert() {
        let mut table = log_table(10);
        let a = log("a");
        table.upsert(a.clone());
        assert_eq!(order(&table), vec![a.id]);
    }

    #[test]
    fn delete_missing_is_noop() {
        let mut table = log_table(10);
        let a = log("a");
        table.bulk_insert([a.clone()]);
        table.delete(log("ghost").id);
        assert_eq!(order(&table), vec![a.id]);
        table.delete(a.id);
        assert!(table.current_row().is_none());
    }

    #[test]
    fn filter_hides_without_discarding() {
        let mut table = log_table(10);
        let (a, b) = (log("keep"), log("drop"));
        table.bulk_insert([a.clone(), b.clone()]);
        table.set_filter(|m: &LogMessage| m.message == "keep");
        assert_eq!(table.metadata(), "1/2");
        // filter reapplied on mutation
        table.upsert(log("drop too"));
        assert_eq!(table.metadata(), "1/3");
    }

    #[test]
    fn text_filter_is_case_insensitive() {
        let mut table = log_table(10);
        table.bulk_insert([log("Plan finished"), log("apply started")]);
        table.set_filter_text("PLAN");
        assert_eq!(table.metadata(), "1/2");
        assert_eq!(table.current_row().unwrap().item.message, "Plan finished");
    }

    #[test]
    fn filter_keys_are_captured() {
        let mut table = log_table(10);
        table.bulk_insert([log("alpha"), log("beta")]);
        let _ = table.update(&key(KeyCode::Char('/')));
        assert!(table.captures_input());
        for c in "bet".chars() {
            let _ = table.update(&key(KeyCode::Char(c)));
        }
        assert_eq!(table.filter_text(), "bet");
        assert_eq!(table.metadata(), "1/2");

        let _ = table.update(&key(KeyCode::Enter));
        assert!(!table.captures_input());
        assert_eq!(table.filter_text(), "bet");

        let _ = table.update(&key(KeyCode::Char('/')));
        let _ = table.update(&key(KeyCode::Esc));
        assert_eq!(table.filter_text(), "");
        assert_eq!(table.metadata(), "2/2");
    }

    #[test]
    fn cursor_follows_row_identity() {
        let mut table = log_table(10);
        let (a, b) = (log("a"), log("b"));
        table.bulk_insert([a.clone(), b.clone()]);
        // rows: b, a; move to a
        let _ = table.update(&key(KeyCode::Down));
        assert_eq!(table.current_row().unwrap().id, a.id);
        table.upsert(log("c"));
        assert_eq!(table.current_row().unwrap().id, a.id);
        assert_eq!(table.cursor(), 2);
    }

    #[test]
    fn cursor_clamps_after_delete() {
        let mut table = log_table(10);
        let (a, b) = (log("a"), log("b"));
        table.bulk_insert([a.clone(), b.clone()]);
        let _ = table.update(&key(KeyCode::End));
        assert_eq!(table.current_row().unwrap().id, a.id);
        table.delete(a.id);
        assert_eq!(table.current_row().unwrap().id, b.id);
    }

    #[test]
    fn viewport_scrolls_minimally() {
        // header plus three data rows
        let mut table = log_table(4);
        let items: Vec<_> = (0..10).map(|i| log(&i.to_string())).collect();
        table.bulk_insert(items);
        for _ in 0..3 {
            let _ = table.update(&key(KeyCode::Down));
        }
        assert_eq!(table.cursor(), 3);
        assert_eq!(table.offset(), 1);
        let _ = table.update(&key(KeyCode::Up));
        assert_eq!(table.offset(), 1);
        let _ = table.update(&key(KeyCode::Up));
        let _ = table.update(&key(KeyCode::Up));
        assert_eq!(table.offset(), 0);
    }

    #[test]
    fn view_renders_visible_slice() {
        let mut table = log_table(3);
        table.bulk_insert((0..5).map(|i| log(&format!("msg{i}"))));
        let text = table.view(&Theme::default());
        assert_eq!(text.lines.len(), 3);
        let header: String = text.lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(header.starts_with("SERIAL"));
        assert_eq!(header.chars().count(), 40);
        let first: String = text.lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.contains("msg4"));
    }

    #[test]
    fn selection_toggles() {
        let mut table = log_table(10);
        let (a, b) = (log("a"), log("b"));
        table.bulk_insert([a.clone(), b.clone()]);
        assert_eq!(table.selected_or_current(), vec![b.id]);

        let _ = table.update(&key(KeyCode::Char(' ')));
        let _ = table.update(&key(KeyCode::Down));
        let _ = table.update(&key(KeyCode::Char(' ')));
        assert_eq!(table.selected_or_current(), vec![b.id, a.id]);

        table.delete(b.id);
        assert_eq!(table.selected_or_current(), vec![a.id]);
        assert!(!table.is_selected(b.id));
    }

    #[test]
    fn select_all_toggles_visible() {
        let mut table = log_table(10);
        table.bulk_insert([log("a"), log("b"), log("c")]);
        let ctrl_a = Msg::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        let _ = table.update(&ctrl_a);
        assert_eq!(table.selected_or_current().len(), 3);
        let _ = table.update(&ctrl_a);
        assert_eq!(table.selected_or_current().len(), 1);
    }

    #[test]
    fn unselectable_table_ignores_selection() {
        let mut table = log_table(10).with_selectable(false);
        table.bulk_insert([log("a")]);
        let _ = table.update(&key(KeyCode::Char(' ')));
        assert!(table.selected.is_empty());
        assert!(!table.bindings().contains(&keys::SELECT));
    }

    #[test]
    fn enter_navigates_to_preview() {
        let mut table = log_table(10).with_preview(PageKind::Log, Position::BottomRight);
        let a = log("a");
        table.bulk_insert([a.clone()]);
        let msgs = table.update(&key(KeyCode::Enter)).execute();
        match msgs.as_slice() {
            [Msg::Navigate(nav)] => {
                assert_eq!(nav.page.kind, PageKind::Log);
                assert_eq!(nav.page.parent, Some(a.id));
                assert_eq!(nav.page.position, Position::BottomRight);
                assert!(!nav.disable_focus);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cursor_move_previews_without_focus() {
        let mut table = log_table(10).with_preview(PageKind::Log, Position::BottomRight);
        let (a, b) = (log("a"), log("b"));
        table.bulk_insert([a.clone(), b.clone()]);
        let msgs = table.update(&key(KeyCode::Down)).execute();
        match msgs.as_slice() {
            [Msg::Navigate(nav)] => {
                assert_eq!(nav.page.parent, Some(a.id));
                assert!(nav.disable_focus);
            }
            other => panic!("unexpected {other:?}"),
        }
        // already at the bottom: no move, no preview
        assert!(table.update(&key(KeyCode::Down)).is_none());
    }

    #[test]
    fn bulk_insert_message_is_addressed() {
        let mut mine = log_table(10);
        let mut other = log_table(10);
        let msg = Msg::BulkInsert {
            table: mine.id(),
            items: vec![Payload::from(log("a"))],
        };
        let _ = mine.update(&msg);
        let _ = other.update(&msg);
        assert_eq!(mine.metadata(), "1/1");
        assert_eq!(other.metadata(), "0/0");
    }

    #[test]
    fn ticks_rerender_rows_in_view() {
        use std::cell::Cell;
        use std::rc::Rc;

        let renders = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renders);
        let mut table = Table::new(
            vec![Column::flex("n", "N", 1)],
            move |_: &LogMessage| {
                counter.set(counter.get() + 1);
                RenderedRow::from([("n", counter.get().to_string())])
            },
            20,
            3,
        );
        for m in ["a", "b", "c"] {
            table.upsert(log(m));
        }
        assert_eq!(renders.get(), 3);

        let _ = table.update(&Msg::Tick);
        // Height 3 leaves two data rows under the header.
        assert_eq!(renders.get(), 5);
        let text = table.view(&Theme::default());
        assert_eq!(text.lines[1].spans[0].content.trim_end(), "4");
        assert_eq!(text.lines[2].spans[0].content.trim_end(), "5");
    }

    #[test]
    fn late_load_does_not_restore_deleted_rows() {
        let mut table = log_table(10);
        let a = log("a");
        let b = log("b");
        let load = Msg::BulkInsert {
            table: table.id(),
            items: vec![Payload::from(a.clone()), Payload::from(b.clone())],
        };
        let _ = table.update(&Msg::Resource(Event::new(ChangeType::Deleted, a)));
        let _ = table.update(&load);
        assert_eq!(table.metadata(), "1/1");
        assert_eq!(order(&table), vec![b.id]);
    }

    #[test]
    fn late_load_does_not_overwrite_updates() {
        let mut table = log_table(10);
        let mut a = log("old");
        let load = Msg::BulkInsert {
            table: table.id(),
            items: vec![Payload::from(a.clone())],
        };
        a.message = "new".to_string();
        let _ = table.update(&Msg::Resource(Event::new(ChangeType::Updated, a)));
        let _ = table.update(&load);
        let messages: Vec<_> = table.rows().map(|r| r.item.message.clone()).collect();
        assert_eq!(messages, ["new"]);
    }

    #[test]
    fn events_after_the_load_apply_normally() {
        let mut table = log_table(10);
        let a = log("a");
        let _ = table.update(&Msg::BulkInsert {
            table: table.id(),
            items: vec![Payload::from(a.clone())],
        });
        let _ = table.update(&Msg::Resource(Event::new(ChangeType::Deleted, a.clone())));
        assert_eq!(table.metadata(), "0/0");

        table.begin_load();
        let _ = table.update(&Msg::Resource(Event::new(ChangeType::Created, log("b"))));
        let _ = table.update(&Msg::BulkInsert {
            table: table.id(),
            items: vec![Payload::from(a)],
        });
        assert_eq!(table.metadata(), "2/2");
    }

    #[test]
    fn resource_events_upsert_and_delete() {
        let mut table = log_table(10);
        let a = log("a");
        let _ = table.update(&Msg::Resource(Event::new(ChangeType::Created, a.clone())));
        assert_eq!(table.metadata(), "1/1");
        let _ = table.update(&Msg::Resource(Event::new(ChangeType::Deleted, a)));
        assert_eq!(table.metadata(), "0/0");
        // other kinds are ignored
        let _ = table.update(&Msg::Resource(Event::new(
            ChangeType::Created,
            Module::new("m"),
        )));
        assert_eq!(table.metadata(), "0/0");
    }

    #[test]
    fn parent_scope_rejects_unrelated_items() {
        let a = Module::new("a");
        let b = Module::new("b");
        let mut table = Table::new(
            vec![Column::flex("name", "NAME", 1)],
            |w: &Workspace| RenderedRow::from([("name", w.name.clone())]),
            20,
            10,
        )
        .with_parent(Some(a.id));
        table.upsert(Workspace::new(&a, "default"));
        table.upsert(Workspace::new(&b, "default"));
        assert_eq!(table.metadata(), "1/1");
    }

    #[test]
    fn resize_relayouts_columns() {
        let mut table = log_table(10);
        assert_eq!(table.widths(), &[8, 32]);
        let _ = table.update(&Msg::PaneResize {
            width: 20,
            height: 5,
        });
        assert_eq!(table.widths(), &[8, 12]);
        assert_eq!(table.size(), (20, 5));
    }
}
