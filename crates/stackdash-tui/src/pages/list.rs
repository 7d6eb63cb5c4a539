use std::sync::Arc;

use ratatui::text::Text;

use stackdash_core::Payload;

use crate::cmd::Cmd;
use crate::keymap::Binding;
use crate::messages::Msg;
use crate::model::{BorderPosition, ChildModel};
use crate::styles::Theme;
use crate::table::{Table, TableItem};

type Loader = Arc<dyn Fn() -> Vec<Payload> + Send + Sync>;

/// A key handled by a list page, acting on its table.
pub struct ListAction<T: TableItem> {
    pub binding: Binding,
    run: Box<dyn Fn(&Table<T>) -> Cmd>,
}

/// A table of resources that loads its rows off the update loop.
pub struct ListModel<T: TableItem> {
    table: Table<T>,
    title: String,
    loader: Loader,
    actions: Vec<ListAction<T>>,
}

impl<T: TableItem> ListModel<T> {
    pub fn new<F>(table: Table<T>, title: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Vec<Payload> + Send + Sync + 'static,
    {
        Self {
            table,
            title: title.into(),
            loader: Arc::new(loader),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_action<F>(mut self, binding: Binding, run: F) -> Self
    where
        F: Fn(&Table<T>) -> Cmd + 'static,
    {
        self.actions.push(ListAction {
            binding,
            run: Box::new(run),
        });
        self
    }

    #[must_use]
    pub fn table(&self) -> &Table<T> {
        &self.table
    }

    /// Fetch every row in the background, addressed back to this table.
    fn load(&mut self) -> Cmd {
        self.table.begin_load();
        let loader = Arc::clone(&self.loader);
        let table = self.table.id();
        Cmd::task(move || {
            Some(Msg::BulkInsert {
                table,
                items: loader(),
            })
        })
    }
}

impl<T: TableItem> ChildModel for ListModel<T> {
    fn init(&mut self) -> Cmd {
        self.load()
    }

    fn update(&mut self, msg: &Msg) -> Cmd {
        if let Msg::Key(key) = msg {
            if !self.table.filter_focused() {
                if let Some(action) = self.actions.iter().find(|a| a.binding.matches(key)) {
                    return (action.run)(&self.table);
                }
            }
        }
        self.table.update(msg)
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        self.table.view(theme)
    }

    fn help_bindings(&self) -> Vec<Binding> {
        let mut bindings = self.table.bindings();
        bindings.extend(self.actions.iter().map(|a| a.binding));
        bindings
    }

    fn title(&self) -> Option<String> {
        Some(self.title.clone())
    }

    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        vec![(BorderPosition::TopMiddle, self.table.metadata())]
    }

    fn captures_input(&self) -> bool {
        self.table.filter_focused()
    }
}
