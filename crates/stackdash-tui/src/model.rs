//! The seams between the navigator and the page models it hosts.

use ratatui::text::Text;

use stackdash_core::ResourceId;

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::keymap::Binding;
use crate::messages::Msg;
use crate::styles::Theme;

/// Where on a pane border a label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderPosition {
    TopLeft,
    TopMiddle,
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

/// A page model hosted in a pane or a tab.
///
/// Models are owned by the update loop and only change through
/// [`update`](ChildModel::update). Work that would block is returned as a
/// [`Cmd`] for the loop to run elsewhere.
pub trait ChildModel {
    fn init(&mut self) -> Cmd;

    fn update(&mut self, msg: &Msg) -> Cmd;

    fn view(&self, theme: &Theme) -> Text<'static>;

    /// Bindings the model handles, for the help views.
    fn help_bindings(&self) -> Vec<Binding> {
        Vec::new()
    }

    /// Shown in the title rule while the model's pane has focus.
    fn title(&self) -> Option<String> {
        None
    }

    /// Labels drawn on the pane border.
    fn border_text(&self) -> Vec<(BorderPosition, String)> {
        Vec::new()
    }

    /// Status shown beside the model's heading when it is a tab.
    fn tab_status(&self) -> Option<String> {
        None
    }

    /// Whether the model wants raw keys, e.g. while a text input has focus.
    fn captures_input(&self) -> bool {
        false
    }
}

/// Builds the model for a page from its parent resource and content size.
pub trait Maker {
    fn make(
        &self,
        parent: Option<ResourceId>,
        width: u16,
        height: u16,
    ) -> Result<Box<dyn ChildModel>, TuiError>;
}

impl<F> Maker for F
where
    F: Fn(Option<ResourceId>, u16, u16) -> Result<Box<dyn ChildModel>, TuiError>,
{
    fn make(
        &self,
        parent: Option<ResourceId>,
        width: u16,
        height: u16,
    ) -> Result<Box<dyn ChildModel>, TuiError> {
        self(parent, width, height)
    }
}

/// Minimal models for exercising the containers.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records every message it receives.
    pub struct Recorder {
        pub name: String,
        pub log: Log,
        pub size: (u16, u16),
    }

    impl ChildModel for Recorder {
        fn init(&mut self) -> Cmd {
            Cmd::msg(Msg::Info(format!("{} ready", self.name)))
        }

        fn update(&mut self, msg: &Msg) -> Cmd {
            if let Msg::PaneResize { width, height } = msg {
                self.size = (*width, *height);
            }
            self.log.borrow_mut().push((self.name.clone(), msg.clone()));
            Cmd::none()
        }

        fn view(&self, _theme: &Theme) -> Text<'static> {
            Text::raw(format!("{} {}x{}", self.name, self.size.0, self.size.1))
        }

        fn tab_status(&self) -> Option<String> {
            Some("ok".into())
        }
    }

    pub type Log = Rc<RefCell<Vec<(String, Msg)>>>;

    /// A maker producing [`Recorder`]s named after their parent.
    pub fn recorder_maker(log: &Log) -> impl Maker {
        let log = Rc::clone(log);
        move |parent: Option<ResourceId>, width: u16, height: u16| -> Result<Box<dyn ChildModel>, TuiError> {
            Ok(Box::new(Recorder {
                name: parent.map_or_else(|| "global".to_string(), |id| id.to_string()),
                log: Rc::clone(&log),
                size: (width, height),
            }))
        }
    }
}
