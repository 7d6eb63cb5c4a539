//! Navigation targets.

use std::fmt;

use stackdash_core::ResourceId;

/// The kinds of page a pane can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKind {
    ModuleList,
    WorkspaceList,
    RunList,
    TaskList,
    Run,
    Task,
    LogList,
    Log,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ModuleList => "module list",
            Self::WorkspaceList => "workspace list",
            Self::RunList => "run list",
            Self::TaskList => "task list",
            Self::Run => "run",
            Self::Task => "task",
            Self::LogList => "log list",
            Self::Log => "log",
        };
        f.write_str(s)
    }
}

/// Screen region hosting a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Position {
    #[default]
    Left,
    TopRight,
    BottomRight,
}

impl Position {
    /// Every position in focus-cycling order.
    pub const ALL: [Self; 3] = [Self::Left, Self::TopRight, Self::BottomRight];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
        }
    }
}

/// An addressable page. Two pages are the same page iff all three fields
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Page {
    pub kind: PageKind,
    pub parent: Option<ResourceId>,
    pub position: Position,
}

impl Page {
    #[must_use]
    pub fn new(kind: PageKind) -> Self {
        Self {
            kind,
            parent: None,
            position: Position::default(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ResourceId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackdash_core::Kind;
    use std::collections::HashSet;

    #[test]
    fn identity_uses_all_fields() {
        let id = ResourceId::new(Kind::Task);
        let a = Page::new(PageKind::Task).with_parent(id);
        let b = a.with_position(Position::BottomRight);
        let c = Page::new(PageKind::Task).with_parent(id);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(a, c);
        assert_ne!(a, b);
    }

    #[test]
    fn position_indices_are_distinct() {
        let indices: HashSet<_> = Position::ALL.iter().map(|p| p.index()).collect();
        assert_eq!(indices.len(), Position::ALL.len());
    }
}
