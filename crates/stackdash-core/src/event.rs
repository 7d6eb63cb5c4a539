//! Typed change notifications.

use crate::resource::{Kind, LogMessage, Module, Resource, ResourceId, Run, Task, Workspace};

/// What happened to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Created,
    Updated,
    Deleted,
}

/// The resource carried by an event.
#[derive(Debug, Clone)]
pub enum Payload {
    Module(Module),
    Workspace(Workspace),
    Run(Run),
    Task(Task),
    Log(LogMessage),
}

impl Payload {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Module(_) => Kind::Module,
            Self::Workspace(_) => Kind::Workspace,
            Self::Run(_) => Kind::Run,
            Self::Task(_) => Kind::Task,
            Self::Log(_) => Kind::Log,
        }
    }

    fn inner(&self) -> &dyn Resource {
        match self {
            Self::Module(m) => m,
            Self::Workspace(w) => w,
            Self::Run(r) => r,
            Self::Task(t) => t,
            Self::Log(l) => l,
        }
    }
}

impl Resource for Payload {
    fn id(&self) -> ResourceId {
        self.inner().id()
    }

    fn module(&self) -> Option<ResourceId> {
        self.inner().module()
    }

    fn workspace(&self) -> Option<ResourceId> {
        self.inner().workspace()
    }

    fn run(&self) -> Option<ResourceId> {
        self.inner().run()
    }

    fn task(&self) -> Option<ResourceId> {
        self.inner().task()
    }
}

macro_rules! impl_from_record {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Payload {
            fn from(r: $ty) -> Self {
                Self::$ty(r)
            }
        })*
    };
}

impl_from_record!(Module, Workspace, Run, Task);

impl From<LogMessage> for Payload {
    fn from(l: LogMessage) -> Self {
        Self::Log(l)
    }
}

/// A change notification broadcast to every subscriber.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: Kind,
    pub change: ChangeType,
    pub payload: Payload,
}

impl Event {
    #[must_use]
    pub fn new(change: ChangeType, payload: impl Into<Payload>) -> Self {
        let payload = payload.into();
        Self {
            kind: payload.kind(),
            change,
            payload,
        }
    }

    /// Id of the resource the event is about.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.payload.id()
    }
}
