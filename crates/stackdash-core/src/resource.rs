//! Resource identity and the domain records that make up the resource tree.
//!
//! Resources form a strict hierarchy: a task belongs to a run, a run to a
//! workspace, a workspace to a module. Log messages optionally belong to a
//! task. Every resource can report its ancestors.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use parking_lot::RwLock;

use crate::error::DashError;

/// Resource kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Global,
    Module,
    Workspace,
    Run,
    Task,
    Log,
}

impl Kind {
    const ALL: [Self; 6] = [
        Self::Global,
        Self::Module,
        Self::Workspace,
        Self::Run,
        Self::Task,
        Self::Log,
    ];

    /// Prefix used when encoding ids of this kind.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Module => "mod",
            Self::Workspace => "ws",
            Self::Run => "run",
            Self::Task => "task",
            Self::Log => "log",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Global => "global",
            Self::Module => "module",
            Self::Workspace => "workspace",
            Self::Run => "run",
            Self::Task => "task",
            Self::Log => "log",
        };
        f.write_str(name)
    }
}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Unique resource identity.
///
/// The serial is drawn from a process-wide counter, so ordering ids orders
/// resources by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    serial: u64,
    kind: Kind,
}

impl ResourceId {
    /// Allocate a fresh id of the given kind.
    #[must_use]
    pub fn new(kind: Kind) -> Self {
        Self {
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
            kind,
        }
    }

    /// Creation-order serial number.
    #[must_use]
    pub fn serial(self) -> u64 {
        self.serial
    }

    #[must_use]
    pub fn kind(self) -> Kind {
        self.kind
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:07x}", self.kind.prefix(), self.serial)
    }
}

/// Parses the encoded form, e.g. `task-000002a`. The parsed id refers to an
/// existing resource only if that resource's id was encoded in this process.
impl FromStr for ResourceId {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DashError::InvalidId(s.to_string());
        let (prefix, serial) = s.rsplit_once('-').ok_or_else(invalid)?;
        let kind = Kind::from_prefix(prefix).ok_or_else(invalid)?;
        let serial = u64::from_str_radix(serial, 16).map_err(|_| invalid())?;
        Ok(Self { serial, kind })
    }
}

/// Common behaviour of every resource in the tree.
pub trait Resource {
    fn id(&self) -> ResourceId;

    fn module(&self) -> Option<ResourceId> {
        None
    }

    fn workspace(&self) -> Option<ResourceId> {
        None
    }

    fn run(&self) -> Option<ResourceId> {
        None
    }

    fn task(&self) -> Option<ResourceId> {
        None
    }

    /// True if `id` is this resource or one of its ancestors.
    fn has_ancestor(&self, id: ResourceId) -> bool {
        self.id() == id
            || self.module() == Some(id)
            || self.workspace() == Some(id)
            || self.run() == Some(id)
            || self.task() == Some(id)
    }
}

/// A directory containing infrastructure configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ResourceId,
    /// Path relative to the working directory.
    pub path: String,
}

impl Module {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(Kind::Module),
            path: path.into(),
        }
    }
}

impl Resource for Module {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn module(&self) -> Option<ResourceId> {
        Some(self.id)
    }
}

/// A named state instance of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: ResourceId,
    pub module: ResourceId,
    pub module_path: String,
    pub name: String,
    /// Whether this is the module's currently selected workspace.
    pub current: bool,
}

impl Workspace {
    #[must_use]
    pub fn new(module: &Module, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(Kind::Workspace),
            module: module.id,
            module_path: module.path.clone(),
            name: name.into(),
            current: false,
        }
    }
}

impl Resource for Workspace {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn module(&self) -> Option<ResourceId> {
        Some(self.module)
    }

    fn workspace(&self) -> Option<ResourceId> {
        Some(self.id)
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Pending,
    Planning,
    Planned,
    NoChanges,
    Applying,
    Applied,
    Errored,
}

impl RunStatus {
    /// Width of the longest rendered status.
    pub const MAX_LEN: u16 = 10;

    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::NoChanges | Self::Applied | Self::Errored)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Planning => "planning",
            Self::Planned => "planned",
            Self::NoChanges => "no changes",
            Self::Applying => "applying",
            Self::Applied => "applied",
            Self::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Resource change summary of a plan or apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Changes {
    pub add: u32,
    pub change: u32,
    pub destroy: u32,
}

impl fmt::Display for Changes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}~{}-{}", self.add, self.change, self.destroy)
    }
}

/// A plan (and optional apply) of a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: ResourceId,
    pub module: ResourceId,
    pub module_path: String,
    pub workspace: ResourceId,
    pub workspace_name: String,
    pub status: RunStatus,
    pub changes: Option<Changes>,
    pub created: DateTime<Utc>,
}

impl Run {
    #[must_use]
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            id: ResourceId::new(Kind::Run),
            module: workspace.module,
            module_path: workspace.module_path.clone(),
            workspace: workspace.id,
            workspace_name: workspace.name.clone(),
            status: RunStatus::Pending,
            changes: None,
            created: Utc::now(),
        }
    }
}

impl Resource for Run {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn module(&self) -> Option<ResourceId> {
        Some(self.module)
    }

    fn workspace(&self) -> Option<ResourceId> {
        Some(self.workspace)
    }

    fn run(&self) -> Option<ResourceId> {
        Some(self.id)
    }
}

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Queued,
    Running,
    Exited,
    Errored,
    Canceled,
}

impl TaskStatus {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Exited | Self::Errored | Self::Canceled)
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Queued | Self::Canceled)
                | (Self::Queued, Self::Running | Self::Canceled)
                | (Self::Running, Self::Exited | Self::Errored | Self::Canceled)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Exited => "exited",
            Self::Errored => "errored",
            Self::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// A unit of work against a module, workspace or run.
///
/// The output buffer is shared between clones so that a task carried in an
/// event always exposes the latest output.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: ResourceId,
    pub module: Option<ResourceId>,
    pub module_path: Option<String>,
    pub workspace: Option<ResourceId>,
    pub workspace_name: Option<String>,
    pub run: Option<ResourceId>,
    pub command: Vec<String>,
    pub status: TaskStatus,
    pub exit_code: Option<i32>,
    pub output: Arc<RwLock<Vec<String>>>,
    pub created: DateTime<Utc>,
}

impl Task {
    /// Create a pending task with no parent.
    #[must_use]
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: ResourceId::new(Kind::Task),
            module: None,
            module_path: None,
            workspace: None,
            workspace_name: None,
            run: None,
            command: command.into_iter().map(Into::into).collect(),
            status: TaskStatus::Pending,
            exit_code: None,
            output: Arc::new(RwLock::new(Vec::new())),
            created: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: &Module) -> Self {
        self.module = Some(module.id);
        self.module_path = Some(module.path.clone());
        self
    }

    #[must_use]
    pub fn with_workspace(mut self, workspace: &Workspace) -> Self {
        self.module = Some(workspace.module);
        self.module_path = Some(workspace.module_path.clone());
        self.workspace = Some(workspace.id);
        self.workspace_name = Some(workspace.name.clone());
        self
    }

    #[must_use]
    pub fn with_run(mut self, run: &Run) -> Self {
        self.module = Some(run.module);
        self.module_path = Some(run.module_path.clone());
        self.workspace = Some(run.workspace);
        self.workspace_name = Some(run.workspace_name.clone());
        self.run = Some(run.id);
        self
    }

    /// Command joined with spaces.
    #[must_use]
    pub fn command_string(&self) -> String {
        self.command.join(" ")
    }

    /// Number of output lines received so far.
    #[must_use]
    pub fn output_len(&self) -> usize {
        self.output.read().len()
    }
}

impl Resource for Task {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn module(&self) -> Option<ResourceId> {
        self.module
    }

    fn workspace(&self) -> Option<ResourceId> {
        self.workspace
    }

    fn run(&self) -> Option<ResourceId> {
        self.run
    }

    fn task(&self) -> Option<ResourceId> {
        Some(self.id)
    }
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        };
        f.write_str(s)
    }
}

/// A recorded application log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub id: ResourceId,
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    pub attributes: Vec<(String, String)>,
    /// Task the message was logged on behalf of, if any.
    pub task: Option<ResourceId>,
}

impl LogMessage {
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(Kind::Log),
            time: Local::now(),
            level,
            message: message.into(),
            attributes: Vec::new(),
            task: None,
        }
    }

    /// Monotonically increasing sequence number.
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.id.serial()
    }
}

impl Resource for LogMessage {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn task(&self) -> Option<ResourceId> {
        self.task
    }
}
