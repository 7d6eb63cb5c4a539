//! In-app log recorder.
//!
//! [`LogLayer`] is a `tracing_subscriber` layer that turns every tracing event
//! into a [`LogMessage`] resource held by a [`Logger`]. The logger keeps the
//! most recent [`LOG_MESSAGE_CAP`] messages; older ones are deleted, which
//! publishes a Deleted event like any other resource removal.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use stackdash_core::{Broker, DashError, LogLevel, LogMessage, ResourceId, LOG_MESSAGE_CAP};

use crate::store::Store;

/// Field naming the task a message was logged on behalf of.
const TASK_FIELD: &str = "task";

/// Bounded store of recorded log messages.
pub struct Logger {
    store: Store<LogMessage>,
    order: Mutex<VecDeque<ResourceId>>,
    cap: usize,
}

impl Logger {
    #[must_use]
    pub fn new(broker: Arc<Broker>) -> Self {
        Self::with_capacity(broker, LOG_MESSAGE_CAP)
    }

    #[must_use]
    pub fn with_capacity(broker: Arc<Broker>, cap: usize) -> Self {
        Self {
            store: Store::new(broker),
            order: Mutex::new(VecDeque::with_capacity(cap)),
            cap: cap.max(1),
        }
    }

    /// Record a message, evicting the oldest once the store is full.
    pub fn record(&self, msg: LogMessage) {
        let mut order = self.order.lock();
        order.push_back(msg.id);
        self.store.add(msg);
        while order.len() > self.cap {
            if let Some(oldest) = order.pop_front() {
                // Already gone only if deleted by someone else.
                let _ = self.store.delete(oldest);
            }
        }
    }

    pub fn get(&self, id: ResourceId) -> Result<LogMessage, DashError> {
        self.store.get(id)
    }

    /// Messages under `parent` (a task), or all of them, oldest first.
    #[must_use]
    pub fn list(&self, parent: Option<ResourceId>) -> Vec<LogMessage> {
        self.store.list_under(parent)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Tracing layer feeding a [`Logger`].
#[derive(Clone)]
pub struct LogLayer {
    logger: Arc<Logger>,
}

impl LogLayer {
    #[must_use]
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for LogLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut msg = LogMessage::new(level(*event.metadata().level()), visitor.message);
        msg.attributes = visitor.attributes;
        msg.task = visitor.task;
        self.logger.record(msg);
    }
}

fn level(level: Level) -> LogLevel {
    match level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        Level::DEBUG => LogLevel::Debug,
        Level::TRACE => LogLevel::Trace,
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    attributes: Vec<(String, String)>,
    task: Option<ResourceId>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            TASK_FIELD => {
                self.task = value.parse().ok();
                self.attributes.push((TASK_FIELD.to_string(), value));
            }
            name => self.attributes.push((name.to_string(), value)),
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}
