//! Event broker: fans every published event out to all subscribers.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;

use crate::event::Event;

/// Publish/subscribe hub for resource change events.
///
/// Each subscriber gets its own unbounded channel. Subscribers whose receiver
/// has been dropped are pruned on the next publish.
pub struct Broker {
    subscribers: RwLock<Vec<Sender<Event>>>,
}

impl Broker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        self.subscribers.write().push(tx);
        rx
    }

    /// Deliver an event to every live subscriber.
    pub fn publish(&self, event: &Event) {
        self.subscribers
            .write()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ChangeType;
    use crate::resource::Module;

    #[test]
    fn every_subscriber_receives() {
        let broker = Broker::new();
        let a = broker.subscribe();
        let b = broker.subscribe();
        broker.publish(&Event::new(ChangeType::Created, Module::new("x")));
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let broker = Broker::new();
        let keep = broker.subscribe();
        drop(broker.subscribe());
        assert_eq!(broker.count(), 2);
        broker.publish(&Event::new(ChangeType::Created, Module::new("x")));
        assert_eq!(broker.count(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn publish_without_subscribers() {
        let broker = Broker::default();
        broker.publish(&Event::new(ChangeType::Updated, Module::new("x")));
        assert_eq!(broker.count(), 0);
    }
}
