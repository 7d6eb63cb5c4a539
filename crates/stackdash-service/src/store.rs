//! Generic in-memory resource store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use stackdash_core::{Broker, ChangeType, DashError, Event, Payload, Resource, ResourceId};

/// Identity-indexed collection of resources that publishes every mutation.
///
/// Events are published while the write lock is held, so subscribers observe
/// mutations of the same store in the order they were applied.
pub struct Store<T> {
    items: RwLock<HashMap<ResourceId, T>>,
    broker: Arc<Broker>,
}

impl<T> Store<T>
where
    T: Resource + Clone + Into<Payload>,
{
    #[must_use]
    pub fn new(broker: Arc<Broker>) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            broker,
        }
    }

    /// Insert a new resource and publish a Created event.
    pub fn add(&self, item: T) {
        let mut items = self.items.write();
        items.insert(item.id(), item.clone());
        self.broker.publish(&Event::new(ChangeType::Created, item));
    }

    /// Mutate a resource in place and publish an Updated event.
    ///
    /// If `f` fails the resource is left as `f` left it and no event is
    /// published, so `f` must check before it mutates.
    pub fn update<F>(&self, id: ResourceId, f: F) -> Result<T, DashError>
    where
        F: FnOnce(&mut T) -> Result<(), DashError>,
    {
        let mut items = self.items.write();
        let item = items.get_mut(&id).ok_or(DashError::NotFound(id))?;
        f(item)?;
        let updated = item.clone();
        self.broker
            .publish(&Event::new(ChangeType::Updated, updated.clone()));
        Ok(updated)
    }

    /// Remove a resource and publish a Deleted event.
    pub fn delete(&self, id: ResourceId) -> Result<T, DashError> {
        let mut items = self.items.write();
        let item = items.remove(&id).ok_or(DashError::NotFound(id))?;
        self.broker
            .publish(&Event::new(ChangeType::Deleted, item.clone()));
        Ok(item)
    }

    pub fn get(&self, id: ResourceId) -> Result<T, DashError> {
        self.items
            .read()
            .get(&id)
            .cloned()
            .ok_or(DashError::NotFound(id))
    }

    /// All resources in creation order.
    #[must_use]
    pub fn list(&self) -> Vec<T> {
        self.list_by(|_| true)
    }

    /// Resources matching `pred`, in creation order.
    pub fn list_by(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut items: Vec<T> = self
            .items
            .read()
            .values()
            .filter(|item| pred(item))
            .cloned()
            .collect();
        items.sort_by_key(Resource::id);
        items
    }

    /// Resources that have `parent` as an ancestor, or all when `None`.
    #[must_use]
    pub fn list_under(&self, parent: Option<ResourceId>) -> Vec<T> {
        match parent {
            Some(parent) => self.list_by(|item| item.has_ancestor(parent)),
            None => self.list(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
