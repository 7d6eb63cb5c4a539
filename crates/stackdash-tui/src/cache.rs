//! Page model cache.
//!
//! Models are built on first visit by the maker registered for the page kind
//! and kept until the resource they are scoped to is deleted.

use std::collections::HashMap;

use stackdash_core::ResourceId;

use crate::cmd::Cmd;
use crate::error::TuiError;
use crate::messages::Msg;
use crate::model::{ChildModel, Maker};
use crate::page::{Page, PageKind};

#[derive(Default)]
pub struct Cache {
    models: HashMap<Page, Box<dyn ChildModel>>,
    makers: HashMap<PageKind, Box<dyn Maker>>,
}

impl Cache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the maker for a page kind, replacing any previous one.
    pub fn register(&mut self, kind: PageKind, maker: impl Maker + 'static) {
        self.makers.insert(kind, Box::new(maker));
    }

    /// Return the model for `page`, building it at `width` x `height` if it is
    /// not cached. The flag is true when the model was just built. A failed
    /// build caches nothing.
    ///
    /// # Panics
    ///
    /// If no maker is registered for the page kind.
    pub fn resolve(
        &mut self,
        page: &Page,
        width: u16,
        height: u16,
    ) -> Result<(&mut (dyn ChildModel + 'static), bool), TuiError> {
        use std::collections::hash_map::Entry;

        match self.models.entry(*page) {
            Entry::Occupied(e) => Ok((&mut **e.into_mut(), false)),
            Entry::Vacant(e) => {
                let maker = self
                    .makers
                    .get(&page.kind)
                    .unwrap_or_else(|| panic!("no maker registered for {} pages", page.kind));
                let model = maker.make(page.parent, width, height)?;
                Ok((&mut **e.insert(model), true))
            }
        }
    }

    #[must_use]
    pub fn get(&self, page: &Page) -> Option<&dyn ChildModel> {
        self.models.get(page).map(AsRef::as_ref)
    }

    pub fn get_mut(&mut self, page: &Page) -> Option<&mut (dyn ChildModel + 'static)> {
        self.models.get_mut(page).map(|m| &mut **m)
    }

    #[must_use]
    pub fn contains(&self, page: &Page) -> bool {
        self.models.contains_key(page)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drop every page scoped to `id`, returning the pages dropped.
    pub fn evict(&mut self, id: ResourceId) -> Vec<Page> {
        let evicted: Vec<Page> = self
            .models
            .keys()
            .filter(|p| p.parent == Some(id))
            .copied()
            .collect();
        for page in &evicted {
            self.models.remove(page);
        }
        evicted
    }

    /// Send `msg` to every cached model.
    pub fn update_all(&mut self, msg: &Msg) -> Cmd {
        Cmd::batch(self.models.values_mut().map(|m| m.update(msg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{recorder_maker, Log};
    use crate::page::Position;
    use stackdash_core::{DashError, Kind};

    fn cache(log: &Log) -> Cache {
        let mut cache = Cache::new();
        cache.register(PageKind::Task, recorder_maker(log));
        cache
    }

    fn addr(model: &dyn ChildModel) -> *const () {
        std::ptr::from_ref(model).cast::<()>()
    }

    #[test]
    fn second_resolve_is_memoized() {
        let log = Log::default();
        let mut cache = cache(&log);
        let page = Page::new(PageKind::Task).with_parent(ResourceId::new(Kind::Task));

        let (model, created) = cache.resolve(&page, 80, 20).unwrap();
        assert!(created);
        let first = addr(model);

        let (model, created) = cache.resolve(&page, 80, 20).unwrap();
        assert!(!created);
        assert_eq!(addr(model), first);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn position_is_part_of_identity() {
        let log = Log::default();
        let mut cache = cache(&log);
        let id = ResourceId::new(Kind::Task);
        let left = Page::new(PageKind::Task).with_parent(id);
        let right = left.with_position(Position::BottomRight);
        assert!(cache.resolve(&left, 80, 20).unwrap().1);
        assert!(cache.resolve(&right, 80, 20).unwrap().1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn evicted_page_is_rebuilt() {
        let log = Log::default();
        let mut cache = cache(&log);
        let id = ResourceId::new(Kind::Task);
        let page = Page::new(PageKind::Task).with_parent(id);
        let other = Page::new(PageKind::Task).with_parent(ResourceId::new(Kind::Task));
        let _ = cache.resolve(&page, 80, 20).unwrap();
        let _ = cache.resolve(&other, 80, 20).unwrap();

        assert_eq!(cache.evict(id), vec![page]);
        assert!(!cache.contains(&page));
        assert!(cache.contains(&other));
        assert!(cache.resolve(&page, 80, 20).unwrap().1);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let mut cache = Cache::new();
        cache.register(
            PageKind::Run,
            |_: Option<ResourceId>, _: u16, _: u16| -> Result<Box<dyn ChildModel>, TuiError> {
                Err(TuiError::make(
                    PageKind::Run,
                    DashError::MissingParent(Kind::Run),
                ))
            },
        );
        let page = Page::new(PageKind::Run);
        assert!(cache.resolve(&page, 10, 10).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    #[should_panic(expected = "no maker registered for log pages")]
    fn unregistered_kind_panics() {
        let mut cache = Cache::new();
        let _ = cache.resolve(&Page::new(PageKind::Log), 10, 10);
    }

    #[test]
    fn update_all_reaches_every_model() {
        let log = Log::default();
        let mut cache = cache(&log);
        for _ in 0..3 {
            let page = Page::new(PageKind::Task).with_parent(ResourceId::new(Kind::Task));
            let _ = cache.resolve(&page, 80, 20).unwrap();
        }
        let _ = cache.update_all(&Msg::Tick);
        assert_eq!(log.borrow().len(), 3);
    }
}
