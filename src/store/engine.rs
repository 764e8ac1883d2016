use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::id::{IdGenerator, RandomIdGenerator, TopicId};
use crate::store::topic::{
    Content, Selection, SessionSummary, Status, Topic, TopicEntry, Viewport,
};
use crate::utils::error::StoreError;

/// The registry of live topics.
///
/// Structural changes (create, delete) take the map's write lock; every other
/// operation only takes the read lock and then the lock of the single facet
/// it touches. A `set_content` on one topic therefore never waits for a
/// `set_viewport` on another, or even on the same topic.
///
/// Topics are kept in id order, which is what `list` and `status` return.
pub struct TopicStore {
    topics: RwLock<BTreeMap<TopicId, Arc<TopicEntry>>>,
    ids: Box<dyn IdGenerator>,
}

impl std::fmt::Debug for TopicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicStore")
            .field("topics", &self.read().len())
            .finish()
    }
}

impl Default for TopicStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicStore {
    /// Creates an empty store backed by the random id generator.
    pub fn new() -> Self {
        Self::with_generator(RandomIdGenerator)
    }

    /// Creates an empty store that draws ids from `ids`.
    pub fn with_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            topics: RwLock::new(BTreeMap::new()),
            ids: Box::new(ids),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<TopicId, Arc<TopicEntry>>> {
        self.topics.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<TopicId, Arc<TopicEntry>>> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn entry(&self, id: &str) -> Result<Arc<TopicEntry>, StoreError> {
        self.read().get(id).cloned().ok_or_else(|| {
            tracing::debug!("topic {} not found", id);
            StoreError::NotFound(id.to_string())
        })
    }

    /// Allocates a fresh id and inserts a zero-valued topic under it.
    ///
    /// The id is generated before the map is locked. A generated id that is
    /// already live is treated as a generator failure rather than retried.
    pub fn create(&self) -> Result<Topic, StoreError> {
        let id = self.ids.generate().map_err(|e| {
            tracing::error!("failed to generate topic id: {}", e);
            StoreError::from(e)
        })?;

        let entry = Arc::new(TopicEntry::default());
        let topic = entry.snapshot(&id);

        let mut topics = self.write();
        if topics.contains_key(&id) {
            tracing::error!("generated topic id {} collides with a live topic", id);
            return Err(StoreError::Generation(format!("duplicate id {}", id)));
        }
        topics.insert(id.clone(), entry);
        drop(topics);

        tracing::debug!("created topic {}", id);
        Ok(topic)
    }

    /// Snapshot of every live topic, in id order.
    pub fn list(&self) -> Vec<Topic> {
        self.read()
            .iter()
            .map(|(id, entry)| entry.snapshot(id))
            .collect()
    }

    /// Removes the topic if it exists. Deleting an absent id is a no-op.
    ///
    /// Callers already holding the entry keep a valid (now detached) copy
    /// until they drop it.
    pub fn delete(&self, id: &str) {
        if self.write().remove(id).is_some() {
            tracing::debug!("deleted topic {}", id);
        }
    }

    /// Full snapshot of one topic.
    pub fn get(&self, id: &str) -> Result<Topic, StoreError> {
        Ok(self.entry(id)?.snapshot(id))
    }

    /// Current content of a topic.
    pub fn get_content(&self, id: &str) -> Result<Content, StoreError> {
        Ok(self.entry(id)?.content())
    }

    /// Replaces `title` and `data` together.
    pub fn set_content(&self, id: &str, content: Content) -> Result<(), StoreError> {
        self.entry(id)?.set_content(content);
        Ok(())
    }

    /// Current viewport of a topic.
    pub fn get_viewport(&self, id: &str) -> Result<Viewport, StoreError> {
        Ok(self.entry(id)?.viewport())
    }

    /// Replaces `x` and `y` together.
    pub fn set_viewport(&self, id: &str, viewport: Viewport) -> Result<(), StoreError> {
        self.entry(id)?.set_viewport(viewport);
        Ok(())
    }

    /// Current selection of a topic.
    pub fn get_selection(&self, id: &str) -> Result<Selection, StoreError> {
        Ok(self.entry(id)?.selection())
    }

    /// Replaces the whole selection structure.
    pub fn set_selection(&self, id: &str, selection: Selection) -> Result<(), StoreError> {
        self.entry(id)?.set_selection(selection);
        Ok(())
    }

    /// Number of live topics with their current titles.
    pub fn status(&self) -> Status {
        let topics = self.read();
        let sessions: Vec<SessionSummary> = topics
            .iter()
            .map(|(id, entry)| SessionSummary {
                id: id.clone(),
                title: entry.title(),
            })
            .collect();

        Status {
            count: sessions.len(),
            sessions,
        }
    }

    /// Number of live topics.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when no topics are live.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
