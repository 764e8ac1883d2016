use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::id::TopicId;

/// The shared document body of a topic.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub title: String,
    pub data: String,
}

/// Pan/zoom position shared by everyone looking at a topic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
}

/// Client-defined description of the highlighted regions of a topic.
///
/// The store does not look inside it beyond requiring a JSON object or
/// array; the value is handed back verbatim. A fresh topic starts with an
/// empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Selection(Value);

impl Selection {
    pub fn new(value: Value) -> Result<Self, SelectionError> {
        match value {
            Value::Object(_) | Value::Array(_) => Ok(Self(value)),
            Value::Null => Err(SelectionError("null")),
            Value::Bool(_) => Err(SelectionError("a boolean")),
            Value::Number(_) => Err(SelectionError("a number")),
            Value::String(_) => Err(SelectionError("a string")),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl TryFrom<Value> for Selection {
    type Error = SelectionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Selection> for Value {
    fn from(selection: Selection) -> Self {
        selection.0
    }
}

/// A selection body that is not a JSON object or array.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("selection must be a JSON object or array, got {0}")]
pub struct SelectionError(&'static str);

/// Owned snapshot of a topic, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub content: Content,
    pub viewport: Viewport,
    pub selection: Selection,
}

/// One row of the status summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: TopicId,
    pub title: String,
}

/// Lightweight view of the store used for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub count: usize,
    pub sessions: Vec<SessionSummary>,
}

/// Live state of a topic inside the store.
///
/// Each facet sits behind its own lock, so writers to different facets of the
/// same topic never wait on each other. Every facet write replaces the whole
/// value, which keeps a poisoned lock's contents consistent; poison is
/// therefore ignored rather than propagated.
#[derive(Debug, Default)]
pub(crate) struct TopicEntry {
    content: Mutex<Content>,
    viewport: Mutex<Viewport>,
    selection: Mutex<Selection>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TopicEntry {
    pub(crate) fn content(&self) -> Content {
        lock(&self.content).clone()
    }

    pub(crate) fn set_content(&self, content: Content) {
        *lock(&self.content) = content;
    }

    pub(crate) fn title(&self) -> String {
        lock(&self.content).title.clone()
    }

    pub(crate) fn viewport(&self) -> Viewport {
        *lock(&self.viewport)
    }

    pub(crate) fn set_viewport(&self, viewport: Viewport) {
        *lock(&self.viewport) = viewport;
    }

    pub(crate) fn selection(&self) -> Selection {
        lock(&self.selection).clone()
    }

    pub(crate) fn set_selection(&self, selection: Selection) {
        *lock(&self.selection) = selection;
    }

    pub(crate) fn snapshot(&self, id: &str) -> Topic {
        Topic {
            id: id.to_string(),
            content: self.content(),
            viewport: self.viewport(),
            selection: self.selection(),
        }
    }
}
