//! The `store` module owns every live topic.
//!
//! It provides the `TopicStore`, the identifier generator used to name new
//! topics, and the facet types (`Content`, `Viewport`, `Selection`) that
//! clients read and replace independently.

pub mod engine;
pub mod id;
pub mod topic;

pub use engine::TopicStore;
pub use id::{IdGenerator, RandomIdGenerator, TopicId};
pub use topic::{Content, Selection, SelectionError, SessionSummary, Status, Topic, Viewport};

#[cfg(test)]
pub(crate) mod tests;
