//! The `transport` module exposes the topic store over HTTP.
//!
//! Each route maps to exactly one store operation. Store `NotFound` errors
//! become 404 responses, unparsable bodies become 400, and id generation
//! failures become 500. Mutations answer 204 with no body.

pub mod handlers;
pub mod http;

pub use http::{SharedStore, router, serve};
