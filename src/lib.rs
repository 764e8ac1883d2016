//! # PeerHub
//!
//! `peerhub` is an in-memory backend for collaborative editing sessions.
//! Clients create *topics* and read or replace three independent facets of
//! each one (text content, a shared viewport, and a selection) over a small
//! REST API.
//!
//! ## Core Modules
//!
//! - `store`: owns every live topic and serialises writes per facet.
//! - `transport`: the HTTP routes that map requests onto store operations.
//! - `config`: loads server settings from a config file and the environment.
//! - `utils`: error types and logging setup.

pub mod config;
pub mod store;
pub mod transport;
pub mod utils;
