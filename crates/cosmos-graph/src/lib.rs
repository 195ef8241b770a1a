//! cosmos-graph — Gremlin session layer for the Cosmos DB graph sample.
//!
//! Wraps the `gremlin-client` driver behind a small session trait so the
//! console runner can be exercised against in-memory sessions. All query
//! submission against a live endpoint flows through this crate.

pub mod client;
pub mod driver;

pub use client::{AttributeMap, GraphConfig, GraphError, GraphSession, ResultSet};
pub use driver::GremlinDriver;
