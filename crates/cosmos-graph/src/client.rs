//! Connection configuration, errors, and the graph session seam.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Sub-status code attribute, present on every outcome.
pub const ATTR_STATUS_CODE: &str = "x-ms-status-code";

/// Total request units charged for processing the request.
pub const ATTR_TOTAL_REQUEST_CHARGE: &str = "x-ms-total-request-charge";

/// Milliseconds to wait before retrying; populated when the service
/// throttles (status 429).
pub const ATTR_RETRY_AFTER_MS: &str = "x-ms-retry-after-ms";

/// Unique identifier the service assigns to the operation, for
/// troubleshooting.
pub const ATTR_ACTIVITY_ID: &str = "x-ms-activity-id";

/// Service-reported diagnostic metadata attached to a query outcome.
pub type AttributeMap = HashMap<String, Value>;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Gremlin connection error: {0}")]
    Connection(String),

    /// The remote service answered a submission with an error status.
    ///
    /// `attributes` is the failure's own attribute set, a superset of the
    /// success attributes plus retry/diagnostic keys when the service
    /// provides them.
    #[error("Remote request failed with status {status_code}: {message}")]
    Request {
        status_code: i64,
        message: String,
        attributes: AttributeMap,
    },

    #[error("Gremlin protocol error: {0}")]
    Protocol(String),
}

/// Connection settings for a Cosmos DB Gremlin endpoint.
///
/// Loaded from a `cosmos.toml` `[cosmos]` section or `COSMOS__` environment
/// variables; defaults target the local emulator.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub enable_ssl: bool,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_graph")]
    pub graph: String,

    #[serde(default = "default_auth_key")]
    pub auth_key: String,

    /// Property name the collection is partitioned on.
    #[serde(default = "default_partition_key")]
    pub partition_key_property: String,
}

impl GraphConfig {
    /// Cosmos derives the Gremlin username from the database and graph names.
    pub fn username(&self) -> String {
        format!("/dbs/{}/colls/{}", self.database, self.graph)
    }
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8901
}

fn default_database() -> String {
    "yourDatabase".to_string()
}

fn default_graph() -> String {
    "yourGraph".to_string()
}

// Well-known master key of the local Cosmos DB emulator.
fn default_auth_key() -> String {
    "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==".to_string()
}

fn default_partition_key() -> String {
    "pk".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            enable_ssl: false,
            database: default_database(),
            graph: default_graph(),
            auth_key: default_auth_key(),
            partition_key_property: default_partition_key(),
        }
    }
}

/// One query's full result sequence plus its diagnostic attributes.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Opaque result items, in the order the service returned them.
    pub items: Vec<Value>,
    pub attributes: AttributeMap,
}

/// A single exclusive session against the graph endpoint.
///
/// Submissions are strictly sequential: one query in flight at a time, each
/// awaited to completion before the next. `close` releases the session and
/// must be called exactly once by its owner.
#[async_trait]
pub trait GraphSession {
    /// Submit a Gremlin query and wait for the full result set.
    async fn submit(&self, query: &str) -> Result<ResultSet, GraphError>;

    /// Release the session.
    async fn close(&mut self) -> Result<(), GraphError>;
}
