//! Production session backed by the `gremlin-client` driver.

use async_trait::async_trait;
use futures::StreamExt;
use gremlin_client::aio::GremlinClient;
use gremlin_client::{ConnectionOptions, Edge, GKey, GValue, GraphSON, GremlinError, Vertex, GID};
use serde_json::{json, Value};

use crate::client::{AttributeMap, GraphConfig, GraphError, GraphSession, ResultSet};

/// Gremlin session over a single pooled WebSocket connection.
///
/// Cosmos DB speaks GraphSON V2 and authenticates with the derived
/// `/dbs/{db}/colls/{graph}` username plus the account key.
pub struct GremlinDriver {
    client: GremlinClient,
}

impl GremlinDriver {
    /// Connect to the configured Gremlin endpoint.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let options = ConnectionOptions::builder()
            .host(config.hostname.as_str())
            .port(config.port)
            .ssl(config.enable_ssl)
            .pool_size(1)
            .serializer(GraphSON::V2)
            .deserializer(GraphSON::V2)
            .credentials(config.username().as_str(), config.auth_key.as_str())
            .build();

        let client = GremlinClient::connect(options)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(host = %config.hostname, port = config.port, "Connected to Gremlin endpoint");
        Ok(Self { client })
    }
}

#[async_trait]
impl GraphSession for GremlinDriver {
    async fn submit(&self, query: &str) -> Result<ResultSet, GraphError> {
        let results: Vec<Result<GValue, GremlinError>> = self
            .client
            .execute(query, &[])
            .await
            .map_err(map_gremlin_error)?
            .collect()
            .await;

        let mut items = Vec::with_capacity(results.len());
        for result in results {
            items.push(gvalue_to_json(&result.map_err(map_gremlin_error)?));
        }

        // The driver does not surface the response status attributes, so the
        // map stays empty here and the known keys print as null.
        Ok(ResultSet {
            items,
            attributes: AttributeMap::new(),
        })
    }

    async fn close(&mut self) -> Result<(), GraphError> {
        // The connection pool is torn down when the client drops.
        Ok(())
    }
}

fn map_gremlin_error(err: GremlinError) -> GraphError {
    match err {
        GremlinError::Request((code, message)) => GraphError::Request {
            status_code: i64::from(code),
            message,
            attributes: AttributeMap::new(),
        },
        other => GraphError::Protocol(other.to_string()),
    }
}

/// Convert the driver's dynamic value type into JSON for display.
///
/// Vertices and edges keep their id/label/properties shape; exotic variants
/// fall back to their debug rendering.
fn gvalue_to_json(value: &GValue) -> Value {
    match value {
        GValue::Null => Value::Null,
        GValue::Bool(b) => json!(b),
        GValue::Int32(n) => json!(n),
        GValue::Int64(n) => json!(n),
        GValue::Float(f) => json!(f),
        GValue::Double(d) => json!(d),
        GValue::String(s) => json!(s),
        GValue::Uuid(u) => json!(u.to_string()),
        GValue::Date(d) => json!(d.to_rfc3339()),
        GValue::List(list) => Value::Array(list.iter().map(gvalue_to_json).collect()),
        GValue::Map(map) => {
            let mut object = serde_json::Map::new();
            for (key, val) in map.iter() {
                object.insert(gkey_to_string(key), gvalue_to_json(val));
            }
            Value::Object(object)
        }
        GValue::Vertex(v) => vertex_to_json(v),
        GValue::Edge(e) => edge_to_json(e),
        other => json!(format!("{other:?}")),
    }
}

fn vertex_to_json(vertex: &Vertex) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, values) in vertex.iter() {
        let rendered: Vec<Value> = values
            .iter()
            .map(|vp| json!({ "id": gid_to_json(vp.id()), "value": gvalue_to_json(vp.value()) }))
            .collect();
        properties.insert(name.clone(), Value::Array(rendered));
    }

    json!({
        "id": gid_to_json(vertex.id()),
        "label": vertex.label(),
        "type": "vertex",
        "properties": properties,
    })
}

fn edge_to_json(edge: &Edge) -> Value {
    json!({
        "id": gid_to_json(edge.id()),
        "label": edge.label(),
        "type": "edge",
        "inV": gid_to_json(edge.in_v().id()),
        "outV": gid_to_json(edge.out_v().id()),
    })
}

fn gid_to_json(id: &GID) -> Value {
    match id {
        GID::String(s) => json!(s),
        GID::Int32(n) => json!(n),
        GID::Int64(n) => json!(n),
    }
}

fn gkey_to_string(key: &GKey) -> String {
    match key {
        GKey::String(s) => s.clone(),
        other => format!("{other:?}"),
    }
}
