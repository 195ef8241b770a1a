//! Runner behavior against scripted in-memory sessions.
//!
//! Covers submission order, result and diagnostics printing, the throttled
//! error path, and session release accounting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use cosmos_graph::client::{
    AttributeMap, GraphError, GraphSession, ResultSet, ATTR_ACTIVITY_ID, ATTR_RETRY_AFTER_MS,
    ATTR_STATUS_CODE, ATTR_TOTAL_REQUEST_CHARGE,
};
use cosmos_console::catalog::QueryCatalog;
use cosmos_console::error::ConsoleError;
use cosmos_console::runner::QueryRunner;

/// Session double with one scripted outcome per expected submission.
struct ScriptedSession {
    outcomes: Mutex<VecDeque<Result<ResultSet, GraphError>>>,
    submitted: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicUsize>,
}

impl ScriptedSession {
    fn new(outcomes: Vec<Result<ResultSet, GraphError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            submitted: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn submitted(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.submitted)
    }

    fn close_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl GraphSession for ScriptedSession {
    async fn submit(&self, query: &str) -> Result<ResultSet, GraphError> {
        self.submitted.lock().unwrap().push(query.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("submission past end of script")
    }

    async fn close(&mut self) -> Result<(), GraphError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn success_attributes() -> AttributeMap {
    let mut attributes = AttributeMap::new();
    attributes.insert(ATTR_STATUS_CODE.to_string(), json!(200));
    attributes.insert(ATTR_TOTAL_REQUEST_CHARGE.to_string(), json!(10.5));
    attributes
}

fn success(items: Vec<Value>) -> Result<ResultSet, GraphError> {
    Ok(ResultSet {
        items,
        attributes: success_attributes(),
    })
}

/// A 429 as the service reports it: the success attributes plus the retry
/// hint and the activity id.
fn throttled() -> Result<ResultSet, GraphError> {
    let mut attributes = AttributeMap::new();
    attributes.insert(ATTR_STATUS_CODE.to_string(), json!(429));
    attributes.insert(ATTR_TOTAL_REQUEST_CHARGE.to_string(), json!(1.0));
    attributes.insert(ATTR_RETRY_AFTER_MS.to_string(), json!(3500));
    attributes.insert(
        ATTR_ACTIVITY_ID.to_string(),
        json!("9a51e856-1fcc-4b30-9b73-56b1f0a0c34d"),
    );

    Err(GraphError::Request {
        status_code: 429,
        message: "Request rate is large".to_string(),
        attributes,
    })
}

fn catalog(entries: &[(&str, &str)]) -> QueryCatalog {
    let mut catalog = QueryCatalog::new();
    for (name, query) in entries {
        catalog.push(*name, *query);
    }
    catalog
}

async fn run_catalog(
    session: ScriptedSession,
    catalog: &QueryCatalog,
) -> (Result<(), ConsoleError>, String) {
    let mut runner = QueryRunner::new(Vec::new());
    let outcome = runner.run(session, catalog).await;
    let output = String::from_utf8(runner.into_inner()).unwrap();
    (outcome, output)
}

#[tokio::test]
async fn submits_exact_text_in_catalog_order() {
    let catalog = catalog(&[
        ("Cleanup", "g.V().drop()"),
        ("CountVertices", "g.V().count()"),
        ("CountEdges", "g.E().count()"),
    ]);
    let session = ScriptedSession::new(vec![
        success(vec![]),
        success(vec![json!(4)]),
        success(vec![json!(3)]),
    ]);
    let submitted = session.submitted();

    let (outcome, _) = run_catalog(session, &catalog).await;
    assert!(outcome.is_ok());

    let submitted = submitted.lock().unwrap();
    assert_eq!(
        *submitted,
        vec!["g.V().drop()", "g.V().count()", "g.E().count()"]
    );
}

#[tokio::test]
async fn prints_one_line_per_item_in_service_order() {
    let catalog = catalog(&[("Project", "g.V().values('firstName')")]);
    let session = ScriptedSession::new(vec![success(vec![
        json!("Thomas"),
        json!("Mary"),
        json!("Ben"),
    ])]);

    let (outcome, output) = run_catalog(session, &catalog).await;
    assert!(outcome.is_ok());

    let result_lines: Vec<&str> = output
        .lines()
        .filter(|l| l.starts_with("\t\""))
        .collect();
    assert_eq!(result_lines, vec!["\t\"Thomas\"", "\t\"Mary\"", "\t\"Ben\""]);
}

#[tokio::test]
async fn empty_result_set_still_prints_attributes() {
    let catalog = catalog(&[("Cleanup", "g.V().drop()")]);
    let session = ScriptedSession::new(vec![success(vec![])]);

    let (outcome, output) = run_catalog(session, &catalog).await;
    assert!(outcome.is_ok());

    assert!(!output.contains("\tResult:"));
    assert!(output.contains("\tStatusAttributes:"));
    assert!(output.contains("\t[\"x-ms-status-code\"] : 200"));
    assert!(output.contains("\t[\"x-ms-total-request-charge\"] : 10.5"));
}

#[tokio::test]
async fn missing_attribute_prints_null() {
    let catalog = catalog(&[("Cleanup", "g.V().drop()")]);
    let session = ScriptedSession::new(vec![Ok(ResultSet::default())]);

    let (outcome, output) = run_catalog(session, &catalog).await;
    assert!(outcome.is_ok());

    assert!(output.contains("\t[\"x-ms-status-code\"] : null"));
    assert!(output.contains("\t[\"x-ms-total-request-charge\"] : null"));
}

#[tokio::test]
async fn throttled_error_prints_diagnostics_and_halts() {
    let catalog = catalog(&[
        ("AddVertex 1", "g.addV('person')"),
        ("AddVertex 2", "g.addV('person')"),
        ("AddVertex 3", "g.addV('person')"),
    ]);
    let session = ScriptedSession::new(vec![success(vec![json!({"id": "thomas"})]), throttled()]);
    let submitted = session.submitted();
    let closed = session.close_count();

    let (outcome, output) = run_catalog(session, &catalog).await;

    // Diagnostics for the failing query.
    assert!(output.contains("\tRequest Error!"));
    assert!(output.contains("\tStatusCode: 429"));
    assert!(output.contains("\t[\"x-ms-status-code\"] : 429"));
    assert!(output.contains("\t[\"x-ms-retry-after-ms\"] : 3500"));
    assert!(output.contains(
        "\t[\"x-ms-activity-id\"] : \"9a51e856-1fcc-4b30-9b73-56b1f0a0c34d\""
    ));

    // The original error propagates.
    match outcome {
        Err(ConsoleError::Graph(GraphError::Request { status_code, .. })) => {
            assert_eq!(status_code, 429);
        }
        other => panic!("expected propagated request error, got {other:?}"),
    }

    // The third entry is never submitted, and the session is still released.
    assert_eq!(submitted.lock().unwrap().len(), 2);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_closed_exactly_once_on_success() {
    let catalog = catalog(&[("Cleanup", "g.V().drop()")]);
    let session = ScriptedSession::new(vec![success(vec![])]);
    let closed = session.close_count();

    let (outcome, _) = run_catalog(session, &catalog).await;
    assert!(outcome.is_ok());
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn getting_started_prefix_end_to_end() {
    let add_vertex = "g.addV('person').property('id', 'thomas').property('pk', 'thomas')";
    let catalog = catalog(&[("Cleanup", "g.V().drop()"), ("AddVertex 1", add_vertex)]);
    let session = ScriptedSession::new(vec![
        success(vec![]),
        success(vec![json!({"id": "thomas"})]),
    ]);

    let (outcome, output) = run_catalog(session, &catalog).await;
    assert!(outcome.is_ok());

    let expected = format!(
        "Running this query: Cleanup: g.V().drop()\n\
         \tStatusAttributes:\n\
         \t[\"x-ms-status-code\"] : 200\n\
         \t[\"x-ms-total-request-charge\"] : 10.5\n\
         \n\
         Running this query: AddVertex 1: {add_vertex}\n\
         \tResult:\n\
         \t{{\"id\":\"thomas\"}}\n\
         \n\
         \tStatusAttributes:\n\
         \t[\"x-ms-status-code\"] : 200\n\
         \t[\"x-ms-total-request-charge\"] : 10.5\n\
         \n"
    );
    assert_eq!(output, expected);
}
