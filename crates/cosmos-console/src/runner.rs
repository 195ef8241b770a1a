//! Drives the query catalog through a single graph session.

use std::io::Write;

use cosmos_graph::client::{
    AttributeMap, GraphError, GraphSession, ResultSet, ATTR_ACTIVITY_ID, ATTR_RETRY_AFTER_MS,
    ATTR_STATUS_CODE, ATTR_TOTAL_REQUEST_CHARGE,
};

use crate::catalog::QueryCatalog;
use crate::error::Result;

/// Runs every catalog entry in order against one session, printing results
/// and diagnostic attributes to the given writer.
pub struct QueryRunner<W> {
    out: W,
}

impl<W: Write> QueryRunner<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer, e.g. to inspect captured output.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run the catalog to completion or to the first failure.
    ///
    /// Takes ownership of the session and closes it on every exit path,
    /// exactly once. When both the run and the close fail, the run error
    /// wins.
    pub async fn run<S: GraphSession>(
        &mut self,
        mut session: S,
        catalog: &QueryCatalog,
    ) -> Result<()> {
        let outcome = self.drive(&session, catalog).await;
        let closed = session.close().await;

        match (outcome, closed) {
            (Err(run_err), _) => Err(run_err),
            (Ok(()), Err(close_err)) => Err(close_err.into()),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    async fn drive<S: GraphSession>(&mut self, session: &S, catalog: &QueryCatalog) -> Result<()> {
        for entry in catalog {
            writeln!(self.out, "Running this query: {}: {}", entry.name, entry.query)?;

            match session.submit(&entry.query).await {
                Ok(results) => self.print_result_set(&results)?,
                Err(err) => {
                    self.print_failure(&err)?;
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    fn print_result_set(&mut self, results: &ResultSet) -> Result<()> {
        if !results.items.is_empty() {
            writeln!(self.out, "\tResult:")?;
            for item in &results.items {
                // Compact JSON, one item per line, in service order.
                writeln!(self.out, "\t{item}")?;
            }
            writeln!(self.out)?;
        }

        self.print_status_attributes(&results.attributes)?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Remote request errors get the full diagnostic block; anything else
    /// propagates silently.
    fn print_failure(&mut self, err: &GraphError) -> Result<()> {
        if let GraphError::Request {
            status_code,
            attributes,
            ..
        } = err
        {
            writeln!(self.out, "\tRequest Error!")?;
            writeln!(self.out, "\tStatusCode: {status_code}")?;
            self.print_status_attributes(attributes)?;
            writeln!(
                self.out,
                "\t[\"{ATTR_RETRY_AFTER_MS}\"] : {}",
                attribute_as_json(attributes, ATTR_RETRY_AFTER_MS)
            )?;
            writeln!(
                self.out,
                "\t[\"{ATTR_ACTIVITY_ID}\"] : {}",
                attribute_as_json(attributes, ATTR_ACTIVITY_ID)
            )?;
        }
        Ok(())
    }

    fn print_status_attributes(&mut self, attributes: &AttributeMap) -> Result<()> {
        writeln!(self.out, "\tStatusAttributes:")?;
        writeln!(
            self.out,
            "\t[\"{ATTR_STATUS_CODE}\"] : {}",
            attribute_as_json(attributes, ATTR_STATUS_CODE)
        )?;
        writeln!(
            self.out,
            "\t[\"{ATTR_TOTAL_REQUEST_CHARGE}\"] : {}",
            attribute_as_json(attributes, ATTR_TOTAL_REQUEST_CHARGE)
        )?;
        Ok(())
    }
}

/// Serialize one attribute value as compact JSON; absent keys render as
/// `null` rather than failing.
pub fn attribute_as_json(attributes: &AttributeMap, key: &str) -> String {
    attributes
        .get(key)
        .unwrap_or(&serde_json::Value::Null)
        .to_string()
}
