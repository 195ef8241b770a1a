//! The ordered catalog of named Gremlin queries executed by the runner.

/// A named Gremlin query.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub query: String,
}

/// Ordered sequence of named queries.
///
/// Order is significant: traversal and deletion entries assume the vertices
/// and edges created by earlier entries exist. Built once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    entries: Vec<CatalogEntry>,
}

impl QueryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; entries run in insertion order.
    pub fn push(&mut self, name: impl Into<String>, query: impl Into<String>) {
        self.entries.push(CatalogEntry {
            name: name.into(),
            query: query.into(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The getting-started catalog: build a small social graph, query it,
    /// then delete pieces of it.
    ///
    /// `partition_key` is the property name the target collection is
    /// partitioned on; every vertex must carry it.
    pub fn getting_started(partition_key: &str) -> Self {
        let mut catalog = Self::new();

        catalog.push("Cleanup", "g.V().drop()");
        catalog.push(
            "AddVertex 1",
            format!(
                "g.addV('person').property('id', 'thomas').property('{partition_key}', 'thomas').property('firstName', 'Thomas').property('age', 44)"
            ),
        );
        catalog.push(
            "AddVertex 2",
            format!(
                "g.addV('person').property('id', 'mary').property('{partition_key}', 'mary').property('firstName', 'Mary').property('lastName', 'Andersen').property('age', 39)"
            ),
        );
        catalog.push(
            "AddVertex 3",
            format!(
                "g.addV('person').property('id', 'ben').property('{partition_key}', 'ben').property('firstName', 'Ben').property('lastName', 'Miller')"
            ),
        );
        catalog.push(
            "AddVertex 4",
            format!(
                "g.addV('person').property('id', 'robin').property('{partition_key}', 'robin').property('firstName', 'Robin').property('lastName', 'Wakefield')"
            ),
        );
        catalog.push("AddEdge 1", "g.V('thomas').addE('knows').to(g.V('mary'))");
        catalog.push("AddEdge 2", "g.V('thomas').addE('knows').to(g.V('ben'))");
        catalog.push("AddEdge 3", "g.V('ben').addE('knows').to(g.V('robin'))");
        catalog.push("UpdateVertex", "g.V('thomas').property('age', 44)");
        catalog.push("CountVertices", "g.V().count()");
        catalog.push(
            "Filter Range",
            "g.V().hasLabel('person').has('age', gt(40))",
        );
        catalog.push("Project", "g.V().hasLabel('person').values('firstName')");
        catalog.push(
            "Sort",
            "g.V().hasLabel('person').order().by('firstName', decr)",
        );
        catalog.push("Traverse", "g.V('thomas').out('knows').hasLabel('person')");
        catalog.push(
            "Traverse 2x",
            "g.V('thomas').out('knows').hasLabel('person').out('knows').hasLabel('person')",
        );
        catalog.push(
            "Loop",
            "g.V('thomas').repeat(out()).until(has('id', 'robin')).path()",
        );
        catalog.push(
            "DropEdge",
            "g.V('thomas').outE('knows').where(inV().has('id', 'mary')).drop()",
        );
        catalog.push("CountEdges", "g.E().count()");
        catalog.push("DropVertex", "g.V('thomas').drop()");

        catalog
    }
}

impl<'a> IntoIterator for &'a QueryCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
