//! Passage Graph - Character co-occurrence graph
//!
//! Loads a delimited character graph file into a model of nodes, edges,
//! and anti-edges (pairs explicitly recorded as NOT co-occurring), and
//! exposes a petgraph view for analysis and DOT export. Layout and
//! drawing stay external.

pub mod dot;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use petgraph::graphmap::UnGraphMap;
use tracing::warn;

use passage_core::{PassageError, Result};

/// Discriminator field registering a node row
const NODE_LABEL: &str = "NODE";
/// Discriminator field registering an edge row
const EDGE_LABEL: &str = "EDGE";
/// Discriminator field registering an anti-edge row
const ANTIEDGE_LABEL: &str = "ANTIEDGE";

// ============================================================================
// Model
// ============================================================================

/// An unordered pair of character names
///
/// Endpoints are stored sorted, so reversed and duplicate rows collapse
/// to the same pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterPair {
    a: String,
    b: String,
}

impl CharacterPair {
    /// Create a pair; endpoint order does not matter
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The two endpoints, in stored order
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }
}

/// How two characters are related in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// The pair co-occurs
    Cooccurrence,
    /// The pair is explicitly recorded as not co-occurring
    Exclusion,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cooccurrence => write!(f, "cooccurrence"),
            Self::Exclusion => write!(f, "exclusion"),
        }
    }
}

/// A loaded character graph
///
/// Edge and anti-edge sets are disjoint. Edge endpoints are not required
/// to appear in the node set; `dangling_endpoints` reports the ones that
/// do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterGraph {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<CharacterPair>,
    pub antiedges: BTreeSet<CharacterPair>,
}

impl CharacterGraph {
    /// Register a node
    pub fn add_node(&mut self, name: impl Into<String>) {
        self.nodes.insert(name.into());
    }

    /// Register an undirected co-occurrence edge
    ///
    /// Fails if the pair is already recorded as an anti-edge.
    pub fn add_edge(&mut self, x: impl Into<String>, y: impl Into<String>) -> Result<()> {
        let pair = CharacterPair::new(x, y);
        if self.antiedges.contains(&pair) {
            return Err(conflict(&pair));
        }
        self.edges.insert(pair);
        Ok(())
    }

    /// Register an undirected anti-edge
    ///
    /// Fails if the pair is already recorded as an edge.
    pub fn add_antiedge(&mut self, x: impl Into<String>, y: impl Into<String>) -> Result<()> {
        let pair = CharacterPair::new(x, y);
        if self.edges.contains(&pair) {
            return Err(conflict(&pair));
        }
        self.antiedges.insert(pair);
        Ok(())
    }

    /// Edge or anti-edge endpoints missing from the node set
    pub fn dangling_endpoints(&self) -> BTreeSet<&str> {
        self.edges
            .iter()
            .chain(self.antiedges.iter())
            .flat_map(|p| {
                let (a, b) = p.endpoints();
                [a, b]
            })
            .filter(|name| !self.nodes.contains(*name))
            .collect()
    }

    /// Petgraph view with all registered nodes and both edge kinds
    pub fn to_petgraph(&self) -> UnGraphMap<&str, EdgeKind> {
        let mut graph = UnGraphMap::new();
        for node in &self.nodes {
            graph.add_node(node.as_str());
        }
        for pair in &self.edges {
            let (a, b) = pair.endpoints();
            graph.add_edge(a, b, EdgeKind::Cooccurrence);
        }
        for pair in &self.antiedges {
            let (a, b) = pair.endpoints();
            graph.add_edge(a, b, EdgeKind::Exclusion);
        }
        graph
    }

    /// Co-occurrence degree per node, sorted by name
    ///
    /// Anti-edges are informational and do not count toward degree.
    pub fn degree_stats(&self) -> BTreeMap<&str, usize> {
        let mut degrees: BTreeMap<&str, usize> =
            self.nodes.iter().map(|n| (n.as_str(), 0)).collect();
        for pair in &self.edges {
            let (a, b) = pair.endpoints();
            *degrees.entry(a).or_insert(0) += 1;
            *degrees.entry(b).or_insert(0) += 1;
        }
        degrees
    }
}

fn conflict(pair: &CharacterPair) -> PassageError {
    let (a, b) = pair.endpoints();
    PassageError::ConflictingEdge {
        a: a.to_string(),
        b: b.to_string(),
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Load a character graph from a delimited file
///
/// Row classification by trailing discriminator field:
/// - exactly 2 fields ending in `NODE` registers a node
/// - 3 or more fields with `EDGE` third registers an edge
/// - 3 or more fields with `ANTIEDGE` third registers an anti-edge
///
/// Unrecognized rows are logged as warnings. A pair appearing as both
/// edge and anti-edge is an error.
pub fn load(path: &Path) -> Result<CharacterGraph> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_io(path, e))?;

    let mut graph = CharacterGraph::default();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_io(path, e))?;

        if record.len() == 2 && &record[1] == NODE_LABEL {
            graph.add_node(&record[0]);
        } else if record.len() > 2 && &record[2] == EDGE_LABEL {
            graph.add_edge(&record[0], &record[1])?;
        } else if record.len() > 2 && &record[2] == ANTIEDGE_LABEL {
            graph.add_antiedge(&record[0], &record[1])?;
        } else {
            warn!(
                path = %path.display(),
                row = i + 1,
                "unrecognized character graph row"
            );
        }
    }

    Ok(graph)
}

fn csv_io(path: &Path, e: csv::Error) -> PassageError {
    PassageError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e))
}

// ============================================================================
// Tests
// ============================================================================
