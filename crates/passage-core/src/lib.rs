//! Passage Core - Domain models, errors, and configuration
//!
//! This crate defines the shared types used throughout the passage system:
//! - Annotation models (spans, entities, documents, corpora)
//! - The error taxonomy for the whole pipeline
//! - Configuration management (window markers, palette, layout conventions)

pub mod config;

pub use config::{ConfigError, CorpusConfig};

use std::path::PathBuf;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors for passage pipeline operations
///
/// Every variant is unrecoverable for the affected document: the pipeline
/// never emits partial or best-effort output for a broken input.
#[derive(Error, Debug)]
pub enum PassageError {
    /// A window marker is missing from an annotation document
    #[error("window marker {marker:?} not found in {path}")]
    MarkerNotFound { marker: String, path: PathBuf },

    /// An annotation line could not be parsed
    #[error("malformed annotation at {path}:{line_no}: {reason}")]
    MalformedAnnotation {
        path: PathBuf,
        line_no: usize,
        reason: String,
    },

    /// An annotation file has no matching document file
    #[error("annotation file {ann} has no companion document (expected {expected})")]
    MissingCompanion { ann: PathBuf, expected: PathBuf },

    /// A remapped span falls outside the stripped text, or start > end
    #[error("entity {id}: span [{start}, {end}] invalid for text of length {len}")]
    InvalidSpan {
        id: String,
        start: i64,
        end: i64,
        len: usize,
    },

    /// A discovered path does not follow the chapter/passage layout
    #[error("path {path} does not follow the chapter/passage layout: {reason}")]
    InvalidLayout { path: PathBuf, reason: String },

    /// The configured window gap does not match the file's line-ending convention
    #[error("window gap of {gap} does not match {path}: region after start marker is not a line separator")]
    WindowGapMismatch { gap: usize, path: PathBuf },

    /// A character pair appears as both edge and anti-edge
    #[error("character pair ({a}, {b}) appears as both edge and anti-edge")]
    ConflictingEdge { a: String, b: String },

    /// A compiled corpus artifact could not be parsed back
    #[error("failed to parse corpus file {path}: {message}")]
    CorpusParse { path: PathBuf, message: String },

    /// Corpus serialization failed
    #[error("corpus serialization failed: {0}")]
    Serialize(String),

    /// IO error with the offending path
    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PassageError {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-annotation error for a line
    pub fn malformed(
        path: impl Into<PathBuf>,
        line_no: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedAnnotation {
            path: path.into(),
            line_no,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PassageError>;

// ============================================================================
// Annotation Models
// ============================================================================

/// A contiguous character span in stripped document text
///
/// Offsets are zero-based character indices with `start <= end`.
/// Serializes as the two-element array `[start, end]` expected by the
/// downstream visualization tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span length in characters
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check that the span lies within a text of the given length
    pub fn fits(&self, text_len: usize) -> bool {
        self.start <= self.end && self.end <= text_len
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.start, self.end).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (start, end) = <(usize, usize)>::deserialize(deserializer)?;
        Ok(Self { start, end })
    }
}

/// An annotated entity: an identifier, a display label, and its spans
///
/// The current pipeline always produces exactly one span per entity
/// (discontinuous annotations are collapsed to their outer bounds), but
/// the shape admits more.
///
/// Serializes as the heterogeneous array `[id, label, [[start, end], ...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub label: String,
    pub spans: Vec<Span>,
}

impl Entity {
    /// Create an entity with a single span
    pub fn new(id: impl Into<String>, label: impl Into<String>, span: Span) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            spans: vec![span],
        }
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.id, &self.label, &self.spans).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (id, label, spans) = <(String, String, Vec<Span>)>::deserialize(deserializer)?;
        Ok(Self { id, label, spans })
    }
}

/// One annotatable passage with its extracted entities
///
/// `text` is the stripped annotation-window content; every entity span
/// indexes into it. Fields are declared in serialized key order so the
/// emitted JSON has sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub entities: Vec<Entity>,
    pub name: String,
    pub text: String,
}

impl Document {
    /// Check the document invariant: every span fits the text
    pub fn spans_in_bounds(&self) -> bool {
        let len = self.text.chars().count();
        self.entities
            .iter()
            .flat_map(|e| e.spans.iter())
            .all(|s| s.fits(len))
    }
}

// ============================================================================
// Corpus Models
// ============================================================================

/// Display definition for one entity type in the visualization palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeDef {
    /// Background color (CSS color or hex)
    #[serde(rename = "bgColor")]
    pub bg_color: String,

    /// Border color, or the literal "darken"
    #[serde(rename = "borderColor")]
    pub border_color: String,

    /// Display labels, longest first
    pub labels: Vec<String>,

    /// Type name entities carry in their label field
    #[serde(rename = "type")]
    pub type_name: String,
}

impl EntityTypeDef {
    /// Create a type definition with a darkened border
    pub fn new(type_name: impl Into<String>, labels: Vec<String>, bg_color: impl Into<String>) -> Self {
        Self {
            bg_color: bg_color.into(),
            border_color: "darken".to_string(),
            labels,
            type_name: type_name.into(),
        }
    }
}

/// Collection-level metadata: the entity-type palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionData {
    pub entity_types: Vec<EntityTypeDef>,
}

/// Document-level payload: the ordered documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    pub docs: Vec<Document>,
}

/// A free-text log entry carried in the corpus artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
}

/// The compiled corpus artifact
///
/// `doc_data.docs` is ordered ascending by `(chapter, passage)`; combined
/// with sorted keys this makes repeated compilations byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(rename = "collData")]
    pub coll_data: CollectionData,

    #[serde(rename = "docData")]
    pub doc_data: DocumentData,

    pub log: Vec<LogEntry>,
}

impl Corpus {
    /// Create a corpus from compiled documents and a configuration
    pub fn new(docs: Vec<Document>, config: &CorpusConfig) -> Self {
        Self {
            coll_data: CollectionData {
                entity_types: config.entity_types.clone(),
            },
            doc_data: DocumentData { docs },
            log: config.log.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_fits() {
        assert!(Span::new(0, 5).fits(5));
        assert!(Span::new(2, 2).fits(5));
        assert!(!Span::new(3, 6).fits(5));
        assert!(!Span::new(4, 2).fits(5));
    }

    #[test]
    fn test_entity_serializes_as_array() {
        let entity = Entity::new("T1", "ALIAS", Span::new(6, 9));
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, r#"["T1","ALIAS",[[6,9]]]"#);
    }

    #[test]
    fn test_entity_roundtrip() {
        let entity = Entity::new("T42", "ALIAS", Span::new(0, 3));
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, back);
    }

    #[test]
    fn test_corpus_keys_sorted() {
        let config = CorpusConfig::default();
        let corpus = Corpus::new(vec![], &config);
        let json = serde_json::to_string(&corpus).unwrap();

        let coll = json.find("\"collData\"").unwrap();
        let doc = json.find("\"docData\"").unwrap();
        let log = json.find("\"log\"").unwrap();
        assert!(coll < doc && doc < log);
    }

    #[test]
    fn test_entity_type_def_keys_sorted() {
        let def = EntityTypeDef::new("ALIAS", vec!["ALIAS".to_string(), "AL".to_string()], "red");
        let json = serde_json::to_string(&def).unwrap();

        let bg = json.find("\"bgColor\"").unwrap();
        let border = json.find("\"borderColor\"").unwrap();
        let labels = json.find("\"labels\"").unwrap();
        let ty = json.find("\"type\"").unwrap();
        assert!(bg < border && border < labels && labels < ty);
    }

    #[test]
    fn test_document_bounds_invariant() {
        let doc = Document {
            entities: vec![Entity::new("T1", "ALIAS", Span::new(6, 9))],
            name: "Chapter 1, Passage 1".to_string(),
            text: "Hello Bob.".to_string(),
        };
        assert!(doc.spans_in_bounds());

        let bad = Document {
            entities: vec![Entity::new("T2", "ALIAS", Span::new(6, 99))],
            name: "Chapter 1, Passage 2".to_string(),
            text: "Hello Bob.".to_string(),
        };
        assert!(!bad.spans_in_bounds());
    }
}
