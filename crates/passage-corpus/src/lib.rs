//! Passage Corpus - Discovery, compilation, and serialization
//!
//! Walks an annotation tree, pairs every annotation file with its
//! companion document in a parallel tree, assembles each pair through
//! passage-parser, and wraps the results into one corpus artifact with a
//! deterministic document order.

pub mod report;

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use passage_core::{Corpus, CorpusConfig, Document, PassageError, Result};

// ============================================================================
// Discovery
// ============================================================================

/// Sort key for one passage: chapter number, then passage id
///
/// The output document order is ascending by this key, independent of
/// filesystem traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassageKey {
    pub chapter: u32,
    pub passage: u32,
}

impl PassageKey {
    /// The display name documents carry in the corpus
    pub fn display_name(&self) -> String {
        format!("Chapter {}, Passage {}", self.chapter, self.passage)
    }
}

/// One discovered annotation file and where its companion document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPassage {
    pub key: PassageKey,
    pub ann_path: PathBuf,
    /// Path of the companion document, relative to the document root
    pub doc_rel: PathBuf,
}

/// Discover every annotation file under a root directory
///
/// The layout convention: annotation files sit in chapter directories
/// whose names end in a separator plus the chapter number, and are named
/// by their numeric passage id. The companion document has the same
/// relative location under the document root with the sibling extension.
/// Paths that match the annotation extension but not the convention are
/// layout errors.
///
/// The result is sorted by `(chapter, passage)`.
pub fn discover(ann_root: &Path, config: &CorpusConfig) -> Result<Vec<DiscoveredPassage>> {
    let mut passages = Vec::new();

    for entry in WalkDir::new(ann_root) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| ann_root.to_path_buf());
            PassageError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(config.ann_extension.as_str()) {
            continue;
        }

        let key = passage_key(path, config)?;
        let doc_rel = path
            .strip_prefix(ann_root)
            .map_err(|_| PassageError::InvalidLayout {
                path: path.to_path_buf(),
                reason: "not under the annotation root".to_string(),
            })?
            .with_extension(&config.doc_extension);

        passages.push(DiscoveredPassage {
            key,
            ann_path: path.to_path_buf(),
            doc_rel,
        });
    }

    passages.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.ann_path.cmp(&b.ann_path)));
    Ok(passages)
}

/// Derive the `(chapter, passage)` key from an annotation file path
fn passage_key(path: &Path, config: &CorpusConfig) -> Result<PassageKey> {
    let layout_err = |reason: &str| PassageError::InvalidLayout {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .ok_or_else(|| layout_err("annotation file has no parent directory"))?;

    let chapter = dir_name
        .rsplit(config.chapter_separator)
        .next()
        .and_then(|c| c.parse().ok())
        .ok_or_else(|| layout_err("directory name has no trailing numeric chapter component"))?;

    let passage = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| layout_err("file stem is not a numeric passage id"))?;

    Ok(PassageKey { chapter, passage })
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile a corpus from parallel annotation and document trees
///
/// Broken documents abort the run unless `skip_broken` is set, in which
/// case they are dropped with a warning.
pub fn compile(ann_root: &Path, doc_root: &Path, config: &CorpusConfig) -> Result<Corpus> {
    let discovered = discover(ann_root, config)?;
    let mut docs = Vec::with_capacity(discovered.len());

    for passage in &discovered {
        match compile_one(passage, doc_root, config) {
            Ok(doc) => docs.push(doc),
            Err(e) if config.skip_broken => {
                warn!(error = %e, ann = %passage.ann_path.display(), "skipping broken document");
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        documents = docs.len(),
        discovered = discovered.len(),
        "compiled corpus"
    );
    Ok(Corpus::new(docs, config))
}

fn compile_one(
    passage: &DiscoveredPassage,
    doc_root: &Path,
    config: &CorpusConfig,
) -> Result<Document> {
    let doc_path = doc_root.join(&passage.doc_rel);
    if !doc_path.is_file() {
        return Err(PassageError::MissingCompanion {
            ann: passage.ann_path.clone(),
            expected: doc_path,
        });
    }

    let raw_text = read(&doc_path)?;
    let ann_text = read(&passage.ann_path)?;

    passage_parser::assemble(
        passage.key.display_name(),
        &raw_text,
        &ann_text,
        &doc_path,
        &passage.ann_path,
        config,
    )
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| PassageError::io(path, e))
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a corpus to pretty-printed JSON
///
/// Key order is fixed by the model types and document order by the
/// compiler, so the same tree always serializes to identical bytes.
pub fn to_json(corpus: &Corpus) -> Result<String> {
    serde_json::to_string_pretty(corpus).map_err(|e| PassageError::Serialize(e.to_string()))
}

/// Write a corpus artifact to a file
pub fn write_corpus(corpus: &Corpus, path: &Path) -> Result<()> {
    let json = to_json(corpus)?;
    std::fs::write(path, json).map_err(|e| PassageError::io(path, e))
}

/// Read a compiled corpus artifact back
pub fn read_corpus(path: &Path) -> Result<Corpus> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| PassageError::CorpusParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
