//! Passage Parser - From raw annotation files to document objects
//!
//! The pipeline for one passage:
//! 1. Locate and strip the annotation window from the document file
//! 2. Remap every annotated span from raw-document coordinates into the
//!    stripped text's coordinates
//! 3. Compose the result into a `Document` ready for corpus assembly
//!
//! Stripping and remapping always use the same window, computed once per
//! document; there is no API that mixes windows across documents.

pub mod annotation;
pub mod offset;
pub mod window;

pub use annotation::{extract, parse_line, RawAnnotationRecord};
pub use window::{locate_window, strip, validate_gap, Window};

use std::path::Path;

use passage_core::{CorpusConfig, Document, Result};

/// Assemble one document from a (document text, annotation text) pair
///
/// Computes the window once, validates the configured gap against the
/// file, strips the text, and extracts entities with the same window.
pub fn assemble(
    name: impl Into<String>,
    raw_text: &str,
    ann_text: &str,
    doc_path: &Path,
    ann_path: &Path,
    config: &CorpusConfig,
) -> Result<Document> {
    let window = locate_window(raw_text, config, doc_path)?;
    validate_gap(raw_text, &window, config, doc_path)?;

    let text = strip(raw_text, &window);
    let entities = extract(ann_text, &window, text.chars().count(), config, ann_path)?;

    Ok(Document {
        entities,
        name: name.into(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_core::{PassageError, Span};
    use std::path::PathBuf;

    fn config() -> CorpusConfig {
        CorpusConfig {
            window_gap: 1,
            ..Default::default()
        }
    }

    fn wrap(text: &str, config: &CorpusConfig) -> String {
        format!(
            "PRE\n{}\n{}\n{}\nPOST",
            config.start_marker, text, config.end_marker
        )
    }

    #[test]
    fn test_assemble_hello_bob() {
        let config = config();
        let raw = wrap("Hello Bob.", &config);
        let bob = raw.find("Bob").unwrap();
        let ann = format!("T1\tALIAS {} {}", bob, bob + 3);

        let doc = assemble(
            "Chapter 1, Passage 1",
            &raw,
            &ann,
            &PathBuf::from("1.txt"),
            &PathBuf::from("1.ann"),
            &config,
        )
        .unwrap();

        assert_eq!(doc.text, "Hello Bob.");
        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.entities[0].id, "T1");
        assert_eq!(doc.entities[0].label, "ALIAS");
        assert_eq!(doc.entities[0].spans, vec![Span::new(6, 9)]);
        assert!(doc.spans_in_bounds());
    }

    #[test]
    fn test_assemble_multiple_entities() {
        let config = config();
        let raw = wrap("Anne met Mr. Darcy.", &config);
        let anne = raw.find("Anne").unwrap();
        let darcy = raw.find("Mr. Darcy").unwrap();
        let ann = format!(
            "T1\tALIAS {} {}\nT2\tALIAS {} {}\n",
            anne,
            anne + 4,
            darcy,
            darcy + 9
        );

        let doc = assemble(
            "Chapter 3, Passage 2",
            &raw,
            &ann,
            &PathBuf::from("2.txt"),
            &PathBuf::from("2.ann"),
            &config,
        )
        .unwrap();

        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[0].spans, vec![Span::new(0, 4)]);
        assert_eq!(doc.entities[1].spans, vec![Span::new(9, 18)]);
        assert_eq!(&doc.text[9..18], "Mr. Darcy");
    }

    #[test]
    fn test_assemble_rejects_out_of_window_span() {
        let config = config();
        let raw = wrap("Hello Bob.", &config);
        // An offset inside the pre-context remaps to a negative position.
        let ann = "T1\tALIAS 0 3".to_string();

        let err = assemble(
            "Chapter 1, Passage 1",
            &raw,
            &ann,
            &PathBuf::from("1.txt"),
            &PathBuf::from("1.ann"),
            &config,
        )
        .unwrap_err();

        assert!(matches!(err, PassageError::InvalidSpan { .. }));
    }

    #[test]
    fn test_assemble_empty_annotation_file() {
        let config = config();
        let raw = wrap("Nobody here.", &config);

        let doc = assemble(
            "Chapter 1, Passage 1",
            &raw,
            "",
            &PathBuf::from("1.txt"),
            &PathBuf::from("1.ann"),
            &config,
        )
        .unwrap();

        assert!(doc.entities.is_empty());
        assert_eq!(doc.text, "Nobody here.");
    }
}
