//! Type-membership reporting
//!
//! Cross-references a compiled corpus's entity-type palette against
//! document membership: for each type, which documents contain at least
//! one entity of that type. Depends only on the corpus output shape.

use std::path::Path;

use passage_core::{Corpus, PassageError, Result};

/// One report row: an entity type and the documents it appears in
pub type MembershipRow = (String, Vec<String>);

/// Compute the type-to-document membership table
///
/// Rows are sorted by type name ascending; types with no member
/// documents are omitted.
pub fn type_membership(corpus: &Corpus) -> Vec<MembershipRow> {
    let mut rows: Vec<MembershipRow> = corpus
        .coll_data
        .entity_types
        .iter()
        .map(|def| {
            let members = corpus
                .doc_data
                .docs
                .iter()
                .filter(|doc| doc.entities.iter().any(|e| e.label == def.type_name))
                .map(|doc| doc.name.clone())
                .collect::<Vec<_>>();
            (def.type_name.clone(), members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect();

    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

/// Write the membership table as comma-delimited rows: `type,doc,doc,...`
pub fn write_report(rows: &[MembershipRow], path: &Path) -> Result<()> {
    let as_io = |e: csv::Error| {
        PassageError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e))
    };

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(as_io)?;

    for (type_name, docs) in rows {
        let record = std::iter::once(type_name.as_str()).chain(docs.iter().map(String::as_str));
        writer.write_record(record).map_err(as_io)?;
    }

    writer
        .flush()
        .map_err(|e| PassageError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_core::{CollectionData, CorpusConfig, Document, DocumentData, Entity, Span};

    fn doc(name: &str, labels: &[&str]) -> Document {
        Document {
            entities: labels
                .iter()
                .enumerate()
                .map(|(i, l)| Entity::new(format!("T{i}"), *l, Span::new(0, 1)))
                .collect(),
            name: name.to_string(),
            text: "x".to_string(),
        }
    }

    fn corpus(docs: Vec<Document>) -> Corpus {
        let config = CorpusConfig::default();
        Corpus {
            coll_data: CollectionData {
                entity_types: config.entity_types,
            },
            doc_data: DocumentData { docs },
            log: Vec::new(),
        }
    }

    #[test]
    fn test_membership_rows_sorted_by_type() {
        let corpus = corpus(vec![
            doc("Chapter 1, Passage 1", &["ALIAS", "UNRESOLVED"]),
            doc("Chapter 1, Passage 2", &["OTHER"]),
        ]);

        let rows = type_membership(&corpus);
        let types: Vec<&str> = rows.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(types, ["ALIAS", "OTHER", "UNRESOLVED"]);
    }

    #[test]
    fn test_document_counted_once_per_type() {
        let corpus = corpus(vec![doc("Chapter 2, Passage 3", &["ALIAS", "ALIAS"])]);

        let rows = type_membership(&corpus);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1, ["Chapter 2, Passage 3"]);
    }

    #[test]
    fn test_empty_types_omitted() {
        let corpus = corpus(vec![doc("Chapter 1, Passage 1", &["ALIAS"])]);

        let rows = type_membership(&corpus);
        assert!(rows.iter().all(|(t, _)| t == "ALIAS"));
    }

    #[test]
    fn test_write_report_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("table.csv");
        let rows = vec![
            (
                "ALIAS".to_string(),
                vec!["Chapter 1, Passage 1".to_string(), "Chapter 2, Passage 1".to_string()],
            ),
            ("OTHER".to_string(), vec!["Chapter 1, Passage 2".to_string()]),
        ];

        write_report(&rows, &out).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ALIAS,"));
        assert!(lines[0].contains("\"Chapter 1, Passage 1\""));
        assert!(lines[1].starts_with("OTHER,"));
    }
}
