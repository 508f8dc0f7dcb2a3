//! Annotation file parsing and entity extraction
//!
//! Annotation files are line-oriented and tab-delimited: an opaque record
//! id, a tab, then whitespace-separated span tokens. The first span token
//! is a category marker; the remaining tokens encode offsets, with `;`
//! joining the parts of a discontinuous span. Discontinuous spans are
//! collapsed to their outer bounds.

use std::path::Path;

use tracing::debug;

use passage_core::{CorpusConfig, Entity, PassageError, Result, Span};

use crate::offset::remap;
use crate::window::Window;

/// One parsed annotation line, still in raw-document coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotationRecord<'a> {
    /// Record id, unique within the file
    pub id: &'a str,
    /// Category marker, the first span token
    pub category: &'a str,
    /// First listed start offset
    pub raw_start: usize,
    /// Last listed end offset
    pub raw_end: usize,
}

/// Parse one annotation line
///
/// Returns `Ok(None)` for blank lines (a trailing newline must not
/// fabricate a record). Everything unparsable is a typed error naming the
/// file and 1-based line number.
pub fn parse_line<'a>(
    line: &'a str,
    path: &Path,
    line_no: usize,
) -> Result<Option<RawAnnotationRecord<'a>>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = line.splitn(2, '\t');
    let id = fields.next().unwrap_or_default();
    let span_field = fields.next().ok_or_else(|| {
        PassageError::malformed(path, line_no, "expected at least 2 tab-delimited fields")
    })?;

    let tokens: Vec<&str> = span_field.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(PassageError::malformed(
            path,
            line_no,
            format!("expected at least 3 span tokens, got {}", tokens.len()),
        ));
    }

    let raw_start = parse_offset(tokens[1], path, line_no)?;

    // A `;` in the third token marks a discontinuous span; its last part's
    // end offset is the next token. Either way the record collapses to one
    // contiguous span from first start to last end.
    let raw_end = if tokens[2].contains(';') {
        let last = tokens.get(3).ok_or_else(|| {
            PassageError::malformed(path, line_no, "discontinuous span is missing its end offset")
        })?;
        parse_offset(last, path, line_no)?
    } else {
        parse_offset(tokens[2], path, line_no)?
    };

    Ok(Some(RawAnnotationRecord {
        id,
        category: tokens[0],
        raw_start,
        raw_end,
    }))
}

fn parse_offset(token: &str, path: &Path, line_no: usize) -> Result<usize> {
    token.parse().map_err(|_| {
        PassageError::malformed(path, line_no, format!("non-numeric offset token {token:?}"))
    })
}

/// Extract entities from an annotation file's content
///
/// Every span is remapped against the window computed from the same
/// document and bounds-checked against the stripped text; an offset that
/// lands outside it is an error.
pub fn extract(
    ann_text: &str,
    window: &Window,
    stripped_chars: usize,
    config: &CorpusConfig,
    ann_path: &Path,
) -> Result<Vec<Entity>> {
    let mut entities = Vec::new();

    for (i, line) in ann_text.lines().enumerate() {
        let Some(record) = parse_line(line, ann_path, i + 1)? else {
            continue;
        };

        let start = remap(record.raw_start, window.prefix_chars, config.window_gap);
        let end = remap(record.raw_end, window.prefix_chars, config.window_gap);

        if start < 0 || end < start || end as usize > stripped_chars {
            return Err(PassageError::InvalidSpan {
                id: record.id.to_string(),
                start,
                end,
                len: stripped_chars,
            });
        }

        entities.push(Entity::new(
            record.id,
            config.alias_label.clone(),
            Span::new(start as usize, end as usize),
        ));
    }

    debug!(
        path = %ann_path.display(),
        count = entities.len(),
        "extracted entities"
    );

    Ok(entities)
}
