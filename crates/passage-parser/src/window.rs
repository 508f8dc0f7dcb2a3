//! Annotation window location and stripping
//!
//! An annotation document embeds the annotatable text between two fixed
//! marker rules, with pre-context before and post-context after. This
//! module locates the window, strips it, and checks that the configured
//! line-separator gap actually matches the file.

use std::ops::Range;
use std::path::Path;

use passage_core::{CorpusConfig, PassageError, Result};

/// A located annotation window within a raw document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Character index in the raw document just past the start marker.
    /// This is the prefix length annotation offsets are remapped against.
    pub prefix_chars: usize,

    /// Byte range of the text strictly between the two markers
    body: Range<usize>,
}

impl Window {
    /// The window body, untrimmed
    pub fn body<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.body.clone()]
    }
}

/// Locate the annotation window in a raw document
///
/// Both markers must be present. The end marker is searched for after the
/// start marker, so overlapping rules cannot invert the window.
pub fn locate_window(raw: &str, config: &CorpusConfig, path: &Path) -> Result<Window> {
    let start_byte = raw
        .find(&config.start_marker)
        .ok_or_else(|| PassageError::MarkerNotFound {
            marker: config.start_marker.clone(),
            path: path.to_path_buf(),
        })?;
    let body_start = start_byte + config.start_marker.len();

    let end_byte = raw[body_start..]
        .find(&config.end_marker)
        .map(|rel| body_start + rel)
        .ok_or_else(|| PassageError::MarkerNotFound {
            marker: config.end_marker.clone(),
            path: path.to_path_buf(),
        })?;

    Ok(Window {
        prefix_chars: raw[..body_start].chars().count(),
        body: body_start..end_byte,
    })
}

/// The stripped annotatable text: the window body with surrounding
/// whitespace trimmed
pub fn strip<'a>(raw: &'a str, window: &Window) -> &'a str {
    window.body(raw).trim()
}

/// Check that the configured window gap matches the file
///
/// Remapping subtracts `window_gap` for the line separator between the
/// start rule and the first annotated character, so the window body must
/// begin with exactly `window_gap` whitespace characters. On mismatch no
/// remapping takes place for the document.
pub fn validate_gap(raw: &str, window: &Window, config: &CorpusConfig, path: &Path) -> Result<()> {
    let body = window.body(raw);
    let leading_ws = body.chars().take_while(|c| c.is_whitespace()).count();

    if body.trim().is_empty() || leading_ws == config.window_gap {
        Ok(())
    } else {
        Err(PassageError::WindowGapMismatch {
            gap: config.window_gap,
            path: path.to_path_buf(),
        })
    }
}
