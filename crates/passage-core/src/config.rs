//! Corpus configuration
//!
//! Window markers, the line-separator gap, the alias label, file extensions,
//! the chapter directory convention, and the visualization palette all live
//! here. Defaults match the Pride and Prejudice annotation corpus; loading
//! from a TOML file allows reuse across corpora without source edits.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{EntityTypeDef, LogEntry};

/// Width of the dashed rule that follows the begin marker
const BEGIN_RULE_WIDTH: usize = 30;
/// Width of the dashed rule that precedes the end marker
const END_RULE_WIDTH: usize = 28;

/// Configuration for corpus compilation
///
/// `Default` carries the Pride and Prejudice corpus conventions; any field
/// can be overridden from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Marker line (including its dashed rule) that opens the annotation window
    pub start_marker: String,

    /// Marker line (including its dashed rule) that closes the annotation window
    pub end_marker: String,

    /// Number of line-separator characters between the start marker and the
    /// first annotated character, as counted by the annotation offsets.
    /// Validated against the actual file content before any remapping.
    pub window_gap: usize,

    /// Label stamped on every extracted entity
    pub alias_label: String,

    /// Extension of annotation files (without the dot)
    pub ann_extension: String,

    /// Extension of annotation document files (without the dot)
    pub doc_extension: String,

    /// Separator before the trailing chapter number in directory names
    pub chapter_separator: char,

    /// Skip broken documents with a warning instead of aborting the run
    pub skip_broken: bool,

    /// Entity-type palette for the visualization tool
    pub entity_types: Vec<EntityTypeDef>,

    /// Static log entries copied into the corpus artifact
    pub log: Vec<LogEntry>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            start_marker: format!(
                "<===== BEGIN ANNOTATION =====>\n{}",
                "-".repeat(BEGIN_RULE_WIDTH)
            ),
            end_marker: format!(
                "{}\n<===== END ANNOTATION =====>",
                "-".repeat(END_RULE_WIDTH)
            ),
            window_gap: 2,
            alias_label: "ALIAS".to_string(),
            ann_extension: "ann".to_string(),
            doc_extension: "txt".to_string(),
            chapter_separator: '-',
            skip_broken: false,
            entity_types: default_entity_types(),
            log: Vec::new(),
        }
    }
}

impl CorpusConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is internally usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_marker.is_empty() {
            return Err(ConfigError::EmptyField("start_marker"));
        }
        if self.end_marker.is_empty() {
            return Err(ConfigError::EmptyField("end_marker"));
        }
        if self.alias_label.is_empty() {
            return Err(ConfigError::EmptyField("alias_label"));
        }
        if self.ann_extension.is_empty() {
            return Err(ConfigError::EmptyField("ann_extension"));
        }
        if self.doc_extension.is_empty() {
            return Err(ConfigError::EmptyField("doc_extension"));
        }
        Ok(())
    }
}

/// The default visualization palette
fn default_entity_types() -> Vec<EntityTypeDef> {
    vec![
        EntityTypeDef::new(
            "ALIAS",
            vec!["ALIAS".to_string(), "AL".to_string()],
            "red",
        ),
        EntityTypeDef::new(
            "NON-CHARACTER",
            vec!["NON-CHARACTER".to_string(), "NON".to_string()],
            "#FFFFFF",
        ),
        EntityTypeDef::new("OTHER", vec!["OTHER".to_string()], "#BBBBBB"),
        EntityTypeDef::new("???", vec!["???".to_string()], "#777777"),
        EntityTypeDef::new("UNRESOLVED", vec!["UNRESOLVED".to_string()], "#39FF14"),
    ]
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Configuration field must not be empty: {0}")]
    EmptyField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_markers() {
        let config = CorpusConfig::default();
        assert!(config.start_marker.starts_with("<===== BEGIN ANNOTATION =====>"));
        assert!(config.start_marker.ends_with(&"-".repeat(30)));
        assert!(config.end_marker.starts_with(&"-".repeat(28)));
        assert!(config.end_marker.ends_with("<===== END ANNOTATION =====>"));
        assert_eq!(config.window_gap, 2);
        assert_eq!(config.alias_label, "ALIAS");
    }

    #[test]
    fn test_default_palette() {
        let config = CorpusConfig::default();
        let names: Vec<&str> = config
            .entity_types
            .iter()
            .map(|t| t.type_name.as_str())
            .collect();
        assert_eq!(
            names,
            ["ALIAS", "NON-CHARACTER", "OTHER", "???", "UNRESOLVED"]
        );
        assert!(config
            .entity_types
            .iter()
            .all(|t| t.border_color == "darken"));
    }

    #[test]
    fn test_partial_toml_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alias_label = \"MENTION\"\nwindow_gap = 1").unwrap();

        let config = CorpusConfig::from_file(file.path()).unwrap();
        assert_eq!(config.alias_label, "MENTION");
        assert_eq!(config.window_gap, 1);
        // Untouched fields keep their defaults
        assert_eq!(config.doc_extension, "txt");
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alias_label = [not toml").unwrap();

        let err = CorpusConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_empty_field_rejected() {
        let config = CorpusConfig {
            alias_label: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyField("alias_label"))
        ));
    }
}
