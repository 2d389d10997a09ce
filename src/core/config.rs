//! Schema source configuration.
//!
//! The schema file is tabular. `SchemaConfig` describes its dialect:
//! - field delimiter (`,` by default)
//! - whether the first row is a header
//! - the token meaning "readable" in the is-readable column
//! - the token meaning "always sorts last" in the display-rank column
//! - an optional comment prefix for skipped lines
//!
//! Column order is fixed and not configurable; list-valued fields are always
//! delimited by [`LIST_DELIMITER`](super::tag::LIST_DELIMITER).

use serde::{Deserialize, Serialize};

/// Dialect of a schema source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Delimiter between columns.
    pub field_delimiter: char,

    /// Is the first non-comment line a header row?
    pub has_header: bool,

    /// Token in the is-readable column marking a human-readable attribute.
    /// Matched case-insensitively; anything else means "not readable".
    pub readable_token: String,

    /// Token in the display-rank column meaning "always sorts last".
    pub last_rank_token: String,

    /// Lines starting with this character are skipped. `None` disables
    /// comments.
    pub comment_prefix: Option<char>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            field_delimiter: ',',
            has_header: true,
            readable_token: "yes".to_string(),
            last_rank_token: "last".to_string(),
            comment_prefix: Some('#'),
        }
    }
}

impl SchemaConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column delimiter.
    #[must_use]
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    /// Treat the first line as data rather than a header.
    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    /// Set the readable token.
    #[must_use]
    pub fn with_readable_token(mut self, token: impl Into<String>) -> Self {
        self.readable_token = token.into();
        self
    }

    /// Set the "sorts last" rank token.
    #[must_use]
    pub fn with_last_rank_token(mut self, token: impl Into<String>) -> Self {
        self.last_rank_token = token.into();
        self
    }

    /// Set or disable the comment prefix.
    #[must_use]
    pub fn with_comment_prefix(mut self, prefix: Option<char>) -> Self {
        self.comment_prefix = prefix;
        self
    }

    /// Check whether a raw line should be skipped.
    #[must_use]
    pub fn is_skipped(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || self
                .comment_prefix
                .is_some_and(|prefix| trimmed.starts_with(prefix))
    }

    /// Check whether an is-readable field marks the attribute readable.
    #[must_use]
    pub fn is_readable(&self, field: &str) -> bool {
        field.trim().eq_ignore_ascii_case(&self.readable_token)
    }

    /// Check whether a display-rank field is the "sorts last" token.
    #[must_use]
    pub fn is_last_rank(&self, field: &str) -> bool {
        field.trim().eq_ignore_ascii_case(&self.last_rank_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchemaConfig::new();
        assert_eq!(config.field_delimiter, ',');
        assert!(config.has_header);
        assert!(config.is_readable("YES"));
        assert!(!config.is_readable("no"));
        assert!(config.is_last_rank(" Last "));
    }

    #[test]
    fn test_builder() {
        let config = SchemaConfig::new()
            .with_field_delimiter(';')
            .without_header()
            .with_readable_token("y")
            .with_last_rank_token("end")
            .with_comment_prefix(None);

        assert_eq!(config.field_delimiter, ';');
        assert!(!config.has_header);
        assert!(config.is_readable("y"));
        assert!(config.is_last_rank("END"));
        assert!(!config.is_skipped("# not a comment any more"));
    }

    #[test]
    fn test_skipped_lines() {
        let config = SchemaConfig::default();
        assert!(config.is_skipped(""));
        assert!(config.is_skipped("   "));
        assert!(config.is_skipped("  # comment"));
        assert!(!config.is_skipped("gph,integer,0"));
    }

    #[test]
    fn test_partial_deserialization() {
        let config: SchemaConfig = serde_json::from_str(r#"{"field_delimiter":";"}"#).unwrap();
        assert_eq!(config.field_delimiter, ';');
        assert_eq!(config.readable_token, "yes");
    }
}
