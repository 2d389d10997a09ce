//! Row-level view of a schema source.
//!
//! Columns, in fixed order:
//!
//! ```text
//! name, kind, default-value, tag-list, is-readable, display-name,
//! display-settings, ignore-value, display-rank
//! ```
//!
//! Fields are trimmed. Empty or omitted trailing columns are absent; the
//! first three columns are required.

use crate::core::{SchemaConfig, SchemaError, SchemaErrorKind};

const COLUMNS: [&str; 9] = [
    "name",
    "kind",
    "default-value",
    "tag-list",
    "is-readable",
    "display-name",
    "display-settings",
    "ignore-value",
    "display-rank",
];

/// One attribute row of the schema source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaRow<'a> {
    /// 1-based source line.
    pub line: usize,
    /// Attribute name.
    pub name: &'a str,
    /// Kind token, not yet resolved.
    pub kind: &'a str,
    /// Default value text, not yet parsed.
    pub default: &'a str,
    /// `:`-delimited tag tokens.
    pub tags: Option<&'a str>,
    /// Whether the is-readable column holds the readable token.
    pub readable: bool,
    /// Display name.
    pub display_name: Option<&'a str>,
    /// `:`-delimited display setting tokens.
    pub settings: Option<&'a str>,
    /// Ignore value text, not yet parsed.
    pub ignore: Option<&'a str>,
    /// Display rank text (integer or the "last" token).
    pub rank: Option<&'a str>,
}

impl<'a> SchemaRow<'a> {
    /// Split one source line into a row.
    ///
    /// # Errors
    ///
    /// Returns `SchemaErrorKind::MissingColumn` when the name or kind is
    /// empty, or the default-value column is omitted.
    pub fn parse(line: usize, text: &'a str, config: &SchemaConfig) -> Result<Self, SchemaError> {
        let fields: Vec<&'a str> = text.split(config.field_delimiter).map(str::trim).collect();
        let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty());
        let missing = |i: usize| SchemaError::new(line, SchemaErrorKind::MissingColumn(COLUMNS[i]));

        Ok(Self {
            line,
            name: field(0).ok_or_else(|| missing(0))?,
            kind: field(1).ok_or_else(|| missing(1))?,
            default: fields.get(2).copied().ok_or_else(|| missing(2))?,
            tags: field(3),
            readable: field(4).is_some_and(|f| config.is_readable(f)),
            display_name: field(5),
            settings: field(6),
            ignore: field(7),
            rank: field(8),
        })
    }
}

/// Iterate the attribute rows of a source, skipping blank lines, comments
/// and the header.
pub fn rows<'a>(
    source: &'a str,
    config: &'a SchemaConfig,
) -> impl Iterator<Item = Result<SchemaRow<'a>, SchemaError>> + 'a {
    source
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|(_, text)| !config.is_skipped(text))
        .skip(usize::from(config.has_header))
        .map(|(line, text)| SchemaRow::parse(line, text, config))
}
