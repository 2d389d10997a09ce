//! Error types for the attribute store.
//!
//! Uses `thiserror` for ergonomic error definition. Every error is surfaced
//! to the caller immediately; nothing is retried or defaulted internally.

use thiserror::Error;

use super::entity::OwnerId;
use crate::kinds::KindId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AttrError>;

/// The main error type for store operations.
#[derive(Debug, Error)]
pub enum AttrError {
    /// The name is not declared in the schema.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    /// The name is declared but the owner does not hold it.
    #[error("{owner} does not hold attribute `{name}`")]
    AttributeNotHeld {
        /// Owner that was queried.
        owner: OwnerId,
        /// Attribute name.
        name: String,
    },

    /// `generate` was called on a name the owner already holds.
    #[error("{owner} already holds attribute `{name}`")]
    DuplicateAttribute {
        /// Owner that already holds the attribute.
        owner: OwnerId,
        /// Attribute name.
        name: String,
    },

    /// The owner was registered twice.
    #[error("{0} is already registered")]
    DuplicateOwner(OwnerId),

    /// The owner was never registered (or has been unregistered).
    #[error("{0} is not registered")]
    UnknownOwner(OwnerId),

    /// The owner's validation predicate refused the definition.
    #[error("validation rejected attribute `{name}` for {owner}")]
    Validation {
        /// Owner the attribute was generated for.
        owner: OwnerId,
        /// Attribute name.
        name: String,
    },

    /// The witness passed does not match the name's schema kind.
    #[error("attribute `{name}` is {actual}, not {expected}")]
    TypeMismatch {
        /// Attribute name.
        name: String,
        /// Kind named by the caller's witness.
        expected: KindId,
        /// Kind declared by the schema.
        actual: KindId,
    },

    /// Text handed to an untyped setter did not parse for the kind.
    #[error(transparent)]
    InvalidValue(#[from] ParseValueError),

    /// Malformed schema source.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The schema file could not be read.
    #[error("cannot read schema {path}: {source}")]
    Io {
        /// Path that was opened.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl AttrError {
    /// Whether this error means "no such attribute", either in the schema
    /// or on the owner.
    #[must_use]
    pub fn is_unknown_attribute(&self) -> bool {
        matches!(
            self,
            AttrError::UnknownAttribute(_) | AttrError::AttributeNotHeld { .. }
        )
    }

    /// Whether an interactive host should present this error as a
    /// recoverable rejection ("cannot add this property right now")
    /// instead of treating it as a fault.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AttrError::Validation { .. }
                | AttrError::DuplicateAttribute { .. }
                | AttrError::UnknownAttribute(_)
                | AttrError::AttributeNotHeld { .. }
        )
    }
}

/// A token outside a closed enumeration (tag, group, kind, display setting).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {what} `{token}`")]
pub struct ParseTokenError {
    /// Which enumeration the token was parsed against.
    pub what: &'static str,
    /// The offending token.
    pub token: String,
}

impl ParseTokenError {
    /// Create a new token error.
    #[must_use]
    pub fn new(what: &'static str, token: impl Into<String>) -> Self {
        Self {
            what,
            token: token.into(),
        }
    }
}

/// Text that does not follow a kind's grammar.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot parse `{text}` as {kind}")]
pub struct ParseValueError {
    /// Kind whose grammar was applied.
    pub kind: KindId,
    /// The offending text.
    pub text: String,
}

impl ParseValueError {
    /// Create a new value error.
    #[must_use]
    pub fn new(kind: KindId, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A fatal schema load failure, located at a 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("schema line {line}: {kind}")]
pub struct SchemaError {
    /// Source line (1-based).
    pub line: usize,
    /// What went wrong.
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    /// Create a new schema error.
    #[must_use]
    pub fn new(line: usize, kind: SchemaErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Categorized schema failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaErrorKind {
    /// The kind column is not one of the closed kinds.
    #[error("{0}")]
    UnknownKind(ParseTokenError),

    /// The default value does not parse for the declared kind.
    #[error("invalid default value: {0}")]
    InvalidDefault(ParseValueError),

    /// The ignore value does not parse for the declared kind.
    #[error("invalid ignore value: {0}")]
    InvalidIgnoreValue(ParseValueError),

    /// A tag-list entry is not a known tag.
    #[error("{0}")]
    UnknownTag(ParseTokenError),

    /// A display-settings entry is not a known setting.
    #[error("{0}")]
    UnknownDisplaySetting(ParseTokenError),

    /// The name repeats an already-loaded name.
    #[error("duplicate attribute name `{0}`")]
    DuplicateName(String),

    /// A required column is empty or missing.
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    /// The display rank is neither an integer nor the "last" token.
    #[error("invalid display rank `{0}`")]
    InvalidRank(String),

    /// A visible attribute was given a negative display rank.
    #[error("negative display rank {0} on a visible attribute")]
    NegativeRank(i64),

    /// A visible attribute has no display rank.
    #[error("visible attribute `{0}` has no display rank")]
    MissingRank(String),
}
