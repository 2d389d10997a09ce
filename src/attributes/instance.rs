//! Attribute instances - per-owner runtime state.
//!
//! An `AttributeInstance` is the mutable copy of a definition held by one
//! owner. It tracks the current value and a free-text suffix appended to its
//! description line. Display metadata is shared with the definition.

use std::fmt;
use std::sync::Arc;

use super::definition::AttributeDefinition;
use super::display::{DisplayRank, RenderStyle};
use crate::core::Tag;
use crate::kinds::Kind;

/// An attribute held by one owner.
#[derive(Clone)]
pub struct AttributeInstance<K: Kind> {
    definition: Arc<AttributeDefinition<K>>,
    value: K::Value,
    extra: String,
    sequence: u64,
}

impl<K: Kind> AttributeInstance<K> {
    pub(crate) fn new(definition: Arc<AttributeDefinition<K>>) -> Self {
        let value = definition.default_value().clone();
        Self {
            definition,
            value,
            extra: String::new(),
            sequence: 0,
        }
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// The shared definition.
    #[must_use]
    pub fn definition(&self) -> &Arc<AttributeDefinition<K>> {
        &self.definition
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Check the definition for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.definition.has_tag(tag)
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &K::Value {
        &self.value
    }

    /// Replace the value, returning the previous one.
    pub fn set_value(&mut self, value: K::Value) -> K::Value {
        std::mem::replace(&mut self.value, value)
    }

    /// Current value in the kind's textual grammar.
    #[must_use]
    pub fn value_text(&self) -> String {
        K::format(&self.value)
    }

    /// Suffix appended to the description line.
    #[must_use]
    pub fn extra_description(&self) -> &str {
        &self.extra
    }

    /// Append to the description suffix.
    pub fn append_description(&mut self, text: &str) {
        self.extra.push_str(text);
    }

    /// Replace the description suffix.
    pub fn set_extra_description(&mut self, text: impl Into<String>) {
        self.extra = text.into();
    }

    /// Store-wide insertion order.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Apply the definition's positivity predicate to the current value.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.definition.is_positive(&self.value)
    }

    /// Parse `text` with the kind's grammar and compare to the current
    /// value. Text that does not parse never matches.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        K::parse(text).is_ok_and(|parsed| parsed == self.value)
    }

    /// Display rank, if the attribute is human-readable.
    #[must_use]
    pub fn display_rank(&self) -> Option<DisplayRank> {
        self.definition.display().map(|display| display.rank())
    }

    /// Whether the attribute appears in its owner's description.
    #[must_use]
    pub fn should_display(&self) -> bool {
        self.definition
            .display()
            .is_some_and(|display| !display.suppresses(&self.value))
    }

    /// Render the description line, or `None` when not displayed.
    #[must_use]
    pub fn render(&self, style: RenderStyle) -> Option<String> {
        let display = self.definition.display()?;
        if display.suppresses(&self.value) {
            return None;
        }
        Some(display.render(&self.value, &self.extra, style))
    }
}

impl<K: Kind> fmt::Debug for AttributeInstance<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeInstance")
            .field("name", &self.name())
            .field("kind", &K::ID)
            .field("value", &self.value)
            .field("extra", &self.extra)
            .field("sequence", &self.sequence)
            .finish()
    }
}
