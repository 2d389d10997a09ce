//! Attribute definitions - schema-declared templates.
//!
//! `AttributeDefinition` holds the immutable properties of one named
//! attribute: its default value, its tags and, for human-readable
//! attributes, its display metadata. Definitions are shared behind an `Arc`
//! by every instance cloned from them.
//!
//! Per-owner mutable state lives in `AttributeInstance`.

use std::fmt;
use std::sync::Arc;

use super::display::DisplayInfo;
use super::instance::AttributeInstance;
use crate::core::{Tag, TagSet};
use crate::kinds::{Kind, KindId};

/// Static attribute definition.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use game_attrs::attributes::{AttributeDefinition, DisplayInfo, DisplayRank};
/// use game_attrs::core::Tag;
/// use game_attrs::kinds::IntegerKind;
///
/// let gph = Arc::new(
///     AttributeDefinition::<IntegerKind>::new("gph", 0)
///         .with_tag(Tag::StatMod)
///         .with_display(DisplayInfo::new("Gold Per Hour", DisplayRank::At(1))),
/// );
///
/// let instance = gph.new_instance();
/// assert_eq!(*instance.value(), 0);
/// assert!(gph.has_tag(Tag::StatMod));
/// ```
#[derive(Clone)]
pub struct AttributeDefinition<K: Kind> {
    name: String,
    default: K::Value,
    tags: TagSet,
    display: Option<DisplayInfo<K>>,
    positive: Option<fn(&K::Value) -> bool>,
}

impl<K: Kind> AttributeDefinition<K> {
    /// Create a definition with no tags and no display metadata.
    ///
    /// The positivity predicate starts as the kind's default.
    pub fn new(name: impl Into<String>, default: K::Value) -> Self {
        Self {
            name: name.into(),
            default,
            tags: TagSet::new(),
            display: None,
            positive: K::default_positive(),
        }
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Replace the tag set (builder pattern).
    #[must_use]
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    /// Make the attribute human-readable (builder pattern).
    #[must_use]
    pub fn with_display(mut self, display: DisplayInfo<K>) -> Self {
        self.display = Some(display);
        self
    }

    /// Replace the positivity predicate (builder pattern).
    #[must_use]
    pub fn with_positive(mut self, predicate: Option<fn(&K::Value) -> bool>) -> Self {
        self.positive = predicate;
        self
    }

    pub(crate) fn display_mut(&mut self) -> Option<&mut DisplayInfo<K>> {
        self.display.as_mut()
    }

    pub(crate) fn set_positive(&mut self, predicate: Option<fn(&K::Value) -> bool>) {
        self.positive = predicate;
    }

    /// Globally unique attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of this definition.
    #[must_use]
    pub fn kind(&self) -> KindId {
        K::ID
    }

    /// Default value given to new instances.
    #[must_use]
    pub fn default_value(&self) -> &K::Value {
        &self.default
    }

    /// Characteristic tags.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Display metadata, if the attribute is human-readable.
    #[must_use]
    pub fn display(&self) -> Option<&DisplayInfo<K>> {
        self.display.as_ref()
    }

    /// Whether the attribute is human-readable.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.display.is_some()
    }

    /// Apply the positivity predicate. `false` when there is none.
    #[must_use]
    pub fn is_positive(&self, value: &K::Value) -> bool {
        self.positive.is_some_and(|predicate| predicate(value))
    }

    /// Clone a fresh instance holding the default value.
    #[must_use]
    pub fn new_instance(self: &Arc<Self>) -> AttributeInstance<K> {
        AttributeInstance::new(Arc::clone(self))
    }
}

impl<K: Kind> fmt::Debug for AttributeDefinition<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDefinition")
            .field("name", &self.name)
            .field("kind", &K::ID)
            .field("default", &self.default)
            .field("tags", &self.tags)
            .field("display", &self.display)
            .field("positive", &self.positive.is_some())
            .finish()
    }
}
