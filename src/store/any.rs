//! Kind-tagged instances for cross-kind listings.

use std::fmt;

use crate::attributes::{AttributeInstance, DisplayRank, RenderStyle};
use crate::core::Tag;
use crate::kinds::{
    BooleanKind, GroupKind, IntegerKind, Kind, KindId, RealKind, TagSetKind, TextKind,
};

/// An instance of any kind, returned by queries that span every kind.
///
/// The variant says which kind the instance has; [`AnyAttribute::get`]
/// recovers the typed instance with a witness.
#[derive(Clone, Debug)]
pub enum AnyAttribute {
    /// Whole-number instance.
    Integer(AttributeInstance<IntegerKind>),
    /// Floating-point instance.
    Real(AttributeInstance<RealKind>),
    /// Free-text instance.
    Text(AttributeInstance<TextKind>),
    /// Flag instance.
    Boolean(AttributeInstance<BooleanKind>),
    /// Tag-set instance.
    TagSet(AttributeInstance<TagSetKind>),
    /// Group membership instance.
    Group(AttributeInstance<GroupKind>),
}

macro_rules! each_instance {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            AnyAttribute::Integer($a) => $body,
            AnyAttribute::Real($a) => $body,
            AnyAttribute::Text($a) => $body,
            AnyAttribute::Boolean($a) => $body,
            AnyAttribute::TagSet($a) => $body,
            AnyAttribute::Group($a) => $body,
        }
    };
}

impl AnyAttribute {
    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        each_instance!(self, a => a.name())
    }

    /// Kind of the variant.
    #[must_use]
    pub fn kind(&self) -> KindId {
        each_instance!(self, a => a.definition().kind())
    }

    /// Current value in the kind's textual grammar.
    #[must_use]
    pub fn value_text(&self) -> String {
        each_instance!(self, a => a.value_text())
    }

    /// Store-wide insertion sequence.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        each_instance!(self, a => a.sequence())
    }

    /// Check if the definition carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        each_instance!(self, a => a.has_tag(tag))
    }

    /// Text appended after the rendered value.
    #[must_use]
    pub fn extra_description(&self) -> &str {
        each_instance!(self, a => a.extra_description())
    }

    /// Whether the current value counts as a benefit.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        each_instance!(self, a => a.is_positive())
    }

    /// Sort key of the description line, `None` when unreadable.
    #[must_use]
    pub fn display_rank(&self) -> Option<DisplayRank> {
        each_instance!(self, a => a.display_rank())
    }

    /// Check if the instance contributes a description line.
    #[must_use]
    pub fn should_display(&self) -> bool {
        each_instance!(self, a => a.should_display())
    }

    /// Description line, or `None` when not displayed.
    #[must_use]
    pub fn render(&self, style: RenderStyle) -> Option<String> {
        each_instance!(self, a => a.render(style))
    }

    /// The typed instance, if this is of the witness's kind.
    #[must_use]
    pub fn get<K: Kind>(&self, _witness: K) -> Option<&AttributeInstance<K>> {
        K::from_any(self)
    }
}

impl<K: Kind> From<AttributeInstance<K>> for AnyAttribute {
    fn from(instance: AttributeInstance<K>) -> Self {
        K::into_any(instance)
    }
}

impl fmt::Display for AnyAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name(), self.value_text())
    }
}
