//! Change observers and creation-time validation.
//!
//! Observers are registered per owner and per kind, and receive a callback
//! whenever an attribute of that kind is generated, removed or modified on
//! that owner. Validation predicates run against the *definition* before an
//! attribute is generated, and may refuse it.

use std::fmt;
use std::sync::Arc;

use crate::attributes::AttributeInstance;
use crate::core::{OwnerClass, OwnerId};
use crate::kinds::Kind;
use crate::schema::DefinitionRef;

/// Kind-scoped listener for attribute changes on one owner.
///
/// All methods default to doing nothing.
pub trait AttributeObserver<K: Kind> {
    /// An attribute was generated (or copied onto the owner).
    fn on_generated(&mut self, _owner: OwnerId, _attribute: &AttributeInstance<K>) {}

    /// An attribute was removed.
    fn on_removed(&mut self, _owner: OwnerId, _attribute: &AttributeInstance<K>) {}

    /// An attribute's value changed from `previous`.
    fn on_modified(
        &mut self,
        _owner: OwnerId,
        _attribute: &AttributeInstance<K>,
        _previous: &K::Value,
    ) {
    }
}

/// Creation-time predicate: returns `false` to refuse a definition.
pub type Validation = Arc<dyn Fn(DefinitionRef<'_>) -> bool + Send + Sync>;

/// Creation-time guard installed on one owner.
///
/// A class restriction is plain data and survives a store snapshot. A
/// custom predicate is a closure; the host re-attaches it after restoring.
#[derive(Clone)]
pub enum ValidationRule {
    /// Refuse definitions restricted to another owner class.
    RestrictTo(OwnerClass),
    /// Host-supplied predicate.
    Custom(Validation),
}

impl ValidationRule {
    /// Check whether the rule accepts a definition.
    #[must_use]
    pub fn allows(&self, definition: DefinitionRef<'_>) -> bool {
        match self {
            ValidationRule::RestrictTo(class) => class.admits(definition.tags()),
            ValidationRule::Custom(predicate) => predicate(definition),
        }
    }

    /// The owner class this rule restricts to, if it is a class restriction.
    #[must_use]
    pub fn owner_class(&self) -> Option<OwnerClass> {
        match self {
            ValidationRule::RestrictTo(class) => Some(*class),
            ValidationRule::Custom(_) => None,
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::RestrictTo(class) => f.debug_tuple("RestrictTo").field(class).finish(),
            ValidationRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Rule refusing definitions restricted to another owner class.
///
/// ```
/// use game_attrs::core::OwnerClass;
/// use game_attrs::schema::Schema;
/// use game_attrs::store::restrict_to;
///
/// let schema = Schema::parse("h\nlegendary,boolean,false,creature-only\n").unwrap();
/// let legendary = schema.definition("legendary").unwrap();
///
/// assert!(restrict_to(OwnerClass::Creature).allows(legendary));
/// assert!(!restrict_to(OwnerClass::Item).allows(legendary));
/// ```
#[must_use]
pub fn restrict_to(class: OwnerClass) -> ValidationRule {
    ValidationRule::RestrictTo(class)
}

/// Wrap a predicate as a custom rule.
pub fn validation(
    predicate: impl Fn(DefinitionRef<'_>) -> bool + Send + Sync + 'static,
) -> ValidationRule {
    ValidationRule::Custom(Arc::new(predicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn test_restrict_to_untagged() {
        let schema = Schema::parse("h\nhp,integer,10\n").unwrap();
        let hp = schema.definition("hp").unwrap();
        for class in OwnerClass::ALL {
            assert!(restrict_to(class).allows(hp));
        }
    }

    #[test]
    fn test_restrict_to_item() {
        let schema = Schema::parse("h\nprice,integer,0,item-only\n").unwrap();
        let price = schema.definition("price").unwrap();
        assert!(restrict_to(OwnerClass::Item).allows(price));
        assert!(!restrict_to(OwnerClass::Creature).allows(price));
        assert!(!restrict_to(OwnerClass::Player).allows(price));
        assert_eq!(restrict_to(OwnerClass::Item).owner_class(), Some(OwnerClass::Item));
    }

    #[test]
    fn test_custom_rule() {
        let schema = Schema::parse("h\nhp,integer,10\nlegendary,boolean,false,,no\n").unwrap();
        let rule = validation(|definition| definition.kind() == crate::kinds::KindId::Integer);
        assert!(rule.allows(schema.definition("hp").unwrap()));
        assert!(!rule.allows(schema.definition("legendary").unwrap()));
        assert_eq!(rule.owner_class(), None);
        assert_eq!(format!("{rule:?}"), "Custom(..)");
    }
}
