//! Type witnesses for the closed set of attribute kinds.
//!
//! Every attribute value has one of six kinds. At runtime a kind is named by
//! [`KindId`]; at compile time it is named by a zero-sized witness type
//! implementing [`Kind`], whose associated `Value` is the Rust type callers
//! read and write. Passing a witness through a generic call is what lets the
//! store hand back an `i64` for `INTEGER` and a `bool` for `BOOLEAN` without
//! any downcast.
//!
//! | Kind      | Witness        | Singleton  | Value      |
//! |-----------|----------------|------------|------------|
//! | Integer   | `IntegerKind`  | `INTEGER`  | `i64`      |
//! | Real      | `RealKind`     | `REAL`     | `f64`      |
//! | Text      | `TextKind`     | `TEXT`     | `String`   |
//! | Boolean   | `BooleanKind`  | `BOOLEAN`  | `bool`     |
//! | Tag set   | `TagSetKind`   | `TAG_SET`  | `TagSet`   |
//! | Group     | `GroupKind`    | `GROUP`    | `Group`    |
//!
//! The trait is sealed: the set of kinds is fixed for the life of the
//! process.
//!
//! ```
//! use game_attrs::kinds::{Kind, KindId, IntegerKind, INTEGER};
//!
//! fn kind_of<K: Kind>(_witness: K) -> KindId {
//!     K::ID
//! }
//!
//! assert_eq!(kind_of(INTEGER), KindId::Integer);
//! assert_eq!(IntegerKind::parse(" 12 ").unwrap(), 12);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::group::Group;
use crate::attributes::{AttributeDefinition, AttributeInstance};
use crate::core::{ParseTokenError, ParseValueError, TagSet};
use crate::schema::{DefinitionRef, KindRegistry, Schema};
use crate::store::{AnyAttribute, KindTable, KindTables};

/// Runtime name of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KindId {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Real,
    /// Free text.
    Text,
    /// Boolean flag.
    Boolean,
    /// Set of characteristic tags.
    TagSet,
    /// Enumerated creature group.
    Group,
}

impl KindId {
    /// All kinds, in declaration order.
    pub const ALL: [KindId; 6] = [
        KindId::Integer,
        KindId::Real,
        KindId::Text,
        KindId::Boolean,
        KindId::TagSet,
        KindId::Group,
    ];

    /// Canonical schema token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            KindId::Integer => "integer",
            KindId::Real => "real",
            KindId::Text => "text",
            KindId::Boolean => "boolean",
            KindId::TagSet => "tagset",
            KindId::Group => "group",
        }
    }

    const fn alias(self) -> &'static str {
        match self {
            KindId::Integer => "int",
            KindId::Real => "float",
            KindId::Text => "string",
            KindId::Boolean => "bool",
            KindId::TagSet => "tags",
            KindId::Group => "group",
        }
    }
}

impl FromStr for KindId {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        KindId::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str().eq_ignore_ascii_case(token)
                    || kind.alias().eq_ignore_ascii_case(token)
            })
            .ok_or_else(|| ParseTokenError::new("kind", token))
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A compile-time stand-in for one attribute kind.
///
/// Implemented only by the six witness types in this module.
pub trait Kind:
    sealed::Sealed + Copy + Default + fmt::Debug + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// The Rust type of values of this kind.
    type Value: Clone
        + PartialEq
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Runtime name of this kind.
    const ID: KindId;

    /// Parse text following this kind's grammar.
    ///
    /// # Errors
    ///
    /// Returns `ParseValueError` if the text does not follow the grammar.
    fn parse(text: &str) -> Result<Self::Value, ParseValueError>;

    /// Render a value following this kind's grammar.
    fn format(value: &Self::Value) -> String;

    /// Sign of a numeric value. `None` for non-numeric kinds.
    fn sign(_value: &Self::Value) -> Option<Ordering> {
        None
    }

    /// Positivity predicate given to new definitions of this kind.
    fn default_positive() -> Option<fn(&Self::Value) -> bool> {
        None
    }

    /// This kind's factory registry inside a schema.
    #[doc(hidden)]
    fn registry(schema: &Schema) -> &KindRegistry<Self>;

    #[doc(hidden)]
    fn registry_mut(schema: &mut Schema) -> &mut KindRegistry<Self>;

    /// This kind's owner table inside a store.
    #[doc(hidden)]
    fn table(tables: &KindTables) -> &KindTable<Self>;

    #[doc(hidden)]
    fn table_mut(tables: &mut KindTables) -> &mut KindTable<Self>;

    /// Borrow a definition of this kind as a kind-tagged reference.
    fn definition_ref(definition: &AttributeDefinition<Self>) -> DefinitionRef<'_>;

    /// Wrap an instance of this kind in the kind-tagged enum.
    fn into_any(instance: AttributeInstance<Self>) -> AnyAttribute;

    /// Borrow the instance back out of the kind-tagged enum, if it holds
    /// this kind.
    fn from_any(attribute: &AnyAttribute) -> Option<&AttributeInstance<Self>>;
}

macro_rules! kind_slots {
    ($field:ident, $variant:ident) => {
        fn registry(schema: &Schema) -> &KindRegistry<Self> {
            &schema.$field
        }

        fn registry_mut(schema: &mut Schema) -> &mut KindRegistry<Self> {
            &mut schema.$field
        }

        fn table(tables: &KindTables) -> &KindTable<Self> {
            &tables.$field
        }

        fn table_mut(tables: &mut KindTables) -> &mut KindTable<Self> {
            &mut tables.$field
        }

        fn definition_ref(definition: &AttributeDefinition<Self>) -> DefinitionRef<'_> {
            DefinitionRef::$variant(definition)
        }

        fn into_any(instance: AttributeInstance<Self>) -> AnyAttribute {
            AnyAttribute::$variant(instance)
        }

        fn from_any(attribute: &AnyAttribute) -> Option<&AttributeInstance<Self>> {
            match attribute {
                AnyAttribute::$variant(instance) => Some(instance),
                _ => None,
            }
        }
    };
}

/// Witness for `i64` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntegerKind;

/// Witness for `f64` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RealKind;

/// Witness for `String` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextKind;

/// Witness for `bool` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BooleanKind;

/// Witness for `TagSet` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagSetKind;

/// Witness for `Group` attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupKind;

/// The integer witness.
pub const INTEGER: IntegerKind = IntegerKind;
/// The real witness.
pub const REAL: RealKind = RealKind;
/// The text witness.
pub const TEXT: TextKind = TextKind;
/// The boolean witness.
pub const BOOLEAN: BooleanKind = BooleanKind;
/// The tag-set witness.
pub const TAG_SET: TagSetKind = TagSetKind;
/// The group witness.
pub const GROUP: GroupKind = GroupKind;

impl sealed::Sealed for IntegerKind {}
impl sealed::Sealed for RealKind {}
impl sealed::Sealed for TextKind {}
impl sealed::Sealed for BooleanKind {}
impl sealed::Sealed for TagSetKind {}
impl sealed::Sealed for GroupKind {}

impl Kind for IntegerKind {
    type Value = i64;
    const ID: KindId = KindId::Integer;

    fn parse(text: &str) -> Result<i64, ParseValueError> {
        text.trim()
            .parse()
            .map_err(|_| ParseValueError::new(Self::ID, text))
    }

    fn format(value: &i64) -> String {
        value.to_string()
    }

    fn sign(value: &i64) -> Option<Ordering> {
        Some(value.cmp(&0))
    }

    fn default_positive() -> Option<fn(&i64) -> bool> {
        Some(|v| *v > 0)
    }

    kind_slots!(integer, Integer);
}

impl Kind for RealKind {
    type Value = f64;
    const ID: KindId = KindId::Real;

    fn parse(text: &str) -> Result<f64, ParseValueError> {
        text.trim()
            .parse()
            .map_err(|_| ParseValueError::new(Self::ID, text))
    }

    fn format(value: &f64) -> String {
        value.to_string()
    }

    fn sign(value: &f64) -> Option<Ordering> {
        value.partial_cmp(&0.0)
    }

    fn default_positive() -> Option<fn(&f64) -> bool> {
        Some(|v| *v > 0.0)
    }

    kind_slots!(real, Real);
}

impl Kind for TextKind {
    type Value = String;
    const ID: KindId = KindId::Text;

    fn parse(text: &str) -> Result<String, ParseValueError> {
        Ok(text.to_string())
    }

    fn format(value: &String) -> String {
        value.clone()
    }

    kind_slots!(text, Text);
}

impl Kind for BooleanKind {
    type Value = bool;
    const ID: KindId = KindId::Boolean;

    fn parse(text: &str) -> Result<bool, ParseValueError> {
        let token = text.trim();
        if ["true", "yes", "1"].iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Ok(true)
        } else if ["false", "no", "0"].iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Ok(false)
        } else {
            Err(ParseValueError::new(Self::ID, text))
        }
    }

    fn format(value: &bool) -> String {
        value.to_string()
    }

    fn default_positive() -> Option<fn(&bool) -> bool> {
        Some(|v| *v)
    }

    kind_slots!(boolean, Boolean);
}

impl Kind for TagSetKind {
    type Value = TagSet;
    const ID: KindId = KindId::TagSet;

    fn parse(text: &str) -> Result<TagSet, ParseValueError> {
        text.parse().map_err(|_| ParseValueError::new(Self::ID, text))
    }

    fn format(value: &TagSet) -> String {
        value.to_string()
    }

    kind_slots!(tag_set, TagSet);
}

impl Kind for GroupKind {
    type Value = Group;
    const ID: KindId = KindId::Group;

    fn parse(text: &str) -> Result<Group, ParseValueError> {
        text.parse().map_err(|_| ParseValueError::new(Self::ID, text))
    }

    fn format(value: &Group) -> String {
        value.to_string()
    }

    kind_slots!(group, Group);
}

/// Run a generic body once for the witness named by a runtime `KindId`.
///
/// Inside the body, `$k` is a type alias for the matching witness, so
/// `generate::<$k>(...)` monomorphises per kind.
macro_rules! with_kind {
    ($kind:expr, $k:ident => $body:expr) => {
        match $kind {
            $crate::kinds::KindId::Integer => {
                type $k = $crate::kinds::IntegerKind;
                $body
            }
            $crate::kinds::KindId::Real => {
                type $k = $crate::kinds::RealKind;
                $body
            }
            $crate::kinds::KindId::Text => {
                type $k = $crate::kinds::TextKind;
                $body
            }
            $crate::kinds::KindId::Boolean => {
                type $k = $crate::kinds::BooleanKind;
                $body
            }
            $crate::kinds::KindId::TagSet => {
                type $k = $crate::kinds::TagSetKind;
                $body
            }
            $crate::kinds::KindId::Group => {
                type $k = $crate::kinds::GroupKind;
                $body
            }
        }
    };
}

pub(crate) use with_kind;
