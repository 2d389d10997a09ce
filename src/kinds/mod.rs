//! Attribute kinds and their type witnesses.
//!
//! ## Key Types
//!
//! - `KindId`: runtime name of a kind, parsed from schema tokens
//! - `Kind`: sealed trait tying a witness to its value type and grammar
//! - `IntegerKind`, `RealKind`, `TextKind`, `BooleanKind`, `TagSetKind`,
//!   `GroupKind`: the witnesses, with singletons `INTEGER` .. `GROUP`
//! - `Group`: value type of the enumerated group kind

pub mod group;
pub mod kind;

pub use group::Group;
pub use kind::{
    BooleanKind, GroupKind, IntegerKind, Kind, KindId, RealKind, TagSetKind, TextKind, BOOLEAN,
    GROUP, INTEGER, REAL, TAG_SET, TEXT,
};

pub(crate) use kind::with_kind;
