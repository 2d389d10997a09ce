//! # game-attrs
//!
//! A schema-driven, type-safe attribute store for game entities.
//!
//! ## Design Principles
//!
//! 1. **Schema-Driven**: Every attribute is declared once, in a delimited
//!    text source, and loaded at startup. No attribute names are hardcoded.
//!
//! 2. **Typed by Witness**: Each value kind has a zero-sized witness
//!    (`INTEGER`, `BOOLEAN`, ...). Passing one makes reads and writes return
//!    the kind's Rust type directly; nothing is downcast at runtime.
//!
//! 3. **Per-Owner Views**: Owners are registered with an `AttributeStore`;
//!    all attribute operations go through an `AttributeManager` fixed to one
//!    owner.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: owner rows are `im` maps, so reads can
//!   take an O(1) point-in-time snapshot.
//!
//! - **Frozen Schema**: definitions are shared through an `Arc<Schema>`;
//!   host hooks (value transforms, positivity predicates) run before it is
//!   frozen.
//!
//! - **Single-Threaded Mutation**: `&mut` borrows guard each store. There is
//!   no internal locking.
//!
//! ## Modules
//!
//! - `core`: Owner IDs, tags, errors, schema dialect configuration
//! - `kinds`: Kind witnesses and the textual value grammar
//! - `attributes`: Definitions, instances, display formatting
//! - `schema`: Schema loader and per-kind factory registries
//! - `store`: Owner maps, the manager facade, observers, persistence

pub mod attributes;
pub mod core;
pub mod kinds;
pub mod schema;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    AttrError, OwnerClass, OwnerId, Result, SchemaConfig, SchemaError, SchemaErrorKind, Tag,
    TagSet,
};

pub use crate::kinds::{
    BooleanKind, Group, GroupKind, IntegerKind, Kind, KindId, RealKind, TagSetKind, TextKind,
    BOOLEAN, GROUP, INTEGER, REAL, TAG_SET, TEXT,
};

pub use crate::attributes::{
    AttributeDefinition, AttributeInstance, DisplayFlag, DisplayFlags, DisplayInfo, DisplayRank,
    RenderStyle,
};

pub use crate::schema::{DefinitionRef, Schema};

pub use crate::store::{
    restrict_to, AnyAttribute, AttributeManager, AttributeObserver, AttributeStore, RestoreReport,
    StoreSnapshot, Validation, ValidationRule,
};
