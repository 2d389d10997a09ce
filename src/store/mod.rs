//! Per-owner attribute storage.
//!
//! Owners are **registered**, not created: the host allocates `OwnerId`s
//! and registers each with an `AttributeStore`, which keeps one owner map
//! per kind for it.
//!
//! ## Key Types
//!
//! - `AttributeStore`: every kind's owner map plus per-owner state
//! - `AttributeManager`: per-owner view with the full attribute API
//! - `OwnerMap<K>`: owner → instances of one kind
//! - `AnyAttribute`: kind-tagged instance for cross-kind queries
//! - `AttributeObserver<K>`, `ValidationRule`: change hooks and creation guards
//! - `StoreSnapshot`, `RestoreReport`: the persistence contract

pub mod any;
pub mod manager;
pub mod observer;
pub mod owner_map;
pub mod snapshot;
pub mod tables;

pub use any::AnyAttribute;
pub use manager::{AttributeManager, AttributeStore};
pub use observer::{restrict_to, validation, AttributeObserver, Validation, ValidationRule};
pub use owner_map::{OwnerMap, OwnerRows, Sequence};
pub use snapshot::{KindSnapshot, RestoreReport, SavedAttribute, SkippedAttribute, StoreSnapshot};
pub use tables::{KindTable, KindTables};
