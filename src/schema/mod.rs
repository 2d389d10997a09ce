//! Schema loading and the per-kind factory registries.
//!
//! The schema is **data-driven**: every attribute an owner can hold is
//! declared once, in a delimited text source, and loaded at startup.
//!
//! ## Key Types
//!
//! - `Schema`: name → kind and name → definition indices
//! - `KindRegistry<K>`: manufactures and stores the definitions of one kind
//! - `DefinitionRef`: a borrowed definition of any kind
//! - `SchemaRow`: one parsed source row, before kind resolution

pub mod loader;
pub mod registry;
pub mod row;

pub use loader::{DefinitionRef, Schema};
pub use registry::KindRegistry;
pub use row::{rows, SchemaRow};
