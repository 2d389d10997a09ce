//! Attribute system: definitions, instances, and display formatting.
//!
//! ## Key Types
//!
//! - `AttributeDefinition<K>`: immutable schema template (default, tags,
//!   display metadata)
//! - `AttributeInstance<K>`: per-owner mutable copy of a definition
//! - `DisplayInfo<K>`: display name, rank, flags, ignore value, transform
//! - `DisplayRank`, `DisplayFlag`, `DisplayFlags`, `RenderStyle`

pub mod definition;
pub mod display;
pub mod instance;

pub use definition::AttributeDefinition;
pub use display::{DisplayFlag, DisplayFlags, DisplayInfo, DisplayRank, RenderStyle, ValueTransform};
pub use instance::AttributeInstance;
