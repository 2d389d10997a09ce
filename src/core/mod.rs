//! Core types shared by every layer: owner ids, tags, errors, configuration.

pub mod config;
pub mod entity;
pub mod error;
pub mod tag;

pub use config::SchemaConfig;
pub use entity::{OwnerClass, OwnerId};
pub use error::{
    AttrError, ParseTokenError, ParseValueError, Result, SchemaError, SchemaErrorKind,
};
pub use tag::{Tag, TagSet, LIST_DELIMITER};
