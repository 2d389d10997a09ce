//! The attribute schema: every definition, indexed by name and by kind.
//!
//! A `Schema` is built once at start-up, from a schema source or
//! programmatically, then frozen behind an `Arc` and handed to every
//! `AttributeStore`. Host hooks that adjust definitions (value transforms,
//! positivity predicates) must run before the schema is shared.
//!
//! ## Example
//!
//! ```
//! use game_attrs::kinds::{KindId, INTEGER};
//! use game_attrs::schema::Schema;
//!
//! let source = "\
//! name,kind,default,tags,readable,display,settings,ignore,rank
//! gph,integer,0,stat-mod,yes,Gold Per Hour,plus,0,1
//! legendary,boolean,false,creature-only,no
//! ";
//!
//! let schema = Schema::parse(source).unwrap();
//! assert_eq!(schema.kind_of("gph").unwrap(), KindId::Integer);
//! assert_eq!(*schema.definition_of("gph", INTEGER).unwrap().default_value(), 0);
//! ```

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::registry::KindRegistry;
use super::row::rows;
use crate::attributes::{AttributeDefinition, DisplayRank};
use crate::core::{AttrError, Result, SchemaConfig, SchemaError, SchemaErrorKind, Tag, TagSet};
use crate::kinds::{
    with_kind, BooleanKind, GroupKind, IntegerKind, Kind, KindId, RealKind, TagSetKind, TextKind,
};

/// All attribute definitions known to the process.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    config: SchemaConfig,
    kinds: FxHashMap<String, KindId>,
    order: Vec<String>,
    pub(crate) integer: KindRegistry<IntegerKind>,
    pub(crate) real: KindRegistry<RealKind>,
    pub(crate) text: KindRegistry<TextKind>,
    pub(crate) boolean: KindRegistry<BooleanKind>,
    pub(crate) tag_set: KindRegistry<TagSetKind>,
    pub(crate) group: KindRegistry<GroupKind>,
}

impl Schema {
    /// Create an empty schema with the default dialect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty schema with a custom dialect.
    #[must_use]
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse a schema source in the default dialect.
    ///
    /// # Errors
    ///
    /// Returns the first malformed row; nothing is partially loaded.
    pub fn parse(source: &str) -> std::result::Result<Self, SchemaError> {
        Self::parse_with(source, SchemaConfig::default())
    }

    /// Parse a schema source in the given dialect.
    ///
    /// # Errors
    ///
    /// Returns the first malformed row; nothing is partially loaded.
    pub fn parse_with(
        source: &str,
        config: SchemaConfig,
    ) -> std::result::Result<Self, SchemaError> {
        let mut schema = Self::with_config(config);
        schema.extend_from(source)?;
        info!(definitions = schema.len(), "loaded attribute schema");
        Ok(schema)
    }

    /// Read and parse a schema file in the default dialect.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::Io` if the file cannot be read and
    /// `AttrError::Schema` if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, SchemaConfig::default())
    }

    /// Read and parse a schema file in the given dialect.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::Io` if the file cannot be read and
    /// `AttrError::Schema` if it is malformed.
    pub fn load_with(path: impl AsRef<Path>, config: SchemaConfig) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| AttrError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse_with(&source, config)?)
    }

    /// Parse more rows into this schema.
    ///
    /// # Errors
    ///
    /// Returns the first malformed row. Rows before it stay loaded.
    pub fn extend_from(&mut self, source: &str) -> std::result::Result<(), SchemaError> {
        let config = self.config.clone();
        for row in rows(source, &config) {
            let row = row?;
            let kind: KindId = row
                .kind
                .parse()
                .map_err(|e| SchemaError::new(row.line, SchemaErrorKind::UnknownKind(e)))?;
            with_kind!(kind, K => {
                let definition = KindRegistry::<K>::manufacture(&row, &config)?;
                self.insert_at(row.line, definition)?;
            });
        }
        Ok(())
    }

    /// Add a programmatic definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaErrorKind::DuplicateName` (line 0) if the name is taken
    /// by any kind.
    pub fn insert<K: Kind>(
        &mut self,
        definition: AttributeDefinition<K>,
    ) -> std::result::Result<(), SchemaError> {
        self.insert_at(0, definition)
    }

    fn insert_at<K: Kind>(
        &mut self,
        line: usize,
        definition: AttributeDefinition<K>,
    ) -> std::result::Result<(), SchemaError> {
        let name = definition.name().to_string();
        if self.kinds.contains_key(&name) {
            return Err(SchemaError::new(line, SchemaErrorKind::DuplicateName(name)));
        }
        debug!(name = %name, kind = %K::ID, "defined attribute");
        self.kinds.insert(name.clone(), K::ID);
        self.order.push(name);
        K::registry_mut(self).insert(definition);
        Ok(())
    }

    /// The dialect this schema was parsed with.
    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Kind of a named attribute.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownAttribute` if the name is not declared.
    pub fn kind_of(&self, name: &str) -> Result<KindId> {
        self.kinds
            .get(name)
            .copied()
            .ok_or_else(|| AttrError::UnknownAttribute(name.to_string()))
    }

    /// Check if a name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Kind-tagged definition of a named attribute.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownAttribute` if the name is not declared.
    pub fn definition(&self, name: &str) -> Result<DefinitionRef<'_>> {
        let kind = self.kind_of(name)?;
        with_kind!(kind, K => self.typed::<K>(name).map(|d| K::definition_ref(d)))
    }

    /// Typed definition of a named attribute.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownAttribute` if the name is not declared and
    /// `AttrError::TypeMismatch` if it is declared with another kind.
    pub fn definition_of<K: Kind>(
        &self,
        name: &str,
        _witness: K,
    ) -> Result<&Arc<AttributeDefinition<K>>> {
        self.typed::<K>(name)
    }

    pub(crate) fn typed<K: Kind>(&self, name: &str) -> Result<&Arc<AttributeDefinition<K>>> {
        let actual = self.kind_of(name)?;
        if actual != K::ID {
            return Err(AttrError::TypeMismatch {
                name: name.to_string(),
                expected: K::ID,
                actual,
            });
        }
        K::registry(self)
            .get(name)
            .ok_or_else(|| AttrError::UnknownAttribute(name.to_string()))
    }

    /// Registry of one kind.
    #[must_use]
    pub fn registry<K: Kind>(&self, _witness: K) -> &KindRegistry<K> {
        K::registry(self)
    }

    /// Install a value→text transform on a readable attribute.
    ///
    /// Returns `false` (and installs nothing) when the attribute is not
    /// readable.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` or `TypeMismatch` as `definition_of`.
    pub fn set_transform<K: Kind>(
        &mut self,
        name: &str,
        witness: K,
        transform: impl Fn(&K::Value) -> String + Send + Sync + 'static,
    ) -> Result<bool> {
        self.definition_of(name, witness)?;
        let display = K::registry_mut(self)
            .get_mut(name)
            .and_then(AttributeDefinition::display_mut);
        match display {
            Some(display) => {
                display.set_transform(Arc::new(transform));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace the positivity predicate of an attribute.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` or `TypeMismatch` as `definition_of`.
    pub fn set_positive<K: Kind>(
        &mut self,
        name: &str,
        witness: K,
        predicate: Option<fn(&K::Value) -> bool>,
    ) -> Result<()> {
        self.definition_of(name, witness)?;
        if let Some(definition) = K::registry_mut(self).get_mut(name) {
            definition.set_positive(predicate);
        }
        Ok(())
    }

    /// Declared names, in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Names of every definition carrying `tag`, in load order.
    pub fn names_with_tag(&self, tag: Tag) -> impl Iterator<Item = &str> + '_ {
        self.names()
            .filter(move |name| self.definition(name).is_ok_and(|d| d.has_tag(tag)))
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the schema is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A borrowed definition of any kind.
///
/// Handed to validation predicates, which run before an instance exists.
#[derive(Clone, Copy, Debug)]
pub enum DefinitionRef<'a> {
    /// Integer definition.
    Integer(&'a AttributeDefinition<IntegerKind>),
    /// Real definition.
    Real(&'a AttributeDefinition<RealKind>),
    /// Text definition.
    Text(&'a AttributeDefinition<TextKind>),
    /// Boolean definition.
    Boolean(&'a AttributeDefinition<BooleanKind>),
    /// Tag-set definition.
    TagSet(&'a AttributeDefinition<TagSetKind>),
    /// Group definition.
    Group(&'a AttributeDefinition<GroupKind>),
}

macro_rules! each_definition {
    ($value:expr, $d:ident => $body:expr) => {
        match $value {
            DefinitionRef::Integer($d) => $body,
            DefinitionRef::Real($d) => $body,
            DefinitionRef::Text($d) => $body,
            DefinitionRef::Boolean($d) => $body,
            DefinitionRef::TagSet($d) => $body,
            DefinitionRef::Group($d) => $body,
        }
    };
}

impl<'a> DefinitionRef<'a> {
    /// Attribute name.
    #[must_use]
    pub fn name(self) -> &'a str {
        each_definition!(self, d => d.name())
    }

    /// Kind of the definition.
    #[must_use]
    pub fn kind(self) -> KindId {
        each_definition!(self, d => d.kind())
    }

    /// Characteristic tags.
    #[must_use]
    pub fn tags(self) -> &'a TagSet {
        each_definition!(self, d => d.tags())
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(self, tag: Tag) -> bool {
        self.tags().contains(tag)
    }

    /// Whether the attribute is human-readable.
    #[must_use]
    pub fn is_readable(self) -> bool {
        each_definition!(self, d => d.is_readable())
    }

    /// Display name, if readable.
    #[must_use]
    pub fn display_name(self) -> Option<&'a str> {
        each_definition!(self, d => d.display().map(|display| display.name()))
    }

    /// Display rank, if readable.
    #[must_use]
    pub fn display_rank(self) -> Option<DisplayRank> {
        each_definition!(self, d => d.display().map(|display| display.rank()))
    }

    /// Default value in the kind's textual grammar.
    #[must_use]
    pub fn default_text(self) -> String {
        fn format<K: Kind>(d: &AttributeDefinition<K>) -> String {
            K::format(d.default_value())
        }
        each_definition!(self, d => format(d))
    }
}
