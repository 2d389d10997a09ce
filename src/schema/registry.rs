//! Per-kind definition registry.
//!
//! Each kind owns one `KindRegistry`, which both stores the definitions of
//! that kind and manufactures new ones from schema rows. Names are unique
//! across kinds; the `Schema` enforces that before inserting.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::row::SchemaRow;
use crate::attributes::{AttributeDefinition, DisplayFlag, DisplayFlags, DisplayInfo, DisplayRank};
use crate::core::{SchemaConfig, SchemaError, SchemaErrorKind, TagSet};
use crate::kinds::Kind;

/// Registry of the definitions of one kind.
#[derive(Clone, Debug)]
pub struct KindRegistry<K: Kind> {
    definitions: FxHashMap<String, Arc<AttributeDefinition<K>>>,
}

impl<K: Kind> Default for KindRegistry<K> {
    fn default() -> Self {
        Self {
            definitions: FxHashMap::default(),
        }
    }
}

impl<K: Kind> KindRegistry<K> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a definition of this kind from a schema row.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable default or ignore value, an unknown tag or
    /// display setting, or a missing/invalid rank on a visible attribute.
    pub fn manufacture(
        row: &SchemaRow<'_>,
        config: &SchemaConfig,
    ) -> Result<AttributeDefinition<K>, SchemaError> {
        let error = |kind| SchemaError::new(row.line, kind);

        let default = K::parse(row.default).map_err(|e| error(SchemaErrorKind::InvalidDefault(e)))?;
        let tags = match row.tags {
            Some(text) => text
                .parse::<TagSet>()
                .map_err(|e| error(SchemaErrorKind::UnknownTag(e)))?,
            None => TagSet::new(),
        };

        let mut definition = AttributeDefinition::new(row.name, default).with_tags(tags);

        if row.readable {
            let flags = match row.settings {
                Some(text) => text
                    .parse::<DisplayFlags>()
                    .map_err(|e| error(SchemaErrorKind::UnknownDisplaySetting(e)))?,
                None => DisplayFlags::empty(),
            };
            let rank = Self::rank(row, flags, config)?;
            let mut display =
                DisplayInfo::new(row.display_name.unwrap_or(row.name), rank).with_flags(flags);
            if let Some(text) = row.ignore {
                let ignore =
                    K::parse(text).map_err(|e| error(SchemaErrorKind::InvalidIgnoreValue(e)))?;
                display = display.with_ignore(ignore);
            }
            definition = definition.with_display(display);
        }

        Ok(definition)
    }

    fn rank(
        row: &SchemaRow<'_>,
        flags: DisplayFlags,
        config: &SchemaConfig,
    ) -> Result<DisplayRank, SchemaError> {
        let visible = !flags.contains(DisplayFlag::Hidden);
        let error = |kind| SchemaError::new(row.line, kind);

        let Some(text) = row.rank else {
            return if visible {
                Err(error(SchemaErrorKind::MissingRank(row.name.to_string())))
            } else {
                Ok(DisplayRank::Last)
            };
        };

        if config.is_last_rank(text) {
            return Ok(DisplayRank::Last);
        }

        let rank: i64 = text
            .parse()
            .map_err(|_| error(SchemaErrorKind::InvalidRank(text.to_string())))?;
        if rank < 0 {
            return if visible {
                Err(error(SchemaErrorKind::NegativeRank(rank)))
            } else {
                Ok(DisplayRank::Last)
            };
        }
        u32::try_from(rank)
            .map(DisplayRank::At)
            .map_err(|_| error(SchemaErrorKind::InvalidRank(text.to_string())))
    }

    pub(crate) fn insert(&mut self, definition: AttributeDefinition<K>) {
        self.definitions
            .insert(definition.name().to_string(), Arc::new(definition));
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut AttributeDefinition<K>> {
        self.definitions.get_mut(name).map(Arc::make_mut)
    }

    /// Get a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<AttributeDefinition<K>>> {
        self.definitions.get(name)
    }

    /// Check if a name is registered with this kind.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AttributeDefinition<K>>> {
        self.definitions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tag;
    use crate::kinds::{BooleanKind, IntegerKind, TextKind};

    fn row(text: &str) -> SchemaRow<'_> {
        SchemaRow::parse(7, text, &SchemaConfig::default()).unwrap()
    }

    #[test]
    fn test_manufacture_readable() {
        let config = SchemaConfig::default();
        let def = KindRegistry::<IntegerKind>::manufacture(
            &row("gph,integer,0,stat-mod,yes,Gold Per Hour,signed-color:plus,0,1"),
            &config,
        )
        .unwrap();

        assert_eq!(def.name(), "gph");
        assert_eq!(*def.default_value(), 0);
        assert!(def.has_tag(Tag::StatMod));
        let display = def.display().unwrap();
        assert_eq!(display.name(), "Gold Per Hour");
        assert_eq!(display.rank(), DisplayRank::At(1));
        assert!(display.flags().contains(DisplayFlag::PlusSign));
        assert_eq!(display.ignore_value(), Some(&0));
    }

    #[test]
    fn test_manufacture_unreadable() {
        let config = SchemaConfig::default();
        let def = KindRegistry::<BooleanKind>::manufacture(
            &row("legendary,boolean,false,creature-only,no"),
            &config,
        )
        .unwrap();
        assert!(!def.is_readable());
        assert!(def.has_tag(Tag::CreatureOnly));
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let config = SchemaConfig::default();
        let def = KindRegistry::<TextKind>::manufacture(&row("title,text,,,yes,,,,last"), &config)
            .unwrap();
        assert_eq!(def.display().unwrap().name(), "title");
        assert_eq!(def.display().unwrap().rank(), DisplayRank::Last);
    }

    #[test]
    fn test_bad_default() {
        let config = SchemaConfig::default();
        let err = KindRegistry::<IntegerKind>::manufacture(&row("gph,integer,lots"), &config)
            .unwrap_err();
        assert_eq!(err.line, 7);
        assert!(matches!(err.kind, SchemaErrorKind::InvalidDefault(_)));
    }

    #[test]
    fn test_bad_tag() {
        let config = SchemaConfig::default();
        let err =
            KindRegistry::<IntegerKind>::manufacture(&row("gph,integer,0,stat-mod:shiny"), &config)
                .unwrap_err();
        assert!(matches!(err.kind, SchemaErrorKind::UnknownTag(_)));
    }

    #[test]
    fn test_rank_rules() {
        let config = SchemaConfig::default();
        let manufacture =
            |text: &str| KindRegistry::<IntegerKind>::manufacture(&row(text), &config);

        let err = manufacture("a,integer,0,,yes,A").unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::MissingRank("a".into()));

        let err = manufacture("a,integer,0,,yes,A,,,-1").unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::NegativeRank(-1));

        let err = manufacture("a,integer,0,,yes,A,,,first").unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::InvalidRank("first".into()));

        // Hidden attributes need no rank
        let def = manufacture("a,integer,0,,yes,A,hidden").unwrap();
        assert_eq!(def.display().unwrap().rank(), DisplayRank::Last);

        // Unreadable attributes ignore the display columns entirely
        assert!(manufacture("a,integer,0,,no,A,sparkle,x,-5").is_ok());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = KindRegistry::<IntegerKind>::new();
        registry.insert(AttributeDefinition::new("hp", 10));

        assert!(registry.contains("hp"));
        assert_eq!(registry.len(), 1);
        assert_eq!(*registry.get("hp").unwrap().default_value(), 10);
        assert!(registry.get("mana").is_none());
        assert_eq!(registry.iter().count(), 1);
    }
}
