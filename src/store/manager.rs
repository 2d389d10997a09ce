//! Attribute store and the per-owner manager facade.
//!
//! The `AttributeStore` owns one table per kind and the per-owner state
//! (validation predicate, cached description). All attribute operations go
//! through an `AttributeManager`, a borrowed view of the store fixed to one
//! owner:
//! - Typed calls take a kind witness and return values at their static type
//! - Untyped calls resolve the kind from the schema and dispatch
//! - Every mutation recomputes the owner's cached description
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use game_attrs::core::{OwnerId, Tag};
//! use game_attrs::kinds::INTEGER;
//! use game_attrs::schema::Schema;
//! use game_attrs::store::AttributeStore;
//!
//! let schema = Schema::parse("\
//! name,kind,default,tags,readable,display,settings,ignore,rank
//! gph,integer,0,stat-mod,yes,Gold Per Hour,signed-color:plus,0,1
//! legendary,boolean,false,creature-only,no
//! ").unwrap();
//!
//! let mut store = AttributeStore::new(Arc::new(schema));
//! store.register(OwnerId(1)).unwrap();
//!
//! let mut manager = store.manager(OwnerId(1)).unwrap();
//! manager.generate_with("gph", 5, INTEGER).unwrap();
//! manager.generate("legendary").unwrap();
//!
//! assert_eq!(manager.description(), "Gold Per Hour: +5");
//! assert_eq!(manager.attributes_with_tag(Tag::StatMod).unwrap().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use super::any::AnyAttribute;
use super::observer::{AttributeObserver, ValidationRule};
use super::snapshot::{KindSnapshot, RestoreReport, SkippedAttribute, StoreSnapshot};
use super::tables::KindTables;
use crate::attributes::AttributeInstance;
use crate::core::{AttrError, OwnerId, Result, Tag};
use crate::kinds::{with_kind, Kind};
use crate::schema::Schema;

/// State kept per owner besides its attributes.
#[derive(Clone, Default)]
struct OwnerState {
    validation: Option<ValidationRule>,
    description: String,
}

impl fmt::Debug for OwnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerState")
            .field("validation", &self.validation)
            .field("description", &self.description)
            .finish()
    }
}

/// Every registered owner's attributes, for every kind.
#[derive(Debug)]
pub struct AttributeStore {
    schema: Arc<Schema>,
    tables: KindTables,
    owners: FxHashMap<OwnerId, OwnerState>,
}

impl AttributeStore {
    /// Create an empty store over a frozen schema.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            tables: KindTables::new(&schema),
            schema,
            owners: FxHashMap::default(),
        }
    }

    /// The schema this store resolves names against.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The per-kind tables.
    #[must_use]
    pub fn tables(&self) -> &KindTables {
        &self.tables
    }

    /// Register an owner with every kind.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::DuplicateOwner` if already registered.
    pub fn register(&mut self, owner: OwnerId) -> Result<()> {
        if self.owners.contains_key(&owner) {
            return Err(AttrError::DuplicateOwner(owner));
        }
        self.tables.register(owner)?;
        self.owners.insert(owner, OwnerState::default());
        debug!(%owner, "registered owner");
        Ok(())
    }

    /// Drop an owner and everything it holds.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if not registered.
    pub fn unregister(&mut self, owner: OwnerId) -> Result<()> {
        if self.owners.remove(&owner).is_none() {
            return Err(AttrError::UnknownOwner(owner));
        }
        self.tables.unregister(owner);
        debug!(%owner, "unregistered owner");
        Ok(())
    }

    /// Check if an owner is registered.
    #[must_use]
    pub fn is_registered(&self, owner: OwnerId) -> bool {
        self.owners.contains_key(&owner)
    }

    /// Registered owners, sorted.
    #[must_use]
    pub fn owners(&self) -> Vec<OwnerId> {
        let mut owners: Vec<_> = self.owners.keys().copied().collect();
        owners.sort_unstable();
        owners
    }

    /// The manager view for one owner.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if not registered.
    pub fn manager(&mut self, owner: OwnerId) -> Result<AttributeManager<'_>> {
        if !self.is_registered(owner) {
            return Err(AttrError::UnknownOwner(owner));
        }
        Ok(AttributeManager { store: self, owner })
    }

    /// Cached description of an owner.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if not registered.
    pub fn description(&self, owner: OwnerId) -> Result<&str> {
        Ok(&self.state(owner)?.description)
    }

    /// Check if an owner holds a name. Unregistered owners hold nothing.
    #[must_use]
    pub fn contains(&self, owner: OwnerId, name: &str) -> bool {
        self.schema
            .kind_of(name)
            .is_ok_and(|kind| {
                with_kind!(kind, K => K::table(&self.tables).map().contains(owner, name))
            })
    }

    fn state(&self, owner: OwnerId) -> Result<&OwnerState> {
        self.owners.get(&owner).ok_or(AttrError::UnknownOwner(owner))
    }

    fn state_mut(&mut self, owner: OwnerId) -> Result<&mut OwnerState> {
        self.owners.get_mut(&owner).ok_or(AttrError::UnknownOwner(owner))
    }

    fn refresh(&mut self, owner: OwnerId) -> Result<()> {
        let description = self.tables.describe(owner)?;
        trace!(%owner, lines = description.lines().count(), "recomputed description");
        self.state_mut(owner)?.description = description;
        Ok(())
    }

    /// Capture every owner's attributes and class restriction.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        fn save<K: Kind>(tables: &KindTables) -> KindSnapshot<K> {
            K::table(tables).map().save()
        }
        let owners = self.owners();
        let restrictions = owners
            .iter()
            .filter_map(|owner| {
                let rule = self.owners.get(owner)?.validation.as_ref()?;
                Some((*owner, rule.owner_class()?))
            })
            .collect();
        StoreSnapshot {
            owners,
            restrictions,
            integer: save(&self.tables),
            real: save(&self.tables),
            text: save(&self.tables),
            boolean: save(&self.tables),
            tag_set: save(&self.tables),
            group: save(&self.tables),
        }
    }

    /// Rebuild a store from a snapshot against the schema in effect now.
    ///
    /// Saved instances whose name left the schema, or whose kind changed,
    /// are skipped and listed in the report. Class restrictions are
    /// re-installed; custom validation closures and observers must be
    /// re-attached by the caller.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateOwner`, `UnknownOwner` or `DuplicateAttribute` if
    /// the snapshot contradicts itself.
    pub fn restore(
        schema: Arc<Schema>,
        snapshot: StoreSnapshot,
    ) -> Result<(Self, RestoreReport)> {
        let mut store = Self::new(schema);
        for owner in &snapshot.owners {
            store.register(*owner)?;
        }
        for (owner, class) in snapshot.restrictions {
            store.state_mut(owner)?.validation = Some(ValidationRule::RestrictTo(class));
        }

        let mut report = RestoreReport::default();
        store.restore_kind(snapshot.integer, &mut report)?;
        store.restore_kind(snapshot.real, &mut report)?;
        store.restore_kind(snapshot.text, &mut report)?;
        store.restore_kind(snapshot.boolean, &mut report)?;
        store.restore_kind(snapshot.tag_set, &mut report)?;
        store.restore_kind(snapshot.group, &mut report)?;

        for owner in snapshot.owners {
            store.refresh(owner)?;
        }
        debug!(restored = report.restored, skipped = report.skipped.len(), "restored store");
        Ok((store, report))
    }

    fn restore_kind<K: Kind>(
        &mut self,
        snapshot: KindSnapshot<K>,
        report: &mut RestoreReport,
    ) -> Result<()> {
        for (owner, saved) in snapshot.owners {
            for attribute in saved {
                let name = attribute.name.clone();
                let restored = K::table_mut(&mut self.tables)
                    .map_mut()
                    .restore(owner, attribute);
                match restored {
                    Ok(()) => report.restored += 1,
                    Err(
                        err @ (AttrError::UnknownAttribute(_) | AttrError::TypeMismatch { .. }),
                    ) => {
                        warn!(
                            %owner,
                            name = %name,
                            kind = %K::ID,
                            error = %err,
                            "skipped saved attribute"
                        );
                        report.skipped.push(SkippedAttribute {
                            owner,
                            name,
                            kind: K::ID,
                            reason: err.to_string(),
                        });
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }
}

/// The attribute API of one owner.
///
/// Obtained from [`AttributeStore::manager`]; holds the store mutably for
/// its lifetime.
pub struct AttributeManager<'s> {
    store: &'s mut AttributeStore,
    owner: OwnerId,
}

impl AttributeManager<'_> {
    /// The owner this view is fixed to.
    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Generate `name` with its default value, whatever its kind.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `DuplicateAttribute` or `Validation`.
    pub fn generate(&mut self, name: &str) -> Result<AnyAttribute> {
        let kind = self.store.schema.kind_of(name)?;
        with_kind!(kind, K => self.generate_typed::<K>(name, None).map(K::into_any))
    }

    /// Generate `name` with an explicit value.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `TypeMismatch`, `DuplicateAttribute` or
    /// `Validation`.
    pub fn generate_with<K: Kind>(
        &mut self,
        name: &str,
        value: K::Value,
        _witness: K,
    ) -> Result<AttributeInstance<K>> {
        self.generate_typed(name, Some(value))
    }

    /// Generate `name` with a value parsed by its kind's grammar.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when the text does not parse, otherwise as
    /// [`AttributeManager::generate`].
    pub fn generate_text(&mut self, name: &str, text: &str) -> Result<AnyAttribute> {
        let kind = self.store.schema.kind_of(name)?;
        with_kind!(kind, K => {
            let value = K::parse(text)?;
            self.generate_typed::<K>(name, Some(value)).map(K::into_any)
        })
    }

    fn generate_typed<K: Kind>(
        &mut self,
        name: &str,
        value: Option<K::Value>,
    ) -> Result<AttributeInstance<K>> {
        let schema = Arc::clone(&self.store.schema);
        let definition = schema.typed::<K>(name)?;
        if K::table(&self.store.tables).map().contains(self.owner, name) {
            return Err(AttrError::DuplicateAttribute {
                owner: self.owner,
                name: name.to_string(),
            });
        }
        if let Some(validation) = &self.store.state(self.owner)?.validation {
            if !validation.allows(K::definition_ref(definition)) {
                return Err(AttrError::Validation {
                    owner: self.owner,
                    name: name.to_string(),
                });
            }
        }

        let instance = K::table_mut(&mut self.store.tables).generate(self.owner, name, value)?;
        debug!(owner = %self.owner, name, kind = %K::ID, "generated attribute");
        self.store.refresh(self.owner)?;
        Ok(instance)
    }

    /// Remove `name`, whatever its kind.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` or `AttributeNotHeld`.
    pub fn remove(&mut self, name: &str) -> Result<AnyAttribute> {
        let kind = self.store.schema.kind_of(name)?;
        with_kind!(kind, K => self.remove_typed(name, K::default()).map(K::into_any))
    }

    /// Remove `name` and return the typed instance.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `TypeMismatch` or `AttributeNotHeld`.
    pub fn remove_typed<K: Kind>(
        &mut self,
        name: &str,
        _witness: K,
    ) -> Result<AttributeInstance<K>> {
        let instance = K::table_mut(&mut self.store.tables).remove(self.owner, name)?;
        debug!(owner = %self.owner, name, kind = %K::ID, "removed attribute");
        self.store.refresh(self.owner)?;
        Ok(instance)
    }

    /// Current value of `name`.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `TypeMismatch` or `AttributeNotHeld`.
    pub fn value<K: Kind>(&self, name: &str, witness: K) -> Result<&K::Value> {
        self.attribute(name, witness).map(AttributeInstance::value)
    }

    /// The held instance of `name`.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `TypeMismatch` or `AttributeNotHeld`.
    pub fn attribute<K: Kind>(&self, name: &str, _witness: K) -> Result<&AttributeInstance<K>> {
        K::table(&self.store.tables).map().get(self.owner, name)
    }

    /// Overwrite the value of `name`. Returns the previous value.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `TypeMismatch` or `AttributeNotHeld`.
    pub fn set_value<K: Kind>(
        &mut self,
        name: &str,
        value: K::Value,
        _witness: K,
    ) -> Result<K::Value> {
        let previous = K::table_mut(&mut self.store.tables).set_value(self.owner, name, value)?;
        self.store.refresh(self.owner)?;
        Ok(previous)
    }

    /// Current value of `name` in its kind's textual grammar.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` or `AttributeNotHeld`.
    pub fn value_text(&self, name: &str) -> Result<String> {
        let kind = self.store.schema.kind_of(name)?;
        with_kind!(kind, K => self.attribute(name, K::default()).map(AttributeInstance::value_text))
    }

    /// Overwrite the value of `name` with text parsed by its kind's grammar.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute`, `AttributeNotHeld` or `InvalidValue`.
    pub fn set_text(&mut self, name: &str, text: &str) -> Result<()> {
        let kind = self.store.schema.kind_of(name)?;
        with_kind!(kind, K => {
            let value = K::parse(text)?;
            self.set_value(name, value, K::default()).map(|_| ())
        })
    }

    /// Check whether `text`, parsed by the kind's grammar, equals the
    /// current value of `name`.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` or `AttributeNotHeld`.
    pub fn matches_text(&self, name: &str, text: &str) -> Result<bool> {
        let kind = self.store.schema.kind_of(name)?;
        with_kind!(kind, K => self.attribute(name, K::default()).map(|a| a.matches_text(text)))
    }

    /// Append to the extra description of `name`.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` or `AttributeNotHeld`.
    pub fn append_description(&mut self, name: &str, text: &str) -> Result<()> {
        let kind = self.store.schema.kind_of(name)?;
        let owner = self.owner;
        with_kind!(kind, K => {
            K::table_mut(&mut self.store.tables)
                .map_mut()
                .get_mut(owner, name)?
                .append_description(text);
        });
        self.store.refresh(owner)
    }

    /// Check if this owner holds `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(self.owner, name)
    }

    /// Every held attribute, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner was dropped.
    pub fn attributes(&self) -> Result<Vec<AnyAttribute>> {
        self.store.tables.attributes(self.owner, None)
    }

    /// Held attributes of any kind whose definition carries `tag`.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner was dropped.
    pub fn attributes_with_tag(&self, tag: Tag) -> Result<Vec<AnyAttribute>> {
        self.store.tables.attributes(self.owner, Some(tag))
    }

    /// Held attributes of one kind whose definition carries `tag`.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner was dropped.
    pub fn attributes_with_tag_of<K: Kind>(
        &self,
        tag: Tag,
        _witness: K,
    ) -> Result<Vec<AttributeInstance<K>>> {
        let mut found: Vec<_> = K::table(&self.store.tables)
            .map()
            .all_for(self.owner)?
            .filter(|instance| instance.has_tag(tag))
            .cloned()
            .collect();
        found.sort_by_key(AttributeInstance::sequence);
        Ok(found)
    }

    /// Install the creation-time guard. Replaces any previous one.
    ///
    /// Attributes already held are not re-checked.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner was dropped.
    pub fn set_validation(&mut self, validation: ValidationRule) -> Result<()> {
        self.store.state_mut(self.owner)?.validation = Some(validation);
        Ok(())
    }

    /// Remove the creation-time guard.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner was dropped.
    pub fn clear_validation(&mut self) -> Result<()> {
        self.store.state_mut(self.owner)?.validation = None;
        Ok(())
    }

    /// Listen to changes of one kind on this owner.
    pub fn add_observer<K: Kind>(
        &mut self,
        observer: impl AttributeObserver<K> + 'static,
        _witness: K,
    ) {
        K::table_mut(&mut self.store.tables).add_observer(self.owner, Box::new(observer));
    }

    /// Number of observers of one kind on this owner.
    #[must_use]
    pub fn observer_count<K: Kind>(&self, _witness: K) -> usize {
        K::table(&self.store.tables).observer_count(self.owner)
    }

    /// Copy every attribute `donor` holds onto this owner, and inherit the
    /// donor's validation predicate. Values and extra descriptions are
    /// copied; nothing is shared with the donor afterwards.
    ///
    /// Returns the number of attributes copied. Nothing is copied if this
    /// owner already holds any of the donor's names.
    ///
    /// # Errors
    ///
    /// `UnknownOwner` or `DuplicateAttribute`.
    pub fn copy_from(&mut self, donor: OwnerId) -> Result<usize> {
        let validation = self.store.state(donor)?.validation.clone();
        let copied = self.store.tables.copy(donor, self.owner)?;
        self.store.state_mut(self.owner)?.validation = validation;
        self.store.refresh(self.owner)?;
        debug!(owner = %self.owner, %donor, copied, "copied attributes");
        Ok(copied)
    }

    /// Cached description: one line per displayed attribute, ordered by
    /// display rank then insertion order.
    #[must_use]
    pub fn description(&self) -> &str {
        self.store
            .state(self.owner)
            .map_or("", |state| state.description.as_str())
    }
}

impl fmt::Display for AttributeManager<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl fmt::Debug for AttributeManager<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeManager")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::OwnerClass;
    use crate::kinds::{IntegerKind, KindId, BOOLEAN, INTEGER, REAL, TEXT};
    use crate::store::observer::{restrict_to, validation};

    const SOURCE: &str = "\
name,kind,default,tags,readable,display,settings,ignore,rank
gph,integer,0,stat-mod,yes,Gold Per Hour,signed-color:plus,0,1
legendary,boolean,false,creature-only,no
armor,integer,0,item-only:stat-mod,yes,Armor,,,5
speed,real,1.5,,yes,Speed,,,5
title,text,Sir,player-only,yes,Title,italic,,0
";

    fn store() -> AttributeStore {
        let mut store = AttributeStore::new(Arc::new(Schema::parse(SOURCE).unwrap()));
        store.register(OwnerId(1)).unwrap();
        store.register(OwnerId(2)).unwrap();
        store
    }

    #[test]
    fn test_register_unregister() {
        let mut store = store();
        assert!(matches!(store.register(OwnerId(1)), Err(AttrError::DuplicateOwner(_))));
        assert_eq!(store.owners(), vec![OwnerId(1), OwnerId(2)]);

        store.manager(OwnerId(2)).unwrap().generate("gph").unwrap();
        store.unregister(OwnerId(2)).unwrap();
        assert!(!store.contains(OwnerId(2), "gph"));
        assert!(matches!(store.manager(OwnerId(2)), Err(AttrError::UnknownOwner(_))));
        assert!(matches!(store.unregister(OwnerId(2)), Err(AttrError::UnknownOwner(_))));
    }

    #[test]
    fn test_generate_default_roundtrip() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate("speed").unwrap();
        assert_eq!(*manager.value("speed", REAL).unwrap(), 1.5);
        assert_eq!(manager.value_text("speed").unwrap(), "1.5");
    }

    #[test]
    fn test_generate_errors() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate("gph").unwrap();

        assert!(matches!(
            manager.generate("gph"),
            Err(AttrError::DuplicateAttribute { .. })
        ));
        assert!(matches!(manager.generate("mana"), Err(AttrError::UnknownAttribute(_))));
        assert!(matches!(
            manager.generate_with("legendary", 1, INTEGER),
            Err(AttrError::TypeMismatch {
                expected: KindId::Integer,
                actual: KindId::Boolean,
                ..
            })
        ));
        assert!(matches!(
            manager.generate_text("armor", "heavy"),
            Err(AttrError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_scenario_description() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();

        manager.generate_with("gph", 5, INTEGER).unwrap();
        assert_eq!(manager.to_string(), "Gold Per Hour: +5");

        manager.generate("legendary").unwrap();
        assert_eq!(manager.to_string(), "Gold Per Hour: +5");

        let tagged = manager.attributes_with_tag(Tag::StatMod).unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].name(), "gph");
    }

    #[test]
    fn test_description_order_and_ties() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate_with("armor", 3, INTEGER).unwrap();
        manager.generate_with("gph", 2, INTEGER).unwrap();
        manager.generate("speed").unwrap();
        manager.generate("title").unwrap();

        assert_eq!(
            manager.description(),
            "Title: Sir\nGold Per Hour: +2\nArmor: 3\nSpeed: 1.5"
        );
    }

    #[test]
    fn test_ignore_value_suppresses() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate("gph").unwrap();
        assert_eq!(manager.description(), "");

        manager.set_value("gph", -1, INTEGER).unwrap();
        assert_eq!(manager.description(), "Gold Per Hour: -1");

        manager.set_text("gph", "0").unwrap();
        assert_eq!(manager.description(), "");
    }

    #[test]
    fn test_append_description() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate("title").unwrap();
        manager.append_description("title", " of Nowhere").unwrap();
        assert_eq!(manager.description(), "Title: Sir of Nowhere");
    }

    #[test]
    fn test_remove() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate("gph").unwrap();
        manager.set_value("gph", 4, INTEGER).unwrap();

        let removed = manager.remove_typed("gph", INTEGER).unwrap();
        assert_eq!(*removed.value(), 4);
        assert!(!manager.contains("gph"));
        assert_eq!(manager.description(), "");
        assert!(matches!(
            manager.remove("gph"),
            Err(AttrError::AttributeNotHeld { .. })
        ));
        assert!(matches!(
            manager.value("gph", INTEGER),
            Err(AttrError::AttributeNotHeld { .. })
        ));
    }

    #[test]
    fn test_remove_typed_wrong_witness_keeps_attribute() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate_with("gph", 4, INTEGER).unwrap();

        assert!(matches!(
            manager.remove_typed("gph", TEXT),
            Err(AttrError::TypeMismatch {
                expected: KindId::Text,
                actual: KindId::Integer,
                ..
            })
        ));
        assert!(manager.contains("gph"));
        assert_eq!(*manager.value("gph", INTEGER).unwrap(), 4);
        assert_eq!(manager.description(), "Gold Per Hour: +4");
    }

    #[test]
    fn test_matches_text() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate_text("legendary", "yes").unwrap();
        assert!(manager.matches_text("legendary", "true").unwrap());
        assert!(!manager.matches_text("legendary", "no").unwrap());
        assert!(!manager.matches_text("legendary", "perhaps").unwrap());
        assert!(*manager.value("legendary", BOOLEAN).unwrap());
    }

    #[test]
    fn test_validation() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.set_validation(restrict_to(OwnerClass::Item)).unwrap();

        assert!(matches!(
            manager.generate("legendary"),
            Err(AttrError::Validation { .. })
        ));
        assert!(!manager.contains("legendary"));
        manager.generate("armor").unwrap();

        manager.clear_validation().unwrap();
        manager.generate("legendary").unwrap();
    }

    #[test]
    fn test_validation_not_retroactive() {
        let mut store = store();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.generate("legendary").unwrap();
        manager.set_validation(restrict_to(OwnerClass::Item)).unwrap();

        assert!(manager.contains("legendary"));
        assert!(!*manager.value("legendary", BOOLEAN).unwrap());
        manager.remove("legendary").unwrap();
        assert!(matches!(
            manager.generate("legendary"),
            Err(AttrError::Validation { .. })
        ));
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl AttributeObserver<IntegerKind> for Recorder {
        fn on_generated(&mut self, owner: OwnerId, attribute: &AttributeInstance<IntegerKind>) {
            self.0.borrow_mut().push(format!("{owner} +{}", attribute.name()));
        }

        fn on_removed(&mut self, owner: OwnerId, attribute: &AttributeInstance<IntegerKind>) {
            self.0.borrow_mut().push(format!("{owner} -{}", attribute.name()));
        }

        fn on_modified(
            &mut self,
            owner: OwnerId,
            attribute: &AttributeInstance<IntegerKind>,
            previous: &i64,
        ) {
            self.0
                .borrow_mut()
                .push(format!("{owner} {} {previous}->{}", attribute.name(), attribute.value()));
        }
    }

    #[test]
    fn test_observers_fire_per_kind() {
        let mut store = store();
        let recorder = Recorder::default();
        let mut manager = store.manager(OwnerId(1)).unwrap();
        manager.add_observer(recorder.clone(), INTEGER);
        assert_eq!(manager.observer_count(INTEGER), 1);
        assert_eq!(manager.observer_count(TEXT), 0);

        manager.generate("gph").unwrap();
        manager.generate("title").unwrap();
        manager.set_value("gph", 3, INTEGER).unwrap();
        manager.remove("gph").unwrap();

        assert_eq!(
            *recorder.0.borrow(),
            vec!["Owner(1) +gph", "Owner(1) gph 0->3", "Owner(1) -gph"]
        );
    }

    #[test]
    fn test_copy_from() {
        let mut store = store();
        {
            let mut donor = store.manager(OwnerId(1)).unwrap();
            donor.set_validation(restrict_to(OwnerClass::Item)).unwrap();
            donor.generate_with("gph", 7, INTEGER).unwrap();
            donor.generate("armor").unwrap();
            donor.append_description("gph", " (taxed)").unwrap();
        }

        let mut recipient = store.manager(OwnerId(2)).unwrap();
        assert_eq!(recipient.copy_from(OwnerId(1)).unwrap(), 2);
        assert_eq!(*recipient.value("gph", INTEGER).unwrap(), 7);
        assert_eq!(
            recipient.description(),
            "Gold Per Hour: +7 (taxed)\nArmor: 0"
        );

        // Inherited validation
        assert!(matches!(
            recipient.generate("legendary"),
            Err(AttrError::Validation { .. })
        ));

        // Independent afterwards
        recipient.set_value("gph", 1, INTEGER).unwrap();
        assert_eq!(
            *store.manager(OwnerId(1)).unwrap().value("gph", INTEGER).unwrap(),
            7
        );
    }

    #[test]
    fn test_copy_from_keeps_order_across_kinds() {
        let mut store = store();
        {
            let mut donor = store.manager(OwnerId(1)).unwrap();
            donor.generate("speed").unwrap();
            donor.generate_with("armor", 2, INTEGER).unwrap();
        }
        let expected = store.description(OwnerId(1)).unwrap().to_string();
        assert_eq!(expected, "Speed: 1.5\nArmor: 2");

        let mut recipient = store.manager(OwnerId(2)).unwrap();
        recipient.copy_from(OwnerId(1)).unwrap();
        assert_eq!(recipient.description(), expected);
        let names: Vec<String> = recipient
            .attributes()
            .unwrap()
            .iter()
            .map(|attribute| attribute.name().to_string())
            .collect();
        assert_eq!(names, ["speed", "armor"]);
    }

    #[test]
    fn test_copy_from_conflict() {
        let mut store = store();
        store.manager(OwnerId(1)).unwrap().generate("gph").unwrap();
        store.manager(OwnerId(1)).unwrap().generate("title").unwrap();
        store.manager(OwnerId(2)).unwrap().generate("gph").unwrap();

        let mut recipient = store.manager(OwnerId(2)).unwrap();
        assert!(matches!(
            recipient.copy_from(OwnerId(1)),
            Err(AttrError::DuplicateAttribute { .. })
        ));
        assert!(!recipient.contains("title"));
        assert!(matches!(
            recipient.copy_from(OwnerId(9)),
            Err(AttrError::UnknownOwner(_))
        ));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut store = store();
        {
            let mut manager = store.manager(OwnerId(1)).unwrap();
            manager.generate_with("gph", 5, INTEGER).unwrap();
            manager.generate("title").unwrap();
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.owners, vec![OwnerId(1), OwnerId(2)]);

        let schema = Arc::clone(store.schema());
        let (mut restored, report) = AttributeStore::restore(schema, snapshot).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.restored, 2);
        assert!(restored.is_registered(OwnerId(2)));
        assert_eq!(
            restored.description(OwnerId(1)).unwrap(),
            "Title: Sir\nGold Per Hour: +5"
        );

        // New attributes sort after the restored ones
        let armor = restored
            .manager(OwnerId(1))
            .unwrap()
            .generate_with("armor", 1, INTEGER)
            .unwrap();
        assert!(armor.sequence() >= 2);
    }

    #[test]
    fn test_restore_keeps_class_restriction() {
        let mut store = store();
        store
            .manager(OwnerId(2))
            .unwrap()
            .set_validation(restrict_to(OwnerClass::Item))
            .unwrap();
        store
            .manager(OwnerId(1))
            .unwrap()
            .set_validation(validation(|definition| definition.is_readable()))
            .unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.restrictions, vec![(OwnerId(2), OwnerClass::Item)]);

        let schema = Arc::clone(store.schema());
        let (mut restored, _) = AttributeStore::restore(schema, snapshot).unwrap();
        let mut item = restored.manager(OwnerId(2)).unwrap();
        assert!(matches!(
            item.generate("legendary"),
            Err(AttrError::Validation { .. })
        ));
        item.generate("armor").unwrap();

        // Custom closures are not saved
        restored.manager(OwnerId(1)).unwrap().generate("legendary").unwrap();
    }
}
