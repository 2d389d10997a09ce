//! Per-kind owner map.
//!
//! An `OwnerMap<K>` holds, for one kind, every registered owner's live
//! instances of that kind, keyed by attribute name. Owner rows are `im`
//! persistent maps, so taking a point-in-time snapshot of an owner is O(1).
//!
//! Insertion order is recorded with a `Sequence` that can be shared between
//! the maps of every kind, giving a store-wide order across kinds. Maps are
//! driven from one thread; the counter is not synchronized.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use im::OrdMap;
use rustc_hash::FxHashMap;

use super::snapshot::{KindSnapshot, SavedAttribute};
use crate::attributes::AttributeInstance;
use crate::core::{AttrError, OwnerId, Result};
use crate::kinds::Kind;
use crate::schema::Schema;

/// Rows of one owner for one kind.
pub type OwnerRows<K> = OrdMap<String, AttributeInstance<K>>;

/// Shared insertion counter.
#[derive(Clone, Debug, Default)]
pub struct Sequence(Rc<Cell<u64>>);

impl Sequence {
    /// Create a counter starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence number.
    pub fn next(&self) -> u64 {
        let next = self.0.get();
        self.0.set(next + 1);
        next
    }

    /// Make sure future numbers are greater than `seen`.
    pub fn advance_past(&self, seen: u64) {
        self.0.set(self.0.get().max(seen.saturating_add(1)));
    }
}

/// Owner → instances map for one kind.
#[derive(Clone, Debug)]
pub struct OwnerMap<K: Kind> {
    schema: Arc<Schema>,
    owners: FxHashMap<OwnerId, OwnerRows<K>>,
    sequence: Sequence,
}

impl<K: Kind> OwnerMap<K> {
    /// Create an empty map with its own insertion counter.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_sequence(schema, Sequence::new())
    }

    /// Create an empty map drawing from a shared insertion counter.
    #[must_use]
    pub fn with_sequence(schema: Arc<Schema>, sequence: Sequence) -> Self {
        Self {
            schema,
            owners: FxHashMap::default(),
            sequence,
        }
    }

    /// Create an empty sub-collection for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::DuplicateOwner` if already registered.
    pub fn register(&mut self, owner: OwnerId) -> Result<()> {
        if self.owners.contains_key(&owner) {
            return Err(AttrError::DuplicateOwner(owner));
        }
        self.owners.insert(owner, OwnerRows::new());
        Ok(())
    }

    /// Discard the owner's sub-collection. Returns `false` if the owner was
    /// not registered.
    pub fn unregister(&mut self, owner: OwnerId) -> bool {
        self.owners.remove(&owner).is_some()
    }

    /// Check if the owner is registered.
    #[must_use]
    pub fn is_registered(&self, owner: OwnerId) -> bool {
        self.owners.contains_key(&owner)
    }

    /// Iterate registered owners (unordered).
    pub fn owners(&self) -> impl Iterator<Item = OwnerId> + '_ {
        self.owners.keys().copied()
    }

    fn rows(&self, owner: OwnerId) -> Result<&OwnerRows<K>> {
        self.owners.get(&owner).ok_or(AttrError::UnknownOwner(owner))
    }

    fn rows_mut(&mut self, owner: OwnerId) -> Result<&mut OwnerRows<K>> {
        self.owners.get_mut(&owner).ok_or(AttrError::UnknownOwner(owner))
    }

    /// Error for a name this owner does not hold: the schema decides
    /// between unknown, wrong kind, and simply not held.
    fn not_held(&self, owner: OwnerId, name: &str) -> AttrError {
        match self.schema.typed::<K>(name) {
            Ok(_) => AttrError::AttributeNotHeld {
                owner,
                name: name.to_string(),
            },
            Err(err) => err,
        }
    }

    /// Clone the named definition onto `owner` with its default value.
    ///
    /// # Errors
    ///
    /// `UnknownOwner`, `UnknownAttribute`, `TypeMismatch` (name belongs to
    /// another kind) or `DuplicateAttribute`.
    pub fn generate(&mut self, owner: OwnerId, name: &str) -> Result<AttributeInstance<K>> {
        self.generate_with(owner, name, None)
    }

    /// Clone the named definition onto `owner`, optionally overriding the
    /// default value.
    ///
    /// # Errors
    ///
    /// As [`OwnerMap::generate`].
    pub fn generate_with(
        &mut self,
        owner: OwnerId,
        name: &str,
        value: Option<K::Value>,
    ) -> Result<AttributeInstance<K>> {
        let definition = Arc::clone(self.schema.typed::<K>(name)?);
        let sequence = self.sequence.clone();
        let rows = self.rows_mut(owner)?;
        if rows.contains_key(name) {
            return Err(AttrError::DuplicateAttribute {
                owner,
                name: name.to_string(),
            });
        }

        let mut instance = definition.new_instance().with_sequence(sequence.next());
        if let Some(value) = value {
            instance.set_value(value);
        }
        rows.insert(name.to_string(), instance.clone());
        Ok(instance)
    }

    /// Get an instance.
    ///
    /// # Errors
    ///
    /// `UnknownOwner`, `UnknownAttribute`, `TypeMismatch` or
    /// `AttributeNotHeld`.
    pub fn get(&self, owner: OwnerId, name: &str) -> Result<&AttributeInstance<K>> {
        match self.rows(owner)?.get(name) {
            Some(instance) => Ok(instance),
            None => Err(self.not_held(owner, name)),
        }
    }

    /// Get an instance mutably.
    ///
    /// # Errors
    ///
    /// As [`OwnerMap::get`].
    pub fn get_mut(&mut self, owner: OwnerId, name: &str) -> Result<&mut AttributeInstance<K>> {
        let held = self.rows(owner)?.contains_key(name);
        if !held {
            return Err(self.not_held(owner, name));
        }
        self.rows_mut(owner)?
            .get_mut(name)
            .ok_or_else(|| AttrError::AttributeNotHeld {
                owner,
                name: name.to_string(),
            })
    }

    /// Remove an instance and return it.
    ///
    /// # Errors
    ///
    /// As [`OwnerMap::get`].
    pub fn remove(&mut self, owner: OwnerId, name: &str) -> Result<AttributeInstance<K>> {
        match self.rows_mut(owner)?.remove(name) {
            Some(instance) => Ok(instance),
            None => Err(self.not_held(owner, name)),
        }
    }

    /// Check if `owner` holds `name`. Unregistered owners hold nothing.
    #[must_use]
    pub fn contains(&self, owner: OwnerId, name: &str) -> bool {
        self.owners
            .get(&owner)
            .is_some_and(|rows| rows.contains_key(name))
    }

    /// Iterate an owner's instances.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner is not registered.
    pub fn all_for(&self, owner: OwnerId) -> Result<impl Iterator<Item = &AttributeInstance<K>>> {
        Ok(self.rows(owner)?.values())
    }

    /// Point-in-time copy of an owner's rows.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner is not registered.
    pub fn snapshot(&self, owner: OwnerId) -> Result<OwnerRows<K>> {
        self.rows(owner).cloned()
    }

    /// Number of instances an owner holds.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::UnknownOwner` if the owner is not registered.
    pub fn count(&self, owner: OwnerId) -> Result<usize> {
        Ok(self.rows(owner)?.len())
    }

    /// Fail with `DuplicateAttribute` if `to` already holds any name `from`
    /// holds.
    ///
    /// # Errors
    ///
    /// `UnknownOwner` for either owner, or `DuplicateAttribute`.
    pub fn check_copy(&self, from: OwnerId, to: OwnerId) -> Result<()> {
        let donor = self.rows(from)?;
        let recipient = self.rows(to)?;
        match donor.keys().find(|name| recipient.contains_key(*name)) {
            Some(name) => Err(AttrError::DuplicateAttribute {
                owner: to,
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Generate every attribute `from` holds on `to` and copy its value and
    /// extra description. Instances are copied in the donor's insertion
    /// order; the copies share no mutable state with the donor.
    ///
    /// Returns the recipient's new instances. Nothing is copied if any name
    /// conflicts.
    ///
    /// # Errors
    ///
    /// `UnknownOwner` for either owner, or `DuplicateAttribute`.
    pub fn copy(&mut self, from: OwnerId, to: OwnerId) -> Result<Vec<AttributeInstance<K>>> {
        self.check_copy(from, to)?;

        let mut names: Vec<(u64, String)> = self
            .rows(from)?
            .values()
            .map(|instance| (instance.sequence(), instance.name().to_string()))
            .collect();
        names.sort_unstable();

        names
            .into_iter()
            .map(|(_, name)| self.copy_one(from, to, &name))
            .collect()
    }

    /// Generate `name` on `to` with `from`'s value and extra description.
    ///
    /// # Errors
    ///
    /// `UnknownOwner` for either owner, `AttributeNotHeld` if `from` does
    /// not hold the name, or `DuplicateAttribute` if `to` already does.
    pub fn copy_one(
        &mut self,
        from: OwnerId,
        to: OwnerId,
        name: &str,
    ) -> Result<AttributeInstance<K>> {
        let source = self.get(from, name)?.clone();
        let mut instance = self.generate_with(to, name, Some(source.value().clone()))?;
        if !source.extra_description().is_empty() {
            instance.set_extra_description(source.extra_description());
            self.rows_mut(to)?.insert(name.to_string(), instance.clone());
        }
        Ok(instance)
    }

    /// Capture every owner's rows.
    #[must_use]
    pub fn save(&self) -> KindSnapshot<K> {
        let mut owners: Vec<_> = self
            .owners
            .iter()
            .map(|(owner, rows)| {
                let saved = rows
                    .values()
                    .map(|instance| SavedAttribute {
                        name: instance.name().to_string(),
                        value: instance.value().clone(),
                        extra: instance.extra_description().to_string(),
                        sequence: instance.sequence(),
                    })
                    .collect();
                (*owner, saved)
            })
            .collect();
        owners.sort_by_key(|(owner, _)| *owner);
        KindSnapshot { owners }
    }

    /// Put back one saved attribute, keeping its insertion sequence.
    ///
    /// # Errors
    ///
    /// `UnknownOwner`, `UnknownAttribute` (the name left the schema),
    /// `TypeMismatch` (the name changed kind) or `DuplicateAttribute`.
    pub fn restore(&mut self, owner: OwnerId, saved: SavedAttribute<K>) -> Result<()> {
        let definition = Arc::clone(self.schema.typed::<K>(&saved.name)?);
        self.sequence.advance_past(saved.sequence);
        let rows = self.rows_mut(owner)?;
        if rows.contains_key(&saved.name) {
            return Err(AttrError::DuplicateAttribute {
                owner,
                name: saved.name,
            });
        }

        let mut instance = definition.new_instance().with_sequence(saved.sequence);
        instance.set_value(saved.value);
        instance.set_extra_description(saved.extra);
        rows.insert(saved.name, instance);
        Ok(())
    }
}
