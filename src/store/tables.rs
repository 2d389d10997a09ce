//! The six per-kind tables of a store.
//!
//! A `KindTable<K>` pairs the kind's `OwnerMap` with the observers each
//! owner registered for that kind, and fires them on every change.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::any::AnyAttribute;
use super::observer::AttributeObserver;
use super::owner_map::{OwnerMap, Sequence};
use crate::attributes::{AttributeInstance, DisplayRank, RenderStyle};
use crate::core::{OwnerId, Result, Tag};
use crate::kinds::{
    with_kind, BooleanKind, GroupKind, IntegerKind, Kind, KindId, RealKind, TagSetKind, TextKind,
};
use crate::schema::Schema;

/// Owner map and observers of one kind.
pub struct KindTable<K: Kind> {
    map: OwnerMap<K>,
    observers: FxHashMap<OwnerId, Vec<Box<dyn AttributeObserver<K>>>>,
}

impl<K: Kind> KindTable<K> {
    pub(crate) fn new(schema: Arc<Schema>, sequence: Sequence) -> Self {
        Self {
            map: OwnerMap::with_sequence(schema, sequence),
            observers: FxHashMap::default(),
        }
    }

    /// The underlying owner map.
    #[must_use]
    pub fn map(&self) -> &OwnerMap<K> {
        &self.map
    }

    pub(crate) fn map_mut(&mut self) -> &mut OwnerMap<K> {
        &mut self.map
    }

    pub(crate) fn register(&mut self, owner: OwnerId) -> Result<()> {
        self.map.register(owner)
    }

    pub(crate) fn unregister(&mut self, owner: OwnerId) -> bool {
        self.observers.remove(&owner);
        self.map.unregister(owner)
    }

    pub(crate) fn add_observer(
        &mut self,
        owner: OwnerId,
        observer: Box<dyn AttributeObserver<K>>,
    ) {
        self.observers.entry(owner).or_default().push(observer);
    }

    pub(crate) fn observer_count(&self, owner: OwnerId) -> usize {
        self.observers.get(&owner).map_or(0, Vec::len)
    }

    pub(crate) fn notify_generated(&mut self, owner: OwnerId, instance: &AttributeInstance<K>) {
        if let Some(observers) = self.observers.get_mut(&owner) {
            for observer in observers {
                observer.on_generated(owner, instance);
            }
        }
    }

    /// Generate an instance and fire `on_generated`.
    pub(crate) fn generate(
        &mut self,
        owner: OwnerId,
        name: &str,
        value: Option<K::Value>,
    ) -> Result<AttributeInstance<K>> {
        let instance = self.map.generate_with(owner, name, value)?;
        self.notify_generated(owner, &instance);
        Ok(instance)
    }

    /// Remove an instance and fire `on_removed`.
    pub(crate) fn remove(&mut self, owner: OwnerId, name: &str) -> Result<AttributeInstance<K>> {
        let instance = self.map.remove(owner, name)?;
        if let Some(observers) = self.observers.get_mut(&owner) {
            for observer in observers {
                observer.on_removed(owner, &instance);
            }
        }
        Ok(instance)
    }

    /// Overwrite a value and fire `on_modified`. Returns the previous value.
    pub(crate) fn set_value(
        &mut self,
        owner: OwnerId,
        name: &str,
        value: K::Value,
    ) -> Result<K::Value> {
        let instance = self.map.get_mut(owner, name)?;
        let previous = instance.set_value(value);
        let instance = instance.clone();
        if let Some(observers) = self.observers.get_mut(&owner) {
            for observer in observers {
                observer.on_modified(owner, &instance, &previous);
            }
        }
        Ok(previous)
    }

    /// Copy one of `from`'s instances onto `to` and fire `on_generated` on
    /// the recipient's observers.
    pub(crate) fn copy_one(&mut self, from: OwnerId, to: OwnerId, name: &str) -> Result<()> {
        let instance = self.map.copy_one(from, to, name)?;
        self.notify_generated(to, &instance);
        Ok(())
    }

    fn held(&self, owner: OwnerId, out: &mut Vec<(u64, KindId, String)>) -> Result<()> {
        out.extend(
            self.map
                .all_for(owner)?
                .map(|instance| (instance.sequence(), K::ID, instance.name().to_string())),
        );
        Ok(())
    }

    fn collect(
        &self,
        owner: OwnerId,
        tag: Option<Tag>,
        out: &mut Vec<AnyAttribute>,
    ) -> Result<()> {
        out.extend(
            self.map
                .all_for(owner)?
                .filter(|instance| tag.map_or(true, |tag| instance.has_tag(tag)))
                .cloned()
                .map(K::into_any),
        );
        Ok(())
    }

    fn lines(&self, owner: OwnerId, out: &mut Vec<(DisplayRank, u64, String)>) -> Result<()> {
        for instance in self.map.all_for(owner)? {
            let rendered = (instance.display_rank(), instance.render(RenderStyle::Plain));
            if let (Some(rank), Some(line)) = rendered {
                out.push((rank, instance.sequence(), line));
            }
        }
        Ok(())
    }
}

impl<K: Kind> fmt::Debug for KindTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindTable")
            .field("kind", &K::ID)
            .field("map", &self.map)
            .field("observers", &self.observers.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

/// One table per kind, drawing from a shared insertion sequence.
#[derive(Debug)]
pub struct KindTables {
    sequence: Sequence,
    pub(crate) integer: KindTable<IntegerKind>,
    pub(crate) real: KindTable<RealKind>,
    pub(crate) text: KindTable<TextKind>,
    pub(crate) boolean: KindTable<BooleanKind>,
    pub(crate) tag_set: KindTable<TagSetKind>,
    pub(crate) group: KindTable<GroupKind>,
}

/// Evaluate an expression against every kind's table in turn.
macro_rules! each_table {
    ($tables:expr, $t:ident => $body:expr) => {{
        { let $t = &mut $tables.integer; $body; }
        { let $t = &mut $tables.real; $body; }
        { let $t = &mut $tables.text; $body; }
        { let $t = &mut $tables.boolean; $body; }
        { let $t = &mut $tables.tag_set; $body; }
        { let $t = &mut $tables.group; $body; }
    }};
}

macro_rules! each_table_ref {
    ($tables:expr, $t:ident => $body:expr) => {{
        { let $t = &$tables.integer; $body; }
        { let $t = &$tables.real; $body; }
        { let $t = &$tables.text; $body; }
        { let $t = &$tables.boolean; $body; }
        { let $t = &$tables.tag_set; $body; }
        { let $t = &$tables.group; $body; }
    }};
}

impl KindTables {
    pub(crate) fn new(schema: &Arc<Schema>) -> Self {
        let sequence = Sequence::new();
        Self {
            integer: KindTable::new(Arc::clone(schema), sequence.clone()),
            real: KindTable::new(Arc::clone(schema), sequence.clone()),
            text: KindTable::new(Arc::clone(schema), sequence.clone()),
            boolean: KindTable::new(Arc::clone(schema), sequence.clone()),
            tag_set: KindTable::new(Arc::clone(schema), sequence.clone()),
            group: KindTable::new(Arc::clone(schema), sequence.clone()),
            sequence,
        }
    }

    /// The table of one kind.
    #[must_use]
    pub fn get<K: Kind>(&self, _witness: K) -> &KindTable<K> {
        K::table(self)
    }

    /// The insertion counter shared by every kind.
    #[must_use]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Register `owner` with every kind. The caller checks for duplicates.
    pub(crate) fn register(&mut self, owner: OwnerId) -> Result<()> {
        each_table!(self, t => t.register(owner)?);
        Ok(())
    }

    pub(crate) fn unregister(&mut self, owner: OwnerId) {
        each_table!(self, t => t.unregister(owner));
    }

    /// Copy every kind from `from` to `to`, in the donor's insertion order
    /// across kinds. Conflicts in any kind are found before anything is
    /// copied.
    pub(crate) fn copy(&mut self, from: OwnerId, to: OwnerId) -> Result<usize> {
        let mut donor = Vec::new();
        each_table_ref!(self, t => {
            t.map().check_copy(from, to)?;
            t.held(from, &mut donor)?;
        });
        donor.sort_unstable();

        for (_, kind, name) in &donor {
            with_kind!(*kind, K => K::table_mut(self).copy_one(from, to, name)?);
        }
        Ok(donor.len())
    }

    /// Every instance an owner holds, optionally only those whose
    /// definition carries `tag`, in insertion order.
    pub(crate) fn attributes(
        &self,
        owner: OwnerId,
        tag: Option<Tag>,
    ) -> Result<Vec<AnyAttribute>> {
        let mut out = Vec::new();
        each_table_ref!(self, t => t.collect(owner, tag, &mut out)?);
        out.sort_by_key(AnyAttribute::sequence);
        Ok(out)
    }

    /// Plain description of an owner: one line per displayed instance,
    /// ordered by display rank then insertion sequence.
    pub(crate) fn describe(&self, owner: OwnerId) -> Result<String> {
        let mut lines = Vec::new();
        each_table_ref!(self, t => t.lines(owner, &mut lines)?);
        lines.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        Ok(lines
            .into_iter()
            .map(|(_, _, line)| line)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
