//! Persistence contract.
//!
//! A `StoreSnapshot` captures every registered owner and, per kind, each
//! owner's live instances as (name, typed value, extra description,
//! insertion sequence). Definitions are not saved: on restore every name is
//! resolved against the schema in effect at load time.
//!
//! An owner's class restriction is saved with it. Custom validation
//! closures and observers are not part of a snapshot; the host re-attaches
//! them after restoring.

use serde::{Deserialize, Serialize};

use crate::core::{OwnerClass, OwnerId, Result};
use crate::kinds::{
    BooleanKind, GroupKind, IntegerKind, Kind, KindId, RealKind, TagSetKind, TextKind,
};

/// One saved instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SavedAttribute<K: Kind> {
    /// Attribute name.
    pub name: String,
    /// Value at the time of the snapshot.
    pub value: K::Value,
    /// Extra description suffix.
    pub extra: String,
    /// Store-wide insertion sequence.
    pub sequence: u64,
}

/// Every owner's saved instances of one kind, sorted by owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct KindSnapshot<K: Kind> {
    /// Owner → saved instances.
    pub owners: Vec<(OwnerId, Vec<SavedAttribute<K>>)>,
}

impl<K: Kind> Default for KindSnapshot<K> {
    fn default() -> Self {
        Self { owners: Vec::new() }
    }
}

/// Complete saved state of an `AttributeStore`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Every registered owner, including those holding nothing.
    pub owners: Vec<OwnerId>,
    /// Owners guarded by a class restriction, sorted by owner.
    pub restrictions: Vec<(OwnerId, OwnerClass)>,
    /// Saved integer instances.
    pub integer: KindSnapshot<IntegerKind>,
    /// Saved real instances.
    pub real: KindSnapshot<RealKind>,
    /// Saved text instances.
    pub text: KindSnapshot<TextKind>,
    /// Saved boolean instances.
    pub boolean: KindSnapshot<BooleanKind>,
    /// Saved tag-set instances.
    pub tag_set: KindSnapshot<TagSetKind>,
    /// Saved group instances.
    pub group: KindSnapshot<GroupKind>,
}

impl StoreSnapshot {
    /// Encode with bincode.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::Snapshot` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    ///
    /// # Errors
    ///
    /// Returns `AttrError::Snapshot` if the bytes are not a snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Total saved instances across kinds.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        fn count<K: Kind>(snapshot: &KindSnapshot<K>) -> usize {
            snapshot.owners.iter().map(|(_, saved)| saved.len()).sum()
        }
        count(&self.integer)
            + count(&self.real)
            + count(&self.text)
            + count(&self.boolean)
            + count(&self.tag_set)
            + count(&self.group)
    }
}

/// A saved instance that could not be restored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedAttribute {
    /// Owner the instance was saved under.
    pub owner: OwnerId,
    /// Saved attribute name.
    pub name: String,
    /// Kind the instance was saved as.
    pub kind: KindId,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of restoring a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Instances put back.
    pub restored: usize,
    /// Instances dropped because their name left the schema or changed kind.
    pub skipped: Vec<SkippedAttribute>,
}

impl RestoreReport {
    /// Check if every saved instance came back.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Tag, TagSet};
    use crate::kinds::Group;

    #[test]
    fn test_bytes_roundtrip() {
        let snapshot = StoreSnapshot {
            owners: vec![OwnerId(1), OwnerId(2)],
            restrictions: vec![(OwnerId(2), OwnerClass::Item)],
            integer: KindSnapshot {
                owners: vec![(
                    OwnerId(1),
                    vec![SavedAttribute {
                        name: "gph".into(),
                        value: 5,
                        extra: " (taxed)".into(),
                        sequence: 3,
                    }],
                )],
            },
            tag_set: KindSnapshot {
                owners: vec![(
                    OwnerId(2),
                    vec![SavedAttribute {
                        name: "traits".into(),
                        value: TagSet::new().with(Tag::StatMod),
                        extra: String::new(),
                        sequence: 4,
                    }],
                )],
            },
            group: KindSnapshot {
                owners: vec![(
                    OwnerId(2),
                    vec![SavedAttribute {
                        name: "group".into(),
                        value: Group::Undead,
                        extra: String::new(),
                        sequence: 5,
                    }],
                )],
            },
            ..StoreSnapshot::default()
        };

        let bytes = snapshot.to_bytes().unwrap();
        let decoded = StoreSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.attribute_count(), 3);
        assert_eq!(decoded.restrictions, vec![(OwnerId(2), OwnerClass::Item)]);
    }

    #[test]
    fn test_garbage_bytes() {
        assert!(StoreSnapshot::from_bytes(&[0xff; 3]).is_err());
    }
}
