//! Owner identification.
//!
//! Every entity that can hold attributes (creature, item, player) is
//! addressed by an `OwnerId`. The store never interprets the raw value; the
//! host simulation allocates ids however it likes.
//!
//! ## Usage
//!
//! ```
//! use game_attrs::core::{OwnerClass, OwnerId};
//!
//! let goblin = OwnerId::new(10);
//! assert_eq!(goblin.raw(), 10);
//! assert_eq!(format!("{}", goblin), "Owner(10)");
//!
//! assert_eq!(OwnerClass::Creature.restricting_tag().as_str(), "creature-only");
//! ```

use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Unique identifier for an attribute owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u32);

impl OwnerId {
    /// Create a new owner ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for OwnerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Owner({})", self.0)
    }
}

/// Broad class of an owning entity.
///
/// Definitions can be restricted to one class through the
/// `creature-only`, `item-only` and `player-only` tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerClass {
    /// A creature living on the board.
    Creature,
    /// An item that can be bought, equipped or placed.
    Item,
    /// The player.
    Player,
}

impl OwnerClass {
    /// All owner classes.
    pub const ALL: [OwnerClass; 3] = [OwnerClass::Creature, OwnerClass::Item, OwnerClass::Player];

    /// The tag that restricts a definition to this class.
    #[must_use]
    pub const fn restricting_tag(self) -> Tag {
        match self {
            OwnerClass::Creature => Tag::CreatureOnly,
            OwnerClass::Item => Tag::ItemOnly,
            OwnerClass::Player => Tag::PlayerOnly,
        }
    }

    /// Check whether a definition carrying `tags` may be held by this class.
    ///
    /// Untagged definitions are allowed everywhere; a definition restricted
    /// to another class is refused.
    pub fn admits<'a>(self, tags: impl IntoIterator<Item = &'a Tag>) -> bool {
        let own = self.restricting_tag();
        tags.into_iter()
            .filter(|tag| tag.is_class_restriction())
            .all(|tag| *tag == own)
    }
}
