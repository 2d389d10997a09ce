//! Characteristic tags carried by attribute definitions.
//!
//! Tags are a closed enumeration. They either restrict which class of owner
//! may hold an attribute (`creature-only`, `item-only`, `player-only`) or mark
//! behaviour the host cares about (`stat-mod`: the attribute modifies a
//! global statistic such as gold per hour).
//!
//! A `TagSet` is kept sorted and free of duplicates, so two sets holding the
//! same tags compare equal whatever order they were written in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::ParseTokenError;

/// Delimiter between entries of a list-valued schema field.
pub const LIST_DELIMITER: char = ':';

/// A characteristic tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Only creatures may hold the attribute.
    CreatureOnly,
    /// Only items may hold the attribute.
    ItemOnly,
    /// Only the player may hold the attribute.
    PlayerOnly,
    /// The attribute modifies a global statistic.
    StatMod,
}

impl Tag {
    /// All tags, in declaration order.
    pub const ALL: [Tag; 4] = [Tag::CreatureOnly, Tag::ItemOnly, Tag::PlayerOnly, Tag::StatMod];

    /// The schema token for this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::CreatureOnly => "creature-only",
            Tag::ItemOnly => "item-only",
            Tag::PlayerOnly => "player-only",
            Tag::StatMod => "stat-mod",
        }
    }

    /// Whether this tag restricts the owner class.
    #[must_use]
    pub const fn is_class_restriction(self) -> bool {
        matches!(self, Tag::CreatureOnly | Tag::ItemOnly | Tag::PlayerOnly)
    }
}

impl FromStr for Tag {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseTokenError::new("tag", token))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, duplicate-free set of tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSet(SmallVec<[Tag; 4]>);

impl TagSet {
    /// Create an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag. Returns `false` if it was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        match self.0.binary_search(&tag) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, tag);
                true
            }
        }
    }

    /// Remove a tag. Returns `false` if it was absent.
    pub fn remove(&mut self, tag: Tag) -> bool {
        match self.0.binary_search(&tag) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with(mut self, tag: Tag) -> Self {
        self.insert(tag);
        self
    }

    /// Check if the set contains a tag.
    #[must_use]
    pub fn contains(&self, tag: Tag) -> bool {
        self.0.binary_search(&tag).is_ok()
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parses `creature-only:stat-mod`. Empty text is the empty set.
impl FromStr for TagSet {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(LIST_DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<Tag>)
            .collect()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{LIST_DELIMITER}")?;
            }
            f.write_str(tag.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_tokens() {
        for tag in Tag::ALL {
            assert_eq!(tag.as_str().parse::<Tag>().unwrap(), tag);
        }
        assert_eq!("Stat-Mod".parse::<Tag>().unwrap(), Tag::StatMod);
        assert!("flying".parse::<Tag>().is_err());
    }

    #[test]
    fn test_tag_set_sorted_and_deduplicated() {
        let a: TagSet = "stat-mod:creature-only:stat-mod".parse().unwrap();
        let b: TagSet = "creature-only:stat-mod".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.to_string(), "creature-only:stat-mod");
    }

    #[test]
    fn test_tag_set_empty() {
        let set: TagSet = "".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn test_tag_set_unknown_token_fails() {
        let err = "creature-only:shiny".parse::<TagSet>().unwrap_err();
        assert_eq!(err.token, "shiny");
    }

    #[test]
    fn test_insert_remove() {
        let mut set = TagSet::new().with(Tag::ItemOnly);
        assert!(set.insert(Tag::StatMod));
        assert!(!set.insert(Tag::StatMod));
        assert!(set.contains(Tag::ItemOnly));
        assert!(set.remove(Tag::ItemOnly));
        assert!(!set.remove(Tag::ItemOnly));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![Tag::StatMod]);
    }
}
