//! Enumerated creature groups, the value type of the `group` kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ParseTokenError;

/// The family a creature belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    /// No particular family.
    #[default]
    Neutral,
    /// Animals and monsters.
    Beast,
    /// Skeletons, ghosts and the like.
    Undead,
    /// Creatures of fire, water, earth or air.
    Elemental,
    /// Humans, elves, goblins.
    Humanoid,
    /// Golems and automatons.
    Construct,
}

impl Group {
    /// All groups, in declaration order.
    pub const ALL: [Group; 6] = [
        Group::Neutral,
        Group::Beast,
        Group::Undead,
        Group::Elemental,
        Group::Humanoid,
        Group::Construct,
    ];

    /// The schema token for this group.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Group::Neutral => "neutral",
            Group::Beast => "beast",
            Group::Undead => "undead",
            Group::Elemental => "elemental",
            Group::Humanoid => "humanoid",
            Group::Construct => "construct",
        }
    }
}

impl FromStr for Group {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Group::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseTokenError::new("group", token))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        for group in Group::ALL {
            assert_eq!(group.to_string().parse::<Group>().unwrap(), group);
        }
        assert_eq!(" UNDEAD ".parse::<Group>().unwrap(), Group::Undead);
        assert!("dragon".parse::<Group>().is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(Group::default(), Group::Neutral);
    }
}
