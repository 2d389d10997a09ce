//! Display metadata and formatting for human-readable attributes.
//!
//! A readable definition carries a `DisplayInfo`: its display name, where it
//! sorts in an owner's description, how its value is decorated, and the
//! value at which it is hidden.
//!
//! ## Rendering
//!
//! `"<display name>: <formatted value><extra description>"`, where the
//! formatted value is produced by:
//! 1. the definition's value transform, or the kind's own format
//! 2. `+` prefix for strictly positive numbers (`plus`)
//! 3. `/10` suffix (`out-of-ten`)
//! 4. with [`RenderStyle::Markup`] only: sign colouring (`signed-color`)
//!    and italics (`italic`)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ParseTokenError, LIST_DELIMITER};
use crate::kinds::Kind;

/// Host-supplied value→text transform.
pub type ValueTransform<K> = Arc<dyn Fn(&<K as Kind>::Value) -> String + Send + Sync>;

/// Where an attribute sorts in a description. Lower sorts earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DisplayRank {
    /// Explicit rank.
    At(u32),
    /// After every explicit rank.
    Last,
}

impl fmt::Display for DisplayRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayRank::At(rank) => write!(f, "{rank}"),
            DisplayRank::Last => f.write_str("last"),
        }
    }
}

/// One formatting setting from the display-settings column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayFlag {
    /// Colour the value green when positive and red when negative.
    SignColor,
    /// Render the value in italics.
    Italic,
    /// Append `/10` to the value.
    OutOfTen,
    /// Prefix positive numbers with `+`.
    PlusSign,
    /// Readable but never shown in descriptions.
    Hidden,
}

impl DisplayFlag {
    /// All flags.
    pub const ALL: [DisplayFlag; 5] = [
        DisplayFlag::SignColor,
        DisplayFlag::Italic,
        DisplayFlag::OutOfTen,
        DisplayFlag::PlusSign,
        DisplayFlag::Hidden,
    ];

    /// The schema token for this flag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DisplayFlag::SignColor => "signed-color",
            DisplayFlag::Italic => "italic",
            DisplayFlag::OutOfTen => "out-of-ten",
            DisplayFlag::PlusSign => "plus",
            DisplayFlag::Hidden => "hidden",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl FromStr for DisplayFlag {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        DisplayFlag::ALL
            .into_iter()
            .find(|flag| flag.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ParseTokenError::new("display setting", token))
    }
}

/// A set of display flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayFlags(u8);

impl DisplayFlags {
    /// No flags.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a flag (builder pattern).
    #[must_use]
    pub const fn with(self, flag: DisplayFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    /// Add a flag.
    pub fn insert(&mut self, flag: DisplayFlag) {
        self.0 |= flag.bit();
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn contains(self, flag: DisplayFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Check if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<DisplayFlag> for DisplayFlags {
    fn from_iter<I: IntoIterator<Item = DisplayFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Parses `signed-color:plus`. Empty text is the empty set.
impl FromStr for DisplayFlags {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(LIST_DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<DisplayFlag>)
            .collect()
    }
}

/// Output flavour for rendered attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderStyle {
    /// Plain text, no markup.
    #[default]
    Plain,
    /// BBCode-style markup (`[color=green]`, `[i]`) for rich text widgets.
    Markup,
}

/// Display metadata of a readable attribute definition.
pub struct DisplayInfo<K: Kind> {
    name: String,
    rank: DisplayRank,
    flags: DisplayFlags,
    ignore: Option<K::Value>,
    transform: Option<ValueTransform<K>>,
}

impl<K: Kind> DisplayInfo<K> {
    /// Create display metadata with no flags, ignore value or transform.
    pub fn new(name: impl Into<String>, rank: DisplayRank) -> Self {
        Self {
            name: name.into(),
            rank,
            flags: DisplayFlags::empty(),
            ignore: None,
            transform: None,
        }
    }

    /// Set the formatting flags (builder pattern).
    #[must_use]
    pub fn with_flags(mut self, flags: DisplayFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Hide the attribute while it holds `value` (builder pattern).
    #[must_use]
    pub fn with_ignore(mut self, value: K::Value) -> Self {
        self.ignore = Some(value);
        self
    }

    /// Set the value transform (builder pattern).
    #[must_use]
    pub fn with_transform(
        mut self,
        transform: impl Fn(&K::Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub(crate) fn set_transform(&mut self, transform: ValueTransform<K>) {
        self.transform = Some(transform);
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display rank.
    #[must_use]
    pub fn rank(&self) -> DisplayRank {
        self.rank
    }

    /// Formatting flags.
    #[must_use]
    pub fn flags(&self) -> DisplayFlags {
        self.flags
    }

    /// Value at which the attribute is hidden.
    #[must_use]
    pub fn ignore_value(&self) -> Option<&K::Value> {
        self.ignore.as_ref()
    }

    /// Whether a transform is installed.
    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Whether the definition may appear in descriptions at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.flags.contains(DisplayFlag::Hidden)
    }

    /// Whether an attribute holding `value` is left out of descriptions.
    #[must_use]
    pub fn suppresses(&self, value: &K::Value) -> bool {
        !self.is_visible() || self.ignore.as_ref() == Some(value)
    }

    /// Format a value per the transform and flags.
    #[must_use]
    pub fn format_value(&self, value: &K::Value, style: RenderStyle) -> String {
        let mut text = match &self.transform {
            Some(transform) => transform(value),
            None => K::format(value),
        };
        let sign = K::sign(value);

        if self.flags.contains(DisplayFlag::PlusSign) && sign == Some(Ordering::Greater) {
            text.insert(0, '+');
        }
        if self.flags.contains(DisplayFlag::OutOfTen) {
            text.push_str("/10");
        }

        if style == RenderStyle::Markup {
            if self.flags.contains(DisplayFlag::SignColor) {
                match sign {
                    Some(Ordering::Greater) => text = format!("[color=green]{text}[/color]"),
                    Some(Ordering::Less) => text = format!("[color=red]{text}[/color]"),
                    _ => {}
                }
            }
            if self.flags.contains(DisplayFlag::Italic) {
                text = format!("[i]{text}[/i]");
            }
        }
        text
    }

    /// Render a full description line.
    #[must_use]
    pub fn render(&self, value: &K::Value, extra: &str, style: RenderStyle) -> String {
        format!("{}: {}{}", self.name, self.format_value(value, style), extra)
    }
}

impl<K: Kind> Clone for DisplayInfo<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            rank: self.rank,
            flags: self.flags,
            ignore: self.ignore.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<K: Kind> fmt::Debug for DisplayInfo<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayInfo")
            .field("name", &self.name)
            .field("rank", &self.rank)
            .field("flags", &self.flags)
            .field("ignore", &self.ignore)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}
