//! Typed properties.
//!
//! Property keys form an extensible enumeration: the keys the core reasons
//! about are named variants, anything else is carried as [`PropertyKey::Other`].
//! Values are a small tagged union. An unset property is `None`, which is
//! distinct from a property set to the empty string.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PropertyKey
// ---------------------------------------------------------------------------

/// Name of a property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyKey {
    /// Object name.
    Name,
    /// Template a cell instantiates.
    RefName,
    /// BEL a cell is bound to.
    Bel,
    /// Site a cell is bound to.
    Site,
    /// Site location constraint of a cell.
    Loc,
    /// Placement status of a cell.
    Status,
    /// Type of a BEL or site.
    Type,
    /// Tile containing a site.
    Tile,
    /// Occupancy flag of a BEL or site.
    IsUsed,
    /// Whether a cell is a leaf primitive.
    IsPrimitive,
    /// Whether a cell has no template.
    IsBlackbox,
    /// Whether a cell's site is locked.
    IsLocFixed,
    /// Whether a cell's BEL is locked.
    IsBelFixed,
    /// Direction of a pin or port.
    Direction,
    /// Whether a pin or port sits on a net.
    IsConnected,
    /// Any other property, stored upper-case.
    Other(String),
}

const WELL_KNOWN: &[(PropertyKey, &str)] = &[
    (PropertyKey::Name, "NAME"),
    (PropertyKey::RefName, "REF_NAME"),
    (PropertyKey::Bel, "BEL"),
    (PropertyKey::Site, "SITE"),
    (PropertyKey::Loc, "LOC"),
    (PropertyKey::Status, "STATUS"),
    (PropertyKey::Type, "TYPE"),
    (PropertyKey::Tile, "TILE"),
    (PropertyKey::IsUsed, "IS_USED"),
    (PropertyKey::IsPrimitive, "IS_PRIMITIVE"),
    (PropertyKey::IsBlackbox, "IS_BLACKBOX"),
    (PropertyKey::IsLocFixed, "IS_LOC_FIXED"),
    (PropertyKey::IsBelFixed, "IS_BEL_FIXED"),
    (PropertyKey::Direction, "DIRECTION"),
    (PropertyKey::IsConnected, "IS_CONNECTED"),
];

impl PropertyKey {
    /// Canonical upper-case spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        if let Self::Other(name) = self {
            return name;
        }
        WELL_KNOWN
            .iter()
            .find(|(key, _)| key == self)
            .map_or("", |(_, name)| name)
    }

    /// Creates a key from any spelling; matching is case-insensitive.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        WELL_KNOWN
            .iter()
            .find(|(_, known)| *known == upper)
            .map_or(Self::Other(upper), |(key, _)| key.clone())
    }

    /// Returns true for keys whose value identifies a single object, and so
    /// must never be copied from one object to another.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Name)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PropertyKey {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PropertyKey> for String {
    fn from(key: PropertyKey) -> Self {
        key.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// PropertyValue
// ---------------------------------------------------------------------------

/// Value of a property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// Free text; may be empty.
    Str(String),
}

impl PropertyValue {
    /// Returns true for the empty string. Booleans and integers are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }

    /// Truthiness as used by property filters.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Str(s) => {
                !s.is_empty() && !s.eq_ignore_ascii_case("false") && s != "0"
            }
        }
    }

    /// Integer view, parsing strings when they hold a number.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Returns true if both values carry the same variant.
    #[must_use]
    pub const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Bool(_), Self::Bool(_)) | (Self::Int(_), Self::Int(_)) | (Self::Str(_), Self::Str(_))
        )
    }

    /// Short label for the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", u8::from(*b)),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

// ---------------------------------------------------------------------------
// PropertyMap
// ---------------------------------------------------------------------------

/// Ordered property storage for one object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap {
    entries: IndexMap<PropertyKey, PropertyValue>,
}

impl PropertyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `key`, or `None` when unset.
    #[must_use]
    pub fn get(&self, key: &PropertyKey) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    /// Sets `key`, returning the previous value.
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) -> Option<PropertyValue> {
        self.entries.insert(key, value)
    }

    /// Unsets `key`, returning the previous value.
    pub fn unset(&mut self, key: &PropertyKey) -> Option<PropertyValue> {
        self.entries.shift_remove(key)
    }

    /// Returns true if `key` holds a value, even an empty one.
    #[must_use]
    pub fn is_set(&self, key: &PropertyKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.entries.keys()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &PropertyValue)> {
        self.entries.iter()
    }

    /// Number of set properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<PropertyKey>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
