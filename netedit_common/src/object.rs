//! Class-polymorphic object handles.
//!
//! The backing design database answers some questions for any kind of object
//! (its class, its properties, cells related to it). [`ObjectRef`] is the
//! handle used at those seams. Handles are plain names: they are re-resolved
//! against the database on every call and never cache database state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CommonError, PinRef};

/// The class of a design object, as reported by the backing database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectClass {
    /// The design itself.
    Design,
    /// A logical cell.
    Cell,
    /// A pin on a cell.
    Pin,
    /// A top-level port.
    Port,
    /// A net.
    Net,
    /// A basic element of logic, the finest placement target.
    Bel,
    /// A site, grouping BELs.
    Site,
    /// A tile, grouping sites.
    Tile,
}

impl ObjectClass {
    /// Returns true for the classes a cell may be placed on.
    #[must_use]
    pub const fn is_placement_target(&self) -> bool {
        matches!(self, Self::Bel | Self::Site)
    }

    /// Lower-case class keyword used in object reference strings.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Cell => "cell",
            Self::Pin => "pin",
            Self::Port => "port",
            Self::Net => "net",
            Self::Bel => "bel",
            Self::Site => "site",
            Self::Tile => "tile",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A by-name handle on any design object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectRef {
    /// The design as a whole.
    Design,
    /// A cell, by full hierarchical name.
    Cell(String),
    /// A pin on a cell.
    Pin(PinRef),
    /// A top-level port.
    Port(String),
    /// A net, by full hierarchical name.
    Net(String),
    /// A BEL, by `<site>/<bel>` name.
    Bel(String),
    /// A site.
    Site(String),
    /// A tile.
    Tile(String),
}

impl ObjectRef {
    /// Shorthand for a cell handle.
    pub fn cell(name: impl Into<String>) -> Self {
        Self::Cell(name.into())
    }

    /// Shorthand for a net handle.
    pub fn net(name: impl Into<String>) -> Self {
        Self::Net(name.into())
    }

    /// Shorthand for a BEL handle.
    pub fn bel(name: impl Into<String>) -> Self {
        Self::Bel(name.into())
    }

    /// Shorthand for a site handle.
    pub fn site(name: impl Into<String>) -> Self {
        Self::Site(name.into())
    }

    /// The class this handle claims to refer to.
    ///
    /// Whether the object exists is only known to the database.
    #[must_use]
    pub const fn claimed_class(&self) -> ObjectClass {
        match self {
            Self::Design => ObjectClass::Design,
            Self::Cell(_) => ObjectClass::Cell,
            Self::Pin(_) => ObjectClass::Pin,
            Self::Port(_) => ObjectClass::Port,
            Self::Net(_) => ObjectClass::Net,
            Self::Bel(_) => ObjectClass::Bel,
            Self::Site(_) => ObjectClass::Site,
            Self::Tile(_) => ObjectClass::Tile,
        }
    }

    /// The object's name. The design has an empty name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Design => String::new(),
            Self::Pin(pin) => pin.to_string(),
            Self::Cell(n) | Self::Port(n) | Self::Net(n) | Self::Bel(n) | Self::Site(n) | Self::Tile(n) => {
                n.clone()
            }
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Design => write!(f, "design"),
            other => write!(f, "{}:{}", other.claimed_class(), other.name()),
        }
    }
}

impl FromStr for ObjectRef {
    type Err = CommonError;

    /// Parses `<class>:<name>`. A string without a class prefix is a cell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "design" {
            return Ok(Self::Design);
        }
        let Some((class, name)) = s.split_once(':') else {
            if s.is_empty() {
                return Err(CommonError::invalid_object("empty object name"));
            }
            return Ok(Self::Cell(s.to_string()));
        };
        if name.is_empty() {
            return Err(CommonError::invalid_object(format!("'{s}' has an empty name")));
        }
        let name = name.to_string();
        match class.to_ascii_lowercase().as_str() {
            "cell" => Ok(Self::Cell(name)),
            "pin" => Ok(Self::Pin(name.parse()?)),
            "port" => Ok(Self::Port(name)),
            "net" => Ok(Self::Net(name)),
            "bel" => Ok(Self::Bel(name)),
            "site" => Ok(Self::Site(name)),
            "tile" => Ok(Self::Tile(name)),
            other => Err(CommonError::invalid_object(format!("unknown class '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for text in ["cell:top/u1", "net:n0", "bel:SLICE_X0Y0/AFF", "site:SLICE_X0Y0", "pin:u1/I0"] {
            let obj: ObjectRef = text.parse().unwrap();
            assert_eq!(obj.to_string(), text);
        }
    }

    #[test]
    fn unprefixed_names_are_cells() {
        assert_eq!("u7".parse::<ObjectRef>().unwrap(), ObjectRef::cell("u7"));
    }

    #[test]
    fn unknown_class_is_rejected() {
        assert!("wire:n0".parse::<ObjectRef>().is_err());
        assert!("net:".parse::<ObjectRef>().is_err());
    }

    #[test]
    fn only_bels_and_sites_are_placement_targets() {
        assert!(ObjectClass::Bel.is_placement_target());
        assert!(ObjectClass::Site.is_placement_target());
        assert!(!ObjectClass::Tile.is_placement_target());
        assert!(!ObjectClass::Cell.is_placement_target());
    }
}
