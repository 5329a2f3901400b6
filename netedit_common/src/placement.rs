//! Physical placement state of a cell.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CommonError;

/// Placement status of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementStatus {
    /// Not bound to any BEL.
    #[default]
    Unplaced,
    /// Bound to a BEL; free to move.
    Placed,
    /// Bound to a BEL with its site locked; the BEL within the site may change.
    Assigned,
    /// Bound to a BEL that is locked.
    Fixed,
}

impl PlacementStatus {
    /// Returns true for every status that binds a BEL.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        !matches!(self, Self::Unplaced)
    }

    /// Returns true if the placer may not move the cell.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(self, Self::Assigned | Self::Fixed)
    }

    /// Upper-case label used as the `STATUS` property value.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unplaced => "UNPLACED",
            Self::Placed => "PLACED",
            Self::Assigned => "ASSIGNED",
            Self::Fixed => "FIXED",
        }
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlacementStatus {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UNPLACED" => Ok(Self::Unplaced),
            "PLACED" => Ok(Self::Placed),
            "ASSIGNED" => Ok(Self::Assigned),
            "FIXED" => Ok(Self::Fixed),
            _ => Err(CommonError::UnknownStatus(s.to_string())),
        }
    }
}

/// A cell's binding to the fabric. The BEL and its site are bound and cleared together.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Full BEL name, `<site>/<bel>`.
    pub bel: String,
    /// Site containing the BEL.
    pub site: String,
}

impl Placement {
    /// Creates a placement record.
    pub fn new(bel: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            bel: bel.into(),
            site: site.into(),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bel)
    }
}
