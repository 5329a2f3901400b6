//! Pin and port directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a pin on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PinDirection {
    /// The pin consumes a signal.
    In,
    /// The pin produces a signal.
    Out,
}

impl PinDirection {
    /// Returns true for input pins.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::In)
    }

    /// Returns true for output pins.
    #[must_use]
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Out)
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}

/// Direction of a top-level design port, seen from outside the design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortDirection {
    /// Enters the design; drives its net.
    Input,
    /// Leaves the design; a sink of its net.
    Output,
    /// Bidirectional; treated as a sink of its net.
    InOut,
}

impl PortDirection {
    /// Returns true if the port drives the net it is attached to.
    #[must_use]
    pub const fn drives_net(&self) -> bool {
        matches!(self, Self::Input)
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "IN"),
            Self::Output => write!(f, "OUT"),
            Self::InOut => write!(f, "INOUT"),
        }
    }
}
