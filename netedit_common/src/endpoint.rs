//! Pins, ports and their membership on nets.
//!
//! A net joins [`Endpoint`]s. An endpoint is either a pin on a cell or a
//! top-level port. Each endpoint on a net plays a [`Role`]: the driver produces
//! the net's value and every other member is a sink.

use contracts::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CommonError, PinDirection, PortDirection};

/// Identity of a pin: the owning cell plus the pin's local name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinRef {
    /// Full hierarchical name of the owning cell.
    pub cell: String,
    /// Local pin name on the cell's template.
    pub pin: String,
}

impl PinRef {
    /// Creates a pin reference.
    #[requires(!pin.as_ref().is_empty())]
    pub fn new<C, P>(cell: C, pin: P) -> Self
    where
        C: Into<String>,
        P: AsRef<str> + Into<String>,
    {
        Self {
            cell: cell.into(),
            pin: pin.into(),
        }
    }

    /// Renders the pin with an explicit hierarchy separator.
    #[must_use]
    pub fn display_with(&self, separator: char) -> String {
        format!("{}{}{}", self.cell, separator, self.pin)
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cell, self.pin)
    }
}

impl FromStr for PinRef {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('/') {
            Some((cell, pin)) if !cell.is_empty() && !pin.is_empty() => Ok(Self::new(cell, pin)),
            _ => Err(CommonError::invalid_endpoint(format!(
                "expected '<cell>/<pin>', got '{s}'"
            ))),
        }
    }
}

/// Something that can sit on a net.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Endpoint {
    /// A pin on a cell.
    Pin(PinRef),
    /// A top-level design port.
    Port(String),
}

impl Endpoint {
    /// Shorthand for a cell pin endpoint.
    pub fn pin(cell: impl Into<String>, pin: impl AsRef<str> + Into<String>) -> Self {
        Self::Pin(PinRef::new(cell, pin))
    }

    /// Shorthand for a port endpoint.
    pub fn port(name: impl Into<String>) -> Self {
        Self::Port(name.into())
    }

    /// Returns the pin reference if this endpoint is a cell pin.
    #[must_use]
    pub const fn as_pin(&self) -> Option<&PinRef> {
        match self {
            Self::Pin(pin) => Some(pin),
            Self::Port(_) => None,
        }
    }

    /// Returns the owning cell name for pin endpoints.
    #[must_use]
    pub fn cell(&self) -> Option<&str> {
        self.as_pin().map(|p| p.cell.as_str())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(pin) => write!(f, "{pin}"),
            Self::Port(name) => write!(f, "port:{name}"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = CommonError;

    /// Parses `port:<name>` or `<cell>/<pin>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(port) = s.strip_prefix("port:") {
            if port.is_empty() {
                return Err(CommonError::invalid_endpoint("empty port name"));
            }
            return Ok(Self::Port(port.to_string()));
        }
        let pin = s.strip_prefix("pin:").unwrap_or(s);
        Ok(Self::Pin(pin.parse()?))
    }
}

impl From<PinRef> for Endpoint {
    fn from(pin: PinRef) -> Self {
        Self::Pin(pin)
    }
}

/// The part an endpoint plays on a net.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Produces the net's value. At most one per net.
    Driver,
    /// Consumes the net's value.
    Sink,
}

impl Role {
    /// Role of a cell pin with the given direction.
    #[must_use]
    pub const fn of_pin(direction: PinDirection) -> Self {
        match direction {
            PinDirection::Out => Self::Driver,
            PinDirection::In => Self::Sink,
        }
    }

    /// Role of a design port with the given direction.
    #[must_use]
    pub const fn of_port(direction: PortDirection) -> Self {
        if direction.drives_net() {
            Self::Driver
        } else {
            Self::Sink
        }
    }
}

/// One member of a net together with its role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetMember {
    /// The pin or port on the net.
    pub endpoint: Endpoint,
    /// Whether it drives or sinks the net.
    pub role: Role,
}

impl NetMember {
    /// Returns true if this member drives the net.
    #[must_use]
    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }

    /// Returns true if this member is a sink of the net.
    #[must_use]
    pub fn is_sink(&self) -> bool {
        self.role == Role::Sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pin_endpoint_uses_last_separator() {
        let ep: Endpoint = "top/u1/ff/D".parse().unwrap();
        assert_eq!(ep, Endpoint::pin("top/u1/ff", "D"));
    }

    #[test]
    fn parse_port_endpoint() {
        let ep: Endpoint = "port:clk".parse().unwrap();
        assert_eq!(ep, Endpoint::port("clk"));
        assert!("port:".parse::<Endpoint>().is_err());
    }

    #[test]
    fn bare_name_is_not_an_endpoint() {
        assert!("lonely".parse::<Endpoint>().is_err());
    }

    #[test]
    fn roles_follow_direction() {
        assert_eq!(Role::of_pin(PinDirection::Out), Role::Driver);
        assert_eq!(Role::of_pin(PinDirection::In), Role::Sink);
        assert_eq!(Role::of_port(PortDirection::Input), Role::Driver);
        assert_eq!(Role::of_port(PortDirection::Output), Role::Sink);
        assert_eq!(Role::of_port(PortDirection::InOut), Role::Sink);
    }
}
