//! Library cell templates.
//!
//! Templates are read-only reference data. The core only asks them which pins
//! an instance will have and which BEL types may host it.

use serde::{Deserialize, Serialize};

use crate::{PinDirection, PropertyKey, PropertyMap, PropertyValue};

/// A pin declared by a library template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibPin {
    /// Local pin name.
    pub name: String,
    /// Pin direction.
    pub direction: PinDirection,
    /// Unused instances of this pin are tied to logic one instead of zero.
    #[serde(default)]
    pub tie_high: bool,
}

/// A library cell template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibCell {
    /// Template name, the `REF_NAME` of its instances.
    pub name: String,
    /// Pins in declaration order.
    pub pins: Vec<LibPin>,
    /// BEL types that can host an instance.
    #[serde(default)]
    pub bel_types: Vec<String>,
    /// Leaf primitive (true) or hierarchical module (false).
    #[serde(default = "default_primitive")]
    pub primitive: bool,
    /// Configurable properties and their defaults.
    #[serde(default)]
    pub properties: PropertyMap,
}

const fn default_primitive() -> bool {
    true
}

impl LibCell {
    /// Creates a primitive template with no pins.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pins: Vec::new(),
            bel_types: Vec::new(),
            primitive: true,
            properties: PropertyMap::new(),
        }
    }

    /// Adds an input pin.
    #[must_use]
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.pins.push(LibPin {
            name: name.into(),
            direction: PinDirection::In,
            tie_high: false,
        });
        self
    }

    /// Adds an input pin tied high when unused.
    #[must_use]
    pub fn input_tie_high(mut self, name: impl Into<String>) -> Self {
        self.pins.push(LibPin {
            name: name.into(),
            direction: PinDirection::In,
            tie_high: true,
        });
        self
    }

    /// Adds an output pin.
    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.pins.push(LibPin {
            name: name.into(),
            direction: PinDirection::Out,
            tie_high: false,
        });
        self
    }

    /// Allows placement on BELs of `bel_type`.
    #[must_use]
    pub fn placeable_on(mut self, bel_type: impl Into<String>) -> Self {
        self.bel_types.push(bel_type.into());
        self
    }

    /// Declares a configurable property with its default.
    #[must_use]
    pub fn property(mut self, key: impl Into<PropertyKey>, default: impl Into<PropertyValue>) -> Self {
        self.properties.set(key.into(), default.into());
        self
    }

    /// Marks the template as a hierarchical module rather than a primitive.
    #[must_use]
    pub fn hierarchical(mut self) -> Self {
        self.primitive = false;
        self
    }

    /// Looks up a pin by name.
    #[must_use]
    pub fn pin(&self, name: &str) -> Option<&LibPin> {
        self.pins.iter().find(|p| p.name == name)
    }

    /// Pins of the given direction, in declaration order.
    pub fn pins_with(&self, direction: PinDirection) -> impl Iterator<Item = &LibPin> {
        self.pins.iter().filter(move |p| p.direction == direction)
    }

    /// Returns true if a BEL of `bel_type` can host an instance.
    #[must_use]
    pub fn accepts_bel_type(&self, bel_type: &str) -> bool {
        self.bel_types.iter().any(|t| t == bel_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_pin_order() {
        let lut = LibCell::new("LUT2").input("I0").input("I1").output("O").placeable_on("LUT6");
        let inputs: Vec<_> = lut.pins_with(PinDirection::In).map(|p| p.name.as_str()).collect();
        assert_eq!(inputs, ["I0", "I1"]);
        assert!(lut.accepts_bel_type("LUT6"));
        assert!(!lut.accepts_bel_type("FF"));
        assert!(lut.primitive);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"name":"BUF","pins":[{"name":"I","direction":"In"},{"name":"O","direction":"Out"}]}"#;
        let cell: LibCell = serde_json::from_str(json).unwrap();
        assert!(cell.primitive);
        assert!(cell.bel_types.is_empty());
        assert_eq!(cell.pin("O").map(|p| p.direction), Some(PinDirection::Out));
    }
}
