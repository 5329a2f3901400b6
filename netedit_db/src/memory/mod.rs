//! In-memory design database.
//!
//! [`MemoryDesign`] keeps the whole netlist and a small fabric model (tiles,
//! sites, BELs) in insertion-ordered maps. It is the reference implementation
//! of [`crate::DesignDb`] and serializes to JSON as a whole.

mod db;
mod properties;
mod select;

use contracts::*;
use indexmap::IndexMap;
use netedit_common::{
    Endpoint, LibCell, ObjectClass, ObjectRef, PinDirection, PinRef, Placement, PlacementStatus, PortDirection,
    PropertyKey, PropertyMap, PropertyValue, Role,
};
use serde::{Deserialize, Serialize};

use crate::DbError;

/// Net that unused inputs are tied to by default.
pub const GROUND_NET: &str = "<const0>";

/// Net that unused `tie_high` inputs are tied to.
pub const POWER_NET: &str = "<const1>";

const fn default_separator() -> char {
    '/'
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PinRecord {
    direction: PinDirection,
    #[serde(default)]
    net: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct CellRecord {
    #[serde(default)]
    ref_name: Option<String>,
    #[serde(default)]
    black_box: bool,
    #[serde(default)]
    primitive: bool,
    #[serde(default)]
    pins: IndexMap<String, PinRecord>,
    #[serde(default)]
    properties: PropertyMap,
    #[serde(default)]
    placement: Option<Placement>,
}

impl CellRecord {
    fn flag(&self, key: &PropertyKey) -> bool {
        self.properties.get(key).is_some_and(PropertyValue::is_truthy)
    }

    fn status(&self) -> PlacementStatus {
        match self.placement {
            None => PlacementStatus::Unplaced,
            Some(_) if self.flag(&PropertyKey::IsBelFixed) => PlacementStatus::Fixed,
            Some(_) if self.flag(&PropertyKey::IsLocFixed) => PlacementStatus::Assigned,
            Some(_) => PlacementStatus::Placed,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct NetRecord {
    #[serde(default)]
    members: Vec<Endpoint>,
    #[serde(default)]
    properties: PropertyMap,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PortRecord {
    direction: PortDirection,
    #[serde(default)]
    net: Option<String>,
    #[serde(default)]
    properties: PropertyMap,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TileRecord {
    #[serde(default)]
    sites: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SiteRecord {
    site_type: String,
    #[serde(default)]
    tile: Option<String>,
    #[serde(default)]
    bels: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct BelRecord {
    site: String,
    bel_type: String,
    #[serde(default)]
    cell: Option<String>,
}

/// A design held entirely in memory.
///
/// Built programmatically with the `add_*` methods or loaded from JSON with
/// [`crate::io::load_design`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDesign {
    name: String,
    #[serde(default = "default_separator")]
    separator: char,
    #[serde(default)]
    library: IndexMap<String, LibCell>,
    #[serde(default)]
    cells: IndexMap<String, CellRecord>,
    #[serde(default)]
    nets: IndexMap<String, NetRecord>,
    #[serde(default)]
    ports: IndexMap<String, PortRecord>,
    #[serde(default)]
    tiles: IndexMap<String, TileRecord>,
    #[serde(default)]
    sites: IndexMap<String, SiteRecord>,
    #[serde(default)]
    bels: IndexMap<String, BelRecord>,
    #[serde(default)]
    properties: PropertyMap,
}

impl MemoryDesign {
    /// Creates an empty design.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            separator: default_separator(),
            library: IndexMap::new(),
            cells: IndexMap::new(),
            nets: IndexMap::new(),
            ports: IndexMap::new(),
            tiles: IndexMap::new(),
            sites: IndexMap::new(),
            bels: IndexMap::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Sets the hierarchy separator.
    #[must_use]
    pub const fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Design name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a library template, replacing any template of the same name.
    pub fn add_lib_cell(&mut self, cell: LibCell) {
        self.library.insert(cell.name.clone(), cell);
    }

    /// Adds a tile.
    ///
    /// # Errors
    ///
    /// [`DbError::DuplicateName`] if the tile exists.
    #[debug_requires(!name.is_empty())]
    pub fn add_tile(&mut self, name: &str) -> Result<(), DbError> {
        if self.tiles.contains_key(name) {
            return Err(DbError::duplicate(ObjectClass::Tile, name));
        }
        self.tiles.insert(name.to_string(), TileRecord::default());
        Ok(())
    }

    /// Adds a site, optionally inside an existing tile.
    ///
    /// # Errors
    ///
    /// [`DbError::DuplicateName`] if the site exists, [`DbError::NotFound`] if
    /// the tile does not.
    pub fn add_site(&mut self, name: &str, site_type: &str, tile: Option<&str>) -> Result<(), DbError> {
        if self.sites.contains_key(name) {
            return Err(DbError::duplicate(ObjectClass::Site, name));
        }
        if let Some(tile) = tile {
            self.tiles
                .get_mut(tile)
                .ok_or_else(|| DbError::not_found(ObjectClass::Tile, tile))?
                .sites
                .push(name.to_string());
        }
        self.sites.insert(
            name.to_string(),
            SiteRecord {
                site_type: site_type.to_string(),
                tile: tile.map(str::to_string),
                bels: Vec::new(),
            },
        );
        Ok(())
    }

    /// Adds a BEL to a site and returns its full `<site>/<bel>` name.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] if the site does not exist, [`DbError::DuplicateName`]
    /// if the BEL does.
    #[debug_ensures(ret.is_err() || ret.as_ref().is_ok_and(|full| full.starts_with(site)))]
    pub fn add_bel(&mut self, site: &str, bel: &str, bel_type: &str) -> Result<String, DbError> {
        let full = format!("{site}/{bel}");
        if self.bels.contains_key(&full) {
            return Err(DbError::duplicate(ObjectClass::Bel, full));
        }
        self.sites
            .get_mut(site)
            .ok_or_else(|| DbError::not_found(ObjectClass::Site, site))?
            .bels
            .push(full.clone());
        self.bels.insert(
            full.clone(),
            BelRecord {
                site: site.to_string(),
                bel_type: bel_type.to_string(),
                cell: None,
            },
        );
        Ok(full)
    }

    /// Adds a top-level port.
    ///
    /// # Errors
    ///
    /// [`DbError::DuplicateName`] if the port exists.
    pub fn add_port(&mut self, name: &str, direction: PortDirection) -> Result<(), DbError> {
        if self.ports.contains_key(name) {
            return Err(DbError::duplicate(ObjectClass::Port, name));
        }
        self.ports.insert(
            name.to_string(),
            PortRecord {
                direction,
                net: None,
                properties: PropertyMap::new(),
            },
        );
        Ok(())
    }

    /// Names of every cell, in creation order.
    pub fn cell_names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Names of every net, in creation order.
    pub fn net_names(&self) -> impl Iterator<Item = &str> {
        self.nets.keys().map(String::as_str)
    }

    // --- lookups -------------------------------------------------------------

    fn cell(&self, name: &str) -> Result<&CellRecord, DbError> {
        self.cells
            .get(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Cell, name))
    }

    fn cell_mut(&mut self, name: &str) -> Result<&mut CellRecord, DbError> {
        self.cells
            .get_mut(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Cell, name))
    }

    fn net(&self, name: &str) -> Result<&NetRecord, DbError> {
        self.nets
            .get(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Net, name))
    }

    fn pin(&self, pin: &PinRef) -> Result<&PinRecord, DbError> {
        self.cell(&pin.cell)?
            .pins
            .get(&pin.pin)
            .ok_or_else(|| DbError::not_found(ObjectClass::Pin, pin.to_string()))
    }

    fn port(&self, name: &str) -> Result<&PortRecord, DbError> {
        self.ports
            .get(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Port, name))
    }

    fn bel(&self, name: &str) -> Result<&BelRecord, DbError> {
        self.bels
            .get(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Bel, name))
    }

    fn site(&self, name: &str) -> Result<&SiteRecord, DbError> {
        self.sites
            .get(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Site, name))
    }

    fn tile(&self, name: &str) -> Result<&TileRecord, DbError> {
        self.tiles
            .get(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Tile, name))
    }

    /// The net an endpoint sits on and the role it plays there.
    fn endpoint_state(&self, endpoint: &Endpoint) -> Result<(Option<&str>, Role), DbError> {
        match endpoint {
            Endpoint::Pin(pin) => {
                let record = self.pin(pin)?;
                Ok((record.net.as_deref(), Role::of_pin(record.direction)))
            }
            Endpoint::Port(name) => {
                let record = self.port(name)?;
                Ok((record.net.as_deref(), Role::of_port(record.direction)))
            }
        }
    }

    /// Points an existing endpoint at `net`. Net membership is the caller's job.
    fn set_endpoint_net(&mut self, endpoint: &Endpoint, net: Option<String>) {
        match endpoint {
            Endpoint::Pin(pin) => {
                if let Some(record) = self
                    .cells
                    .get_mut(&pin.cell)
                    .and_then(|c| c.pins.get_mut(&pin.pin))
                {
                    record.net = net;
                }
            }
            Endpoint::Port(name) => {
                if let Some(record) = self.ports.get_mut(name) {
                    record.net = net;
                }
            }
        }
    }

    /// Resolves which class a name actually belongs to.
    ///
    /// Typed handles are checked against their own class. A bare cell handle
    /// that names no cell falls back to nets, ports, BELs, sites and tiles in
    /// that order, so unprefixed names from the command line resolve.
    fn resolve_class(&self, object: &ObjectRef) -> Result<ObjectClass, DbError> {
        let exists = match object {
            ObjectRef::Design => true,
            ObjectRef::Cell(name) => {
                if self.cells.contains_key(name) {
                    true
                } else if self.nets.contains_key(name) {
                    return Ok(ObjectClass::Net);
                } else if self.ports.contains_key(name) {
                    return Ok(ObjectClass::Port);
                } else if self.bels.contains_key(name) {
                    return Ok(ObjectClass::Bel);
                } else if self.sites.contains_key(name) {
                    return Ok(ObjectClass::Site);
                } else if self.tiles.contains_key(name) {
                    return Ok(ObjectClass::Tile);
                } else {
                    false
                }
            }
            ObjectRef::Pin(pin) => self.pin(pin).is_ok(),
            ObjectRef::Port(name) => self.ports.contains_key(name),
            ObjectRef::Net(name) => self.nets.contains_key(name),
            ObjectRef::Bel(name) => self.bels.contains_key(name),
            ObjectRef::Site(name) => self.sites.contains_key(name),
            ObjectRef::Tile(name) => self.tiles.contains_key(name),
        };
        if exists {
            Ok(object.claimed_class())
        } else {
            Err(DbError::not_found(object.claimed_class(), object.name()))
        }
    }

    /// The handle of the object `object` actually names.
    fn canonical(&self, object: &ObjectRef) -> Result<ObjectRef, DbError> {
        let class = self.resolve_class(object)?;
        if class == object.claimed_class() {
            return Ok(object.clone());
        }
        let name = object.name();
        Ok(match class {
            ObjectClass::Net => ObjectRef::Net(name),
            ObjectClass::Port => ObjectRef::Port(name),
            ObjectClass::Bel => ObjectRef::Bel(name),
            ObjectClass::Site => ObjectRef::Site(name),
            ObjectClass::Tile => ObjectRef::Tile(name),
            _ => object.clone(),
        })
    }
}
