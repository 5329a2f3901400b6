//! [`DesignDb`] for [`MemoryDesign`].

use indexmap::IndexMap;
use netedit_common::{
    Endpoint, LibCell, NetMember, ObjectClass, ObjectRef, PinDirection, PinRef, Placement, PlacementStatus,
    PropertyKey, PropertyMap, PropertyValue, QueryOptions, Role,
};
use tracing::{debug, warn};

use super::{CellRecord, MemoryDesign, NetRecord, PinRecord, GROUND_NET, POWER_NET};
use crate::{DbError, DesignDb};

impl MemoryDesign {
    fn free_bel(&mut self, placement: &Placement) {
        if let Some(bel) = self.bels.get_mut(&placement.bel) {
            bel.cell = None;
        }
    }

    /// Binds `cell` to a specific BEL after checking type and occupancy.
    fn bind(&mut self, cell: &str, bel_name: &str) -> Result<Placement, DbError> {
        let record = self.cell(cell)?;
        let bel = self.bel(bel_name)?;
        let template = match (&record.ref_name, record.black_box) {
            (Some(ref_name), false) => self.library.get(ref_name),
            _ => None,
        };
        let Some(template) = template else {
            return Err(DbError::rejected(cell, bel_name, "cell has no library template"));
        };
        if !template.accepts_bel_type(&bel.bel_type) {
            return Err(DbError::rejected(
                cell,
                bel_name,
                format!("{} cannot be hosted by a {} BEL", template.name, bel.bel_type),
            ));
        }
        if let Some(occupant) = bel.cell.as_deref().filter(|o| *o != cell) {
            return Err(DbError::rejected(cell, bel_name, format!("occupied by '{occupant}'")));
        }
        if let Some(current) = &record.placement {
            if record.status().is_locked() && current.bel != bel_name {
                return Err(DbError::rejected(
                    cell,
                    bel_name,
                    format!("placement is {} at '{}'", record.status(), current.bel),
                ));
            }
        }

        let placement = Placement::new(bel_name, bel.site.as_str());
        let previous = self.cell_mut(cell)?.placement.replace(placement.clone());
        if let Some(previous) = previous.filter(|p| p.bel != bel_name) {
            self.free_bel(&previous);
        }
        if let Some(bel) = self.bels.get_mut(bel_name) {
            bel.cell = Some(cell.to_string());
        }
        debug!("Placed '{}' on '{}'", cell, placement.bel);
        Ok(placement)
    }

    /// Attaches an endpoint to a net without any checks.
    fn attach(&mut self, net: &str, endpoint: &Endpoint) {
        if let Some(record) = self.nets.get_mut(net) {
            record.members.push(endpoint.clone());
        }
        self.set_endpoint_net(endpoint, Some(net.to_string()));
    }

    /// Removes an endpoint from whatever net it sits on.
    fn detach(&mut self, endpoint: &Endpoint) {
        let net = match self.endpoint_state(endpoint) {
            Ok((Some(net), _)) => net.to_string(),
            _ => return,
        };
        if let Some(record) = self.nets.get_mut(&net) {
            record.members.retain(|m| m != endpoint);
        }
        self.set_endpoint_net(endpoint, None);
    }
}

impl DesignDb for MemoryDesign {
    fn create_cell(&mut self, template: Option<&str>, name: &str, black_box: bool) -> Result<(), DbError> {
        if self.cells.contains_key(name) {
            return Err(DbError::duplicate(ObjectClass::Cell, name));
        }
        let record = if black_box {
            CellRecord {
                ref_name: template.map(str::to_string),
                black_box: true,
                primitive: false,
                pins: IndexMap::new(),
                properties: PropertyMap::new(),
                placement: None,
            }
        } else {
            let lib = template
                .and_then(|t| self.library.get(t))
                .ok_or_else(|| DbError::UnknownTemplate(template.unwrap_or_default().to_string()))?;
            CellRecord {
                ref_name: Some(lib.name.clone()),
                black_box: false,
                primitive: lib.primitive,
                pins: lib
                    .pins
                    .iter()
                    .map(|p| {
                        (
                            p.name.clone(),
                            PinRecord {
                                direction: p.direction,
                                net: None,
                            },
                        )
                    })
                    .collect(),
                properties: PropertyMap::new(),
                placement: None,
            }
        };
        debug!("Created cell '{}' ({:?}, black box: {})", name, template, black_box);
        self.cells.insert(name.to_string(), record);
        Ok(())
    }

    fn remove_cell(&mut self, name: &str, quiet: bool) -> Result<(), DbError> {
        let Some(record) = self.cells.get(name) else {
            if quiet {
                return Ok(());
            }
            return Err(DbError::not_found(ObjectClass::Cell, name));
        };
        let pins: Vec<Endpoint> = record
            .pins
            .iter()
            .filter(|(_, p)| p.net.is_some())
            .map(|(pin, _)| Endpoint::pin(name, pin.as_str()))
            .collect();
        let placement = record.placement.clone();
        for pin in &pins {
            self.detach(pin);
        }
        if let Some(placement) = placement {
            self.free_bel(&placement);
        }
        self.cells.shift_remove(name);
        debug!("Removed cell '{}'", name);
        Ok(())
    }

    fn rename_cell(&mut self, name: &str, new_name: &str) -> Result<(), DbError> {
        if self.cells.contains_key(new_name) {
            return Err(DbError::duplicate(ObjectClass::Cell, new_name));
        }
        let (index, _, record) = self
            .cells
            .shift_remove_full(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Cell, name))?;

        for net in record.pins.values().filter_map(|p| p.net.as_deref()) {
            if let Some(net) = self.nets.get_mut(net) {
                for member in &mut net.members {
                    if let Endpoint::Pin(pin) = member {
                        if pin.cell == name {
                            pin.cell = new_name.to_string();
                        }
                    }
                }
            }
        }
        if let Some(bel) = record.placement.as_ref().and_then(|p| self.bels.get_mut(&p.bel)) {
            bel.cell = Some(new_name.to_string());
        }

        let (last, _) = self.cells.insert_full(new_name.to_string(), record);
        self.cells.move_index(last, index);
        debug!("Renamed cell '{}' to '{}'", name, new_name);
        Ok(())
    }

    fn query_cells(&self, query: &QueryOptions) -> Result<Vec<String>, DbError> {
        self.select_cells(query)
    }

    fn get_property(&self, object: &ObjectRef, key: &PropertyKey) -> Result<Option<PropertyValue>, DbError> {
        self.read_property(object, key)
    }

    fn set_property(
        &mut self,
        object: &ObjectRef,
        key: &PropertyKey,
        value: PropertyValue,
        quiet: bool,
    ) -> Result<(), DbError> {
        match self.write_property(object, key, value) {
            Ok(()) => {
                debug!("Set {} on {}", key, object);
                Ok(())
            }
            Err(err) if quiet => {
                warn!("Ignoring property write: {}", err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn list_properties(&self, object: &ObjectRef) -> Result<Vec<PropertyKey>, DbError> {
        self.property_keys(object)
    }

    fn get_pins(
        &self,
        cell: &str,
        direction: Option<PinDirection>,
        connected: Option<bool>,
    ) -> Result<Vec<PinRef>, DbError> {
        Ok(self
            .cell(cell)?
            .pins
            .iter()
            .filter(|(_, p)| direction.is_none_or(|d| p.direction == d))
            .filter(|(_, p)| connected.is_none_or(|c| p.net.is_some() == c))
            .map(|(pin, _)| PinRef::new(cell, pin.as_str()))
            .collect())
    }

    fn pin_net(&self, pin: &PinRef) -> Result<Option<String>, DbError> {
        Ok(self.pin(pin)?.net.clone())
    }

    fn net_members(&self, net: &str) -> Result<Vec<NetMember>, DbError> {
        self.net(net)?
            .members
            .iter()
            .map(|endpoint| {
                let (_, role) = self.endpoint_state(endpoint)?;
                Ok(NetMember {
                    endpoint: endpoint.clone(),
                    role,
                })
            })
            .collect()
    }

    fn connect(&mut self, net: &str, endpoint: &Endpoint) -> Result<(), DbError> {
        let record = self.net(net)?;
        let (current, role) = self.endpoint_state(endpoint)?;
        if let Some(current) = current {
            return Err(DbError::AlreadyConnected {
                endpoint: endpoint.to_string(),
                net: current.to_string(),
            });
        }
        if role == Role::Driver {
            let driver = record
                .members
                .iter()
                .find(|m| matches!(self.endpoint_state(m), Ok((_, Role::Driver))));
            if let Some(driver) = driver {
                return Err(DbError::MultipleDrivers {
                    net: net.to_string(),
                    driver: driver.to_string(),
                    endpoint: endpoint.to_string(),
                });
            }
        }
        self.attach(net, endpoint);
        debug!("Connected '{}' to net '{}'", endpoint, net);
        Ok(())
    }

    fn disconnect(&mut self, net: &str, endpoints: &[Endpoint]) -> Result<(), DbError> {
        let record = self.net(net)?;
        if let Some(stray) = endpoints.iter().find(|e| !record.members.contains(e)) {
            return Err(DbError::NotConnected {
                endpoint: stray.to_string(),
                net: net.to_string(),
            });
        }
        for endpoint in endpoints {
            self.detach(endpoint);
        }
        debug!("Disconnected {} endpoint(s) from net '{}'", endpoints.len(), net);
        Ok(())
    }

    fn create_net(&mut self, name: &str) -> Result<(), DbError> {
        if self.nets.contains_key(name) {
            return Err(DbError::duplicate(ObjectClass::Net, name));
        }
        self.nets.insert(name.to_string(), NetRecord::default());
        debug!("Created net '{}'", name);
        Ok(())
    }

    fn remove_net(&mut self, name: &str) -> Result<(), DbError> {
        let record = self
            .nets
            .shift_remove(name)
            .ok_or_else(|| DbError::not_found(ObjectClass::Net, name))?;
        for endpoint in &record.members {
            self.set_endpoint_net(endpoint, None);
        }
        debug!("Removed net '{}'", name);
        Ok(())
    }

    fn query_nets(&self, query: &QueryOptions) -> Result<Vec<String>, DbError> {
        self.select_nets(query)
    }

    fn place_cell(&mut self, cell: &str, location: &ObjectRef) -> Result<Placement, DbError> {
        self.cell(cell)?;
        match self.canonical(location)? {
            ObjectRef::Bel(bel) => self.bind(cell, &bel),
            ObjectRef::Site(site) => {
                let candidates = self.site(&site)?.bels.clone();
                let mut last_reason = None;
                for bel in &candidates {
                    match self.bind(cell, bel) {
                        Ok(placement) => return Ok(placement),
                        Err(err) => last_reason = Some(err),
                    }
                }
                Err(match last_reason {
                    Some(DbError::PlacementRejected { reason, .. }) => DbError::rejected(cell, site, reason),
                    Some(err) => err,
                    None => DbError::rejected(cell, site, "site has no BELs"),
                })
            }
            other => Err(DbError::WrongClass {
                expected: "BEL or site",
                found: other.claimed_class(),
                name: other.name(),
            }),
        }
    }

    fn unplace_cell(&mut self, cell: &str) -> Result<Option<Placement>, DbError> {
        let record = self.cell_mut(cell)?;
        let previous = record.placement.take();
        record.properties.unset(&PropertyKey::IsLocFixed);
        record.properties.unset(&PropertyKey::IsBelFixed);
        if let Some(previous) = &previous {
            self.free_bel(previous);
            debug!("Unplaced '{}' from '{}'", cell, previous.bel);
        }
        Ok(previous)
    }

    fn cell_placement(&self, cell: &str) -> Result<Option<Placement>, DbError> {
        Ok(self.cell(cell)?.placement.clone())
    }

    fn placement_status(&self, cell: &str) -> Result<PlacementStatus, DbError> {
        Ok(self.cell(cell)?.status())
    }

    fn bels_of_site(&self, site: &str) -> Result<Vec<String>, DbError> {
        Ok(self.site(site)?.bels.clone())
    }

    fn get_class(&self, object: &ObjectRef) -> Result<ObjectClass, DbError> {
        self.resolve_class(object)
    }

    fn lib_cell(&self, name: &str) -> Option<&LibCell> {
        self.library.get(name)
    }

    fn tie_unused_pins(&mut self, cells: &[String]) -> Result<usize, DbError> {
        let mut ties = Vec::new();
        for cell in cells {
            let record = self.cell(cell)?;
            let template = record
                .ref_name
                .as_deref()
                .filter(|_| !record.black_box)
                .and_then(|r| self.library.get(r));
            for (pin, state) in &record.pins {
                if state.direction != PinDirection::In || state.net.is_some() {
                    continue;
                }
                let high = template.and_then(|t| t.pin(pin)).is_some_and(|p| p.tie_high);
                let net = if high { POWER_NET } else { GROUND_NET };
                ties.push((net, Endpoint::pin(cell.as_str(), pin.as_str())));
            }
        }
        for (net, endpoint) in &ties {
            if !self.nets.contains_key(*net) {
                self.create_net(net)?;
            }
            self.attach(net, endpoint);
            debug!("Tied '{}' to '{}'", endpoint, net);
        }
        Ok(ties.len())
    }
}
