//! Property reads and writes.
//!
//! Identity, connectivity and placement state are computed from the records
//! and cannot be written. Cells also report the defaults their template
//! declares until a value is set.

use netedit_common::{ObjectRef, PropertyKey, PropertyMap, PropertyValue};

use super::{CellRecord, MemoryDesign};
use crate::DbError;

/// Keys whose values are derived from the netlist or fabric state.
fn is_read_only(key: &PropertyKey) -> bool {
    matches!(
        key,
        PropertyKey::Name
            | PropertyKey::RefName
            | PropertyKey::Status
            | PropertyKey::IsPrimitive
            | PropertyKey::IsBlackbox
            | PropertyKey::Bel
            | PropertyKey::Site
            | PropertyKey::Loc
            | PropertyKey::Type
            | PropertyKey::IsUsed
            | PropertyKey::Direction
            | PropertyKey::IsConnected
            | PropertyKey::Tile
    )
}

fn incompatible(object: &ObjectRef, key: &PropertyKey, reason: impl Into<String>) -> DbError {
    DbError::IncompatibleProperty {
        object: object.to_string(),
        key: key.clone(),
        reason: reason.into(),
    }
}

fn push_unique(keys: &mut Vec<PropertyKey>, key: &PropertyKey) {
    if !keys.contains(key) {
        keys.push(key.clone());
    }
}

impl MemoryDesign {
    fn lib_default(&self, cell: &CellRecord, key: &PropertyKey) -> Option<PropertyValue> {
        if cell.black_box {
            return None;
        }
        let template = self.library.get(cell.ref_name.as_deref()?)?;
        template.properties.get(key).cloned()
    }

    pub(super) fn read_property(&self, object: &ObjectRef, key: &PropertyKey) -> Result<Option<PropertyValue>, DbError> {
        let object = self.canonical(object)?;
        let value: Option<PropertyValue> = match &object {
            ObjectRef::Design => match key {
                PropertyKey::Name => Some(self.name.as_str().into()),
                _ => self.properties.get(key).cloned(),
            },
            ObjectRef::Cell(name) => self.cell_property(name, key)?,
            ObjectRef::Pin(pin) => {
                let record = self.pin(pin)?;
                match key {
                    PropertyKey::Name => Some(pin.display_with(self.separator).into()),
                    PropertyKey::Direction => Some(record.direction.to_string().into()),
                    PropertyKey::IsConnected => Some(record.net.is_some().into()),
                    _ => None,
                }
            }
            ObjectRef::Port(name) => {
                let record = self.port(name)?;
                match key {
                    PropertyKey::Name => Some(name.as_str().into()),
                    PropertyKey::Direction => Some(record.direction.to_string().into()),
                    PropertyKey::IsConnected => Some(record.net.is_some().into()),
                    _ => record.properties.get(key).cloned(),
                }
            }
            ObjectRef::Net(name) => {
                let record = self.net(name)?;
                match key {
                    PropertyKey::Name => Some(name.as_str().into()),
                    _ => record.properties.get(key).cloned(),
                }
            }
            ObjectRef::Bel(name) => {
                let record = self.bel(name)?;
                match key {
                    PropertyKey::Name => Some(name.as_str().into()),
                    PropertyKey::Type => Some(record.bel_type.as_str().into()),
                    PropertyKey::IsUsed => Some(record.cell.is_some().into()),
                    PropertyKey::Site => Some(record.site.as_str().into()),
                    PropertyKey::Tile => self.site(&record.site)?.tile.as_deref().map(Into::into),
                    _ => None,
                }
            }
            ObjectRef::Site(name) => {
                let record = self.site(name)?;
                match key {
                    PropertyKey::Name => Some(name.as_str().into()),
                    PropertyKey::Type => Some(record.site_type.as_str().into()),
                    PropertyKey::IsUsed => Some(
                        record
                            .bels
                            .iter()
                            .any(|b| self.bels.get(b).is_some_and(|r| r.cell.is_some()))
                            .into(),
                    ),
                    PropertyKey::Tile => record.tile.as_deref().map(Into::into),
                    _ => None,
                }
            }
            ObjectRef::Tile(name) => {
                self.tile(name)?;
                match key {
                    PropertyKey::Name => Some(name.as_str().into()),
                    _ => None,
                }
            }
        };
        Ok(value)
    }

    fn cell_property(&self, name: &str, key: &PropertyKey) -> Result<Option<PropertyValue>, DbError> {
        let cell = self.cell(name)?;
        let placement = cell.placement.as_ref();
        Ok(match key {
            PropertyKey::Name => Some(name.into()),
            PropertyKey::RefName => cell.ref_name.as_deref().map(Into::into),
            PropertyKey::Status => Some(cell.status().label().into()),
            PropertyKey::IsPrimitive => Some(cell.primitive.into()),
            PropertyKey::IsBlackbox => Some(cell.black_box.into()),
            PropertyKey::IsLocFixed | PropertyKey::IsBelFixed => Some(cell.flag(key).into()),
            PropertyKey::Bel => placement.map(|p| p.bel.as_str().into()),
            PropertyKey::Site | PropertyKey::Loc => placement.map(|p| p.site.as_str().into()),
            PropertyKey::Tile => placement
                .and_then(|p| self.sites.get(&p.site))
                .and_then(|s| s.tile.as_deref())
                .map(Into::into),
            PropertyKey::Type | PropertyKey::IsUsed | PropertyKey::Direction | PropertyKey::IsConnected => None,
            PropertyKey::Other(_) => cell
                .properties
                .get(key)
                .cloned()
                .or_else(|| self.lib_default(cell, key)),
        })
    }

    pub(super) fn property_keys(&self, object: &ObjectRef) -> Result<Vec<PropertyKey>, DbError> {
        let object = self.canonical(object)?;
        let mut keys = vec![PropertyKey::Name];
        let stored: Option<&PropertyMap> = match &object {
            ObjectRef::Design => Some(&self.properties),
            ObjectRef::Cell(name) => {
                let cell = self.cell(name)?;
                if cell.ref_name.is_some() {
                    keys.push(PropertyKey::RefName);
                }
                keys.extend([
                    PropertyKey::Status,
                    PropertyKey::IsPrimitive,
                    PropertyKey::IsBlackbox,
                    PropertyKey::IsLocFixed,
                    PropertyKey::IsBelFixed,
                ]);
                if let Some(placement) = &cell.placement {
                    keys.extend([PropertyKey::Bel, PropertyKey::Site, PropertyKey::Loc]);
                    if self.sites.get(&placement.site).is_some_and(|s| s.tile.is_some()) {
                        keys.push(PropertyKey::Tile);
                    }
                }
                if !cell.black_box {
                    if let Some(template) = cell.ref_name.as_deref().and_then(|r| self.library.get(r)) {
                        for key in template.properties.keys() {
                            push_unique(&mut keys, key);
                        }
                    }
                }
                Some(&cell.properties)
            }
            ObjectRef::Pin(pin) => {
                self.pin(pin)?;
                keys.extend([PropertyKey::Direction, PropertyKey::IsConnected]);
                None
            }
            ObjectRef::Port(name) => {
                keys.extend([PropertyKey::Direction, PropertyKey::IsConnected]);
                Some(&self.port(name)?.properties)
            }
            ObjectRef::Net(name) => Some(&self.net(name)?.properties),
            ObjectRef::Bel(name) => {
                keys.extend([PropertyKey::Type, PropertyKey::IsUsed, PropertyKey::Site]);
                if self.site(&self.bel(name)?.site)?.tile.is_some() {
                    keys.push(PropertyKey::Tile);
                }
                None
            }
            ObjectRef::Site(name) => {
                keys.extend([PropertyKey::Type, PropertyKey::IsUsed]);
                if self.site(name)?.tile.is_some() {
                    keys.push(PropertyKey::Tile);
                }
                None
            }
            ObjectRef::Tile(name) => {
                self.tile(name)?;
                None
            }
        };
        for key in stored.into_iter().flat_map(PropertyMap::keys) {
            push_unique(&mut keys, key);
        }
        Ok(keys)
    }

    pub(super) fn write_property(
        &mut self,
        object: &ObjectRef,
        key: &PropertyKey,
        value: PropertyValue,
    ) -> Result<(), DbError> {
        let object = self.canonical(object)?;
        if is_read_only(key) {
            return Err(DbError::ReadOnlyProperty {
                object: object.to_string(),
                key: key.clone(),
            });
        }
        let fixed_flag = matches!(key, PropertyKey::IsLocFixed | PropertyKey::IsBelFixed);
        match &object {
            ObjectRef::Cell(name) => {
                if fixed_flag {
                    let PropertyValue::Bool(on) = value else {
                        return Err(incompatible(&object, key, format!("expects bool, got {}", value.kind_name())));
                    };
                    let cell = self.cell_mut(name)?;
                    if on && cell.placement.is_none() {
                        return Err(incompatible(&object, key, "cell is not placed"));
                    }
                    cell.properties.set(key.clone(), PropertyValue::Bool(on));
                    return Ok(());
                }
                if let Some(default) = self.lib_default(self.cell(name)?, key) {
                    if !default.same_kind(&value) {
                        return Err(incompatible(
                            &object,
                            key,
                            format!("expects {} value, got {}", default.kind_name(), value.kind_name()),
                        ));
                    }
                }
                self.cell_mut(name)?.properties.set(key.clone(), value);
            }
            _ if fixed_flag => {
                return Err(incompatible(&object, key, "only cells can be fixed"));
            }
            ObjectRef::Design => {
                self.properties.set(key.clone(), value);
            }
            ObjectRef::Net(name) => {
                self.nets
                    .get_mut(name)
                    .ok_or_else(|| DbError::not_found(object.claimed_class(), name.as_str()))?
                    .properties
                    .set(key.clone(), value);
            }
            ObjectRef::Port(name) => {
                self.ports
                    .get_mut(name)
                    .ok_or_else(|| DbError::not_found(object.claimed_class(), name.as_str()))?
                    .properties
                    .set(key.clone(), value);
            }
            ObjectRef::Pin(_) => return Err(incompatible(&object, key, "pins carry no user properties")),
            ObjectRef::Bel(_) | ObjectRef::Site(_) | ObjectRef::Tile(_) => {
                return Err(incompatible(&object, key, "fabric objects cannot be annotated"));
            }
        }
        Ok(())
    }
}
