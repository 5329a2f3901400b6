//! Placement: direct place/unplace and the legality probe.

use netedit_common::{ObjectRef, Placement, PlacementStatus, PropertyKey, PropertyValue, QueryOptions};
use netedit_db::DesignDb;
use tracing::{debug, error, info};

use crate::{EditError, Session};

/// A trial placement that is always undone.
///
/// Opening a probe lifts the cell off its current BEL. Dropping it removes any
/// trial placement and puts the cell back where it was, fixed flags included,
/// on every exit path.
pub struct PlacementProbe<'a, D: DesignDb> {
    db: &'a mut D,
    cell: String,
    prior: Option<Placement>,
    flags: Vec<(PropertyKey, PropertyValue)>,
    trial: Option<Placement>,
}

impl<'a, D: DesignDb> PlacementProbe<'a, D> {
    /// Opens a probe on `cell`.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures while lifting the cell.
    pub fn open(db: &'a mut D, cell: &str) -> Result<Self, EditError> {
        let object = ObjectRef::cell(cell);
        let mut flags = Vec::new();
        for key in [PropertyKey::IsLocFixed, PropertyKey::IsBelFixed] {
            if let Some(value) = db.get_property(&object, &key)?.filter(PropertyValue::is_truthy) {
                flags.push((key, value));
            }
        }
        let prior = db.unplace_cell(cell)?;
        Ok(Self {
            db,
            cell: cell.to_string(),
            prior,
            flags,
            trial: None,
        })
    }

    /// Attempts the trial placement. Rejections are reported as `false`.
    pub fn try_place(&mut self, location: &ObjectRef) -> bool {
        if let Some(trial) = self.trial.take() {
            self.release(&trial);
        }
        match self.db.place_cell(&self.cell, location) {
            Ok(placement) => {
                self.trial = Some(placement);
                true
            }
            Err(err) => {
                debug!("Trial placement of '{}' on {} rejected: {}", self.cell, location, err);
                false
            }
        }
    }

    fn release(&mut self, trial: &Placement) {
        if let Err(err) = self.db.unplace_cell(&self.cell) {
            error!("Failed to undo trial placement of '{}' on '{}': {}", self.cell, trial.bel, err);
        }
    }

    fn restore(&mut self) -> Result<(), EditError> {
        let Some(prior) = self.prior.take() else {
            return Ok(());
        };
        self.db.place_cell(&self.cell, &ObjectRef::bel(prior.bel.as_str()))?;
        let object = ObjectRef::cell(self.cell.as_str());
        for (key, value) in self.flags.drain(..) {
            self.db.set_property(&object, &key, value, false)?;
        }
        Ok(())
    }
}

impl<D: DesignDb> Drop for PlacementProbe<'_, D> {
    fn drop(&mut self) {
        if let Some(trial) = self.trial.take() {
            self.release(&trial);
        }
        if let Err(err) = self.restore() {
            error!("Failed to restore placement of '{}': {}", self.cell, err);
        }
    }
}

impl<D: DesignDb> Session<D> {
    /// Returns true if `cell` could be placed on `location`.
    ///
    /// The cell's placement and status are the same afterwards. Placement
    /// rejections are a `false` result, not an error.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidArgument`] if `cell` is not a cell or `location` is
    /// not a BEL or site.
    pub fn is_placement_legal(&mut self, cell: &str, location: &ObjectRef) -> Result<bool, EditError> {
        self.require_cell(cell)?;
        let location = self.location(location)?;
        let mut probe = PlacementProbe::open(&mut self.db, cell)?;
        let legal = probe.try_place(&location);
        drop(probe);
        debug!("Placement of '{}' on {} is {}", cell, location, if legal { "legal" } else { "illegal" });
        Ok(legal)
    }

    /// Places `cell` on a BEL, or on a free BEL of a site.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidArgument`] for wrong classes,
    /// [`EditError::LocationOccupied`] when the target is taken, and
    /// [`EditError::Backing`] when the store rejects the placement.
    pub fn place(&mut self, cell: &str, location: &ObjectRef) -> Result<Placement, EditError> {
        self.require_cell(cell)?;
        let location = self.location(location)?;
        match &location {
            ObjectRef::Bel(bel) => {
                if let Some(occupant) = self.occupant(bel)? {
                    if occupant != cell {
                        return Err(EditError::LocationOccupied {
                            location: bel.clone(),
                            occupant,
                        });
                    }
                }
            }
            ObjectRef::Site(site) => {
                let mut occupants = Vec::new();
                for bel in self.db.bels_of_site(site)? {
                    match self.occupant(&bel)? {
                        Some(occupant) if occupant != cell => occupants.push(occupant),
                        _ => {
                            occupants.clear();
                            break;
                        }
                    }
                }
                if let Some(occupant) = occupants.into_iter().next() {
                    return Err(EditError::LocationOccupied {
                        location: site.clone(),
                        occupant,
                    });
                }
            }
            _ => {}
        }
        let placement = self.db.place_cell(cell, &location)?;
        info!("Placed '{}' on '{}'", cell, placement.bel);
        Ok(placement)
    }

    /// Clears the placement of `cell` and returns the BEL it was on.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn unplace(&mut self, cell: &str) -> Result<Option<String>, EditError> {
        self.require_cell(cell)?;
        let previous = self.db.unplace_cell(cell)?.map(|p| p.bel);
        if let Some(bel) = &previous {
            info!("Unplaced '{}' from '{}'", cell, bel);
        }
        Ok(previous)
    }

    /// Returns true if the cell is bound to a BEL.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn is_placed(&self, cell: &str) -> Result<bool, EditError> {
        Ok(self.placement_status(cell)?.is_placed())
    }

    /// Placement status of the cell.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn placement_status(&self, cell: &str) -> Result<PlacementStatus, EditError> {
        self.require_cell(cell)?;
        Ok(self.db.placement_status(cell)?)
    }

    /// Returns true if the cell's template may be hosted by `location`,
    /// ignoring occupancy. For a site, any of its BELs will do.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidArgument`] for wrong classes.
    pub fn compatible_with(&self, cell: &str, location: &ObjectRef) -> Result<bool, EditError> {
        self.require_cell(cell)?;
        let location = self.location(location)?;
        let Some(template) = self.get_type(cell)? else {
            return Ok(false);
        };
        let Some(lib) = self.db.lib_cell(&template) else {
            return Ok(false);
        };
        let bels = match &location {
            ObjectRef::Site(site) => self.db.bels_of_site(site)?,
            other => vec![other.name()],
        };
        for bel in bels {
            let bel_type = self.db.get_property(&ObjectRef::bel(bel.as_str()), &PropertyKey::Type)?;
            if bel_type.is_some_and(|t| lib.accepts_bel_type(&t.to_string())) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The cell bound to a BEL, if any.
    fn occupant(&self, bel: &str) -> Result<Option<String>, EditError> {
        let object = ObjectRef::bel(bel);
        let used = self
            .db
            .get_property(&object, &PropertyKey::IsUsed)?
            .is_some_and(|v| v.is_truthy());
        if !used {
            return Ok(None);
        }
        let query = QueryOptions::new().of_object(object).quiet(true);
        let occupant = self.db.query_cells(&query)?.into_iter().next();
        Ok(Some(occupant.unwrap_or_else(|| bel.to_string())))
    }
}
