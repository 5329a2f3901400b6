//! Creating, removing, renaming and duplicating cells.

use netedit_common::{ObjectRef, PropertyKey, PropertyValue, QueryOptions};
use netedit_db::DesignDb;
use tracing::{debug, info, warn};

use crate::{EditError, Session};

/// What [`Session::duplicate`] copied onto the new cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Name of the new cell.
    pub cell: String,
    /// Properties now equal on both cells.
    pub copied: Vec<PropertyKey>,
    /// Properties the store refused, with its reason.
    pub skipped: Vec<(PropertyKey, String)>,
}

impl DuplicateReport {
    /// Returns true if every attempted property was copied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl<D: DesignDb> Session<D> {
    /// Creates a cell. A missing or unknown template yields a black box.
    ///
    /// # Errors
    ///
    /// [`EditError::DuplicateName`] if the name is taken.
    pub fn new_cell(&mut self, name: &str, template: Option<&str>) -> Result<(), EditError> {
        if name.is_empty() {
            return Err(EditError::invalid_argument("cell name is empty"));
        }
        let known = template.filter(|t| self.db.lib_cell(t).is_some());
        match (template, known) {
            (_, Some(t)) => {
                self.db.create_cell(Some(t), name, false)?;
                info!("Created cell '{}' of type {}", name, t);
            }
            (Some(t), None) => {
                self.db.create_cell(Some(t), name, true)?;
                warn!("Library cell '{}' not found, created black box '{}'", t, name);
            }
            (None, None) => {
                self.db.create_cell(None, name, true)?;
                info!("Created black box '{}'", name);
            }
        }
        Ok(())
    }

    /// Removes a cell. Absent cells are ignored. Nets of its pins remain.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    pub fn delete_cell(&mut self, cell: &str) -> Result<(), EditError> {
        if !self.cell_exists(cell) {
            debug!("No cell '{}' to delete", cell);
            return Ok(());
        }
        self.db.remove_cell(cell, true)?;
        info!("Deleted cell '{}'", cell);
        Ok(())
    }

    /// Renames a cell in place.
    ///
    /// # Errors
    ///
    /// [`EditError::DuplicateName`] if `new_name` is taken,
    /// [`EditError::NotFound`] if `cell` does not exist.
    pub fn rename_cell(&mut self, cell: &str, new_name: &str) -> Result<(), EditError> {
        if new_name.is_empty() {
            return Err(EditError::invalid_argument("cell name is empty"));
        }
        self.require_cell(cell)?;
        self.db.rename_cell(cell, new_name)?;
        info!("Renamed cell '{}' to '{}'", cell, new_name);
        Ok(())
    }

    /// Creates `new_name` with the template of `reference` and copies every
    /// settable property whose value is non-empty.
    ///
    /// Property writes the store refuses are skipped and listed in the report.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if `reference` does not exist,
    /// [`EditError::DuplicateName`] if `new_name` is taken.
    pub fn duplicate(&mut self, reference: &str, new_name: &str) -> Result<DuplicateReport, EditError> {
        self.require_cell(reference)?;
        let source = ObjectRef::cell(reference);
        let template = self.db.get_property(&source, &PropertyKey::RefName)?;
        let black_box = self
            .db
            .get_property(&source, &PropertyKey::IsBlackbox)?
            .is_some_and(|v| v.is_truthy());
        let template = match &template {
            Some(PropertyValue::Str(t)) => Some(t.as_str()),
            _ => None,
        };
        self.db.create_cell(template, new_name, black_box)?;

        let target = ObjectRef::cell(new_name);
        let mut report = DuplicateReport {
            cell: new_name.to_string(),
            ..DuplicateReport::default()
        };
        for key in self.db.list_properties(&source)? {
            if key.is_identity() {
                continue;
            }
            let Some(value) = self.db.get_property(&source, &key)?.filter(|v| !v.is_empty()) else {
                continue;
            };
            match self.db.set_property(&target, &key, value, false) {
                Ok(()) => report.copied.push(key),
                Err(err) => {
                    warn!("Skipping {} on '{}': {}", key, new_name, err);
                    report.skipped.push((key, err.to_string()));
                }
            }
        }
        info!(
            "Duplicated '{}' as '{}' ({} copied, {} skipped)",
            reference,
            new_name,
            report.copied.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Full name of a cell.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn get_name(&self, cell: &str) -> Result<String, EditError> {
        self.require_cell(cell)?;
        match self.db.get_property(&ObjectRef::cell(cell), &PropertyKey::Name)? {
            Some(name) => Ok(name.to_string()),
            None => Ok(cell.to_string()),
        }
    }

    /// Template a cell instantiates; `None` for black boxes.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn get_type(&self, cell: &str) -> Result<Option<String>, EditError> {
        self.require_cell(cell)?;
        let object = ObjectRef::cell(cell);
        let black_box = self
            .db
            .get_property(&object, &PropertyKey::IsBlackbox)?
            .is_some_and(|v| v.is_truthy());
        if black_box {
            return Ok(None);
        }
        Ok(self
            .db
            .get_property(&object, &PropertyKey::RefName)?
            .map(|v| v.to_string()))
    }

    /// The cell itself if it is a primitive, else the primitives inside it.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn get_primitives(&self, cell: &str) -> Result<Vec<String>, EditError> {
        self.require_cell(cell)?;
        let primitive = self
            .db
            .get_property(&ObjectRef::cell(cell), &PropertyKey::IsPrimitive)?
            .is_some_and(|v| v.is_truthy());
        if primitive {
            return Ok(vec![cell.to_string()]);
        }
        let query = QueryOptions::new()
            .of_object(ObjectRef::cell(cell))
            .filter(PropertyKey::IsPrimitive.as_str())
            .quiet(true);
        self.get_cells(&query)
    }
}
