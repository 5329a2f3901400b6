//! The editing session: one design, its configuration and naming state.

use netedit_common::{Config, ObjectClass, ObjectRef};
use netedit_db::DesignDb;
use tracing::info;

use crate::{EditError, NameAllocator};

/// An open design.
///
/// Every editing operation is a method on the session. Mutating operations
/// take `&mut self`, which serializes edits to the design. Entities are passed
/// and returned by name and re-resolved against the store on every call.
#[derive(Debug)]
pub struct Session<D: DesignDb> {
    pub(crate) db: D,
    pub(crate) config: Config,
    pub(crate) names: NameAllocator,
}

impl<D: DesignDb> Session<D> {
    /// Opens a session on `db`.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures while restoring the naming counter.
    pub fn open(db: D, config: Config) -> Result<Self, EditError> {
        let names = NameAllocator::open(&db, &config)?;
        info!(
            "Opened design session (separator '{}', next insert net index {})",
            config.hierarchy_separator,
            names.next_index()
        );
        Ok(Self { db, config, names })
    }

    /// The backing store.
    pub const fn db(&self) -> &D {
        &self.db
    }

    /// The backing store, mutably. Edits made here bypass the session's checks.
    pub const fn db_mut(&mut self) -> &mut D {
        &mut self.db
    }

    /// Closes the session and returns the backing store.
    pub fn into_db(self) -> D {
        self.db
    }

    /// The session configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The insertion-net name allocator.
    pub const fn names(&self) -> &NameAllocator {
        &self.names
    }

    pub(crate) const fn separator(&self) -> char {
        self.config.hierarchy_separator
    }

    /// Fails unless `cell` names an existing cell.
    pub(crate) fn require_cell(&self, cell: &str) -> Result<(), EditError> {
        match self.db.get_class(&ObjectRef::cell(cell))? {
            ObjectClass::Cell => Ok(()),
            other => Err(EditError::invalid_argument(format!(
                "expected a cell, got {other} '{cell}'"
            ))),
        }
    }

    /// Returns true if `cell` names an existing cell.
    pub(crate) fn cell_exists(&self, cell: &str) -> bool {
        matches!(self.db.get_class(&ObjectRef::cell(cell)), Ok(ObjectClass::Cell))
    }

    /// Resolves a placement target to a typed BEL or site handle.
    pub(crate) fn location(&self, location: &ObjectRef) -> Result<ObjectRef, EditError> {
        let name = location.name();
        match self.db.get_class(location)? {
            ObjectClass::Bel => Ok(ObjectRef::Bel(name)),
            ObjectClass::Site => Ok(ObjectRef::Site(name)),
            other => Err(EditError::invalid_argument(format!(
                "expected a BEL or site, got {other} '{name}'"
            ))),
        }
    }
}
