//! Tie-off of unused input pins.

use netedit_db::DesignDb;
use tracing::info;

use crate::{EditError, Session};

impl<D: DesignDb> Session<D> {
    /// Ties every unconnected input pin of `cell` to a constant net.
    /// Returns the number of pins tied.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] if the cell does not exist.
    pub fn tie_unused_pins(&mut self, cell: &str) -> Result<usize, EditError> {
        self.require_cell(cell)?;
        let tied = self.db.tie_unused_pins(&[cell.to_string()])?;
        info!("Tied {} unused pin(s) of '{}'", tied, cell);
        Ok(tied)
    }
}
