//! Undo log for multi-step edits.

use netedit_common::Endpoint;
use netedit_db::{DbError, DesignDb};
use tracing::debug;

/// A completed mutation and how to undo it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditStep {
    /// A cell was created.
    CreatedCell(String),
    /// A net was created.
    CreatedNet(String),
    /// Endpoints were removed from a net.
    Disconnected { net: String, endpoints: Vec<Endpoint> },
    /// An endpoint was added to a net.
    Connected { net: String, endpoint: Endpoint },
}

/// Records the mutations of one edit so they can be undone in reverse order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditJournal {
    steps: Vec<EditStep>,
}

impl EditJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed step.
    pub fn record(&mut self, step: EditStep) {
        self.steps.push(step);
    }

    /// The recorded steps, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[EditStep] {
        &self.steps
    }

    /// Undoes every recorded step, newest first.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing compensation.
    pub fn rollback<D: DesignDb>(mut self, db: &mut D) -> Result<(), DbError> {
        while let Some(step) = self.steps.pop() {
            debug!("Undoing {:?}", step);
            match step {
                EditStep::Connected { net, endpoint } => db.disconnect(&net, &[endpoint])?,
                EditStep::CreatedNet(net) => db.remove_net(&net)?,
                EditStep::Disconnected { net, endpoints } => {
                    for endpoint in &endpoints {
                        db.connect(&net, endpoint)?;
                    }
                }
                EditStep::CreatedCell(cell) => db.remove_cell(&cell, false)?,
            }
        }
        Ok(())
    }
}
