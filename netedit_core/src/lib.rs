//! Netlist editing core.
//!
//! A [`Session`] wraps a [`netedit_db::DesignDb`] and exposes the editing
//! operations: query resolution, cell lifecycle, placement with a legality
//! probe, cell insertion into nets, and tie-off of unused pins.

mod error;
mod journal;
mod lifecycle;
mod naming;
mod placement;
pub mod prelude;
mod query;
mod session;
mod tie;
mod topology;

pub use error::EditError;
pub use journal::{EditJournal, EditStep};
pub use lifecycle::DuplicateReport;
pub use naming::{NameAllocator, COUNTER_PROPERTY};
pub use placement::PlacementProbe;
pub use session::Session;
pub use topology::{InsertOutcome, InsertRequest};
