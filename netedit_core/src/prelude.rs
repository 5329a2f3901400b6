//! Common imports for users of the editing core.

pub use netedit_common as common;
pub use netedit_db as db;
pub use tracing;

pub use crate::{
    DuplicateReport, EditError, EditJournal, EditStep, InsertOutcome, InsertRequest, NameAllocator, COUNTER_PROPERTY,
    PlacementProbe, Session,
};

pub use common::{
    Config, ConfigBuilder, Endpoint, LibCell, MatchStyle, ObjectClass, ObjectRef, PinDirection, PinRef, Placement,
    PlacementStatus, PortDirection, PropertyKey, PropertyValue, QueryOptions,
};

pub use db::{io::load_design, io::save_design, DbError, DesignDb, MemoryDesign};
