//! Errors raised by editing operations.

use netedit_common::{ObjectClass, PinDirection};
use netedit_db::DbError;
use thiserror::Error;

/// Errors raised by [`crate::Session`] operations.
///
/// Validation failures are raised before the design is touched. Anything the
/// backing store reports that has no dedicated variant passes through as
/// [`EditError::Backing`].
#[derive(Debug, Error)]
pub enum EditError {
    /// The name is already taken.
    #[error("{class} '{name}' already exists")]
    DuplicateName { class: ObjectClass, name: String },

    /// Nothing matched.
    #[error("No {class} matched '{name}'")]
    NotFound { class: ObjectClass, name: String },

    /// An object of the wrong class, or an otherwise malformed argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The target BEL already holds a cell.
    #[error("Location '{location}' is occupied by '{occupant}'")]
    LocationOccupied { location: String, occupant: String },

    /// The cell has no free pin of the needed direction.
    #[error("Cell '{cell}' has no unconnected {direction} pin")]
    NoAvailablePin { cell: String, direction: PinDirection },

    /// Requested sinks that are not sinks of the net.
    #[error("Not sinks of net '{net}': {}", offenders.join(", "))]
    InvalidSinks { net: String, offenders: Vec<String> },

    /// The query filter did not parse.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// The backing store failed.
    #[error("Backing store error: {0}")]
    Backing(#[source] DbError),

    /// A multi-step edit failed and undoing it failed too.
    #[error("Design left inconsistent: {cause}; rollback failed: {rollback}")]
    Inconsistent {
        #[source]
        cause: DbError,
        rollback: DbError,
    },
}

impl EditError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not-found error.
    pub fn not_found(class: ObjectClass, name: impl Into<String>) -> Self {
        Self::NotFound {
            class,
            name: name.into(),
        }
    }
}

impl From<DbError> for EditError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateName { class, name } => Self::DuplicateName { class, name },
            DbError::NotFound { class, name } => Self::NotFound { class, name },
            DbError::InvalidFilter(msg) => Self::InvalidFilter(msg),
            DbError::WrongClass { expected, found, name } => {
                Self::InvalidArgument(format!("expected {expected}, got {found} '{name}'"))
            }
            other => Self::Backing(other),
        }
    }
}
