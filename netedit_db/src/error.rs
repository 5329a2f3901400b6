//! Error types for backing-store operations.

use netedit_common::{CommonError, ObjectClass, PropertyKey};
use thiserror::Error;

/// Errors reported by a [`crate::DesignDb`] implementation.
#[derive(Debug, Error)]
pub enum DbError {
    /// An object with this name already exists.
    #[error("{class} '{name}' already exists")]
    DuplicateName { class: ObjectClass, name: String },

    /// No object with this name exists.
    #[error("{class} '{name}' not found")]
    NotFound { class: ObjectClass, name: String },

    /// The requested library template does not exist.
    #[error("Library cell '{0}' not found")]
    UnknownTemplate(String),

    /// An object of the wrong class was supplied.
    #[error("Expected {expected}, got {found} '{name}'")]
    WrongClass {
        expected: &'static str,
        found: ObjectClass,
        name: String,
    },

    /// A filter expression did not parse.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A name pattern did not compile.
    #[error(transparent)]
    Pattern(#[from] CommonError),

    /// The store has no native relation from this class to the requested one.
    #[error("No native relation from {from} objects to {to} objects")]
    UnsupportedRelation { from: ObjectClass, to: ObjectClass },

    /// The endpoint is already a member of a net.
    #[error("'{endpoint}' is already connected to net '{net}'")]
    AlreadyConnected { endpoint: String, net: String },

    /// The endpoint is not a member of the net.
    #[error("'{endpoint}' is not connected to net '{net}'")]
    NotConnected { endpoint: String, net: String },

    /// Connecting the endpoint would give the net a second driver.
    #[error("Net '{net}' is already driven by '{driver}', cannot add driver '{endpoint}'")]
    MultipleDrivers {
        net: String,
        driver: String,
        endpoint: String,
    },

    /// The placement engine refused the placement.
    #[error("Cannot place '{cell}' on '{location}': {reason}")]
    PlacementRejected {
        cell: String,
        location: String,
        reason: String,
    },

    /// The property cannot be written.
    #[error("Property {key} of '{object}' is read-only")]
    ReadOnlyProperty { object: String, key: PropertyKey },

    /// The property cannot take this value.
    #[error("Property {key} of '{object}' cannot be set: {reason}")]
    IncompatibleProperty {
        object: String,
        key: PropertyKey,
        reason: String,
    },

    /// Reading or writing a design file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A design file was not valid JSON.
    #[error("Design serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DbError {
    /// Create a not-found error.
    pub fn not_found(class: ObjectClass, name: impl Into<String>) -> Self {
        Self::NotFound {
            class,
            name: name.into(),
        }
    }

    /// Create a duplicate-name error.
    pub fn duplicate(class: ObjectClass, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            class,
            name: name.into(),
        }
    }

    /// Create a placement rejection.
    pub fn rejected(cell: impl Into<String>, location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PlacementRejected {
            cell: cell.into(),
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid filter error.
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }
}
