//! The backing design database.
//!
//! [`DesignDb`] is the primitive surface the editing core is written against:
//! cell, net and pin CRUD, properties, placement and tie-off. [`MemoryDesign`]
//! is an in-memory implementation with JSON persistence, used by the CLI and
//! the test suites.

mod adapter;
mod error;
pub mod filter;
pub mod io;
mod memory;

pub use adapter::DesignDb;
pub use error::DbError;
pub use memory::{MemoryDesign, GROUND_NET, POWER_NET};
