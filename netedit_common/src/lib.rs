//! Common types shared across the netedit workspace.
//!
//! This crate holds the vocabulary every other crate speaks: object handles,
//! pins and endpoints, typed properties, placement state, library templates,
//! name patterns, query options and the runtime configuration.

mod config;
mod direction;
mod endpoint;
mod error;
mod library;
pub mod name;
mod object;
mod pattern;
mod placement;
mod property;
mod query;

pub use crate::config::*;
pub use crate::direction::*;
pub use crate::endpoint::*;
pub use crate::error::*;
pub use crate::library::*;
pub use crate::object::*;
pub use crate::pattern::*;
pub use crate::placement::*;
pub use crate::property::*;
pub use crate::query::*;
