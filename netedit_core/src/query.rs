//! Query resolution.
//!
//! Queries are evaluated by the backing store, except for "cells of a cell",
//! which the store has no native relation for. That case is answered by
//! running the base query hierarchically and keeping the names that start
//! with `<container><separator>`.

use netedit_common::{name, ObjectClass, ObjectRef, QueryOptions};
use netedit_db::DesignDb;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::{EditError, Session};

impl<D: DesignDb> Session<D> {
    /// Cells matching `query`, in store order.
    ///
    /// # Errors
    ///
    /// [`EditError::NotFound`] when nothing matches and the query is not quiet,
    /// [`EditError::InvalidFilter`] for a malformed filter.
    pub fn get_cells(&self, query: &QueryOptions) -> Result<Vec<String>, EditError> {
        match self.resolve_cells(query) {
            Err(EditError::NotFound { .. }) if query.quiet => Ok(Vec::new()),
            Ok(cells) => self.report(query, ObjectClass::Cell, cells),
            Err(err) => Err(err),
        }
    }

    /// Alias of [`Session::get_cells`].
    ///
    /// # Errors
    ///
    /// As [`Session::get_cells`].
    pub fn get(&self, query: &QueryOptions) -> Result<Vec<String>, EditError> {
        self.get_cells(query)
    }

    /// Nets matching `query`, in store order.
    ///
    /// # Errors
    ///
    /// As [`Session::get_cells`].
    pub fn get_nets(&self, query: &QueryOptions) -> Result<Vec<String>, EditError> {
        let query = self.with_separator(query);
        match self.db.query_nets(&query).map_err(EditError::from) {
            Err(EditError::NotFound { .. }) if query.quiet => Ok(Vec::new()),
            Ok(nets) => self.report(&query, ObjectClass::Net, nets),
            Err(err) => Err(err),
        }
    }

    fn with_separator(&self, query: &QueryOptions) -> QueryOptions {
        let mut query = query.clone();
        query.hsc = Some(query.separator(self.separator()));
        query
    }

    fn resolve_cells(&self, query: &QueryOptions) -> Result<Vec<String>, EditError> {
        let query = self.with_separator(query);
        let separator = query.separator(self.separator());

        let mut containers = Vec::new();
        let mut others = Vec::new();
        for object in &query.of_objects {
            match (object, self.db.get_class(object)?) {
                (ObjectRef::Cell(name), ObjectClass::Cell) => containers.push(name.clone()),
                _ => others.push(object.clone()),
            }
        }
        if containers.is_empty() {
            return Ok(self.db.query_cells(&query)?);
        }

        let mut base = query.clone().hierarchical(true);
        base.of_objects.clear();
        let related: HashSet<String> = if others.is_empty() {
            HashSet::new()
        } else {
            let mut by_relation = query.clone();
            by_relation.of_objects = others;
            self.db.query_cells(&by_relation)?.into_iter().collect()
        };
        debug!("Resolving cells inside {} container(s)", containers.len());
        Ok(self
            .db
            .query_cells(&base)?
            .into_iter()
            .filter(|cell| related.contains(cell) || containers.iter().any(|c| name::is_descendant(cell, c, separator)))
            .collect())
    }

    fn report(&self, query: &QueryOptions, class: ObjectClass, found: Vec<String>) -> Result<Vec<String>, EditError> {
        if found.is_empty() {
            let patterns = query.effective_patterns().join(" ");
            if query.quiet {
                debug!("No {} matched '{}'", class, patterns);
                return Ok(found);
            }
            return Err(EditError::not_found(class, patterns));
        }
        if query.verbose || self.config.verbose {
            for name in &found {
                info!("Matched {} '{}'", class, name);
            }
        }
        Ok(found)
    }
}
