//! Native cell and net queries.

use netedit_common::{Endpoint, ObjectClass, ObjectRef, PropertyKey, QueryOptions};
use std::collections::HashSet;

use super::MemoryDesign;
use crate::filter::Filter;
use crate::DbError;

impl MemoryDesign {
    /// Cells matching `query`, in creation order.
    ///
    /// With `of_objects` and no explicit patterns every related cell is
    /// accepted; patterns given alongside `of_objects` narrow the related set.
    pub(super) fn select_cells(&self, query: &QueryOptions) -> Result<Vec<String>, DbError> {
        let related = if query.of_objects.is_empty() {
            None
        } else {
            Some(self.cells_related_to(&query.of_objects)?)
        };
        let candidates = self
            .cells
            .keys()
            .filter(|name| related.as_ref().is_none_or(|r| r.contains(name.as_str())));
        self.select(query, related.is_some(), candidates, ObjectRef::Cell)
    }

    /// Nets matching `query`, in creation order.
    pub(super) fn select_nets(&self, query: &QueryOptions) -> Result<Vec<String>, DbError> {
        let related = if query.of_objects.is_empty() {
            None
        } else {
            Some(self.nets_related_to(&query.of_objects)?)
        };
        let candidates = self
            .nets
            .keys()
            .filter(|name| related.as_ref().is_none_or(|r| r.contains(name.as_str())));
        self.select(query, related.is_some(), candidates, ObjectRef::Net)
    }

    fn select<'a>(
        &self,
        query: &QueryOptions,
        relational: bool,
        candidates: impl Iterator<Item = &'a String>,
        handle: fn(String) -> ObjectRef,
    ) -> Result<Vec<String>, DbError> {
        let matcher = query.matcher(self.separator)?;
        let filter = query
            .filter
            .as_deref()
            .map(|text| Filter::parse(text, query.nocase))
            .transpose()?;
        let by_name = !(relational && query.patterns.is_empty());

        let mut selected = Vec::new();
        for name in candidates {
            if by_name && !matcher.matches(name) {
                continue;
            }
            if let Some(filter) = &filter {
                let object = handle(name.clone());
                let lookup = |key: &PropertyKey| self.read_property(&object, key).ok().flatten();
                if !filter.eval(&lookup, query.nocase) {
                    continue;
                }
            }
            selected.push(name.clone());
        }
        Ok(selected)
    }

    fn cells_on_net<'a>(&'a self, net: &str) -> Result<impl Iterator<Item = &'a str>, DbError> {
        Ok(self.net(net)?.members.iter().filter_map(Endpoint::cell))
    }

    fn cells_related_to(&self, objects: &[ObjectRef]) -> Result<HashSet<&str>, DbError> {
        let mut related = HashSet::new();
        for object in objects {
            match self.canonical(object)? {
                ObjectRef::Design => related.extend(self.cells.keys().map(String::as_str)),
                ObjectRef::Cell(_) => {
                    return Err(DbError::UnsupportedRelation {
                        from: ObjectClass::Cell,
                        to: ObjectClass::Cell,
                    });
                }
                ObjectRef::Pin(pin) => {
                    if let Some((owner, _)) = self.cells.get_key_value(pin.cell.as_str()) {
                        related.insert(owner.as_str());
                    }
                }
                ObjectRef::Net(net) => related.extend(self.cells_on_net(&net)?),
                ObjectRef::Port(port) => {
                    if let Some(net) = self.port(&port)?.net.as_deref() {
                        related.extend(self.cells_on_net(net)?);
                    }
                }
                ObjectRef::Bel(bel) => related.extend(self.bel(&bel)?.cell.as_deref()),
                ObjectRef::Site(site) => {
                    self.site(&site)?;
                    related.extend(self.cells_placed_in(move |s| s == site));
                }
                ObjectRef::Tile(tile) => {
                    let sites = &self.tile(&tile)?.sites;
                    related.extend(self.cells_placed_in(move |s| sites.iter().any(|t| t == s)));
                }
            }
        }
        Ok(related)
    }

    fn cells_placed_in<'a>(&'a self, site: impl Fn(&str) -> bool + 'a) -> impl Iterator<Item = &'a str> {
        self.cells.iter().filter_map(move |(name, cell)| {
            cell.placement
                .as_ref()
                .filter(|p| site(&p.site))
                .map(|_| name.as_str())
        })
    }

    fn nets_related_to(&self, objects: &[ObjectRef]) -> Result<HashSet<&str>, DbError> {
        let mut related = HashSet::new();
        for object in objects {
            match self.canonical(object)? {
                ObjectRef::Design => related.extend(self.nets.keys().map(String::as_str)),
                ObjectRef::Cell(cell) => {
                    related.extend(self.cell(&cell)?.pins.values().filter_map(|p| p.net.as_deref()));
                }
                ObjectRef::Pin(pin) => related.extend(self.pin(&pin)?.net.as_deref()),
                ObjectRef::Port(port) => related.extend(self.port(&port)?.net.as_deref()),
                other => {
                    return Err(DbError::UnsupportedRelation {
                        from: other.claimed_class(),
                        to: ObjectClass::Net,
                    });
                }
            }
        }
        Ok(related)
    }
}
