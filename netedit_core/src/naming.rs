//! Collision-free names for nets created by insertion.
//!
//! The counter lives with the session and is written back to the design as a
//! design-level property after every allocation, so a design that is saved and
//! reopened continues where it left off.

use contracts::*;
use netedit_common::{Config, ObjectRef, PropertyKey, PropertyValue, QueryOptions};
use netedit_db::DesignDb;
use tracing::{debug, warn};

use crate::EditError;

/// Design property that stores the next insertion-net index.
pub const COUNTER_PROPERTY: &str = "NETEDIT.INSERT_NET_NEXT";

fn counter_key() -> PropertyKey {
    PropertyKey::Other(COUNTER_PROPERTY.to_string())
}

/// Monotonic allocator for `<prefix><n>` net names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameAllocator {
    prefix: String,
    next: u64,
}

impl NameAllocator {
    /// Restores the counter for an opened design.
    ///
    /// The counter starts past both the persisted value and the highest index
    /// already used by a net carrying the prefix.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    pub fn open<D: DesignDb>(db: &D, config: &Config) -> Result<Self, EditError> {
        let prefix = config.insert_net_prefix.clone();
        let persisted = db
            .get_property(&ObjectRef::Design, &counter_key())?
            .and_then(|v| v.as_int())
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);

        let query = QueryOptions::with_patterns([format!("{prefix}*")])
            .match_style(netedit_common::MatchStyle::Ucf)
            .quiet(true);
        let scanned = db
            .query_nets(&query)?
            .iter()
            .filter_map(|net| net.strip_prefix(prefix.as_str()))
            .filter_map(allocated_index)
            .filter_map(|n| {
                let next = n.checked_add(1);
                if next.is_none() {
                    warn!("Ignoring net {}{}: no index follows it", prefix, n);
                }
                next
            })
            .max()
            .unwrap_or(0);

        let next = persisted.max(scanned);
        debug!("Insert net names continue at {}{}", prefix, next);
        Ok(Self { prefix, next })
    }

    /// The index the next allocation starts from.
    #[must_use]
    pub const fn next_index(&self) -> u64 {
        self.next
    }

    /// Proposes the next free name without consuming it.
    ///
    /// Returns the name and the counter value that committing it leaves behind.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidArgument`] when the counter is exhausted.
    pub(crate) fn propose<D: DesignDb>(&self, db: &D) -> Result<(String, u64), EditError> {
        let mut index = self.next;
        loop {
            let name = format!("{}{}", self.prefix, index);
            index = index
                .checked_add(1)
                .ok_or_else(|| EditError::invalid_argument("insert net counter exhausted"))?;
            if db.get_class(&ObjectRef::net(name.as_str())).is_err() {
                return Ok((name, index));
            }
        }
    }

    /// Consumes a proposal and persists the counter.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidArgument`] when the counter no longer fits the
    /// design property, or a failure to write it. The counter is unchanged on
    /// error.
    #[debug_ensures(self.next >= old(self.next))]
    pub(crate) fn commit<D: DesignDb>(&mut self, db: &mut D, next: u64) -> Result<(), EditError> {
        let next = self.next.max(next);
        let value = i64::try_from(next).map_err(|_| EditError::invalid_argument("insert net counter exhausted"))?;
        db.set_property(&ObjectRef::Design, &counter_key(), PropertyValue::Int(value), false)?;
        self.next = next;
        Ok(())
    }

    /// Allocates the next free name.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidArgument`] when the counter is exhausted, or a
    /// failure to write the counter property.
    pub fn allocate<D: DesignDb>(&mut self, db: &mut D) -> Result<String, EditError> {
        let (name, next) = self.propose(db)?;
        self.commit(db, next)?;
        Ok(name)
    }
}

/// The index an allocated name carries: plain decimal digits without a
/// leading zero, as [`NameAllocator`] writes them.
fn allocated_index(suffix: &str) -> Option<u64> {
    let canonical = !suffix.is_empty()
        && suffix.bytes().all(|b| b.is_ascii_digit())
        && (suffix == "0" || !suffix.starts_with('0'));
    if canonical { suffix.parse().ok() } else { None }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::missing_docs_in_private_items)]

    use super::allocated_index;
    use rstest::rstest;

    #[rstest]
    #[case::zero("0", Some(0))]
    #[case::plain("42", Some(42))]
    #[case::max("18446744073709551615", Some(u64::MAX))]
    #[case::sign("+5", None)]
    #[case::leading_zero("05", None)]
    #[case::too_large("18446744073709551616", None)]
    #[case::empty("", None)]
    #[case::trailing("3b", None)]
    fn parses_only_allocated_suffixes(#[case] suffix: &str, #[case] expected: Option<u64>) {
        assert_eq!(allocated_index(suffix), expected);
    }
}
