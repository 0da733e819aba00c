//! RRset reconciliation planning.
//!
//! The `set_records` contract says: for every (name, type) pair present in an
//! input batch, the zone must end up containing exactly the input records for
//! that pair, while every other (name, type) pair stays untouched. This module
//! is the one shared implementation of that diff; provider adapters feed it
//! their fetched zone state and translate the resulting [`ChangeSet`] into
//! vendor create/delete calls.
//!
//! Everything here is pure and synchronous; no provider I/O happens at this
//! layer.

use std::collections::HashSet;
use std::time::Duration;

use crate::record::RR;

/// The (name, type) pair identifying one RRset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// Zone-relative record name.
    pub name: String,
    /// Uppercase record type tag.
    pub record_type: String,
}

impl RecordKey {
    /// The RRset key of a record. The type tag is uppercased so that keys
    /// compare consistently regardless of input casing.
    #[must_use]
    pub fn of(rr: &RR) -> Self {
        Self {
            name: rr.name.clone(),
            record_type: rr.record_type.to_ascii_uppercase(),
        }
    }
}

/// The provider calls needed to make a zone match a desired record batch.
///
/// Applying a change set in any order (deletes and creates may interleave or
/// run concurrently, as long as both finish) yields the contract's post state.
/// Applying the same batch again afterwards produces an empty change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Records to create.
    pub create: Vec<RR>,
    /// Existing records to remove.
    pub delete: Vec<RR>,
}

impl ChangeSet {
    /// Whether the plan requires no provider calls at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty()
    }
}

/// Computes the plan that replaces, per (name, type) key, the existing RRsets
/// with exactly the records of `desired`.
///
/// Records equal on (name, type, ttl, data) are left in place; surplus
/// existing records under a desired key are deleted; desired records with no
/// exact match are created. Keys not named by `desired` never appear in the
/// plan. Duplicate records are handled as multisets: two identical desired
/// records need two identical existing records to be a no-op.
#[must_use]
pub fn plan_set(existing: &[RR], desired: &[RR]) -> ChangeSet {
    let touched: HashSet<RecordKey> = desired.iter().map(RecordKey::of).collect();

    // Existing records under a touched key are candidates for deletion until
    // claimed by an exact-matching desired record.
    let mut unclaimed: Vec<&RR> = existing
        .iter()
        .filter(|rr| touched.contains(&RecordKey::of(rr)))
        .collect();

    let mut create = Vec::new();
    for want in desired {
        if let Some(pos) = unclaimed.iter().position(|have| rr_equal(have, want)) {
            unclaimed.swap_remove(pos);
        } else {
            create.push(want.clone());
        }
    }

    ChangeSet {
        create,
        delete: unclaimed.into_iter().cloned().collect(),
    }
}

/// Selects the indices of `existing` matched by any of `selectors`, for
/// deletion.
///
/// Matching is exact on (name, type, ttl, data), except that a selector's
/// empty `record_type`, zero `ttl` or empty `data` acts as a wildcard for
/// that field. `name` never wildcards. Selectors that match nothing simply
/// contribute nothing; they are not an error.
#[must_use]
pub fn delete_selection(existing: &[RR], selectors: &[RR]) -> Vec<usize> {
    existing
        .iter()
        .enumerate()
        .filter(|(_, rr)| selectors.iter().any(|sel| matches_selector(sel, rr)))
        .map(|(idx, _)| idx)
        .collect()
}

/// Whether a deletion selector matches a concrete record (see
/// [`delete_selection`] for the wildcard rules).
#[must_use]
pub fn matches_selector(selector: &RR, rr: &RR) -> bool {
    selector.name == rr.name
        && (selector.record_type.is_empty()
            || selector.record_type.eq_ignore_ascii_case(&rr.record_type))
        && (selector.ttl == Duration::ZERO || selector.ttl == rr.ttl)
        && (selector.data.is_empty() || selector.data == rr.data)
}

fn rr_equal(a: &RR, b: &RR) -> bool {
    a.name == b.name
        && a.record_type.eq_ignore_ascii_case(&b.record_type)
        && a.ttl == b.ttl
        && a.data == b.data
}
