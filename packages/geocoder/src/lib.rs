#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding by exact lookup in the reference address table.
//!
//! Incidents carry a `city + district` join key produced by the
//! normalizer. [`ReferenceIndex`] maps the same key to a reference row, and
//! [`left_join`] attaches the row (and so its coordinates) to every
//! incident whose key matches. Incidents that do not match are kept with
//! no coordinates.

use std::collections::BTreeMap;

use fushinsha_map_incident_models::{JoinedRecord, NormalizedIncident, ReferenceAddress};

/// Lookup from `city + district` to a reference row.
///
/// Keys are not unique in the source table. The first row for a key wins,
/// so a join never yields more than one record per incident.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_address: BTreeMap<String, ReferenceAddress>,
}

impl ReferenceIndex {
    /// Builds an index from reference rows in file order.
    #[must_use]
    pub fn new(rows: impl IntoIterator<Item = ReferenceAddress>) -> Self {
        let mut by_address = BTreeMap::new();
        let mut duplicates = 0_usize;

        for row in rows {
            let key = row.address();
            if by_address.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            by_address.insert(key, row);
        }

        if duplicates > 0 {
            log::debug!("Ignored {duplicates} reference rows with a duplicate address key");
        }

        Self { by_address }
    }

    /// Returns the reference row for `address`, if any.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&ReferenceAddress> {
        self.by_address.get(address)
    }

    /// Number of distinct address keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// Whether the index has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

/// Attaches reference rows to incidents by exact address match.
///
/// Every incident appears exactly once in the output, in input order.
#[must_use]
pub fn left_join(
    incidents: impl IntoIterator<Item = NormalizedIncident>,
    index: &ReferenceIndex,
) -> Vec<JoinedRecord> {
    let records: Vec<JoinedRecord> = incidents
        .into_iter()
        .map(|incident| {
            let reference = incident
                .address
                .as_deref()
                .and_then(|address| index.get(address))
                .cloned();
            JoinedRecord {
                incident,
                reference,
            }
        })
        .collect();

    let matched = records.iter().filter(|r| r.reference.is_some()).count();
    log::info!(
        "Matched {matched} of {} incidents against {} reference addresses",
        records.len(),
        index.len()
    );

    records
}

/// Returns the records with any missing field, paired with their row
/// index in `records`.
#[must_use]
pub fn unresolved(records: &[JoinedRecord]) -> Vec<(usize, &JoinedRecord)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_unresolved())
        .collect()
}

/// Returns the records that can be plotted.
#[must_use]
pub fn resolved(records: &[JoinedRecord]) -> Vec<&JoinedRecord> {
    records.iter().filter(|r| !r.is_unresolved()).collect()
}
