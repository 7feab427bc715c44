//! Run-wide set of place IDs already present in the ledger
//!
//! IDs enter the set in two phases: they are staged when a batch is
//! assembled and only promoted once the ledger confirms the append. A failed
//! write therefore leaves the places eligible for a later page or run.

use crate::search::PlaceSummary;
use std::collections::HashSet;

/// Place IDs confirmed as stored in the ledger
#[derive(Debug, Clone, Default)]
pub struct KnownPlaces {
    confirmed: HashSet<String>,
}

/// IDs of a batch that has been assembled but not yet written
#[derive(Debug)]
#[must_use = "staged IDs must be committed or discarded"]
pub struct StagedIds {
    ids: Vec<String>,
}

impl StagedIds {
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// A page split by [`KnownPlaces::filter_new`]
#[derive(Debug, Default)]
pub struct PageFilter {
    /// Places to probe and write, in provider order
    pub fresh: Vec<PlaceSummary>,

    /// Places already in the ledger or repeated on the page
    pub duplicates: usize,

    /// Places the provider returned without an ID
    pub missing_id: usize,
}

impl KnownPlaces {
    /// Seeds the set, usually from [`Ledger::known_place_ids`](crate::storage::Ledger::known_place_ids)
    pub fn new(confirmed: HashSet<String>) -> Self {
        Self { confirmed }
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.confirmed.contains(place_id)
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    /// Splits a page into places not seen before, keeping provider order
    ///
    /// A place repeated within the page is kept once. Places without an ID
    /// cannot be deduplicated and are dropped.
    pub fn filter_new(&self, places: Vec<PlaceSummary>) -> PageFilter {
        let mut filter = PageFilter::default();
        let mut on_page: HashSet<String> = HashSet::new();

        for place in places {
            if place.place_id.is_empty() {
                tracing::warn!("Dropping place '{}' without an ID", place.name);
                filter.missing_id += 1;
            } else if self.contains(&place.place_id) || !on_page.insert(place.place_id.clone()) {
                filter.duplicates += 1;
            } else {
                filter.fresh.push(place);
            }
        }

        filter
    }

    /// Stages the IDs of a batch about to be written
    pub fn stage<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> StagedIds {
        StagedIds {
            ids: ids.into_iter().map(str::to_string).collect(),
        }
    }

    /// Promotes staged IDs after a confirmed write
    pub fn commit(&mut self, staged: StagedIds) {
        self.confirmed.extend(staged.ids);
    }

    /// Drops staged IDs after a failed write, returning how many there were
    pub fn discard(&self, staged: StagedIds) -> usize {
        staged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str) -> PlaceSummary {
        PlaceSummary {
            place_id: id.to_string(),
            name: format!("Place {}", id),
            address: String::new(),
            phone: None,
            website: None,
        }
    }

    fn known(ids: &[&str]) -> KnownPlaces {
        KnownPlaces::new(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_filter_drops_known_and_repeated() {
        let known = known(&["P0"]);
        let filter = known.filter_new(vec![place("P1"), place("P0"), place("P2"), place("P1")]);

        let ids: Vec<&str> = filter.fresh.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
        assert_eq!(filter.duplicates, 2);
        assert_eq!(filter.missing_id, 0);
    }

    #[test]
    fn test_places_without_id_are_not_counted_as_duplicates() {
        let known = known(&["P0"]);
        let filter = known.filter_new(vec![place(""), place("P0"), place(""), place("P3")]);

        assert_eq!(filter.fresh.len(), 1);
        assert_eq!(filter.fresh[0].place_id, "P3");
        assert_eq!(filter.duplicates, 1);
        assert_eq!(filter.missing_id, 2);
    }

    #[test]
    fn test_commit_promotes() {
        let mut known = known(&["P0"]);
        let staged = known.stage(["P1", "P2"]);
        assert!(!known.contains("P1"));

        known.commit(staged);
        assert!(known.contains("P1") && known.contains("P2"));
        assert_eq!(known.len(), 3);
    }

    #[test]
    fn test_discard_leaves_set_untouched() {
        let known = known(&["P0"]);
        let staged = known.stage(["P1"]);
        assert_eq!(known.discard(staged), 1);
        assert!(!known.contains("P1"));
        assert_eq!(known.len(), 1);
    }
}
