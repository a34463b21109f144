use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use nopal_catalog::{CatalogError, Table, TableCatalog, TableId};
use nopal_shared::CalendarDate;

use crate::conflict::is_table_free;
use crate::reservation::Reservation;

/// Ordered candidate lists per party-size band.
///
/// The dining room only supports specific adjacent-table merges, so
/// assignment scans fixed lists instead of searching table subsets: first
/// free candidate wins, ties broken by list position. That makes the
/// behaviour reproducible and lets the layout be re-prioritized in config
/// without touching code.
///
/// Bands: 1-3 guests scan `singles`; 4-5 scan `small_pairs`; 6-7 scan
/// `large_pairs` and then fall back to `small_pairs` (their stretched
/// combined capacity covers seven); 8 scan `large_pairs` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierPolicy {
    pub singles: Vec<TableId>,
    pub small_pairs: Vec<(TableId, TableId)>,
    pub large_pairs: Vec<(TableId, TableId)>,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            singles: vec![1, 2, 3, 4, 5, 6, 7, 8],
            small_pairs: vec![(11, 12), (13, 14), (15, 16)],
            large_pairs: vec![(20, 21), (22, 25)],
        }
    }
}

impl TierPolicy {
    /// Every listed table must exist, be reservable, and listed pairs must
    /// be adjacent in the layout. Checked once at engine construction.
    pub fn validate(&self, catalog: &TableCatalog) -> Result<(), CatalogError> {
        let pairs = self.small_pairs.iter().chain(&self.large_pairs);
        let singles = self.singles.iter().map(|&id| (id, None));
        let members = pairs
            .flat_map(|&(a, b)| [(a, Some(b)), (b, Some(a))])
            .chain(singles);

        for (id, partner) in members {
            let table = catalog
                .table(id)
                .ok_or(CatalogError::UnknownPolicyTable(id))?;
            if !table.reservable {
                return Err(CatalogError::PolicyTableNotReservable(id));
            }
            if let Some(partner) = partner {
                if !catalog.pair_group_of(id).contains(&partner) {
                    return Err(CatalogError::PolicyPairNotAdjacent { a: id, b: partner });
                }
            }
        }
        Ok(())
    }

    fn candidates_for(&self, party_size: u32) -> Vec<Candidate> {
        match party_size {
            0 => Vec::new(),
            1..=3 => self.singles.iter().map(|&id| Candidate::Single(id)).collect(),
            4..=5 => pairs(&self.small_pairs),
            6..=7 => {
                let mut candidates = pairs(&self.large_pairs);
                candidates.extend(pairs(&self.small_pairs));
                candidates
            }
            _ => pairs(&self.large_pairs),
        }
    }
}

fn pairs(list: &[(TableId, TableId)]) -> Vec<Candidate> {
    list.iter().map(|&(a, b)| Candidate::Pair(a, b)).collect()
}

#[derive(Debug, Clone, Copy)]
enum Candidate {
    Single(TableId),
    Pair(TableId, TableId),
}

impl Candidate {
    fn members(&self) -> Vec<TableId> {
        match *self {
            Candidate::Single(id) => vec![id],
            Candidate::Pair(a, b) => vec![a, b],
        }
    }
}

/// A successful assignment: one table, or two mutually paired ones, in
/// candidate-list order, jointly free for the whole window.
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub tables: Vec<Table>,
}

impl Assignment {
    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.iter().map(|t| t.id).collect()
    }

    /// Stretched combined capacity of the assigned unit.
    pub fn combined_max_capacity(&self) -> u32 {
        self.tables.iter().map(|t| t.max_capacity).sum()
    }
}

/// Scan the tier for `party_size` and return the first candidate whose
/// tables are all free. `None` means no capacity at this slot.
pub fn assign(
    catalog: &TableCatalog,
    policy: &TierPolicy,
    party_size: u32,
    date: CalendarDate,
    time: NaiveTime,
    duration_minutes: u32,
    snapshot: &[Reservation],
) -> Option<Assignment> {
    for candidate in policy.candidates_for(party_size) {
        let members = candidate.members();

        let tables: Vec<Table> = members
            .iter()
            .filter_map(|&id| catalog.table(id).cloned())
            .collect();
        if tables.len() != members.len() {
            continue;
        }

        let stretched: u32 = tables.iter().map(|t| t.max_capacity).sum();
        if stretched < party_size {
            debug!("candidate {:?} too small for party of {}, skipping", members, party_size);
            continue;
        }

        let all_free = members
            .iter()
            .all(|&id| is_table_free(catalog, id, date, time, duration_minutes, snapshot));
        if all_free {
            debug!("assigned {:?} to party of {} on {}", members, party_size, date);
            return Some(Assignment { tables });
        }
        debug!("candidate {:?} occupied, trying next", members);
    }

    None
}
