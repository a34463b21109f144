use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type TableId = u32;

/// A physical table in the dining room.
///
/// `paired_with` lists the adjacent tables this one can be merged with to
/// seat a larger party as a single unit. Pairing is symmetric in a valid
/// catalog; `TableCatalog::new` rejects one-sided declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub number: u32,
    pub capacity: u32,
    /// Soft upper bound the seating may stretch to (extra chairs).
    /// Zero in config means "same as capacity".
    #[serde(default)]
    pub max_capacity: u32,
    pub reservable: bool,
    #[serde(default)]
    pub paired_with: Vec<TableId>,
}

impl Table {
    pub fn new(id: TableId, capacity: u32, max_capacity: u32) -> Self {
        Self {
            id,
            number: id,
            capacity,
            max_capacity,
            reservable: true,
            paired_with: Vec::new(),
        }
    }

    pub fn paired(mut self, partner: TableId) -> Self {
        self.paired_with.push(partner);
        self
    }

    pub fn walk_in_only(mut self) -> Self {
        self.reservable = false;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no tables")]
    Empty,

    #[error("duplicate table id: {0}")]
    DuplicateTable(TableId),

    #[error("table {0} has zero capacity")]
    ZeroCapacity(TableId),

    #[error("table {table}: capacity {capacity} exceeds max_capacity {max_capacity}")]
    CapacityBound {
        table: TableId,
        capacity: u32,
        max_capacity: u32,
    },

    #[error("table {table} is paired with unknown table {partner}")]
    UnknownPairing { table: TableId, partner: TableId },

    #[error("table {table} is paired with {partner}, but not the other way around")]
    AsymmetricPairing { table: TableId, partner: TableId },

    #[error("unknown table referenced by tier policy: {0}")]
    UnknownPolicyTable(TableId),

    #[error("tier policy lists non-reservable table {0}")]
    PolicyTableNotReservable(TableId),

    #[error("tier policy pairs tables {a} and {b}, which are not paired in the layout")]
    PolicyPairNotAdjacent { a: TableId, b: TableId },

    #[error("invalid opening interval on {day}: {detail}")]
    InvalidHours { day: String, detail: String },
}

/// The fixed table inventory. Pure lookup, loaded once; the engine never
/// mutates it.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    tables: Vec<Table>,
    index: HashMap<TableId, usize>,
}

impl TableCatalog {
    /// Build and validate a catalog. Violations are hard errors: a corrupt
    /// layout must never reach the assignment engine.
    pub fn new(tables: Vec<Table>) -> Result<Self, CatalogError> {
        if tables.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut tables = tables;
        for table in &mut tables {
            if table.max_capacity == 0 {
                table.max_capacity = table.capacity;
            }
        }

        let mut index = HashMap::with_capacity(tables.len());
        for (position, table) in tables.iter().enumerate() {
            if index.insert(table.id, position).is_some() {
                return Err(CatalogError::DuplicateTable(table.id));
            }
            if table.capacity == 0 {
                return Err(CatalogError::ZeroCapacity(table.id));
            }
            if table.capacity > table.max_capacity {
                return Err(CatalogError::CapacityBound {
                    table: table.id,
                    capacity: table.capacity,
                    max_capacity: table.max_capacity,
                });
            }
        }

        // Pairing must resolve and be declared from both sides.
        for table in &tables {
            for &partner in &table.paired_with {
                let Some(&position) = index.get(&partner) else {
                    return Err(CatalogError::UnknownPairing {
                        table: table.id,
                        partner,
                    });
                };
                if !tables[position].paired_with.contains(&table.id) {
                    return Err(CatalogError::AsymmetricPairing {
                        table: table.id,
                        partner,
                    });
                }
            }
        }

        Ok(Self { tables, index })
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.index.get(&id).map(|&position| &self.tables[position])
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.index.contains_key(&id)
    }

    /// All tables in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Reservable tables in catalog order. Walk-in-only tables never appear
    /// in assignment output.
    pub fn all_reservable(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| t.reservable)
    }

    /// The pairing group of a table, including the table itself.
    ///
    /// Follows pairing links transitively, so a chain of declarations still
    /// forms one unit. Result is sorted for determinism. Unknown ids yield
    /// just themselves.
    pub fn pair_group_of(&self, id: TableId) -> Vec<TableId> {
        let mut group = vec![id];
        let mut cursor = 0;
        while cursor < group.len() {
            if let Some(table) = self.table(group[cursor]) {
                for &partner in &table.paired_with {
                    if !group.contains(&partner) {
                        group.push(partner);
                    }
                }
            }
            cursor += 1;
        }
        group.sort_unstable();
        group
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The built-in El Nopal dining room.
///
/// Singles 1-8 take walk-up parties of up to three; the 11/12, 13/14 and
/// 15/16 blocks merge for four to five guests; 20/21 and 22/25 are the large
/// blocks. Table 30 is the bar, walk-in only.
pub fn default_layout() -> Vec<Table> {
    let mut tables = Vec::new();

    for id in 1..=4 {
        tables.push(Table::new(id, 2, 3));
    }
    for id in 5..=8 {
        tables.push(Table::new(id, 4, 4));
    }

    for (a, b) in [(11, 12), (13, 14), (15, 16)] {
        tables.push(Table::new(a, 3, 4).paired(b));
        tables.push(Table::new(b, 3, 4).paired(a));
    }

    for (a, b) in [(20, 21), (22, 25)] {
        tables.push(Table::new(a, 4, 5).paired(b));
        tables.push(Table::new(b, 4, 5).paired(a));
    }

    tables.push(Table::new(30, 6, 6).walk_in_only());

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        let catalog = TableCatalog::new(default_layout()).unwrap();
        assert_eq!(catalog.len(), 15);
        // The bar never shows up as reservable
        assert!(catalog.all_reservable().all(|t| t.id != 30));
    }

    #[test]
    fn test_pair_group_is_reflexive_and_symmetric() {
        let catalog = TableCatalog::new(default_layout()).unwrap();
        assert_eq!(catalog.pair_group_of(11), vec![11, 12]);
        assert_eq!(catalog.pair_group_of(12), vec![11, 12]);
        assert_eq!(catalog.pair_group_of(5), vec![5]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let tables = vec![Table::new(1, 2, 2), Table::new(1, 4, 4)];
        assert!(matches!(
            TableCatalog::new(tables),
            Err(CatalogError::DuplicateTable(1))
        ));
    }

    #[test]
    fn test_rejects_one_sided_pairing() {
        let tables = vec![Table::new(11, 3, 4).paired(12), Table::new(12, 3, 4)];
        assert!(matches!(
            TableCatalog::new(tables),
            Err(CatalogError::AsymmetricPairing {
                table: 11,
                partner: 12
            })
        ));
    }

    #[test]
    fn test_rejects_dangling_pairing() {
        let tables = vec![Table::new(11, 3, 4).paired(99)];
        assert!(matches!(
            TableCatalog::new(tables),
            Err(CatalogError::UnknownPairing {
                table: 11,
                partner: 99
            })
        ));
    }

    #[test]
    fn test_rejects_capacity_above_max() {
        let tables = vec![Table::new(1, 5, 4)];
        assert!(matches!(
            TableCatalog::new(tables),
            Err(CatalogError::CapacityBound { table: 1, .. })
        ));
    }

    #[test]
    fn test_missing_max_capacity_defaults_to_capacity() {
        let table: Table = serde_json::from_str(
            r#"{"id": 3, "number": 3, "capacity": 4, "reservable": true}"#,
        )
        .unwrap();
        let catalog = TableCatalog::new(vec![table]).unwrap();
        assert_eq!(catalog.table(3).unwrap().max_capacity, 4);
    }
}
