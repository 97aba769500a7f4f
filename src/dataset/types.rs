use std::collections::HashMap;

use crate::table::EventTable;

/// Identity of a dataset column: the `occurrence`-th column labeled `label`.
///
/// Channels without a marker all share the empty label, so the label alone
/// does not identify a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    /// Column label (marker name, possibly empty)
    pub label: String,
    /// 0-based occurrence of this label within its table
    pub occurrence: usize,
}

#[derive(Debug, Clone)]
struct PlacedTable {
    table: EventTable,
    /// Dataset column of each table column
    positions: Vec<usize>,
}

/// Row-wise concatenation of well tables.
///
/// Columns are the union of every table's columns in first-appearance order;
/// a row from a table lacking a column holds a missing value there.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<ColumnKey>,
    index: HashMap<ColumnKey, usize>,
    tables: Vec<PlacedTable>,
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow<'a> {
    /// Value per dataset column, `None` where the source table lacks it
    pub values: Vec<Option<f64>>,
    /// Well identifier of the source file
    pub well: &'a str,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack a table below the rows already present
    pub fn push(&mut self, table: EventTable) {
        let positions = {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            let mut positions = Vec::with_capacity(table.columns());

            for label in table.labels() {
                let occurrence = seen.entry(label).or_insert(0);
                let key = ColumnKey {
                    label: label.to_string(),
                    occurrence: *occurrence,
                };
                *occurrence += 1;
                positions.push(self.position_of(key));
            }
            positions
        };

        self.tables.push(PlacedTable { table, positions });
    }

    fn position_of(&mut self, key: ColumnKey) -> usize {
        if let Some(&position) = self.index.get(&key) {
            return position;
        }
        let position = self.columns.len();
        self.columns.push(key.clone());
        self.index.insert(key, position);
        position
    }

    /// Column identities in output order
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Column labels in output order
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.label.as_str())
    }

    /// Stacked tables in insertion order
    pub fn tables(&self) -> impl Iterator<Item = &EventTable> + '_ {
        self.tables.iter().map(|p| &p.table)
    }

    /// Number of stacked tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Total number of rows
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|p| p.table.rows()).sum()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Iterate rows, table by table
    pub fn rows(&self) -> impl Iterator<Item = DatasetRow<'_>> + '_ {
        let width = self.columns.len();
        self.tables.iter().flat_map(move |placed| {
            placed.table.matrix().iter_rows().map(move |event| {
                let mut values = vec![None; width];
                for (&position, &value) in placed.positions.iter().zip(event) {
                    values[position] = Some(value);
                }
                DatasetRow {
                    values,
                    well: placed.table.well(),
                }
            })
        })
    }
}

impl FromIterator<EventTable> for Dataset {
    fn from_iter<I: IntoIterator<Item = EventTable>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for table in iter {
            dataset.push(table);
        }
        dataset
    }
}
