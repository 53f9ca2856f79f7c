//! The top-level result container: an ordered list of named tables.

use serde::{Deserialize, Serialize};

use crate::table::DataTable;

/// A complete query result: zero or more tables, order preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(rename = "Tables", default)]
    pub tables: Vec<DataTable>,
}

impl DataSet {
    /// Creates an empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a table.
    pub fn add_table(&mut self, table: DataTable) {
        self.tables.push(table);
    }

    /// Returns the first table with the given name, case-sensitively.
    ///
    /// Conventionally the table of interest is `"PrimaryResult"`.
    pub fn get_table(&self, name: &str) -> Option<&DataTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}
