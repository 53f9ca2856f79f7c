//! Columnar table container and its positional JSON codec.
//!
//! The wire form is the compact positional layout:
//!
//! ```json
//! {
//!   "TableName": "PrimaryResult",
//!   "Columns": [{"ColumnName": "count", "DataType": "long"}],
//!   "Rows": [[42]]
//! }
//! ```
//!
//! Cells carry no per-cell type information; decoding is driven entirely
//! by the declared column `DataType`, via
//! [`parse_cell_value`](crate::codec::parse_cell_value).

use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, SerializeStruct, Serializer};

use crate::codec::{parse_cell_value, WireValue};
use crate::row::{ColumnInfo, Row};
use crate::value::{KType, KValue};

// ============================================================================
// Column definitions
// ============================================================================

/// A named, typed column in a table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ktype: KType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ktype: KType) -> Self {
        Self {
            name: name.into(),
            ktype,
        }
    }
}

/// Derives column definitions from materialized rows.
///
/// Column names and order come from the first row's schema. Each
/// column's type is taken from the first non-null value found scanning
/// down the column; a column that is null in every row defaults to
/// `dynamic`, the least constraining declaration.
pub fn infer_column_defs(rows: &[Row]) -> Vec<ColumnDef> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    first
        .schema()
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let ktype = rows
                .iter()
                .map(|row| row.get_at(i))
                .find(|v| !v.is_null())
                .map_or(KType::Dynamic, KValue::ktype);
            ColumnDef::new(name.clone(), ktype)
        })
        .collect()
}

// ============================================================================
// DataTable
// ============================================================================

/// A named result table: a column header plus materialized rows.
///
/// All rows share one [`ColumnInfo`] allocated at construction or
/// decode time.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

impl DataTable {
    /// Creates a table from explicit columns and cell vectors.
    ///
    /// Builds the shared schema once; every row points at it.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>, cells: Vec<Vec<KValue>>) -> Self {
        let schema = Arc::new(ColumnInfo::new(
            columns.iter().map(|c| c.name.clone()).collect(),
        ));
        let rows = cells
            .into_iter()
            .map(|values| Row::new(Arc::clone(&schema), values))
            .collect();
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Creates a table from rows, inferring the column header.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns: infer_column_defs(&rows),
            rows,
        }
    }
}

// Positional row serializer: each row becomes a bare cell array in
// column order.
struct RowsSer<'a>(&'a [Row]);

impl Serialize for RowsSer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut outer = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0 {
            outer.serialize_element(&CellsSer(row.values()))?;
        }
        outer.end()
    }
}

struct CellsSer<'a>(&'a [KValue]);

impl Serialize for CellsSer<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for value in self.0 {
            seq.serialize_element(&WireValue(value))?;
        }
        seq.end()
    }
}

struct WireColumn<'a>(&'a ColumnDef);

impl Serialize for WireColumn<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Column", 2)?;
        s.serialize_field("ColumnName", &self.0.name)?;
        s.serialize_field("DataType", self.0.ktype.as_str())?;
        s.end()
    }
}

impl Serialize for DataTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let columns: Vec<WireColumn<'_>> = self.columns.iter().map(WireColumn).collect();
        let mut table = serializer.serialize_struct("DataTable", 3)?;
        table.serialize_field("TableName", &self.name)?;
        table.serialize_field("Columns", &columns)?;
        table.serialize_field("Rows", &RowsSer(&self.rows))?;
        table.end()
    }
}

// Raw mirror of the wire layout; cells stay generic JSON until the
// header's types are known.
#[derive(serde::Deserialize)]
struct RawTable {
    #[serde(rename = "TableName", default)]
    table_name: String,
    #[serde(rename = "Columns", default)]
    columns: Vec<RawColumn>,
    #[serde(rename = "Rows", default)]
    rows: Vec<Vec<serde_json::Value>>,
}

#[derive(serde::Deserialize)]
struct RawColumn {
    #[serde(rename = "ColumnName", default)]
    column_name: String,
    #[serde(rename = "DataType", default)]
    data_type: String,
}

impl<'de> Deserialize<'de> for DataTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawTable::deserialize(deserializer)?;

        let columns: Vec<ColumnDef> = raw
            .columns
            .iter()
            .map(|c| ColumnDef::new(c.column_name.clone(), KType::parse(&c.data_type)))
            .collect();
        let schema = Arc::new(ColumnInfo::new(
            columns.iter().map(|c| c.name.clone()).collect(),
        ));

        let mut rows = Vec::with_capacity(raw.rows.len());
        for raw_row in &raw.rows {
            let mut values = Vec::with_capacity(columns.len());
            for (i, col) in columns.iter().enumerate() {
                // Short rows pad out with nulls.
                let cell = raw_row.get(i).unwrap_or(&serde_json::Value::Null);
                let value =
                    parse_cell_value(cell, col.ktype).map_err(serde::de::Error::custom)?;
                values.push(value);
            }
            rows.push(Row::new(Arc::clone(&schema), values));
        }

        Ok(DataTable {
            name: raw.table_name,
            columns,
            rows,
        })
    }
}
