//! # kyanite-kql: typed value model and JSON codec for KQL query results
//!
//! This crate provides the data layer a KQL execution engine produces and
//! a client consumes: a typed scalar value model, order-preserving dynamic
//! containers, columnar result tables, and a bidirectional JSON codec.
//!
//! ## Value model
//!
//! [`KValue`] is a closed enum over the KQL scalar types:
//! - `bool`, `int` (32-bit), `long` (64-bit), `real` (f64)
//! - `string`, `datetime` (UTC), `timespan` (100 ns ticks), `guid`, `decimal`
//! - `dynamic` property bags and arrays
//!
//! Every variant carries an `Option` payload so a *typed* null (a long
//! column whose cell is null) is distinct from the *generic*
//! [`KValue::Null`]. Lookups that miss — an absent bag key, an unknown
//! column name, an out-of-range index — return the generic null rather
//! than an error.
//!
//! ## Wire formats
//!
//! Two JSON layouts are supported and share one serializer:
//! - the positional table format (`TableName` / `Columns` / `Rows`, cells
//!   typed by the column header), via [`DataTable`] / [`DataSet`] serde;
//! - the standalone type-tagged envelope (`{"type": "long", "value": 42}`),
//!   via [`marshal_kvalue`] / [`unmarshal_kvalue`].
//!
//! Integer columns decode through exact number tokens, never through an
//! f64 intermediate, so the full `long` range survives a round trip.
//!
//! ## Usage
//!
//! ```ignore
//! use kyanite_kql::{DataSet, KValue};
//!
//! let dataset: DataSet = serde_json::from_str(body)?;
//! let table = dataset.get_table("PrimaryResult").unwrap();
//! for row in &table.rows {
//!     match row.get("count") {
//!         KValue::Long(Some(n)) => println!("count = {n}"),
//!         other => println!("count = {other}"),
//!     }
//! }
//! ```

mod api;
mod codec;
mod dataset;
mod dynamic;
mod error;
mod row;
mod table;
mod timespan;
mod value;


pub use api::{SearchResponse, SubSearchJobResult, SubSearchRequest};
pub use codec::{marshal_kvalue, parse_cell_value, unmarshal_kvalue};
pub use dataset::DataSet;
pub use dynamic::{DynamicArray, DynamicBag, from_json_value, parse_dynamic_json};
pub use error::{KqlError, Result};
pub use row::{ColumnInfo, Row};
pub use table::{ColumnDef, DataTable, infer_column_defs};
pub use timespan::{format_timespan, parse_timespan};
pub use value::{KType, KValue, format_guid, parse_guid};
