// SPDX-License-Identifier: Apache-2.0

//! Turning time-series replies into tables.
//!
//! A time-series reply payload is a map from series name to a columns map
//! (column name to array of values). [parse_reply] lifts that into one
//! [Table] per series, preserving the order the service sent them in. It is
//! a pure function: no I/O, and repeated calls on the same reply yield
//! structurally identical tables.

use crate::error::TableError;
use crate::proto::{Reply, Value};

/// One series' worth of tabular data: an ordered mapping from column name to
/// the column's values, tagged with the series name it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    series: String,
    columns: Vec<(String, Vec<Value>)>,
}

impl Table {
    /// Name of the series this table holds.
    pub fn series(&self) -> &str {
        &self.series
    }

    /// Column names, in the order the reply listed them.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// The values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Row count: the length of the longest column.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convert a time-series [Reply] into one [Table] per series.
///
/// An empty payload map yields an empty vec, not an error. A reply carrying
/// a service-side error yields [TableError::Service]; a payload that is not
/// a map of maps of arrays yields [TableError::Shape].
pub fn parse_reply(reply: &Reply) -> Result<Vec<Table>, TableError> {
    let payload = match reply.result() {
        Ok(value) => value,
        Err(e) => return Err(TableError::Service(e.clone())),
    };
    let series = match payload {
        Value::Map(entries) => entries,
        _ => return Err(TableError::Shape("payload is not a map of series")),
    };
    series.iter().map(|(name, columns)| parse_series(name, columns)).collect()
}

fn parse_series(name: &Value, columns: &Value) -> Result<Table, TableError> {
    let series = match name {
        Value::Text(s) => s.clone(),
        _ => return Err(TableError::Shape("series name is not text")),
    };
    let entries = match columns {
        Value::Map(entries) => entries,
        _ => return Err(TableError::Shape("series body is not a column map")),
    };
    let columns = entries
        .iter()
        .map(|(name, values)| match (name, values) {
            (Value::Text(n), Value::Array(v)) => Ok((n.clone(), v.clone())),
            (Value::Text(_), _) => Err(TableError::Shape("column values are not an array")),
            _ => Err(TableError::Shape("column name is not text")),
        })
        .collect::<Result<_, _>>()?;
    Ok(Table { series, columns })
}
