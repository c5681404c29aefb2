//! Table and JSON views over query results
//!
//! Both views are built from the same serialized records: each table cell is
//! rendered from the JSON value under the column's key, so the two output
//! modes never disagree on content.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// (column header, JSON key) pairs for observation records, in table order
pub const OBSERVATION_COLUMNS: [(&str, &str); 11] = [
    ("Common Name", "speciesCommonName"),
    ("Scientific Name", "speciesScientificName"),
    ("Species Code", "speciesCode"),
    ("Location Name", "locationName"),
    ("Location ID", "locationCode"),
    ("Date Observed", "observationDate"),
    ("How Many Observed", "count"),
    ("Latitude", "latitude"),
    ("Longitude", "longitude"),
    ("Notable", "isNotable"),
    ("ID Info", "idInfo"),
];

/// (column header, JSON key) pairs for hotspot listings, in table order
pub const HOTSPOT_COLUMNS: [(&str, &str); 6] = [
    ("Location ID", "code"),
    ("Location Name", "name"),
    ("Latitude", "latitude"),
    ("Longitude", "longitude"),
    ("Latest Observation Date", "latestObservationDate"),
    ("Number of Species", "speciesCount"),
];

/// Rows of text cells under fixed headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every cell of one column, by header
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == header)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            writeln!(f, "{}", line.join(" | ").trim_end())
        };

        write_row(f, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &self.rows {
            write_row(f, row)?;
        }
        Ok(())
    }
}

/// Result of a query in the shape the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Table(Table),
    Json(Vec<Value>),
}

impl QueryOutput {
    /// Serialize `items` and shape them as a table or a list of JSON objects
    pub fn build<T: Serialize>(
        items: &[T],
        columns: &[(&str, &str)],
        as_json: bool,
    ) -> Result<Self> {
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;

        if as_json {
            return Ok(Self::Json(values));
        }

        let rows = values
            .iter()
            .map(|value| {
                columns
                    .iter()
                    .map(|(_, key)| cell_text(value.get(*key)))
                    .collect()
            })
            .collect();

        Ok(Self::Table(Table {
            columns: columns.iter().map(|(header, _)| header.to_string()).collect(),
            rows,
        }))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Table(table) => table.len(),
            Self::Json(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            Self::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&[Value]> {
        match self {
            Self::Json(values) => Some(values),
            Self::Table(_) => None,
        }
    }
}

/// Text form of a JSON value as shown in a table cell; null is empty
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
