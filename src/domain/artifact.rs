//! Tabular artifacts and handles to persisted objects

use super::ids::{LocationId, ObjectKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed header row of every tabular artifact
pub const HEADER: [&str; 3] = ["date", "product", "sales"];

/// Value of the `sales` column
///
/// Amounts that fit a [`Decimal`] exactly keep their written scale. Numbers
/// outside that range are carried as their original JSON text, so no amount
/// is rounded or rejected for its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalesAmount {
    Exact(Decimal),
    Verbatim(String),
}

impl SalesAmount {
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Self::Exact(d) => Some(d),
            Self::Verbatim(_) => None,
        }
    }
}

impl From<Decimal> for SalesAmount {
    fn from(value: Decimal) -> Self {
        Self::Exact(value)
    }
}

impl fmt::Display for SalesAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(d) => write!(f, "{d}"),
            Self::Verbatim(text) => f.write_str(text),
        }
    }
}

/// One report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub date: String,
    pub product: String,
    pub sales: SalesAmount,
}

impl Row {
    pub fn new(
        date: impl Into<String>,
        product: impl Into<String>,
        sales: impl Into<SalesAmount>,
    ) -> Self {
        Self {
            date: date.into(),
            product: product.into(),
            sales: sales.into(),
        }
    }
}

/// Ordered rows of the fixed three-column shape
///
/// Row order is input order and becomes report row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularArtifact {
    rows: Vec<Row>,
}

impl TabularArtifact {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> [&'static str; 3] {
        HEADER
    }
}

/// Handle to an artifact persisted in the storage backend
///
/// Stages only ever hand each other these references, never in-memory bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredObjectRef {
    pub location: LocationId,
    pub key: ObjectKey,
}

impl StoredObjectRef {
    pub fn new(location: LocationId, key: ObjectKey) -> Self {
        Self { location, key }
    }
}

impl fmt::Display for StoredObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.location, self.key)
    }
}
