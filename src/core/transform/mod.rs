//! Format transformer: JSON export to the fixed three-column table
//!
//! The source must be UTF-8 text holding a JSON array of objects, each with
//! `date`, `product` and `sales`. Conversion is all-or-nothing: the first
//! bad record aborts with its index and no artifact is produced.

pub mod encode;

pub use encode::to_csv;

use crate::domain::{ReportflowError, Result, Row, SalesAmount, TabularArtifact};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

/// Converts raw source bytes into a [`TabularArtifact`]
///
/// # Errors
///
/// - [`ReportflowError::Decode`] when the bytes are not UTF-8 JSON or the
///   top-level value is not an array
/// - [`ReportflowError::Schema`] naming the first record that is not an
///   object, lacks a field or carries an unusable value
///
/// # Examples
///
/// ```
/// use reportflow::core::transform::{convert, to_csv};
///
/// let artifact = convert(br#"[{"date":"2024-01-01","product":"Widget","sales":9.99}]"#).unwrap();
/// let csv = to_csv(&artifact).unwrap();
/// assert_eq!(csv, b"date,product,sales\n2024-01-01,Widget,9.99\n");
/// ```
pub fn convert(raw: &[u8]) -> Result<TabularArtifact> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ReportflowError::Decode(format!("source is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let value: Value = serde_json::from_str(text)
        .map_err(|e| ReportflowError::Decode(format!("source is not valid JSON: {e}")))?;

    let records = match value {
        Value::Array(records) => records,
        other => {
            return Err(ReportflowError::Decode(format!(
                "top-level JSON value must be an array, found {}",
                value_kind(&other)
            )))
        }
    };

    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| convert_record(index, record))
        .collect::<Result<Vec<_>>>()?;

    Ok(TabularArtifact::new(rows))
}

fn convert_record(index: usize, record: &Value) -> Result<Row> {
    let object = record.as_object().ok_or_else(|| ReportflowError::Schema {
        index,
        message: format!("record must be an object, found {}", value_kind(record)),
    })?;

    let date = text_field(index, object, "date")?;
    let product = text_field(index, object, "product")?;
    let sales = sales_field(index, object, "sales")?;

    Ok(Row::new(date, product, sales))
}

fn required<'a>(index: usize, object: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    object.get(name).ok_or_else(|| ReportflowError::Schema {
        index,
        message: format!("missing field '{name}'"),
    })
}

/// Strings verbatim, numbers and booleans as their JSON text
fn text_field(index: usize, object: &Map<String, Value>, name: &str) -> Result<String> {
    match required(index, object, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ReportflowError::Schema {
            index,
            message: format!("field '{name}' must be a scalar, found {}", value_kind(other)),
        }),
    }
}

fn sales_field(index: usize, object: &Map<String, Value>, name: &str) -> Result<SalesAmount> {
    let value = required(index, object, name)?;
    let text = match value {
        // Source text of the number, digits and exponent as written
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(ReportflowError::Schema {
                index,
                message: format!("field '{name}' must be numeric, found {}", value_kind(other)),
            })
        }
    };

    parse_amount(&text).ok_or_else(|| ReportflowError::Schema {
        index,
        message: format!("field '{name}' is not a decimal number: '{text}'"),
    })
}

/// Parses an amount without rounding
///
/// Plain notation keeps its written scale. Numbers a [`Decimal`] cannot hold
/// exactly are kept as text when they are valid JSON numbers.
fn parse_amount(text: &str) -> Option<SalesAmount> {
    if let Ok(exact) = Decimal::from_str_exact(text) {
        return Some(SalesAmount::Exact(exact));
    }
    if text.contains(['e', 'E']) {
        if let Ok(exact) = Decimal::from_scientific(text) {
            return Some(SalesAmount::Exact(exact));
        }
    }
    serde_json::from_str::<Number>(text)
        .ok()
        .map(|_| SalesAmount::Verbatim(text.to_string()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
