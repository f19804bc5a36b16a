//! Event adapter: storage notification to [`IngestionRequest`]
//!
//! Only the first record of a notification is honoured. Object keys arrive
//! URL-encoded (`+` for space, `%XX` escapes) and are decoded before the
//! suffix is checked. Parsing never touches storage.

use crate::domain::ids::{LocationId, ObjectKey};
use crate::domain::{IngestionRequest, ReportflowError, Result, StorageEvent};
use serde_json::Value;
use percent_encoding::percent_decode_str;

/// Parses a raw trigger payload into a canonical request
///
/// # Errors
///
/// Returns [`ReportflowError::MalformedEvent`] when `Records` is missing or
/// empty, the first record lacks its bucket name or object key, or the key
/// is unusable (empty, `..` segments, no `.json`/`.csv` suffix).
///
/// # Examples
///
/// ```
/// use reportflow::core::ingest::parse_event;
/// use reportflow::domain::SourceFormat;
///
/// let event = serde_json::json!({
///     "Records": [{ "s3": { "bucket": { "name": "incoming" }, "object": { "key": "q1+sales.json" } } }]
/// });
/// let request = parse_event(&event).unwrap();
/// assert_eq!(request.object_key().as_str(), "q1 sales.json");
/// assert_eq!(request.format(), SourceFormat::Json);
/// ```
pub fn parse_event(raw: &Value) -> Result<IngestionRequest> {
    let event: StorageEvent = serde_json::from_value(raw.clone())
        .map_err(|e| ReportflowError::MalformedEvent(format!("unexpected event shape: {e}")))?;

    let record = event
        .records
        .first()
        .ok_or_else(|| ReportflowError::MalformedEvent("event has no records".to_string()))?;

    if event.records.len() > 1 {
        tracing::warn!(
            records = event.records.len(),
            "Event carries several records, only the first is processed"
        );
    }

    let location = LocationId::new(record.s3.bucket.name.as_str())
        .map_err(|e| ReportflowError::MalformedEvent(format!("invalid bucket name: {e}")))?;

    let decoded = decode_key(&record.s3.object.key);
    let key = ObjectKey::new(decoded)
        .map_err(|e| ReportflowError::MalformedEvent(format!("invalid object key: {e}")))?;

    let request = IngestionRequest::new(location, key).map_err(ReportflowError::MalformedEvent)?;

    tracing::debug!(
        location = %request.source_location(),
        key = %request.object_key(),
        format = ?request.format(),
        "Parsed ingestion event"
    );

    Ok(request)
}

/// Decodes a form-urlencoded object key
///
/// `+` becomes a space before percent escapes are resolved, so an escaped
/// `%2B` stays a plus. Every other byte of the key is kept as written.
fn decode_key(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
