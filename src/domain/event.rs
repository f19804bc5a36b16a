//! Ingestion trigger payload and the canonical request derived from it

use super::ids::{LocationId, ObjectKey};
use serde::{Deserialize, Serialize};

/// Source object format, decided by key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `.json` export that must be converted
    Json,
    /// `.csv` artifact forwarded unchanged
    Csv,
}

impl SourceFormat {
    /// Suffix recognised for this format
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Csv => ".csv",
        }
    }

    /// Detects the format from a key's suffix
    pub fn detect(key: &ObjectKey) -> Option<Self> {
        [Self::Json, Self::Csv]
            .into_iter()
            .find(|format| key.has_suffix(format.suffix()))
    }
}

/// Canonical request produced by the event adapter
///
/// Immutable once created: the key is non-empty and carries a recognised
/// suffix, which is why `format` can be derived infallibly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionRequest {
    source_location: LocationId,
    object_key: ObjectKey,
    format: SourceFormat,
}

impl IngestionRequest {
    /// Builds a request, rejecting keys without a recognised suffix
    pub fn new(source_location: LocationId, object_key: ObjectKey) -> Result<Self, String> {
        let format = SourceFormat::detect(&object_key).ok_or_else(|| {
            format!("Object key '{object_key}' has no recognised suffix (.json or .csv)")
        })?;
        Ok(Self {
            source_location,
            object_key,
            format,
        })
    }

    pub fn source_location(&self) -> &LocationId {
        &self.source_location
    }

    pub fn object_key(&self) -> &ObjectKey {
        &self.object_key
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }
}

/// Storage notification as delivered by the trigger infrastructure
///
/// `{ "Records": [ { "s3": { "bucket": { "name" }, "object": { "key" } } } ] }`
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records")]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEventRecord {
    pub s3: StorageEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_detects_format() {
        let location = LocationId::new("incoming").unwrap();
        let json = IngestionRequest::new(location.clone(), ObjectKey::new("a.json").unwrap());
        assert_eq!(json.unwrap().format(), SourceFormat::Json);

        let csv = IngestionRequest::new(location.clone(), ObjectKey::new("a.CSV").unwrap());
        assert_eq!(csv.unwrap().format(), SourceFormat::Csv);

        let other = IngestionRequest::new(location, ObjectKey::new("a.txt").unwrap());
        assert!(other.is_err());
    }

    #[test]
    fn test_storage_event_deserialize() {
        let raw = serde_json::json!({
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "incoming", "arn": "arn:aws:s3:::incoming" },
                    "object": { "key": "sales.json", "size": 42 }
                }
            }]
        });
        let event: StorageEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].s3.bucket.name, "incoming");
        assert_eq!(event.records[0].s3.object.key, "sales.json");
    }
}
