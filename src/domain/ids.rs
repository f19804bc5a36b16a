//! Domain identifier types with validation
//!
//! Storage locations, object keys and BI resource identifiers are newtypes
//! so they can be validated once at startup and never mixed up afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generates a validated string newtype with the usual accessors
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal, $validate:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $label, ", validating its format")]
            pub fn new(value: impl Into<String>) -> Result<Self, String> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                let check: fn(&str) -> Result<(), String> = $validate;
                check(&value)?;
                Ok(Self(value))
            }

            #[doc = concat!("Returns the ", $label, " as a string slice")]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

fn no_slash(label: &'static str) -> impl Fn(&str) -> Result<(), String> {
    move |value: &str| {
        if value.contains('/') {
            Err(format!("{label} must not contain '/': {value}"))
        } else {
            Ok(())
        }
    }
}

fn require_arn(value: &str) -> Result<(), String> {
    let parts: Vec<&str> = value.splitn(6, ':').collect();
    if parts.len() < 6 || parts[0] != "arn" {
        return Err(format!(
            "Invalid ARN format. Expected arn:partition:service:region:account:resource, got: {value}"
        ));
    }
    Ok(())
}

string_id!(
    /// Storage location (bucket) identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use reportflow::domain::ids::LocationId;
    ///
    /// let location = LocationId::new("destinationbucket564333").unwrap();
    /// assert_eq!(location.as_str(), "destinationbucket564333");
    /// assert!(LocationId::new("a/b").is_err());
    /// ```
    LocationId,
    "Location ID",
    |value| no_slash("Location ID")(value)
);

string_id!(
    /// Key of an object inside a storage location
    ///
    /// Keys use `/` as a path separator. `..` segments are rejected so a key
    /// can never escape its location on path-based backends.
    ObjectKey,
    "Object key",
    |value| {
        if value.starts_with('/') {
            return Err(format!("Object key must not start with '/': {value}"));
        }
        if value.split('/').any(|segment| segment == "..") {
            return Err(format!("Object key must not contain '..' segments: {value}"));
        }
        Ok(())
    }
);

impl ObjectKey {
    /// Whether the key ends with `suffix`, ignoring ASCII case
    pub fn has_suffix(&self, suffix: &str) -> bool {
        let key = self.0.as_bytes();
        let suffix = suffix.as_bytes();
        key.len() >= suffix.len() && key[key.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
    }

    /// Final path segment of the key
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Replaces a trailing `from` suffix (ASCII case-insensitive) with `to`
    ///
    /// Returns `None` when the key does not end with `from`.
    pub fn replace_suffix(&self, from: &str, to: &str) -> Option<ObjectKey> {
        if !self.has_suffix(from) {
            return None;
        }
        let stem = &self.0[..self.0.len() - from.len()];
        Some(ObjectKey(format!("{stem}{to}")))
    }
}

string_id!(
    /// Fixed BI dataset identifier
    DatasetId,
    "Dataset ID",
    |value| no_slash("Dataset ID")(value)
);

string_id!(
    /// Fixed BI analysis identifier
    AnalysisId,
    "Analysis ID",
    |value| no_slash("Analysis ID")(value)
);

string_id!(
    /// Fixed BI dashboard identifier
    DashboardId,
    "Dashboard ID",
    |value| no_slash("Dashboard ID")(value)
);

string_id!(
    /// Cloud account identifier (digits only)
    AccountId,
    "Account ID",
    |value| {
        if value.chars().all(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(format!("Account ID must contain only digits: {value}"))
        }
    }
);

string_id!(
    /// Cloud region name, e.g. `us-east-1`
    Region,
    "Region",
    |value| {
        if value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            Ok(())
        } else {
            Err(format!("Invalid region name: {value}"))
        }
    }
);

string_id!(
    /// ARN of a notification topic
    TopicArn,
    "Topic ARN",
    require_arn
);

string_id!(
    /// ARN of a principal receiving permissions
    PrincipalArn,
    "Principal ARN",
    require_arn
);

string_id!(
    /// ARN of a BI resource (dataset, analysis, dashboard)
    ResourceArn,
    "Resource ARN",
    require_arn
);
