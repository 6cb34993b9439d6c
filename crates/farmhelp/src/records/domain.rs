use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

const RECORD_ID_LEN: usize = 24;

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Document identifier shaped like a document-store object id: 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ID format")]
pub struct InvalidRecordId;

impl RecordId {
    /// Creation second followed by a process-wide sequence number.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp().max(0) as u32;
        let sequence = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{seconds:08x}{sequence:016x}"))
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidRecordId> {
        let valid = raw.len() == RECORD_ID_LEN && raw.bytes().all(|byte| byte.is_ascii_hexdigit());
        if valid {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidRecordId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted document. Serializes flat with the id under `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub document: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
}

/// Farmer record as entered by admins. Farms are keyed `farm_1`, `farm_2`, ...
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farms: Option<BTreeMap<String, Farm>>,
}

impl Farmer {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every field present in `patch`; an explicit `null` clears the field and
    /// `farms` is replaced wholesale.
    pub fn apply(&mut self, patch: FarmerPatch) {
        let FarmerPatch {
            name,
            mobile_no,
            home_address,
            call_language,
            farms,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(mobile_no) = mobile_no {
            self.mobile_no = mobile_no;
        }
        if let Some(home_address) = home_address {
            self.home_address = home_address;
        }
        if let Some(call_language) = call_language {
            self.call_language = call_language;
        }
        if let Some(farms) = farms {
            self.farms = farms;
        }
    }
}

/// Partial farmer update. The outer `Option` records whether the field was sent at all, the
/// inner one whether it was sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FarmerPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub mobile_no: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub home_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub call_language: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub farms: Option<Option<BTreeMap<String, Farm>>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FarmerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub name: String,
    pub mobile_no: String,
    pub home_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub mobile_no: String,
    pub problem: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_ids_are_valid_and_unique() {
        let first = RecordId::generate();
        let second = RecordId::generate();
        assert_ne!(first, second);
        assert_eq!(RecordId::parse(first.as_str()), Ok(first));
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        assert!(RecordId::parse("65f1c0ffee0000000000abcd").is_ok());
        assert_eq!(
            RecordId::parse("65F1C0FFEE0000000000ABCD").map(|id| id.to_string()),
            Ok("65f1c0ffee0000000000abcd".to_string())
        );
        for raw in ["", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "65f1c0ffee0000000000abcd00"] {
            assert_eq!(RecordId::parse(raw), Err(InvalidRecordId), "input {raw:?}");
        }
    }

    #[test]
    fn stored_documents_flatten_with_object_id() {
        let stored = Stored {
            id: RecordId::parse("65f1c0ffee0000000000abcd").expect("valid id"),
            document: ContactForm {
                name: "Asha".to_string(),
                mobile_no: "9800000000".to_string(),
                problem: "Pump failure".to_string(),
            },
        };
        let value = serde_json::to_value(&stored).expect("serializes");
        assert_eq!(
            value,
            json!({
                "_id": "65f1c0ffee0000000000abcd",
                "name": "Asha",
                "mobile_no": "9800000000",
                "problem": "Pump failure",
            })
        );
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut farmer: Farmer = serde_json::from_value(json!({
            "name": "Ravi",
            "mobile_no": "9811111111",
            "farms": { "farm_1": { "location": "Upper terrace", "sensor_id": "s-1" } }
        }))
        .expect("farmer parses");

        let patch: FarmerPatch = serde_json::from_value(json!({
            "call_language": "Nepali",
            "farms": { "farm_2": { "location": "River bank" } }
        }))
        .expect("patch parses");
        farmer.apply(patch);

        assert_eq!(farmer.name.as_deref(), Some("Ravi"));
        assert_eq!(farmer.call_language.as_deref(), Some("Nepali"));
        let farms = farmer.farms.expect("farms kept");
        assert_eq!(farms.len(), 1);
        assert!(farms.contains_key("farm_2"));
    }

    #[test]
    fn empty_documents_are_detected() {
        let farmer: Farmer = serde_json::from_value(json!({})).expect("parses");
        assert!(farmer.is_empty());
        let patch: FarmerPatch = serde_json::from_value(json!({})).expect("parses");
        assert!(patch.is_empty());
    }

    #[test]
    fn explicit_null_clears_the_field() {
        let mut farmer: Farmer = serde_json::from_value(json!({
            "name": "Ravi",
            "home_address": "Namchi",
        }))
        .expect("farmer parses");

        let patch: FarmerPatch = serde_json::from_value(json!({ "name": null })).expect("parses");
        assert!(!patch.is_empty());
        assert_eq!(patch.name, Some(None));
        assert_eq!(patch.home_address, None);

        farmer.apply(patch);
        assert_eq!(farmer.name, None);
        assert_eq!(farmer.home_address.as_deref(), Some("Namchi"));
    }
}
