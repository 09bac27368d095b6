mod m1;
pub mod m1_ultra;
mod status_document;

use crate::domain::{DeviceFamily, FieldValue, SemanticField, Snapshot};
use crate::extensions::json_value_ext::JsonValueExt;
use serde_json::Value;

pub const UNKNOWN: &str = "Unknown";
pub const UNAVAILABLE: &str = "Unavailable";

/// Returns the fields a device of the given family exposes.
pub fn fields_for(family: DeviceFamily) -> &'static [SemanticField] {
    match family {
        DeviceFamily::P2 | DeviceFamily::F1 | DeviceFamily::Apparel => status_document::FIELDS,
        DeviceFamily::M1 => m1::FIELDS,
        DeviceFamily::M1Ultra => m1_ultra::FIELDS,
    }
}

fn lookup<K: PartialEq>(table: &[(K, &'static str)], key: &K) -> &'static str {
    table.iter().find(|(k, _)| k == key).map_or(UNKNOWN, |(_, label)| *label)
}

fn lookup_code(table: &[(i64, &'static str)], value: Option<&Value>) -> FieldValue {
    match value.and_then(Value::as_code) {
        Some(code) => FieldValue::label(lookup(table, &code)),
        None => FieldValue::label(UNKNOWN),
    }
}

fn upper_trimmed(value: Option<&Value>) -> String {
    value.and_then(Value::trimmed_string).unwrap_or_default().to_uppercase()
}

/// Power for the models that report a single mode string at the top level of `/status`.
fn mode_power(snapshot: &Snapshot, key: &str) -> FieldValue {
    if snapshot.is_unavailable() {
        return FieldValue::Boolean(false);
    }

    FieldValue::Boolean(!upper_trimmed(snapshot.get(key)).is_empty())
}

fn mode_status(snapshot: &Snapshot, key: &str, table: &[(&str, &'static str)]) -> FieldValue {
    if snapshot.is_unavailable() {
        return FieldValue::label(UNAVAILABLE);
    }

    let mode = upper_trimmed(snapshot.get(key));
    if mode.is_empty() {
        return FieldValue::label(UNKNOWN);
    }

    FieldValue::label(lookup(table, &mode.as_str()))
}

fn passthrough(snapshot: &Snapshot, key: &str) -> FieldValue {
    if snapshot.is_unavailable() {
        return FieldValue::Unknown;
    }

    FieldValue::from_json(snapshot.get(key))
}
