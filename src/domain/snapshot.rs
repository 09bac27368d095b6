use crate::extensions::json_value_ext::JsonValueExt;
use serde_json::{Map, Value};

pub const UNAVAILABLE_KEY: &str = "unavailable";

/// Everything known about one device as of the last poll: a flat mapping of top-level keys to
/// the JSON the device reported. Replaced wholesale by every poll.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    pub fn empty() -> Self {
        Snapshot(Map::new())
    }

    /// The sentinel for a device that could not be reached at all.
    pub fn unavailable() -> Self {
        let mut map = Map::with_capacity(1);
        map.insert(UNAVAILABLE_KEY.to_string(), Value::Bool(true));
        Snapshot(map)
    }

    pub fn is_unavailable(&self) -> bool {
        self.0.get(UNAVAILABLE_KEY).is_some_and(Value::is_truthy)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn extend(&mut self, values: Map<String, Value>) {
        self.0.extend(values);
    }

    /// Returns a copy of this snapshot with only `key` replaced.
    pub fn patched(&self, key: &str, value: Value) -> Snapshot {
        let mut map = self.0.clone();
        map.insert(key.to_string(), value);
        Snapshot(map)
    }

    /// Returns the object stored under `key`, or `None` when the device is unavailable or the
    /// key is missing, empty or not an object.
    pub fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        if self.is_unavailable() {
            return None;
        }

        match self.0.get(key) {
            Some(Value::Object(section)) if !section.is_empty() => Some(section),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Snapshot {
    fn from(map: Map<String, Value>) -> Self {
        Snapshot(map)
    }
}
