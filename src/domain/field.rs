use crate::domain::device_family::DeviceFamily;
use crate::domain::number::Number;
use crate::domain::snapshot::Snapshot;
use serde_json::Value;
use std::fmt::{Debug, Display, Formatter};

/// A value derived from a snapshot. Stateless: `read` is recomputed on every access and never
/// performs I/O.
pub struct SemanticField {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: FieldKind,
    pub unit: Option<Unit>,
    pub read: fn(&Snapshot) -> FieldValue,
}

impl SemanticField {
    pub const fn new(key: &'static str, name: &'static str, kind: FieldKind, read: fn(&Snapshot) -> FieldValue) -> Self {
        SemanticField {
            key,
            name,
            kind,
            unit: None,
            read,
        }
    }

    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn read(&self, snapshot: &Snapshot) -> FieldValue {
        (self.read)(snapshot)
    }

    pub fn unique_id(&self, entry_id: &str) -> String {
        format!("{}_{}", entry_id, self.key)
    }

    pub fn object_id(&self, family: DeviceFamily) -> String {
        format!("{}_{}", family.as_str(), self.key)
    }
}

impl Debug for SemanticField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticField")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("unit", &self.unit)
            .finish()
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum FieldKind {
    Boolean,
    Numeric,
    Label,
    Text,
}

#[derive(PartialEq, Debug, Clone)]
pub enum FieldValue {
    Boolean(bool),
    Number(Number),
    Label(String),
    Text(String),
    Unknown,
}

impl FieldValue {
    pub fn label(label: &str) -> Self {
        FieldValue::Label(label.to_string())
    }

    /// Passes a raw device value through unchanged where it has a scalar representation.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => Number::from_json(n).map_or(FieldValue::Unknown, FieldValue::Number),
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Bool(b)) => FieldValue::Boolean(*b),
            _ => FieldValue::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Boolean(true) => f.write_str("on"),
            FieldValue::Boolean(false) => f.write_str("off"),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Label(s) | FieldValue::Text(s) => f.write_str(s),
            FieldValue::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Unit {
    Percentage,
    DegreesCelsius,
    Seconds,
    Milliampere,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Percentage => "%",
            Unit::DegreesCelsius => "°C",
            Unit::Seconds => "s",
            Unit::Milliampere => "mA",
        }
    }
}
