use super::{mode_power, mode_status, passthrough};
use crate::domain::{FieldKind, FieldValue, SemanticField, Snapshot, Unit};

const STATUSES: &[(&str, &str)] = &[
    ("P_FINISH", "Done"),
    ("P_WORKING", "Running"),
    ("P_SLEEP", "Sleep"),
    ("P_ONLINE_READY_WORK", "Ready"),
    ("P_IDLE", "Idle"),
];

pub static FIELDS: &[SemanticField] = &[
    SemanticField::new("power", "Power", FieldKind::Boolean, power),
    SemanticField::new("status", "Status", FieldKind::Label, status),
    SemanticField::new("cpu_temp", "CPU Temp", FieldKind::Numeric, cpu_temp).with_unit(Unit::DegreesCelsius),
    SemanticField::new("water_temp", "Water Temp", FieldKind::Numeric, water_temp).with_unit(Unit::DegreesCelsius),
    SemanticField::new("purifier", "Purifier", FieldKind::Numeric, purifier),
];

fn power(snapshot: &Snapshot) -> FieldValue {
    mode_power(snapshot, "STATUS")
}

fn status(snapshot: &Snapshot) -> FieldValue {
    mode_status(snapshot, "STATUS", STATUSES)
}

fn cpu_temp(snapshot: &Snapshot) -> FieldValue {
    passthrough(snapshot, "CPU_TEMP")
}

fn water_temp(snapshot: &Snapshot) -> FieldValue {
    passthrough(snapshot, "WATER_TEMP")
}

fn purifier(snapshot: &Snapshot) -> FieldValue {
    passthrough(snapshot, "Purifier")
}
