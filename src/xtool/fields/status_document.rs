//! Fields of the P2, F1 and Apparel Printer, which report their state as a flat `/status`
//! document with a `mode` string.

use super::{mode_power, mode_status};
use crate::domain::{FieldKind, FieldValue, SemanticField, Snapshot};

const MODES: &[(&str, &str)] = &[("P_WORK_DONE", "Done"), ("WORK", "Running"), ("P_SLEEP", "Sleep"), ("P_IDLE", "Idle")];

pub static FIELDS: &[SemanticField] = &[
    SemanticField::new("power", "Power", FieldKind::Boolean, power),
    SemanticField::new("status", "Status", FieldKind::Label, status),
];

fn power(snapshot: &Snapshot) -> FieldValue {
    mode_power(snapshot, "mode")
}

fn status(snapshot: &Snapshot) -> FieldValue {
    mode_status(snapshot, "mode", MODES)
}
