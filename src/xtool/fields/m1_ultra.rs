//! Fields of the M1 Ultra, read from the per-peripheral sections of the snapshot.
//!
//! Several binary sensors report the opposite of the raw `state` flag: the lid and the hatch
//! are open when their switch reads `"off"`, and the carriage lock is unlocked at
//! `drivingLock == 0`. The polarity of each field follows the hardware and is kept per field.

use super::{UNAVAILABLE, UNKNOWN, lookup_code, upper_trimmed};
use crate::domain::{FieldKind, FieldValue, Number, SemanticField, Snapshot, Unit};
use crate::extensions::json_value_ext::JsonValueExt;
use crate::xtool::endpoint::{
    ADSORPTION_MAT, AIRASSIST, CONFIG, DRAWER, EXT_PURIFIER, GAP, HEIGHTEN, INKJET_PRINTER, KNIFE_HEAD, MACHINE_INFO, MACHINE_LOCK,
    POSITION, RUNNING_STATUS, SMOKING_FAN, WORKHEAD_ID, WORKING_INFO, Z_NTC_TEMP,
};
use serde_json::Value;

/// Tool id of the multi-function module in the multi-function carriage.
pub const MULTI_FUNCTION_MODULE: i64 = 29;

const MODES: &[(&str, &str)] = &[
    ("P_IDLE", "Idle"),
    ("P_MEASURE", "Probing"),
    ("P_SLEEP", "Sleep"),
    ("WORK_WORKREADY", "Ready"),
    ("WORK_WORKING", "Running"),
    ("WORK_WORKPAUSE", "Paused"),
];

const BASIC_CARRIAGE_TOOLS: &[(i64, &str)] = &[(41, "Empty"), (42, "Drawing Pen"), (43, "Fine-Point Blade"), (44, "Hot Foil Pen")];

const MULTI_FUNCTION_CARRIAGE_TOOLS: &[(i64, &str)] = &[
    (0, "Empty"),
    (15, "10W Laser Module"),
    (MULTI_FUNCTION_MODULE, "Multi-function Module"),
    (31, "Ink Module"),
];

const MULTI_FUNCTION_MODULE_TOOLS: &[(i64, &str)] = &[(22, "Foil Transfer Tip"), (23, "Cutting Blade"), (24, "Rotary Blade")];

const EXHAUST_FAN_LEVELS: &[(i64, i64)] = &[(0, 0), (105, 1), (150, 2), (200, 3), (255, 4)];

pub static FIELDS: &[SemanticField] = &[
    SemanticField::new("power", "Power", FieldKind::Boolean, power),
    SemanticField::new("status", "Status", FieldKind::Label, status),
    // Sensors
    SemanticField::new("cpu_temp", "CPU Temp", FieldKind::Numeric, cpu_temp).with_unit(Unit::DegreesCelsius),
    SemanticField::new("basic_carriage", "Basic Carriage", FieldKind::Label, basic_carriage),
    SemanticField::new("multi_function_carriage", "Multi-function Carriage", FieldKind::Label, multi_function_carriage),
    SemanticField::new("multi_function_module_tool", "Multi-function Module Tool", FieldKind::Label, multi_function_module_tool),
    SemanticField::new("operating_times_online", "Operating Times (Online)", FieldKind::Numeric, operating_times_online),
    SemanticField::new("operating_times_offline", "Operating Times (Offline)", FieldKind::Numeric, operating_times_offline),
    SemanticField::new("standby_time", "Standby Time", FieldKind::Numeric, standby_time).with_unit(Unit::Seconds),
    SemanticField::new("operating_time", "Operating Time", FieldKind::Numeric, operating_time).with_unit(Unit::Seconds),
    SemanticField::new("exhaust_fan_current", "Exhaust Fan Current", FieldKind::Numeric, exhaust_fan_current).with_unit(Unit::Milliampere),
    SemanticField::new("exhaust_fan_level", "Exhaust Fan Level", FieldKind::Numeric, exhaust_fan_level),
    SemanticField::new("airassist_level", "Air Assist Level", FieldKind::Numeric, airassist_level),
    SemanticField::new("position_x", "Position X", FieldKind::Numeric, position_x),
    SemanticField::new("position_y", "Position Y", FieldKind::Numeric, position_y),
    SemanticField::new("z_ntc_temp", "Z NTC Output Temp", FieldKind::Numeric, z_ntc_temp).with_unit(Unit::DegreesCelsius),
    SemanticField::new("wifi_ip_address", "WiFi IP Address", FieldKind::Text, wifi_ip_address),
    SemanticField::new("mac_address", "MAC Address", FieldKind::Text, mac_address),
    SemanticField::new("serial_number", "Serial Number", FieldKind::Text, serial_number),
    SemanticField::new("fill_light_brightness", "Fill Light Brightness", FieldKind::Numeric, fill_light_brightness).with_unit(Unit::Percentage),
    // Binary sensors
    SemanticField::new("baseplate", "Baseplate", FieldKind::Boolean, baseplate),
    SemanticField::new("lid", "Lid", FieldKind::Boolean, lid),
    SemanticField::new("hatch", "Hatch", FieldKind::Boolean, hatch),
    SemanticField::new("usb_machine_lock", "USB Machine Lock", FieldKind::Boolean, usb_machine_lock),
    SemanticField::new("raiser", "Raiser", FieldKind::Boolean, raiser),
    SemanticField::new("ink_module_cable", "Ink Module Cable", FieldKind::Boolean, ink_module_cable),
    SemanticField::new("electrostatic_mat", "Electrostatic Mat", FieldKind::Boolean, electrostatic_mat),
    SemanticField::new("electrostatic_mat_static", "Electrostatic Mat Static", FieldKind::Boolean, electrostatic_mat_static),
    SemanticField::new("air_assist", "Air Assist", FieldKind::Boolean, air_assist),
    SemanticField::new("external_purifier", "External Purifier", FieldKind::Boolean, external_purifier),
    SemanticField::new("external_purifier_state", "External Purifier", FieldKind::Boolean, external_purifier_state),
    SemanticField::new("exhaust_fan_state", "Exhaust Fan State", FieldKind::Boolean, exhaust_fan_state),
    SemanticField::new("exhaust_fan", "Exhaust Fan", FieldKind::Boolean, exhaust_fan),
    SemanticField::new("multi_function_carriage_lock", "Multi-function Carriage Lock", FieldKind::Boolean, multi_function_carriage_lock),
    // Switches
    SemanticField::new("exhaust_fan_switch", "Exhaust Fan", FieldKind::Boolean, exhaust_fan_switch),
];

fn current_mode(snapshot: &Snapshot) -> Option<&Value> {
    snapshot.section(RUNNING_STATUS)?.get("curMode").filter(|mode| mode.is_truthy())
}

fn section_value(snapshot: &Snapshot, key: &str, field: &str) -> FieldValue {
    match snapshot.section(key) {
        Some(section) => FieldValue::from_json(section.get(field)),
        None => FieldValue::Unknown,
    }
}

fn state_equals(snapshot: &Snapshot, key: &str, field: &str, expected: &str) -> FieldValue {
    let matches = snapshot
        .section(key)
        .and_then(|section| section.get(field))
        .is_some_and(|value| value.as_str() == Some(expected));

    FieldValue::Boolean(matches)
}

/// `enSta` only carries meaning while the peripheral itself reports `state == "on"`.
fn enabled_while_on(snapshot: &Snapshot, key: &str) -> FieldValue {
    let enabled = snapshot
        .section(key)
        .filter(|section| section.get("state").and_then(Value::as_str) == Some("on"))
        .and_then(|section| section.get("enSta"))
        .is_some_and(Value::is_true);

    FieldValue::Boolean(enabled)
}

fn plugged_in(snapshot: &Snapshot, key: &str) -> FieldValue {
    let exists = snapshot.section(key).and_then(|section| section.get("exist")).is_some_and(Value::is_true);

    FieldValue::Boolean(exists)
}

/// Combines the primary mode and the sub-mode reported by the running status into one label.
pub fn composite_mode_label(mode: &str, sub_mode: &str) -> String {
    let primary = if mode.is_empty() { None } else { Some(lookup_mode(mode)) };

    match (primary, sub_mode.is_empty()) {
        (Some(primary), false) => format!("{}_{}", primary, sub_mode),
        (None, false) => sub_mode.to_string(),
        (Some(primary), true) => primary.to_string(),
        (None, true) => UNKNOWN.to_string(),
    }
}

// Unmapped modes are reported verbatim rather than as "Unknown".
fn lookup_mode(mode: &str) -> &str {
    MODES.iter().find(|(code, _)| *code == mode).map_or(mode, |(_, label)| *label)
}

/// Maps the raw exhaust fan current onto its speed level, 0 for readings outside the table.
pub fn exhaust_fan_level_for(current: Option<i64>) -> i64 {
    current
        .and_then(|current| EXHAUST_FAN_LEVELS.iter().find(|(raw, _)| *raw == current))
        .map_or(0, |(_, level)| *level)
}

/// Rescales an 8 bit brightness onto a percentage.
pub fn brightness_percentage(raw: f64) -> i64 {
    (raw / 255.0 * 100.0).round() as i64
}

fn power(snapshot: &Snapshot) -> FieldValue {
    let running = current_mode(snapshot).is_some_and(|mode| {
        mode.get("mode").is_some_and(Value::is_truthy) || mode.get("subMode").is_some_and(Value::is_truthy)
    });

    FieldValue::Boolean(running)
}

fn status(snapshot: &Snapshot) -> FieldValue {
    if snapshot.is_unavailable() {
        return FieldValue::label(UNAVAILABLE);
    }

    let Some(cur_mode) = current_mode(snapshot) else {
        return FieldValue::label(UNKNOWN);
    };

    let mode = upper_trimmed(cur_mode.get("mode"));
    let sub_mode = upper_trimmed(cur_mode.get("subMode"));
    FieldValue::Label(composite_mode_label(&mode, &sub_mode))
}

fn cpu_temp(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, RUNNING_STATUS, "cpuTemp")
}

fn basic_carriage(snapshot: &Snapshot) -> FieldValue {
    match snapshot.section(WORKHEAD_ID) {
        Some(workhead) => lookup_code(BASIC_CARRIAGE_TOOLS, workhead.get("drived")),
        None => FieldValue::Unknown,
    }
}

fn multi_function_carriage(snapshot: &Snapshot) -> FieldValue {
    match snapshot.section(WORKHEAD_ID) {
        Some(workhead) => lookup_code(MULTI_FUNCTION_CARRIAGE_TOOLS, workhead.get("driving")),
        None => FieldValue::Unknown,
    }
}

/// The module's own tool is only meaningful while the multi-function module sits in the
/// multi-function carriage.
fn multi_function_module_tool(snapshot: &Snapshot) -> FieldValue {
    let Some(knife_head) = snapshot.section(KNIFE_HEAD) else {
        return FieldValue::Unknown;
    };

    let carriage_tool = snapshot
        .section(WORKHEAD_ID)
        .and_then(|workhead| workhead.get("driving"))
        .and_then(Value::as_code);
    if carriage_tool != Some(MULTI_FUNCTION_MODULE) {
        return FieldValue::label("Not Installed");
    }

    lookup_code(MULTI_FUNCTION_MODULE_TOOLS, knife_head.get("driving"))
}

fn operating_times_online(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, WORKING_INFO, "numOnlineWorking")
}

fn operating_times_offline(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, WORKING_INFO, "numOfflineWorking")
}

fn standby_time(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, WORKING_INFO, "timeSystemWork")
}

fn operating_time(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, WORKING_INFO, "timeModeWorking")
}

fn exhaust_fan_current(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, SMOKING_FAN, "current")
}

fn exhaust_fan_level(snapshot: &Snapshot) -> FieldValue {
    match snapshot.section(SMOKING_FAN) {
        Some(fan) => {
            let current = fan.get("current").and_then(Value::as_code);
            FieldValue::Number(Number::from(exhaust_fan_level_for(current)))
        }
        None => FieldValue::Unknown,
    }
}

fn airassist_level(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, AIRASSIST, "power")
}

fn position_x(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, POSITION, "X")
}

fn position_y(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, POSITION, "Y")
}

fn z_ntc_temp(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, Z_NTC_TEMP, "value")
}

fn wifi_ip_address(snapshot: &Snapshot) -> FieldValue {
    match snapshot.section(MACHINE_INFO) {
        Some(info) => FieldValue::from_json(info.get("ip").and_then(|ip| ip.get("wlan0-ip"))),
        None => FieldValue::Unknown,
    }
}

fn mac_address(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, MACHINE_INFO, "mac")
}

fn serial_number(snapshot: &Snapshot) -> FieldValue {
    section_value(snapshot, MACHINE_INFO, "sn")
}

fn fill_light_brightness(snapshot: &Snapshot) -> FieldValue {
    snapshot
        .section(CONFIG)
        .and_then(|config| config.get("fillLightBrightness"))
        .and_then(Value::as_f64)
        .map_or(FieldValue::Unknown, |raw| FieldValue::Number(Number::from(brightness_percentage(raw))))
}

fn baseplate(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, DRAWER, "state", "on")
}

// "off" is open
fn lid(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, GAP, "state", "off")
}

// "off" is open
fn hatch(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, HEIGHTEN, "door", "off")
}

// "on" is unlocked
fn usb_machine_lock(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, MACHINE_LOCK, "state", "on")
}

fn raiser(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, HEIGHTEN, "state", "on")
}

fn ink_module_cable(snapshot: &Snapshot) -> FieldValue {
    plugged_in(snapshot, INKJET_PRINTER)
}

fn electrostatic_mat(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, ADSORPTION_MAT, "state", "on")
}

fn electrostatic_mat_static(snapshot: &Snapshot) -> FieldValue {
    enabled_while_on(snapshot, ADSORPTION_MAT)
}

fn air_assist(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, AIRASSIST, "state", "on")
}

fn external_purifier(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, EXT_PURIFIER, "state", "on")
}

fn external_purifier_state(snapshot: &Snapshot) -> FieldValue {
    enabled_while_on(snapshot, EXT_PURIFIER)
}

fn exhaust_fan_state(snapshot: &Snapshot) -> FieldValue {
    state_equals(snapshot, SMOKING_FAN, "state", "on")
}

fn exhaust_fan(snapshot: &Snapshot) -> FieldValue {
    plugged_in(snapshot, SMOKING_FAN)
}

// 1 is locked, reported as on while unlocked
fn multi_function_carriage_lock(snapshot: &Snapshot) -> FieldValue {
    let unlocked = snapshot
        .section(WORKHEAD_ID)
        .and_then(|workhead| workhead.get("drivingLock"))
        .and_then(Value::as_code)
        == Some(0);

    FieldValue::Boolean(unlocked)
}

/// Whether the exhaust fan runs, unknown while the fan is not plugged in.
pub fn exhaust_fan_switch(snapshot: &Snapshot) -> FieldValue {
    let Some(fan) = snapshot.section(SMOKING_FAN) else {
        return FieldValue::Unknown;
    };

    if !fan.get("exist").is_some_and(Value::is_truthy) {
        return FieldValue::Unknown;
    }

    FieldValue::Boolean(fan.get("state").and_then(Value::as_str) == Some("on"))
}
