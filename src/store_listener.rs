use crate::domain::{FieldValue, SemanticField};
use crate::store::{DeviceState, StoreSnapshot};
use crate::xtool::fields::fields_for;
use chrono::SecondsFormat;
use std::collections::HashMap;
use tokio::sync::watch::Receiver;
use tracing::{info, instrument};

/// Last logged value per unique field id.
type FieldValues = HashMap<String, FieldValue>;

#[instrument(skip_all)]
pub async fn store_listener(mut rx: Receiver<StoreSnapshot>) {
    let mut previous = FieldValues::new();

    while rx.changed().await.is_ok() {
        let snapshot: StoreSnapshot = rx.borrow_and_update().clone();
        for state in snapshot.values() {
            for (field, unique_id, value) in changed_fields(state, &mut previous) {
                let object_id = field.object_id(state.profile.family());
                let unit = field.unit.filter(|_| !value.is_unknown()).map_or("", |unit| unit.symbol());
                let polled_at = last_polled(state);
                info!(unique_id, object_id, polled_at, "🟢 '{}' {} is now {}{}", state.profile.name(), field.name, value, unit);
            }
        }
    }
}

fn last_polled(state: &DeviceState) -> String {
    state
        .polled_at
        .map_or_else(|| "never".to_string(), |polled_at| polled_at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Evaluates every field of the device and returns the ones whose value differs from the last
/// evaluation.
fn changed_fields(state: &DeviceState, previous: &mut FieldValues) -> Vec<(&'static SemanticField, String, FieldValue)> {
    fields_for(state.profile.family())
        .iter()
        .filter_map(|field| {
            let unique_id = field.unique_id(state.profile.name());
            let value = field.read(&state.snapshot);

            if previous.get(&unique_id) == Some(&value) {
                return None;
            }

            previous.insert(unique_id.clone(), value.clone());
            Some((field, unique_id, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeviceFamily, DeviceProfile, Snapshot};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state(family: DeviceFamily, value: Value) -> DeviceState {
        let Value::Object(map) = value else {
            panic!("expected an object");
        };

        DeviceState {
            profile: Arc::new(DeviceProfile::new("garage", "192.168.1.51", family)),
            snapshot: Arc::new(Snapshot::from(map)),
            polled_at: None,
        }
    }

    fn evaluate(state: &DeviceState, previous: &mut FieldValues) -> Vec<(String, &'static str, FieldValue)> {
        changed_fields(state, previous)
            .into_iter()
            .map(|(field, unique_id, value)| (unique_id, field.name, value))
            .collect()
    }

    #[test]
    fn reports_every_field_on_first_evaluation() {
        let mut previous = FieldValues::new();

        let changed = evaluate(&state(DeviceFamily::P2, json!({"mode": "P_IDLE"})), &mut previous);

        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&("garage_status".to_string(), "Status", FieldValue::label("Idle"))));
    }

    #[test]
    fn last_polled_reports_the_poll_time() {
        let mut polled = state(DeviceFamily::P2, json!({}));
        assert_eq!(last_polled(&polled), "never");

        polled.polled_at = Some(Utc.with_ymd_and_hms(2026, 10, 17, 8, 30, 0).unwrap());
        assert_eq!(last_polled(&polled), "2026-10-17T08:30:00Z");
    }

    #[test]
    fn reports_only_fields_that_changed() {
        let mut previous = FieldValues::new();
        evaluate(&state(DeviceFamily::P2, json!({"mode": "P_IDLE"})), &mut previous);

        let changed = evaluate(&state(DeviceFamily::P2, json!({"mode": "WORK"})), &mut previous);

        assert_eq!(changed, vec![("garage_status".to_string(), "Status", FieldValue::label("Running"))]);
    }
}
