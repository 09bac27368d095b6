use crate::domain::commands::Command;
use crate::domain::controller::Controller;
use crate::domain::events::Event;
use crate::domain::{DeviceFamily, DeviceProfile, FieldValue, Snapshot};
use crate::extensions::json_value_ext::JsonValueExt;
use crate::store::StoreSnapshot;
use crate::xtool::client::{FetchError, fetch};
use crate::xtool::endpoint::{Endpoint, SMOKING_FAN, Target};
use crate::xtool::envelope::DeviceResponse;
use crate::xtool::fields::m1_ultra::exhaust_fan_switch;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch::Receiver;
use tracing::{debug, info, instrument, warn};

/// Sends control actions to one device and patches the acknowledged section into the store.
#[derive(Debug)]
pub struct XToolController {
    client: Client,
    profile: Arc<DeviceProfile>,
    notifier_rx: Receiver<StoreSnapshot>,
    tx: Sender<Event>,
}

#[async_trait]
impl Controller for XToolController {
    fn id(&self) -> &str {
        self.profile.name()
    }

    #[instrument(skip(self), fields(device = self.profile.name()))]
    async fn execute(&self, command: Command) {
        if self.profile.family() != DeviceFamily::M1Ultra {
            warn!("⚠️ {} does not support {:?}", self.profile.family().model_name(), command);
            return;
        }

        match command {
            Command::SetExhaustFan { on } => {
                let snapshot = self.current_snapshot();
                if !accepts_exhaust_fan(&snapshot, on) {
                    debug!("🔹 Skipping exhaust fan of '{}', not present or already {}", self.profile.name(), on_off(on));
                    return;
                }

                info!("🟢 Turn {} exhaust fan of '{}'", on_off(on), self.profile.name());
                self.dispatch(Endpoint::exhaust_fan(on)).await;
            }
            Command::SyncMultiFunctionModule => {
                info!("🟢 Sync multi-function module of '{}'", self.profile.name());
                self.dispatch(Endpoint::sync_knife_head()).await;
            }
        }
    }
}

impl XToolController {
    pub fn new(client: Client, profile: Arc<DeviceProfile>, notifier_rx: Receiver<StoreSnapshot>, tx: Sender<Event>) -> Self {
        XToolController {
            client,
            profile,
            notifier_rx,
            tx,
        }
    }

    fn current_snapshot(&self) -> Arc<Snapshot> {
        self.notifier_rx
            .borrow()
            .get(self.profile.name())
            .map(|state| state.snapshot.clone())
            .unwrap_or_default()
    }

    async fn dispatch(&self, endpoint: Endpoint) {
        let Target::Key(key) = endpoint.target else {
            return;
        };

        let result = fetch(&self.client, &self.profile, &endpoint).await.and_then(DeviceResponse::parse);
        let data = match result {
            Ok(response) => response.into_data(),
            Err(FetchError::Connection(e)) => {
                debug!("🔌 {} is unreachable: {}", self.profile.name(), e);
                return;
            }
            Err(e) => {
                warn!("⚠️ Unable to control '{}': {}", self.profile.name(), e);
                return;
            }
        };

        let Some(value) = data else {
            debug!("🔹 '{}' rejected the request to {}", self.profile.name(), endpoint.path);
            return;
        };

        self.patch(key, value).await;
    }

    async fn patch(&self, key: &str, value: Value) {
        let event = Event::Patched {
            device: self.profile.name().to_string(),
            key: key.to_string(),
            value,
        };

        if let Err(e) = self.tx.send(event).await {
            warn!("⚠️ Could not send patch for '{}' to the store: {}", self.profile.name(), e);
        }
    }
}

/// The fan has to be plugged in and not already in the desired state.
fn accepts_exhaust_fan(snapshot: &Snapshot, on: bool) -> bool {
    let exists = snapshot
        .section(SMOKING_FAN)
        .and_then(|fan| fan.get("exist"))
        .is_some_and(Value::is_truthy);

    exists && exhaust_fan_switch(snapshot) != FieldValue::Boolean(on)
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
