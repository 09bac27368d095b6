use crate::domain::events::Event;
use crate::domain::{DeviceProfile, Snapshot};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, info, instrument, warn};

/// The last known state of a single device.
#[derive(Debug, Clone)]
pub struct DeviceState {
    pub profile: Arc<DeviceProfile>,
    pub snapshot: Arc<Snapshot>,
    pub polled_at: Option<DateTime<Utc>>,
}

pub type StoreSnapshot = Arc<HashMap<String, DeviceState>>;

/// Single writer of device snapshots. Every applied event publishes a new immutable view, so
/// readers never observe a half-merged snapshot.
#[derive(Debug)]
pub struct Store {
    devices: HashMap<String, DeviceState>,
    rx: Receiver<Event>,
    notifier_tx: WatchSender<StoreSnapshot>,
    notifier_rx: WatchReceiver<StoreSnapshot>,
}

impl Store {
    pub fn new(rx: Receiver<Event>) -> Self {
        let (notifier_tx, notifier_rx) = watch::channel::<StoreSnapshot>(Arc::new(HashMap::new()));

        Store {
            devices: HashMap::new(),
            rx,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<StoreSnapshot> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            if self.apply(event) {
                self.notifier_tx.send_replace(Arc::new(self.devices.clone()));
            }
        }
    }

    /// Applies the event and tells whether anything changed.
    fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::RegisteredDevices(profiles) => {
                let num_devices = profiles.len();
                debug!("🔵 Registering {} device(s)...", num_devices);

                for profile in profiles {
                    let state = DeviceState {
                        profile: Arc::new(profile),
                        snapshot: Arc::new(Snapshot::empty()),
                        polled_at: None,
                    };
                    self.devices.insert(state.profile.name().to_string(), state);
                }

                info!("🔵 Registering {} device(s)... OK", num_devices);
                true
            }
            Event::Polled { device, snapshot } => {
                let Some(state) = self.devices.get_mut(&device) else {
                    warn!(device, "⚠️ Received a snapshot for unknown device '{}'", device);
                    return false;
                };

                debug!(device, "🔵 Replacing the snapshot of '{}'", device);
                state.snapshot = Arc::new(snapshot);
                state.polled_at = Some(Utc::now());
                true
            }
            Event::Patched { device, key, value } => {
                let Some(state) = self.devices.get_mut(&device) else {
                    warn!(device, "⚠️ Received a patch for unknown device '{}'", device);
                    return false;
                };

                debug!(device, "🔵 Patching '{}' of '{}'", key, device);
                state.snapshot = Arc::new(state.snapshot.patched(&key, value));
                true
            }
        }
    }
}
