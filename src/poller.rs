use crate::domain::DeviceProfile;
use crate::domain::events::Event;
use crate::xtool::poll;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, instrument, warn};

/// Polls the device on every tick until the store goes away. A poll that outlasts the interval
/// delays the next one instead of overlapping it.
#[instrument(skip_all, fields(device = profile.name()))]
pub async fn poller(client: Client, profile: Arc<DeviceProfile>, poll_interval: Duration, tx: Sender<Event>) {
    let mut ticks = interval(poll_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;

        debug!("🔄 Polling '{}'...", profile.name());
        let snapshot = poll(&client, &profile).await;
        let event = Event::Polled {
            device: profile.name().to_string(),
            snapshot,
        };

        if tx.send(event).await.is_err() {
            warn!("⚠️ Store is gone, stopped polling '{}'", profile.name());
            return;
        }
        debug!("🔄 Polling '{}'... OK", profile.name());
    }
}
