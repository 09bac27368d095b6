use crate::app_config::AppConfig;
use crate::console::console;
use crate::domain::controller_registry;
use crate::domain::events::Event;
use crate::poller::poller;
use crate::store::Store;
use crate::store_listener::store_listener;
use crate::xtool::XToolController;
use std::sync::Arc;
use tokio::io::{BufReader, stdin};
use tokio::sync::mpsc;
use tokio::{signal, task};
use tracing::info;

mod app_config;
mod console;
mod domain;
mod extensions;
mod poller;
mod store;
mod store_listener;
mod xtool;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let client = xtool::new_client(&config)?;

    let (tx, rx) = mpsc::channel::<Event>(config.core().store_buffer_size());
    let mut store = Store::new(rx);
    let notifier_rx = store.notifier();

    let listener_rx = notifier_rx.clone();
    task::spawn(async move {
        store_listener(listener_rx).await;
    });
    info!("✅  Initialized store listener");

    task::spawn(async move {
        store.listen().await;
    });
    info!("✅  Initialized store");

    let profiles: Vec<_> = config.profiles().into_iter().map(Arc::new).collect();
    tx.send(Event::RegisteredDevices(profiles.iter().map(|profile| profile.as_ref().clone()).collect()))
        .await?;
    info!("✅  Registered {} device(s)", profiles.len());

    for profile in profiles {
        info!(device = profile.name(), "🔌 Connecting to {} at {}", profile.family().model_name(), profile.address());

        let controller = XToolController::new(client.clone(), profile.clone(), notifier_rx.clone(), tx.clone());
        controller_registry::register(Arc::new(controller));

        task::spawn(poller(client.clone(), profile, config.core().poll_interval(), tx.clone()));
    }
    info!("✅  Started polling");

    task::spawn(console(BufReader::new(stdin())));

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    signal::ctrl_c().await?;
    info!("👋 Shutting down");

    Ok(())
}
