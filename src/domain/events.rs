use crate::domain::device_profile::DeviceProfile;
use crate::domain::snapshot::Snapshot;
use serde_json::Value;

#[derive(Debug)]
pub enum Event {
    RegisteredDevices(Vec<DeviceProfile>),
    Polled { device: String, snapshot: Snapshot },
    Patched { device: String, key: String, value: Value },
}
