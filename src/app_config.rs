use crate::domain::{DeviceFamily, DeviceProfile};
use config::{Config, ConfigError};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    #[serde(default)]
    devices: Vec<DeviceConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppConfigError> {
        let mut names = HashSet::new();
        for device in &self.devices {
            if !names.insert(device.name.as_str()) {
                return Err(AppConfigError::DuplicateDevice { name: device.name.clone() });
            }
        }

        Ok(())
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn profiles(&self) -> Vec<DeviceProfile> {
        self.devices
            .iter()
            .map(|device| DeviceProfile::new(&device.name, &device.ip_address, device.device_type))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    store_buffer_size: usize,
    #[serde(with = "humantime_serde")]
    poll_interval: Duration,
    #[serde(with = "humantime_serde")]
    request_timeout: Duration,
}

impl Core {
    pub fn store_buffer_size(&self) -> usize {
        self.store_buffer_size
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    name: String,
    ip_address: String,
    device_type: DeviceFamily,
}

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("device '{name}' is configured more than once")]
    DuplicateDevice { name: String },
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    store_buffer_size: 1,
                    poll_interval: Duration::from_secs(10),
                    request_timeout: Duration::from_secs(5),
                },
                devices: vec![],
            },
        }
    }

    pub fn device(mut self, name: &str, ip_address: &str, device_type: DeviceFamily) -> Self {
        self.config.devices.push(DeviceConfig {
            name: name.to_string(),
            ip_address: ip_address.to_string(),
            device_type,
        });
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
