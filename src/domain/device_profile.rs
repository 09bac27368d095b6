use crate::domain::device_family::DeviceFamily;

pub const DEVICE_PORT: u16 = 8080;

/// Immutable description of one configured laser. The name doubles as the stable entry id that
/// prefixes every unique id derived for the device.
#[derive(PartialEq, Debug, Clone)]
pub struct DeviceProfile {
    name: String,
    address: String,
    port: u16,
    family: DeviceFamily,
}

impl DeviceProfile {
    pub fn new(name: impl Into<String>, address: impl Into<String>, family: DeviceFamily) -> Self {
        DeviceProfile {
            name: name.into(),
            address: address.into(),
            port: DEVICE_PORT,
            family,
        }
    }

    #[cfg(test)]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn family(&self) -> DeviceFamily {
        self.family
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.address, self.port, path)
    }
}
