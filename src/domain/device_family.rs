use serde::{Deserialize, Deserializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// The supported xTool models. The M1 Ultra exposes one endpoint per peripheral, the other
/// models report everything through a single `/status` document.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum DeviceFamily {
    P2,
    F1,
    M1,
    Apparel,
    M1Ultra,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum PollStrategy {
    /// A single `GET /status`, flattened into the snapshot.
    Status,
    /// One request per peripheral endpoint, each wrapped in a `code`/`data` envelope.
    Peripherals,
}

impl DeviceFamily {
    pub const ALL: [DeviceFamily; 5] = [
        DeviceFamily::P2,
        DeviceFamily::F1,
        DeviceFamily::M1,
        DeviceFamily::Apparel,
        DeviceFamily::M1Ultra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceFamily::P2 => "p2",
            DeviceFamily::F1 => "f1",
            DeviceFamily::M1 => "m1",
            DeviceFamily::Apparel => "apparel",
            DeviceFamily::M1Ultra => "m1ultra",
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            DeviceFamily::P2 => "P2",
            DeviceFamily::F1 => "F1",
            DeviceFamily::M1 => "M1",
            DeviceFamily::Apparel => "Apparel Printer",
            DeviceFamily::M1Ultra => "M1 Ultra",
        }
    }

    pub fn poll_strategy(&self) -> PollStrategy {
        match self {
            DeviceFamily::M1Ultra => PollStrategy::Peripherals,
            DeviceFamily::P2 | DeviceFamily::F1 | DeviceFamily::M1 | DeviceFamily::Apparel => PollStrategy::Status,
        }
    }
}

impl FromStr for DeviceFamily {
    type Err = DeviceFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        DeviceFamily::ALL
            .into_iter()
            .find(|family| family.as_str() == tag)
            .ok_or_else(|| DeviceFamilyError::Unsupported { tag: s.to_string() })
    }
}

impl Display for DeviceFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceFamily {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        DeviceFamily::from_str(&tag).map_err(serde::de::Error::custom)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DeviceFamilyError {
    #[error("unsupported device type '{tag}', expected one of p2, f1, m1, apparel, m1ultra")]
    Unsupported { tag: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("p2", DeviceFamily::P2)]
    #[case("F1", DeviceFamily::F1)]
    #[case(" m1 ", DeviceFamily::M1)]
    #[case("Apparel", DeviceFamily::Apparel)]
    #[case("M1Ultra", DeviceFamily::M1Ultra)]
    fn parses_tags_case_insensitively(#[case] tag: &str, #[case] expected: DeviceFamily) {
        assert_eq!(DeviceFamily::from_str(tag), Ok(expected));
    }

    #[test]
    fn rejects_unknown_tags() {
        let result = DeviceFamily::from_str("s1");

        assert_eq!(result, Err(DeviceFamilyError::Unsupported { tag: "s1".to_string() }));
    }

    #[test]
    fn only_the_m1_ultra_polls_peripherals() {
        let peripheral_families: Vec<_> = DeviceFamily::ALL
            .into_iter()
            .filter(|family| family.poll_strategy() == PollStrategy::Peripherals)
            .collect();

        assert_eq!(peripheral_families, vec![DeviceFamily::M1Ultra]);
    }

    #[test]
    fn deserializes_from_a_json_string() {
        let family: DeviceFamily = serde_json::from_str("\"M1ULTRA\"").unwrap();

        assert_eq!(family, DeviceFamily::M1Ultra);
        assert_eq!(family.to_string(), "m1ultra");
    }
}
