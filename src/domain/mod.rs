pub mod commands;
pub mod controller;
pub mod controller_registry;
pub mod device_family;
pub mod device_profile;
pub mod events;
pub mod field;
mod number;
pub mod snapshot;

pub use device_family::{DeviceFamily, PollStrategy};
pub use device_profile::DeviceProfile;
pub use field::{FieldKind, FieldValue, SemanticField, Unit};
pub use number::Number;
pub use snapshot::Snapshot;
