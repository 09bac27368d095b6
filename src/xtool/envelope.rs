use crate::extensions::json_value_ext::JsonValueExt;
use crate::xtool::client::FetchError;
use serde::Deserialize;
use serde_json::Value;

/// The `{"code": ..., "data": ...}` wrapper of every M1 Ultra peripheral response.
#[derive(Debug, Deserialize)]
pub struct DeviceResponse {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    data: Value,
}

impl DeviceResponse {
    pub fn parse(body: Value) -> Result<Self, FetchError> {
        serde_json::from_value(body).map_err(|_| FetchError::UnexpectedShape {
            expected: "a code/data envelope",
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self.code, Value::Number(_)) && self.code.as_code() == Some(0)
    }

    /// Returns the payload when the device reported success, `None` otherwise.
    pub fn into_data(self) -> Option<Value> {
        if self.is_success() { Some(self.data) } else { None }
    }
}
