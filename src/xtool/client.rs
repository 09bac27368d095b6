use crate::app_config::AppConfig;
use crate::domain::DeviceProfile;
use crate::xtool::endpoint::{Endpoint, Method};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

pub fn new_client(config: &AppConfig) -> Result<Client, ClientError> {
    let client = Client::builder().timeout(config.core().request_timeout()).build()?;
    Ok(client)
}

/// Performs a single request against the device and decodes the JSON body. No retries.
pub async fn fetch(client: &Client, profile: &DeviceProfile, endpoint: &Endpoint) -> Result<Value, FetchError> {
    let url = profile.url(endpoint.path);
    let request = match &endpoint.method {
        Method::Get => client.get(url),
        Method::Post(body) => client.post(url).json(body),
    };

    let response = request.send().await.map_err(FetchError::from_send)?;
    let body = response
        .error_for_status()
        .map_err(FetchError::Request)?
        .json::<Value>()
        .await
        .map_err(FetchError::Request)?;
    Ok(body)
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("could not build the HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected response, expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

impl FetchError {
    /// Anything that fails before a status line arrives is a connection failure: refused,
    /// reset or closed by the device, or a connect timeout. A device that accepted the
    /// request but never answered in time is not.
    fn from_send(error: reqwest::Error) -> Self {
        if error.is_builder() || (error.is_timeout() && !error.is_connect()) {
            FetchError::Request(error)
        } else {
            FetchError::Connection(error)
        }
    }
}
