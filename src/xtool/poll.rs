use crate::domain::{DeviceProfile, PollStrategy, Snapshot};
use crate::xtool::client::{FetchError, fetch};
use crate::xtool::endpoint::{Endpoint, Target, peripheral_endpoints};
use crate::xtool::envelope::DeviceResponse;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

/// Fetches the current state of the device. Never fails: an unreachable device yields the
/// unavailable sentinel, a partially answering M1 Ultra yields whatever it did report.
#[instrument(skip_all, fields(device = profile.name()))]
pub async fn poll(client: &Client, profile: &DeviceProfile) -> Snapshot {
    match profile.family().poll_strategy() {
        PollStrategy::Status => poll_status(client, profile).await,
        PollStrategy::Peripherals => poll_peripherals(client, profile).await,
    }
}

async fn poll_status(client: &Client, profile: &DeviceProfile) -> Snapshot {
    let result = fetch(client, profile, &Endpoint::status()).await.and_then(into_object);

    match result {
        Ok(values) => {
            let snapshot = Snapshot::from(values);
            debug!(address = profile.address(), "🔹 Polled {}: {:?}", profile.name(), snapshot);
            snapshot
        }
        Err(FetchError::Connection(e)) => {
            debug!(address = profile.address(), "🔌 {} is unreachable: {}", profile.name(), e);
            Snapshot::unavailable()
        }
        Err(e) => {
            error!(address = profile.address(), "❌ Unable to poll {}: {}", profile.name(), e);
            Snapshot::unavailable()
        }
    }
}

async fn poll_peripherals(client: &Client, profile: &DeviceProfile) -> Snapshot {
    let endpoints = peripheral_endpoints();
    let mut snapshot = Snapshot::empty();
    let mut unreachable = 0;

    for endpoint in &endpoints {
        let result = fetch(client, profile, endpoint).await;
        match result.and_then(|body| collect(&mut snapshot, endpoint.target, body)) {
            Ok(()) => {}
            Err(FetchError::Connection(e)) => {
                unreachable += 1;
                debug!(endpoint = endpoint.path, "🔌 {} is unreachable: {}", profile.name(), e);
            }
            Err(e) => {
                error!(endpoint = endpoint.path, "❌ Unable to poll {}: {}", profile.name(), e);
            }
        }
    }

    if unreachable == endpoints.len() {
        debug!(address = profile.address(), "🔌 {} did not answer any request", profile.name());
        return Snapshot::unavailable();
    }

    debug!(address = profile.address(), "🔹 Polled {}: {:?}", profile.name(), snapshot);
    snapshot
}

/// Adds one response to the snapshot. A device reporting a non-zero code contributes nothing.
fn collect(snapshot: &mut Snapshot, target: Target, body: Value) -> Result<(), FetchError> {
    match target {
        Target::TopLevel => snapshot.extend(into_object(body)?),
        Target::Key(key) => {
            if let Some(data) = DeviceResponse::parse(body)?.into_data() {
                snapshot.insert(key, data);
            }
        }
    }

    Ok(())
}

fn into_object(body: Value) -> Result<Map<String, Value>, FetchError> {
    match body {
        Value::Object(values) => Ok(values),
        _ => Err(FetchError::UnexpectedShape { expected: "a JSON object" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceFamily;
    use crate::domain::snapshot::UNAVAILABLE_KEY;
    use mockito::{Matcher, Mock, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::net::TcpListener;
    use test_log::test;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener as AsyncTcpListener;

    fn profile(server: &Server, family: DeviceFamily) -> DeviceProfile {
        let address = server.socket_address();
        DeviceProfile::new("workshop", address.ip().to_string(), family).with_port(address.port())
    }

    fn unreachable_profile(family: DeviceFamily) -> DeviceProfile {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        DeviceProfile::new("workshop", "127.0.0.1", family).with_port(port)
    }

    /// A device that accepts connections and hangs up without answering on the given paths,
    /// answers `machineInfo` and responds 404 to everything else.
    async fn hanging_up_on(paths: &'static [&'static str], family: DeviceFamily) -> DeviceProfile {
        let listener = AsyncTcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let Some(path) = read_request_path(&mut socket).await else {
                        return;
                    };
                    if paths.iter().any(|hang_up| path.starts_with(hang_up)) {
                        return;
                    }

                    let (status, body) = if path == "/device/machineInfo" {
                        ("200 OK", json!({"code": 0, "data": {"sn": "MXU123"}}).to_string())
                    } else {
                        ("404 Not Found", String::new())
                    };
                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        DeviceProfile::new("workshop", "127.0.0.1", family).with_port(port)
    }

    /// Reads the request head and body, returning the request path.
    async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
        let mut request = Vec::new();
        let mut buffer = [0u8; 1024];
        let head_end = loop {
            let read = socket.read(&mut buffer).await.ok()?;
            if read == 0 {
                return None;
            }
            request.extend_from_slice(&buffer[..read]);
            if let Some(position) = request.windows(4).position(|window| window == b"\r\n\r\n") {
                break position + 4;
            }
        };

        let head = String::from_utf8_lossy(&request[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while request.len() < head_end + content_length {
            let read = socket.read(&mut buffer).await.ok()?;
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
        }

        head.lines().next()?.split_whitespace().nth(1).map(str::to_string)
    }

    async fn mock_json(server: &mut Server, method: &str, path: &str, body: Value) -> Mock {
        server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    #[test(tokio::test)]
    async fn simple_families_flatten_the_status_document() {
        let mut server = Server::new_async().await;
        let mock = mock_json(&mut server, "GET", "/status", json!({"mode": "P_IDLE", "progress": 0})).await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::P2)).await;

        mock.assert_async().await;
        assert_eq!(snapshot.get("mode"), Some(&json!("P_IDLE")));
        assert_eq!(snapshot.get("progress"), Some(&json!(0)));
        assert_eq!(snapshot.len(), 2);
    }

    #[test(tokio::test)]
    async fn simple_families_are_unavailable_when_unreachable() {
        let snapshot = poll(&Client::new(), &unreachable_profile(DeviceFamily::M1)).await;

        assert_eq!(snapshot, Snapshot::unavailable());
    }

    #[test(tokio::test)]
    async fn simple_families_are_unavailable_on_server_errors() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/status").with_status(500).create_async().await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::F1)).await;

        assert_eq!(snapshot, Snapshot::unavailable());
    }

    #[test(tokio::test)]
    async fn simple_families_are_unavailable_on_non_object_documents() {
        let mut server = Server::new_async().await;
        mock_json(&mut server, "GET", "/status", json!(["P_IDLE"])).await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::Apparel)).await;

        assert_eq!(snapshot, Snapshot::unavailable());
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_keeps_the_peripherals_that_answered() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/device/runningStatus").with_status(500).create_async().await;
        let machine_info = mock_json(&mut server, "GET", "/device/machineInfo", json!({"code": 0, "data": {"sn": "MXU123"}})).await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::M1Ultra)).await;

        machine_info.assert_async().await;
        assert!(!snapshot.contains_key(UNAVAILABLE_KEY));
        assert!(!snapshot.contains_key("runningStatus"));
        assert_eq!(snapshot.get("machineInfo"), Some(&json!({"sn": "MXU123"})));
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_merges_the_version_at_the_top_level() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex("^/system".to_string()))
            .match_query(Matcher::UrlEncoded("action".to_string(), "version_v2".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"version": "40.51.009", "hardware": "MXU"}).to_string())
            .create_async()
            .await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::M1Ultra)).await;

        assert_eq!(snapshot.get("version"), Some(&json!("40.51.009")));
        assert_eq!(snapshot.get("hardware"), Some(&json!("MXU")));
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_ignores_peripherals_reporting_a_non_zero_code() {
        let mut server = Server::new_async().await;
        mock_json(&mut server, "GET", "/peripheral/drawer", json!({"code": 3, "data": {"state": "on"}})).await;
        mock_json(&mut server, "GET", "/peripheral/gap", json!({"code": 0, "data": {"state": "off"}})).await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::M1Ultra)).await;

        assert!(!snapshot.contains_key("drawer"));
        assert_eq!(snapshot.get("gap"), Some(&json!({"state": "off"})));
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_sends_the_peripheral_request_bodies() {
        let mut server = Server::new_async().await;
        let position = server
            .mock("POST", "/peripheral/position")
            .match_body(Matcher::Json(json!({"aix": "all", "datatype": "absolute"})))
            .with_status(200)
            .with_body(json!({"code": 0, "data": {"X": 1.5, "Y": 2.5}}).to_string())
            .create_async()
            .await;
        let config = server
            .mock("POST", "/config/get")
            .match_body(Matcher::PartialJson(json!({"alias": "config", "type": "user"})))
            .with_status(200)
            .with_body(json!({"code": 0, "data": {"fillLightBrightness": 255}}).to_string())
            .create_async()
            .await;
        let workhead = server
            .mock("POST", "/peripheral/workhead_ID")
            .match_body(Matcher::Json(json!({"action": "get"})))
            .with_status(200)
            .with_body(json!({"code": 0, "data": {"driving": 29}}).to_string())
            .create_async()
            .await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::M1Ultra)).await;

        position.assert_async().await;
        config.assert_async().await;
        workhead.assert_async().await;
        assert_eq!(snapshot.get("position"), Some(&json!({"X": 1.5, "Y": 2.5})));
        assert_eq!(snapshot.get("config"), Some(&json!({"fillLightBrightness": 255})));
        assert_eq!(snapshot.get("workhead_ID"), Some(&json!({"driving": 29})));
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_returns_an_empty_snapshot_when_nothing_answers_with_data() {
        let server = Server::new_async().await;

        let snapshot = poll(&Client::new(), &profile(&server, DeviceFamily::M1Ultra)).await;

        assert!(snapshot.is_empty());
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_keeps_the_peripherals_that_answered_when_others_hang_up() {
        let profile = hanging_up_on(&["/device/runningStatus"], DeviceFamily::M1Ultra).await;

        let snapshot = poll(&Client::new(), &profile).await;

        assert!(!snapshot.is_unavailable());
        assert!(!snapshot.contains_key("runningStatus"));
        assert_eq!(snapshot.get("machineInfo"), Some(&json!({"sn": "MXU123"})));
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_is_unavailable_when_every_connection_is_dropped() {
        let profile = hanging_up_on(&["/"], DeviceFamily::M1Ultra).await;

        let snapshot = poll(&Client::new(), &profile).await;

        assert_eq!(snapshot, Snapshot::unavailable());
    }

    #[test(tokio::test)]
    async fn simple_families_are_unavailable_when_the_connection_is_dropped() {
        let profile = hanging_up_on(&["/"], DeviceFamily::P2).await;

        let snapshot = poll(&Client::new(), &profile).await;

        assert_eq!(snapshot, Snapshot::unavailable());
    }

    #[test(tokio::test)]
    async fn the_m1_ultra_is_unavailable_when_unreachable() {
        let snapshot = poll(&Client::new(), &unreachable_profile(DeviceFamily::M1Ultra)).await;

        assert_eq!(snapshot, Snapshot::unavailable());
    }
}
