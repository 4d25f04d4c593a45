#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use config_sync::{ConfigSyncClient, Notice, Notifier, SyncController};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct TestHarness {
    pub mock_server: MockServer,
    pub notifier: RecordingNotifier,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
            notifier: RecordingNotifier::default(),
        }
    }

    pub fn client(&self) -> ConfigSyncClient {
        ConfigSyncClient::new(&self.mock_server.uri()).unwrap()
    }

    pub fn controller(&self) -> SyncController {
        SyncController::new(self.client(), Arc::new(self.notifier.clone()))
    }

    pub async fn mount_update_ok(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/update"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .expect(expected_calls)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_state(&self, state: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/state"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(&state)
                    .insert_header("Content-Type", "application/json"),
            )
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_error(&self, route: &str, status: u16, body: serde_json::Value) {
        Mock::given(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(&body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn update_bodies(&self) -> Vec<serde_json::Value> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/api/update")
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// An address nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
