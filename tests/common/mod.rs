#![allow(dead_code)]

use std::sync::Mutex;

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use usdt_watcher::MonitorError;
use usdt_watcher::bot::Notifier;

pub const API_KEY: &str = "test-key";
pub const WATCHED: &str = "TLa2f6VPqDgRE67v1736s7bJ8Ray5wYjU7";
pub const WATCHED_HEX: &str = "4174472e7d35395a6b5add427eecb7f4b62ad2b071";
pub const USDT_HEX: &str = "41a614f803b6fd780986a42c78ec9c7f77e6ded13c";

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, bool)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<(String, bool)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str, loud: bool) -> Result<(), MonitorError> {
        self.sent.lock().unwrap().push((text.to_string(), loud));
        if self.fail {
            return Err(MonitorError::Config("chat unavailable".to_string()));
        }
        Ok(())
    }
}

pub fn result_word(value: u8) -> String {
    format!("{:0>64}", value)
}

pub async fn mock_blacklist(server: &mut ServerGuard, blacklisted: bool) -> Mock {
    server
        .mock("POST", "/wallet/triggerconstantcontract")
        .match_header("TRON-PRO-API-KEY", API_KEY)
        .match_body(Matcher::PartialJson(json!({
            "owner_address": WATCHED_HEX,
            "contract_address": USDT_HEX,
            "function_selector": "isBlackListed(address)",
            "parameter": format!("{:0>64}", WATCHED_HEX),
            "visible": false,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "constant_result": [result_word(blacklisted as u8)] }).to_string())
        .create_async()
        .await
}

pub async fn mock_account(server: &mut ServerGuard, body: serde_json::Value) -> Mock {
    server
        .mock("GET", format!("/v1/accounts/{WATCHED}").as_str())
        .match_header("TRON-PRO-API-KEY", API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}
