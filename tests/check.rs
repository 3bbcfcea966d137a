mod common;

use std::cell::RefCell;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::*;
use mockito::Server;
use serde_json::json;
use usdt_watcher::MonitorError;
use usdt_watcher::commands::{self, EMPHASIS_PAUSE};
use usdt_watcher::persistence::{PersistedStatus, StatusStore};
use usdt_watcher::report::{BELL_MESSAGE, UNFREEZE_MESSAGE};
use usdt_watcher::tron::{TronAddress, TronGridClient, USDT_CONTRACT};

fn previous(blocked: bool) -> PersistedStatus {
    PersistedStatus {
        blocked,
        checked_at: "2026-10-16 07:30 UTC".to_string(),
    }
}

struct Harness {
    server: mockito::ServerGuard,
    _dir: tempfile::TempDir,
    store: StatusStore,
}

impl Harness {
    async fn new(previous: Option<PersistedStatus>) -> Self {
        let server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("state.json"));
        if let Some(status) = previous {
            store.save(&status).unwrap();
        }
        Self {
            server,
            _dir: dir,
            store,
        }
    }

    async fn check(
        &self,
        notifier: &RecordingNotifier,
    ) -> (Result<usdt_watcher::report::BalanceReport, MonitorError>, Vec<Duration>) {
        let gateway = TronGridClient::new(&self.server.url(), API_KEY).unwrap();
        let address: TronAddress = WATCHED.parse().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();

        let delays = RefCell::new(Vec::new());
        let delay = |d: Duration| {
            delays.borrow_mut().push(d);
            std::future::ready(())
        };

        let result =
            commands::check_and_notify(&gateway, notifier, &self.store, &address, now, delay).await;
        (result, delays.into_inner())
    }
}

#[tokio::test]
async fn test_unfreeze_sends_alert_sequence() {
    let mut h = Harness::new(Some(previous(true))).await;
    let _bl = mock_blacklist(&mut h.server, false).await;
    let _acc = mock_account(&mut h.server, json!({ "data": [] })).await;
    let notifier = RecordingNotifier::default();

    let (result, delays) = h.check(&notifier).await;
    let report = result.unwrap();

    assert!(!report.blacklisted);
    let messages = notifier.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].0.contains("Not blacklisted"));
    assert_eq!(messages[1], (UNFREEZE_MESSAGE.to_string(), true));
    assert_eq!(messages[2], (BELL_MESSAGE.to_string(), true));
    assert_eq!(delays, vec![EMPHASIS_PAUSE]);

    let saved = h.store.load().unwrap();
    assert!(!saved.blocked);
    assert_eq!(saved.checked_at, "2026-10-16 08:30 UTC");
}

#[tokio::test]
async fn test_unfreeze_from_status_without_check_time() {
    let mut h = Harness::new(None).await;
    std::fs::write(h.store.path(), r#"{"blocked": true}"#).unwrap();
    let _bl = mock_blacklist(&mut h.server, false).await;
    let _acc = mock_account(&mut h.server, json!({ "data": [] })).await;
    let notifier = RecordingNotifier::default();

    let (result, delays) = h.check(&notifier).await;
    result.unwrap();

    let messages = notifier.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], (UNFREEZE_MESSAGE.to_string(), true));
    assert_eq!(messages[2], (BELL_MESSAGE.to_string(), true));
    assert_eq!(delays, vec![EMPHASIS_PAUSE]);
    assert_eq!(h.store.load().unwrap().checked_at, "2026-10-16 08:30 UTC");
}

#[tokio::test]
async fn test_still_clean_sends_only_report() {
    let mut h = Harness::new(Some(previous(false))).await;
    let _bl = mock_blacklist(&mut h.server, false).await;
    let _acc = mock_account(&mut h.server, json!({ "data": [] })).await;
    let notifier = RecordingNotifier::default();

    let (result, delays) = h.check(&notifier).await;

    assert!(result.is_ok());
    assert_eq!(notifier.messages().len(), 1);
    assert!(delays.is_empty());
}

#[tokio::test]
async fn test_first_run_records_blacklisted_status() {
    let mut h = Harness::new(None).await;
    let _bl = mock_blacklist(&mut h.server, true).await;
    let _acc = mock_account(
        &mut h.server,
        json!({ "data": [{ "balance": 22, "trc20": [{ USDT_CONTRACT: "1234500000" }] }] }),
    )
    .await;
    let notifier = RecordingNotifier::default();

    let (result, delays) = h.check(&notifier).await;
    result.unwrap();

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    let (text, loud) = &messages[0];
    assert!(*loud);
    assert!(text.contains("Address: ...5wYjU7"));
    assert!(!text.contains(WATCHED));
    assert!(text.contains("Blacklisted 🚫"));
    assert!(text.contains("USDT balance: 1,234.50"));
    assert!(text.contains("TRX balance: 0.000022"));
    assert!(text.contains("2026-10-16 08:30 UTC"));
    assert!(delays.is_empty());

    assert!(h.store.load().unwrap().blocked);
}

#[tokio::test]
async fn test_gateway_failure_sends_nothing_and_keeps_status() {
    let mut h = Harness::new(Some(previous(true))).await;
    let _bl = h
        .server
        .mock("POST", "/wallet/triggerconstantcontract")
        .with_status(500)
        .create_async()
        .await;
    let notifier = RecordingNotifier::default();

    let (result, _) = h.check(&notifier).await;
    let err = result.unwrap_err();

    assert!(matches!(err, MonitorError::Http(_)));
    assert!(notifier.messages().is_empty());
    assert_eq!(h.store.load(), Some(previous(true)));

    commands::report_failure(&notifier, &err).await;
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].0.starts_with("❌ USDT check failed: HTTP request failed"));
    assert!(messages[0].1);
}

#[tokio::test]
async fn test_failed_report_send_stops_before_saving() {
    let mut h = Harness::new(Some(previous(true))).await;
    let _bl = mock_blacklist(&mut h.server, false).await;
    let _acc = mock_account(&mut h.server, json!({ "data": [] })).await;
    let notifier = RecordingNotifier::failing();

    let (result, delays) = h.check(&notifier).await;

    assert!(result.is_err());
    assert_eq!(notifier.messages().len(), 1);
    assert!(delays.is_empty());
    assert_eq!(h.store.load(), Some(previous(true)));
}

#[tokio::test]
async fn test_failure_notice_tolerates_send_failure() {
    let notifier = RecordingNotifier::failing();
    let err = MonitorError::EmptyContractResult(None);

    commands::report_failure(&notifier, &err).await;

    assert_eq!(
        notifier.messages(),
        vec![("❌ USDT check failed: Empty contract result".to_string(), true)]
    );
}
