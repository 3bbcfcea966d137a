//! Check execution logic.
//!
//! This module contains the one routine the program exists for:
//! - Query the blacklist status and balances of the watched address
//! - Send the report to the chat
//! - Send the unfreeze alert sequence when the address left the blacklist
//! - Record the new status for the next run

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::bot::Notifier;
use crate::cli::Cli;
use crate::error::MonitorError;
use crate::persistence::{PersistedStatus, StatusStore};
use crate::report::{self, BalanceReport};
use crate::tron::{TronAddress, TronGridClient};

/// Pause between the unfreeze alert and the bell message.
pub const EMPHASIS_PAUSE: Duration = Duration::from_secs(2);

/// Runs one check with the configuration from `cli`, sending through `notifier`.
///
/// # Errors
///
/// Returns `Err` if the address is invalid, any gateway or Telegram request
/// fails, the contract result is empty, or the status file cannot be written.
pub async fn run<N: Notifier>(cli: &Cli, notifier: &N) -> Result<(), MonitorError> {
    let address: TronAddress = cli.watch_address.parse()?;
    let gateway = TronGridClient::new(&cli.trongrid_url, &cli.trongrid_api_key)?;
    let store = StatusStore::new(&cli.state_file);
    log::debug!(
        "Starting check address={} gateway={} status_file={}",
        address,
        cli.trongrid_url,
        store.path().display()
    );

    let report = check_and_notify(
        &gateway,
        notifier,
        &store,
        &address,
        Utc::now(),
        tokio::time::sleep,
    )
    .await?;
    println!("{}", report.render(address.as_base58()));
    Ok(())
}

/// Checks `address`, reports to `notifier` and records the status in `store`.
///
/// `delay` performs the pause inside the unfreeze alert sequence.
pub async fn check_and_notify<N, D, F>(
    gateway: &TronGridClient,
    notifier: &N,
    store: &StatusStore,
    address: &TronAddress,
    now: DateTime<Utc>,
    delay: D,
) -> Result<BalanceReport, MonitorError>
where
    N: Notifier,
    D: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let previous = store.load();

    let blacklisted = gateway.is_blacklisted(address).await?;
    let balances = gateway.fetch_balances(address).await?;

    let report = BalanceReport {
        token_balance: balances.token,
        native_balance: balances.native,
        blacklisted,
        checked_at: now,
    };

    log::info!(
        "Check completed address={} blacklisted={} usdt={} trx={}",
        address,
        report.blacklisted,
        report.token_balance,
        report.native_balance
    );

    notifier.notify(&report.render(address.as_base58()), true).await?;

    if is_unfreeze(previous.as_ref(), report.blacklisted) {
        log::info!("Address left the blacklist address={}", address);
        send_unfreeze_alert(notifier, delay).await?;
    }

    store.save(&PersistedStatus {
        blocked: report.blacklisted,
        checked_at: report.checked_at_text(),
    })?;

    Ok(report)
}

/// True when the previous run saw the address blacklisted and this one does not.
pub fn is_unfreeze(previous: Option<&PersistedStatus>, blacklisted: bool) -> bool {
    matches!(previous, Some(p) if p.blocked) && !blacklisted
}

async fn send_unfreeze_alert<N, D, F>(notifier: &N, delay: D) -> Result<(), MonitorError>
where
    N: Notifier,
    D: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    notifier.notify(report::UNFREEZE_MESSAGE, true).await?;
    delay(EMPHASIS_PAUSE).await;
    notifier.notify(report::BELL_MESSAGE, true).await
}

/// Best-effort notice that the run failed. A failed send is only logged so
/// the original error stays the one reported.
pub async fn report_failure<N: Notifier>(notifier: &N, error: &MonitorError) {
    if let Err(e) = notifier.notify(&report::failure_message(error), true).await {
        log::error!("Failed to send failure notification: {}", e);
    }
}
