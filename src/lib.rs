//! USDT Blacklist Watcher
//!
//! A one-shot checker for a single TRON address: asks the USDT contract
//! whether the address is blacklisted, reads its USDT and TRX balances from
//! TronGrid, and posts a report to a Telegram chat. Meant to be run by an
//! external scheduler.
//!
//! # Usage
//!
//! ```bash
//! export TG_BOT_TOKEN="your-token"
//! export TG_CHAT_ID="123456789"
//! export TRONGRID_API_KEY="your-key"
//! export WATCH_ADDRESS="T..."
//! usdt-watcher
//! ```

use std::time::Duration;

pub mod bot;
pub mod cli;
pub mod commands;
pub mod error;
pub mod persistence;
pub mod report;
pub mod tron;
pub mod utils;

pub use error::MonitorError;

/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(25);
