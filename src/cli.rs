//! Configuration.
//!
//! Every setting is read from the environment through clap's `env` support,
//! so a scheduler only has to export variables. A missing required variable
//! makes clap exit with a usage error before any network call happens.

use std::path::PathBuf;

use clap::Parser;

use crate::tron::DEFAULT_TRONGRID_URL;

/// One-shot USDT blacklist and balance check for a TRON address.
#[derive(Parser, Debug, Clone)]
#[command(name = "usdt-watcher", version, about = "USDT blacklist and balance checker")]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "TG_BOT_TOKEN", hide_env_values = true)]
    pub tg_bot_token: String,

    /// Destination chat: numeric chat id or @channel username
    #[arg(long, env = "TG_CHAT_ID")]
    pub tg_chat_id: String,

    /// TronGrid API key
    #[arg(long, env = "TRONGRID_API_KEY", hide_env_values = true)]
    pub trongrid_api_key: String,

    /// TRON address to check (base58check, e.g. "T...")
    #[arg(long, env = "WATCH_ADDRESS")]
    pub watch_address: String,

    /// File holding the last observed blacklist status
    #[arg(long, env = "STATE_FILE", default_value = "state.json")]
    pub state_file: PathBuf,

    /// TronGrid base URL
    #[arg(long, env = "TRONGRID_URL", default_value = DEFAULT_TRONGRID_URL)]
    pub trongrid_url: String,
}
