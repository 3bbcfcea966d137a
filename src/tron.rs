//! TronGrid gateway client.
//!
//! This module provides a client for the two TronGrid endpoints a check needs:
//! the constant contract call used to ask the USDT contract whether an address
//! is blacklisted, and the account endpoint that lists TRX and TRC-20 balances.
//!
//! # Examples
//!
//! ```no_run
//! use usdt_watcher::tron::{TronAddress, TronGridClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), usdt_watcher::MonitorError> {
//!     let client = TronGridClient::new("https://api.trongrid.io", "api-key")?;
//!     let address: TronAddress = "TLa2f6VPqDgRE67v1736s7bJ8Ray5wYjU7".parse()?;
//!     let blocked = client.is_blacklisted(&address).await?;
//!     let balances = client.fetch_balances(&address).await?;
//!     println!("blocked={blocked} usdt={} trx={}", balances.token, balances.native);
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;
use crate::utils;

/// TronGrid's public endpoint.
pub const DEFAULT_TRONGRID_URL: &str = "https://api.trongrid.io";

/// USDT (TRC-20) contract on TRON mainnet.
pub const USDT_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Header carrying the TronGrid API key.
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

const BLACKLIST_SELECTOR: &str = "isBlackListed(address)";

/// A base58check-encoded TRON address together with its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TronAddress {
    base58: String,
    raw: Vec<u8>,
}

impl TronAddress {
    /// The address as given, in base58check form.
    pub fn as_base58(&self) -> &str {
        &self.base58
    }

    /// Raw address bytes (version byte included) as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.raw)
    }

    /// The address hex left-padded with zeros to a 32-byte ABI argument slot.
    pub fn to_abi_word(&self) -> String {
        format!("{:0>64}", self.to_hex())
    }
}

impl FromStr for TronAddress {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base58 = s.trim();
        if base58.is_empty() {
            return Err(MonitorError::InvalidAddress {
                address: s.to_string(),
                reason: "address is empty".to_string(),
            });
        }

        let raw = bs58::decode(base58)
            .with_check(None)
            .into_vec()
            .map_err(|e| MonitorError::InvalidAddress {
                address: base58.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            base58: base58.to_string(),
            raw,
        })
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base58)
    }
}

/// Request body for `wallet/triggerconstantcontract`.
#[derive(Serialize)]
struct TriggerConstantRequest {
    owner_address: String,
    contract_address: String,
    function_selector: &'static str,
    parameter: String,
    visible: bool,
}

#[derive(Deserialize)]
struct TriggerConstantResponse {
    #[serde(default)]
    constant_result: Vec<String>,
    #[serde(default)]
    result: Option<TriggerOutcome>,
}

#[derive(Deserialize)]
struct TriggerOutcome {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct AccountResponse {
    #[serde(default)]
    data: Vec<AccountData>,
}

#[derive(Deserialize)]
struct AccountData {
    /// TRX balance in sun.
    #[serde(default)]
    balance: u64,
    /// Single-key objects mapping a contract address to a raw amount.
    #[serde(default)]
    trc20: Vec<serde_json::Value>,
}

/// Balances of the watched account, in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    /// USDT balance.
    pub token: Decimal,
    /// TRX balance.
    pub native: Decimal,
}

impl Balances {
    /// Both balances zero; reported for an account the gateway has no data for.
    pub const ZERO: Balances = Balances {
        token: Decimal::ZERO,
        native: Decimal::ZERO,
    };
}

/// Client for the TronGrid HTTP gateway.
pub struct TronGridClient {
    client: reqwest::Client,
    base_url: String,
    usdt_contract: TronAddress,
}

impl TronGridClient {
    /// Creates a client that sends `api_key` with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, MonitorError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key).map_err(|e| {
            MonitorError::Config(format!("API key is not a valid header value: {e}"))
        })?;
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .timeout(crate::HTTP_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            usdt_contract: USDT_CONTRACT.parse()?,
        })
    }

    /// Asks the USDT contract whether `address` is on its blacklist.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the request fails, the gateway answers with a non-2xx
    /// status, the result list is empty, or the result word is not hex.
    pub async fn is_blacklisted(&self, address: &TronAddress) -> Result<bool, MonitorError> {
        let url = format!("{}/wallet/triggerconstantcontract", self.base_url);
        log::debug!("Querying blacklist address={} endpoint={}", address, url);

        let request = TriggerConstantRequest {
            owner_address: address.to_hex(),
            contract_address: self.usdt_contract.to_hex(),
            function_selector: BLACKLIST_SELECTOR,
            parameter: address.to_abi_word(),
            visible: false,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Blacklist request failed address={}: {}", address, e);
                e
            })?;

        log::debug!(
            "Blacklist query completed address={} duration_ms={} status={:?}",
            address,
            start.elapsed().as_millis(),
            response.status()
        );

        let trigger: TriggerConstantResponse = response.error_for_status()?.json().await?;

        let Some(word) = trigger.constant_result.first() else {
            let message = trigger.result.and_then(|r| r.message).map(decode_gateway_message);
            log::error!("Empty contract result address={} message={:?}", address, message);
            return Err(MonitorError::EmptyContractResult(message));
        };

        let blocked = parse_bool_word(word)?;
        log::debug!("Blacklist status address={} blacklisted={}", address, blocked);
        Ok(blocked)
    }

    /// Fetches TRX and USDT balances for `address`.
    ///
    /// An account the gateway has no data for resolves to zero balances.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the request fails, the status is non-2xx, or the body
    /// is not the expected JSON shape.
    pub async fn fetch_balances(&self, address: &TronAddress) -> Result<Balances, MonitorError> {
        let url = format!("{}/v1/accounts/{}", self.base_url, address);
        log::debug!("Fetching balances address={} endpoint={}", address, url);

        let start = Instant::now();
        let response = self.client.get(&url).send().await.map_err(|e| {
            log::error!("Account request failed address={}: {}", address, e);
            e
        })?;

        log::debug!(
            "Account query completed address={} duration_ms={} status={:?}",
            address,
            start.elapsed().as_millis(),
            response.status()
        );

        let account: AccountResponse = response.error_for_status()?.json().await?;

        let Some(data) = account.data.first() else {
            log::info!("No account data, reporting zero balances address={}", address);
            return Ok(Balances::ZERO);
        };

        let native = utils::from_subunits(data.balance);
        let token = data
            .trc20
            .iter()
            .find_map(|entry| entry.get(USDT_CONTRACT))
            .map(|raw| utils::parse_token_amount(&raw_amount_text(raw)))
            .unwrap_or(Decimal::ZERO);

        log::debug!("Fetched balances address={} usdt={} trx={}", address, token, native);
        Ok(Balances { token, native })
    }
}

/// Interprets a 32-byte hex result word as a boolean (`== 1`).
pub fn parse_bool_word(word: &str) -> Result<bool, MonitorError> {
    let word = word.trim();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MonitorError::UnexpectedResponse(format!(
            "contract result is not a hex word: {word:?}"
        )));
    }
    Ok(word.trim_start_matches('0') == "1")
}

/// TronGrid hex-encodes error messages; fall back to the text as given.
fn decode_gateway_message(message: String) -> String {
    hex::decode(&message)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or(message)
}

fn raw_amount_text(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
