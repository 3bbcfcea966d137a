//! Report composition.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::utils;

/// Fractional digits shown for USDT.
pub const TOKEN_DISPLAY_DECIMALS: u32 = 2;
/// Fractional digits shown for TRX.
pub const NATIVE_DISPLAY_DECIMALS: u32 = 6;

/// Message sent after an unfreeze, followed by [`BELL_MESSAGE`].
pub const UNFREEZE_MESSAGE: &str = "🎉🎉 Unfrozen! The address is no longer blacklisted ✅ (urgent)";
/// Follow-up sent after [`UNFREEZE_MESSAGE`] so the alert rings twice.
pub const BELL_MESSAGE: &str = "🔔🔔🔔";

/// Result of one check of the watched address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub token_balance: Decimal,
    pub native_balance: Decimal,
    pub blacklisted: bool,
    pub checked_at: DateTime<Utc>,
}

impl BalanceReport {
    /// Check time as `YYYY-MM-DD HH:MM UTC`.
    pub fn checked_at_text(&self) -> String {
        utils::format_check_time(self.checked_at)
    }

    /// Human-readable blacklist status shown in the report.
    ///
    /// # Returns
    ///
    /// `"Blacklisted 🚫"` when the address is frozen, otherwise
    /// `"Not blacklisted ✅"`.
    pub fn status_label(&self) -> &'static str {
        if self.blacklisted {
            "Blacklisted 🚫"
        } else {
            "Not blacklisted ✅"
        }
    }

    /// Renders the chat message for `address`, showing only its last 6 characters.
    pub fn render(&self, address: &str) -> String {
        format!(
            "📌 USDT check report\n\n\
             🏷️ Address: {}\n\
             📍 Status: {}\n\n\
             💵 USDT balance: {}\n\
             ⚡ TRX balance: {}\n\n\
             ⏰ Checked at: {}",
            utils::short_address(address),
            self.status_label(),
            utils::format_amount(self.token_balance, TOKEN_DISPLAY_DECIMALS),
            utils::format_amount(self.native_balance, NATIVE_DISPLAY_DECIMALS),
            self.checked_at_text(),
        )
    }
}

/// Message sent when a run fails after configuration was loaded.
pub fn failure_message(error: &impl std::fmt::Display) -> String {
    format!("❌ USDT check failed: {error}")
}
