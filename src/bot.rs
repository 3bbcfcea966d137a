//! Telegram notification channel.
//!
//! The check routine only needs "send this text, loudly or silently", which
//! is captured by the [`Notifier`] trait. [`TelegramNotifier`] implements it
//! on top of a teloxide `Bot` sharing the fixed HTTP timeout used for the
//! gateway.

use std::future::Future;

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::Recipient;

use crate::error::MonitorError;

/// A channel that accepts short text messages.
pub trait Notifier {
    /// Sends `text`. A `loud` message plays the client's notification sound;
    /// a quiet one is delivered silently.
    fn notify(&self, text: &str, loud: bool) -> impl Future<Output = Result<(), MonitorError>>;
}

/// Sends messages to a single chat through the Telegram Bot API.
pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl TelegramNotifier {
    /// Creates a notifier for `chat_id`, which is either a numeric chat id or
    /// an `@channel` username.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the HTTP client cannot be built.
    pub fn new(token: &str, chat_id: &str) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .timeout(crate::HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            bot: Bot::with_client(token, client),
            chat: parse_recipient(chat_id),
        })
    }
}

impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str, loud: bool) -> Result<(), MonitorError> {
        log::debug!("Sending Telegram message chat={:?} loud={}", self.chat, loud);

        self.bot
            .send_message(self.chat.clone(), text)
            .disable_notification(!loud)
            .await
            .map_err(|e| {
                log::error!("Failed to send Telegram message chat={:?}: {}", self.chat, e);
                e
            })?;

        Ok(())
    }
}

fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}
