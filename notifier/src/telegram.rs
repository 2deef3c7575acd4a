use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::sink::AlertSink;
use crate::types::{ApiResponse, InlineKeyboardMarkup, Message, Update};

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telegram api rejected the call: {0}")]
    Api(String),
}

/// Thin client over the Telegram Bot API. Carries no business logic; the
/// monitor engine sees it only through `AlertSink`.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct EditMessageRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct AnswerCallbackRequest<'a> {
    callback_query_id: &'a str,
}

#[derive(Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
}

impl TelegramClient {
    /// `api_root` is `https://api.telegram.org` in production; tests point it
    /// at a local mock server.
    pub fn new(api_root: &str, token: &str) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{api_root}/bot{token}"),
        })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        api_method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/{}", self.base_url, api_method);

        let resp: ApiResponse<T> = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        if !resp.ok {
            return Err(TelegramError::Api(
                resp.description.unwrap_or_else(|| "no description".into()),
            ));
        }

        resp.result
            .ok_or_else(|| TelegramError::Api("ok response without result".into()))
    }

    #[instrument(skip(self, text), fields(chat_id = chat_id), level = "debug")]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
            reply_markup: None,
        };
        let _: Message = self.call("sendMessage", &body).await?;
        debug!("message delivered");
        Ok(())
    }

    #[instrument(skip(self, text, keyboard), fields(chat_id = chat_id), level = "debug")]
    pub async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &InlineKeyboardMarkup,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
            reply_markup: Some(keyboard),
        };
        let _: Message = self.call("sendMessage", &body).await?;
        Ok(())
    }

    /// Long-poll for new updates past `offset`.
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest { offset, timeout };
        self.call("getUpdates", &body).await
    }

    pub async fn answer_callback(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let body = AnswerCallbackRequest { callback_query_id };
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TelegramError> {
        let body = EditMessageRequest {
            chat_id,
            message_id,
            text,
        };
        let _: Message = self.call("editMessageText", &body).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AlertSink for TelegramClient {
    async fn send(&self, chat_id: i64, html_text: &str) -> anyhow::Result<()> {
        self.send_message(chat_id, html_text).await?;
        Ok(())
    }
}
