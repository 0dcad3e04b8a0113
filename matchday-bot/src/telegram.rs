//! Minimal Telegram Bot API client.
//!
//! Just the three methods the bot needs: `getMe`, `getUpdates` long polling,
//! and `sendMessage` with HTML parse mode. Wire types carry only the fields
//! we read.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let resp: ApiResponse<T> = self
            .http
            .post(format!("{}/{method}", self.base))
            .json(body)
            .send()
            .await
            .with_context(|| format!("{method} request failed"))?
            .json()
            .await
            .with_context(|| format!("{method} returned unparseable body"))?;
        if !resp.ok {
            bail!(
                "{method} rejected: {}",
                resp.description.unwrap_or_else(|| "no description".to_string())
            );
        }
        resp.result
            .with_context(|| format!("{method} response missing result"))
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = serde_json::json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        self.call("getUpdates", &body).await
    }

    /// Confirm-and-discard everything already queued, so a restart doesn't
    /// replay stale commands. Returns the offset to poll from.
    pub async fn drop_pending_updates(&self) -> Result<Option<i64>> {
        let backlog = self.get_updates(Some(-1), 0).await?;
        Ok(backlog.last().map(|u| u.update_id + 1))
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_parses_with_reply_target() {
        let json = serde_json::json!({
            "update_id": 7,
            "message": {
                "message_id": 1,
                "from": {"id": 10, "first_name": "Ana", "username": "ana"},
                "chat": {"id": -100, "type": "group"},
                "text": "/addadmin",
                "reply_to_message": {
                    "message_id": 0,
                    "from": {"id": 11, "first_name": "Ben"},
                    "chat": {"id": -100, "type": "group"}
                }
            }
        });
        let update: Update = serde_json::from_value(json).unwrap();
        let msg = update.message.unwrap();
        assert_eq!(msg.chat.id, -100);
        assert_eq!(msg.from.as_ref().unwrap().username.as_deref(), Some("ana"));
        let target = msg.reply_to_message.unwrap().from.unwrap();
        assert_eq!(target.id, 11);
        assert_eq!(target.username, None);
    }

    #[test]
    fn error_envelope_is_rejected() {
        let json = serde_json::json!({"ok": false, "description": "Unauthorized"});
        let resp: ApiResponse<Vec<Update>> = serde_json::from_value(json).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
        assert!(resp.result.is_none());
    }
}
