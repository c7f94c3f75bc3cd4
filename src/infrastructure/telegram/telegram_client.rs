use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::application::ports::{ChatClient, ChatClientError};
use crate::domain::{AudioFileRef, AudioKind, ChatId, InboundEvent, SenderIdentity, VoiceMessage};

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Longest text a single `sendMessage` accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Splits `text` into consecutive pieces of at most `max_chars` characters.
///
/// Splits fall on `char` boundaries, never inside a code point. Empty input
/// yields no pieces.
pub fn split_message(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        pieces.push(head);
        rest = tail;
    }
    pieces
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    from: Option<User>,
    #[serde(default)]
    voice: Option<FileAttachment>,
    #[serde(default)]
    audio: Option<FileAttachment>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileAttachment {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct File {
    #[serde(default)]
    file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BotUser {
    #[serde(default)]
    username: Option<String>,
}

impl Update {
    fn into_event(self) -> InboundEvent {
        let Some(message) = self.message else {
            return InboundEvent::other(self.update_id);
        };

        let file = match (message.voice, message.audio) {
            (Some(voice), _) => AudioFileRef::new(voice.file_id, AudioKind::Voice),
            (None, Some(audio)) => AudioFileRef::new(audio.file_id, AudioKind::Audio),
            (None, None) => return InboundEvent::other(self.update_id),
        };

        let sender = message
            .from
            .and_then(|user| user.username)
            .map(SenderIdentity::new)
            .unwrap_or_else(SenderIdentity::anonymous);

        InboundEvent::voice(
            self.update_id,
            VoiceMessage {
                chat_id: ChatId::new(message.chat.id),
                sender,
                file,
            },
        )
    }
}

/// Telegram Bot API client over plain HTTPS.
///
/// The bot token is part of every request URL, so request errors are logged
/// and returned with the URL stripped.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        poll_timeout: Duration,
    ) -> Result<Self, ChatClientError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ChatClientError::Configuration("bot token is empty".into()));
        }
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            poll_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<T, ChatClientError> {
        let mut request = self.http.post(self.method_url(method)).json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatClientError::Request(format!("{method}: {}", e.without_url())))?;

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| {
                ChatClientError::InvalidResponse(format!("{method}: {}", e.without_url()))
            })?;

        if !envelope.ok {
            return Err(ChatClientError::Api(format!(
                "{method}: {}",
                envelope.description.unwrap_or_else(|| "no description".into())
            )));
        }

        envelope
            .result
            .ok_or_else(|| ChatClientError::InvalidResponse(format!("{method}: missing result")))
    }

    /// Username of the bot account the token belongs to.
    pub async fn bot_username(&self) -> Result<String, ChatClientError> {
        let me: BotUser = self.call("getMe", json!({}), None).await?;
        Ok(me.username.unwrap_or_default())
    }
}

#[async_trait]
impl ChatClient for TelegramClient {
    async fn poll_events(&self, offset: i64) -> Result<Vec<InboundEvent>, ChatClientError> {
        let body = json!({
            "offset": offset,
            "timeout": self.poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                body,
                Some(self.poll_timeout + Duration::from_secs(10)),
            )
            .await?;

        Ok(updates.into_iter().map(Update::into_event).collect())
    }

    async fn download_audio(&self, file: &AudioFileRef) -> Result<Vec<u8>, ChatClientError> {
        let meta: File = self
            .call("getFile", json!({ "file_id": file.file_id }), None)
            .await?;
        let file_path = meta
            .file_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ChatClientError::MissingFilePath(file.file_id.clone()))?;

        let response = self
            .http
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| ChatClientError::Request(format!("download: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(ChatClientError::Api(format!(
                "download returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatClientError::Request(format!("download body: {}", e.without_url())))?;
        Ok(bytes.to_vec())
    }

    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), ChatClientError> {
        let pieces = split_message(text, MAX_MESSAGE_CHARS);
        let total = pieces.len();
        for (index, piece) in pieces.into_iter().enumerate() {
            let body = json!({ "chat_id": chat_id.as_i64(), "text": piece });
            let _: serde_json::Value = self.call("sendMessage", body, None).await?;
            tracing::debug!(chat_id = %chat_id, part = index + 1, parts = total, "Message sent");
        }
        Ok(())
    }
}
