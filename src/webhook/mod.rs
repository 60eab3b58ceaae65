// Outbound registration notification, Discord-compatible payload.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub tts: bool,
}

#[derive(Clone, Debug)]
pub struct WebhookClient {
    url: String,
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let url = url.into();
        tracing::debug!(%url, "creating WebhookClient");
        Ok(WebhookClient { url, client })
    }

    /// Best-effort announcement of a new registration. Callers dispatch
    /// this on its own task; the registration response never waits on it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn send_registration(&self, username: &str) -> anyhow::Result<()> {
        let payload = WebhookPayload {
            content: format!("User **{username}** has successfully registered."),
            username: "KOReader Sync".to_string(),
            avatar_url: None,
            tts: false,
        };
        let resp = self.client.post(&self.url).json(&payload).send().await?;
        tracing::info!(url = %self.url, status = %resp.status(), "sent registration webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_without_avatar() {
        let payload = WebhookPayload {
            content: "User **alice** has successfully registered.".into(),
            username: "KOReader Sync".into(),
            avatar_url: None,
            tts: false,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "User **alice** has successfully registered.",
                "username": "KOReader Sync",
                "tts": false
            })
        );
    }
}
