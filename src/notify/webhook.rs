use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;

use async_trait::async_trait;

use super::Advisory;
use super::MessageHandle;
use super::Notifier;
use super::OfflineNotice;
use super::PolicyAlert;
use super::StatusUpdate;
use crate::feed::build_client;
use crate::NetworkConfig;
use crate::NotifyConfig;
use crate::NotifyError;
use crate::Result;
use crate::Role;

// Panel accent colors
const COLOR_ONLINE_PILOT: u32 = 0x3498db;
const COLOR_ONLINE_CONTROLLER: u32 = 0x2ecc71;
const COLOR_OFFLINE: u32 = 0xe74c3c;
const COLOR_ALERT: u32 = 0xe67e22;
const COLOR_ADVISORY: u32 = 0x3498db;

/// Sends rendered panels to a webhook channel.
///
/// New messages are posted with `wait=true` so the endpoint returns the
/// created message id; that id is the handle later edits address.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
    sender_name: String,
}

#[derive(Debug, serde::Deserialize)]
struct CreatedMessage {
    id: Option<String>,
}

impl WebhookNotifier {
    pub fn new(
        network: &NetworkConfig,
        notify: &NotifyConfig,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(network)?,
            webhook_url: notify.webhook_url.trim_end_matches('/').to_string(),
            sender_name: notify.sender_name.clone(),
        })
    }

    async fn post(
        &self,
        embed: Value,
    ) -> Result<Option<String>> {
        let body = json!({
            "username": self.sender_name,
            "embeds": [embed],
        });
        let url = format!("{}?wait=true", self.webhook_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }

        let created: CreatedMessage = response.json().await.unwrap_or(CreatedMessage { id: None });
        Ok(created.id)
    }

    async fn patch(
        &self,
        handle: &MessageHandle,
        embed: Value,
    ) -> Result<()> {
        let body = json!({ "embeds": [embed] });
        let url = format!("{}/messages/{}", self.webhook_url, handle.0);
        let response = self
            .client
            .patch(&url)
            .json(&body)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }
        Ok(())
    }

    fn status_embed(
        &self,
        update: &StatusUpdate,
    ) -> Value {
        let is_pilot = update.role == Role::Pilot;
        let color = if is_pilot {
            COLOR_ONLINE_PILOT
        } else {
            COLOR_ONLINE_CONTROLLER
        };

        let mut fields: Vec<Value> = vec![
            json!({"name": "Callsign", "value": update.callsign, "inline": true}),
            json!({"name": "CID", "value": update.cid.to_string(), "inline": true}),
        ];
        if let Some(military) = &update.military_rating {
            fields.push(json!({"name": "Military Rating", "value": military, "inline": true}));
        }
        for (field, value) in update.fingerprint.iter() {
            // Callsign and role tag already appear in the title line
            if field == "callsign" || field == "status" {
                continue;
            }
            let rendered = if field == "start_time" {
                render_timestamp(value)
            } else {
                value.to_string()
            };
            if rendered.is_empty() {
                continue;
            }
            fields.push(json!({"name": field, "value": rendered, "inline": true}));
        }

        json!({
            "title": format!("{} is online as {}", update.label, update.role),
            "color": color,
            "fields": fields,
            "footer": {"text": format!("Updated: {}", update.updated_keys.join(", "))},
            "timestamp": DateTime::from_timestamp(update.updated_at as i64, 0)
                .unwrap_or_else(Utc::now)
                .to_rfc3339(),
        })
    }
}

/// ISO timestamps render as `YYYY-MM-DD HH:MMZ`; anything unparseable is
/// passed through untouched.
pub(crate) fn render_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.with_timezone(&Utc).format("%Y-%m-%d %H:%MZ").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_online(
        &self,
        update: &StatusUpdate,
    ) -> Result<MessageHandle> {
        let id = self.post(self.status_embed(update)).await?;
        match id {
            Some(id) => Ok(MessageHandle(id)),
            None => Err(NotifyError::MissingHandle.into()),
        }
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        update: &StatusUpdate,
    ) -> Result<()> {
        self.patch(handle, self.status_embed(update)).await
    }

    async fn send_offline(
        &self,
        notice: &OfflineNotice,
    ) -> Result<()> {
        let embed = json!({
            "title": format!("{} is offline", notice.label),
            "description": notice.detail,
            "color": COLOR_OFFLINE,
        });
        self.post(embed).await.map(|_| ())
    }

    async fn send_alert(
        &self,
        alert: &PolicyAlert,
    ) -> Result<()> {
        let mut detail = format!(
            "**Name:** {}\n**CID:** {}\n**Callsign:** {}\n**Type:** {}\n**Issues:** {}",
            alert.name,
            alert.cid,
            alert.callsign,
            alert.role,
            alert.reasons.join(", ")
        );
        if let Some(frequency) = &alert.frequency {
            detail.push_str(&format!("\n**Frequency:** {}", frequency));
        }
        if let Some((lat, lon)) = alert.position {
            detail.push_str(&format!("\n**Position:** {:.4}, {:.4}", lat, lon));
        }

        let embed = json!({
            "title": "Suspected name-policy violation detected",
            "description": "Account holders must use their real name, an appropriate shortening, or their account id.",
            "color": COLOR_ALERT,
            "fields": [{"name": "Violation Details", "value": detail, "inline": false}],
            "footer": {"text": "This may be a false positive. Manual review recommended."},
        });
        self.post(embed).await.map(|_| ())
    }

    async fn send_advisory(
        &self,
        advisory: &Advisory,
    ) -> Result<()> {
        let mut embed = json!({
            "title": advisory.title,
            "description": advisory.detail,
            "color": COLOR_ADVISORY,
            "footer": {"text": format!("Source: {}", advisory.source)},
        });
        if let Some(recorded_at) = advisory.recorded_at {
            if let Some(timestamp) = DateTime::from_timestamp(recorded_at as i64, 0) {
                embed["timestamp"] = json!(timestamp.to_rfc3339());
            }
        }
        self.post(embed).await.map(|_| ())
    }
}
