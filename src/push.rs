//! Push payload handling: parse, pick the icon, deliver through the
//! gateway.
//!
//! Pushed notifications stay up until acted on and replace any earlier
//! notification of the same type; malformed payloads are logged and
//! dropped without reaching the gateway.

use crate::classifier::SoundLabel;
use crate::error::{Result, SentryError};
use crate::notify::{NotificationGateway, NotificationRequest, ShowOutcome};
use serde::Deserialize;
use std::sync::Arc;

/// Icon assets keyed by payload type.
#[derive(Debug, Clone)]
pub struct IconSet {
    pub water: String,
    pub key: String,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            water: "public/icons/water-icon.png".to_string(),
            key: "public/icons/key-icon.png".to_string(),
        }
    }
}

/// A pushed notification payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PushPayload {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw)
            .map_err(|e| SentryError::Push(format!("malformed push payload: {}", e)))
    }
}

pub struct PushWorker {
    gateway: Arc<dyn NotificationGateway>,
    icons: IconSet,
}

impl PushWorker {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self::with_icons(gateway, IconSet::default())
    }

    pub fn with_icons(gateway: Arc<dyn NotificationGateway>, icons: IconSet) -> Self {
        Self { gateway, icons }
    }

    /// Water payloads get the water icon, everything else the key icon.
    fn icon_for(&self, kind: &str) -> &str {
        match kind.parse::<SoundLabel>() {
            Ok(SoundLabel::Water) => &self.icons.water,
            _ => &self.icons.key,
        }
    }

    /// Deliver a parsed payload through the gateway.
    pub async fn deliver(&self, payload: PushPayload) -> Result<ShowOutcome> {
        let kind = payload.kind;
        let icon = self.icon_for(&kind).to_string();
        let request = NotificationRequest::push(payload.title, payload.message, icon, kind.clone());

        let outcome = self.gateway.show(request).await?;
        log::info!(
            "📨 Push '{}' delivered at {} - {:?}",
            kind,
            chrono::Utc::now().format("%H:%M:%S"),
            outcome
        );
        Ok(outcome)
    }

    /// Raw entry point for the push endpoint. Empty bodies are ignored;
    /// malformed ones are logged and dropped.
    pub async fn handle_raw(&self, raw: &[u8]) {
        if raw.is_empty() {
            return;
        }
        match PushPayload::parse(raw) {
            Ok(payload) => {
                if let Err(e) = self.deliver(payload).await {
                    log::error!("Push delivery failed: {}", e);
                }
            }
            Err(e) => log::error!("Error processing push event: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MockGateway;

    fn worker() -> (PushWorker, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::granted());
        (PushWorker::new(gateway.clone()), gateway)
    }

    #[test]
    fn test_parse_valid_payload() {
        let payload =
            PushPayload::parse(br#"{"title":"T","message":"M","type":"door"}"#).unwrap();
        assert_eq!(payload.title, "T");
        assert_eq!(payload.message, "M");
        assert_eq!(payload.kind, "door");
    }

    #[test]
    fn test_parse_rejects_malformed_payload() {
        assert!(matches!(
            PushPayload::parse(b"{not json"),
            Err(SentryError::Push(_))
        ));
        assert!(matches!(
            PushPayload::parse(br#"{"title":"T"}"#),
            Err(SentryError::Push(_))
        ));
    }

    #[tokio::test]
    async fn test_door_push_uses_key_icon_and_tag() {
        let (worker, gateway) = worker();
        worker
            .deliver(PushPayload {
                title: "T".to_string(),
                message: "M".to_string(),
                kind: "door".to_string(),
            })
            .await
            .unwrap();

        let shown = gateway.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].icon.as_deref(), Some("public/icons/key-icon.png"));
        assert_eq!(shown[0].tag.as_deref(), Some("door"));
        assert_eq!(shown[0].timeout, None);
        assert!(shown[0].dismiss_action);
    }

    #[tokio::test]
    async fn test_water_push_uses_water_icon() {
        let (worker, gateway) = worker();
        worker
            .deliver(PushPayload {
                title: "Water Reminder".to_string(),
                message: "Water detected".to_string(),
                kind: "water".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            gateway.shown()[0].icon.as_deref(),
            Some("public/icons/water-icon.png")
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_falls_back_to_key_icon() {
        let (worker, gateway) = worker();
        worker
            .deliver(PushPayload {
                title: "T".to_string(),
                message: "M".to_string(),
                kind: "bell".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(gateway.shown()[0].icon.as_deref(), Some("public/icons/key-icon.png"));
    }

    #[tokio::test]
    async fn test_handle_raw_drops_empty_and_malformed() {
        let (worker, gateway) = worker();
        worker.handle_raw(b"").await;
        worker.handle_raw(b"{not json").await;
        assert!(gateway.shown().is_empty());

        worker
            .handle_raw(br#"{"title":"T","message":"M","type":"water"}"#)
            .await;
        assert_eq!(gateway.shown().len(), 1);
    }
}
