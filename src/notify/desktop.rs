//! Desktop implementation of the notification gateway over the XDG
//! notification service.
//!
//! The capability probe stands in for the browser's permission dialog:
//! a reachable notification server means granted, an unreachable one means
//! denied. The probe runs again before every `show` so a server that
//! disappears mid-session downgrades cleanly to dropped notifications.

use super::{
    NotificationGateway, NotificationRequest, PermissionState, ShowOutcome, CONFIRMATION_TIMEOUT,
};
use crate::error::{Result, SentryError};
use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use std::sync::{Arc, RwLock};

type ClickHandler = Arc<dyn Fn() + Send + Sync>;

pub struct DesktopGateway {
    /// Diagnostic mirror of the last platform probe.
    permission: RwLock<PermissionState>,
    on_click: ClickHandler,
}

impl DesktopGateway {
    pub fn new() -> Self {
        Self {
            permission: RwLock::new(PermissionState::Default),
            on_click: Arc::new(|| log::info!("🪟 Notification clicked - focus requested")),
        }
    }

    /// Replace the handler invoked when a notification is activated.
    pub fn with_click_handler(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Arc::new(handler);
        self
    }

    fn probe() -> PermissionState {
        match notify_rust::get_capabilities() {
            Ok(capabilities) => {
                log::debug!("Notification server capabilities: {:?}", capabilities);
                PermissionState::Granted
            }
            Err(e) => {
                log::warn!("Notification server unreachable: {}", e);
                PermissionState::Denied
            }
        }
    }

    async fn probe_platform(&self) -> Result<PermissionState> {
        let state = tokio::task::spawn_blocking(Self::probe)
            .await
            .map_err(|e| SentryError::Notification(format!("permission probe failed: {}", e)))?;
        if let Ok(mut mirror) = self.permission.write() {
            *mirror = state;
        }
        Ok(state)
    }

    /// Stable replace id for a tag, so same-tag notifications supersede each
    /// other. FNV-1a.
    fn tag_id(tag: &str) -> u32 {
        let mut hash: u32 = 0x811c9dc5;
        for byte in tag.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        hash
    }

    fn display(request: NotificationRequest, on_click: ClickHandler) -> Result<()> {
        let mut notification = Notification::new();
        notification
            .appname("sound-sentry")
            .summary(&request.title)
            .body(&request.body)
            .timeout(match request.timeout {
                Some(timeout) => Timeout::Milliseconds(timeout.as_millis() as u32),
                None => Timeout::Never,
            });

        if let Some(icon) = &request.icon {
            notification.icon(icon);
        }
        if let Some(tag) = &request.tag {
            notification.id(Self::tag_id(tag));
        }
        if request.dismiss_action {
            notification.action("dismiss", "Dismiss");
        }
        notification.action("default", "Open");

        let handle = notification
            .show()
            .map_err(|e| SentryError::Notification(e.to_string()))?;

        // Blocks until the notification is acted on or the server closes it.
        handle.wait_for_action(|action| match action {
            "default" => on_click(),
            "dismiss" => log::debug!("Notification dismissed"),
            _ => {}
        });
        Ok(())
    }
}

impl Default for DesktopGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationGateway for DesktopGateway {
    async fn request_permission(&self) -> Result<PermissionState> {
        let state = self.probe_platform().await?;

        match state {
            PermissionState::Granted => {
                log::info!("🔔 Notification permission granted");
                let confirmation = NotificationRequest {
                    title: "Notifications Enabled".to_string(),
                    body: "Test notification - Sound detection is ready!".to_string(),
                    icon: None,
                    tag: None,
                    timeout: Some(CONFIRMATION_TIMEOUT),
                    dismiss_action: false,
                };
                if let Err(e) = self.show(confirmation).await {
                    log::warn!("Could not show the confirmation notification: {}", e);
                }
            }
            _ => {
                log::warn!("🔕 Notification permission not granted - alerts stay disabled");
            }
        }

        Ok(state)
    }

    fn permission(&self) -> PermissionState {
        self.permission
            .read()
            .map(|mirror| *mirror)
            .unwrap_or(PermissionState::Default)
    }

    async fn show(&self, request: NotificationRequest) -> Result<ShowOutcome> {
        // Never trust the mirror: re-check the platform before emitting.
        let authoritative = self.probe_platform().await?;
        if authoritative != PermissionState::Granted {
            log::warn!(
                "🔕 Dropping notification '{}' - permission is {:?}",
                request.title,
                authoritative
            );
            return Ok(ShowOutcome::NotPermitted);
        }

        let on_click = self.on_click.clone();
        let title = request.title.clone();
        // Detached: wait_for_action blocks until the notification closes, and
        // concurrent shows are independent.
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::display(request, on_click) {
                log::error!("Failed to display notification '{}': {}", title, e);
            }
        });

        Ok(ShowOutcome::Shown)
    }
}
