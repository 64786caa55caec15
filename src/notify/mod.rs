//! Notification gateway: the single surface through which every
//! notification is raised.
//!
//! Permission checks and dismiss policy live here once, instead of at each
//! call site (detection path, startup confirmation, manual test, push
//! delivery).

pub mod desktop;
pub mod mock;

pub use desktop::DesktopGateway;
pub use mock::MockGateway;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Platform permission as last observed. The mirror is diagnostic;
/// emission decisions always re-check the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Default,
    Granted,
    Denied,
}

/// Auto-dismiss policy for detection reminders.
pub const REMINDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Dismiss policy for the permission-grant confirmation.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(3);

/// A single notification to display.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    /// Icon path or name; platform default when absent.
    pub icon: Option<String>,
    /// Same-tag notifications replace each other.
    pub tag: Option<String>,
    /// None keeps the notification up until acted on.
    pub timeout: Option<Duration>,
    /// Attach an explicit dismiss action.
    pub dismiss_action: bool,
}

impl NotificationRequest {
    /// A detection reminder: plain, auto-dismissed after five seconds.
    pub fn reminder(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
            tag: None,
            timeout: Some(REMINDER_TIMEOUT),
            dismiss_action: false,
        }
    }

    /// A pushed notification: stays up, tagged for replacement, dismissable.
    pub fn push(
        title: impl Into<String>,
        body: impl Into<String>,
        icon: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: Some(icon.into()),
            tag: Some(tag.into()),
            timeout: None,
            dismiss_action: true,
        }
    }
}

/// What became of a show request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Shown,
    /// Permission is not granted; the request was logged and dropped.
    NotPermitted,
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Ask the platform for permission. Invoked once, from an explicit user
    /// action or at startup. On a grant the gateway confirms with a
    /// short-lived test notification.
    async fn request_permission(&self) -> Result<PermissionState>;

    /// Last observed permission. Diagnostic only - never a substitute for
    /// the platform check `show` performs.
    fn permission(&self) -> PermissionState;

    /// Display a notification. Re-checks the authoritative platform
    /// permission first; not being permitted is an outcome, not an error.
    async fn show(&self, request: NotificationRequest) -> Result<ShowOutcome>;
}
