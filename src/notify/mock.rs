//! In-memory gateway for exercising notification flows without a desktop.

use super::{NotificationGateway, NotificationRequest, PermissionState, ShowOutcome};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Records every request it is asked to show; permission is scripted.
pub struct MockGateway {
    permission: Mutex<PermissionState>,
    shown: Mutex<Vec<NotificationRequest>>,
}

impl MockGateway {
    pub fn granted() -> Self {
        Self::with_permission(PermissionState::Granted)
    }

    pub fn denied() -> Self {
        Self::with_permission(PermissionState::Denied)
    }

    pub fn with_permission(permission: PermissionState) -> Self {
        Self {
            permission: Mutex::new(permission),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn set_permission(&self, state: PermissionState) {
        *self.permission.lock().unwrap() = state;
    }

    pub fn shown(&self) -> Vec<NotificationRequest> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationGateway for MockGateway {
    async fn request_permission(&self) -> Result<PermissionState> {
        Ok(self.permission())
    }

    fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap()
    }

    async fn show(&self, request: NotificationRequest) -> Result<ShowOutcome> {
        if self.permission() != PermissionState::Granted {
            log::warn!(
                "🔕 Dropping notification '{}' - permission is {:?}",
                request.title,
                self.permission()
            );
            return Ok(ShowOutcome::NotPermitted);
        }
        self.shown.lock().unwrap().push(request);
        Ok(ShowOutcome::Shown)
    }
}
