use std::sync::Arc;

use tracing::debug;

use super::status::{OpKind, OpStatus};
use super::Shared;
use crate::errors::{ClientError, ValidationError};
use crate::models::NotificationRequest;

/// Fires a single best-effort email notification. Success is a terminal
/// confirmation; failure carries the service detail and is never retried.
#[derive(Clone)]
pub struct NotificationDispatcher {
    shared: Arc<Shared>,
}

impl NotificationDispatcher {
    pub(super) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub async fn notify(&self, recipient: &str, message: &str) -> Result<(), ClientError> {
        if recipient.is_empty() {
            return Err(ValidationError::NoRecipient.into());
        }

        let seq = self.shared.lock().ops.begin(OpKind::Notify);
        let request = NotificationRequest {
            email: recipient.to_string(),
            message: message.to_string(),
        };
        debug!(recipient, "notification requested");

        let result = self.shared.api.send_notification(&request).await;

        let outcome = if result.is_ok() {
            OpStatus::Succeeded
        } else {
            OpStatus::Failed
        };
        self.shared.lock().ops.try_complete(OpKind::Notify, seq, outcome);
        result
    }
}
