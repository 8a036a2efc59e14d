use chrono::Utc;
use tracing::debug;

use shared_store::{Collection, JsonStore, StoreError};

use crate::models::NotificationRecord;

/// Append-only notification log. Written to as a lifecycle side effect,
/// never read back.
pub struct NotificationSink<'a> {
    store: &'a JsonStore,
}

impl<'a> NotificationSink<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    pub async fn notify(&self, recipient_id: u64, message: impl Into<String>) -> Result<(), StoreError> {
        let message = message.into();
        debug!("Notifying user {}: {}", recipient_id, message);

        self.store
            .update(Collection::Notifications, |items: &mut Vec<NotificationRecord>| {
                items.push(NotificationRecord {
                    recipient_id,
                    message,
                    timestamp: Utc::now(),
                });
            })
            .await
    }
}
