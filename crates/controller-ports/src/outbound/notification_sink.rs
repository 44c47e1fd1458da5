use async_trait::async_trait;

use gns3_protocol::NotificationEventDto;

/// Outbound port the application layer uses to publish an event without
/// knowing how the Notification Bus fans it out to subscribers (§4.6).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationSinkPort: Send + Sync {
    async fn publish(&self, event: NotificationEventDto);
}
