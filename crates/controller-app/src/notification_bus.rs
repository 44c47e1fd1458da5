//! Notification Bus (§4.6): merges events from every Compute Proxy and
//! the Controller Core's own state changes, fans them out per project.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::Mutex;

use gns3_controller_ports::outbound::NotificationSinkPort;
use gns3_domain_types::ProjectId;
use gns3_protocol::NotificationEventDto;

/// Bounded per-project queue (§4.6): a slow subscriber drops the oldest
/// event rather than stalling the producer.
const SUBSCRIBER_QUEUE_CAPACITY: usize = 1000;

/// Interval of the keepalive `ping` sent on every subscribed stream.
const PING_INTERVAL: Duration = Duration::from_secs(10);

struct ProjectChannel {
    sender: broadcast::Sender<NotificationEventDto>,
}

/// In-process pub/sub hub, one broadcast channel per project. Events
/// with no `project_id` (none defined by the core today, but the wire
/// shape allows it) are dropped rather than guessed at.
pub struct NotificationBus {
    channels: Mutex<HashMap<ProjectId, Arc<ProjectChannel>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self { channels: Mutex::new(HashMap::new()) }
    }

    async fn channel_for(&self, project_id: ProjectId) -> Arc<ProjectChannel> {
        let mut channels = self.channels.lock().await;
        Arc::clone(channels.entry(project_id).or_insert_with(|| {
            let (sender, _receiver) = broadcast::channel(SUBSCRIBER_QUEUE_CAPACITY);
            Arc::new(ProjectChannel { sender })
        }))
    }

    /// Publishes an event to its project's subscribers. Events without
    /// a `project_id` are logged and discarded — every known action in
    /// §4.6 carries one except the bus's own `ping`, which subscribers
    /// never need delivered back to them as a publish.
    pub async fn publish(&self, event: NotificationEventDto) {
        let Some(project_id) = event.project_id.as_deref().and_then(|s| s.parse::<ProjectId>().ok()) else {
            tracing::trace!(action = %event.action, "dropping notification with no project_id");
            return;
        };
        let channel = self.channel_for(project_id).await;
        // A `send` error just means zero subscribers are currently
        // listening; that is not a failure condition for the bus.
        let _ = channel.sender.send(event);
    }

    /// Subscribes to a project's stream. The returned receiver lags
    /// (drops the oldest event and logs `subscriber-lag`) rather than
    /// blocking the bus if the consumer falls behind.
    pub async fn subscribe(&self, project_id: ProjectId) -> broadcast::Receiver<NotificationEventDto> {
        self.channel_for(project_id).await.sender.subscribe()
    }

    /// Sends the terminal `project.closed` event and drops the channel
    /// so any further publish for this project is silently discarded
    /// (§4.6).
    pub async fn close_project(&self, project_id: ProjectId) {
        let mut channels = self.channels.lock().await;
        if let Some(channel) = channels.remove(&project_id) {
            let _ = channel.sender.send(NotificationEventDto::project_closed(project_id.to_string()));
        }
    }

    /// Spawns the background task that emits a `ping` on every active
    /// project channel every [`PING_INTERVAL`] (§4.6). A ping is sent
    /// directly to each channel rather than through `publish`, since it
    /// is routed by which channel it keeps warm, not by a `project_id`
    /// field on the envelope. The 30s absence-closes-the-subscription
    /// half of §4.6 is enforced per connection in
    /// `controller-adapters`' `sse`/`handle_ws`, since only they can see
    /// whether a given client is still replying.
    pub fn spawn_ping_loop(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let bus = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(PING_INTERVAL).await;
                let channels: Vec<Arc<ProjectChannel>> = bus.channels.lock().await.values().cloned().collect();
                for channel in channels {
                    let _ = channel.sender.send(NotificationEventDto::ping());
                }
            }
        })
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationSinkPort for NotificationBus {
    async fn publish(&self, event: NotificationEventDto) {
        NotificationBus::publish(self, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events_in_order() {
        let bus = NotificationBus::new();
        let project_id = ProjectId::new();
        let mut rx = bus.subscribe(project_id).await;

        bus.publish(NotificationEventDto::new("node.started", serde_json::json!({"n": 1}), Some(project_id.to_string())))
            .await;
        bus.publish(NotificationEventDto::new("node.stopped", serde_json::json!({"n": 2}), Some(project_id.to_string())))
            .await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.action, "node.started");
        assert_eq!(second.action, "node.stopped");
    }

    #[tokio::test]
    async fn events_without_a_project_id_are_dropped() {
        let bus = NotificationBus::new();
        let project_id = ProjectId::new();
        let mut rx = bus.subscribe(project_id).await;

        bus.publish(NotificationEventDto::ping()).await;
        bus.publish(NotificationEventDto::new("node.started", serde_json::json!({}), Some(project_id.to_string())))
            .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, "node.started");
    }

    #[tokio::test]
    async fn closing_a_project_sends_the_terminal_event() {
        let bus = NotificationBus::new();
        let project_id = ProjectId::new();
        let mut rx = bus.subscribe(project_id).await;

        bus.close_project(project_id).await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, "project.closed");
    }
}
