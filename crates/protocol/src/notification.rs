use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The single event shape carried by every notification stream (§4.6):
/// `{action, event, project_id?}`. `event` is intentionally an opaque
/// JSON value — each action's payload shape is documented by the
/// producer, not enforced by the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEventDto {
    pub action: String,
    pub event: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl NotificationEventDto {
    pub fn new(action: impl Into<String>, event: Value, project_id: Option<String>) -> Self {
        Self { action: action.into(), event, project_id }
    }

    pub fn ping() -> Self {
        Self::new("ping", Value::Null, None)
    }

    pub fn project_closed(project_id: String) -> Self {
        Self::new("project.closed", Value::Null, Some(project_id))
    }
}
