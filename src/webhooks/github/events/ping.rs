use serde::Deserialize;

/// Sent once when the webhook is created.
#[derive(Debug, Deserialize)]
pub struct PingEvent {
    pub zen: String,
    pub hook_id: Option<u64>,
}
