//! Append-only review events. Records are drafted by the domain layer,
//! sequenced by the store on append, and fanned out to live listeners
//! over a broadcast bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use utoipa::ToSchema;

pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// One entry of the event log. `id` and `seq` are placeholders until
/// the store appends the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventRecord {
    pub id: String,
    pub seq: i64,
    pub at: DateTime<Utc>,
    pub correlation_id: Option<String>,
    pub source: EventSource,
    pub body: Value,
}

impl EventRecord {
    /// Drafts an unsequenced record around a tagged body such as
    /// `ReviewCompleted`.
    pub fn draft(
        source: EventSource,
        correlation_id: Option<String>,
        body: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: String::new(),
            seq: 0,
            at: Utc::now(),
            correlation_id,
            source,
            body: serde_json::to_value(body)?,
        })
    }

    /// The body's tag, e.g. `ReviewCompleted` or `RepoRegistered`.
    pub fn kind(&self) -> Option<&str> {
        self.body.get("type").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum EventSource {
    Api,
    Cli,
    Worker,
    Ui,
}

/// Live fan-out of appended records. Delivery is best effort: a bus
/// with no subscribers drops the record, and slow subscribers may lag.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventRecord>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the record.
    pub fn publish(&self, record: EventRecord) -> usize {
        self.sender.send(record).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> EventRecord {
        EventRecord::draft(
            EventSource::Api,
            Some("corr_test".to_string()),
            &json!({ "type": "ReviewSubmitted", "payload": {} }),
        )
        .unwrap()
    }

    #[test]
    fn draft_exposes_the_body_tag() {
        let record = record();
        assert_eq!(record.kind(), Some("ReviewSubmitted"));
        assert_eq!(record.seq, 0);
        assert!(record.id.is_empty());
    }

    #[test]
    fn publish_without_subscribers_drops_the_record() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(record()), 0);
    }

    #[tokio::test]
    async fn subscribers_see_published_records() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(record()), 1);
        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.kind(), Some("ReviewSubmitted"));
    }
}
