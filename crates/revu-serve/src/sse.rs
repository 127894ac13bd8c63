use crate::routes::error::map_error;
use crate::{build_hub, AppState};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, StreamExt};
use revu_events::EventRecord;
use tokio_stream::wrappers::BroadcastStream;

/// Replays stored events past `after`, then switches to the live bus.
/// Each SSE frame is named after the record's body tag and carries the
/// sequence number as its id, so clients can resume with `after`.
pub async fn subscribe(state: AppState, after: Option<i64>) -> Response {
    let hub = match build_hub(&state) {
        Ok(hub) => hub,
        Err(err) => return map_error(&err, None).into_response(),
    };
    let history = match hub.events().list(after, None) {
        Ok(events) => events,
        Err(err) => return map_error(&err, None).into_response(),
    };

    let history_stream = stream::iter(
        history
            .into_iter()
            .map(|record| Ok::<Event, std::convert::Infallible>(to_sse_event(&record))),
    );
    let live_stream = BroadcastStream::new(state.event_bus.subscribe()).filter_map(|item| async {
        match item {
            Ok(record) => Some(Ok(to_sse_event(&record))),
            // A lagged subscriber resumes with whatever the bus still holds.
            Err(_) => None,
        }
    });

    Sse::new(history_stream.chain(live_stream))
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn to_sse_event(record: &EventRecord) -> Event {
    let data = serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string());
    let mut event = Event::default().id(record.seq.to_string()).data(data);
    if let Some(kind) = record.kind() {
        event = event.event(kind);
    }
    event
}
