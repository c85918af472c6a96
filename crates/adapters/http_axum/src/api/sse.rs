//! Server-Sent Events (SSE) stream of characteristic pushes.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use hmipbridge_app::ports::SwitchControl;

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of [`CharacteristicChanged`] events.
///
/// Each push to the host becomes one JSON `data:` frame. The stream ends
/// when the client disconnects.
///
/// [`CharacteristicChanged`]: hmipbridge_domain::event::CharacteristicChanged
pub async fn stream<C>(
    State(state): State<AppState<C>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    C: SwitchControl + 'static,
{
    let events = BroadcastStream::new(state.host.subscribe()).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(skipped = n, "SSE subscriber lagged, events dropped");
            None
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
