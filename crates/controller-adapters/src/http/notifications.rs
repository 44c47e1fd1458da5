use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures_util::stream::Stream;
use gns3_domain_types::ProjectId;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;

use gns3_controller_composition::AppState;

/// Interval of the keepalive ping (§4.6); matches `NotificationBus`'s own
/// per-project `ping` event cadence.
const PING_INTERVAL: Duration = Duration::from_secs(10);

/// A subscriber absent for this long has its subscription closed (§4.6).
const ABSENCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Server-sent events subscription to one project's notification stream
/// (§4.6). A lagged receiver just skips ahead to the next event rather
/// than closing the stream — the bus already tolerates lossy
/// subscribers (`subscriber-lag`). SSE has no client-to-server frame to
/// detect absence with, so the 30s rule is enforced the only way an
/// HTTP response stream can: `KeepAlive` writes a comment every
/// [`PING_INTERVAL`], and a write against a vanished client fails and
/// drops the stream well inside the 30s window.
pub async fn sse(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    let receiver = state.core.notifications.subscribe(project_id).await;
    let stream = futures_util::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&event) else { continue };
                    return Some((Ok(Event::default().data(json)), receiver));
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::new().interval(PING_INTERVAL))
}

pub async fn ws(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<ProjectId>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| handle_ws(socket, state, project_id))
}

/// Drives one WebSocket subscription: forwards bus events, and tracks
/// `last_seen` against every inbound client frame (including the `Pong`
/// a browser sends automatically in reply to our `Ping`). If nothing
/// arrives from the client for [`ABSENCE_TIMEOUT`], the subscription is
/// closed (§4.6) rather than left open against a vanished client.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, project_id: ProjectId) {
    let mut receiver = state.core.notifications.subscribe(project_id).await;
    let mut last_seen = Instant::now();
    let mut ticker = tokio::time::interval(PING_INTERVAL);
    ticker.tick().await;

    loop {
        tokio::select! {
            event = receiver.recv() => {
                match event {
                    Ok(event) => {
                        let Ok(json) = serde_json::to_string(&event) else { continue };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(_)) => last_seen = Instant::now(),
                    Some(Err(_)) | None => break,
                }
            }
            _ = ticker.tick() => {
                if last_seen.elapsed() >= ABSENCE_TIMEOUT {
                    tracing::info!(%project_id, "closing notification subscription after client absence");
                    break;
                }
                if socket.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
        }
    }
}
