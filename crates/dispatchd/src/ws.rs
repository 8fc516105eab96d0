//! WebSocket event stream.
//!
//! `GET /v1/ws?station_id=<id>` upgrades and then pushes every
//! `DispatchEvent` concerning that station (or all events without the
//! parameter) as a JSON text frame. Client frames are ignored apart from
//! close.

use crate::api_error::ApiQuery;
use crate::notifier::Subscription;
use crate::server::AppStateArc;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    #[serde(default)]
    pub station_id: Option<String>,
}

pub async fn event_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppStateArc>,
    ApiQuery(params): ApiQuery<StreamParams>,
) -> Response {
    let station_id = params.station_id.filter(|s| !s.trim().is_empty());
    let subscription = state.dispatcher.notifier().subscribe(station_id.clone());
    info!(
        "  Event stream opened ({})",
        station_id.as_deref().unwrap_or("all stations")
    );
    ws.on_upgrade(move |socket| pump(socket, subscription))
}

async fn pump(mut socket: WebSocket, mut subscription: Subscription) {
    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else {
                    debug!("Notification bus closed");
                    break;
                };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to encode {}: {}", event.kind(), e);
                        continue;
                    }
                };
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!("Event stream read error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    info!("  Event stream closed");
}
