//! Push channel: clients join one room per URL and receive that job's
//! store events as they happen.

use std::collections::HashSet;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use warren_core::StoreEvent;

use crate::model::{ClientMessage, ServerMessage};
use crate::state::AppState;

type Sink = SplitSink<WebSocket, Message>;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.subscribe();
    let mut rooms: HashSet<String> = HashSet::new();
    debug!("push client connected");

    loop {
        tokio::select! {
            incoming = stream.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!(error = %e, "push client read failed");
                        break;
                    }
                };

                let message = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(error = %e, "ignoring malformed push frame");
                        continue;
                    }
                };

                let open = match message {
                    ClientMessage::PendingUrlRequest { urls } => {
                        let urls = urls.into_vec();
                        rooms.extend(urls.iter().cloned());
                        send_current_state(&mut sink, &state, &urls).await
                    }
                    ClientMessage::Ack { short_code } => {
                        match state.shortener().ack(&short_code).await {
                            Ok(Some(_)) => info!(code = %short_code, "job acknowledged"),
                            Ok(None) => debug!(code = %short_code, "ack for unknown code"),
                            Err(e) => warn!(code = %short_code, error = %e, "ack failed"),
                        }
                        true
                    }
                };
                if !open {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if rooms.contains(&event.data.original) && !send_event(&mut sink, &event).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "push client lagged, resending current state");
                    let urls: Vec<String> = rooms.iter().cloned().collect();
                    if !send_current_state(&mut sink, &state, &urls).await {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!(rooms = rooms.len(), "push client disconnected");
}

/// Sends the current state of each URL's job. Returns `false` once the
/// socket is gone.
async fn send_current_state(sink: &mut Sink, state: &AppState, urls: &[String]) -> bool {
    for url in urls {
        match state.shortener().current_state(url).await {
            Ok(Some(event)) => {
                if !send_event(sink, &event).await {
                    return false;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(url = %url, error = %e, "cannot read job state"),
        }
    }
    true
}

async fn send_event(sink: &mut Sink, event: &StoreEvent) -> bool {
    let frame = match serde_json::to_string(&ServerMessage::from(event)) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(event = %event.name(), error = %e, "cannot encode push frame");
            return true;
        }
    };
    sink.send(Message::Text(frame.into())).await.is_ok()
}
