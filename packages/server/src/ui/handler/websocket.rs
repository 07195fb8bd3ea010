//! WebSocket connection handlers.

use std::{fmt, sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{CloseInfo, ConnectionId, OutboundFrame},
    ui::state::AppState,
    usecase::RelayEngine,
};

/// How long to wait for queued frames to flush after the connection leaves the registry
const PUSHER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Why the pusher stopped
#[derive(Debug)]
enum PusherExit {
    /// A close frame was requested and sent
    CloseRequested,
    /// Writing to the socket failed
    SendFailed(String),
    /// Every sender was dropped (the connection left the registry)
    Drained,
}

/// How the inbound side of a connection ended
#[derive(Debug, PartialEq)]
enum Termination {
    Closed(CloseInfo),
    TransportError(String),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    if let Err(e) = state.origin_policy.check(headers.get(header::ORIGIN)) {
        tracing::warn!("Rejected WebSocket upgrade: {}", e);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Spawns a task that forwards queued frames to the WebSocket sender.
///
/// Frames pushed through the registry (broadcasts and the state replay) land
/// in `rx` and are written to this client in queue order.
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<PusherExit> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if let Err(e) = sender.send(Message::Text(text.into())).await {
                        tracing::debug!("Failed to write to '{}': {}", connection_id, e);
                        return PusherExit::SendFailed(e.to_string());
                    }
                }
                OutboundFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    return PusherExit::CloseRequested;
                }
            }
        }
        PusherExit::Drained
    })
}

/// Feeds inbound frames to the engine until the peer leaves or `stop` fires.
///
/// `stop` is only observed between frames, so a message already handed to the
/// engine is always relayed in full.
async fn receiver_loop<S, E>(
    connection_id: ConnectionId,
    mut receiver: S,
    engine: Arc<RelayEngine>,
    mut stop: oneshot::Receiver<()>,
) -> Termination
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    loop {
        let msg = tokio::select! {
            _ = &mut stop => return Termination::Closed(CloseInfo::abnormal()),
            msg = receiver.next() => msg,
        };
        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => return Termination::TransportError(e.to_string()),
            None => break,
        };

        match msg {
            Message::Text(text) => {
                // Rejections are logged by the engine
                let _ = engine.on_message(&connection_id, text.as_str()).await;
            }
            Message::Binary(bytes) => {
                tracing::debug!(
                    "Ignored binary frame ({} bytes) from '{}'",
                    bytes.len(),
                    connection_id
                );
            }
            Message::Close(frame) => {
                let close_info = match frame {
                    Some(frame) => CloseInfo::new(frame.code, frame.reason.as_str()),
                    None => CloseInfo::abnormal(),
                };
                return Termination::Closed(close_info);
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    // Stream ended without a close frame
    Termination::Closed(CloseInfo::abnormal())
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // The pusher must run before registration so the replay is flushed right away
    let mut send_task = pusher_loop(connection_id, rx, sender);
    state.engine.on_connect(connection_id, tx).await;

    let engine = state.engine.clone();
    let (stop_tx, stop_rx) = oneshot::channel();
    let mut recv_task = tokio::spawn(receiver_loop(connection_id, receiver, engine, stop_rx));

    let termination = tokio::select! {
        result = &mut recv_task => result.unwrap_or_else(|e| {
            Termination::TransportError(format!("receiver task failed: {}", e))
        }),
        result = &mut send_task => {
            // Let a message that is already being relayed finish before leaving
            let _ = stop_tx.send(());
            if let Err(e) = (&mut recv_task).await {
                tracing::debug!("Receiver for '{}' failed: {}", connection_id, e);
            }
            match result {
                Ok(PusherExit::SendFailed(e)) => Termination::TransportError(e),
                Ok(PusherExit::CloseRequested) | Ok(PusherExit::Drained) => {
                    Termination::Closed(CloseInfo::abnormal())
                }
                Err(e) => Termination::TransportError(format!("pusher task failed: {}", e)),
            }
        }
    };

    match termination {
        Termination::Closed(close_info) => {
            state
                .engine
                .on_disconnect(&connection_id, &close_info)
                .await;
        }
        Termination::TransportError(error) => {
            state
                .engine
                .on_transport_error(&connection_id, &error)
                .await;
        }
    }

    // Removal dropped the registry's sender, so the pusher ends once its queue is flushed
    if !send_task.is_finished()
        && tokio::time::timeout(PUSHER_DRAIN_TIMEOUT, &mut send_task)
            .await
            .is_err()
    {
        tracing::debug!(
            "Pusher for '{}' did not finish in time, aborting",
            connection_id
        );
        send_task.abort();
    }
}
