//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::PlayerCommand;
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler. Connections are anonymous; each gets a
/// fresh id that lives until the socket closes.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    info!(conn_id = %conn_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    // Send welcome message
    let welcome = ServerMsg::Welcome {
        connection_id: conn_id,
        server_time: unix_millis(),
    };
    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(conn_id = %conn_id, error = %e, "Failed to send welcome");
        return;
    }

    // Private channel for targeted messages (dead, pong)
    let private_rx = state.connections.register(conn_id);
    let snapshot_rx = state.world.snapshot_tx.subscribe();

    run_session(
        conn_id,
        ws_sink,
        ws_stream,
        state.world.input_tx.clone(),
        snapshot_rx,
        private_rx,
    )
    .await;

    // Cleanup on disconnect
    state.connections.unregister(conn_id);

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    conn_id: Uuid,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    input_tx: mpsc::Sender<PlayerCommand>,
    mut snapshot_rx: broadcast::Receiver<ServerMsg>,
    mut private_rx: mpsc::UnboundedReceiver<ServerMsg>,
) {
    let rate_limiter = ConnectionRateLimiter::new();

    // Writer task: broadcast snapshots and targeted messages -> WebSocket
    let writer_conn_id = conn_id;
    let writer_handle = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                snapshot = snapshot_rx.recv() => match snapshot {
                    Ok(msg) => msg,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(
                            conn_id = %writer_conn_id,
                            lagged_count = n,
                            "Client lagged, skipping {} snapshots", n
                        );
                        // Continue - don't disconnect for lag
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(conn_id = %writer_conn_id, "Snapshot channel closed");
                        break;
                    }
                },
                private = private_rx.recv() => match private {
                    Some(msg) => msg,
                    None => {
                        debug!(conn_id = %writer_conn_id, "Private channel closed");
                        break;
                    }
                },
            };

            if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                debug!(conn_id = %writer_conn_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    // Reader loop: WebSocket -> world task
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    warn!(conn_id = %conn_id, "Rate limited input message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => {
                        let command = PlayerCommand {
                            conn: conn_id,
                            msg: client_msg,
                            received_at: unix_millis(),
                        };

                        if input_tx.send(command).await.is_err() {
                            debug!(conn_id = %conn_id, "Command channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(conn_id = %conn_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(conn_id = %conn_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                debug!(conn_id = %conn_id, "Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!(conn_id = %conn_id, "Received pong");
            }
            Ok(Message::Close(_)) => {
                info!(conn_id = %conn_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Signal disconnect to the world task so the player is removed
    let _ = input_tx
        .send(PlayerCommand {
            conn: conn_id,
            msg: ClientMsg::Disconnect,
            received_at: unix_millis(),
        })
        .await;

    // Abort writer task
    writer_handle.abort();
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
