use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::game_manager::GameManager;
use wordle_types::{ClientMessage, GameError};

pub mod connection;
pub mod handlers;
pub mod rate_limiter;


pub use connection::{ConnectionId, ConnectionManager};
use handlers::MessageHandler;
use rate_limiter::RateLimiter;

pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();

    // Create connection and get receiver for outgoing messages
    let message_receiver = connection_manager.create_connection(connection_id).await;

    let message_handler =
        MessageHandler::new(connection_id, connection_manager.clone(), game_manager);

    let incoming_handler = {
        let message_handler = message_handler.clone();
        let mut rate_limiter = RateLimiter::new();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) if msg.is_close() => break,
                    Ok(msg) => {
                        if let Err(e) =
                            handle_message(msg, &mut rate_limiter, &message_handler, connection_id)
                                .await
                        {
                            error!("Error handling message for {}: {}", connection_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Ends when the connection's channel closes, including inactivity cleanup
    let outgoing_handler = async move {
        let mut receiver = message_receiver;

        while let Some(message) = receiver.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }

        let _ = ws_sender.close().await;
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    if let Some(connection) = connection_manager.get_connection(connection_id).await {
        let username = connection
            .identity
            .as_ref()
            .map_or("unauthenticated", |identity| identity.display_name.as_str());
        info!(
            "Connection {} ({}) disconnected after {:?}",
            connection_id,
            username,
            connection.connected_at.elapsed()
        );
    } else {
        info!("Connection {} disconnected", connection_id);
    }
    message_handler.handle_disconnect().await;
    connection_manager.remove_connection(connection_id).await;
}

/// Errors returned here close the connection. Bad input and rate limiting
/// are reported to the client instead.
async fn handle_message(
    msg: Message,
    rate_limiter: &mut RateLimiter,
    message_handler: &MessageHandler,
    connection_id: ConnectionId,
) -> Result<(), String> {
    if !rate_limiter.check_rate_limit() {
        warn!("Rate limit exceeded for connection {}", connection_id);
        return message_handler
            .send_error(GameError::RateLimitExceeded)
            .await;
    }

    // Only handle text messages
    let Ok(text) = msg.to_str() else {
        return Ok(());
    };

    let client_message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            return message_handler
                .send_error(GameError::InvalidMessage {
                    message: e.to_string(),
                })
                .await;
        }
    };

    message_handler
        .handle_message(client_message)
        .await
        .map_err(|e| format!("Message handling error: {}", e))
}
