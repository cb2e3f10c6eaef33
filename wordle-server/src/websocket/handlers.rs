use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::game_manager::{GameManager, GameServiceError};
use crate::identity::resolve_identity;
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use wordle_types::{ClientMessage, GameError, ServerMessage};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        game_manager: Arc<GameManager>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            game_manager,
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        self.connection_manager
            .update_activity(self.connection_id)
            .await;

        let gm = &self.game_manager;
        let id = self.connection_id;

        match message {
            ClientMessage::Authenticate {
                username,
                public_key,
            } => self.handle_authenticate(&username, public_key.as_deref()).await,
            ClientMessage::Heartbeat => self.send_message(ServerMessage::Pong).await,
            ClientMessage::StartGame => self.reply(gm.start_game(id).await).await,
            ClientMessage::SubmitGuess { word } => {
                self.reply_all(gm.submit_guess(id, &word).await).await
            }
            ClientMessage::ViewStats => self.reply(gm.view_stats(id).await).await,
            ClientMessage::RequestDataDeletion => self.reply(gm.request_deletion(id).await).await,
            ClientMessage::ConfirmDataDeletion => {
                self.reply_all(gm.confirm_deletion(id).await).await
            }
            ClientMessage::CancelDataDeletion => self.reply(gm.cancel_deletion(id).await).await,
            ClientMessage::ReturnToMenu => self.reply(gm.return_to_menu(id).await).await,
        }
    }

    pub async fn handle_disconnect(&self) {
        debug!("Handling disconnect for connection {}", self.connection_id);
        self.game_manager.close_session(self.connection_id).await;
    }

    async fn handle_authenticate(
        &self,
        username: &str,
        public_key: Option<&str>,
    ) -> Result<(), String> {
        let identity = resolve_identity(username, public_key);
        info!(
            "Authenticating connection {} as {}",
            self.connection_id, identity.display_name
        );

        match self
            .game_manager
            .open_session(self.connection_id, identity.clone())
            .await
        {
            Ok(message) => {
                self.connection_manager
                    .set_connection_identity(self.connection_id, identity)
                    .await;
                self.send_message(message).await
            }
            Err(GameServiceError::AlreadyAuthenticated) => {
                self.send_error(GameError::AlreadyAuthenticated).await
            }
            Err(e) => {
                warn!(
                    "Authentication failed for connection {}: {}",
                    self.connection_id, e
                );
                let reason = match e {
                    GameServiceError::Blocked(_) => "Connection refused".to_string(),
                    other => other.to_string(),
                };
                self.send_message(ServerMessage::AuthenticationFailed { reason })
                    .await
            }
        }
    }

    async fn reply(&self, result: Result<ServerMessage, GameServiceError>) -> Result<(), String> {
        self.reply_all(result.map(|message| vec![message])).await
    }

    async fn reply_all(
        &self,
        result: Result<Vec<ServerMessage>, GameServiceError>,
    ) -> Result<(), String> {
        match result {
            Ok(messages) => {
                for message in messages {
                    self.send_message(message).await?;
                }
                Ok(())
            }
            Err(e) => {
                debug!("Request from {} rejected: {}", self.connection_id, e);
                self.send_error(e.to_game_error()).await
            }
        }
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }

    pub async fn send_error(&self, error: GameError) -> Result<(), String> {
        self.send_message(ServerMessage::Error { error }).await
    }
}
