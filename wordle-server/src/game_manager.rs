use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::websocket::connection::ConnectionId;
use wordle_core::{
    AccessPolicy, DailyWord, DailyWordProvider, Dictionary, GameSummary, GuessRejection, Session,
    SessionError, WordSourceError, parse_stored_result,
};
use wordle_persistence::{StatsError, StatsRepository};
use wordle_types::{GameError, GameOutcome, Identity, MenuView, ServerMessage};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Error)]
pub enum GameServiceError {
    #[error("{0} is not allowed to play")]
    Blocked(String),
    #[error(transparent)]
    WordUnavailable(#[from] WordSourceError),
    #[error(transparent)]
    Storage(#[from] StatsError),
    #[error(transparent)]
    InvalidWord(#[from] SessionError),
    #[error(transparent)]
    Guess(#[from] GuessRejection),
    #[error("No active game")]
    NoActiveGame,
    #[error("No data deletion pending")]
    NoDeletionPending,
    #[error("Connection is not authenticated")]
    NotAuthenticated,
    #[error("Connection is already authenticated")]
    AlreadyAuthenticated,
}

impl GameServiceError {
    /// What the client is told. Blocked identities get a generic refusal
    /// through `AuthenticationFailed` instead.
    pub fn to_game_error(&self) -> GameError {
        match self {
            GameServiceError::Blocked(_) | GameServiceError::NotAuthenticated => {
                GameError::AuthenticationRequired
            }
            GameServiceError::WordUnavailable(_) | GameServiceError::InvalidWord(_) => {
                GameError::WordUnavailable
            }
            GameServiceError::Storage(_) => GameError::StorageUnavailable,
            GameServiceError::Guess(rejection) => rejection.clone().into(),
            GameServiceError::NoActiveGame => GameError::NoActiveGame,
            GameServiceError::NoDeletionPending => GameError::NoDeletionPending,
            GameServiceError::AlreadyAuthenticated => GameError::AlreadyAuthenticated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Game,
    Stats,
    AlreadyPlayed,
    DeleteData,
}

/// Per-connection state. Owned by exactly one connection.
#[derive(Debug)]
pub struct PlayerSession {
    identity: Identity,
    screen: Screen,
    game: Option<ActiveGame>,
}

#[derive(Debug)]
struct ActiveGame {
    session: Session,
    puzzle_date: String,
}

impl PlayerSession {
    fn new(identity: Identity) -> Self {
        Self {
            identity,
            screen: Screen::Menu,
            game: None,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    fn abandon_game(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.session.abandon();
        }
        self.game = None;
    }
}

/// Drives every connected player through the menu, game, stats and
/// data-deletion screens.
pub struct GameManager {
    players: RwLock<HashMap<ConnectionId, Arc<Mutex<PlayerSession>>>>,
    stats: Arc<StatsRepository>,
    daily_word: Arc<DailyWordProvider>,
    dictionary: Arc<dyn Dictionary>,
    policy: Arc<dyn AccessPolicy>,
    motd: String,
    clock: Clock,
}

impl GameManager {
    pub fn new(
        stats: Arc<StatsRepository>,
        daily_word: Arc<DailyWordProvider>,
        dictionary: Arc<dyn Dictionary>,
        policy: Arc<dyn AccessPolicy>,
        motd: impl Into<String>,
    ) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            stats,
            daily_word,
            dictionary,
            policy,
            motd: motd.into(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn stats(&self) -> &Arc<StatsRepository> {
        &self.stats
    }

    pub async fn current_word(&self) -> Result<DailyWord, WordSourceError> {
        self.daily_word.current_word((self.clock)()).await
    }

    async fn player(&self, connection_id: ConnectionId) -> Result<Arc<Mutex<PlayerSession>>, GameServiceError> {
        let players = self.players.read().await;
        players
            .get(&connection_id)
            .cloned()
            .ok_or(GameServiceError::NotAuthenticated)
    }

    pub async fn is_authenticated(&self, connection_id: ConnectionId) -> bool {
        self.players.read().await.contains_key(&connection_id)
    }

    pub async fn active_players(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn screen(&self, connection_id: ConnectionId) -> Option<Screen> {
        let player = self.player(connection_id).await.ok()?;
        let screen = player.lock().await.screen();
        Some(screen)
    }

    /// Admit an identity. Blocked names are refused before any stats lookup,
    /// and the connection is refused if today's word cannot be fetched.
    pub async fn open_session(
        &self,
        connection_id: ConnectionId,
        identity: Identity,
    ) -> Result<ServerMessage, GameServiceError> {
        if self.policy.is_blocked(&identity.display_name) {
            warn!(username = %identity.display_name, "Refused blocked user");
            return Err(GameServiceError::Blocked(identity.display_name));
        }

        if self.is_authenticated(connection_id).await {
            return Err(GameServiceError::AlreadyAuthenticated);
        }

        let daily = self.current_word().await.map_err(|e| {
            error!(username = %identity.display_name, error = %e, "Failed to fetch daily word for new session");
            e
        })?;

        let menu = self.menu_view(&identity, &daily).await;

        info!(
            connection = %connection_id,
            username = %identity.display_name,
            fingerprint = %identity.fingerprint,
            "Player session opened"
        );

        let message = ServerMessage::AuthenticationSuccess {
            display_name: identity.display_name.clone(),
            fingerprint: identity.fingerprint.clone(),
            menu,
        };

        let mut players = self.players.write().await;
        players.insert(connection_id, Arc::new(Mutex::new(PlayerSession::new(identity))));

        Ok(message)
    }

    /// Drop a connection's state. An unfinished game is abandoned, never
    /// recorded.
    pub async fn close_session(&self, connection_id: ConnectionId) {
        let removed = self.players.write().await.remove(&connection_id);

        if let Some(player) = removed {
            let mut player = player.lock().await;
            if player.game.is_some() {
                debug!(connection = %connection_id, "Abandoning game on disconnect");
            }
            player.abandon_game();
            info!(connection = %connection_id, username = %player.identity.display_name, "Player session closed");
        }
    }

    /// Lookup failures are logged and shown as "not played" / "no data".
    async fn menu_view(&self, identity: &Identity, daily: &DailyWord) -> MenuView {
        let puzzle_date = daily.date_key();

        let has_played_today = self
            .stats
            .has_played_today(identity, &puzzle_date)
            .await
            .unwrap_or_else(|e| {
                error!(username = %identity.display_name, error = %e, "Failed to check daily play");
                false
            });

        let has_user_data = match self.stats.get_record(identity).await {
            Ok(record) => record.has_data(),
            Err(e) => {
                error!(username = %identity.display_name, error = %e, "Failed to read player stats");
                false
            }
        };

        MenuView {
            motd: self.motd.clone(),
            puzzle_date,
            has_played_today,
            has_user_data,
        }
    }

    async fn menu_message(&self, identity: &Identity) -> Result<ServerMessage, GameServiceError> {
        let daily = self.current_word().await?;
        Ok(ServerMessage::Menu {
            menu: self.menu_view(identity, &daily).await,
        })
    }

    /// Begin today's game, or show the stored board if it was already played.
    /// A failed word refresh keeps the player on the menu.
    pub async fn start_game(&self, connection_id: ConnectionId) -> Result<ServerMessage, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        let daily = self.current_word().await.map_err(|e| {
            error!(username = %player.identity.display_name, error = %e, "Failed to refresh daily word");
            e
        })?;
        let puzzle_date = daily.date_key();

        // Resume a game in progress for the same puzzle
        let resumable = player
            .game
            .as_ref()
            .filter(|game| {
                game.puzzle_date == puzzle_date && game.session.outcome() == GameOutcome::Playing
            })
            .map(|game| game.session.view());
        if let Some(view) = resumable {
            player.screen = Screen::Game;
            return Ok(ServerMessage::GameUpdate { view });
        }
        player.abandon_game();

        let already_played = self
            .stats
            .has_played_today(&player.identity, &puzzle_date)
            .await
            .unwrap_or_else(|e| {
                error!(username = %player.identity.display_name, error = %e, "Failed to check daily play");
                false
            });

        if already_played {
            let result = match self.stats.get_record(&player.identity).await {
                Ok(record) => parse_stored_result(&record.last_result).unwrap_or_else(|e| {
                    warn!(username = %player.identity.display_name, error = %e, "Stored result unreadable");
                    None
                }),
                Err(e) => {
                    error!(username = %player.identity.display_name, error = %e, "Failed to read player stats");
                    None
                }
            };

            player.screen = Screen::AlreadyPlayed;
            return Ok(ServerMessage::AlreadyPlayed { puzzle_date, result });
        }

        let session = Session::new(&daily.word)?;
        let view = session.view();
        player.game = Some(ActiveGame {
            session,
            puzzle_date,
        });
        player.screen = Screen::Game;

        info!(username = %player.identity.display_name, "Game started");
        Ok(ServerMessage::GameUpdate { view })
    }

    /// Apply a guess. The finishing guess is recorded exactly once; if that
    /// write fails the player is told the result was not saved.
    pub async fn submit_guess(
        &self,
        connection_id: ConnectionId,
        word: &str,
    ) -> Result<Vec<ServerMessage>, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        let identity = player.identity.clone();
        let game = player
            .game
            .as_mut()
            .ok_or(GameServiceError::NoActiveGame)?;

        let feedback = game.session.submit_guess(word, self.dictionary.as_ref())?;
        let puzzle_date = game.puzzle_date.clone();
        let mut messages = vec![ServerMessage::GameUpdate {
            view: game.session.view(),
        }];

        if let Some(summary) = feedback.completed {
            if let Err(e) = self.record_result(&identity, &summary, &puzzle_date).await {
                error!(username = %identity.display_name, error = %e, "Failed to record game result");
                messages.push(ServerMessage::ResultNotSaved);
            }
        }

        Ok(messages)
    }

    async fn record_result(
        &self,
        identity: &Identity,
        summary: &GameSummary,
        puzzle_date: &str,
    ) -> Result<(), StatsError> {
        let compact = summary.to_compact().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to encode game result");
            String::new()
        });

        match summary.outcome {
            GameOutcome::Won { guesses } => {
                self.stats
                    .record_win(identity, usize::from(guesses), puzzle_date, &compact)
                    .await?;
            }
            _ => {
                self.stats.record_loss(identity, puzzle_date, &compact).await?;
            }
        }

        Ok(())
    }

    pub async fn view_stats(&self, connection_id: ConnectionId) -> Result<ServerMessage, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        let stats = self.stats.get_record(&player.identity).await?;
        player.abandon_game();
        player.screen = Screen::Stats;

        Ok(ServerMessage::Stats { stats })
    }

    /// Show what would be deleted and wait for confirmation.
    pub async fn request_deletion(&self, connection_id: ConnectionId) -> Result<ServerMessage, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        let stats = self.stats.get_record(&player.identity).await?;
        player.abandon_game();
        player.screen = Screen::DeleteData;

        Ok(ServerMessage::DeletionPrompt { stats })
    }

    pub async fn confirm_deletion(
        &self,
        connection_id: ConnectionId,
    ) -> Result<Vec<ServerMessage>, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        if player.screen != Screen::DeleteData {
            return Err(GameServiceError::NoDeletionPending);
        }

        self.stats.delete_record(&player.identity).await?;
        player.screen = Screen::Menu;
        info!(username = %player.identity.display_name, "Player data deleted");

        let menu = self.menu_message(&player.identity).await?;
        Ok(vec![ServerMessage::DataDeleted, menu])
    }

    pub async fn cancel_deletion(&self, connection_id: ConnectionId) -> Result<ServerMessage, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        if player.screen != Screen::DeleteData {
            return Err(GameServiceError::NoDeletionPending);
        }

        player.screen = Screen::Menu;
        self.menu_message(&player.identity).await
    }

    /// Back to the menu from any screen. An unfinished game is abandoned.
    pub async fn return_to_menu(&self, connection_id: ConnectionId) -> Result<ServerMessage, GameServiceError> {
        let player = self.player(connection_id).await?;
        let mut player = player.lock().await;

        player.abandon_game();
        player.screen = Screen::Menu;
        self.menu_message(&player.identity).await
    }
}
