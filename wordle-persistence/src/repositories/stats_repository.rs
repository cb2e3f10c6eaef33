use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use sea_orm::{
    prelude::DateTimeWithTimeZone, sea_query::OnConflict, ActiveValue::Set, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, TransactionTrait,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use wordle_types::{Identity, LeaderboardEntry, MAX_GUESSES, PlayerStats};

use crate::entities::player_stats;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Invalid number of guesses: {0}")]
    InvalidGuessCount(usize),
    #[error("Stats storage error: {0}")]
    Storage(#[from] DbErr),
}

type IdentityKey = (String, String);

/// Per-player statistics keyed by display name and fingerprint.
///
/// Writes for one identity are serialized through an in-process lock and run
/// inside a transaction, so concurrent completions for the same player never
/// lose an update. Different identities never contend on the same lock.
pub struct StatsRepository {
    db: DatabaseConnection,
    // One entry per identity with a write in flight or on record
    write_locks: DashMap<IdentityKey, Arc<Mutex<()>>>,
    closed: AtomicBool,
}

impl StatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_locks: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    fn key(identity: &Identity) -> IdentityKey {
        (identity.display_name.clone(), identity.fingerprint.clone())
    }

    fn identity_lock(&self, identity: &Identity) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(Self::key(identity))
            .or_default()
            .clone()
    }

    fn model_to_stats(model: player_stats::Model) -> PlayerStats {
        PlayerStats {
            display_name: model.display_name,
            fingerprint: model.fingerprint,
            games_played: model.games_played,
            games_won: model.games_won,
            games_lost: model.games_lost,
            current_streak: model.current_streak,
            max_streak: model.max_streak,
            guess_distribution: [
                model.guess_dist_1,
                model.guess_dist_2,
                model.guess_dist_3,
                model.guess_dist_4,
                model.guess_dist_5,
                model.guess_dist_6,
            ],
            total_guesses: model.total_guesses,
            last_played: model.last_played.map(|at| at.to_rfc3339()),
            last_puzzle_date: model.last_puzzle_date,
            last_result: model.last_result,
        }
    }

    async fn find_model<C: ConnectionTrait>(
        conn: &C,
        identity: &Identity,
    ) -> Result<Option<player_stats::Model>, DbErr> {
        player_stats::Entity::find_by_id(Self::key(identity)).one(conn).await
    }

    /// The stored record, or a zero-valued one for an unknown player.
    pub async fn get_record(&self, identity: &Identity) -> Result<PlayerStats, StatsError> {
        let record = match Self::find_model(&self.db, identity).await? {
            Some(model) => Self::model_to_stats(model),
            None => {
                debug!(username = %identity.display_name, "No stored stats, returning empty record");
                PlayerStats::empty(identity)
            }
        };

        Ok(record)
    }

    pub async fn has_played_today(
        &self,
        identity: &Identity,
        puzzle_date: &str,
    ) -> Result<bool, StatsError> {
        let record = self.get_record(identity).await?;
        let played = !puzzle_date.is_empty() && record.last_puzzle_date == puzzle_date;

        debug!(
            username = %identity.display_name,
            played,
            last_puzzle_date = %record.last_puzzle_date,
            puzzle_date,
            "Checked daily play"
        );
        Ok(played)
    }

    pub async fn record_win(
        &self,
        identity: &Identity,
        guesses: usize,
        puzzle_date: &str,
        result: &str,
    ) -> Result<PlayerStats, StatsError> {
        if !(1..=MAX_GUESSES).contains(&guesses) {
            return Err(StatsError::InvalidGuessCount(guesses));
        }

        let stats = self
            .update_record(identity, puzzle_date, result, |stats| {
                apply_win(stats, guesses)
            })
            .await?;

        info!(
            username = %identity.display_name,
            guesses,
            streak = stats.current_streak,
            "Recorded win"
        );
        Ok(stats)
    }

    pub async fn record_loss(
        &self,
        identity: &Identity,
        puzzle_date: &str,
        result: &str,
    ) -> Result<PlayerStats, StatsError> {
        let stats = self
            .update_record(identity, puzzle_date, result, apply_loss)
            .await?;

        info!(username = %identity.display_name, "Recorded loss");
        Ok(stats)
    }

    /// Read, mutate and upsert one record while holding the identity's lock.
    async fn update_record<F>(
        &self,
        identity: &Identity,
        puzzle_date: &str,
        result: &str,
        apply: F,
    ) -> Result<PlayerStats, StatsError>
    where
        F: FnOnce(&mut PlayerStats),
    {
        let lock = self.identity_lock(identity);
        let _guard = lock.lock().await;

        let txn = self.db.begin().await?;
        let existing = Self::find_model(&txn, identity).await?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let created_at = existing.as_ref().map_or(now, |model| model.created_at);
        let mut stats = existing
            .map(Self::model_to_stats)
            .unwrap_or_else(|| PlayerStats::empty(identity));

        apply(&mut stats);
        stats.last_played = Some(now.to_rfc3339());
        stats.last_puzzle_date = puzzle_date.to_string();
        stats.last_result = result.to_string();

        let [d1, d2, d3, d4, d5, d6] = stats.guess_distribution;
        let model = player_stats::ActiveModel {
            display_name: Set(stats.display_name.clone()),
            fingerprint: Set(stats.fingerprint.clone()),
            games_played: Set(stats.games_played),
            games_won: Set(stats.games_won),
            games_lost: Set(stats.games_lost),
            current_streak: Set(stats.current_streak),
            max_streak: Set(stats.max_streak),
            guess_dist_1: Set(d1),
            guess_dist_2: Set(d2),
            guess_dist_3: Set(d3),
            guess_dist_4: Set(d4),
            guess_dist_5: Set(d5),
            guess_dist_6: Set(d6),
            total_guesses: Set(stats.total_guesses),
            last_played: Set(Some(now)),
            last_puzzle_date: Set(stats.last_puzzle_date.clone()),
            last_result: Set(stats.last_result.clone()),
            created_at: Set(created_at),
            updated_at: Set(now),
        };

        player_stats::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    player_stats::Column::DisplayName,
                    player_stats::Column::Fingerprint,
                ])
                .update_columns([
                    player_stats::Column::GamesPlayed,
                    player_stats::Column::GamesWon,
                    player_stats::Column::GamesLost,
                    player_stats::Column::CurrentStreak,
                    player_stats::Column::MaxStreak,
                    player_stats::Column::GuessDist1,
                    player_stats::Column::GuessDist2,
                    player_stats::Column::GuessDist3,
                    player_stats::Column::GuessDist4,
                    player_stats::Column::GuessDist5,
                    player_stats::Column::GuessDist6,
                    player_stats::Column::TotalGuesses,
                    player_stats::Column::LastPlayed,
                    player_stats::Column::LastPuzzleDate,
                    player_stats::Column::LastResult,
                    player_stats::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        debug!(
            username = %stats.display_name,
            games_played = stats.games_played,
            games_won = stats.games_won,
            current_streak = stats.current_streak,
            "Saved player stats"
        );
        Ok(stats)
    }

    /// Remove everything stored for a player. Deleting a missing record is
    /// not an error.
    pub async fn delete_record(&self, identity: &Identity) -> Result<(), StatsError> {
        let key = Self::key(identity);
        let lock = self.identity_lock(identity);
        let guard = lock.lock().await;

        let deleted = player_stats::Entity::delete_by_id(key.clone())
            .exec(&self.db)
            .await?;
        if deleted.rows_affected > 0 {
            info!(username = %identity.display_name, "Deleted player stats");
        }

        drop(guard);
        drop(lock);
        // Keep the entry if another write is already waiting on it
        self.write_locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        Ok(())
    }

    pub async fn top_players(&self, limit: u64) -> Result<Vec<LeaderboardEntry>, StatsError> {
        let models = player_stats::Entity::find()
            .order_by_desc(player_stats::Column::GamesWon)
            .order_by_desc(player_stats::Column::MaxStreak)
            .order_by_asc(player_stats::Column::DisplayName)
            .limit(limit)
            .all(&self.db)
            .await?;

        let leaderboard = models
            .into_iter()
            .enumerate()
            .map(|(index, model)| LeaderboardEntry {
                rank: (index + 1) as u32,
                display_name: model.display_name,
                games_played: model.games_played,
                games_won: model.games_won,
                max_streak: model.max_streak,
            })
            .collect();

        Ok(leaderboard)
    }

    /// Close the underlying pool. Works while other holders of the
    /// repository are still alive; their later calls fail with
    /// `StatsError::Storage`. Only the first call closes the pool.
    pub async fn close(&self) -> Result<(), StatsError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Stats store already closed");
            return Ok(());
        }

        // Clones share one pool, so closing a clone closes it for everyone
        self.db.clone().close().await?;
        info!("Stats store closed");
        Ok(())
    }
}

fn apply_win(stats: &mut PlayerStats, guesses: usize) {
    stats.games_played += 1;
    stats.games_won += 1;
    stats.current_streak += 1;
    stats.total_guesses += guesses as i32;
    stats.guess_distribution[guesses - 1] += 1;
    stats.max_streak = stats.max_streak.max(stats.current_streak);
}

fn apply_loss(stats: &mut PlayerStats) {
    stats.games_played += 1;
    stats.games_lost += 1;
    stats.current_streak = 0;
}
