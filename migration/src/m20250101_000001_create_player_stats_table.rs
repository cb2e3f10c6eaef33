use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlayerStats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlayerStats::DisplayName).string().not_null())
                    .col(ColumnDef::new(PlayerStats::Fingerprint).string().not_null())
                    .col(counter(PlayerStats::GamesPlayed))
                    .col(counter(PlayerStats::GamesWon))
                    .col(counter(PlayerStats::GamesLost))
                    .col(counter(PlayerStats::CurrentStreak))
                    .col(counter(PlayerStats::MaxStreak))
                    .col(counter(PlayerStats::GuessDist1))
                    .col(counter(PlayerStats::GuessDist2))
                    .col(counter(PlayerStats::GuessDist3))
                    .col(counter(PlayerStats::GuessDist4))
                    .col(counter(PlayerStats::GuessDist5))
                    .col(counter(PlayerStats::GuessDist6))
                    .col(counter(PlayerStats::TotalGuesses))
                    .col(
                        ColumnDef::new(PlayerStats::LastPlayed)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PlayerStats::LastPuzzleDate)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PlayerStats::LastResult)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PlayerStats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PlayerStats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(PlayerStats::DisplayName)
                            .col(PlayerStats::Fingerprint),
                    )
                    .to_owned(),
            )
            .await?;

        // Leaderboard ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_player_stats_games_won")
                    .table(PlayerStats::Table)
                    .col(PlayerStats::GamesWon)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_player_stats_last_played")
                    .table(PlayerStats::Table)
                    .col(PlayerStats::LastPlayed)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_player_stats_fingerprint")
                    .table(PlayerStats::Table)
                    .col(PlayerStats::Fingerprint)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlayerStats::Table).to_owned())
            .await
    }
}

fn counter(column: PlayerStats) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum PlayerStats {
    Table,
    DisplayName,
    Fingerprint,
    GamesPlayed,
    GamesWon,
    GamesLost,
    CurrentStreak,
    MaxStreak,
    #[sea_orm(iden = "guess_dist_1")]
    GuessDist1,
    #[sea_orm(iden = "guess_dist_2")]
    GuessDist2,
    #[sea_orm(iden = "guess_dist_3")]
    GuessDist3,
    #[sea_orm(iden = "guess_dist_4")]
    GuessDist4,
    #[sea_orm(iden = "guess_dist_5")]
    GuessDist5,
    #[sea_orm(iden = "guess_dist_6")]
    GuessDist6,
    TotalGuesses,
    LastPlayed,
    LastPuzzleDate,
    LastResult,
    CreatedAt,
    UpdatedAt,
}
