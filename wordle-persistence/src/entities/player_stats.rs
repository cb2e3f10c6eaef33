use sea_orm::entity::prelude::*;

/// One row per (display name, fingerprint) pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "player_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub display_name: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub fingerprint: String,
    pub games_played: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub current_streak: i32,
    pub max_streak: i32,
    pub guess_dist_1: i32,
    pub guess_dist_2: i32,
    pub guess_dist_3: i32,
    pub guess_dist_4: i32,
    pub guess_dist_5: i32,
    pub guess_dist_6: i32,
    pub total_guesses: i32,
    pub last_played: Option<DateTimeWithTimeZone>,
    pub last_puzzle_date: String,
    #[sea_orm(column_type = "Text")]
    pub last_result: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
