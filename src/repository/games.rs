// src/repository/games.rs

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::{RepoError, RepoResult, Repository, RowParser, clamp_limit, format_ts, new_id};
use crate::config::LEADERBOARD_LIMIT;
use crate::models::game::{GameScore, LeaderboardQuery, NewGameScore};

#[derive(sqlx::FromRow)]
struct GameScoreRow {
    id: String,
    game_id: String,
    student_id: String,
    student_name: String,
    score: i64,
    played_at: String,
}

impl TryFrom<GameScoreRow> for GameScore {
    type Error = RepoError;

    fn try_from(row: GameScoreRow) -> RepoResult<Self> {
        let p = RowParser::new("game_scores", &row.id);
        Ok(GameScore {
            score: p.non_negative("score", row.score)?,
            played_at: p.timestamp("played_at", &row.played_at)?,
            id: row.id,
            game_id: row.game_id,
            student_id: row.student_id,
            student_name: row.student_name,
        })
    }
}

impl Repository {
    pub async fn create_game_score(&self, data: NewGameScore) -> RepoResult<String> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO game_scores (id, game_id, student_id, student_name, score, played_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.game_id)
        .bind(&data.student_id)
        .bind(&data.student_name)
        .bind(data.score)
        .bind(format_ts(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Top scores, highest first. Ties go to whoever scored first.
    pub async fn leaderboard(&self, query: &LeaderboardQuery) -> RepoResult<Vec<GameScore>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, game_id, student_id, student_name, score, played_at FROM game_scores",
        );
        if let Some(game_id) = &query.game_id {
            qb.push(" WHERE game_id = ").push_bind(game_id);
        }
        qb.push(" ORDER BY score DESC, played_at ASC LIMIT ")
            .push_bind(clamp_limit(query.limit, LEADERBOARD_LIMIT));

        let rows: Vec<GameScoreRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(GameScore::try_from).collect()
    }
}
