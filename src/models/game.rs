// src/models/game.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

string_enum! {
    GameKind {
        Quiz => "quiz",
        Memory => "memory",
        Puzzle => "puzzle",
        Math => "math",
    }
}

/// A playable game. The catalog is fixed.
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: GameKind,
    pub icon: &'static str,
}

pub const GAMES: [Game; 4] = [
    Game {
        id: "math-challenge",
        title: "Math Challenge",
        description: "Uji kecepatan hitungmu!",
        kind: GameKind::Math,
        icon: "🧮",
    },
    Game {
        id: "quiz-time",
        title: "Quiz Time",
        description: "Kuis pengetahuan umum",
        kind: GameKind::Quiz,
        icon: "🧠",
    },
    Game {
        id: "memory-match",
        title: "Memory Match",
        description: "Latih daya ingatmu",
        kind: GameKind::Memory,
        icon: "🎴",
    },
    Game {
        id: "word-puzzle",
        title: "Word Puzzle",
        description: "Teka-teki kata seru",
        kind: GameKind::Puzzle,
        icon: "📝",
    },
];

pub fn find_game(id: &str) -> Option<&'static Game> {
    GAMES.iter().find(|g| g.id == id)
}

/// Represents the 'game_scores' collection. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    pub id: String,
    pub game_id: String,
    pub student_id: String,
    pub student_name: String,
    pub score: i64,
    pub played_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGameScore {
    pub game_id: String,
    pub student_id: String,
    pub student_name: String,
    pub score: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitScoreRequest {
    #[validate(range(min = 0, max = 1_000_000))]
    pub score: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub game_id: Option<String>,
    pub limit: Option<i64>,
}
