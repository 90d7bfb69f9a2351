//! Request and response schemas for the REST API.

use serde::{Deserialize, Serialize};

use crate::db::Player;
use crate::service::{GameSnapshot, PlayerStats};

/// Response schema for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPublic {
    /// Player id.
    pub id: i32,
    /// Total games finished.
    pub games_played: i32,
    /// Total games won.
    pub games_won: i32,
    /// Human-readable outcome message.
    pub message: Option<String>,
}

impl PlayerPublic {
    pub(super) fn from_player(player: &Player, message: Option<String>) -> Self {
        Self {
            id: *player.id(),
            games_played: *player.games_played(),
            games_won: *player.games_won(),
            message,
        }
    }
}

/// Request schema for creating a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreate {
    /// Id of the creating player.
    pub player_id: i32,
}

/// Request schema for joining a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameJoin {
    /// Id of the joining player.
    pub player_id: i32,
}

/// Request schema for making a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCreate {
    /// Id of the moving player.
    pub player_id: i32,
    /// Board position 0-8, row-major.
    pub position: i32,
}

/// Response schema for game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePublic {
    /// Game id.
    pub id: i32,
    /// Lifecycle status: waiting, in_progress, or finished.
    pub status: String,
    /// Seat-1 player id (the creator).
    pub player1_id: i32,
    /// Seat-2 player id, if seated.
    pub player2_id: Option<i32>,
    /// 1-based turn counter.
    pub current_turn_number: i32,
    /// Id of the player to move, if the game is in progress.
    pub current_turn_player_id: Option<i32>,
    /// Winning player id; null while unfinished or on a draw.
    pub winner_id: Option<i32>,
    /// 3x3 grid, row-major: 0 = empty, 1 = player 1, 2 = player 2.
    pub grid: [[u8; 3]; 3],
    /// Human-readable outcome message.
    pub message: Option<String>,
}

impl From<GameSnapshot> for GamePublic {
    fn from(snap: GameSnapshot) -> Self {
        let g = snap.grid();
        Self {
            id: *snap.game().id(),
            status: snap.game().status().clone(),
            player1_id: snap.player1_id().unwrap_or(0),
            player2_id: *snap.player2_id(),
            current_turn_number: *snap.game().current_turn_number(),
            current_turn_player_id: *snap.current_turn_player_id(),
            winner_id: *snap.game().winner_id(),
            grid: [
                [g[0], g[1], g[2]],
                [g[3], g[4], g[5]],
                [g[6], g[7], g[8]],
            ],
            message: snap.message().clone(),
        }
    }
}

/// Leaderboard entry for a ranked player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatsPublic {
    /// Player id.
    pub player_id: i32,
    /// Total games finished.
    pub games_played: i32,
    /// Total games won.
    pub games_won: i32,
    /// Total moves played across finished games.
    pub total_moves: i32,
    /// Games won over games played, rounded to 3 decimals.
    pub win_rate: f64,
    /// Moves per win, rounded to 2 decimals; lower is better.
    pub efficiency: f64,
    /// 1-based position in the requested ordering.
    pub rank: u32,
}

impl From<PlayerStats> for PlayerStatsPublic {
    fn from(stats: PlayerStats) -> Self {
        Self {
            player_id: *stats.player_id(),
            games_played: *stats.games_played(),
            games_won: *stats.games_won(),
            total_moves: *stats.total_moves(),
            win_rate: *stats.win_rate(),
            efficiency: *stats.efficiency(),
            rank: *stats.rank(),
        }
    }
}
