//! Leaderboard endpoints: top 3 winners under three orderings.

use axum::Json;
use axum::extract::State;
use tracing::instrument;

use super::error::ApiError;
use super::schemas::PlayerStatsPublic;
use crate::service::GameService;

/// `GET /leaderboard/wins` - top 3 players by games won.
#[instrument(skip(service))]
pub async fn by_wins(
    State(service): State<GameService>,
) -> Result<Json<Vec<PlayerStatsPublic>>, ApiError> {
    let stats = service.leaderboard_by_wins()?;
    Ok(Json(stats.into_iter().map(PlayerStatsPublic::from).collect()))
}

/// `GET /leaderboard/win_rate` - top 3 players by win rate.
#[instrument(skip(service))]
pub async fn by_win_rate(
    State(service): State<GameService>,
) -> Result<Json<Vec<PlayerStatsPublic>>, ApiError> {
    let stats = service.leaderboard_by_win_rate()?;
    Ok(Json(stats.into_iter().map(PlayerStatsPublic::from).collect()))
}

/// `GET /leaderboard/efficiency` - top 3 players by moves per win.
#[instrument(skip(service))]
pub async fn by_efficiency(
    State(service): State<GameService>,
) -> Result<Json<Vec<PlayerStatsPublic>>, ApiError> {
    let stats = service.leaderboard_by_efficiency()?;
    Ok(Json(stats.into_iter().map(PlayerStatsPublic::from).collect()))
}
