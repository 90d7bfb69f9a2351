//! Game lifecycle orchestration and statistics aggregation.
//!
//! [`GameService`] wraps [`GameRepository`] with the command flow of each
//! operation: run the validators, mutate persisted entities, reproject the
//! board, detect terminal conditions, and apply stats. Each mutating command
//! runs inside one SQLite immediate transaction, so a command either fully
//! persists (including terminal stats updates) or not at all.

use derive_getters::Getters;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::{Game, GamePlayer, GameRepository, GameStatus, Move, NewMove, Player};
use crate::error::GameError;
use crate::logic::{self, Grid};

/// Plain-data view of a game for the transport layer to serialize.
#[derive(Debug, Clone, Getters)]
pub struct GameSnapshot {
    game: Game,
    player1_id: Option<i32>,
    player2_id: Option<i32>,
    current_turn_player_id: Option<i32>,
    grid: Grid,
    message: Option<String>,
}

impl GameSnapshot {
    fn assemble(game: Game, seats: &[GamePlayer], grid: Grid, message: Option<String>) -> Self {
        let seat_id = |order: i32| {
            seats
                .iter()
                .find(|gp| *gp.player_order() == order)
                .map(|gp| *gp.player_id())
        };
        let current_turn_player_id = game.current_turn_player_id(seats);

        Self {
            player1_id: seat_id(1),
            player2_id: seat_id(2),
            current_turn_player_id,
            game,
            grid,
            message,
        }
    }
}

/// Leaderboard entry derived from a player's aggregates.
#[derive(Debug, Clone, Getters)]
pub struct PlayerStats {
    player_id: i32,
    games_played: i32,
    games_won: i32,
    total_moves: i32,
    win_rate: f64,
    efficiency: f64,
    rank: u32,
}

// A terminal move either wins the game, fills the board, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveOutcome {
    Win,
    Draw,
    Ongoing,
}

/// Service layer orchestrating game commands over the repository.
#[derive(Debug, Clone)]
pub struct GameService {
    repository: GameRepository,
}

impl GameService {
    /// Creates a new game service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating GameService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Creates a new player with zeroed aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn create_player(&self) -> Result<Player, GameError> {
        let mut conn = self.repository.connection()?;
        let player = self.repository.create_player(&mut conn)?;
        Ok(player)
    }

    /// Gets a player by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such player exists.
    #[instrument(skip(self))]
    pub fn get_player(&self, player_id: i32) -> Result<Player, GameError> {
        let mut conn = self.repository.connection()?;
        self.repository
            .get_player(&mut conn, player_id)?
            .ok_or_else(|| GameError::not_found("Player not found"))
    }

    /// Creates a new Waiting game with the given player seated at seat 1.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the player does not exist, or `Conflict` if the
    /// player already has an unfinished game.
    #[instrument(skip(self))]
    pub fn create_game(&self, player_id: i32) -> Result<GameSnapshot, GameError> {
        let mut conn = self.repository.connection()?;
        conn.immediate_transaction(|conn| {
            self.repository
                .get_player(conn, player_id)?
                .ok_or_else(|| GameError::not_found("Player not found"))?;

            let unfinished = self.repository.find_unfinished_game(conn, player_id)?;
            logic::can_start_new_game(unfinished.as_ref())?;

            let game = self.repository.create_game(conn, player_id)?;
            let seats = self.repository.participants(conn, *game.id())?;

            let message = format!(
                "Game created with ID: {} by player {}, waiting for another player to join",
                game.id(),
                player_id
            );
            Ok(GameSnapshot::assemble(game, &seats, [0; 9], Some(message)))
        })
    }

    /// Seats the joining player at seat 2 and starts the game.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game or player does not exist, or
    /// `Conflict` if the game cannot accept the join or the joiner has an
    /// unfinished game of their own.
    #[instrument(skip(self))]
    pub fn join_game(&self, game_id: i32, player_id: i32) -> Result<GameSnapshot, GameError> {
        let mut conn = self.repository.connection()?;
        conn.immediate_transaction(|conn| {
            let game = self.repository.get_game(conn, game_id)?;
            let seats = self.repository.participants(conn, game_id)?;
            logic::can_join(game.as_ref(), &seats, player_id)?;

            self.repository
                .get_player(conn, player_id)?
                .ok_or_else(|| GameError::not_found("Player not found"))?;

            let unfinished = self.repository.find_unfinished_game(conn, player_id)?;
            logic::can_start_new_game(unfinished.as_ref())?;

            self.repository.add_participant(conn, game_id, player_id, 2)?;
            self.repository
                .set_game_status(conn, game_id, GameStatus::InProgress)?;

            let game = self
                .repository
                .get_game(conn, game_id)?
                .ok_or_else(|| GameError::not_found("Game not found"))?;
            let seats = self.repository.participants(conn, game_id)?;

            let next_player = game.current_turn_player_id(&seats).unwrap_or_default();
            let message = format!(
                "Player {player_id} joined game with ID: {game_id}, game is now in progress, \
                 waiting for player {next_player} to make a move"
            );
            Ok(GameSnapshot::assemble(game, &seats, [0; 9], Some(message)))
        })
    }

    /// Records a move, detecting win or draw and finishing the game if the
    /// move is terminal.
    ///
    /// The move's number is the turn number at submission time; the turn
    /// counter advances after every accepted move, including the last one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, or `Conflict` per the validator that
    /// rejected the move.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        game_id: i32,
        player_id: i32,
        position: usize,
    ) -> Result<GameSnapshot, GameError> {
        let mut conn = self.repository.connection()?;
        conn.immediate_transaction(|conn| {
            let game = self.repository.get_game(conn, game_id)?;
            let seats = self.repository.participants(conn, game_id)?;
            let game = logic::can_move(game.as_ref(), &seats, player_id)?;

            let move_number = *game.current_turn_number();
            let moves = self.repository.moves_for_game(conn, game_id)?;
            let grid = logic::project_grid(&moves, &seats);
            logic::cell_is_free(&grid, position)?;

            let recorded = self.repository.insert_move(
                conn,
                NewMove::new(game_id, player_id, position as i32, move_number),
            )?;
            let mut all_moves = moves;
            all_moves.push(recorded);

            let new_grid = logic::project_grid(&all_moves, &seats);
            let seat = seats
                .iter()
                .find(|gp| *gp.player_id() == player_id)
                .map(|gp| *gp.player_order() as u8)
                .unwrap_or_default();

            self.repository.set_turn_number(conn, game_id, move_number + 1)?;

            let outcome = if logic::has_won(&new_grid, seat) {
                MoveOutcome::Win
            } else if logic::is_draw(&new_grid) {
                MoveOutcome::Draw
            } else {
                MoveOutcome::Ongoing
            };

            match outcome {
                MoveOutcome::Win => {
                    self.repository.finish_game(conn, game_id, Some(player_id))?;
                    self.apply_stats(conn, &seats, &all_moves, Some(player_id))?;
                }
                MoveOutcome::Draw => {
                    self.repository.finish_game(conn, game_id, None)?;
                    self.apply_stats(conn, &seats, &all_moves, None)?;
                }
                MoveOutcome::Ongoing => {}
            }

            let game = self
                .repository
                .get_game(conn, game_id)?
                .ok_or_else(|| GameError::not_found("Game not found"))?;

            let message = match outcome {
                MoveOutcome::Win => format!(
                    "Player {player_id} made a move at position {position} and won! \
                     Game is now finished"
                ),
                MoveOutcome::Draw => format!(
                    "Player {player_id} made a move at position {position} and it's a draw! \
                     Game is now finished"
                ),
                MoveOutcome::Ongoing => {
                    let next_player = game.current_turn_player_id(&seats).unwrap_or_default();
                    format!(
                        "Player {player_id} made a move at position {position}, \
                         game is still in progress, waiting for player {next_player} \
                         to make a move"
                    )
                }
            };

            info!(game_id, player_id, position, ?outcome, "Move processed");
            Ok(GameSnapshot::assemble(game, &seats, new_grid, Some(message)))
        })
    }

    /// Gets a game with its projected board.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such game exists.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: i32) -> Result<GameSnapshot, GameError> {
        let mut conn = self.repository.connection()?;

        let game = self
            .repository
            .get_game(&mut conn, game_id)?
            .ok_or_else(|| GameError::not_found("Game not found"))?;
        let seats = self.repository.participants(&mut conn, game_id)?;
        let moves = self.repository.moves_for_game(&mut conn, game_id)?;
        let grid = logic::project_grid(&moves, &seats);

        Ok(GameSnapshot::assemble(game, &seats, grid, None))
    }

    /// Lists games waiting for a second player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_available_games(&self) -> Result<Vec<GameSnapshot>, GameError> {
        let mut conn = self.repository.connection()?;

        let games = self.repository.list_waiting_games(&mut conn)?;
        let mut snapshots = Vec::with_capacity(games.len());
        for game in games {
            let seats = self.repository.participants(&mut conn, *game.id())?;
            snapshots.push(GameSnapshot::assemble(game, &seats, [0; 9], None));
        }

        Ok(snapshots)
    }

    /// Top 3 players by games won, descending. Ties keep id order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard_by_wins(&self) -> Result<Vec<PlayerStats>, GameError> {
        let mut stats = self.player_stats()?;
        stats.sort_by(|a, b| b.games_won.cmp(&a.games_won));
        Ok(rank_top_three(stats))
    }

    /// Top 3 players by win rate (games won over games played), descending.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard_by_win_rate(&self) -> Result<Vec<PlayerStats>, GameError> {
        let mut stats = self.player_stats()?;
        stats.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
        Ok(rank_top_three(stats))
    }

    /// Top 3 players by efficiency (moves per win), ascending: fewer moves
    /// per win is better.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard_by_efficiency(&self) -> Result<Vec<PlayerStats>, GameError> {
        let mut stats = self.player_stats()?;
        stats.sort_by(|a, b| a.efficiency.total_cmp(&b.efficiency));
        Ok(rank_top_three(stats))
    }

    /// Statistics aggregation on a terminal transition: every participant's
    /// games played and move count advance, the winner's win count too.
    ///
    /// Runs exactly once per game, inside the finishing move's transaction.
    #[instrument(skip(self, conn, seats, all_moves))]
    fn apply_stats(
        &self,
        conn: &mut SqliteConnection,
        seats: &[GamePlayer],
        all_moves: &[Move],
        winner_id: Option<i32>,
    ) -> Result<(), GameError> {
        for gp in seats {
            let moves_count = all_moves
                .iter()
                .filter(|mv| mv.player_id() == gp.player_id())
                .count() as i32;
            let won = winner_id == Some(*gp.player_id());
            self.repository
                .apply_player_stats(conn, *gp.player_id(), moves_count, won)?;
        }

        debug!(?winner_id, "Stats applied to all participants");
        Ok(())
    }

    /// Builds unranked stats entries for every player with at least one win.
    fn player_stats(&self) -> Result<Vec<PlayerStats>, GameError> {
        let mut conn = self.repository.connection()?;
        let players = self.repository.players_with_wins(&mut conn)?;

        let stats = players
            .iter()
            .map(|player| {
                let games_played = *player.games_played();
                let games_won = *player.games_won();
                let total_moves = *player.total_moves();

                let win_rate = if games_played > 0 {
                    round_to(games_won as f64 / games_played as f64, 3)
                } else {
                    0.0
                };
                // Unreachable behind the games_won > 0 filter; the sentinel
                // sorts dead last just in case.
                let efficiency = if games_won > 0 {
                    round_to(total_moves as f64 / games_won as f64, 2)
                } else {
                    999_999.0
                };

                PlayerStats {
                    player_id: *player.id(),
                    games_played,
                    games_won,
                    total_moves,
                    win_rate,
                    efficiency,
                    rank: 0,
                }
            })
            .collect();

        Ok(stats)
    }
}

/// Keeps the first three entries and annotates each with its 1-based rank.
fn rank_top_three(mut stats: Vec<PlayerStats>) -> Vec<PlayerStats> {
    stats.truncate(3);
    for (index, entry) in stats.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }
    stats
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
