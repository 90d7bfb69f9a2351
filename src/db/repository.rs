//! Database repository for players, games, seats, and moves.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, Game, GamePlayer, GameStatus, Move, NewGame, NewGamePlayer, NewMove, Player, schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for game state persistence.
///
/// Queries take a caller-provided connection so that a full command
/// (validate, mutate, update stats) can run inside a single transaction.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    ///
    /// SQLite allows one writer at a time; the busy timeout makes a second
    /// writer wait for the lock instead of failing immediately, so commands
    /// on different games queue briefly rather than error.
    #[instrument(skip(self))]
    pub fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute("PRAGMA busy_timeout = 5000;")?;
        Ok(conn)
    }

    /// Applies any pending embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails to apply.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration error: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Creates a new player with zeroed aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn create_player(&self, conn: &mut SqliteConnection) -> Result<Player, DbError> {
        debug!("Creating player");

        let player = diesel::insert_into(schema::players::table)
            .default_values()
            .returning(Player::as_returning())
            .get_result(conn)?;

        info!(player_id = player.id(), "Player created");
        Ok(player)
    }

    /// Gets a player by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn get_player(
        &self,
        conn: &mut SqliteConnection,
        player_id: i32,
    ) -> Result<Option<Player>, DbError> {
        debug!(player_id, "Looking up player");

        let player = schema::players::table
            .find(player_id)
            .first::<Player>(conn)
            .optional()?;

        Ok(player)
    }

    /// Finds a Waiting or InProgress game the player is seated in, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn find_unfinished_game(
        &self,
        conn: &mut SqliteConnection,
        player_id: i32,
    ) -> Result<Option<Game>, DbError> {
        debug!(player_id, "Looking up unfinished game");

        let game = schema::games::table
            .inner_join(schema::game_players::table)
            .filter(schema::game_players::player_id.eq(player_id))
            .filter(schema::games::status.ne(GameStatus::Finished.to_db_string()))
            .select(Game::as_select())
            .first::<Game>(conn)
            .optional()?;

        if let Some(ref g) = game {
            debug!(game_id = g.id(), status = %g.status(), "Unfinished game found");
        }

        Ok(game)
    }

    /// Creates a new Waiting game with the creator seated at seat 1.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn create_game(
        &self,
        conn: &mut SqliteConnection,
        player_id: i32,
    ) -> Result<Game, DbError> {
        debug!(player_id, "Creating game");

        let game = diesel::insert_into(schema::games::table)
            .values(&NewGame::new(GameStatus::Waiting.to_db_string().to_string()))
            .returning(Game::as_returning())
            .get_result(conn)?;

        self.add_participant(conn, *game.id(), player_id, 1)?;

        info!(game_id = game.id(), player_id, "Game created");
        Ok(game)
    }

    /// Gets a game by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn get_game(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
    ) -> Result<Option<Game>, DbError> {
        debug!(game_id, "Looking up game");

        let game = schema::games::table
            .find(game_id)
            .first::<Game>(conn)
            .optional()?;

        Ok(game)
    }

    /// Lists games waiting for a second player, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn list_waiting_games(&self, conn: &mut SqliteConnection) -> Result<Vec<Game>, DbError> {
        debug!("Listing waiting games");

        let games = schema::games::table
            .filter(schema::games::status.eq(GameStatus::Waiting.to_db_string()))
            .order(schema::games::created_at.asc())
            .load::<Game>(conn)?;

        info!(count = games.len(), "Waiting games loaded");
        Ok(games)
    }

    /// Gets the seat assignments for a game, ordered by seat number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn participants(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
    ) -> Result<Vec<GamePlayer>, DbError> {
        debug!(game_id, "Loading participants");

        let seats = schema::game_players::table
            .filter(schema::game_players::game_id.eq(game_id))
            .order(schema::game_players::player_order.asc())
            .load::<GamePlayer>(conn)?;

        Ok(seats)
    }

    /// Seats a player in a game at the given seat number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the seat or player is already taken.
    #[instrument(skip(self, conn))]
    pub fn add_participant(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
        player_id: i32,
        seat: i32,
    ) -> Result<(), DbError> {
        debug!(game_id, player_id, seat, "Seating player");

        diesel::insert_into(schema::game_players::table)
            .values(&NewGamePlayer::new(game_id, player_id, seat))
            .execute(conn)?;

        Ok(())
    }

    /// Updates a game's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn set_game_status(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
        status: GameStatus,
    ) -> Result<(), DbError> {
        debug!(game_id, status = status.to_db_string(), "Updating game status");

        diesel::update(schema::games::table.find(game_id))
            .set(schema::games::status.eq(status.to_db_string()))
            .execute(conn)?;

        Ok(())
    }

    /// Sets a game's turn counter.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn set_turn_number(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
        turn: i32,
    ) -> Result<(), DbError> {
        debug!(game_id, turn, "Advancing turn counter");

        diesel::update(schema::games::table.find(game_id))
            .set(schema::games::current_turn_number.eq(turn))
            .execute(conn)?;

        Ok(())
    }

    /// Marks a game Finished with the given winner (`None` for a draw).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn finish_game(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
        winner_id: Option<i32>,
    ) -> Result<(), DbError> {
        debug!(game_id, ?winner_id, "Finishing game");

        diesel::update(schema::games::table.find(game_id))
            .set((
                schema::games::status.eq(GameStatus::Finished.to_db_string()),
                schema::games::winner_id.eq(winner_id),
            ))
            .execute(conn)?;

        info!(game_id, ?winner_id, "Game finished");
        Ok(())
    }

    /// Gets all moves for a game, ordered by move number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn moves_for_game(
        &self,
        conn: &mut SqliteConnection,
        game_id: i32,
    ) -> Result<Vec<Move>, DbError> {
        debug!(game_id, "Loading move log");

        let moves = schema::moves::table
            .filter(schema::moves::game_id.eq(game_id))
            .order(schema::moves::move_number.asc())
            .load::<Move>(conn)?;

        Ok(moves)
    }

    /// Records a new move.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the position or move number is already taken
    /// for the game.
    #[instrument(skip(self, conn, mv), fields(game_id = mv.game_id(), player_id = mv.player_id(), position = mv.position()))]
    pub fn insert_move(
        &self,
        conn: &mut SqliteConnection,
        mv: NewMove,
    ) -> Result<Move, DbError> {
        debug!("Recording move");

        let recorded = diesel::insert_into(schema::moves::table)
            .values(&mv)
            .returning(Move::as_returning())
            .get_result(conn)?;

        info!(
            move_id = recorded.id(),
            game_id = recorded.game_id(),
            move_number = recorded.move_number(),
            "Move recorded"
        );
        Ok(recorded)
    }

    /// Applies a finished game's outcome to a player's aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn apply_player_stats(
        &self,
        conn: &mut SqliteConnection,
        player_id: i32,
        moves_count: i32,
        won: bool,
    ) -> Result<(), DbError> {
        debug!(player_id, moves_count, won, "Applying player stats");

        let win_increment = if won { 1 } else { 0 };
        diesel::update(schema::players::table.find(player_id))
            .set((
                schema::players::games_played.eq(schema::players::games_played + 1),
                schema::players::total_moves.eq(schema::players::total_moves + moves_count),
                schema::players::games_won.eq(schema::players::games_won + win_increment),
            ))
            .execute(conn)?;

        Ok(())
    }

    /// Gets all players with at least one win, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, conn))]
    pub fn players_with_wins(&self, conn: &mut SqliteConnection) -> Result<Vec<Player>, DbError> {
        debug!("Loading players with wins");

        let players = schema::players::table
            .filter(schema::players::games_won.gt(0))
            .order(schema::players::id.asc())
            .load::<Player>(conn)?;

        info!(count = players.len(), "Players with wins loaded");
        Ok(players)
    }
}
