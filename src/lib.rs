//! Multiplayer tic-tac-toe game server.
//!
//! Players pair up into games, alternate moves on a 3x3 grid, and the server
//! determines win/draw outcomes and tracks aggregates for a leaderboard.
//!
//! # Architecture
//!
//! - **logic**: pure rules - board projection, win/draw detection, validators
//! - **db**: diesel/SQLite persistence with embedded migrations
//! - **service**: game lifecycle orchestration and statistics aggregation
//! - **api**: axum REST transport
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_arena::{GameRepository, GameService};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("arena.db".to_string())?;
//! repository.run_migrations()?;
//!
//! let service = GameService::new(repository);
//! let app = tictactoe_arena::router(service);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod db;
mod error;
mod logic;
mod service;

// Crate-level exports - REST transport
pub use api::{
    ApiError, GameCreate, GameJoin, GamePublic, MoveCreate, PlayerPublic, PlayerStatsPublic,
    router,
};

// Crate-level exports - Persistence
pub use db::{
    DbError, Game, GamePlayer, GameRepository, GameStatus, Move, NewGame, NewGamePlayer, NewMove,
    Player,
};

// Crate-level exports - Core error taxonomy
pub use error::GameError;

// Crate-level exports - Pure game rules
pub use logic::{
    Grid, WIN_LINES, can_join, can_move, can_start_new_game, cell_is_free, has_won, is_draw,
    project_grid,
};

// Crate-level exports - Service layer
pub use service::{GameService, GameSnapshot, PlayerStats};
