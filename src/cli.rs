//! Command-line interface for the game server.

use clap::{Parser, Subcommand};

/// Tictactoe Arena - multiplayer tic-tac-toe game server
#[derive(Parser, Debug)]
#[command(name = "tictactoe_arena")]
#[command(about = "Multiplayer tic-tac-toe game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "arena.db")]
        db_path: String,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "arena.db")]
        db_path: String,
    },
}
