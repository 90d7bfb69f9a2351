//! Pure game rules: board projection, win/draw detection, and command
//! validators.
//!
//! Nothing here touches the database; every function is a pure computation
//! over loaded entities, so the rules can be tested without persistence.

mod grid;
mod rules;
mod validate;

pub use grid::{Grid, project_grid};
pub use rules::{WIN_LINES, has_won, is_draw};
pub use validate::{can_join, can_move, can_start_new_game, cell_is_free};
