//! End-to-end tests for the game lifecycle and statistics through
//! [`GameService`] on a temporary database.

use tempfile::NamedTempFile;
use tictactoe_arena::{GameError, GameRepository, GameService, GameStatus};

/// Creates a temporary database with schema applied, returns the file handle
/// (must stay in scope to keep the file alive) and a ready service.
fn setup_service() -> (NamedTempFile, GameService) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");

    (db_file, GameService::new(repo))
}

/// Creates two players and a game in progress between them, returning
/// (creator_id, joiner_id, game_id).
fn setup_running_game(service: &GameService) -> (i32, i32, i32) {
    let p1 = *service.create_player().expect("create p1").id();
    let p2 = *service.create_player().expect("create p2").id();
    let game_id = *service.create_game(p1).expect("create game").game().id();
    service.join_game(game_id, p2).expect("join game");
    (p1, p2, game_id)
}

#[test]
fn test_create_player_with_zeroed_aggregates() {
    let (_db, service) = setup_service();

    let player = service.create_player().expect("Create failed");
    assert!(*player.id() > 0);
    assert_eq!(*player.games_played(), 0);
    assert_eq!(*player.games_won(), 0);
    assert_eq!(*player.total_moves(), 0);
}

#[test]
fn test_get_player_not_found() {
    let (_db, service) = setup_service();

    let err = service.get_player(999).unwrap_err();
    assert!(matches!(err, GameError::NotFound { .. }));
    assert_eq!(err.to_string(), "Player not found");
}

#[test]
fn test_create_game_starts_waiting() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("create").id();

    let snapshot = service.create_game(p1).expect("Create game failed");
    assert_eq!(snapshot.game().parse_status().expect("status"), GameStatus::Waiting);
    assert_eq!(*snapshot.player1_id(), Some(p1));
    assert_eq!(*snapshot.player2_id(), None);
    assert_eq!(*snapshot.current_turn_player_id(), None);
    assert_eq!(*snapshot.grid(), [0; 9]);
    assert_eq!(
        snapshot.message().as_deref(),
        Some(
            format!(
                "Game created with ID: {} by player {}, waiting for another player to join",
                snapshot.game().id(),
                p1
            )
            .as_str()
        )
    );
}

#[test]
fn test_create_game_rejects_unknown_player() {
    let (_db, service) = setup_service();

    let err = service.create_game(42).unwrap_err();
    assert!(matches!(err, GameError::NotFound { .. }));
}

#[test]
fn test_create_game_rejects_player_with_waiting_game() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("create").id();
    let game_id = *service.create_game(p1).expect("first game").game().id();

    let err = service.create_game(p1).unwrap_err();
    assert!(matches!(err, GameError::Conflict { .. }));
    assert!(err.to_string().contains(&format!("ID: {game_id}")));
    assert!(err.to_string().contains("waiting for another player"));
}

#[test]
fn test_join_starts_game_with_creator_to_move() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("p1").id();
    let p2 = *service.create_player().expect("p2").id();
    let game_id = *service.create_game(p1).expect("create").game().id();

    let snapshot = service.join_game(game_id, p2).expect("Join failed");
    assert_eq!(
        snapshot.game().parse_status().expect("status"),
        GameStatus::InProgress
    );
    assert_eq!(*snapshot.player2_id(), Some(p2));
    assert_eq!(*snapshot.current_turn_player_id(), Some(p1));
    assert_eq!(
        snapshot.message().as_deref(),
        Some(
            format!(
                "Player {p2} joined game with ID: {game_id}, game is now in progress, \
                 waiting for player {p1} to make a move"
            )
            .as_str()
        )
    );
}

#[test]
fn test_join_rejects_joiner_with_unfinished_game() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("p1").id();
    let p2 = *service.create_player().expect("p2").id();
    let game1 = *service.create_game(p1).expect("game1").game().id();
    let game2 = *service.create_game(p2).expect("game2").game().id();

    // p2 already waits in game2 and cannot join game1.
    let err = service.join_game(game1, p2).unwrap_err();
    assert!(matches!(err, GameError::Conflict { .. }));
    assert!(err.to_string().contains(&format!("ID: {game2}")));
}

#[test]
fn test_join_rejects_own_game() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("p1").id();
    let game_id = *service.create_game(p1).expect("create").game().id();

    let err = service.join_game(game_id, p1).unwrap_err();
    assert_eq!(err.to_string(), "Player already in game");
}

#[test]
fn test_join_rejects_running_game() {
    let (_db, service) = setup_service();
    let (_p1, _p2, game_id) = setup_running_game(&service);
    let p3 = *service.create_player().expect("p3").id();

    let err = service.join_game(game_id, p3).unwrap_err();
    assert_eq!(err.to_string(), "Game already started or finished");
}

#[test]
fn test_join_missing_game() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("p1").id();

    let err = service.join_game(999, p1).unwrap_err();
    assert!(matches!(err, GameError::NotFound { .. }));
    assert_eq!(err.to_string(), "Game not found");
}

#[test]
fn test_move_rejects_waiting_game() {
    let (_db, service) = setup_service();
    let p1 = *service.create_player().expect("p1").id();
    let game_id = *service.create_game(p1).expect("create").game().id();

    let err = service.make_move(game_id, p1, 0).unwrap_err();
    assert_eq!(err.to_string(), "Game is not in progress");
}

#[test]
fn test_move_rejects_out_of_turn() {
    let (_db, service) = setup_service();
    let (_p1, p2, game_id) = setup_running_game(&service);

    let err = service.make_move(game_id, p2, 0).unwrap_err();
    assert!(matches!(err, GameError::Conflict { .. }));
    assert_eq!(err.to_string(), "Not your turn");
}

#[test]
fn test_move_rejects_outsider() {
    let (_db, service) = setup_service();
    let (_p1, _p2, game_id) = setup_running_game(&service);

    let err = service.make_move(game_id, 999, 0).unwrap_err();
    assert!(matches!(err, GameError::Forbidden { .. }));
    assert_eq!(err.to_string(), "Player not in game");
}

#[test]
fn test_move_rejects_occupied_position() {
    let (_db, service) = setup_service();
    let (p1, p2, game_id) = setup_running_game(&service);
    service.make_move(game_id, p1, 4).expect("first move");

    // Occupied cell is a conflict even on the right turn.
    let err = service.make_move(game_id, p2, 4).unwrap_err();
    assert!(matches!(err, GameError::Conflict { .. }));
    assert_eq!(err.to_string(), "Position already occupied");
}

#[test]
fn test_ongoing_move_advances_turn() {
    let (_db, service) = setup_service();
    let (p1, p2, game_id) = setup_running_game(&service);

    let snapshot = service.make_move(game_id, p1, 4).expect("move");
    assert_eq!(
        snapshot.game().parse_status().expect("status"),
        GameStatus::InProgress
    );
    assert_eq!(*snapshot.game().current_turn_number(), 2);
    assert_eq!(*snapshot.current_turn_player_id(), Some(p2));
    assert_eq!(*snapshot.grid(), [0, 0, 0, 0, 1, 0, 0, 0, 0]);
    assert_eq!(
        snapshot.message().as_deref(),
        Some(
            format!(
                "Player {p1} made a move at position 4, game is still in progress, \
                 waiting for player {p2} to make a move"
            )
            .as_str()
        )
    );
}

#[test]
fn test_winning_move_finishes_game() {
    let (_db, service) = setup_service();
    let (p1, p2, game_id) = setup_running_game(&service);

    service.make_move(game_id, p1, 0).expect("move 1");
    service.make_move(game_id, p2, 6).expect("move 2");
    service.make_move(game_id, p1, 1).expect("move 3");
    service.make_move(game_id, p2, 7).expect("move 4");
    let snapshot = service.make_move(game_id, p1, 2).expect("winning move");

    assert_eq!(
        snapshot.game().parse_status().expect("status"),
        GameStatus::Finished
    );
    assert_eq!(*snapshot.game().winner_id(), Some(p1));
    assert_eq!(snapshot.grid()[0..3], [1, 1, 1]);
    assert_eq!(
        snapshot.message().as_deref(),
        Some(
            format!("Player {p1} made a move at position 2 and won! Game is now finished")
                .as_str()
        )
    );

    // Stats applied exactly once on the terminal transition.
    let winner = service.get_player(p1).expect("winner");
    assert_eq!(*winner.games_played(), 1);
    assert_eq!(*winner.games_won(), 1);
    assert_eq!(*winner.total_moves(), 3);

    let loser = service.get_player(p2).expect("loser");
    assert_eq!(*loser.games_played(), 1);
    assert_eq!(*loser.games_won(), 0);
    assert_eq!(*loser.total_moves(), 2);

    // No transition leaves Finished.
    let err = service.make_move(game_id, p2, 8).unwrap_err();
    assert_eq!(err.to_string(), "Game is not in progress");
}

#[test]
fn test_drawn_game_has_no_winner() {
    let (_db, service) = setup_service();
    let (p1, p2, game_id) = setup_running_game(&service);

    for (player, position) in [
        (p1, 1),
        (p2, 0),
        (p1, 3),
        (p2, 2),
        (p1, 4),
        (p2, 5),
        (p1, 6),
        (p2, 7),
    ] {
        service.make_move(game_id, player, position).expect("move");
    }
    let snapshot = service.make_move(game_id, p1, 8).expect("final move");

    assert_eq!(
        snapshot.game().parse_status().expect("status"),
        GameStatus::Finished
    );
    assert_eq!(*snapshot.game().winner_id(), None);
    assert_eq!(
        snapshot.message().as_deref(),
        Some(
            format!("Player {p1} made a move at position 8 and it's a draw! Game is now finished")
                .as_str()
        )
    );

    let first = service.get_player(p1).expect("p1");
    assert_eq!(*first.games_played(), 1);
    assert_eq!(*first.games_won(), 0);
    assert_eq!(*first.total_moves(), 5);

    let second = service.get_player(p2).expect("p2");
    assert_eq!(*second.games_played(), 1);
    assert_eq!(*second.games_won(), 0);
    assert_eq!(*second.total_moves(), 4);
}

#[test]
fn test_get_game_is_idempotent() {
    let (_db, service) = setup_service();
    let (p1, _p2, game_id) = setup_running_game(&service);
    service.make_move(game_id, p1, 4).expect("move");

    let first = service.get_game(game_id).expect("first read");
    let second = service.get_game(game_id).expect("second read");

    assert_eq!(first.grid(), second.grid());
    assert_eq!(first.game().status(), second.game().status());
    assert_eq!(
        first.game().current_turn_number(),
        second.game().current_turn_number()
    );
}

#[test]
fn test_list_available_games_only_waiting() {
    let (_db, service) = setup_service();
    let (_p1, _p2, running_game) = setup_running_game(&service);
    let p3 = *service.create_player().expect("p3").id();
    let waiting_game = *service.create_game(p3).expect("create").game().id();

    let available = service.list_available_games().expect("list");
    let ids: Vec<i32> = available.iter().map(|snap| *snap.game().id()).collect();
    assert!(ids.contains(&waiting_game));
    assert!(!ids.contains(&running_game));
}

#[test]
fn test_leaderboards_rank_and_filter() {
    let (_db, service) = setup_service();
    let repo = service.repository();
    let mut conn = repo.connection().expect("conn");

    let a = *service.create_player().expect("a").id();
    let b = *service.create_player().expect("b").id();
    let c = *service.create_player().expect("c").id();
    let d = *service.create_player().expect("d").id();

    // a: 3 games, 2 wins, 8 moves -> win_rate 0.667, efficiency 4.0
    repo.apply_player_stats(&mut conn, a, 3, true).expect("stats");
    repo.apply_player_stats(&mut conn, a, 3, true).expect("stats");
    repo.apply_player_stats(&mut conn, a, 2, false).expect("stats");
    // b: 1 game, 1 win, 3 moves -> win_rate 1.0, efficiency 3.0
    repo.apply_player_stats(&mut conn, b, 3, true).expect("stats");
    // c: 1 game, no wins -> filtered out of every board
    repo.apply_player_stats(&mut conn, c, 4, false).expect("stats");
    // d: 6 games, 3 wins, 18 moves -> win_rate 0.5, efficiency 6.0
    for won in [true, true, true, false, false, false] {
        repo.apply_player_stats(&mut conn, d, if won { 4 } else { 2 }, won)
            .expect("stats");
    }

    let by_wins = service.leaderboard_by_wins().expect("wins");
    let win_ids: Vec<i32> = by_wins.iter().map(|s| *s.player_id()).collect();
    assert_eq!(win_ids, vec![d, a, b]);
    assert_eq!(
        by_wins.iter().map(|s| *s.rank()).collect::<Vec<u32>>(),
        vec![1, 2, 3]
    );

    let by_rate = service.leaderboard_by_win_rate().expect("win rate");
    let rate_ids: Vec<i32> = by_rate.iter().map(|s| *s.player_id()).collect();
    assert_eq!(rate_ids, vec![b, a, d]);
    assert_eq!(*by_rate[1].win_rate(), 0.667);
    assert_eq!(*by_rate[2].win_rate(), 0.5);

    let by_efficiency = service.leaderboard_by_efficiency().expect("efficiency");
    let eff_ids: Vec<i32> = by_efficiency.iter().map(|s| *s.player_id()).collect();
    assert_eq!(eff_ids, vec![b, a, d]);
    assert_eq!(*by_efficiency[0].efficiency(), 3.0);
    assert_eq!(*by_efficiency[1].efficiency(), 4.0);
    assert_eq!(*by_efficiency[2].efficiency(), 6.0);
}

#[test]
fn test_leaderboard_keeps_input_order_on_win_ties() {
    let (_db, service) = setup_service();
    let repo = service.repository();
    let mut conn = repo.connection().expect("conn");

    let a = *service.create_player().expect("a").id();
    let b = *service.create_player().expect("b").id();

    repo.apply_player_stats(&mut conn, a, 3, true).expect("stats");
    repo.apply_player_stats(&mut conn, b, 5, true).expect("stats");

    let by_wins = service.leaderboard_by_wins().expect("wins");
    let ids: Vec<i32> = by_wins.iter().map(|s| *s.player_id()).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn test_move_waits_for_write_lock_held_by_another_game() {
    let (_db, service) = setup_service();
    let (_p1, _p2, _game1) = setup_running_game(&service);
    let (p3, _p4, game2) = setup_running_game(&service);

    // Holds the database write lock for a while before committing, as a
    // command on the first game would mid-transaction.
    let repo = service.repository().clone();
    let holder = std::thread::spawn(move || {
        let mut conn = repo.connection().expect("conn");
        conn.immediate_transaction::<_, GameError, _>(|_conn| {
            std::thread::sleep(std::time::Duration::from_millis(300));
            Ok(())
        })
        .expect("held transaction");
    });

    // Let the holder take the lock first.
    std::thread::sleep(std::time::Duration::from_millis(50));

    // The busy timeout queues this writer behind the holder instead of
    // failing with "database is locked".
    let snapshot = service.make_move(game2, p3, 4).expect("move on other game");
    assert_eq!(*snapshot.game().current_turn_number(), 2);

    holder.join().expect("holder thread");
}
