//! Invariants that hold across any sequence of round trips.

use std::time::Duration;

use gambit_core::{EngineTurnError, GameState, MoveOutcome, RejectReason};
use gambit_types::{Board, GameEvent, PieceKind, Side};
use gambit_uci::scripted::{ProbeReply, ScriptedEngine};

use crate::common::{fast_settings, last_position, session, sq, start};

#[tokio::test]
async fn history_round_trips_to_the_engine() {
    let engine = ScriptedEngine::new().reply("e7e5").reply("b8c6");
    let (mut game, transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("e2"), sq("e4")).await.is_accepted());
    assert!(game.submit_move_intent(sq("g1"), sq("f3")).await.is_accepted());

    // The last position the engine saw is exactly the recorded history.
    assert_eq!(
        last_position(&transcript).as_deref(),
        Some(game.history().position_command().as_str())
    );
    assert_eq!(
        game.history().position_command(),
        "position startpos moves e2e4 e7e5 g1f3 b8c6"
    );
    game.shutdown().await;
}

#[tokio::test]
async fn committed_moves_alternate_sides() {
    let engine = ScriptedEngine::new()
        .reply("e7e5")
        .reply("b8c6")
        .reply("g8f6");
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    for (from, to) in [("e2", "e4"), ("g1", "f3"), ("f1", "c4")] {
        assert!(game.submit_move_intent(sq(from), sq(to)).await.is_accepted());
    }

    let sides: Vec<Side> = game
        .events()
        .filter_map(|e| match e {
            GameEvent::Move(mv) => Some(mv.side()),
            GameEvent::GameOver(_) => None,
        })
        .collect();
    assert_eq!(sides.len(), 6);
    for pair in sides.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(sides[0], Side::White);
    game.shutdown().await;
}

#[tokio::test]
async fn pending_promotion_keeps_the_turn() {
    let engine = ScriptedEngine::new().reply("a7a6");
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("b2"), sq("b7")).await.is_accepted());
    assert_eq!(game.state(), GameState::ToMove(Side::White));
    assert!(game.submit_move_intent(sq("b7"), sq("c8")).await.is_accepted());
    assert!(matches!(
        game.state(),
        GameState::AwaitingPromotionChoice { side: Side::White, .. }
    ));
    assert_eq!(
        game.play_engine_turn().await,
        Err(EngineTurnError::NotEngineTurn)
    );
    assert_eq!(
        game.submit_promotion_choice(PieceKind::King).await,
        MoveOutcome::Rejected(RejectReason::InvalidPromotion)
    );
    game.shutdown().await;
}

#[tokio::test]
async fn unacknowledged_promotion_reverts() {
    let engine = ScriptedEngine::new().reply("a7a6").refuse("b7c8n");
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("b2"), sq("b7")).await.is_accepted());
    let before = game.current_board_snapshot();
    let history_before = game.history().clone();

    assert!(game.submit_move_intent(sq("b7"), sq("c8")).await.is_accepted());
    assert_ne!(game.board(), &before, "tentative promotion is shown");

    let outcome = game.submit_promotion_choice(PieceKind::Knight).await;
    assert_eq!(outcome, MoveOutcome::Rejected(RejectReason::NotAcknowledged));
    assert_eq!(game.board(), &before);
    assert_eq!(game.history(), &history_before);
    assert_eq!(game.state(), GameState::ToMove(Side::White));
    game.shutdown().await;
}

#[tokio::test]
async fn failed_round_trips_leave_the_board_untouched() {
    let engine = ScriptedEngine::new().refuse("d2d5");
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    let outcome = game.submit_move_intent(sq("d2"), sq("d5")).await;
    assert_eq!(outcome, MoveOutcome::Rejected(RejectReason::NotAcknowledged));
    assert_eq!(game.board(), &Board::initial());
    assert!(game.history().is_empty());

    // Accepted, but the engine never answers its own search.
    assert!(game.submit_move_intent(sq("d2"), sq("d4")).await.is_accepted());
    let snapshot = game.current_board_snapshot();
    assert_eq!(game.play_engine_turn().await, Err(EngineTurnError::Timeout));
    assert_eq!(game.board(), &snapshot);
    assert_eq!(game.history().render(), "d2d4");
    assert_eq!(
        game.submit_move_intent(sq("e2"), sq("e4")).await,
        MoveOutcome::Rejected(RejectReason::NotYourTurn)
    );
    game.shutdown().await;
}

#[tokio::test]
async fn late_acknowledgement_does_not_accept_the_next_move() {
    let engine = ScriptedEngine::new()
        .slow("e2e4", Duration::from_millis(400))
        .refuse("d2d4");
    let (mut game, transcript) = start(engine, fast_settings()).await;

    assert_eq!(
        game.submit_move_intent(sq("e2"), sq("e4")).await,
        MoveOutcome::Rejected(RejectReason::NotAcknowledged)
    );
    assert!(transcript.count("stop") > 0, "a missed acknowledgement resyncs");

    // The engine never acknowledges d2d4; the late readyok for e2e4 must
    // not stand in for it.
    assert_eq!(
        game.submit_move_intent(sq("d2"), sq("d4")).await,
        MoveOutcome::Rejected(RejectReason::NotAcknowledged)
    );
    assert!(game.history().is_empty());
    assert_eq!(game.board(), &Board::initial());
    game.shutdown().await;
}

#[tokio::test]
async fn silent_probe_lets_the_game_continue() {
    let engine = ScriptedEngine::new().reply("c7c5").probe(ProbeReply::Silent);
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("c2"), sq("c4")).await.is_accepted());
    assert_eq!(game.history().render(), "c2c4 c7c5");
    assert_eq!(game.state(), GameState::ToMove(Side::White));
    game.shutdown().await;
}

#[tokio::test]
async fn restart_resets_and_replaces_the_session() {
    let engine = ScriptedEngine::new().reply("e7e5");
    let (mut game, old_transcript) = start(engine, fast_settings()).await;
    assert!(game.submit_move_intent(sq("e2"), sq("e4")).await.is_accepted());

    let (fresh, new_transcript) = session(ScriptedEngine::new().named("Second")).await;
    game.restart(fresh).await;

    assert!(old_transcript.wait_for("quit", Duration::from_secs(1)).await);
    assert_eq!(game.board(), &Board::initial());
    assert!(game.history().is_empty());
    assert_eq!(game.state(), GameState::ToMove(Side::White));
    assert_eq!(game.events().count(), 0);
    assert_eq!(game.engine_name(), Some("Second"));
    assert!(new_transcript.wait_for("ucinewgame", Duration::from_secs(1)).await);
    game.shutdown().await;
}

#[tokio::test]
async fn human_can_play_black() {
    let engine = ScriptedEngine::new().reply("d2d4").reply("c2c4");
    let settings = fast_settings().with_human_side(Side::Black);
    let (mut game, _transcript) = start(engine, settings).await;

    assert_eq!(game.history().render(), "d2d4");
    assert_eq!(
        game.submit_move_intent(sq("e2"), sq("e4")).await,
        MoveOutcome::Rejected(RejectReason::NotYourPiece)
    );
    assert!(game.submit_move_intent(sq("g8"), sq("f6")).await.is_accepted());
    assert_eq!(game.history().render(), "d2d4 g8f6 c2c4");
    game.shutdown().await;
}
