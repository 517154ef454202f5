//! End-to-end games against the scripted engine.
//!
//! The scripted engine acknowledges every position it is shown, so these
//! games are geometrically possible but not always legal chess. Legality is
//! the engine's business; the acknowledgement is only a position-accepted
//! signal.

use gambit_core::{GameState, MoveOutcome, RejectReason};
use gambit_types::{Board, GameEvent, MoveEvent, MoveKind, Outcome, Piece, PieceKind, Side};
use gambit_uci::scripted::{ProbeReply, ScriptedEngine};

use crate::common::{fast_settings, last_position, sq, start};

fn moves(events: &[GameEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Move(mv) => Some(mv.token().to_string()),
            GameEvent::GameOver(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn scenario_a_opening_pawn_push() {
    let engine = ScriptedEngine::new().reply("e7e5");
    let (mut game, transcript) = start(engine, fast_settings()).await;

    let outcome = game.submit_move_intent(sq("e2"), sq("e4")).await;
    assert_eq!(outcome, MoveOutcome::Accepted);

    // The candidate position was acknowledged before it was recorded.
    let commands = transcript.commands();
    let ack = commands
        .iter()
        .position(|c| c == "position startpos moves e2e4")
        .expect("candidate position sent");
    assert_eq!(commands[ack + 1], "isready");

    let events: Vec<_> = game.events().collect();
    assert_eq!(
        events[0],
        GameEvent::Move(MoveEvent::new(
            Side::White,
            "e2e4".parse().unwrap(),
            MoveKind::Plain
        ))
    );
    assert_eq!(moves(&events), ["e2e4", "e7e5"]);
    assert_eq!(game.history().render(), "e2e4 e7e5");
    assert_eq!(game.board().piece_at(sq("e2")), None);
    assert_eq!(
        game.board().piece_at(sq("e4")),
        Some(Piece::new(Side::White, PieceKind::Pawn))
    );
    assert_eq!(game.state(), GameState::ToMove(Side::White));
    game.shutdown().await;
}

#[tokio::test]
async fn scenario_b_kingside_castle() {
    let engine = ScriptedEngine::new()
        .reply("e7e5")
        .reply("d7d6")
        .reply("g8f6")
        .reply("b8c6");
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    for (from, to) in [("g1", "f3"), ("e2", "e3"), ("f1", "e2")] {
        assert!(game.submit_move_intent(sq(from), sq(to)).await.is_accepted());
    }
    game.events().for_each(drop);

    let outcome = game.submit_move_intent(sq("e1"), sq("g1")).await;
    assert_eq!(outcome, MoveOutcome::Accepted);

    let board = game.board();
    assert_eq!(board.piece_at(sq("e1")), None);
    assert_eq!(board.piece_at(sq("h1")), None);
    assert_eq!(
        board.piece_at(sq("g1")),
        Some(Piece::new(Side::White, PieceKind::King))
    );
    assert_eq!(
        board.piece_at(sq("f1")),
        Some(Piece::new(Side::White, PieceKind::Rook))
    );

    let events: Vec<_> = game.events().collect();
    assert!(matches!(
        events[0],
        GameEvent::Move(mv) if mv.kind() == MoveKind::Castle && mv.token().to_string() == "e1g1"
    ));
    assert!(game.history().render().ends_with("e1g1 b8c6"));
    game.shutdown().await;
}

#[tokio::test]
async fn scenario_c_promotion_waits_for_choice() {
    let engine = ScriptedEngine::new().reply("d7d5").reply("e8d7").reply("a7a6");
    let (mut game, transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("e2"), sq("e6")).await.is_accepted());
    assert!(game.submit_move_intent(sq("e6"), sq("e7")).await.is_accepted());
    game.events().for_each(drop);

    let positions_before = transcript.count("position");
    let outcome = game.submit_move_intent(sq("e7"), sq("e8")).await;
    assert_eq!(outcome, MoveOutcome::Accepted);
    assert_eq!(
        game.state(),
        GameState::AwaitingPromotionChoice {
            square: sq("e8"),
            side: Side::White
        }
    );
    // Shown but neither sent nor recorded.
    assert_eq!(transcript.count("position"), positions_before);
    assert!(!game.history().render().contains("e7e8"));
    assert_eq!(game.events().count(), 0);
    assert_eq!(
        game.submit_move_intent(sq("a2"), sq("a3")).await,
        MoveOutcome::Rejected(RejectReason::PromotionPending)
    );

    let outcome = game.submit_promotion_choice(PieceKind::Queen).await;
    assert_eq!(outcome, MoveOutcome::Accepted);
    assert_eq!(
        game.board().piece_at(sq("e8")),
        Some(Piece::new(Side::White, PieceKind::Queen))
    );
    assert!(game.history().render().ends_with("e7e8q a7a6"));

    let events: Vec<_> = game.events().collect();
    assert_eq!(
        events[0],
        GameEvent::Move(MoveEvent::new(
            Side::White,
            "e7e8q".parse().unwrap(),
            MoveKind::Promotion
        ))
    );
    assert!(
        transcript
            .commands()
            .iter()
            .any(|c| c.ends_with("e7e8q") && c.starts_with("position"))
    );
    game.shutdown().await;
}

#[tokio::test]
async fn scenario_d_mate_probe_ends_the_game() {
    let engine = ScriptedEngine::new().probe(ProbeReply::Checkmate);
    let (mut game, transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("e2"), sq("e4")).await.is_accepted());
    assert_eq!(game.state(), GameState::Terminal(Outcome::WhiteWins));

    let events: Vec<_> = game.events().collect();
    assert_eq!(events.last(), Some(&GameEvent::GameOver(Outcome::WhiteWins)));
    // The engine never searched for a reply.
    assert_eq!(transcript.count("go depth 10"), 0);

    let sent = transcript.commands().len();
    let board = game.current_board_snapshot();
    assert_eq!(
        game.submit_move_intent(sq("d2"), sq("d4")).await,
        MoveOutcome::Rejected(RejectReason::GameOver)
    );
    assert_eq!(transcript.commands().len(), sent);
    assert_eq!(game.board(), &board);
    assert_eq!(last_position(&transcript).as_deref(), Some("position startpos moves e2e4"));
    game.shutdown().await;
}

#[tokio::test]
async fn stalemate_probe_is_a_draw() {
    let engine = ScriptedEngine::new()
        .reply("e7e5")
        .probe(ProbeReply::Ongoing)
        .probe(ProbeReply::Stalemate);
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("e2"), sq("e4")).await.is_accepted());
    assert_eq!(game.state(), GameState::Terminal(Outcome::Draw));
    let events: Vec<_> = game.events().collect();
    assert_eq!(moves(&events), ["e2e4", "e7e5"]);
    assert_eq!(events.last(), Some(&GameEvent::GameOver(Outcome::Draw)));
    game.shutdown().await;
}

#[tokio::test]
async fn engine_mate_is_a_win_for_the_engine() {
    let engine = ScriptedEngine::new()
        .reply("d8h4")
        .probe(ProbeReply::Ongoing)
        .probe(ProbeReply::Checkmate);
    let (mut game, _transcript) = start(engine, fast_settings()).await;

    assert!(game.submit_move_intent(sq("f2"), sq("f3")).await.is_accepted());
    assert_eq!(game.state(), GameState::Terminal(Outcome::BlackWins));
    assert_ne!(game.board(), &Board::initial());
    game.shutdown().await;
}
