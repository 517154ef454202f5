//! Finished games flow into the result log.

use gambit_core::{GameState, ResultLog};
use gambit_types::{GameEvent, Outcome};
use gambit_uci::scripted::{ProbeReply, ScriptedEngine};

use crate::common::{fast_settings, sq, start};

#[tokio::test]
async fn game_over_events_are_recorded_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = ResultLog::new(dir.path().join("results.txt"));

    for probe in [ProbeReply::Checkmate, ProbeReply::Stalemate] {
        let (mut game, _transcript) = start(ScriptedEngine::new().probe(probe), fast_settings()).await;
        assert!(game.submit_move_intent(sq("e2"), sq("e4")).await.is_accepted());
        assert!(matches!(game.state(), GameState::Terminal(_)));

        for event in game.events() {
            if let GameEvent::GameOver(outcome) = event {
                log.append(outcome).unwrap();
            }
        }
        game.shutdown().await;
    }

    let outcomes: Vec<_> = log
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| (e.number(), e.outcome()))
        .collect();
    assert_eq!(outcomes, [(1, Outcome::WhiteWins), (2, Outcome::Draw)]);
}
