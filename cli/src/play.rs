//! The interactive loop: stdin lines in, board and events out.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use gambit_core::{GameCoordinator, GameState, MoveOutcome, ResultLog};
use gambit_types::{GameEvent, MoveToken, PieceKind};
use gambit_uci::{EngineConfig, EngineSession};

use crate::commands::{Command, HELP};
use crate::render;

pub struct Play<'a> {
    game: GameCoordinator,
    engine: &'a EngineConfig,
    results: Option<&'a ResultLog>,
}

impl<'a> Play<'a> {
    pub fn new(
        game: GameCoordinator,
        engine: &'a EngineConfig,
        results: Option<&'a ResultLog>,
    ) -> Self {
        Self {
            game,
            engine,
            results,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        if let Some(name) = self.game.engine_name() {
            println!("Playing against {name}. Type `help` for commands.");
        }
        self.flush_events();
        self.show();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("reading input")? {
            match Command::parse(&line) {
                Command::Quit => break,
                Command::Empty => continue,
                Command::Help => println!("{HELP}"),
                Command::Board => self.show(),
                Command::History => self.print_history(),
                Command::Restart => {
                    if let Err(e) = self.restart().await {
                        tracing::warn!("{e:#}");
                        println!("{e:#}. The current game continues.");
                    }
                }
                Command::Move(token) => self.play_move(token).await,
                Command::Promote(kind) => {
                    let outcome = self.game.submit_promotion_choice(kind).await;
                    self.report(outcome);
                }
                Command::Go => {
                    if let Err(e) = self.game.play_engine_turn().await {
                        println!("{e}");
                    }
                    self.flush_events();
                    self.show();
                }
                Command::Invalid(message) => println!("{message}"),
            }
        }

        self.game.shutdown().await;
        Ok(())
    }

    async fn play_move(&mut self, token: MoveToken) {
        let outcome = self.game.submit_move_intent(token.from(), token.to()).await;
        if outcome.is_accepted()
            && matches!(self.game.state(), GameState::AwaitingPromotionChoice { .. })
            && let Some(kind) = token.promotion()
        {
            self.promote(kind).await;
            return;
        }
        self.report(outcome);
    }

    async fn promote(&mut self, kind: PieceKind) {
        let outcome = self.game.submit_promotion_choice(kind).await;
        self.report(outcome);
    }

    fn report(&mut self, outcome: MoveOutcome) {
        if let MoveOutcome::Rejected(reason) = outcome {
            println!("Rejected: {reason}");
        }
        self.flush_events();
        self.show();
    }

    /// Connect a fresh engine and start over. On failure the current game
    /// and its engine are left as they were.
    async fn restart(&mut self) -> Result<()> {
        let session = EngineSession::connect(self.engine)
            .await
            .context("restarting the chess engine")?;
        self.game.restart(session).await;
        println!("New game.");
        self.flush_events();
        self.show();
        Ok(())
    }

    fn show(&self) {
        let human = self.game.settings().human_side();
        print!("{}", render::board(self.game.board(), human));
        println!("{}", render::prompt(self.game.state(), human));
    }

    fn flush_events(&mut self) {
        let events: Vec<GameEvent> = self.game.events().collect();
        for event in &events {
            println!("{}", render::event(event));
            if let GameEvent::GameOver(outcome) = event
                && let Some(log) = self.results
            {
                match log.append(*outcome) {
                    Ok(entry) => println!("Recorded as game {}.", entry.number()),
                    Err(e) => {
                        tracing::warn!("{e}");
                        println!("Could not record the result: {e}");
                    }
                }
            }
        }
    }

    fn print_history(&self) {
        match self.results.map(ResultLog::entries) {
            Some(Ok(entries)) => print!("{}", render::results(&entries)),
            Some(Err(e)) => println!("{e}"),
            None => println!("No result log configured."),
        }
    }
}
