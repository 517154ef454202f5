//! Turn-taking state machine between a human and the engine.
//!
//! The coordinator owns the board, the move history and the engine session.
//! It never decides legality itself: a human move is committed only after
//! the engine acknowledged the position it leads to, and every committed
//! move is followed by a shallow probe that detects mate or stalemate.

use std::collections::VecDeque;

use gambit_types::{
    Board, GameEvent, MoveEvent, MoveHistory, MoveKind, MoveToken, Outcome, PieceKind, Side,
    Square, apply_move, detects_promotion,
};
use gambit_uci::protocol::{self, IS_READY, UCI_NEW_GAME};
use gambit_uci::{BestMove, EngineSession, ProbeVerdict, Sentinel, best_move, probe_verdict};

use crate::outcome::{EngineTurnError, MoveOutcome, RejectReason};
use crate::settings::GameSettings;

/// Depth of the search used only to learn whether the game has ended.
const PROBE_DEPTH: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    ToMove(Side),
    /// A pawn of `side` stands on `square` and needs a promotion kind. The
    /// move is shown but neither acknowledged nor recorded.
    AwaitingPromotionChoice { square: Square, side: Side },
    Terminal(Outcome),
}

impl GameState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameState::Terminal(_))
    }

    /// The side whose input the game is waiting for, if any.
    #[must_use]
    pub const fn side_to_move(self) -> Option<Side> {
        match self {
            GameState::ToMove(side) | GameState::AwaitingPromotionChoice { side, .. } => Some(side),
            GameState::Terminal(_) => None,
        }
    }
}

/// A human pawn move to the last rank waiting for its promotion kind.
#[derive(Debug, Clone)]
struct PendingPromotion {
    token: MoveToken,
    before: Board,
}

pub struct GameCoordinator {
    session: EngineSession,
    settings: GameSettings,
    board: Board,
    history: MoveHistory,
    state: GameState,
    pending: Option<PendingPromotion>,
    events: VecDeque<GameEvent>,
}

impl GameCoordinator {
    /// Begin a game on `session`. When the engine plays White it moves
    /// before this returns.
    pub async fn start(session: EngineSession, settings: GameSettings) -> Self {
        let mut coordinator = Self {
            session,
            settings,
            board: Board::initial(),
            history: MoveHistory::new(),
            state: GameState::ToMove(Side::White),
            pending: None,
            events: VecDeque::new(),
        };
        coordinator.open_game().await;
        coordinator
    }

    async fn open_game(&mut self) {
        self.session.send(UCI_NEW_GAME).await;
        tracing::info!(
            "New game: human plays {}, engine depth {}",
            self.settings.human_side(),
            self.settings.depth()
        );
        if self.settings.engine_side() == Side::White
            && let Err(e) = self.play_engine_turn().await
        {
            tracing::warn!("Engine opening move failed: {e}");
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_board_snapshot(&self) -> Board {
        self.board.clone()
    }

    #[must_use]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    #[must_use]
    pub fn engine_name(&self) -> Option<&str> {
        self.session.engine_name()
    }

    /// Events queued since the previous call, oldest first.
    pub fn events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// A drag in raw board coordinates. Anything released off the board is
    /// a cancellation.
    pub async fn submit_drag(&mut self, from: (i32, i32), to: (i32, i32)) -> MoveOutcome {
        match (
            Square::from_coords(from.0, from.1),
            Square::from_coords(to.0, to.1),
        ) {
            (Some(from), Some(to)) => self.submit_move_intent(from, to).await,
            _ => MoveOutcome::Rejected(RejectReason::Cancelled),
        }
    }

    /// Move the human's piece from `from` to `to`.
    ///
    /// Shape and ownership are checked locally; everything else is left to
    /// the engine's acknowledgement. On success the engine replies before
    /// this returns, unless the game ended.
    pub async fn submit_move_intent(&mut self, from: Square, to: Square) -> MoveOutcome {
        let side = match self.state {
            GameState::Terminal(_) => return MoveOutcome::Rejected(RejectReason::GameOver),
            GameState::AwaitingPromotionChoice { .. } => {
                return MoveOutcome::Rejected(RejectReason::PromotionPending);
            }
            GameState::ToMove(side) => side,
        };
        if side != self.settings.human_side() {
            return MoveOutcome::Rejected(RejectReason::NotYourTurn);
        }
        if from == to {
            return MoveOutcome::Rejected(RejectReason::Cancelled);
        }
        if !self.board.piece_at(from).is_some_and(|p| p.side() == side) {
            return MoveOutcome::Rejected(RejectReason::NotYourPiece);
        }
        if self.board.piece_at(to).is_some_and(|p| p.side() == side) {
            return MoveOutcome::Rejected(RejectReason::OwnPieceOnTarget);
        }

        let token = MoveToken::new(from, to);
        let mut tentative = self.board.clone();
        let Some(applied) = apply_move(&mut tentative, &token) else {
            return MoveOutcome::Rejected(RejectReason::NotYourPiece);
        };

        if applied.awaiting_promotion() {
            let before = std::mem::replace(&mut self.board, tentative);
            self.pending = Some(PendingPromotion { token, before });
            self.state = GameState::AwaitingPromotionChoice { square: to, side };
            tracing::debug!("Promotion pending on {to}");
            return MoveOutcome::Accepted;
        }

        if !self.acknowledge(&token).await {
            tracing::info!("Engine did not acknowledge {token}");
            return MoveOutcome::Rejected(RejectReason::NotAcknowledged);
        }

        self.commit(side, token, applied.kind(), tentative);
        self.after_human_move(side).await;
        MoveOutcome::Accepted
    }

    /// Complete a pending promotion with `kind`.
    pub async fn submit_promotion_choice(&mut self, kind: PieceKind) -> MoveOutcome {
        let GameState::AwaitingPromotionChoice { side, .. } = self.state else {
            return MoveOutcome::Rejected(match self.state {
                GameState::Terminal(_) => RejectReason::GameOver,
                _ => RejectReason::NoPromotionPending,
            });
        };
        if !kind.is_promotion_choice() {
            return MoveOutcome::Rejected(RejectReason::InvalidPromotion);
        }
        let Some(pending) = self.pending.take() else {
            self.state = GameState::ToMove(side);
            return MoveOutcome::Rejected(RejectReason::NoPromotionPending);
        };

        let token = pending.token.with_promotion(kind);
        if !self.acknowledge(&token).await {
            tracing::info!("Engine did not acknowledge {token}, reverting promotion");
            self.board = pending.before;
            self.state = GameState::ToMove(side);
            return MoveOutcome::Rejected(RejectReason::NotAcknowledged);
        }

        let mut promoted = pending.before;
        apply_move(&mut promoted, &token);
        self.commit(side, token, MoveKind::Promotion, promoted);
        self.after_human_move(side).await;
        MoveOutcome::Accepted
    }

    /// Ask the engine for its move and apply it.
    ///
    /// Runs automatically after each human move; call it directly to retry a
    /// stalled turn. On error the board and history are unchanged.
    pub async fn play_engine_turn(&mut self) -> Result<(), EngineTurnError> {
        let side = match self.state {
            GameState::Terminal(_) => return Err(EngineTurnError::GameOver),
            GameState::ToMove(side) if side == self.settings.engine_side() => side,
            GameState::ToMove(_) | GameState::AwaitingPromotionChoice { .. } => {
                return Err(EngineTurnError::NotEngineTurn);
            }
        };

        let position = self.history.position_command();
        let go = protocol::go_depth(self.settings.depth());
        let response = self
            .session
            .request(
                &[&position, &go],
                &[Sentinel::BestMove],
                self.settings.timeouts().search(),
            )
            .await;

        let text = match best_move(response.text()) {
            Some(BestMove::Move(text)) => text,
            Some(BestMove::NoMove) => {
                // The probe missed the end of the game; the search did not.
                let outcome = match probe_verdict(response.text()) {
                    ProbeVerdict::Checkmate => Outcome::win_for(side.opposite()),
                    ProbeVerdict::Stalemate | ProbeVerdict::Ongoing => Outcome::Draw,
                };
                self.finish(outcome);
                return Err(EngineTurnError::NoMove);
            }
            None => {
                self.resync().await;
                return Err(EngineTurnError::Timeout);
            }
        };

        let malformed = |reason: String| EngineTurnError::Malformed {
            token: text.to_string(),
            reason,
        };
        let mut token = text
            .parse::<MoveToken>()
            .map_err(|e| malformed(e.to_string()))?;
        let mover = self
            .board
            .piece_at(token.from())
            .filter(|p| p.side() == side)
            .ok_or_else(|| malformed(format!("no {side} piece on {}", token.from())))?;
        if token.promotion().is_none() && detects_promotion(mover, token.to()) {
            token = token.with_promotion(PieceKind::Queen);
        }

        let mut next = self.board.clone();
        let applied = apply_move(&mut next, &token)
            .ok_or_else(|| malformed(format!("{} is empty", token.from())))?;

        tracing::info!("Engine plays {token}");
        self.commit(side, token, applied.kind(), next);
        self.check_game_end(side).await;
        Ok(())
    }

    /// Replace the engine session and reset to the initial position.
    pub async fn restart(&mut self, session: EngineSession) {
        let mut old = std::mem::replace(&mut self.session, session);
        old.close().await;

        self.board = Board::initial();
        self.history = MoveHistory::new();
        self.state = GameState::ToMove(Side::White);
        self.pending = None;
        self.events.clear();
        self.open_game().await;
    }

    /// Close the engine session.
    pub async fn shutdown(mut self) {
        self.session.close().await;
    }

    /// A `readyok` that misses the deadline is flushed by a resync before
    /// returning, so it cannot acknowledge the next candidate.
    async fn acknowledge(&mut self, token: &MoveToken) -> bool {
        let position = self.history.position_command_with(token);
        let acknowledged = self
            .session
            .request(
                &[&position, IS_READY],
                &[Sentinel::ReadyOk],
                self.settings.timeouts().accept(),
            )
            .await
            .is_complete();
        if !acknowledged {
            tracing::debug!("Engine did not acknowledge {token}");
            self.resync().await;
        }
        acknowledged
    }

    fn commit(&mut self, side: Side, token: MoveToken, kind: MoveKind, board: Board) {
        self.board = board;
        self.history.push(token);
        self.events
            .push_back(GameEvent::Move(MoveEvent::new(side, token, kind)));
        self.state = GameState::ToMove(side.opposite());
        tracing::debug!("Committed {side} {token} ({kind:?})");
    }

    async fn after_human_move(&mut self, side: Side) {
        self.check_game_end(side).await;
        if self.state == GameState::ToMove(self.settings.engine_side())
            && let Err(e) = self.play_engine_turn().await
        {
            tracing::warn!("Engine turn stalled: {e}");
        }
    }

    /// Probe the position after `mover`'s move for mate or stalemate.
    ///
    /// A probe that times out leaves the game running.
    async fn check_game_end(&mut self, mover: Side) {
        let position = self.history.position_command();
        let go = protocol::go_depth(PROBE_DEPTH);
        let response = self
            .session
            .request(
                &[&position, &go],
                &[Sentinel::BestMove],
                self.settings.timeouts().probe(),
            )
            .await;

        match probe_verdict(response.text()) {
            ProbeVerdict::Checkmate => self.finish(Outcome::win_for(mover)),
            ProbeVerdict::Stalemate => self.finish(Outcome::Draw),
            ProbeVerdict::Ongoing => {
                if !response.is_complete() {
                    tracing::debug!("End-of-game probe timed out, continuing");
                    self.resync().await;
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        tracing::info!("Game over: {outcome}");
        self.state = GameState::Terminal(outcome);
        self.events.push_back(GameEvent::GameOver(outcome));
    }

    /// Stop a search that outlived its request and wait out any late
    /// `readyok`, so neither answers the next request.
    async fn resync(&mut self) {
        let timeout = self.settings.timeouts().accept();
        if !self.session.resync(timeout).await {
            tracing::debug!("Resync unanswered, continuing");
        }
    }
}
