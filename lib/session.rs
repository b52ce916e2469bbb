use crate::chess::{Color, IllegalMove, Move, Outcome, Position, Promotion, Role, Square};
use crate::play::{Engine, Play};
use crate::rules::Rules;
use crate::util::Trigger;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{instrument, warn};

mod mode;
mod selection;

pub use mode::*;
pub use selection::*;

/// An interactive chess session driven by clicks on the board.
///
/// The session owns the position, the in-session move history, the selection,
/// and the engine connection, if any. All of chess is delegated to `R`.
#[derive(Debug)]
pub struct Session<R, E = Engine> {
    rules: R,
    engine: Option<E>,
    mode: Mode,
    pos: Position,
    history: Vec<Move>,
    selection: Selection,
    pending: Option<Instant>,
    alive: Trigger,
}

impl<R: Rules, E: Play> Session<R, E> {
    #[cfg(test)]
    const PACE: Duration = Duration::from_millis(0);

    #[cfg(not(test))]
    const PACE: Duration = Duration::from_millis(200);

    /// Starts a session in which both sides are played by clicks on the board.
    pub fn new(rules: R) -> Self {
        Session {
            rules,
            engine: None,
            mode: Mode::HumanVsHuman,
            pos: Position::default(),
            history: Vec::new(),
            selection: Selection::Empty,
            pending: None,
            alive: Trigger::armed(),
        }
    }

    /// Starts a session against `engine`, with the human playing `color`.
    pub fn vs_engine(rules: R, engine: E, color: Color) -> Self {
        let mut session = Session::new(rules);
        session.engine = Some(engine);
        session.mode = Mode::HumanVsEngine(color);

        if session.is_engine_turn() {
            session.pending = Some(Instant::now() + Self::PACE);
        }

        session
    }

    /// Starts a session at the position reached by replaying `moves` from the
    /// standard starting position.
    ///
    /// The in-session history starts empty, the replayed moves are not
    /// eligible for last-move highlighting.
    pub fn replay<I: IntoIterator<Item = Move>>(rules: R, moves: I) -> Result<Self, IllegalMove> {
        let mut session = Session::new(rules);
        session.mode = Mode::Replay;

        for m in moves {
            session.pos = session.rules.apply(&session.pos, m)?;
        }

        Ok(session)
    }

    /// The current [`Position`].
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// The [`Move`]s applied during this session, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The most recently applied [`Move`], if any.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// The current [`Selection`].
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The session's [`Mode`].
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The [`Outcome`] if the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.rules.outcome(&self.pos)
    }

    /// Whether an engine turn is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_engine_turn(&self) -> bool {
        self.mode.engine() == Some(self.rules.turn(&self.pos))
    }

    fn promotion(&self, whence: Square, whither: Square) -> Promotion {
        match self.pos.piece_at(whence) {
            Some(p) if p.role == Role::Pawn && matches!(whither.rank().index(), 0 | 7) => {
                Promotion::Queen
            }

            _ => Promotion::None,
        }
    }

    fn select(&mut self, s: Square) {
        if self.is_engine_turn() || self.pending.is_some() {
            return;
        }

        match self.pos.piece_at(s) {
            Some(p) if p.color == self.rules.turn(&self.pos) => {
                let mut dests: Vec<_> = self
                    .rules
                    .moves(&self.pos)
                    .into_iter()
                    .filter(|m| m.whence() == s)
                    .map(|m| m.whither())
                    .collect();

                dests.sort();
                dests.dedup();

                self.selection = Selection::Selected(s, dests);
            }

            _ => {}
        }
    }

    fn advance(&mut self, m: Move) {
        match self.rules.apply(&self.pos, m) {
            Err(e) => warn!("{}", e),
            Ok(next) => {
                self.pos = next;
                self.history.push(m);

                if self.is_engine_turn() && self.outcome().is_none() {
                    self.pending = Some(Instant::now() + Self::PACE);
                }
            }
        }

        self.selection = Selection::Empty;
    }

    /// Advances the selection state machine in response to a click on `s`.
    #[instrument(level = "trace", skip(self))]
    pub fn click(&mut self, s: Square) {
        if !self.alive.is_armed() {
            return;
        }

        match self.selection.square() {
            Some(cur) if s == cur => self.selection = Selection::Empty,

            Some(cur) => {
                let m = Move::new(cur, s, self.promotion(cur, s));

                if self.rules.is_legal(&self.pos, m) {
                    self.advance(m);
                } else {
                    self.selection = Selection::Empty;
                    self.select(s);
                }
            }

            None => self.select(s),
        }
    }

    /// Completes the scheduled engine turn, if one is due.
    ///
    /// Does nothing if the session was closed, the game ended, or the turn
    /// changed hands in the meantime.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn engine_turn(&mut self) -> Result<(), E::Error> {
        let Some(deadline) = self.pending else {
            return Ok(());
        };

        sleep_until(deadline).await;
        self.pending = None;

        if !self.alive.is_armed() || self.outcome().is_some() || !self.is_engine_turn() {
            return Ok(());
        }

        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };

        let m = engine.play(&self.pos).await?;

        match self.rules.apply(&self.pos, m) {
            Err(e) => warn!("{}", e),
            Ok(next) => {
                self.pos = next;
                self.history.push(m);
            }
        }

        Ok(())
    }

    /// Closes the session.
    ///
    /// Cancels the scheduled engine turn, if any, and terminates the engine
    /// connection. Closing an already closed session does nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn close(&mut self) {
        if self.alive.disarm() {
            self.pending = None;
            self.engine = None;
        }
    }
}

impl<R, E> Drop for Session<R, E> {
    fn drop(&mut self) {
        if self.alive.disarm() {
            self.pending = None;
            self.engine = None;
        }
    }
}
