use crate::chess::{Color, IllegalMove, Move, Outcome, Position};

/// Trait for types that implement the rules of chess.
///
/// The session controller never reasons about chess itself; everything it
/// needs to know about a [`Position`] goes through this capability.
#[cfg_attr(test, mockall::automock)]
pub trait Rules {
    /// The legal [`Move`]s in `pos`.
    fn moves(&self, pos: &Position) -> Vec<Move>;

    /// Whether `m` is legal in `pos`.
    fn is_legal(&self, pos: &Position, m: Move) -> bool;

    /// The [`Position`] that results from playing `m` in `pos`.
    fn apply(&self, pos: &Position, m: Move) -> Result<Position, IllegalMove>;

    /// The [`Outcome`] if the game has ended.
    fn outcome(&self, pos: &Position) -> Option<Outcome>;

    /// The side to move in `pos`.
    fn turn(&self, pos: &Position) -> Color;
}

/// The standard rules of chess.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Standard;

impl Rules for Standard {
    fn moves(&self, pos: &Position) -> Vec<Move> {
        pos.moves().map(|(m, _)| m).collect()
    }

    fn is_legal(&self, pos: &Position, m: Move) -> bool {
        pos.clone().make(m).is_ok()
    }

    fn apply(&self, pos: &Position, m: Move) -> Result<Position, IllegalMove> {
        let mut next = pos.clone();
        next.make(m)?;
        Ok(next)
    }

    fn outcome(&self, pos: &Position) -> Option<Outcome> {
        if pos.is_checkmate() {
            Some(Outcome::Checkmate(!pos.turn()))
        } else if pos.is_stalemate() {
            Some(Outcome::Stalemate)
        } else if pos.is_material_insufficient() {
            Some(Outcome::DrawByInsufficientMaterial)
        } else if pos.halfmoves() >= 150 {
            Some(Outcome::DrawBy75MoveRule)
        } else {
            None
        }
    }

    fn turn(&self, pos: &Position) -> Color {
        pos.turn()
    }
}
