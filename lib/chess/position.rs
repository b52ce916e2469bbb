use super::{Color, Fen, Move, Piece, Square};
use derive_more::{Display, Error};
use proptest::{prelude::*, sample::Selector};
use shakmaty as sm;
use test_strategy::Arbitrary;

/// Represents an illegal [`Move`] in a given [`Position`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Arbitrary, Error)]
#[display(fmt = "move `{}` is illegal in position `{}`", _0, _1)]
pub struct IllegalMove(pub Move, pub Position);

/// The current position on the chess board.
///
/// This type guarantees that it only holds positions reachable by a sequence
/// of legal moves from the standard starting position or a legal setup.
#[derive(Debug, Display, Default, Clone, Eq, PartialEq, Hash, Arbitrary)]
#[display(fmt = "{}", "Fen::from(self.clone())")]
pub struct Position(
    #[strategy((0..64usize, any::<Selector>()).prop_map(|(plies, selector)| {
        let mut chess = sm::Chess::default();
        for _ in 0..plies {
            match selector.try_select(sm::Position::legal_moves(&chess)) {
                Some(m) => sm::Position::play_unchecked(&mut chess, &m),
                _ => break,
            }
        }
        chess
    }).no_shrink())]
    sm::Chess,
);

impl Position {
    /// The side to move.
    pub fn turn(&self) -> Color {
        sm::Position::turn(&self.0).into()
    }

    /// The number of halfmoves since the last capture or pawn advance.
    pub fn halfmoves(&self) -> u32 {
        sm::Position::halfmoves(&self.0)
    }

    /// The [`Piece`] on `s`, if any.
    pub fn piece_at(&self, s: Square) -> Option<Piece> {
        sm::Position::board(&self.0)
            .piece_at(s.into())
            .map(Into::into)
    }

    /// Whether this position is a [checkmate].
    ///
    /// [checkmate]: https://www.chessprogramming.org/Checkmate
    pub fn is_checkmate(&self) -> bool {
        sm::Position::is_checkmate(&self.0)
    }

    /// Whether this position is a [stalemate].
    ///
    /// [stalemate]: https://www.chessprogramming.org/Stalemate
    pub fn is_stalemate(&self) -> bool {
        sm::Position::is_stalemate(&self.0)
    }

    /// Whether this position has [insufficient material].
    ///
    /// [insufficient material]: https://www.chessprogramming.org/Material#InsufficientMaterial
    pub fn is_material_insufficient(&self) -> bool {
        sm::Position::is_insufficient_material(&self.0)
    }

    /// An iterator over the legal [`Move`]s in this position, annotated with
    /// the [`Position`] they lead to.
    pub fn moves(&self) -> impl ExactSizeIterator<Item = (Move, Self)> {
        let legals = sm::Position::legal_moves(&self.0);
        let pos = self.0.clone();
        legals.into_iter().map(move |vm| {
            let mut next = pos.clone();
            sm::Position::play_unchecked(&mut next, &vm);
            (sm::uci::Uci::from_standard(&vm).into(), next.into())
        })
    }

    /// Plays `m` if legal in this position.
    pub fn make(&mut self, m: Move) -> Result<(), IllegalMove> {
        match sm::uci::Uci::to_move(&m.into(), &self.0) {
            Ok(vm) if sm::Position::is_legal(&self.0, &vm) => {
                sm::Position::play_unchecked(&mut self.0, &vm);
                Ok(())
            }

            _ => Err(IllegalMove(m, self.clone())),
        }
    }
}

#[doc(hidden)]
impl From<sm::Chess> for Position {
    fn from(chess: sm::Chess) -> Self {
        Position(chess)
    }
}

#[doc(hidden)]
impl From<Position> for sm::Chess {
    fn from(pos: Position) -> Self {
        pos.0
    }
}

#[doc(hidden)]
impl From<Position> for sm::Setup {
    fn from(pos: Position) -> Self {
        sm::Position::into_setup(pos.0, sm::EnPassantMode::Always)
    }
}

#[doc(hidden)]
impl AsRef<sm::Chess> for Position {
    fn as_ref(&self) -> &sm::Chess {
        &self.0
    }
}
