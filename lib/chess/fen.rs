use super::Position;
use derive_more::{Display, Error, From};
use proptest::prelude::*;
use shakmaty as sm;
use std::str::FromStr;
use test_strategy::Arbitrary;

/// A representation of the [Forsyth–Edwards Notation].
///
/// [Forsyth–Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Debug, Display, Default, Clone, Eq, PartialEq, Hash, Arbitrary)]
#[display(fmt = "{}", _0)]
pub struct Fen(
    #[strategy(any::<Position>().prop_map(|pos| sm::fen::Fen(pos.into())))] sm::fen::Fen,
);

/// The reason why the string is not valid FEN.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse FEN")]
pub struct ParseFenError(#[error(not(source))] sm::fen::ParseFenError);

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Fen(s.parse()?))
    }
}

impl From<Position> for Fen {
    fn from(pos: Position) -> Self {
        Fen(sm::fen::Fen(pos.into()))
    }
}

/// The reason why the position represented by the FEN string is illegal.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum IllegalPosition {
    #[display(fmt = "at least one side has no king")]
    MissingKing,
    #[display(fmt = "at least one side has multiple kings")]
    TooManyKings,
    #[display(fmt = "there are pawns on the back-rank")]
    PawnsOnBackRank,
    #[display(fmt = "the player in check is not to move")]
    OppositeCheck,
    #[display(fmt = "no sequence of legal moves can reach this position")]
    Other,
}

#[doc(hidden)]
impl From<sm::PositionError<sm::Chess>> for IllegalPosition {
    fn from(e: sm::PositionError<sm::Chess>) -> Self {
        let kinds = e.kinds();

        if kinds.contains(sm::PositionErrorKinds::MISSING_KING) {
            IllegalPosition::MissingKing
        } else if kinds.contains(sm::PositionErrorKinds::TOO_MANY_KINGS) {
            IllegalPosition::TooManyKings
        } else if kinds.contains(sm::PositionErrorKinds::PAWNS_ON_BACKRANK) {
            IllegalPosition::PawnsOnBackRank
        } else if kinds.contains(sm::PositionErrorKinds::OPPOSITE_CHECK) {
            IllegalPosition::OppositeCheck
        } else {
            IllegalPosition::Other
        }
    }
}

#[doc(hidden)]
impl From<Fen> for sm::Setup {
    fn from(fen: Fen) -> Self {
        fen.0 .0
    }
}

impl TryFrom<Fen> for Position {
    type Error = IllegalPosition;

    fn try_from(fen: Fen) -> Result<Self, Self::Error> {
        Ok(Position::from(
            sm::Setup::from(fen).position::<sm::Chess>(sm::CastlingMode::Standard)?,
        ))
    }
}
