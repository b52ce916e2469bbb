use super::{Color, Role};
use shakmaty as sm;
use test_strategy::Arbitrary;

/// A chess piece of a certain color.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
pub struct Piece {
    /// The [`Color`] of the side it belongs to.
    pub color: Color,

    /// Its [`Role`].
    pub role: Role,
}

#[doc(hidden)]
impl From<sm::Piece> for Piece {
    fn from(p: sm::Piece) -> Self {
        Piece {
            color: p.color.into(),
            role: p.role.into(),
        }
    }
}

#[doc(hidden)]
impl From<Piece> for sm::Piece {
    fn from(p: Piece) -> Self {
        sm::Piece {
            color: p.color.into(),
            role: p.role.into(),
        }
    }
}
