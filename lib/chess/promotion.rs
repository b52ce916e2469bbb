use super::Role;
use derive_more::Display;
use shakmaty as sm;
use test_strategy::Arbitrary;
use vampirc_uci::UciPiece;

/// A promotion specifier.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
pub enum Promotion {
    #[display(fmt = "")]
    None,
    #[display(fmt = "n")]
    Knight,
    #[display(fmt = "b")]
    Bishop,
    #[display(fmt = "r")]
    Rook,
    #[display(fmt = "q")]
    Queen,
}

impl From<Promotion> for Option<Role> {
    fn from(p: Promotion) -> Self {
        match p {
            Promotion::None => None,
            Promotion::Knight => Some(Role::Knight),
            Promotion::Bishop => Some(Role::Bishop),
            Promotion::Rook => Some(Role::Rook),
            Promotion::Queen => Some(Role::Queen),
        }
    }
}

#[doc(hidden)]
impl From<Option<UciPiece>> for Promotion {
    fn from(p: Option<UciPiece>) -> Self {
        match p {
            None => Promotion::None,
            Some(UciPiece::Knight) => Promotion::Knight,
            Some(UciPiece::Bishop) => Promotion::Bishop,
            Some(UciPiece::Rook) => Promotion::Rook,
            Some(UciPiece::Queen) => Promotion::Queen,
            Some(p) => panic!("unexpected {:?}", p),
        }
    }
}

#[doc(hidden)]
impl From<Promotion> for Option<UciPiece> {
    fn from(p: Promotion) -> Self {
        match p {
            Promotion::None => None,
            Promotion::Knight => Some(UciPiece::Knight),
            Promotion::Bishop => Some(UciPiece::Bishop),
            Promotion::Rook => Some(UciPiece::Rook),
            Promotion::Queen => Some(UciPiece::Queen),
        }
    }
}

#[doc(hidden)]
impl From<Option<sm::Role>> for Promotion {
    fn from(r: Option<sm::Role>) -> Self {
        match r {
            None => Promotion::None,
            Some(sm::Role::Knight) => Promotion::Knight,
            Some(sm::Role::Bishop) => Promotion::Bishop,
            Some(sm::Role::Rook) => Promotion::Rook,
            Some(sm::Role::Queen) => Promotion::Queen,
            Some(r) => panic!("unexpected {:?}", r),
        }
    }
}

#[doc(hidden)]
impl From<Promotion> for Option<sm::Role> {
    fn from(p: Promotion) -> Self {
        Option::<Role>::from(p).map(Into::into)
    }
}
