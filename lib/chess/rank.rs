use derive_more::{Display, Error};
use proptest::sample::select;
use shakmaty as sm;
use std::{convert::TryFrom, str::FromStr};
use test_strategy::Arbitrary;

/// A row of the chess board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
#[display(fmt = "{}", _0)]
pub struct Rank(#[strategy(select(sm::Rank::ALL.as_ref()))] sm::Rank);

impl Rank {
    /// Constructs [`Rank`] from index.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range (0..=7).
    pub fn from_index(i: u8) -> Self {
        Self::try_from(i).unwrap()
    }

    /// This rank's index in the range (0..=7).
    pub fn index(&self) -> u8 {
        self.0.into()
    }

    /// An iterator over all ranks ordered by [index][`Rank::index`].
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        sm::Rank::ALL.into_iter().map(Rank)
    }
}

/// The reason why converting [`Rank`] from a character failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected digit in the range `('1'..='8')`")]
pub struct InvalidRank;

impl TryFrom<char> for Rank {
    type Error = InvalidRank;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        sm::Rank::from_char(c).map(Rank).ok_or(InvalidRank)
    }
}

impl From<Rank> for char {
    fn from(r: Rank) -> char {
        r.0.char()
    }
}

/// The reason why converting [`Rank`] from an index failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected integer in the range `(0..=7)`")]
pub struct RankOutOfRange;

impl TryFrom<u8> for Rank {
    type Error = RankOutOfRange;

    fn try_from(i: u8) -> Result<Self, Self::Error> {
        sm::Rank::try_from(i).map(Rank).map_err(|_| RankOutOfRange)
    }
}

impl FromStr for Rank {
    type Err = InvalidRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().collect::<Vec<_>>()[..] {
            [c] => c.try_into(),
            _ => Err(InvalidRank),
        }
    }
}

#[doc(hidden)]
impl From<sm::Rank> for Rank {
    fn from(r: sm::Rank) -> Self {
        Rank(r)
    }
}

#[doc(hidden)]
impl From<Rank> for sm::Rank {
    fn from(r: Rank) -> Self {
        r.0
    }
}
