use super::{File, InvalidFile, InvalidRank, Rank};
use derive_more::{Display, Error, From};
use shakmaty as sm;
use std::str::FromStr;
use test_strategy::Arbitrary;
use vampirc_uci::UciSquare;

/// A square of the chess board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
#[display(fmt = "{}{}", file, rank)]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    pub fn new(file: File, rank: Rank) -> Self {
        Square { file, rank }
    }

    /// This square's [`File`].
    pub fn file(&self) -> File {
        self.file
    }

    /// This square's [`Rank`].
    pub fn rank(&self) -> Rank {
        self.rank
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display(fmt = "failed to parse square; invalid file")]
    InvalidFile(InvalidFile),
    #[display(fmt = "failed to parse square; invalid rank")]
    InvalidRank(InvalidRank),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);

        Ok(Square {
            file: s[..i].parse()?,
            rank: s[i..].parse()?,
        })
    }
}

#[doc(hidden)]
impl From<sm::Square> for Square {
    fn from(s: sm::Square) -> Self {
        Square {
            file: s.file().into(),
            rank: s.rank().into(),
        }
    }
}

#[doc(hidden)]
impl From<Square> for sm::Square {
    fn from(s: Square) -> Self {
        sm::Square::from_coords(s.file.into(), s.rank.into())
    }
}

#[doc(hidden)]
impl From<UciSquare> for Square {
    fn from(s: UciSquare) -> Self {
        match (File::try_from(s.file), Rank::try_from(s.rank.wrapping_sub(1))) {
            (Ok(file), Ok(rank)) => Square { file, rank },
            _ => panic!("unexpected {:?}", s),
        }
    }
}

#[doc(hidden)]
impl From<Square> for UciSquare {
    fn from(s: Square) -> Self {
        UciSquare {
            file: s.file.into(),
            rank: s.rank.index() + 1,
        }
    }
}
