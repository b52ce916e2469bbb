use derive_more::{Display, Error};
use proptest::sample::select;
use shakmaty as sm;
use std::{convert::TryFrom, str::FromStr};
use test_strategy::Arbitrary;

/// A column of the chess board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Arbitrary)]
#[display(fmt = "{}", _0)]
pub struct File(#[strategy(select(sm::File::ALL.as_ref()))] sm::File);

impl File {
    /// Constructs [`File`] from index.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not in the range (0..=7).
    pub fn from_index(i: u8) -> Self {
        Self::try_from(i).unwrap()
    }

    /// This file's index in the range (0..=7).
    pub fn index(&self) -> u8 {
        self.0.into()
    }

    /// An iterator over all files ordered by [index][`File::index`].
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        sm::File::ALL.into_iter().map(File)
    }
}

/// The reason why converting [`File`] from a character failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected lower case letter in the range `('a'..='h')`")]
pub struct InvalidFile;

impl TryFrom<char> for File {
    type Error = InvalidFile;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        sm::File::from_char(c).map(File).ok_or(InvalidFile)
    }
}

impl From<File> for char {
    fn from(f: File) -> char {
        f.0.char()
    }
}

/// The reason why converting [`File`] from an index failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected integer in the range `(0..=7)`")]
pub struct FileOutOfRange;

impl TryFrom<u8> for File {
    type Error = FileOutOfRange;

    fn try_from(i: u8) -> Result<Self, Self::Error> {
        sm::File::try_from(i).map(File).map_err(|_| FileOutOfRange)
    }
}

impl FromStr for File {
    type Err = InvalidFile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().collect::<Vec<_>>()[..] {
            [c] => c.try_into(),
            _ => Err(InvalidFile),
        }
    }
}

#[doc(hidden)]
impl From<sm::File> for File {
    fn from(f: sm::File) -> Self {
        File(f)
    }
}

#[doc(hidden)]
impl From<File> for sm::File {
    fn from(f: File) -> Self {
        f.0
    }
}
