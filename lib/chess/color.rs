use derive_more::{Display, Error};
use shakmaty as sm;
use std::{ops::Not, str::FromStr};
use test_strategy::Arbitrary;

/// The color of a chess [`Piece`][`super::Piece`].
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
pub enum Color {
    #[default]
    #[display(fmt = "white")]
    White,
    #[display(fmt = "black")]
    Black,
}

/// The reason why parsing [`Color`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "expected either `white` or `black`")]
pub struct ParseColorError;

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            _ => Err(ParseColorError),
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[doc(hidden)]
impl From<sm::Color> for Color {
    fn from(c: sm::Color) -> Self {
        match c {
            sm::Color::White => Color::White,
            sm::Color::Black => Color::Black,
        }
    }
}

#[doc(hidden)]
impl From<Color> for sm::Color {
    fn from(c: Color) -> Self {
        match c {
            Color::White => sm::Color::White,
            Color::Black => sm::Color::Black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn color_implements_not_operator(c: Color) {
        assert_eq!(!!c, c);
    }

    #[proptest]
    fn color_has_an_equivalent_shakmaty_representation(c: Color) {
        assert_eq!(Color::from(sm::Color::from(c)), c);
    }

    #[proptest]
    fn parsing_printed_color_is_an_identity(c: Color) {
        assert_eq!(c.to_string().parse(), Ok(c));
    }

    #[proptest]
    fn parsing_color_fails_for_anything_else(
        #[filter(!["white", "black"].contains(&#s.as_str()))] s: String,
    ) {
        assert_eq!(s.parse::<Color>(), Err(ParseColorError));
    }
}
