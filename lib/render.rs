use crate::chess::{File, Move, Piece, Position, Rank, Square};
use crate::session::Selection;
use derive_more::Display;
use test_strategy::Arbitrary;

/// A 24-bit RGB color.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
#[display(fmt = "#{:02X}{:02X}{:02X}", _0, _1, _2)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The color palette of the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
pub struct Theme {
    /// The background of light squares.
    pub light: Rgb,

    /// The background of dark squares.
    pub dark: Rgb,

    /// The background of the selected square.
    pub selected: Rgb,

    /// The background of light squares touched by the last move.
    pub last_move_light: Rgb,

    /// The background of dark squares touched by the last move.
    pub last_move_dark: Rgb,

    /// The destination marker.
    pub marker: Rgb,

    /// The background of a king in check, not currently applied.
    pub check: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            light: Rgb(0xF0, 0xD9, 0xB5),
            dark: Rgb(0xB5, 0x88, 0x63),
            selected: Rgb(0x6C, 0xB0, 0xF5),
            last_move_light: Rgb(0xFF, 0xD4, 0x74),
            last_move_dark: Rgb(0xC1, 0xA0, 0x58),
            marker: Rgb(0x8B, 0x68, 0x48),
            check: Rgb(0xFF, 0x54, 0x54),
        }
    }
}

/// The draw plan for a single square.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Tile {
    /// The background color.
    pub background: Rgb,

    /// The piece on this square, if any.
    pub piece: Option<Piece>,

    /// Whether to draw a destination marker.
    pub marker: bool,
}

/// A complete draw plan for the board.
///
/// Recomputed in full from the session state after every mutation, tiles are
/// never patched incrementally.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Frame([Tile; 64]);

impl Frame {
    /// Projects the session state onto a draw plan.
    pub fn new(pos: &Position, selection: &Selection, last: Option<Move>, theme: &Theme) -> Self {
        Frame(std::array::from_fn(|i| {
            let file = File::from_index(i as u8 % 8);
            let rank = Rank::from_index(i as u8 / 8);
            let s = Square::new(file, rank);

            let light = (file.index() + rank.index()) % 2 == 0;

            let background = if selection.square() == Some(s) {
                theme.selected
            } else if last.map_or(false, |m| m.whence() == s || m.whither() == s) {
                if light {
                    theme.last_move_light
                } else {
                    theme.last_move_dark
                }
            } else if light {
                theme.light
            } else {
                theme.dark
            };

            Tile {
                background,
                piece: pos.piece_at(s),
                marker: selection.destinations().contains(&s),
            }
        }))
    }

    /// The [`Tile`] on `s`.
    pub fn tile(&self, s: Square) -> &Tile {
        &self.0[(s.rank().index() * 8 + s.file().index()) as usize]
    }

    /// An iterator over all tiles and their squares.
    pub fn iter(&self) -> impl Iterator<Item = (Square, &Tile)> {
        self.0.iter().enumerate().map(|(i, t)| {
            let file = File::from_index(i as u8 % 8);
            let rank = Rank::from_index(i as u8 / 8);
            (Square::new(file, rank), t)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Promotion;
    use test_strategy::proptest;

    #[proptest]
    fn background_forms_a_checkerboard_absent_selection_and_last_move(
        pos: Position,
        theme: Theme,
        s: Square,
    ) {
        let frame = Frame::new(&pos, &Selection::Empty, None, &theme);

        let expected = if (s.file().index() + s.rank().index()) % 2 == 0 {
            theme.light
        } else {
            theme.dark
        };

        assert_eq!(frame.tile(s).background, expected);
    }

    #[proptest]
    fn every_square_projects_the_piece_on_it(pos: Position, s: Square) {
        let frame = Frame::new(&pos, &Selection::Empty, None, &Theme::default());
        assert_eq!(frame.tile(s).piece, pos.piece_at(s));
    }

    #[proptest]
    fn the_selected_square_is_highlighted(pos: Position, theme: Theme, s: Square) {
        let selection = Selection::Selected(s, Vec::new());
        let frame = Frame::new(&pos, &selection, None, &theme);
        assert_eq!(frame.tile(s).background, theme.selected);
    }

    #[proptest]
    fn destination_squares_are_marked(pos: Position, s: Square, ds: Vec<Square>) {
        let selection = Selection::Selected(s, ds.clone());
        let frame = Frame::new(&pos, &selection, None, &Theme::default());

        for d in ds {
            assert!(frame.tile(d).marker);
        }
    }

    #[proptest]
    fn the_last_move_is_highlighted_by_square_parity(
        pos: Position,
        theme: Theme,
        #[filter(#m.whence() != #m.whither())] m: Move,
    ) {
        let frame = Frame::new(&pos, &Selection::Empty, Some(m), &theme);

        for s in [m.whence(), m.whither()] {
            let expected = if (s.file().index() + s.rank().index()) % 2 == 0 {
                theme.last_move_light
            } else {
                theme.last_move_dark
            };

            assert_eq!(frame.tile(s).background, expected);
        }
    }

    #[proptest]
    fn selection_takes_precedence_over_the_last_move(pos: Position, theme: Theme, s: Square) {
        let m = Move::new(s, s, Promotion::None);
        let selection = Selection::Selected(s, Vec::new());
        let frame = Frame::new(&pos, &selection, Some(m), &theme);
        assert_eq!(frame.tile(s).background, theme.selected);
    }

    #[proptest]
    fn unrelated_squares_keep_the_checkerboard_background(
        pos: Position,
        theme: Theme,
        sel: Square,
        #[filter(#s != #sel)] s: Square,
    ) {
        let selection = Selection::Selected(sel, Vec::new());
        let frame = Frame::new(&pos, &selection, None, &theme);

        let expected = if (s.file().index() + s.rank().index()) % 2 == 0 {
            theme.light
        } else {
            theme.dark
        };

        assert_eq!(frame.tile(s).background, expected);
    }
}
