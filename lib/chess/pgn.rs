use super::Move;
use derive_more::{Display, Error, From};
use pgn_reader::{BufferedReader, Skip, Visitor};
use shakmaty as sm;
use std::{io, io::Read, mem::take};
use tracing::instrument;

/// The reason why reading the mainline of a game record failed.
#[derive(Debug, Display, Error, From)]
pub enum ReadPgnError {
    #[display(fmt = "failed to read the game record")]
    Io(io::Error),

    #[display(fmt = "the source contains no game")]
    Empty,

    #[display(fmt = "the game record contains an invalid move `{}`", _0)]
    InvalidSan(#[error(not(source))] String),
}

/// Collects the mainline of a game, skipping variations.
#[derive(Default)]
struct Mainline {
    pos: sm::Chess,
    moves: Vec<Move>,
    defect: Option<String>,
}

impl Visitor for Mainline {
    type Result = Result<Vec<Move>, ReadPgnError>;

    fn san(&mut self, sp: sm::san::SanPlus) {
        if self.defect.is_some() {
            return;
        }

        match sp.san.to_move(&self.pos) {
            Err(_) => self.defect = Some(sp.san.to_string()),
            Ok(vm) => {
                self.moves.push(sm::uci::Uci::from_standard(&vm).into());
                sm::Position::play_unchecked(&mut self.pos, &vm);
            }
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        self.pos = sm::Chess::default();

        match self.defect.take() {
            Some(san) => Err(ReadPgnError::InvalidSan(san)),
            None => Ok(take(&mut self.moves)),
        }
    }
}

/// Reads the mainline of the first game in `source`.
///
/// The moves are implied to start from the standard starting position.
#[instrument(level = "trace", skip(source), err)]
pub fn read_mainline<R: Read>(source: R) -> Result<Vec<Move>, ReadPgnError> {
    BufferedReader::new(source)
        .read_game(&mut Mainline::default())?
        .ok_or(ReadPgnError::Empty)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Position, Promotion};
    use test_strategy::proptest;

    #[proptest]
    fn read_mainline_returns_the_moves_of_the_first_game() {
        let pgn = "[Event \"?\"]\n\n1. e4 e5 2. Nf3 Nc6 *";

        assert_eq!(
            read_mainline(pgn.as_bytes())?,
            ["e2e4", "e7e5", "g1f3", "b8c6"]
                .into_iter()
                .map(|m| {
                    let (w, t) = m.split_at(2);
                    Move::new(w.parse().unwrap(), t.parse().unwrap(), Promotion::None)
                })
                .collect::<Vec<_>>()
        );
    }

    #[proptest]
    fn read_mainline_skips_variations() {
        let pgn = "1. e4 (1. d4 d5) 1... e5 *";
        assert_eq!(read_mainline(pgn.as_bytes())?.len(), 2);
    }

    #[proptest]
    fn moves_replay_to_a_legal_position() {
        let pgn = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *";
        let mut pos = Position::default();

        for m in read_mainline(pgn.as_bytes())? {
            pos.make(m)?;
        }

        assert_eq!(pos.turn(), crate::chess::Color::White);
    }

    #[proptest]
    fn reading_an_empty_source_fails() {
        assert!(matches!(read_mainline(&b""[..]), Err(ReadPgnError::Empty)));
    }

    #[proptest]
    fn reading_an_illegal_mainline_fails() {
        let pgn = "1. e5 *";

        assert!(matches!(
            read_mainline(pgn.as_bytes()),
            Err(ReadPgnError::InvalidSan(_))
        ));
    }
}
