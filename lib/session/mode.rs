use crate::chess::Color;
use derive_more::Display;
use test_strategy::Arbitrary;

/// The kind of interactive session.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
pub enum Mode {
    /// Both sides are controlled by clicks on the board.
    #[default]
    #[display(fmt = "human vs human")]
    HumanVsHuman,

    /// One side is controlled by an engine, the other by clicks on the board.
    #[display(fmt = "human vs engine as the {} player", _0)]
    HumanVsEngine(Color),

    /// The position was reconstructed from a game record.
    #[display(fmt = "replay")]
    Replay,
}

impl Mode {
    /// The [`Color`] controlled by the engine, if any.
    pub fn engine(&self) -> Option<Color> {
        match self {
            Mode::HumanVsEngine(human) => Some(!*human),
            _ => None,
        }
    }
}
