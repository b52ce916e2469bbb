use crate::board;
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::Color;
use lib::play::{Engine, EngineBuilder};
use lib::rules::Standard;
use lib::session::Session;
use lib::util::Build;
use tracing::instrument;

/// An interactive game on a clickable board.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// The engine to play against, e.g. `uci("stockfish")`.
    ///
    /// Both sides are played on the board if omitted.
    #[clap(short, long)]
    engine: Option<EngineBuilder>,

    /// The color controlled by clicks on the board.
    #[clap(short, long, default_value_t = Color::White)]
    color: Color,
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        match self.engine {
            None => board::run(Session::<_, Engine>::new(Standard)).await,
            Some(b) => board::run(Session::vs_engine(Standard, b.build()?, self.color)).await,
        }
    }
}
