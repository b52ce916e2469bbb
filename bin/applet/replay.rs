use crate::board;
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::chess::pgn::read_mainline;
use lib::play::Engine;
use lib::rules::Standard;
use lib::session::Session;
use std::{fs::File, path::PathBuf};
use tracing::instrument;

/// Replays the mainline of a game record and continues it interactively.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Replay {
    /// The file containing the game record.
    pgn: PathBuf,
}

impl Replay {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let file = File::open(&self.pgn)
            .with_context(|| format!("failed to open `{}`", self.pgn.display()))?;

        let moves = read_mainline(file)?;
        let session = Session::<_, Engine>::replay(Standard, moves)?;
        board::run(session).await
    }
}
