use crate::chess::{Move, Position};
use crate::util::{Build, Process};
use anyhow::Error as Anyhow;
use async_trait::async_trait;
use derive_more::{Display, Error, From};
use proptest::prelude::Just;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};
use test_strategy::Arbitrary;

mod uci;

pub use uci::*;

/// Trait for types that know how to play chess.
#[cfg_attr(test, mockall::automock(type Error = String;))]
#[async_trait]
pub trait Play {
    /// The reason why a [`Move`] could not be played.
    type Error: fmt::Display;

    /// Play the next turn.
    async fn play(&mut self, pos: &Position) -> Result<Move, Self::Error>;
}

/// Configuration for the engine's time budget.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Arbitrary, Deserialize, Serialize)]
#[display(fmt = "{}", "ron::ser::to_string(self).unwrap()")]
#[serde(deny_unknown_fields)]
pub struct Limits {
    /// The maximum amount of time the engine may spend on a move.
    #[strategy(Just(Duration::MAX))]
    #[serde(with = "humantime_serde")]
    pub time: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            time: Duration::from_millis(100),
        }
    }
}

/// The reason why parsing [`Limits`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse search limits")]
pub struct ParseLimitsError(ron::de::SpannedError);

impl FromStr for Limits {
    type Err = ParseLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

/// The reason why the [`Engine`] failed to [`Play`].
#[derive(Debug, Display, Error, From)]
pub enum EngineError {
    Uci(UciError),

    #[cfg(test)]
    Mock(#[error(not(source))] String),
}

/// A generic computer controlled player.
#[derive(From)]
pub enum Engine {
    Uci(Uci<Process>),

    #[cfg(test)]
    Mock(MockPlay),
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Uci(e) => fmt::Debug::fmt(e, f),

            #[cfg(test)]
            Engine::Mock(_) => f.write_str("Mock"),
        }
    }
}

#[async_trait]
impl Play for Engine {
    type Error = EngineError;

    async fn play(&mut self, pos: &Position) -> Result<Move, Self::Error> {
        match self {
            Engine::Uci(e) => Ok(e.play(pos).await?),

            #[cfg(test)]
            Engine::Mock(e) => Ok(e.play(pos).await?),
        }
    }
}

/// Runtime configuration for an [`Engine`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Arbitrary, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "lowercase")]
pub enum EngineBuilder {
    #[display(fmt = "{}", "ron::ser::to_string(self).unwrap()")]
    Uci(
        String,
        #[serde(default)] Limits,
        #[serde(default)] UciOptions,
    ),

    #[cfg(test)]
    #[display(fmt = "{}", "ron::ser::to_string(self).unwrap()")]
    Mock(),
}

/// The reason why parsing [`EngineBuilder`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse engine configuration")]
pub struct ParseBuilderError(ron::de::SpannedError);

impl FromStr for EngineBuilder {
    type Err = ParseBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

impl Build for EngineBuilder {
    type Output = Engine;

    fn build(self) -> Result<Self::Output, Anyhow> {
        match self {
            EngineBuilder::Uci(path, limits, options) => {
                let io = Process::spawn(&path)?;
                Ok(Uci::with_config(io, limits, options).into())
            }

            #[cfg(test)]
            EngineBuilder::Mock() => Ok(MockPlay::new().into()),
        }
    }
}
