use super::{Limits, Play};
use crate::chess::{Move, Position};
use crate::util::Io;
use anyhow::{Context, Error as Anyhow};
use async_trait::async_trait;
use derive_more::{Display, Error, From};
use std::{collections::HashMap, fmt, future::Future, io, pin::Pin};
use tokio::{runtime, task::block_in_place};
use tracing::{error, instrument};
use vampirc_uci::{self as uci, UciFen, UciMessage};

/// Options to forward to the UCI server on startup.
pub type UciOptions = HashMap<String, Option<String>>;

type Handshake<T> = Pin<Box<dyn Future<Output = Result<T, UciError>> + Send + 'static>>;

/// The connection to the UCI server, established on first use.
enum Link<T> {
    Up(T),
    Down(Handshake<T>),
}

impl<T> Link<T> {
    async fn establish(&mut self) -> Result<&mut T, UciError> {
        if let Link::Down(handshake) = self {
            *self = Link::Up(handshake.await?);
        }

        match self {
            Link::Up(io) => Ok(io),
            Link::Down(_) => unreachable!(),
        }
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Up(_) => f.write_str("Link(up)"),
            Link::Down(_) => f.write_str("Link(down)"),
        }
    }
}

/// The reason why a [`Move`] could not be received from the UCI server.
#[derive(Debug, Display, Error, From)]
#[display(fmt = "the UCI server encountered an error")]
pub struct UciError(#[from(forward)] io::Error);

/// A Universal Chess Interface client for a computer controlled player.
#[derive(Debug)]
pub struct Uci<T: Io> {
    link: Link<T>,
    limits: Limits,
}

impl<T: Io + Send + 'static> Uci<T> {
    /// Constructs [`Uci`] with the default [`Limits`].
    pub fn new(io: T) -> Self {
        Self::with_config(io, Limits::default(), UciOptions::new())
    }

    /// Constructs [`Uci`] with some [`Limits`] and [`UciOptions`].
    ///
    /// The handshake with the server is deferred until the first turn.
    pub fn with_config(mut io: T, limits: Limits, options: UciOptions) -> Self {
        Uci {
            limits,
            link: Link::Down(Box::pin(async move {
                io.send(&UciMessage::Uci.to_string()).await?;
                io.flush().await?;

                while !matches!(uci::parse_one(io.recv().await?.trim()), UciMessage::UciOk) {}

                for (name, value) in options {
                    let set_option = UciMessage::SetOption { name, value };
                    io.send(&set_option.to_string()).await?;
                }

                io.send(&UciMessage::UciNewGame.to_string()).await?;
                io.send(&UciMessage::IsReady.to_string()).await?;
                io.flush().await?;

                while !matches!(uci::parse_one(io.recv().await?.trim()), UciMessage::ReadyOk) {}

                Ok(io)
            })),
        }
    }
}

impl<T: Io> Drop for Uci<T> {
    #[instrument(level = "trace", skip(self))]
    fn drop(&mut self) {
        let result: Result<(), Anyhow> = block_in_place(|| {
            runtime::Handle::try_current()?.block_on(async {
                let io = self.link.establish().await?;
                io.send(&UciMessage::Stop.to_string()).await?;
                io.send(&UciMessage::Quit.to_string()).await?;
                io.flush().await?;
                Ok(())
            })
        });

        if let Err(e) = result.context("failed to shut down the uci server") {
            error!("{:?}", e);
        }
    }
}

#[async_trait]
impl<T: Io + Send> Play for Uci<T> {
    type Error = UciError;

    /// Requests the next move from the UCI server.
    #[instrument(level = "debug", skip(self, pos), ret(Display), err, fields(%pos))]
    async fn play(&mut self, pos: &Position) -> Result<Move, Self::Error> {
        let position = UciMessage::Position {
            startpos: false,
            fen: Some(UciFen(pos.to_string())),
            moves: Vec::new(),
        };

        let budget = uci::Duration::from_std(self.limits.time)
            .unwrap_or_else(|_| uci::Duration::max_value());

        let io = self.link.establish().await?;
        io.send(&position.to_string()).await?;
        io.send(&UciMessage::go_movetime(budget).to_string()).await?;
        io.flush().await?;

        loop {
            match uci::parse_one(io.recv().await?.trim()) {
                UciMessage::BestMove { best_move: m, .. } => break Ok(m.into()),
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::MockIo;
    use mockall::Sequence;
    use proptest::prelude::*;
    use test_strategy::proptest;
    use tokio::runtime;

    /// Messages the client is expected to skip over.
    fn chatter() -> impl Strategy<Value = UciMessage> {
        prop_oneof![
            Just(UciMessage::Uci),
            Just(UciMessage::UciNewGame),
            Just(UciMessage::PonderHit),
            any::<(Option<String>, Option<String>)>()
                .prop_map(|(name, author)| UciMessage::Id { name, author }),
            any::<bool>().prop_map(UciMessage::Debug),
        ]
    }

    fn expect_handshake(io: &mut MockIo, seq: &mut Sequence, options: UciOptions) {
        io.expect_send()
            .once()
            .in_sequence(seq)
            .withf(|msg| msg == UciMessage::Uci.to_string())
            .returning(|_| Ok(()));

        io.expect_flush().once().in_sequence(seq).returning(|| Ok(()));

        io.expect_recv()
            .once()
            .in_sequence(seq)
            .returning(|| Ok(UciMessage::UciOk.to_string()));

        for (name, value) in options {
            let set_option = UciMessage::SetOption { name, value };
            io.expect_send()
                .once()
                .in_sequence(seq)
                .withf(move |msg| msg == set_option.to_string())
                .returning(|_| Ok(()));
        }

        io.expect_send()
            .once()
            .in_sequence(seq)
            .withf(|msg| msg == UciMessage::UciNewGame.to_string())
            .returning(|_| Ok(()));

        io.expect_send()
            .once()
            .in_sequence(seq)
            .withf(|msg| msg == UciMessage::IsReady.to_string())
            .returning(|_| Ok(()));

        io.expect_flush().once().in_sequence(seq).returning(|| Ok(()));

        io.expect_recv()
            .once()
            .in_sequence(seq)
            .returning(|| Ok(UciMessage::ReadyOk.to_string()));
    }

    #[proptest]
    fn the_handshake_is_deferred_until_the_first_turn() {
        assert!(matches!(
            Uci::new(MockIo::new()),
            Uci {
                link: Link::Down(_),
                ..
            }
        ));
    }

    #[proptest]
    fn new_applies_the_default_limits() {
        assert_eq!(Uci::new(MockIo::new()).limits, Limits::default());
    }

    #[proptest]
    fn the_handshake_configures_the_server_before_the_first_turn(
        l: Limits,
        o: UciOptions,
        pos: Position,
        m: Move,
    ) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        expect_handshake(&mut io, &mut seq, o.clone());

        io.expect_send().returning(|_| Ok(()));
        io.expect_flush().returning(|| Ok(()));
        io.expect_recv()
            .once()
            .returning(move || Ok(UciMessage::best_move(m.into()).to_string()));

        let mut uci = Uci::with_config(io, l, o);
        assert_eq!(rt.block_on(uci.play(&pos))?, m);
    }

    #[proptest]
    fn the_handshake_skips_over_unrelated_chatter(
        pos: Position,
        m: Move,
        #[strategy(chatter())] msg: UciMessage,
    ) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();

        io.expect_send().returning(|_| Ok(()));
        io.expect_flush().returning(|| Ok(()));

        io.expect_recv().once().returning(move || Ok(msg.to_string()));
        io.expect_recv()
            .once()
            .returning(|| Ok(UciMessage::UciOk.to_string()));
        io.expect_recv()
            .once()
            .returning(|| Ok(UciMessage::ReadyOk.to_string()));
        io.expect_recv()
            .once()
            .returning(move || Ok(UciMessage::best_move(m.into()).to_string()));

        let mut uci = Uci::new(io);
        assert_eq!(rt.block_on(uci.play(&pos))?, m);
    }

    #[proptest]
    fn handshake_failures_surface_on_the_first_turn(pos: Position, e: io::Error) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();

        let kind = e.kind();
        io.expect_send().once().return_once(move |_| Err(e));

        io.expect_send().returning(|_| Ok(()));
        io.expect_flush().returning(|| Ok(()));

        let mut uci = Uci::new(io);
        assert_eq!(
            rt.block_on(uci.play(&pos)).map_err(|UciError(e)| e.kind()),
            Err(kind)
        );
    }

    #[proptest]
    fn play_requests_a_move_within_the_time_budget(l: Limits, pos: Position, m: Move) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        let position = UciMessage::Position {
            startpos: false,
            fen: Some(UciFen(pos.to_string())),
            moves: Vec::new(),
        };

        let budget = uci::Duration::from_std(l.time)
            .unwrap_or_else(|_| uci::Duration::max_value());

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(move |msg| msg == position.to_string())
            .returning(|_| Ok(()));

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(move |msg| msg == UciMessage::go_movetime(budget).to_string())
            .returning(|_| Ok(()));

        io.expect_flush().once().in_sequence(&mut seq).returning(|| Ok(()));

        io.expect_recv()
            .once()
            .in_sequence(&mut seq)
            .returning(move || Ok(UciMessage::best_move(m.into()).to_string()));

        let mut uci = Uci {
            link: Link::Up(io),
            limits: l,
        };

        assert_eq!(rt.block_on(uci.play(&pos))?, m);
    }

    #[proptest]
    fn play_skips_over_unrelated_chatter(
        l: Limits,
        pos: Position,
        m: Move,
        #[strategy(chatter())] msg: UciMessage,
    ) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();

        io.expect_send().returning(|_| Ok(()));
        io.expect_flush().returning(|| Ok(()));

        io.expect_recv().once().returning(move || Ok(msg.to_string()));
        io.expect_recv()
            .once()
            .returning(move || Ok(UciMessage::best_move(m.into()).to_string()));

        let mut uci = Uci {
            link: Link::Up(io),
            limits: l,
        };

        assert_eq!(rt.block_on(uci.play(&pos))?, m);
    }

    #[proptest]
    fn play_propagates_io_errors(l: Limits, pos: Position, e: io::Error) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();

        io.expect_send().returning(|_| Ok(()));
        io.expect_flush().returning(|| Ok(()));

        let kind = e.kind();
        io.expect_recv().once().return_once(move || Err(e));

        let mut uci = Uci {
            link: Link::Up(io),
            limits: l,
        };

        assert_eq!(
            rt.block_on(uci.play(&pos)).map_err(|UciError(e)| e.kind()),
            Err(kind)
        );
    }

    #[proptest]
    fn drop_tells_the_server_to_quit(l: Limits) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();
        let mut seq = Sequence::new();

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(|msg| msg == UciMessage::Stop.to_string())
            .returning(|_| Ok(()));

        io.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(|msg| msg == UciMessage::Quit.to_string())
            .returning(|_| Ok(()));

        io.expect_flush().once().in_sequence(&mut seq).returning(|| Ok(()));

        rt.block_on(async move {
            drop(Uci {
                link: Link::Up(io),
                limits: l,
            });
        })
    }

    #[proptest]
    fn drop_tolerates_io_errors(l: Limits, e: io::Error) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut io = MockIo::new();
        io.expect_send().once().return_once(move |_| Err(e));

        rt.block_on(async move {
            drop(Uci {
                link: Link::Up(io),
                limits: l,
            });
        })
    }

    #[proptest]
    fn drop_tolerates_a_missing_runtime(l: Limits) {
        drop(Uci {
            link: Link::Up(MockIo::new()),
            limits: l,
        });
    }
}
