use async_trait::async_trait;
use std::io;

mod process;

pub use process::*;

/// Trait for types that exchange line-oriented messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Io {
    /// Waits for the next inbound message.
    async fn recv(&mut self) -> io::Result<String>;

    /// Queues an outbound message.
    async fn send(&mut self, msg: &str) -> io::Result<()>;

    /// Flushes any outbound messages still queued.
    async fn flush(&mut self) -> io::Result<()>;
}
