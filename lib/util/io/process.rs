use crate::util::Io;
use anyhow::{bail, Context, Error as Anyhow};
use async_trait::async_trait;
use std::{io, time::Duration};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines};
use tokio::{runtime, task::block_in_place, time::timeout};
use tracing::{debug, error, instrument, warn};

#[async_trait]
#[cfg_attr(test, mockall::automock(
    type Stdin = tokio::io::DuplexStream;
    type Stdout = tokio::io::DuplexStream;
    type Status = String;
))]
trait Child {
    type Stdin;
    type Stdout;
    fn stdio(&mut self) -> io::Result<(Self::Stdin, Self::Stdout)>;

    type Status;
    async fn wait(&mut self) -> io::Result<Self::Status>;

    async fn kill(&mut self) -> io::Result<()>;
}

#[async_trait]
impl Child for tokio::process::Child {
    type Stdin = tokio::process::ChildStdin;
    type Stdout = tokio::process::ChildStdout;
    fn stdio(&mut self) -> io::Result<(Self::Stdin, Self::Stdout)> {
        Option::zip(self.stdin.take(), self.stdout.take()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Other,
                Anyhow::msg("the child process' stdio is not piped"),
            )
        })
    }

    type Status = std::process::ExitStatus;
    async fn wait(&mut self) -> io::Result<Self::Status> {
        self.wait().await
    }

    async fn kill(&mut self) -> io::Result<()> {
        self.kill().await
    }
}

#[cfg(test)]
type Spawned = MockChild;

#[cfg(not(test))]
type Spawned = tokio::process::Child;

/// The line-oriented stdio of a child process.
#[derive(Debug)]
pub struct Process {
    child: Spawned,
    stdin: BufWriter<<Spawned as Child>::Stdin>,
    stdout: Lines<BufReader<<Spawned as Child>::Stdout>>,
}

impl Process {
    /// How long a dropped child process is given to exit before it is killed.
    #[cfg(test)]
    const GRACE: Duration = Duration::from_millis(0);

    #[cfg(not(test))]
    const GRACE: Duration = Duration::from_millis(1000);

    fn new(mut child: Spawned) -> io::Result<Self> {
        let (stdin, stdout) = child.stdio()?;

        Ok(Process {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout).lines(),
        })
    }

    /// Spawns a child process with its stdio piped.
    #[instrument(level = "trace", err, ret)]
    pub fn spawn(path: &str) -> io::Result<Self> {
        #[cfg(test)]
        {
            let mut child = MockChild::new();
            child.expect_stdio().returning(|| Ok(tokio::io::duplex(1)));
            Process::new(child)
        }

        #[cfg(not(test))]
        {
            Process::new(
                tokio::process::Command::new(path)
                    .stdin(std::process::Stdio::piped())
                    .stdout(std::process::Stdio::piped())
                    .spawn()?,
            )
        }
    }
}

/// Waits for the child process to exit, killing it once the grace period runs out.
impl Drop for Process {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        let result: Result<_, Anyhow> = block_in_place(|| {
            runtime::Handle::try_current()?.block_on(async {
                self.stdin.flush().await?;

                match timeout(Self::GRACE, self.child.wait()).await {
                    Ok(status) => Ok(status?),
                    Err(_) => {
                        self.child.kill().await?;
                        warn!("killed the child process");
                        bail!("the child process did not exit within {:?}", Self::GRACE);
                    }
                }
            })
        });

        match result.context("failed to terminate the child process") {
            Ok(s) => debug!("{}", s),
            Err(e) => error!("{:?}", e),
        }
    }
}

#[async_trait]
impl Io for Process {
    #[instrument(level = "trace", err, ret)]
    async fn recv(&mut self) -> io::Result<String> {
        match self.stdout.next_line().await? {
            Some(line) => Ok(line),
            None => Err(io::ErrorKind::UnexpectedEof.into()),
        }
    }

    #[instrument(level = "trace", err)]
    async fn send(&mut self, msg: &str) -> io::Result<()> {
        self.stdin.write_all(msg.as_bytes()).await?;
        self.stdin.write_u8(b'\n').await?;
        Ok(())
    }

    #[instrument(level = "trace", err)]
    async fn flush(&mut self) -> io::Result<()> {
        self.stdin.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str;
    use test_strategy::proptest;
    use tokio::io::{duplex, AsyncReadExt};
    use tokio::time::sleep;

    #[proptest]
    fn new_fails_if_the_stdio_is_not_piped(e: io::Error) {
        let mut child = MockChild::new();

        let kind = e.kind();
        child.expect_stdio().once().return_once(move || Err(e));

        assert_eq!(Process::new(child).err().map(|e| e.kind()), Some(kind));
    }

    #[proptest]
    fn drop_waits_for_the_child_to_exit(status: String) {
        let rt = runtime::Builder::new_multi_thread().enable_time().build()?;

        let mut process = Process::spawn("")?;

        process
            .child
            .expect_wait()
            .return_once(move || Box::pin(async move { Ok(status) }));

        process
            .child
            .expect_kill()
            .return_once(|| Box::pin(async { Ok(()) }));

        rt.block_on(async move {
            drop(process);
        })
    }

    #[proptest]
    fn drop_kills_the_child_once_the_grace_period_runs_out(status: String) {
        let rt = runtime::Builder::new_multi_thread().enable_time().build()?;

        let mut process = Process::spawn("")?;

        process.child.expect_wait().return_once(move || {
            Box::pin(async move {
                sleep(Duration::from_secs(1)).await;
                Ok(status)
            })
        });

        process
            .child
            .expect_kill()
            .once()
            .return_once(|| Box::pin(async { Ok(()) }));

        rt.block_on(async move {
            drop(process);
        })
    }

    #[proptest]
    fn drop_tolerates_io_errors(a: io::Error, b: io::Error) {
        let rt = runtime::Builder::new_multi_thread().enable_time().build()?;

        let mut process = Process::spawn("")?;

        process
            .child
            .expect_wait()
            .return_once(move || Box::pin(async move { Err(a) }));

        process
            .child
            .expect_kill()
            .return_once(move || Box::pin(async move { Err(b) }));

        rt.block_on(async move {
            drop(process);
        })
    }

    #[proptest]
    fn drop_tolerates_a_missing_runtime() {
        drop(Process::spawn("")?);
    }

    #[proptest]
    fn recv_reads_one_line_at_a_time(#[strategy("[^\r\n]")] s: String) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut child = MockChild::new();

        let (stdin, _) = duplex(1);
        let (mut tx, stdout) = duplex(s.len() + 1);
        child.expect_stdio().once().return_once(move || Ok((stdin, stdout)));

        rt.block_on(tx.write_all(s.as_bytes()))?;
        rt.block_on(tx.write_u8(b'\n'))?;

        let mut process = Process::new(child)?;
        assert_eq!(rt.block_on(process.recv())?, s);
    }

    #[proptest]
    fn send_writes_one_line_at_a_time(s: String) {
        let rt = runtime::Builder::new_multi_thread().build()?;
        let mut child = MockChild::new();

        let (stdin, mut rx) = duplex(s.len() + 1);
        let (_, stdout) = duplex(1);
        child.expect_stdio().once().return_once(move || Ok((stdin, stdout)));

        let mut process = Process::new(child)?;
        rt.block_on(process.send(&s))?;
        rt.block_on(process.flush())?;

        let mut line = vec![0u8; s.len() + 1];
        rt.block_on(rx.read_exact(&mut line))?;

        assert_eq!(str::from_utf8(&line)?, format!("{}\n", s));
    }
}
