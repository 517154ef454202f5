//! Engine session: owns the engine process and its reader/writer tasks.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::codec::{LineReader, LineWriter};
use crate::protocol::{self, IS_READY, QUIT, STOP, Sentinel, UCI};
use crate::types::{BridgeError, EngineConfig, EngineResponse};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

const WRITER_CHANNEL_CAPACITY: usize = 64;

/// Lines buffered between the reader task and the caller.
const LINE_QUEUE_CAPACITY: usize = 256;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

enum WriterCommand {
    Line(String),
    Shutdown,
}

/// A live connection to one engine for one game.
///
/// Requests take `&mut self`, so at most one is in flight. A `readyok`
/// only answers the most recent `isready`: answers to earlier ones that
/// arrive late are skipped until a [`resync`](EngineSession::resync) goes
/// unanswered. Dropping the
/// session aborts its tasks and (through `kill_on_drop`) the process; call
/// [`EngineSession::close`] for an orderly `quit` first.
pub struct EngineSession {
    command: String,
    engine_name: Option<String>,
    child: Option<Child>,
    writer_tx: mpsc::Sender<WriterCommand>,
    lines_rx: mpsc::Receiver<String>,
    reader_handle: JoinHandle<()>,
    writer_handle: JoinHandle<()>,
    /// `isready` commands sent whose `readyok` has not been read yet.
    unanswered_pings: usize,
    closed: bool,
}

impl EngineSession {
    /// Spawn the configured engine and complete the `uci` / `isready`
    /// handshake.
    pub async fn connect(config: &EngineConfig) -> Result<Self, BridgeError> {
        let command = config.command();
        let resolved = which::which(command)
            .map_err(|e| BridgeError::unavailable(command, format!("not found in PATH: {e}")))?;

        let mut cmd = Command::new(&resolved);
        cmd.args(config.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let mut child = cmd
            .spawn()
            .map_err(|e| BridgeError::unavailable(command, format!("spawn failed: {e}")))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.start_kill();
            return Err(BridgeError::unavailable(command, "engine stdio not piped"));
        };

        tracing::info!(
            "Started engine '{}' (pid {:?})",
            resolved.display(),
            child.id()
        );

        let mut session = Self::start(stdout, stdin, Some(child), command);
        session.handshake(config).await?;
        Ok(session)
    }

    /// Run the handshake over an arbitrary byte stream pair.
    ///
    /// `reader` carries the engine's output, `writer` its input.
    pub async fn attach<R, W>(
        reader: R,
        writer: W,
        config: &EngineConfig,
    ) -> Result<Self, BridgeError>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut session = Self::start(reader, writer, None, config.command());
        session.handshake(config).await?;
        Ok(session)
    }

    fn start<R, W>(reader: R, writer: W, child: Option<Child>, command: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (writer_tx, mut writer_rx) = mpsc::channel::<WriterCommand>(WRITER_CHANNEL_CAPACITY);
        let writer_handle = tokio::spawn(async move {
            let mut writer = LineWriter::new(writer);
            while let Some(cmd) = writer_rx.recv().await {
                match cmd {
                    WriterCommand::Line(line) => {
                        tracing::trace!("engine <- {line}");
                        if let Err(e) = writer.write_line(&line).await {
                            tracing::warn!("Engine write error: {e:#}");
                            break;
                        }
                    }
                    WriterCommand::Shutdown => break,
                }
            }
        });

        let (lines_tx, lines_rx) = mpsc::channel::<String>(LINE_QUEUE_CAPACITY);
        let reader_handle = tokio::spawn(async move {
            let mut reader = LineReader::new(reader);
            loop {
                match reader.read_line().await {
                    Ok(Some(line)) => {
                        tracing::trace!("engine -> {line}");
                        if lines_tx.send(line).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("Engine closed its output");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Engine read error: {e:#}");
                        break;
                    }
                }
            }
        });

        Self {
            command: command.to_string(),
            engine_name: None,
            child,
            writer_tx,
            lines_rx,
            reader_handle,
            writer_handle,
            unanswered_pings: 0,
            closed: false,
        }
    }

    async fn handshake(&mut self, config: &EngineConfig) -> Result<(), BridgeError> {
        self.send(UCI).await;
        for option in config.options() {
            self.send(&protocol::set_option(&option.name, &option.value))
                .await;
        }
        self.send(IS_READY).await;

        let timeout = config.startup_timeout();
        let response = self.await_response(timeout, &[Sentinel::ReadyOk]).await;
        self.engine_name = protocol::engine_name(response.text()).map(str::to_string);

        if !response.is_complete() {
            self.close().await;
            return Err(BridgeError::unavailable(
                &self.command,
                format!("no readyok within {}ms", timeout.as_millis()),
            ));
        }

        tracing::info!(
            "Engine ready: {}",
            self.engine_name.as_deref().unwrap_or(&self.command)
        );
        Ok(())
    }

    /// Name from the engine's `id name` line, if it sent one.
    #[must_use]
    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    /// Queue one command line for the writer task.
    ///
    /// Write failures surface as a later request timing out.
    pub async fn send(&mut self, command: &str) {
        if command == IS_READY {
            self.unanswered_pings += 1;
        }
        if self
            .writer_tx
            .send(WriterCommand::Line(command.to_string()))
            .await
            .is_err()
        {
            tracing::warn!("Engine writer closed, dropped `{command}`");
        }
    }

    /// Collect output lines until one contains a wanted sentinel, the
    /// deadline passes, or the engine's output ends.
    pub async fn await_response(
        &mut self,
        timeout: Duration,
        sentinels: &[Sentinel],
    ) -> EngineResponse {
        let deadline = Instant::now() + timeout;
        let mut text = String::new();

        loop {
            match tokio::time::timeout_at(deadline, self.lines_rx.recv()).await {
                Ok(Some(line)) => {
                    let mut matched = Sentinel::find(sentinels, &line);
                    if self.note_ready(&line) && matched == Some(Sentinel::ReadyOk) {
                        tracing::debug!(
                            "Skipping readyok for an earlier isready ({} unanswered)",
                            self.unanswered_pings
                        );
                        matched = None;
                    }
                    text.push_str(&line);
                    text.push('\n');
                    if matched.is_some() {
                        return EngineResponse::new(text, matched);
                    }
                }
                Ok(None) => {
                    tracing::debug!("Engine output ended while waiting for {sentinels:?}");
                    break;
                }
                Err(_) => {
                    tracing::debug!(
                        "Engine did not answer with {sentinels:?} within {}ms",
                        timeout.as_millis()
                    );
                    break;
                }
            }
        }

        EngineResponse::new(text, None)
    }

    /// One round trip: discard stale output, send `commands`, await a
    /// sentinel.
    pub async fn request(
        &mut self,
        commands: &[&str],
        sentinels: &[Sentinel],
        timeout: Duration,
    ) -> EngineResponse {
        self.discard_stale();
        for command in commands {
            self.send(command).await;
        }
        let response = self.await_response(timeout, sentinels).await;
        tracing::debug!(
            "Engine request {commands:?} -> {:?}",
            response.matched()
        );
        response
    }

    fn discard_stale(&mut self) {
        let mut discarded = 0usize;
        while let Ok(line) = self.lines_rx.try_recv() {
            self.note_ready(&line);
            tracing::trace!("discarding stale engine output: {line}");
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!("Discarded {discarded} stale engine lines");
        }
    }

    /// Stop any search still running and wait for the engine to catch up
    /// with everything sent so far.
    ///
    /// An engine that does not answer is taken to have dropped its pending
    /// `isready`s; later `readyok`s then count again.
    pub async fn resync(&mut self, timeout: Duration) -> bool {
        let response = self
            .request(&[STOP, IS_READY], &[Sentinel::ReadyOk], timeout)
            .await;
        if !response.is_complete() {
            tracing::warn!(
                "Engine did not answer after stop, dropping {} pending isready",
                self.unanswered_pings
            );
            self.unanswered_pings = 0;
        }
        response.is_complete()
    }

    /// Count a `readyok` against the oldest unanswered `isready`. Returns
    /// true when `line` is a `readyok` and later `isready`s remain unanswered.
    fn note_ready(&mut self, line: &str) -> bool {
        if !Sentinel::ReadyOk.matches(line) {
            return false;
        }
        self.unanswered_pings = self.unanswered_pings.saturating_sub(1);
        self.unanswered_pings > 0
    }

    /// Send `quit`, close the engine's input and wait briefly for it to
    /// exit, killing it otherwise. Safe to call more than once.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let _ = self
            .writer_tx
            .send(WriterCommand::Line(QUIT.to_string()))
            .await;
        let _ = self.writer_tx.send(WriterCommand::Shutdown).await;
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut self.writer_handle)
            .await
            .is_err()
        {
            tracing::debug!("Engine writer did not finish in time");
            self.writer_handle.abort();
        }

        if let Some(child) = self.child.as_mut() {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, child.wait()).await {
                Ok(Ok(status)) => tracing::debug!("Engine '{}' exited: {status}", self.command),
                Ok(Err(e)) => tracing::debug!("Waiting for engine '{}': {e}", self.command),
                Err(_) => {
                    tracing::debug!("Engine '{}' didn't exit in time, killing", self.command);
                    if let Err(e) = child.kill().await {
                        tracing::debug!("Killing engine '{}': {e}", self.command);
                    }
                }
            }
        }

        self.reader_handle.abort();
        tracing::info!("Engine session '{}' closed", self.command);
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.reader_handle.abort();
        self.writer_handle.abort();
    }
}
