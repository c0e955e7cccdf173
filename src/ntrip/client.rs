//! TCP client for an NTRIP caster.
//!
//! One tokio task owns the socket while a mountpoint is streaming and
//! republishes every chunk it reads on a broadcast channel. The client keeps
//! the task's cancellation token and join handle so `disconnect` can stop it
//! and wait for the socket to be released.

use bytes::Bytes;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::config::NtripConfig;
use super::source_table::{parse_source_table, NtripSourceEntry};
use crate::err::NetworkError;

/// Largest response header accepted before the body starts.
const MAX_RESPONSE_HEAD: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    ConnectingOrFetching,
    Streaming,
}

struct ReceiveLoop {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

pub struct NtripClient {
    config: NtripConfig,
    state: Arc<watch::Sender<ConnectionState>>,
    chunks: broadcast::Sender<Bytes>,
    receive_loop: Option<ReceiveLoop>,
}

impl NtripClient {
    pub fn new(mut config: NtripConfig) -> Self {
        // A zero capacity channel panics and a zero sized read looks like EOF.
        config.channel_capacity = config.channel_capacity.max(1);
        config.read_buffer_size = config.read_buffer_size.max(1);
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (chunks, _) = broadcast::channel(config.channel_capacity);
        NtripClient {
            config,
            state: Arc::new(state),
            chunks,
            receive_loop: None,
        }
    }

    pub fn config(&self) -> &NtripConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Follow state changes, including the receive loop ending on its own.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Receive the raw correction bytes of the current and any later stream.
    /// A subscriber that falls more than `channel_capacity` chunks behind
    /// gets `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Bytes> {
        self.chunks.subscribe()
    }

    /// Download and decode the caster's source table on a separate
    /// connection. Does not disturb a running stream.
    pub async fn fetch_source_table(&self) -> Result<Vec<NtripSourceEntry>, NetworkError> {
        let idle = self.state() == ConnectionState::Disconnected;
        if idle {
            self.state.send_replace(ConnectionState::ConnectingOrFetching);
        }
        let result = self.download_source_table().await;
        if idle {
            self.state.send_replace(ConnectionState::Disconnected);
        }
        result
    }

    async fn download_source_table(&self) -> Result<Vec<NtripSourceEntry>, NetworkError> {
        let mut stream = self.open("").await?;
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;

        let text = String::from_utf8_lossy(&response);
        let status = text
            .lines()
            .next()
            .ok_or_else(|| NetworkError::MalformedResponse("empty response".to_owned()))?;
        check_status(status.trim_end())?;

        let entries = parse_source_table(&text);
        debug!(entries = entries.len(), "fetched source table");
        Ok(entries)
    }

    /// Request `mountpoint` and start publishing its data. Bytes received
    /// together with the response header are published first.
    pub async fn connect(&mut self, mountpoint: &str) -> Result<(), NetworkError> {
        if let Some(running) = &self.receive_loop {
            if !running.task.is_finished() {
                return Err(NetworkError::AlreadyStreaming);
            }
        }
        // Reap a loop that ended because the caster went away.
        if let Some(finished) = self.receive_loop.take() {
            let _ = finished.task.await;
        }

        self.state.send_replace(ConnectionState::ConnectingOrFetching);
        let (stream, leftover) = match self.open_stream(mountpoint).await {
            Ok(opened) => opened,
            Err(e) => {
                warn!(mountpoint, error = %e, "failed to open stream");
                self.state.send_replace(ConnectionState::Disconnected);
                return Err(e);
            }
        };
        debug!(mountpoint, "streaming");

        self.state.send_replace(ConnectionState::Streaming);
        if !leftover.is_empty() {
            let _ = self.chunks.send(Bytes::from(leftover));
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(receive_loop(
            stream,
            self.chunks.clone(),
            Arc::clone(&self.state),
            cancel.clone(),
            self.config.idle_delay,
            self.config.read_buffer_size,
        ));
        self.receive_loop = Some(ReceiveLoop { cancel, task });
        Ok(())
    }

    /// Stop the receive loop and wait until it has released the socket.
    /// Safe to call when nothing is streaming.
    pub async fn disconnect(&mut self) {
        if let Some(running) = self.receive_loop.take() {
            running.cancel.cancel();
            if let Err(e) = running.task.await {
                warn!(error = %e, "receive loop did not shut down cleanly");
            }
        }
        self.state.send_replace(ConnectionState::Disconnected);
    }

    async fn open(&self, mountpoint: &str) -> Result<TcpStream, NetworkError> {
        let address = self.config.address();
        debug!(%address, mountpoint, "connecting to caster");
        let mut stream = TcpStream::connect(&address).await?;
        stream
            .write_all(self.config.request(mountpoint).as_bytes())
            .await?;
        Ok(stream)
    }

    async fn open_stream(&self, mountpoint: &str) -> Result<(TcpStream, Vec<u8>), NetworkError> {
        let mut stream = self.open(mountpoint).await?;
        let mut head = Vec::new();
        let mut buf = [0u8; 512];
        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                return Err(NetworkError::MalformedResponse(
                    "connection closed before the response header ended".to_owned(),
                ));
            }
            head.extend_from_slice(&buf[..n]);
            if let Some(body_start) = body_offset(&head)? {
                let leftover = head.split_off(body_start);
                return Ok((stream, leftover));
            }
            if head.len() > MAX_RESPONSE_HEAD {
                return Err(NetworkError::MalformedResponse(
                    "response header too long".to_owned(),
                ));
            }
        }
    }
}

impl Drop for NtripClient {
    fn drop(&mut self) {
        if let Some(running) = &self.receive_loop {
            running.cancel.cancel();
        }
    }
}

async fn receive_loop(
    stream: TcpStream,
    chunks: broadcast::Sender<Bytes>,
    state: Arc<watch::Sender<ConnectionState>>,
    cancel: CancellationToken,
    idle_delay: Duration,
    buffer_size: usize,
) {
    let mut buf = vec![0u8; buffer_size];
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("receive loop cancelled");
                break;
            }

            ready = stream.readable() => {
                if let Err(e) = ready {
                    warn!(error = %e, "caster socket failed");
                    break;
                }
                match stream.try_read(&mut buf) {
                    Ok(0) => {
                        debug!("caster closed the stream");
                        break;
                    }
                    Ok(n) => {
                        trace!(bytes = n, "received correction data");
                        // No subscribers is not an error.
                        let _ = chunks.send(Bytes::copy_from_slice(&buf[..n]));
                    }
                    Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                        tokio::time::sleep(idle_delay).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read from caster");
                        break;
                    }
                }
            }
        }
    }
    drop(stream);
    state.send_replace(ConnectionState::Disconnected);
}

/// Map a caster status line to success or the matching error.
fn check_status(status: &str) -> Result<(), NetworkError> {
    if status.starts_with("ICY 200") || status.starts_with("SOURCETABLE 200") {
        return Ok(());
    }
    if status.starts_with("HTTP/") {
        return match status.split_whitespace().nth(1) {
            Some("200") => Ok(()),
            Some("401") => Err(NetworkError::Unauthorized),
            Some(_) => Err(NetworkError::Rejected(status.to_owned())),
            None => Err(NetworkError::MalformedResponse(status.to_owned())),
        };
    }
    if status.starts_with("ERROR") {
        if status.contains("Password") || status.contains("Unauthorized") {
            return Err(NetworkError::Unauthorized);
        }
        return Err(NetworkError::Rejected(status.to_owned()));
    }
    Err(NetworkError::MalformedResponse(status.to_owned()))
}

/// Offset of the first body byte once the response header is complete.
///
/// `ICY` responses consist of the status line alone; HTTP responses end
/// their header with an empty line.
fn body_offset(head: &[u8]) -> Result<Option<usize>, NetworkError> {
    let line_end = match head.iter().position(|&b| b == b'\n') {
        Some(pos) => pos,
        None => return Ok(None),
    };
    let status = String::from_utf8_lossy(&head[..line_end]);
    check_status(status.trim_end())?;

    if !status.starts_with("HTTP/") {
        return Ok(Some(line_end + 1));
    }
    Ok(head
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4))
}
