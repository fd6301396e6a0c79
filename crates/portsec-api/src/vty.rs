// Virtual-terminal line session to a real switch.
//
// Opens a TCP connection, answers telnet negotiation, walks the
// Username/Password/enable login dialogue, then exchanges one command
// line at a time. The device prompt reappearing marks each command as
// complete. Every read is bounded by `TransportConfig::timeout`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::error::Error;
use crate::telnet::TelnetFilter;
use crate::transport::{SessionHandle, Transport, TransportConfig, TransportKind, split_address};

const READ_CHUNK: usize = 4096;
const MAX_PROMPT_LEN: usize = 64;

const REJECTION_MARKERS: &[&str] = &[
    "% authentication failed",
    "% login invalid",
    "login incorrect",
    "% bad passwords",
    "% bad secrets",
    "% access denied",
];

/// Transport that drives a switch's vty line over TCP.
pub struct VtyTransport {
    config: TransportConfig,
    session: Option<VtySession>,
}

impl VtyTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for VtyTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Vty
    }

    async fn open(&mut self, address: &str) -> Result<SessionHandle, Error> {
        if let Some(stale) = self.session.take() {
            warn!(handle = %stale.handle, "replacing an open vty session");
            stale.shutdown().await;
        }

        let (host, port) = split_address(address, self.config.default_port)?;
        let timeout = self.config.timeout;
        debug!(%host, port, "connecting to switch vty");

        let stream = match tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port))).await {
            Err(_) => {
                return Err(Error::Timeout {
                    operation: format!("TCP connect to {host}:{port}"),
                    timeout_secs: timeout.as_secs(),
                });
            }
            Ok(Err(e)) => {
                return Err(Error::Unreachable {
                    address: format!("{host}:{port}"),
                    reason: e.to_string(),
                });
            }
            Ok(Ok(stream)) => stream,
        };

        let mut session = VtySession::new(SessionHandle::next(), stream);
        session.login(&self.config).await?;
        session.exchange("terminal length 0", timeout).await?;

        let handle = session.handle;
        info!(%handle, hostname = %session.hostname, "vty session established");
        self.session = Some(session);
        Ok(handle)
    }

    async fn send(&mut self, handle: SessionHandle, command: &str) -> Result<String, Error> {
        let timeout = self.config.timeout;
        let session = self
            .session
            .as_mut()
            .filter(|s| s.handle == handle)
            .ok_or(Error::UnknownSession { handle: handle.id() })?;
        session.exchange(command, timeout).await
    }

    async fn close(&mut self, handle: SessionHandle) -> Result<(), Error> {
        if self.session.as_ref().is_some_and(|s| s.handle == handle) {
            if let Some(session) = self.session.take() {
                session.shutdown().await;
                debug!(%handle, "vty session closed");
            }
        }
        Ok(())
    }
}

// ── Session ─────────────────────────────────────────────────────────

struct VtySession {
    handle: SessionHandle,
    stream: TcpStream,
    telnet: TelnetFilter,
    /// Text received but not yet consumed by a `read_until`.
    buffer: String,
    /// Prompt stem (e.g. `SW1`), learned at login. Mode suffixes like
    /// `(config-if)` follow it.
    hostname: String,
    /// Prompts the device still owes for commands whose reply timed out.
    /// Non-zero means the next exchange must resync first.
    owed_prompts: usize,
}

impl VtySession {
    fn new(handle: SessionHandle, stream: TcpStream) -> Self {
        Self {
            handle,
            stream,
            telnet: TelnetFilter::new(),
            buffer: String::new(),
            hostname: String::new(),
            owed_prompts: 0,
        }
    }

    async fn login(&mut self, config: &TransportConfig) -> Result<(), Error> {
        let timeout = config.timeout;

        let mut text = self
            .read_until("login prompt", timeout, |b| {
                ends_with_any(b, &["username:", "login:", "password:"]) || prompt_of(b).is_some()
            })
            .await?;

        if ends_with_any(&text, &["username:", "login:"]) {
            self.write_line(&config.username).await?;
            text = self
                .read_until("password prompt", timeout, |b| {
                    ends_with_any(b, &["password:"]) || is_rejection(b) || prompt_of(b).is_some()
                })
                .await?;
        }

        if ends_with_any(&text, &["password:"]) {
            self.write_line(config.password.expose_secret()).await?;
            text = self
                .read_until("EXEC prompt", timeout, |b| {
                    prompt_of(b).is_some()
                        || is_rejection(b)
                        || ends_with_any(b, &["username:", "login:", "password:"])
                })
                .await?;
        }

        let Some(mut prompt) = prompt_of(&text).filter(|_| !is_rejection(&text)) else {
            return Err(Error::Authentication {
                message: format!("login rejected for user '{}'", config.username),
            });
        };

        if prompt.ends_with('>') {
            trace!("user EXEC prompt, elevating with enable");
            self.write_line("enable").await?;
            text = self
                .read_until("enable prompt", timeout, |b| {
                    ends_with_any(b, &["password:"]) || prompt_of(b).is_some()
                })
                .await?;

            if ends_with_any(&text, &["password:"]) {
                let secret = config.enable_secret.as_ref().unwrap_or(&config.password);
                self.write_line(secret.expose_secret()).await?;
                text = self
                    .read_until("privileged prompt", timeout, |b| {
                        prompt_of(b).is_some() || is_rejection(b) || ends_with_any(b, &["password:"])
                    })
                    .await?;
            }

            prompt = match prompt_of(&text) {
                Some(p) if p.ends_with('#') => p,
                _ => {
                    return Err(Error::Authentication {
                        message: "privileged EXEC access denied".into(),
                    });
                }
            };
        }

        self.hostname = prompt.trim_end_matches(['#', '>']).to_string();
        Ok(())
    }

    /// Send one command and read until the prompt returns.
    ///
    /// A timed-out command leaves its reply in flight; that reply is owed
    /// and drained by `resync` before anything else is sent.
    async fn exchange(&mut self, command: &str, timeout: Duration) -> Result<String, Error> {
        if self.owed_prompts > 0 {
            self.resync(timeout).await?;
        }
        self.buffer.clear();
        self.write_line(command).await?;

        let hostname = self.hostname.clone();
        let raw = match self
            .read_until(&format!("response to '{command}'"), timeout, move |b| {
                prompt_of(b).is_some_and(|p| p.starts_with(&hostname))
            })
            .await
        {
            Err(e @ Error::Timeout { .. }) => {
                self.owed_prompts += 1;
                warn!(command, "no prompt before timeout, session needs resync");
                return Err(e);
            }
            other => other?,
        };

        trace!(command, bytes = raw.len(), "command complete");
        Ok(clean_response(&raw, command))
    }

    /// Send a blank line and discard everything up to its prompt, which
    /// arrives after every owed reply.
    async fn resync(&mut self, timeout: Duration) -> Result<(), Error> {
        self.write_line("").await?;
        self.owed_prompts += 1;

        let (hostname, owed) = (self.hostname.clone(), self.owed_prompts);
        let drained = self
            .read_until("resync prompt", timeout, move |b| {
                prompt_of(b).is_some_and(|p| p.starts_with(&hostname)) && count_prompts(b, &hostname) >= owed
            })
            .await?;

        debug!(owed, discarded = drained.len(), "vty session resynchronised");
        self.owed_prompts = 0;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), Error> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Accumulate device output until `done` accepts the buffer or the
    /// deadline passes. Returns and consumes the whole buffer.
    async fn read_until<F>(&mut self, what: &str, timeout: Duration, done: F) -> Result<String, Error>
    where
        F: Fn(&str) -> bool + Send,
    {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if done(&self.buffer) {
                return Ok(std::mem::take(&mut self.buffer));
            }

            let n = match tokio::time::timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Err(_) => {
                    return Err(Error::Timeout {
                        operation: what.to_string(),
                        timeout_secs: timeout.as_secs(),
                    });
                }
                Ok(Err(e)) => return Err(Error::Io(e)),
                Ok(Ok(0)) => {
                    return Err(Error::ConnectionClosed {
                        reason: format!("end of stream while waiting for {what}"),
                    });
                }
                Ok(Ok(n)) => n,
            };

            let (mut data, mut reply) = (Vec::with_capacity(n), Vec::new());
            self.telnet.feed(&chunk[..n], &mut data, &mut reply);
            if !reply.is_empty() {
                self.stream.write_all(&reply).await?;
            }
            self.buffer.push_str(&String::from_utf8_lossy(&data));
        }
    }

    async fn shutdown(mut self) {
        let _ = self.write_line("exit").await;
        let _ = self.stream.shutdown().await;
    }
}

// ── Text helpers ────────────────────────────────────────────────────

/// The device prompt, if `text` currently ends with one.
///
/// A prompt is an unterminated last line like `SW1#`, `SW1>` or
/// `SW1(config-if)#`.
fn prompt_of(text: &str) -> Option<String> {
    if text.ends_with('\n') {
        return None;
    }
    let last = text.rsplit('\n').next()?.trim();
    let plausible = (2..=MAX_PROMPT_LEN).contains(&last.len())
        && (last.ends_with('#') || last.ends_with('>'))
        && !last.contains(char::is_whitespace)
        && last.chars().next().is_some_and(char::is_alphanumeric);
    plausible.then(|| last.to_string())
}

/// Lines that begin with the device prompt, with or without an echoed
/// command after it.
fn count_prompts(text: &str, hostname: &str) -> usize {
    text.split('\n')
        .map(|line| line.trim_matches('\r'))
        .filter(|line| {
            let Some(rest) = line.strip_prefix(hostname) else {
                return false;
            };
            let Some(end) = rest.find(['#', '>']) else {
                return false;
            };
            let mode = &rest[..end];
            (mode.is_empty() || (mode.starts_with('(') && mode.ends_with(')')))
                && !mode.contains(char::is_whitespace)
        })
        .count()
}

fn ends_with_any(text: &str, suffixes: &[&str]) -> bool {
    let tail = text.trim_end().to_ascii_lowercase();
    suffixes.iter().any(|s| tail.ends_with(s))
}

fn is_rejection(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    REJECTION_MARKERS.iter().any(|m| lower.contains(m))
}

/// Strip the echoed command and the trailing prompt from a raw response.
fn clean_response(raw: &str, command: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = normalized.lines().collect();
    lines.pop();

    if lines
        .first()
        .is_some_and(|first| first.trim_end().ends_with(command.trim()))
    {
        lines.remove(0);
    }

    lines.join("\n").trim_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_detection() {
        assert_eq!(prompt_of("banner\r\nSW1#").as_deref(), Some("SW1#"));
        assert_eq!(prompt_of("SW1(config-if)#").as_deref(), Some("SW1(config-if)#"));
        assert_eq!(prompt_of("\r\nSW1>").as_deref(), Some("SW1>"));
        assert_eq!(prompt_of("SW1#\r\n"), None);
        assert_eq!(prompt_of("Username: "), None);
        assert_eq!(prompt_of("#"), None);
        assert_eq!(prompt_of("some text #"), None);
    }

    #[test]
    fn suffix_and_rejection_matching() {
        assert!(ends_with_any("\r\nUser Access Verification\r\n\r\nUsername: ", &["username:"]));
        assert!(ends_with_any("Password:", &["password:"]));
        assert!(is_rejection("\r\n% Authentication failed\r\n\r\nUsername: "));
        assert!(!is_rejection("SW1#"));
    }

    #[test]
    fn clean_response_strips_echo_and_prompt() {
        let raw = "show clock\r\n*10:00:00.000 UTC Mon Mar 1 1993\r\nSW1#";
        assert_eq!(clean_response(raw, "show clock"), "*10:00:00.000 UTC Mon Mar 1 1993");
    }

    #[test]
    fn clean_response_without_echo() {
        let raw = "line one\r\nline two\r\nSW1(config)#";
        assert_eq!(clean_response(raw, "configure terminal"), "line one\nline two");
    }

    #[test]
    fn prompt_counting() {
        let text = "late\r\nLATE REPLY\r\nSW1#\r\nSW1(config)#show run\r\nSW1 uptime is 1 day\r\nSW1#";
        assert_eq!(count_prompts(text, "SW1"), 3);
        assert_eq!(count_prompts("SW1 uptime\r\nSW10#", "SW1"), 0);
    }

    #[test]
    fn clean_response_empty_body() {
        assert_eq!(clean_response("end\r\nSW1#", "end"), "");
    }
}
