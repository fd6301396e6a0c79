#![allow(clippy::unwrap_used)]
// Integration tests for `VtyTransport` against an in-process fake switch.

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedReadHalf;

use portsec_api::{Error, SessionHandle, Transport, TransportConfig, VtyTransport};

// ── Fake device ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Behavior {
    /// Full login dialogue with enable, then answers commands.
    Normal,
    /// Accepts the TCP connection and never says anything.
    Silent,
}

const PASSWORD: &str = "secret";
const ENABLE_SECRET: &str = "enablepw";

async fn spawn_device(behavior: Behavior) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        if matches!(behavior, Behavior::Silent) {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return;
        }

        // IAC WILL ECHO, IAC WILL SGA
        writer.write_all(&[255, 251, 1, 255, 251, 3]).await.unwrap();
        writer
            .write_all(b"\r\nUser Access Verification\r\n\r\nUsername: ")
            .await
            .unwrap();
        let _user = read_line(&mut reader).await;

        writer.write_all(b"Password: ").await.unwrap();
        if read_line(&mut reader).await.as_deref() != Some(PASSWORD) {
            let _ = writer
                .write_all(b"\r\n% Authentication failed\r\n\r\nUsername: ")
                .await;
            return;
        }
        writer.write_all(b"\r\n\r\nSW1>").await.unwrap();

        if read_line(&mut reader).await.as_deref() != Some("enable") {
            return;
        }
        writer.write_all(b"enable\r\nPassword: ").await.unwrap();
        if read_line(&mut reader).await.as_deref() != Some(ENABLE_SECRET) {
            let _ = writer.write_all(b"\r\n% Access denied\r\n\r\nSW1>").await;
            return;
        }
        writer.write_all(b"\r\nSW1#").await.unwrap();

        let mut prompt = "SW1#";
        while let Some(line) = read_line(&mut reader).await {
            let body = match line.as_str() {
                "exit" => break,
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    continue;
                }
                "late" => {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "LATE REPLY\r\n"
                }
                "" | "terminal length 0" => "",
                "show version" => "Cisco IOS Software, Fake Switch Software\r\n",
                "configure terminal" => {
                    prompt = "SW1(config)#";
                    "Enter configuration commands, one per line.  End with CNTL/Z.\r\n"
                }
                "end" => {
                    prompt = "SW1#";
                    ""
                }
                _ => "% Invalid input detected at '^' marker.\r\n",
            };
            let reply = format!("{line}\r\n{body}{prompt}");
            if writer.write_all(reply.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    addr
}

/// Read one CRLF-terminated line, dropping telnet IAC triples.
async fn read_line(reader: &mut BufReader<OwnedReadHalf>) -> Option<String> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw).await.ok()? == 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter();
    while let Some(b) = iter.next() {
        if b == 255 {
            iter.next();
            iter.next();
        } else {
            bytes.push(b);
        }
    }
    Some(String::from_utf8_lossy(&bytes).trim().to_string())
}

fn config(password: &str, timeout: Duration) -> TransportConfig {
    TransportConfig {
        username: "admin".into(),
        password: SecretString::from(password.to_string()),
        enable_secret: Some(SecretString::from(ENABLE_SECRET.to_string())),
        timeout,
        ..TransportConfig::default()
    }
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_and_exchange_commands() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_secs(5)));

    let handle = transport.open(&addr.to_string()).await.unwrap();

    let version = transport.send(handle, "show version").await.unwrap();
    assert_eq!(version, "Cisco IOS Software, Fake Switch Software");

    let conf = transport.send(handle, "configure terminal").await.unwrap();
    assert!(conf.starts_with("Enter configuration commands"), "got: {conf:?}");

    let end = transport.send(handle, "end").await.unwrap();
    assert_eq!(end, "");

    let rejected = transport.send(handle, "bogus").await.unwrap();
    assert!(rejected.starts_with('%'));

    transport.close(handle).await.unwrap();
    assert!(matches!(
        transport.send(handle, "show version").await,
        Err(Error::UnknownSession { .. })
    ));
}

#[tokio::test]
async fn test_wrong_password_is_authentication_error() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut transport = VtyTransport::new(config("wrong", Duration::from_secs(5)));

    let result = transport.open(&addr.to_string()).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_enable_denied_is_authentication_error() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut cfg = config(PASSWORD, Duration::from_secs(5));
    cfg.enable_secret = Some(SecretString::from("nope".to_string()));
    let mut transport = VtyTransport::new(cfg);

    let result = transport.open(&addr.to_string()).await;
    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message.contains("privileged")),
        "expected privileged EXEC denial, got: {result:?}"
    );
}

#[tokio::test]
async fn test_silent_device_times_out() {
    let addr = spawn_device(Behavior::Silent).await;
    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_millis(200)));

    let err = transport.open(&addr.to_string()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_command_timeout_is_retryable() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_millis(300)));

    let handle = transport.open(&addr.to_string()).await.unwrap();
    let err = transport.send(handle, "slow").await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_late_reply_is_not_taken_for_the_next_command() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_millis(300)));

    let handle = transport.open(&addr.to_string()).await.unwrap();
    let err = transport.send(handle, "late").await.unwrap_err();
    assert!(err.is_transient(), "got: {err:?}");

    tokio::time::sleep(Duration::from_millis(400)).await;
    let version = transport.send(handle, "show version").await.unwrap();
    assert_eq!(version, "Cisco IOS Software, Fake Switch Software");

    let conf = transport.send(handle, "configure terminal").await.unwrap();
    assert!(conf.starts_with("Enter configuration commands"), "got: {conf:?}");
}

#[tokio::test]
async fn test_retry_while_late_reply_still_in_flight() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_millis(400)));

    let handle = transport.open(&addr.to_string()).await.unwrap();
    assert!(transport.send(handle, "late").await.is_err());

    // The late reply lands about 100 ms into this call.
    let version = transport.send(handle, "show version").await.unwrap();
    assert_eq!(version, "Cisco IOS Software, Fake Switch Software");
}

#[tokio::test]
async fn test_unreachable_address() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_secs(2)));
    let err = transport.open(&addr.to_string()).await.unwrap_err();
    assert!(matches!(err, Error::Unreachable { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_send_with_foreign_handle() {
    let addr = spawn_device(Behavior::Normal).await;
    let mut transport = VtyTransport::new(config(PASSWORD, Duration::from_secs(5)));
    let _handle = transport.open(&addr.to_string()).await.unwrap();

    let mut other = portsec_api::MockTransport::new();
    let foreign: SessionHandle = other.open("x").await.unwrap();

    assert!(matches!(
        transport.send(foreign, "show version").await,
        Err(Error::UnknownSession { .. })
    ));
}
