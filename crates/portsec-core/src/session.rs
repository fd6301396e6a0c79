// ── Switch session ──
//
// Owns the connection lifecycle to one switch. Every device-facing
// operation takes the same async mutex, so command sequences never
// interleave and concurrent callers queue instead of failing. The log store
// and the config snapshot are readable without that lock.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use strum::Display;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use portsec_api::{MockTransport, SessionHandle, Transport, VtyTransport};

use crate::command::{CommandOutput, PortSecurityRequest, Translator};
use crate::config::{SwitchConfig, SwitchMode};
use crate::error::CoreError;
use crate::model::{ExecutionResult, InterfaceName, LogEntry, PortSecurityAction, PortSecurityIntent};
use crate::store::LogStore;

/// Builds the transport for a connect attempt from the config at that time.
pub type TransportFactory = Arc<dyn Fn(&SwitchConfig) -> Box<dyn Transport> + Send + Sync>;

// ── SessionState ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// The open transport session and what was learned through it.
struct Link {
    transport: Box<dyn Transport>,
    handle: SessionHandle,
    address: String,
    mode: SwitchMode,
    interfaces: Option<Vec<InterfaceName>>,
}

impl Link {
    fn target(&self) -> String {
        match self.mode {
            SwitchMode::Mock => "mock switch".to_string(),
            SwitchMode::Real => format!("switch at {}", self.address),
        }
    }

    async fn close(mut self) {
        if let Err(e) = self.transport.close(self.handle).await {
            warn!(handle = %self.handle, error = %e, "transport close failed (non-fatal)");
        }
    }
}

// ── SwitchSession ────────────────────────────────────────────────

/// Explicitly owned session with one switch.
///
/// Cheaply cloneable via `Arc<SessionInner>`; clones share the connection,
/// config and log.
#[derive(Clone)]
pub struct SwitchSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: ArcSwap<SwitchConfig>,
    logs: Arc<LogStore>,
    translator: Translator,
    factory: TransportFactory,
    state: watch::Sender<SessionState>,
    link: Mutex<Option<Link>>,
}

/// Mock or vty transport, chosen by `config.mode`.
pub fn default_transport(config: &SwitchConfig) -> Box<dyn Transport> {
    match config.mode {
        SwitchMode::Mock => Box::new(MockTransport::new()),
        SwitchMode::Real => Box::new(VtyTransport::new(config.transport_config())),
    }
}

impl SwitchSession {
    /// Session with the default transports and the Cisco IOS command set.
    /// Does NOT connect.
    pub fn new(config: SwitchConfig) -> Self {
        Self::with_parts(
            config,
            Translator::default(),
            Arc::new(default_transport),
            Arc::new(LogStore::new()),
        )
    }

    /// Session whose transports come from `factory`.
    pub fn with_transport_factory<F>(config: SwitchConfig, factory: F) -> Self
    where
        F: Fn(&SwitchConfig) -> Box<dyn Transport> + Send + Sync + 'static,
    {
        Self::with_parts(
            config,
            Translator::default(),
            Arc::new(factory),
            Arc::new(LogStore::new()),
        )
    }

    pub fn with_parts(
        config: SwitchConfig,
        translator: Translator,
        factory: TransportFactory,
        logs: Arc<LogStore>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Self {
            inner: Arc::new(SessionInner {
                config: ArcSwap::from_pointee(config),
                logs,
                translator,
                factory,
                state,
                link: Mutex::new(None),
            }),
        }
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Open a session using the current config.
    ///
    /// Fails without side effects other than one Error log entry when a
    /// session is already open or the transport cannot open.
    pub async fn connect(&self) -> ExecutionResult {
        let mut link = self.inner.link.lock().await;

        if let Some(open) = link.as_ref() {
            let err = CoreError::AlreadyConnected {
                address: open.address.clone(),
            };
            self.inner.logs.error(err.to_string());
            return ExecutionResult::from_error(&err);
        }

        let config = self.inner.config.load_full();
        let mut transport = (self.inner.factory)(&config);
        debug!(mode = %config.mode, transport = %transport.kind(), address = %config.address, "connecting");

        match transport.open(&config.address).await {
            Ok(handle) => {
                let opened = Link {
                    transport,
                    handle,
                    address: config.address.clone(),
                    mode: config.mode,
                    interfaces: None,
                };
                let message = format!("Connected to {} ({} mode)", opened.target(), opened.mode);
                *link = Some(opened);
                self.inner.state.send_replace(SessionState::Connected);

                info!(%handle, mode = %config.mode, "switch session connected");
                self.inner.logs.info(&message);
                ExecutionResult::ok(message)
            }
            Err(e) => {
                let err = CoreError::ConnectionFailed {
                    address: config.address.clone(),
                    reason: e.to_string(),
                };
                warn!(error = %e, "connect failed");
                self.inner.logs.error(err.to_string());
                ExecutionResult::from_error(&err)
            }
        }
    }

    /// Close the session if one is open. Always succeeds.
    pub async fn disconnect(&self) -> ExecutionResult {
        let mut link = self.inner.link.lock().await;

        let message = match link.take() {
            Some(open) => {
                let message = format!("Disconnected from {}", open.target());
                open.close().await;
                self.inner.state.send_replace(SessionState::Disconnected);
                info!("switch session disconnected");
                message
            }
            None => "Disconnected (no active session)".to_string(),
        };
        self.inner.logs.info(&message);
        ExecutionResult::ok(message)
    }

    // ── Device operations ────────────────────────────────────────

    /// Interface names in device order. Cached until disconnect.
    pub async fn list_interfaces(&self) -> Result<Vec<InterfaceName>, CoreError> {
        let mut link = self.inner.link.lock().await;
        let open = link.as_mut().ok_or(CoreError::NotConnected)?;

        if let Some(cached) = &open.interfaces {
            return Ok(cached.clone());
        }

        match self
            .inner
            .translator
            .interfaces(open.transport.as_mut(), open.handle)
            .await
        {
            Ok(names) => {
                self.inner
                    .logs
                    .info(format!("Retrieved {} interfaces", names.len()));
                open.interfaces = Some(names.clone());
                Ok(names)
            }
            Err(e) => {
                self.inner.logs.error(format!("Failed to get interfaces: {e}"));
                Err(e)
            }
        }
    }

    /// Run a port-security intent. Appends exactly one log entry.
    pub async fn execute(&self, intent: &PortSecurityIntent) -> ExecutionResult {
        let mut link = self.inner.link.lock().await;

        let outcome = match link.as_mut() {
            None => Err(CoreError::NotConnected),
            Some(open) => {
                self.inner
                    .translator
                    .execute(open.transport.as_mut(), open.handle, intent)
                    .await
            }
        };

        match outcome {
            Ok(output) => {
                self.inner.logs.info(completed_message(intent));
                ExecutionResult::ok(render(&intent.action, output))
            }
            Err(e) => {
                debug!(error = ?e, "port-security action failed");
                self.inner.logs.error(format!("Action failed: {e}"));
                ExecutionResult::from_error(&e)
            }
        }
    }

    /// Validate a loose request, then [`execute`](Self::execute) it.
    pub async fn execute_request(&self, request: &PortSecurityRequest) -> ExecutionResult {
        match PortSecurityIntent::try_from(request) {
            Ok(intent) => self.execute(&intent).await,
            Err(e) => {
                self.inner.logs.error(format!("Action failed: {e}"));
                ExecutionResult::from_error(&e)
            }
        }
    }

    /// The device's own description (model, software version).
    pub async fn device_info(&self) -> ExecutionResult {
        let mut link = self.inner.link.lock().await;

        let outcome = match link.as_mut() {
            None => Err(CoreError::NotConnected),
            Some(open) => {
                self.inner
                    .translator
                    .version(open.transport.as_mut(), open.handle)
                    .await
            }
        };

        match outcome {
            Ok(text) => {
                self.inner.logs.info("Retrieved device information");
                ExecutionResult::ok(text)
            }
            Err(e) => {
                self.inner
                    .logs
                    .error(format!("Failed to get device information: {e}"));
                ExecutionResult::from_error(&e)
            }
        }
    }

    // ── Configuration ────────────────────────────────────────────

    /// Snapshot of the current config.
    pub fn config(&self) -> SwitchConfig {
        self.inner.config.load().as_ref().clone()
    }

    /// Replace the config. A mode change closes any open session first,
    /// so the next `connect` uses the new transport.
    pub async fn set_config(&self, config: SwitchConfig) {
        let mut link = self.inner.link.lock().await;
        let previous = self.inner.config.load_full();

        if previous.mode != config.mode {
            if let Some(open) = link.take() {
                let message = format!("Disconnected from {} (mode changed)", open.target());
                open.close().await;
                self.inner.state.send_replace(SessionState::Disconnected);
                self.inner.logs.info(message);
            }
            self.inner
                .logs
                .info(format!("Switched to {} mode", config.mode));
        }
        if previous.address != config.address {
            self.inner
                .logs
                .info(format!("Updated switch IP to {}", config.address));
        }

        debug!(mode = %config.mode, address = %config.address, "config updated");
        self.inner.config.store(Arc::new(config));
    }

    // ── State observation ────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        *self.inner.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Subscribe to connection state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    // ── Log access ───────────────────────────────────────────────

    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.logs.list()
    }

    pub fn recent_logs(&self, n: usize) -> Vec<LogEntry> {
        self.inner.logs.recent(n)
    }

    pub fn clear_logs(&self) {
        self.inner.logs.clear();
    }

    pub fn log_store(&self) -> &Arc<LogStore> {
        &self.inner.logs
    }
}

fn completed_message(intent: &PortSecurityIntent) -> String {
    let interface = &intent.interface;
    match intent.action {
        PortSecurityAction::Enable { .. } => format!("Enabled port security on {interface}"),
        PortSecurityAction::Disable => format!("Disabled port security on {interface}"),
        PortSecurityAction::Clear => format!("Cleared port security on {interface}"),
        PortSecurityAction::Status => format!("Retrieved status for {interface}"),
    }
}

/// Status shows the device report; changes lead with the acknowledgement.
fn render(action: &PortSecurityAction, output: CommandOutput) -> String {
    match action {
        PortSecurityAction::Status => output.transcript,
        _ if output.transcript.is_empty() => output.summary,
        _ => format!("{}\n{}", output.summary, output.transcript),
    }
}
