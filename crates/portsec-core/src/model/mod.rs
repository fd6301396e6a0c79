// ── Domain model ──
//
// Types the session hands to its callers. All of them serialize with the
// field names the request layer renders (`success`, `output`, `timestamp`,
// `level`, `message`).

pub mod intent;
pub mod log;
pub mod result;

// ── Re-exports ──────────────────────────────────────────────────────

pub use intent::{InterfaceName, PortSecurityAction, PortSecurityIntent, ViolationAction};
pub use log::{LogEntry, LogLevel};
pub use result::ExecutionResult;
