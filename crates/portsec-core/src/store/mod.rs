// ── Operator log storage ──
//
// Bounded in-memory record of session events, readable while commands run.

mod log_store;

pub use log_store::{LOG_CAPACITY, LogStore};
