//! Port-security handlers: enable, disable, clear, status.
//!
//! Arguments are shaped into a `PortSecurityRequest` so the CLI and the
//! shell share one validation path inside the session.

use portsec_core::{PortSecurityRequest, SwitchSession, ViolationAction};

use crate::cli::{EnableArgs, GlobalOpts, InterfaceArgs};
use crate::error::CliError;
use crate::output;

use super::require_success;

pub async fn enable(session: &SwitchSession, args: EnableArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let request = PortSecurityRequest {
        interface: args.interface,
        action: "enable".into(),
        max_mac: args.max_mac,
        violation_action: args.violation.map(|v| ViolationAction::from(v).to_string()),
    };
    run(session, "Enable", &request, global).await
}

pub async fn disable(session: &SwitchSession, args: InterfaceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    run(session, "Disable", &simple(args, "disable"), global).await
}

pub async fn clear(session: &SwitchSession, args: InterfaceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    run(session, "Clear", &simple(args, "clear"), global).await
}

pub async fn status(session: &SwitchSession, args: InterfaceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    run(session, "Status", &simple(args, "status"), global).await
}

fn simple(args: InterfaceArgs, action: &str) -> PortSecurityRequest {
    PortSecurityRequest {
        interface: args.interface,
        action: action.into(),
        ..PortSecurityRequest::default()
    }
}

async fn run(
    session: &SwitchSession,
    label: &str,
    request: &PortSecurityRequest,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = require_success(label, session.execute_request(request).await)?;
    let out = output::render_single(&global.output, &result, |r| r.output.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
