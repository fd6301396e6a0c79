//! Switch model and software version.

use portsec_core::SwitchSession;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::require_success;

pub async fn handle(session: &SwitchSession, global: &GlobalOpts) -> Result<(), CliError> {
    let result = require_success("Device info", session.device_info().await)?;
    let out = output::render_single(&global.output, &result, |r| r.output.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
