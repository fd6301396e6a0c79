//! Interface listing.

use serde::Serialize;
use tabled::Tabled;

use portsec_core::SwitchSession;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct InterfaceRecord {
    index: usize,
    interface: String,
}

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Interface")]
    interface: String,
}

fn to_row(r: &InterfaceRecord) -> InterfaceRow {
    InterfaceRow {
        index: r.index,
        interface: r.interface.clone(),
    }
}

pub async fn handle(session: &SwitchSession, global: &GlobalOpts) -> Result<(), CliError> {
    let interfaces = session.list_interfaces().await?;
    let records: Vec<InterfaceRecord> = interfaces
        .iter()
        .enumerate()
        .map(|(i, name)| InterfaceRecord {
            index: i + 1,
            interface: name.to_string(),
        })
        .collect();

    let out = output::render_list(&global.output, &records, to_row, |r| r.interface.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
