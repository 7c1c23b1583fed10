//! `ponctl onts`: projected ONT state for one element.

use ponctl_core::{ElementId, MonitoredAttributes, OntState, OperationRequest, Reading};
use tabled::Tabled;
use tracing::debug;

use crate::cli::OntsArgs;
use crate::error::CliError;
use crate::output;
use crate::runtime::Runtime;

#[derive(Tabled)]
struct OntRow {
    #[tabled(rename = "Interface")]
    interface: u32,
    #[tabled(rename = "ONT")]
    ont_id: u32,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Rx dBm")]
    rx_power: String,
    #[tabled(rename = "Tx dBm")]
    tx_power: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Volt")]
    voltage: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

fn reading(r: Option<&Reading>) -> String {
    r.map_or_else(|| "-".into(), |r| format!("{:.2}", r.value))
}

impl From<&OntState> for OntRow {
    fn from(s: &OntState) -> Self {
        Self {
            interface: s.key.interface,
            ont_id: s.key.ont_id,
            serial: s.serial.clone(),
            status: s.status.to_string(),
            rx_power: reading(s.rx_power.as_ref()),
            tx_power: reading(s.tx_power.as_ref()),
            temperature: reading(s.temperature.as_ref()),
            voltage: reading(s.voltage.as_ref()),
            last_seen: s
                .last_seen
                .map_or_else(|| "never".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

pub async fn handle(rt: &Runtime, args: OntsArgs) -> Result<(), CliError> {
    let element = rt.element(&args.element)?;

    if args.refresh {
        refresh(rt, &element.id, &element.vendor).await;
    }

    let states = rt.dispatcher.ont_state(&element.id);
    let rendered = output::render_list(
        rt.format,
        &states,
        |s| OntRow::from(s),
        |s| format!("{} {} {}", s.key, s.serial, s.status),
    );
    rt.print(&rendered);
    Ok(())
}

/// Walk every monitored column the vendor exposes. Successful walks are
/// projected by the dispatcher; failures are reported but not fatal.
async fn refresh(rt: &Runtime, element: &ElementId, vendor: &str) {
    let attributes = MonitoredAttributes::builtin();
    let mut columns = 0;
    for attribute in attributes.for_vendor(vendor) {
        columns += 1;
        let request = OperationRequest::enumerate(element.clone(), attribute.column.to_string());
        let result = rt.dispatcher.dispatch(request).await;
        if let (Some(class), Some(detail)) = (result.error_class(), result.detail()) {
            output::warn_line(
                &format!("warning: {} ({class}): {detail}", attribute.name),
                rt.color,
            );
        }
    }
    if columns == 0 {
        output::warn_line(
            &format!("warning: no monitored ONT columns are known for vendor '{vendor}'"),
            rt.color,
        );
    }
    debug!(%element, columns, "ONT refresh finished");
}
