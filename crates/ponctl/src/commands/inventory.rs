//! `ponctl plan` and `ponctl capabilities`.

use std::sync::Arc;

use ponctl_core::{CapabilityEntry, ElementId, TransportDescriptor};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CapabilitiesArgs, PlanArgs};
use crate::error::CliError;
use crate::output;
use crate::runtime::Runtime;

// ── Plan ────────────────────────────────────────────────────────────

/// Serializable view of one plan entry; descriptors carry secrets.
#[derive(Serialize)]
struct PlanStep {
    order: usize,
    transport: String,
    endpoint: String,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    order: usize,
    #[tabled(rename = "Transport")]
    transport: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
}

fn step(order: usize, descriptor: &TransportDescriptor) -> PlanStep {
    PlanStep {
        order,
        transport: descriptor.kind().to_string(),
        endpoint: descriptor.endpoint(),
    }
}

pub fn plan(rt: &Runtime, args: &PlanArgs) -> Result<(), CliError> {
    let element = rt.element(&args.element)?;
    let plan = rt
        .dispatcher
        .plan(&ElementId::from(args.element.as_str()), args.via.map(Into::into))?;

    if !element.active {
        output::warn_line(
            &format!("warning: element '{}' is deactivated; dispatch will refuse it", element.id),
            rt.color,
        );
    }

    let steps: Vec<PlanStep> = plan
        .entries
        .iter()
        .enumerate()
        .map(|(i, d)| step(i + 1, d))
        .collect();
    let rendered = output::render_list(
        rt.format,
        &steps,
        |s| PlanRow {
            order: s.order,
            transport: s.transport.clone(),
            endpoint: s.endpoint.clone(),
        },
        |s| format!("{} {}", s.transport, s.endpoint),
    );
    rt.print(&rendered);
    Ok(())
}

// ── Capabilities ────────────────────────────────────────────────────

#[derive(Tabled)]
struct CapabilityRow {
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "SNMP")]
    snmp: &'static str,
    #[tabled(rename = "HTTP")]
    http: &'static str,
    #[tabled(rename = "API prefixes")]
    prefixes: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl From<&Arc<CapabilityEntry>> for CapabilityRow {
    fn from(e: &Arc<CapabilityEntry>) -> Self {
        Self {
            vendor: e.vendor.clone(),
            model: e.model.clone(),
            snmp: yes_no(e.supports_snmp),
            http: yes_no(e.supports_http),
            prefixes: e.http_api_prefixes.join(", "),
        }
    }
}

pub fn capabilities(rt: &Runtime, args: &CapabilitiesArgs) -> Result<(), CliError> {
    let entries: Vec<Arc<CapabilityEntry>> = rt
        .dispatcher
        .registry()
        .entries()
        .into_iter()
        .filter(|e| {
            args.vendor
                .as_deref()
                .is_none_or(|v| e.vendor.eq_ignore_ascii_case(v.trim()))
        })
        .collect();

    let rendered = output::render_list(
        rt.format,
        &entries,
        |e| CapabilityRow::from(e),
        |e| format!("{} {}", e.vendor, e.model),
    );
    rt.print(&rendered);
    Ok(())
}
