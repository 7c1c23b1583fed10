//! `ponctl audit`: query the operation audit log.

use chrono::{DateTime, Utc};
use ponctl_core::{AuditLogEntry, AuditQuery, ElementId};
use tabled::Tabled;

use crate::cli::AuditArgs;
use crate::error::CliError;
use crate::output;
use crate::runtime::Runtime;

#[derive(Tabled)]
struct AuditRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Via")]
    transport: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Tries")]
    attempts: u32,
    #[tabled(rename = "ms")]
    latency_ms: u64,
}

fn row(entry: &AuditLogEntry, color: bool) -> AuditRow {
    AuditRow {
        time: entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        element: entry.element_id.to_string(),
        operation: entry.operation.to_string(),
        target: entry.target.clone(),
        transport: entry
            .transport
            .map_or_else(|| "-".into(), |t| t.to_string()),
        status: output::paint_status(entry.status, color),
        class: entry
            .error_class
            .map_or_else(|| "-".into(), |c| c.to_string()),
        attempts: entry.attempts,
        latency_ms: entry.latency_ms,
    }
}

pub async fn handle(rt: &Runtime, args: AuditArgs) -> Result<(), CliError> {
    let query = AuditQuery {
        element_id: args.element.map(ElementId::from),
        since: args
            .since
            .as_deref()
            .map(|raw| parse_since(raw, Utc::now()))
            .transpose()?,
        limit: args.limit,
    };
    let entries = rt.dispatcher.query_audit_log(&query).await?;

    let rendered = output::render_list(
        rt.format,
        &entries,
        |e| row(e, rt.color),
        |e| {
            format!(
                "{} {} {} {} {}",
                e.timestamp.to_rfc3339(),
                e.element_id,
                e.operation,
                e.target,
                e.status
            )
        },
    );
    rt.print(&rendered);
    Ok(())
}

/// Accept an RFC 3339 instant or a look-back duration (`90s`, `2h`).
fn parse_since(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, CliError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let invalid = |reason: String| CliError::Validation {
        field: "since".into(),
        reason,
    };
    let lookback = humantime::parse_duration(raw)
        .map_err(|e| invalid(format!("'{raw}' is neither a duration nor an RFC 3339 time: {e}")))?;
    let lookback = chrono::Duration::from_std(lookback).map_err(|e| invalid(e.to_string()))?;
    now.checked_sub_signed(lookback)
        .ok_or_else(|| invalid(format!("'{raw}' reaches too far back")))
}
