//! Operation commands: read, walk, set, invoke.

use ponctl_core::{Binding, OperationRequest, OperationResult, Outcome, TransportKind, Value};
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use crate::cli::{InvokeArgs, OutputFormat, ReadArgs, SetArgs, Via, WalkArgs};
use crate::error::CliError;
use crate::output;
use crate::runtime::Runtime;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BindingRow {
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&Binding> for BindingRow {
    fn from(b: &Binding) -> Self {
        Self {
            identifier: b.identifier.clone(),
            kind: b.kind.to_string(),
            value: b.value.to_string(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn read(rt: &Runtime, args: ReadArgs) -> Result<(), CliError> {
    let request = with_via(OperationRequest::read(args.element.as_str(), args.oid), args.via);
    let result = run(rt, request).await;
    report(rt, &args.element, &result)
}

pub async fn walk(rt: &Runtime, args: WalkArgs) -> Result<(), CliError> {
    let request = with_via(
        OperationRequest::enumerate(args.element.as_str(), args.root),
        args.via,
    );
    let result = run(rt, request).await;
    report(rt, &args.element, &result)
}

pub async fn set(rt: &Runtime, args: SetArgs) -> Result<(), CliError> {
    let value = Value::parse_as(args.kind, &args.value).map_err(|reason| CliError::Validation {
        field: "value".into(),
        reason,
    })?;
    let request = with_via(
        OperationRequest::write(args.element.as_str(), args.oid, value),
        args.via,
    );
    let result = run(rt, request).await;
    report(rt, &args.element, &result)
}

pub async fn invoke(rt: &Runtime, args: InvokeArgs) -> Result<(), CliError> {
    let payload = match (args.body, args.body_file) {
        (Some(inline), _) => Some(serde_json::from_str(&inline)?),
        (None, Some(path)) => {
            let raw = tokio::fs::read_to_string(&path).await?;
            Some(serde_json::from_str(&raw)?)
        }
        (None, None) => None,
    };
    let request = OperationRequest::invoke(args.element.as_str(), args.method, args.path, payload);
    let result = run(rt, request).await;
    report(rt, &args.element, &result)
}

// ── Helpers ─────────────────────────────────────────────────────────

fn with_via(request: OperationRequest, via: Option<Via>) -> OperationRequest {
    match via {
        Some(via) => request.via(TransportKind::from(via)),
        None => request,
    }
}

/// Dispatch with Ctrl-C wired to cancellation; the cancelled outcome is
/// still audited.
async fn run(rt: &Runtime, request: OperationRequest) -> OperationResult {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    let result = rt.dispatcher.dispatch_with_cancel(request, &cancel).await;
    watcher.abort();
    result
}

fn report(rt: &Runtime, element: &str, result: &OperationResult) -> Result<(), CliError> {
    let structured = !matches!(rt.format, OutputFormat::Table | OutputFormat::Plain);
    if structured {
        rt.print(&output::render_single(
            rt.format,
            result,
            |_| String::new(),
            |_| String::new(),
        ));
    }

    match result.outcome {
        Outcome::Success {
            ref bindings,
            ref incomplete,
        } => {
            if let Some(reason) = incomplete {
                output::warn_line(
                    &format!("warning: enumeration stopped early: {reason}"),
                    rt.color,
                );
            }
            if !structured {
                rt.print(&output::render_list(
                    rt.format,
                    bindings,
                    |b| BindingRow::from(b),
                    |b| format!("{} = {}", b.identifier, b.value),
                ));
            }
            Ok(())
        }
        Outcome::Failure { class, ref detail } => Err(CliError::OperationFailed {
            element: element.to_owned(),
            class,
            detail: detail.clone(),
        }),
    }
}
