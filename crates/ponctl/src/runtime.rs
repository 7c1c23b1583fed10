//! Wires the loaded configuration into a ready-to-use dispatcher.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ponctl_api::{
    Error as ApiError, MibTable, Oid, SnmpSession, SnmpTarget, SnmpValue, TransportConfig, VarBind,
};
use ponctl_config::Config;
use ponctl_core::{
    Dispatcher, ElementConfig, ElementId, ElementStore, HttpBackend, JsonlAuditLog, OntStore,
    SnmpBackend,
};
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Everything a command handler needs.
pub struct Runtime {
    pub dispatcher: Dispatcher,
    pub elements: Arc<ElementStore>,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Runtime {
    /// Configured element, or a not-found error naming the config file.
    pub fn element(&self, id: &str) -> Result<Arc<ElementConfig>, CliError> {
        self.elements
            .get(&ElementId::from(id))
            .ok_or_else(|| CliError::ElementNotFound {
                identifier: id.into(),
                config: ponctl_config::config_path().display().to_string(),
            })
    }

    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.quiet);
    }
}

fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let config = match global.config {
        Some(ref path) => ponctl_config::load_config_from(path)?,
        None => ponctl_config::load_config()?,
    };
    Ok(config)
}

/// Output format from the flag, else the config default, else table.
fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    use clap::ValueEnum;

    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

pub fn build(global: &GlobalOpts) -> Result<Runtime, CliError> {
    let config = load(global)?;

    let registry = Arc::new(config.registry()?);
    let elements = Arc::new(ElementStore::from_elements(config.elements(&registry)?));
    let onts = OntStore::shared();
    let registered = config.register_onts(&onts)?;

    let mut policy = config.dispatch_policy();
    if let Some(timeout) = global.timeout {
        policy.attempt_timeout = timeout;
    }

    let session: Arc<dyn SnmpSession> = match global.mib_snapshot {
        Some(ref path) => Arc::new(load_snapshot(path)?),
        None => Arc::new(NoSnmpCodec),
    };
    let audit_path = global
        .audit_log
        .clone()
        .unwrap_or_else(|| config.audit_path());

    debug!(
        elements = elements.len(),
        onts = registered,
        audit = %audit_path.display(),
        "runtime ready"
    );

    let dispatcher = Dispatcher::builder(registry, elements.clone())
        .backend(Arc::new(
            SnmpBackend::new(session).with_walk_limit(config.dispatch.walk_limit),
        ))
        .backend(Arc::new(HttpBackend::new(TransportConfig::default())))
        .audit_log(Arc::new(JsonlAuditLog::new(audit_path)))
        .ont_store(onts)
        .policy(policy)
        .build();

    Ok(Runtime {
        format: output_format(global, &config),
        color: output::should_color(global.color),
        quiet: global.quiet,
        dispatcher,
        elements,
    })
}

fn load_snapshot(path: &Path) -> Result<MibTable, CliError> {
    MibTable::load(path).map_err(|e| CliError::MibSnapshot {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

// ── SNMP without a codec ─────────────────────────────────────────────

/// Stand-in session when no MIB snapshot is given. Every request is
/// refused as unsupported, so reads fail over to HTTP where the model
/// allows it.
struct NoSnmpCodec;

const NO_CODEC: &str = "no SNMP codec is linked into this build; use --mib-snapshot";

#[async_trait]
impl SnmpSession for NoSnmpCodec {
    async fn get(&self, _target: &SnmpTarget, _oid: &Oid) -> Result<SnmpValue, ApiError> {
        Err(ApiError::UnsupportedOperation(NO_CODEC))
    }

    async fn get_next(&self, _target: &SnmpTarget, _oid: &Oid) -> Result<VarBind, ApiError> {
        Err(ApiError::UnsupportedOperation(NO_CODEC))
    }

    async fn set(
        &self,
        _target: &SnmpTarget,
        _oid: &Oid,
        _value: SnmpValue,
    ) -> Result<(), ApiError> {
        Err(ApiError::UnsupportedOperation(NO_CODEC))
    }
}
