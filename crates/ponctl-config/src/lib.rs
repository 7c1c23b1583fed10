// ponctl-config: configuration loading and element inventory for ponctl
//
// Reads `config.toml` (platform config dir, overridable), merges defaults
// and `PONCTL_` environment variables, resolves credentials through
// env var → OS keyring → plaintext, and turns the result into the runtime
// types `ponctl-core` consumes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ponctl_api::snmp::DEFAULT_WALK_LIMIT;
use ponctl_api::{BasicAuth, SnmpCredentials, SnmpVersion, TlsMode};
use ponctl_core::{
    CapabilityRegistry, CoreError, DispatchPolicy, ElementConfig, HttpParams, OntKey, OntStore,
    RetryPolicy, SnmpParams, TransportKind, build_transport_plan,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keyring service name under which element secrets are stored.
pub const KEYRING_SERVICE: &str = "ponctl";

// ── Error type ──────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("No credentials for element '{element}' ({what})")]
    NoCredentials { element: String, what: String },

    #[error(transparent)]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Top-level config ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub dispatch: DispatchSection,

    #[serde(default)]
    pub audit: AuditSection,

    /// Extra capability rows merged over the built-in table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<PathBuf>,

    #[serde(default)]
    pub elements: BTreeMap<String, ElementSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}

fn default_color() -> String {
    "auto".into()
}

// ── Dispatch section ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSection {
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_retries")]
    pub retries_per_transport: u32,

    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Upper bound on bindings collected by one subtree walk.
    #[serde(default = "default_walk_limit")]
    pub walk_limit: usize,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: default_attempt_timeout_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retries_per_transport: default_retries(),
            max_in_flight: default_max_in_flight(),
            walk_limit: default_walk_limit(),
        }
    }
}

fn default_attempt_timeout_ms() -> u64 {
    5_000
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_retries() -> u32 {
    1
}

fn default_max_in_flight() -> usize {
    32
}

fn default_walk_limit() -> usize {
    DEFAULT_WALK_LIMIT
}

// ── Audit section ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSection {
    /// JSON-lines file; defaults to `audit.jsonl` in the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ── Element sections ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vendor: String,
    pub model: String,
    pub address: String,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer: Option<TransportKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmp: Option<SnmpSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpSection>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub onts: Vec<OntSection>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpSection {
    #[serde(default = "default_snmp_version")]
    pub version: SnmpVersion,

    #[serde(default = "default_snmp_port")]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_env: Option<String>,

    /// v3 security name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_passphrase_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_passphrase_env: Option<String>,
}

fn default_snmp_version() -> SnmpVersion {
    SnmpVersion::V2c
}

fn default_snmp_port() -> u16 {
    SnmpParams::DEFAULT_PORT
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(default)]
    pub insecure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

/// An ONT registered on one PON interface of the element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntSection {
    pub serial: String,
    pub interface: u32,
    pub ont_id: u32,
    /// Start held in maintenance.
    #[serde(default)]
    pub maintenance: bool,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ponctl", "ponctl")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the JSON-lines audit log.
pub fn default_audit_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("audit.jsonl"),
        |dirs| dirs.data_dir().join("audit.jsonl"),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("ponctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment overrides use `__` as the nesting separator, e.g.
/// `PONCTL_DISPATCH__RETRIES_PER_TRANSPORT=3`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading configuration");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PONCTL_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve one secret: named env var, then the OS keyring entry
/// `ponctl / {account}`, then the plaintext value from the file.
pub fn resolve_secret(
    env_name: Option<&str>,
    account: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Env var
    if let Some(name) = env_name {
        if let Ok(val) = std::env::var(name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, account) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    plaintext.map(|s| SecretString::from(s.to_owned()))
}

fn snmp_params(id: &str, section: &SnmpSection) -> Result<SnmpParams, ConfigError> {
    let credentials = match section.version {
        SnmpVersion::V1 | SnmpVersion::V2c => {
            let community = resolve_secret(
                section.community_env.as_deref(),
                &format!("{id}/community"),
                section.community.as_deref(),
            )
            .unwrap_or_else(|| SecretString::from("public"));
            SnmpCredentials::Community {
                version: section.version,
                community,
            }
        }
        SnmpVersion::V3 => {
            let username = section.user.clone().ok_or_else(|| ConfigError::NoCredentials {
                element: id.into(),
                what: "snmp v3 user".into(),
            })?;
            SnmpCredentials::Usm {
                username,
                auth_passphrase: resolve_secret(
                    section.auth_passphrase_env.as_deref(),
                    &format!("{id}/auth-passphrase"),
                    section.auth_passphrase.as_deref(),
                ),
                privacy_passphrase: resolve_secret(
                    section.privacy_passphrase_env.as_deref(),
                    &format!("{id}/privacy-passphrase"),
                    section.privacy_passphrase.as_deref(),
                ),
            }
        }
    };
    Ok(SnmpParams {
        port: section.port,
        credentials,
    })
}

fn http_params(id: &str, section: &HttpSection) -> Result<HttpParams, ConfigError> {
    let base_url = section
        .base_url
        .as_deref()
        .map(|raw| {
            raw.parse::<url::Url>()
                .map_err(|e| invalid(format!("elements.{id}.http.base_url"), format!("{raw}: {e}")))
        })
        .transpose()?;

    let auth = match section.username {
        Some(ref username) => {
            let password = resolve_secret(
                section.password_env.as_deref(),
                &format!("{id}/password"),
                section.password.as_deref(),
            )
            .ok_or_else(|| ConfigError::NoCredentials {
                element: id.into(),
                what: "http password".into(),
            })?;
            Some(BasicAuth {
                username: username.clone(),
                password,
            })
        }
        None => None,
    };

    let tls = if section.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = section.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(HttpParams {
        base_url,
        auth,
        tls,
    })
}

// ── Conversions into runtime types ──────────────────────────────────

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.attempt_timeout_ms == 0 {
            return Err(invalid("dispatch.attempt_timeout_ms", "must be greater than zero"));
        }
        if self.dispatch.max_in_flight == 0 {
            return Err(invalid("dispatch.max_in_flight", "must be greater than zero"));
        }
        if self.dispatch.walk_limit == 0 {
            return Err(invalid("dispatch.walk_limit", "must be greater than zero"));
        }
        for (id, element) in &self.elements {
            for (field, value) in [
                ("vendor", &element.vendor),
                ("model", &element.model),
                ("address", &element.address),
            ] {
                if value.trim().is_empty() {
                    return Err(invalid(format!("elements.{id}.{field}"), "must not be empty"));
                }
            }
        }
        Ok(())
    }

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            attempt_timeout: Duration::from_millis(self.dispatch.attempt_timeout_ms),
            retry: RetryPolicy {
                retries: self.dispatch.retries_per_transport,
                backoff: Duration::from_millis(self.dispatch.retry_backoff_ms),
            },
            max_in_flight: self.dispatch.max_in_flight,
        }
    }

    pub fn audit_path(&self) -> PathBuf {
        self.audit.path.clone().unwrap_or_else(default_audit_path)
    }

    /// Built-in capability table, merged with the configured overrides.
    pub fn registry(&self) -> Result<CapabilityRegistry, ConfigError> {
        let registry = match self.capabilities {
            Some(ref path) => CapabilityRegistry::with_overrides(path)?,
            None => CapabilityRegistry::builtin()?,
        };
        Ok(registry)
    }

    /// Build the runtime record for one configured element.
    pub fn element(&self, id: &str) -> Result<ElementConfig, ConfigError> {
        let section = self.elements.get(id).ok_or_else(|| CoreError::ElementNotFound {
            identifier: id.into(),
        })?;

        let mut element = ElementConfig::new(
            id,
            section.vendor.trim(),
            section.model.trim(),
            section.address.trim(),
        );
        if let Some(ref name) = section.name {
            element.name.clone_from(name);
        }
        element.active = section.active;
        element.preferred_transport = section.prefer;
        element.snmp = section.snmp.as_ref().map(|s| snmp_params(id, s)).transpose()?;
        element.http = section.http.as_ref().map(|h| http_params(id, h)).transpose()?;
        Ok(element)
    }

    /// Every configured element, in id order.
    ///
    /// Active elements must resolve to at least one transport under
    /// `registry`; an HTTP-only model needs a usable gateway URL.
    pub fn elements(
        &self,
        registry: &CapabilityRegistry,
    ) -> Result<Vec<ElementConfig>, ConfigError> {
        self.elements
            .keys()
            .map(|id| {
                let element = self.element(id)?;
                if element.active && build_transport_plan(registry, &element, None).is_empty() {
                    return Err(invalid(
                        format!("elements.{id}.address"),
                        format!(
                            "no usable transport for {} {}; set http.base_url or a host address",
                            element.vendor, element.model
                        ),
                    ));
                }
                Ok(element)
            })
            .collect()
    }

    /// Register the configured ONTs; returns how many were added.
    pub fn register_onts(&self, store: &OntStore) -> Result<usize, ConfigError> {
        let mut count = 0;
        for (id, section) in &self.elements {
            for ont in &section.onts {
                let key = OntKey::new(id.as_str(), ont.interface, ont.ont_id);
                store.register(key.clone(), &ont.serial);
                if ont.maintenance {
                    store.set_maintenance(&key, true)?;
                }
                count += 1;
            }
        }
        Ok(count)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use ponctl_core::OntStatus;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
        [dispatch]
        attempt_timeout_ms = 2000
        retries_per_transport = 2

        [audit]
        path = "audit/ops.jsonl"

        [elements.olt-cwb-01]
        name = "Curitiba core"
        vendor = "Huawei"
        model = "MA5800-X7"
        address = "10.20.0.11"
        prefer = "snmp"

        [elements.olt-cwb-01.snmp]
        community = "noc"
        port = 1161

        [elements.olt-cwb-01.http]
        base_url = "https://10.20.0.11:8443"
        username = "noc"
        password = "hunter2"
        insecure = true

        [[elements.olt-cwb-01.onts]]
        serial = "HWTC1F2A3B4C"
        interface = 4194312192
        ont_id = 3

        [[elements.olt-cwb-01.onts]]
        serial = "HWTC5D6E7F80"
        interface = 4194312192
        ont_id = 4
        maintenance = true

        [elements.olt-poa-02]
        vendor = "zte"
        model = "C300"
        address = "10.30.0.5"
        active = false
    "#;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("missing.toml")).unwrap();
            assert_eq!(cfg.dispatch_policy(), DispatchPolicy::default());
            assert_eq!(cfg.dispatch.walk_limit, DEFAULT_WALK_LIMIT);
            assert!(cfg.elements.is_empty());
            assert_eq!(cfg.defaults.output, "table");
            Ok(())
        });
    }

    #[test]
    fn test_dispatch_section_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("PONCTL_DISPATCH__MAX_IN_FLIGHT", "4");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let policy = cfg.dispatch_policy();
            assert_eq!(policy.attempt_timeout, Duration::from_secs(2));
            assert_eq!(policy.retry.retries, 2);
            assert_eq!(policy.retry.backoff, Duration::from_millis(250));
            assert_eq!(policy.max_in_flight, 4);
            assert_eq!(cfg.audit_path(), PathBuf::from("audit/ops.jsonl"));
            Ok(())
        });
    }

    #[test]
    fn test_element_conversion() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            let olt = cfg.element("olt-cwb-01").unwrap();
            assert_eq!(olt.name, "Curitiba core");
            assert_eq!(olt.vendor, "Huawei");
            assert_eq!(olt.preferred_transport, Some(TransportKind::Snmp));

            let snmp = olt.snmp.unwrap();
            assert_eq!(snmp.port, 1161);
            match snmp.credentials {
                SnmpCredentials::Community { version, community } => {
                    assert_eq!(version, SnmpVersion::V2c);
                    assert_eq!(community.expose_secret(), "noc");
                }
                SnmpCredentials::Usm { .. } => panic!("expected community credentials"),
            }

            let http = olt.http.unwrap();
            assert_eq!(http.base_url.unwrap().as_str(), "https://10.20.0.11:8443/");
            assert_eq!(http.tls, TlsMode::DangerAcceptInvalid);
            assert_eq!(http.auth.unwrap().password.expose_secret(), "hunter2");

            let zte = cfg.element("olt-poa-02").unwrap();
            assert!(!zte.active);
            assert!(zte.snmp.is_none());
            assert!(zte.http.is_none());
            assert_eq!(zte.name, "olt-poa-02");
            Ok(())
        });
    }

    #[test]
    fn test_env_secret_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [elements.olt-a]
                vendor = "zte"
                model = "C600"
                address = "olt-a.lab"

                [elements.olt-a.http]
                username = "admin"
                password = "from-file"
                password_env = "OLT_A_PASSWORD"
                "#,
            )?;
            jail.set_env("OLT_A_PASSWORD", "from-env");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let http = cfg.element("olt-a").unwrap().http.unwrap();
            assert_eq!(http.auth.unwrap().password.expose_secret(), "from-env");
            assert!(http.base_url.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_snmp_v3_requires_user() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [elements.olt-a]
                vendor = "huawei"
                model = "MA5683T"
                address = "10.0.0.1"

                [elements.olt-a.snmp]
                version = "v3"
                "#,
            )?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let err = cfg.element("olt-a").unwrap_err();
            assert!(matches!(err, ConfigError::NoCredentials { .. }), "got: {err:?}");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_base_url_is_validation_error() {
        let section = HttpSection {
            base_url: Some("not a url".into()),
            ..HttpSection::default()
        };
        let err = http_params("olt-a", &section).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "elements.olt-a.http.base_url"));
    }

    #[test]
    fn test_empty_vendor_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [elements.olt-a]
                vendor = " "
                model = "C300"
                address = "10.0.0.1"
                "#,
            )?;
            let err = load_config_from(Path::new("config.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }), "got: {err:?}");
            Ok(())
        });
    }

    #[test]
    fn test_register_onts() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let store = OntStore::new();

            assert_eq!(cfg.register_onts(&store).unwrap(), 2);
            let state = store.get(&OntKey::new("olt-cwb-01", 4_194_312_192, 3)).unwrap();
            assert_eq!(state.serial, "HWTC1F2A3B4C");
            assert_eq!(state.status, OntStatus::Unknown);
            let held = store.get(&OntKey::new("olt-cwb-01", 4_194_312_192, 4)).unwrap();
            assert_eq!(held.status, OntStatus::Maintenance);
            Ok(())
        });
    }

    #[test]
    fn test_http_only_element_needs_usable_gateway() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [elements.olt-rack2]
                vendor = "vsol"
                model = "V1600G"
                address = "olt v1600 rack2"

                [elements.olt-rack3]
                vendor = "vsol"
                model = "V1600G"
                address = "olt v1600 rack3"
                active = false
                "#,
            )?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let registry = cfg.registry().unwrap();
            match cfg.elements(&registry) {
                Err(ConfigError::Validation { field, .. }) => {
                    assert_eq!(field, "elements.olt-rack2.address");
                }
                other => panic!("expected validation error, got: {other:?}"),
            }

            jail.create_file(
                "config.toml",
                r#"
                [elements.olt-rack2]
                vendor = "vsol"
                model = "V1600G"
                address = "olt v1600 rack2"

                [elements.olt-rack2.http]
                base_url = "https://10.40.0.2:8443"
                "#,
            )?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let elements = cfg.elements(&registry).unwrap();
            assert_eq!(elements.len(), 1);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_element_is_not_found() {
        let err = Config::default().element("nope").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Core(CoreError::ElementNotFound { .. })
        ));
    }

    #[test]
    fn test_capability_overrides_merge() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "extra.toml",
                r#"
                [[model]]
                vendor = "nokia"
                model = "ISAM FX-8"
                snmp = true
                http = false
                "#,
            )?;
            jail.create_file("config.toml", r#"capabilities = "extra.toml""#)?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let registry = cfg.registry().unwrap();
            assert!(registry.is_known("nokia", "ISAM FX-8"));
            assert!(registry.is_known("huawei", "MA5800-X7"));
            Ok(())
        });
    }
}
