// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Runtime settings and zone configuration.
//!
//! Settings are assembled once at startup from command-line flags (with
//! environment fallbacks) and from `ZONE_<ID>_<FIELD>` environment variables,
//! then passed by reference into the refresh pipeline. Nothing below the
//! binary entry point reads the process environment.
//!
//! # Zone variables
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `ZONE_<ID>_IFACE` | yes | Firewall interface description (e.g., `LAN`) |
//! | `ZONE_<ID>_DOMAIN` | yes | Zone domain (e.g., `lan.example.com.`) |
//! | `ZONE_<ID>_SOA_PRIMARY` | yes | Primary name server |
//! | `ZONE_<ID>_SOA_RESPONSIBLE` | yes | Responsible person mailbox |
//! | `ZONE_<ID>_NS` | yes | Comma-separated name servers |
//! | `ZONE_<ID>_TYPE` | no | `default` (forward) or `rdns` (reverse) |
//! | `ZONE_<ID>_STATIC_ONLY` | no | `true` to ignore dynamic leases |
//! | `ZONE_<ID>_INCLUDE` | no | Forward zones: `hostname`, `mac` (default both) |
//! | `ZONE_<ID>_PREFIX` | reverse | Reverse zones: subnet prefix (e.g., `10.0.`) |
//! | `RECORD_TTL` | no | TTL for every zone (default 300) |
//!
//! # Example
//!
//! ```rust
//! use hibiscus::config::{parse_zone_configurations, ZoneKind};
//! use std::path::Path;
//!
//! let vars = [
//!     ("ZONE_LAN_IFACE", "LAN"),
//!     ("ZONE_LAN_DOMAIN", "lan.example.com."),
//!     ("ZONE_LAN_SOA_PRIMARY", "ns1.example.com."),
//!     ("ZONE_LAN_SOA_RESPONSIBLE", "hostmaster.example.com."),
//!     ("ZONE_LAN_NS", "ns1.example.com.,ns2.example.com."),
//! ];
//!
//! let zones = parse_zone_configurations(vars, Path::new("/var/lib/bind")).unwrap();
//! assert_eq!(zones[0].key, "LAN");
//! assert!(matches!(zones[0].kind, ZoneKind::Default { .. }));
//! ```

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::constants::{
    DEFAULT_RECORD_TTL_SECS, DEFAULT_ZONE_INCLUDE, IN_ADDR_ARPA, RECORD_TTL_ENV, ZONEFILE_PREFIX,
    ZONE_ENV_PREFIX,
};
use crate::errors::ConfigError;

/// Generate BIND zonefiles from OPNsense DHCP leases.
#[derive(Parser, Debug, Clone)]
#[command(name = "hibiscus")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Directory zonefiles are written to.
    #[arg(long, env = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Refresh interval in seconds. Without it a single refresh is performed.
    #[arg(long, env = "REFRESH_INTERVAL")]
    pub refresh_interval: Option<u64>,

    /// OPNsense API base URL (e.g., `https://fw.example.com/api`).
    #[arg(long, env = "OPNSENSE_URL")]
    pub opnsense_url: String,

    /// OPNsense API key.
    #[arg(long, env = "OPNSENSE_API_KEY", hide_env_values = true)]
    pub opnsense_api_key: String,

    /// OPNsense API secret.
    #[arg(long, env = "OPNSENSE_API_SECRET", hide_env_values = true)]
    pub opnsense_api_secret: String,

    /// Healthchecks.io-compatible ping URL, reported around every refresh.
    #[arg(long, env = "HEALTHCHECKS_URL")]
    pub healthchecks_url: Option<String>,

    /// Address to serve Prometheus metrics on (e.g., `0.0.0.0:9100`).
    #[arg(long, env = "METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// OPNsense API connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpnsenseSettings {
    /// API base URL without trailing slash
    pub url: String,
    /// API key
    pub api_key: String,
    /// API secret
    pub api_secret: String,
}

impl std::fmt::Debug for OpnsenseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpnsenseSettings")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Fully validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory zonefiles are written to
    pub out_dir: PathBuf,
    /// Interval between refreshes; `None` runs a single refresh
    pub refresh_interval: Option<Duration>,
    /// Zones to generate
    pub zones: Vec<ZoneConfig>,
    /// Lease provider connection
    pub opnsense: OpnsenseSettings,
    /// Health check ping URL without trailing slash
    pub healthchecks_url: Option<String>,
    /// Metrics listen address
    pub metrics_addr: Option<SocketAddr>,
}

impl Settings {
    /// Validate command-line arguments and parse zone definitions.
    ///
    /// # Arguments
    ///
    /// * `args` - Parsed command-line arguments
    /// * `vars` - Environment variables holding the zone definitions
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid setting found.
    pub fn load<I, K, V>(args: CliArgs, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let out_dir = validate_output_dir(&args.out_dir)?;

        let refresh_interval = match args.refresh_interval {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    name: "REFRESH_INTERVAL".to_string(),
                    reason: "must be a positive number of seconds".to_string(),
                })
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let opnsense = OpnsenseSettings {
            url: validate_http_url("OPNSENSE_URL", &args.opnsense_url)?,
            api_key: args.opnsense_api_key,
            api_secret: args.opnsense_api_secret,
        };

        let healthchecks_url = args
            .healthchecks_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| validate_http_url("HEALTHCHECKS_URL", url))
            .transpose()?;

        let zones = parse_zone_configurations(vars, &out_dir)?;

        Ok(Self {
            out_dir,
            refresh_interval,
            zones,
            opnsense,
            healthchecks_url,
            metrics_addr: args.metrics_addr,
        })
    }
}

/// Start of Authority metadata for a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaConfig {
    /// Name servers announced with NS records, in order
    pub name_servers: Vec<String>,
    /// Mailbox of the person responsible for the zone, in DNS notation
    pub person: String,
    /// Primary name server
    pub primary_ns: String,
}

/// Record sources enabled for a forward zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordToggles {
    /// Emit A records named after lease hostnames
    pub include_hostname: bool,
    /// Emit A records named after canonical MAC addresses
    pub include_mac: bool,
}

/// Kind-specific part of a zone configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ZoneKind {
    /// Forward zone with A records
    Default {
        /// Enabled record sources
        records: RecordToggles,
    },
    /// Reverse zone with PTR records
    Reverse {
        /// Dotted numeric subnet prefix with trailing dot (e.g., `10.0.`)
        ptr_subnet: String,
    },
}

/// Immutable description of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneConfig {
    /// Zone domain, fully qualified with trailing dot
    pub domain: String,
    /// `$ORIGIN` of the rendered zonefile, without trailing dot
    pub origin: String,
    /// Firewall interface whose leases feed this zone
    pub firewall_interface: String,
    /// Unique identifier of the zone in the configuration
    pub key: String,
    /// Zonefile location
    pub output_path: PathBuf,
    /// SOA metadata
    pub soa: SoaConfig,
    /// Default TTL in seconds
    pub ttl: u32,
    /// Ignore dynamic leases entirely
    pub static_only: bool,
    /// Forward or reverse zone specifics
    pub kind: ZoneKind,
}

impl ZoneConfig {
    /// Short label for the zone kind, used in logs and metrics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ZoneKind::Default { .. } => "default",
            ZoneKind::Reverse { .. } => "reverse",
        }
    }
}

/// Parse all zone configurations from `ZONE_<ID>_<FIELD>` variables.
///
/// Zones are returned sorted by ID. Variables not following the naming
/// scheme are ignored.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any zone is missing a required variable or
/// carries an invalid value.
pub fn parse_zone_configurations<I, K, V>(
    vars: I,
    out_dir: &Path,
) -> Result<Vec<ZoneConfig>, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: BTreeMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let ttl = match vars.get(RECORD_TTL_ENV) {
        None => DEFAULT_RECORD_TTL_SECS,
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: RECORD_TTL_ENV.to_string(),
                reason: format!("'{raw}' is not a positive integer"),
            })?,
    };

    let keys: BTreeSet<&str> = vars.keys().filter_map(|k| zone_id(k)).collect();

    keys.into_iter()
        .map(|key| parse_zone_configuration(&vars, out_dir, key, ttl))
        .collect()
}

/// Extract the zone ID from a `ZONE_<ID>_<FIELD>` variable name.
fn zone_id(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(ZONE_ENV_PREFIX)?;
    let (id, field) = rest.split_once('_')?;

    let id_ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    let field_ok = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');

    (id_ok && field_ok).then_some(id)
}

fn parse_zone_configuration(
    vars: &BTreeMap<String, String>,
    out_dir: &Path,
    key: &str,
    ttl: u32,
) -> Result<ZoneConfig, ConfigError> {
    let var = |field: &str| format!("{ZONE_ENV_PREFIX}{key}_{field}");
    let optional = |field: &str| vars.get(&var(field)).map(String::as_str);
    let required = |field: &str| {
        optional(field).ok_or_else(|| ConfigError::MissingVariable { name: var(field) })
    };

    let firewall_interface = required("IFACE")?.to_string();
    let domain = validate_record_name(&var("DOMAIN"), required("DOMAIN")?)?;
    let primary_ns = validate_record_name(&var("SOA_PRIMARY"), required("SOA_PRIMARY")?)?;
    let person = validate_record_name(&var("SOA_RESPONSIBLE"), required("SOA_RESPONSIBLE")?)?;
    let name_servers = parse_name_servers(&var("NS"), required("NS")?)?;
    let static_only = optional("STATIC_ONLY") == Some("true");

    let soa = SoaConfig {
        name_servers,
        person,
        primary_ns,
    };

    let zone_type = optional("TYPE").unwrap_or("default").trim().to_lowercase();
    let (kind, origin, file_name) = match zone_type.as_str() {
        "default" => {
            let include = optional("INCLUDE").unwrap_or(DEFAULT_ZONE_INCLUDE);
            let records = parse_include(include);
            let bare = domain.trim_end_matches('.').to_string();
            let file_name = format!("{ZONEFILE_PREFIX}{bare}");
            (ZoneKind::Default { records }, bare, file_name)
        }
        "rdns" | "reverse" => {
            let ptr_subnet = validate_ptr_subnet(&var("PREFIX"), required("PREFIX")?)?;
            let origin = reverse_origin(&ptr_subnet);
            let file_name = format!(
                "{ZONEFILE_PREFIX}{}.{IN_ADDR_ARPA}",
                ptr_subnet.trim_end_matches('.')
            );
            (ZoneKind::Reverse { ptr_subnet }, origin, file_name)
        }
        other => {
            return Err(ConfigError::InvalidValue {
                name: var("TYPE"),
                reason: format!("unknown zone type '{other}', expected 'default' or 'rdns'"),
            })
        }
    };

    Ok(ZoneConfig {
        domain,
        origin,
        firewall_interface,
        key: key.to_string(),
        output_path: out_dir.join(file_name),
        soa,
        ttl,
        static_only,
        kind,
    })
}

/// Sanity check for a record name: non-empty, dotted, no whitespace.
fn validate_record_name(name: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() || !value.contains('.') || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("'{value}' is not a valid record name"),
        });
    }
    Ok(value.to_string())
}

fn parse_name_servers(name: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let servers = value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| validate_record_name(name, v))
        .collect::<Result<Vec<_>, _>>()?;

    if servers.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: "at least one name server is required".to_string(),
        });
    }
    Ok(servers)
}

fn parse_include(raw: &str) -> RecordToggles {
    let values: Vec<String> = raw.split(',').map(|v| v.trim().to_lowercase()).collect();
    RecordToggles {
        include_hostname: values.iter().any(|v| v == "hostname"),
        include_mac: values.iter().any(|v| v == "mac"),
    }
}

/// Accepts one to three groups of one to three digits, each followed by a dot.
fn validate_ptr_subnet(name: &str, value: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        name: name.to_string(),
        reason: format!("'{value}' is not a subnet prefix such as '10.0.'"),
    };

    let body = value.strip_suffix('.').ok_or_else(invalid)?;
    let octets: Vec<&str> = body.split('.').collect();
    let valid = (1..=3).contains(&octets.len())
        && octets
            .iter()
            .all(|o| (1..=3).contains(&o.len()) && o.chars().all(|c| c.is_ascii_digit()));

    if valid {
        Ok(value.to_string())
    } else {
        Err(invalid())
    }
}

/// Reverse zone origin for a subnet prefix (`10.0.` → `0.10.in-addr.arpa`).
#[must_use]
pub fn reverse_origin(ptr_subnet: &str) -> String {
    let mut labels: Vec<&str> = ptr_subnet
        .trim_end_matches('.')
        .split('.')
        .rev()
        .collect();
    labels.push(IN_ADDR_ARPA);
    labels.join(".")
}

/// Check that the output directory exists and is writable.
///
/// # Errors
///
/// Returns [`ConfigError::OutputDirectory`] if the path is missing, is not a
/// directory, or a file cannot be created in it.
pub fn validate_output_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let fail = |reason: String| ConfigError::OutputDirectory {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(path).map_err(|e| fail(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(fail("not a directory".to_string()));
    }
    tempfile::tempfile_in(path).map_err(|e| fail(format!("directory is not writable: {e}")))?;

    Ok(path.to_path_buf())
}

/// Validate an http(s) URL and strip its trailing slash.
fn validate_http_url(name: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: format!("'{value}' is not a valid URL: {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("unsupported protocol '{}'", url.scheme()),
        });
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
