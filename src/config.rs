//! Configuration file handling.
//!
//! This module loads `gsuite_config.toml`, fills in defaults, validates the
//! result and builds the trusted-network reference set from it.

use crate::analysis::{ReferenceSet, MAX_DAYS};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gsuite_config.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OAuth scopes requested for the access token.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// The Workspace tenant being audited.
    pub owner: OwnerConfig,

    /// Trusted networks by name; their IPs form the reference set.
    #[serde(default)]
    pub networks: BTreeMap<String, Vec<NetworkConfig>>,

    /// Credential settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// API behaviour and report thresholds.
    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scopes: default_scopes(),
            owner: OwnerConfig::default(),
            networks: BTreeMap::new(),
            auth: AuthConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

fn default_scopes() -> Vec<String> {
    [
        "admin.directory.user.readonly",
        "admin.directory.group.readonly",
        "admin.directory.orgunit.readonly",
        "admin.reports.audit.readonly",
        "admin.reports.usage.readonly",
        "drive.metadata.readonly",
    ]
    .into_iter()
    .map(|s| format!("https://www.googleapis.com/auth/{}", s))
    .collect()
}

/// Tenant identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Primary domain, used for every directory query.
    #[serde(default)]
    pub domain: String,

    /// Display name of the organization.
    #[serde(default)]
    pub organization: String,
}

/// One trusted network segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Free-form kind, e.g. "wifi" or "vpn".
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Egress addresses of the segment.
    #[serde(default)]
    pub ip: Vec<String>,
}

/// OAuth consent flow used on first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthFlow {
    /// Local loopback redirect; the browser hands the code back automatically.
    #[default]
    Redirect,
    /// Print a URL and read the code from stdin.
    Interactive,
}

/// Credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth client secret downloaded from the Cloud console.
    #[serde(default = "default_client_secret")]
    pub client_secret: PathBuf,

    /// Token cache file. Defaults to `~/.credentials/gsuite-toolkit.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_cache: Option<PathBuf>,

    #[serde(default)]
    pub flow: AuthFlow,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_secret: default_client_secret(),
            token_cache: None,
            flow: AuthFlow::default(),
        }
    }
}

fn default_client_secret() -> PathBuf {
    PathBuf::from("client_secret.json")
}

/// API behaviour and report thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Days to step back looking for a published 2SV usage report.
    #[serde(default = "default_usage_report_retries")]
    pub usage_report_retries: u32,

    /// Lookback for `login suspicious`.
    #[serde(default = "default_login_lookback_days")]
    pub login_lookback_days: u32,

    /// Threshold for `login rare`.
    #[serde(default = "default_rare_login_days")]
    pub rare_login_days: u32,

    /// Threshold for `user stale-admins`.
    #[serde(default = "default_stale_admin_days")]
    pub stale_admin_days: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            usage_report_retries: default_usage_report_retries(),
            login_lookback_days: default_login_lookback_days(),
            rare_login_days: default_rare_login_days(),
            stale_admin_days: default_stale_admin_days(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_usage_report_retries() -> u32 {
    10
}

fn default_login_lookback_days() -> u32 {
    45
}

fn default_rare_login_days() -> u32 {
    14
}

fn default_stale_admin_days() -> u32 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the fields every command relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.domain.trim().is_empty() {
            return Err(ConfigError::MissingField("owner.domain"));
        }
        if self.scopes.is_empty() {
            return Err(ConfigError::MissingField("scopes"));
        }
        if self.api.usage_report_retries == 0 {
            return Err(ConfigError::MissingField("api.usage_report_retries"));
        }

        for (field, value) in [
            ("api.login_lookback_days", self.api.login_lookback_days),
            ("api.rare_login_days", self.api.rare_login_days),
            ("api.stale_admin_days", self.api.stale_admin_days),
        ] {
            if value == 0 || value > MAX_DAYS {
                return Err(ConfigError::DaysOutOfRange {
                    field,
                    value,
                    max: MAX_DAYS,
                });
            }
        }

        for (name, segments) in &self.networks {
            for value in segments.iter().flat_map(|s| s.ip.iter()) {
                if value.parse::<IpAddr>().is_err() {
                    return Err(ConfigError::InvalidNetworkAddress {
                        network: name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Every configured network IP, flattened.
    pub fn reference_set(&self) -> ReferenceSet {
        self.networks
            .values()
            .flatten()
            .flat_map(|segment| segment.ip.iter().cloned())
            .collect()
    }

    /// Apply command-line overrides.
    ///
    /// Only values the user actually passed replace what the file says.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref command) = args.command {
            if let Some(days) = command.login_lookback_days() {
                self.api.login_lookback_days = days;
            }
            if let Some(days) = command.rare_login_days() {
                self.api.rare_login_days = days;
            }
            if let Some(days) = command.stale_admin_days() {
                self.api.stale_admin_days = days;
            }
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        let mut config = Config::default();
        config.owner = OwnerConfig {
            domain: "example.com".to_string(),
            organization: "Example Inc.".to_string(),
        };
        config.networks.insert(
            "office".to_string(),
            vec![NetworkConfig {
                kind: "wifi".to_string(),
                ip: vec!["203.0.113.10".to_string()],
            }],
        );
        toml::to_string_pretty(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
scopes = ["https://www.googleapis.com/auth/admin.reports.audit.readonly"]

[owner]
domain = "example.com"
organization = "Example Inc."

[[networks.office]]
type = "wifi"
ip = ["203.0.113.10", "203.0.113.11"]

[[networks.office]]
type = "wired"
ip = ["203.0.113.20"]

[[networks.vpn]]
type = "vpn"
ip = ["198.51.100.7"]

[api]
login_lookback_days = 30
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scopes.len(), 6);
        assert_eq!(config.auth.client_secret, PathBuf::from("client_secret.json"));
        assert_eq!(config.auth.flow, AuthFlow::Redirect);
        assert_eq!(config.api.usage_report_retries, 10);
        assert_eq!(config.api.login_lookback_days, 45);
        assert_eq!(config.api.rare_login_days, 14);
    }

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.owner.domain, "example.com");
        assert_eq!(config.scopes.len(), 1);
        assert_eq!(config.networks["office"].len(), 2);
        assert_eq!(config.networks["office"][1].kind, "wired");
        assert_eq!(config.api.login_lookback_days, 30);
        // untouched fields keep their defaults
        assert_eq!(config.api.rare_login_days, 14);
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_set_flattens_networks() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let reference = config.reference_set();
        assert_eq!(reference.len(), 4);
        assert!(reference.contains("203.0.113.11"));
        assert!(reference.contains("203.0.113.20"));
        assert!(reference.contains("198.51.100.7"));
        assert!(!reference.contains("8.8.8.8"));
    }

    #[test]
    fn test_missing_owner_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "scopes = []").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.owner.organization, "Example Inc.");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/gsuite_config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.owner.domain = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("owner.domain"))
        ));

        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.scopes.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("scopes"))
        ));

        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config
            .networks
            .get_mut("vpn")
            .unwrap()
            .push(NetworkConfig {
                kind: "vpn".to_string(),
                ip: vec!["10.0.0.0/8".to_string()],
            });
        match config.validate() {
            Err(ConfigError::InvalidNetworkAddress { network, value }) => {
                assert_eq!(network, "vpn");
                assert_eq!(value, "10.0.0.0/8");
            }
            other => panic!("expected InvalidNetworkAddress, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_days() {
        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.api.login_lookback_days = u32::MAX;
        match config.validate() {
            Err(ConfigError::DaysOutOfRange { field, value, max }) => {
                assert_eq!(field, "api.login_lookback_days");
                assert_eq!(value, u32::MAX);
                assert_eq!(max, MAX_DAYS);
            }
            other => panic!("expected DaysOutOfRange, got {:?}", other),
        }

        let mut config: Config = toml::from_str(SAMPLE).unwrap();
        config.api.stale_admin_days = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DaysOutOfRange {
                field: "api.stale_admin_days",
                ..
            })
        ));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml().unwrap();
        assert!(toml_str.contains("[owner]"));
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[[networks.office]]"));

        // the generated file must load back and validate
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.reference_set().len(), 1);
    }
}
