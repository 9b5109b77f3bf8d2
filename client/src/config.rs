//! Client configuration with TOML file support.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use votechain_types::Address;
use votechain_utils::LogFormat;

use crate::ClientError;

/// Configuration for the votechain client, loaded once at startup.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node endpoint used for reads when no wallet is connected.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Wallet JSON-RPC endpoint (signs transactions). Read-only when absent.
    #[serde(default)]
    pub wallet_url: Option<String>,

    /// Address of the deployed voting contract.
    #[serde(default)]
    pub contract_address: Option<Address>,

    /// Expected chain id; the wallet is disconnected if it reports another.
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Campaigns shorter than this are refused before submission.
    #[serde(default = "default_min_campaign_duration_secs")]
    pub min_campaign_duration_secs: u64,

    /// Largest verification document accepted for upload.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    #[serde(default = "default_confirmation_poll_ms")]
    pub confirmation_poll_ms: u64,

    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// Interval of the winner poll on a campaign page.
    #[serde(default = "default_winner_poll_secs")]
    pub winner_poll_secs: u64,

    /// Interval of the wallet account/chain watcher.
    #[serde(default = "default_wallet_poll_ms")]
    pub wallet_poll_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ipfs: IpfsConfig,
}

/// Pinning service credentials and endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IpfsConfig {
    #[serde(default = "default_ipfs_api_url")]
    pub api_url: String,

    #[serde(default = "default_ipfs_gateway_url")]
    pub gateway_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_min_campaign_duration_secs() -> u64 {
    3_600
}

fn default_max_document_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_confirmation_poll_ms() -> u64 {
    1_000
}

fn default_confirmation_timeout_secs() -> u64 {
    120
}

fn default_winner_poll_secs() -> u64 {
    10
}

fn default_wallet_poll_ms() -> u64 {
    2_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ipfs_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}

fn default_ipfs_gateway_url() -> String {
    "https://gateway.pinata.cloud".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ClientError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// The contract address, required before any contract call.
    pub fn require_contract(&self) -> Result<Address, ClientError> {
        self.contract_address
            .ok_or_else(|| ClientError::Config("contract_address is not set".into()))
    }

    /// `log_format` checked against the supported outputs.
    pub fn log_format(&self) -> Result<LogFormat, ClientError> {
        self.log_format.parse().map_err(ClientError::Config)
    }

    pub fn confirmation_poll(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn winner_poll(&self) -> Duration {
        Duration::from_secs(self.winner_poll_secs)
    }

    pub fn wallet_poll(&self) -> Duration {
        Duration::from_millis(self.wallet_poll_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            wallet_url: None,
            contract_address: None,
            chain_id: None,
            min_campaign_duration_secs: default_min_campaign_duration_secs(),
            max_document_bytes: default_max_document_bytes(),
            confirmation_poll_ms: default_confirmation_poll_ms(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            winner_poll_secs: default_winner_poll_secs(),
            wallet_poll_ms: default_wallet_poll_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            ipfs: IpfsConfig::default(),
        }
    }
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: default_ipfs_api_url(),
            gateway_url: default_ipfs_gateway_url(),
            api_key: String::new(),
            api_secret: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ClientConfig {
            contract_address: Some(Address::new([0xab; 20])),
            chain_id: Some(11155111),
            ..ClientConfig::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ClientConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ClientConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.min_campaign_duration_secs, 3_600);
        assert_eq!(config.log_format, "human");
        assert!(config.require_contract().is_err());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            contract_address = "0x00000000000000000000000000000000000000AA"
            winner_poll_secs = 3

            [ipfs]
            api_key = "k"
        "#;
        let config = ClientConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.winner_poll(), Duration::from_secs(3));
        assert_eq!(config.ipfs.api_key, "k");
        assert_eq!(config.ipfs.gateway_url, "https://gateway.pinata.cloud");
        assert_eq!(
            config.require_contract().unwrap().to_string(),
            "0x00000000000000000000000000000000000000aa"
        );
    }

    #[test]
    fn malformed_address_is_a_config_error() {
        let err = ClientConfig::from_toml_str(r#"contract_address = "0x12""#).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn unknown_log_format_is_a_config_error() {
        let config = ClientConfig::from_toml_str(r#"log_format = "xml""#).unwrap();
        assert!(matches!(config.log_format(), Err(ClientError::Config(m)) if m.contains("xml")));
        let json = ClientConfig::from_toml_str(r#"log_format = "json""#).unwrap();
        assert_eq!(json.log_format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rpc_url = \"http://node:8545\"").unwrap();
        let config = ClientConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.rpc_url, "http://node:8545");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_toml_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
