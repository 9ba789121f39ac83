//! Client Settings
//!
//! Static JSON settings read once at startup. Any problem here is fatal
//! before the ledger is touched.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use solana_program::pubkey::Pubkey;
use thiserror::Error;
use tracing::debug;

/// Default settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Keypair file length: 32-byte secret followed by 32-byte public key.
const KEYPAIR_LEN: usize = 64;

/// Scheme selecting the file-backed simulated ledger.
const FILE_SCHEME: &str = "file://";

/// Configuration errors. All are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings or wallet file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Settings file is not valid JSON or misses a required field.
    #[error("invalid settings in {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A required field is present but empty.
    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    /// Program id is not a base58 public key.
    #[error("program_id '{0}' is not a valid public key")]
    InvalidProgramId(String),

    /// Wallet file is not a 64-byte keypair array.
    #[error("wallet {0} is not a 64-byte keypair")]
    InvalidWallet(PathBuf),

    /// Endpoint scheme this client cannot reach.
    #[error("unsupported ledger endpoint '{0}', expected file://<path>")]
    UnsupportedEndpoint(String),
}

/// Ledger endpoint section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct EndpointSettings {
    /// Endpoint URL.
    pub url: String,
    /// Commitment level requested for reads.
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

/// Settings as written in the JSON file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Path to the player's keypair file; `~` is the home directory.
    pub player_wallet: String,
    /// Base58 id of the ledger program.
    pub program_id: String,
    /// Ledger endpoint.
    pub devnet: EndpointSettings,
    /// Cluster name used in explorer links.
    #[serde(default = "default_cluster")]
    pub explorer_cluster: String,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_cluster() -> String {
    "devnet".to_string()
}

/// Where the ledger lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Simulated ledger persisted at this path.
    Simulated(PathBuf),
}

impl Settings {
    /// Load settings from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        if settings.player_wallet.trim().is_empty() {
            return Err(ConfigError::Missing("player_wallet"));
        }
        if settings.devnet.url.trim().is_empty() {
            return Err(ConfigError::Missing("devnet.url"));
        }
        settings.program_id()?;
        settings.endpoint()?;

        Ok(settings)
    }

    /// Program id as a public key.
    pub fn program_id(&self) -> Result<Pubkey, ConfigError> {
        Pubkey::from_str(self.program_id.trim())
            .map_err(|_| ConfigError::InvalidProgramId(self.program_id.clone()))
    }

    /// Wallet path with `~` expanded.
    pub fn wallet_path(&self) -> PathBuf {
        expand_home(&self.player_wallet, home_dir().as_deref())
    }

    /// Resolved ledger endpoint.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let url = self.devnet.url.trim();
        match url.strip_prefix(FILE_SCHEME) {
            Some(path) if !path.is_empty() => {
                Ok(Endpoint::Simulated(expand_home(path, home_dir().as_deref())))
            }
            _ => Err(ConfigError::UnsupportedEndpoint(url.to_string())),
        }
    }

    /// Read the player's public key from the wallet file.
    pub fn load_player(&self) -> Result<Pubkey, ConfigError> {
        let path = self.wallet_path();
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        parse_keypair_public(&text).ok_or(ConfigError::InvalidWallet(path))
    }
}

/// Explorer link for an account on `cluster`.
pub fn explorer_url(address: &Pubkey, cluster: &str) -> String {
    format!("https://solscan.io/account/{}?cluster={}", address, cluster)
}

fn home_dir() -> Option<String> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
}

/// Replace a leading `~` with `home`.
fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => PathBuf::from(format!("{}{}", home, rest)),
        _ => PathBuf::from(path),
    }
}

/// Public half of a JSON keypair array.
fn parse_keypair_public(text: &str) -> Option<Pubkey> {
    let bytes: Vec<u8> = serde_json::from_str(text).ok()?;
    if bytes.len() != KEYPAIR_LEN {
        return None;
    }
    let public: [u8; 32] = bytes[32..].try_into().ok()?;
    Some(Pubkey::new_from_array(public))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS";

    fn json(wallet: &str, program: &str, url: &str) -> String {
        format!(
            r#"{{"player_wallet": "{}", "program_id": "{}", "devnet": {{"url": "{}"}}}}"#,
            wallet, program, url
        )
    }

    #[test]
    fn test_defaults_applied() {
        let text = json("~/id.json", PROGRAM, "file://ledger.json");
        let settings = Settings::from_json(&text).unwrap();
        assert_eq!(settings.devnet.commitment, "confirmed");
        assert_eq!(settings.explorer_cluster, "devnet");
        assert_eq!(settings.program_id().unwrap().to_string(), PROGRAM);
        assert_eq!(settings.endpoint().unwrap(), Endpoint::Simulated(PathBuf::from("ledger.json")));
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let text = format!(r#"{{"program_id": "{}", "devnet": {{"url": "file://x"}}}}"#, PROGRAM);
        assert!(matches!(Settings::from_json(&text), Err(ConfigError::Parse { .. })));

        let text = json("", PROGRAM, "file://x");
        assert!(matches!(Settings::from_json(&text), Err(ConfigError::Missing("player_wallet"))));
    }

    #[test]
    fn test_bad_program_id() {
        let text = json("id.json", "not-a-key", "file://x");
        assert!(matches!(Settings::from_json(&text), Err(ConfigError::InvalidProgramId(_))));
    }

    #[test]
    fn test_remote_endpoint_rejected() {
        let text = json("id.json", PROGRAM, "https://api.devnet.solana.com");
        assert!(matches!(Settings::from_json(&text), Err(ConfigError::UnsupportedEndpoint(_))));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("~/.config/id.json", Some("/home/p")),
            PathBuf::from("/home/p/.config/id.json")
        );
        assert_eq!(expand_home("/abs/id.json", Some("/home/p")), PathBuf::from("/abs/id.json"));
        assert_eq!(expand_home("~/id.json", None), PathBuf::from("~/id.json"));
    }

    #[test]
    fn test_keypair_public_half() {
        let mut bytes = vec![1u8; 32];
        bytes.extend(vec![9u8; 32]);
        let text = serde_json::to_string(&bytes).unwrap();
        assert_eq!(parse_keypair_public(&text), Some(Pubkey::new_from_array([9; 32])));

        assert_eq!(parse_keypair_public("[1, 2, 3]"), None);
        assert_eq!(parse_keypair_public("not json"), None);
    }

    #[test]
    fn test_load_player_from_file() {
        let dir = std::env::temp_dir();
        let wallet = dir.join(format!("rps-wallet-test-{}.json", std::process::id()));
        let mut bytes = vec![0u8; 32];
        bytes.extend(vec![5u8; 32]);
        std::fs::write(&wallet, serde_json::to_string(&bytes).unwrap()).unwrap();

        let text = json(wallet.to_str().unwrap(), PROGRAM, "file://x");
        let settings = Settings::from_json(&text).unwrap();
        assert_eq!(settings.load_player().unwrap(), Pubkey::new_from_array([5; 32]));

        let _ = std::fs::remove_file(&wallet);
    }

    #[test]
    fn test_explorer_url() {
        let text = r#"{"player_wallet": "id.json", "program_id": "PROGRAM",
            "devnet": {"url": "file://x"}, "explorer_cluster": "mainnet-beta"}"#;
        let settings = Settings::from_json(&text.replace("PROGRAM", PROGRAM)).unwrap();
        let address = Pubkey::new_from_array([0; 32]);
        assert_eq!(
            explorer_url(&address, &settings.explorer_cluster),
            format!("https://solscan.io/account/{}?cluster=mainnet-beta", address)
        );
    }
}
