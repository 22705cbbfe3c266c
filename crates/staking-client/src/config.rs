use crate::{Error, Result};
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use solana_pubkey::Pubkey;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    signature::Keypair,
};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FarmConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub authority: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub reward_mint: Pubkey,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "Config::default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "Config::default_commitment")]
    pub commitment: String,
    #[serde(default)]
    pub keypair: Option<PathBuf>,
    #[serde(default)]
    pub farm: Option<FarmConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: Self::default_rpc_url(),
            commitment: Self::default_commitment(),
            keypair: None,
            farm: None,
        }
    }
}

impl Config {
    pub fn default_rpc_url() -> String {
        "https://api.devnet.solana.com".to_owned()
    }

    pub fn default_commitment() -> String {
        "confirmed".to_owned()
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.commitment_config()?;
        Ok(config)
    }

    /// Read the config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let s = std::fs::read_to_string(path).map_err(|error| {
                    tracing::error!("Error reading config {}: {}", path.display(), error);
                    error
                })?;
                Self::from_toml(&s)
            }
            None => {
                tracing::info!("no config file, using default");
                Ok(Self::default())
            }
        }
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        let commitment = CommitmentLevel::from_str(&self.commitment)
            .map_err(|_| Error::Config(format!("unknown commitment {:?}", self.commitment)))?;
        Ok(CommitmentConfig { commitment })
    }

    pub fn farm(&self) -> Result<&FarmConfig> {
        self.farm
            .as_ref()
            .ok_or_else(|| Error::Config("missing [farm] section".to_owned()))
    }

    pub fn keypair(&self) -> Result<Keypair> {
        let path = self
            .keypair
            .as_deref()
            .ok_or_else(|| Error::Config("missing keypair path".to_owned()))?;
        read_keypair(path)
    }
}

/// Parse a keypair file: a JSON byte array as written by `solana-keygen`, or
/// a base58 string.
pub fn parse_keypair(s: &str) -> Result<Keypair> {
    let s = s.trim();
    let bytes = if s.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(s)?
    } else {
        bs58::decode(s).into_vec().map_err(Error::custom)?
    };
    Keypair::from_bytes(&bytes).map_err(Error::custom)
}

pub fn read_keypair(path: &Path) -> Result<Keypair> {
    parse_keypair(&std::fs::read_to_string(path)?)
}
