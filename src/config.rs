use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Firefox profile search roots, relative to the home directory.
    pub firefox_roots: Vec<PathBuf>,
    /// Chrome profile search roots, relative to the home directory.
    pub chrome_roots: Vec<PathBuf>,
    /// File name of the database snapshot, created under the home directory.
    pub snapshot_name: String,
    /// Default export file name, created under the home directory.
    pub export_name: String,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_hash: String,
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p)?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let config: Config = serde_yaml::from_slice(&bytes)?;
    let config_hash = hash_bytes(&bytes);

    Ok(LoadedConfig { config, config_hash })
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(digest)
}
