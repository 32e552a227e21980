//! Settings file model.
//!
//! One JSON document holds the warehouse connection details plus two
//! independent object-storage sections: `upload` is where the file is
//! staged, `copy` is what the generated COPY statement references. The two
//! may point at different buckets or regions; that asymmetry is deliberate.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub warehouse: WarehouseSettings,
    pub upload: StorageSettings,
    pub copy: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Role granted USAGE and SELECT unless overridden on the command line.
    pub grant_role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Absent region is a valid configuration, not an error.
    #[serde(default)]
    pub region: Option<String>,
}

fn default_port() -> u16 {
    5439
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening settings file {path:?}"))?;
        let reader = BufReader::new(file);
        let settings = serde_json::from_reader(reader).context("Parsing settings JSON")?;
        Ok(settings)
    }
}
