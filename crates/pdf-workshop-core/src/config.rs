use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default maximum accepted upload size (100 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
/// Default idle time before a stored document is reclaimed
pub const DEFAULT_MAX_AGE_SECS: u64 = 60 * 60;
/// Default period between two expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;
/// Default external optimizer executable
pub const DEFAULT_COMPRESSOR_BINARY: &str = "gs";

/// Document storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Flat directory holding `<id>.pdf` entries
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Largest upload accepted by the HTTP layer, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("pdf")
}

const fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Expiry sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Documents not modified for longer than this are deleted
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

const fn default_max_age_secs() -> u64 {
    DEFAULT_MAX_AGE_SECS
}

const fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

impl RetentionConfig {
    pub const fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

/// External compressor configuration.
///
/// The optimization preset itself is fixed; only the executable location
/// and the time budget can be changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressorConfig {
    /// Ghostscript executable (name looked up in PATH, or absolute path)
    #[serde(default = "default_compressor_binary")]
    pub binary: PathBuf,

    /// Seconds before a running compression is killed (0 = no limit)
    #[serde(default = "default_compressor_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_compressor_binary() -> PathBuf {
    PathBuf::from(DEFAULT_COMPRESSOR_BINARY)
}

const fn default_compressor_timeout_secs() -> u64 {
    300
}

impl CompressorConfig {
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            binary: default_compressor_binary(),
            timeout_secs: default_compressor_timeout_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Expiry sweep configuration
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Compressor configuration
    #[serde(default)]
    pub compressor: CompressorConfig,
}

impl AppConfig {
    /// Read and parse a TOML config file. Missing sections and keys keep
    /// their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| Error::ConfigLoad(format!("invalid TOML in {}: {e}", path.display())))
    }

    /// Places searched by [`load`](Self::load), most specific first.
    fn search_paths() -> Vec<PathBuf> {
        let user = crate::util::config_dir().map(|dir| dir.join("pdf-workshop").join("config.toml"));
        user.into_iter().chain([PathBuf::from("config.toml")]).collect()
    }

    /// Use the first readable config file among the user config dir and the
    /// working directory, falling back to defaults. Broken files are skipped.
    pub fn load() -> Self {
        for path in Self::search_paths().iter().filter(|path| path.is_file()) {
            match Self::from_file(path) {
                Ok(config) => {
                    debug!("Using config {}", path.display());
                    return config;
                }
                Err(e) => warn!("Skipping config: {}", e),
            }
        }
        debug!("No usable config file, using defaults");
        Self::default()
    }
}
