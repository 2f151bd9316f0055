use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "./config/amn.yaml";

/// Where the CLI reads its configuration and writes its logs
#[derive(Debug, Clone)]
pub struct EnvPaths {
    pub config_path: PathBuf,
    /// Set when the config file was named explicitly, so a missing file is an error
    pub config_explicit: bool,
    pub log_dir: Option<PathBuf>,
}

impl EnvPaths {
    /// Resolve paths from flags, then `AMN_CONFIG` / `AMN_LOG_DIR`, then defaults.
    ///
    /// A `.env` file in the working directory is loaded first.
    pub fn load(config_flag: Option<PathBuf>, log_dir_flag: Option<PathBuf>) -> Result<Self> {
        let base = env::current_dir().context("Failed to get current directory")?;
        let env_file = base.join(".env");
        if env_file.exists() {
            dotenv::from_path(&env_file).ok();
        }
        Ok(Self::load_with_base(&base, config_flag, log_dir_flag))
    }

    /// Resolve paths against `base`; primarily for testing
    pub fn load_with_base(
        base: &Path,
        config_flag: Option<PathBuf>,
        log_dir_flag: Option<PathBuf>,
    ) -> Self {
        let env_config = env::var("AMN_CONFIG").ok().filter(|v| !v.is_empty());
        let config_explicit = config_flag.is_some() || env_config.is_some();
        let config_path = config_flag
            .or_else(|| env_config.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let log_dir = log_dir_flag.or_else(|| {
            env::var("AMN_LOG_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });

        Self {
            config_path: absolutize(base, config_path),
            config_explicit,
            log_dir: log_dir.map(|dir| absolutize(base, dir)),
        }
    }
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}
