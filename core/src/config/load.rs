use std::path::Path;

use crate::error::ConfigError;

use super::types::AppConfig;

pub const DEFAULT_CONFIG_FILE: &str = "batchx.toml";

const ENV_MAX_PROCS: &str = "BATCHX_MAX_PROCS";
const ENV_MAX_ARGS: &str = "BATCHX_MAX_ARGS";

/// `batchx.toml` from the working directory if it exists, otherwise defaults,
/// then environment overrides.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let cfg = if Path::new(DEFAULT_CONFIG_FILE).exists() {
        read_file(Path::new(DEFAULT_CONFIG_FILE))?
    } else {
        AppConfig::default()
    };
    apply_env_overrides(cfg, |key| std::env::var(key).ok())
}

/// Like [`load_default`], but an explicitly named file must exist.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let Some(path) = path else {
        return load_default();
    };
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let cfg = read_file(path)?;
    apply_env_overrides(cfg, |key| std::env::var(key).ok())
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(ConfigError::Parse)
}

/// Applies `BATCHX_*` overrides. Blank values are ignored.
pub fn apply_env_overrides<F>(mut cfg: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(n) = env_usize(&lookup, ENV_MAX_PROCS)? {
        cfg.run.max_procs = n;
    }
    if let Some(n) = env_usize(&lookup, ENV_MAX_ARGS)? {
        cfg.run.max_args = n;
    }
    Ok(cfg)
}

fn env_usize<F>(lookup: &F, key: &str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|source| ConfigError::EnvInvalid {
                key: key.to_string(),
                source,
            }),
        _ => Ok(None),
    }
}
