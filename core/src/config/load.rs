use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;
use crate::status::AppMode;

/// Get the default modegate data directory: ~/.modegate
pub fn get_modegate_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".modegate"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.modegate/config.toml
    let data_dir = get_modegate_data_dir()?;
    let home_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let cfg = if home_config.exists() {
        read_config(&home_config)?
    } else if local_config.exists() {
        read_config(local_config)?
    } else {
        AppConfig::default()
    };

    finish(cfg, &data_dir)
}

/// Load one explicit config file, then apply the same defaults and overrides.
pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let cfg = read_config(path.as_ref())?;
    finish(cfg, &get_modegate_data_dir()?)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    toml::from_str::<AppConfig>(&s).with_context(|| format!("Invalid config in {:?}", path))
}

fn finish(mut cfg: AppConfig, data_dir: &Path) -> anyhow::Result<AppConfig> {
    apply_env_overrides(&mut cfg, |name| std::env::var(name).ok())?;

    if is_blank(cfg.storage.directory.as_deref()) {
        cfg.storage.directory = Some(data_dir.join("storage").to_string_lossy().to_string());
    }

    if cfg.logging.file && is_blank(cfg.logging.directory.as_deref()) {
        let logs_dir = data_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    Ok(cfg)
}

fn is_blank(v: Option<&str>) -> bool {
    v.map(|s| s.trim().is_empty()).unwrap_or(true)
}

/// Environment variable overrides (highest priority).
fn apply_env_overrides<F>(cfg: &mut AppConfig, var: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("MODEGATE_APP_MODE") {
        cfg.store.default_mode = v
            .trim()
            .parse::<AppMode>()
            .map_err(|e| anyhow::anyhow!("MODEGATE_APP_MODE: {e}"))?;
    }
    if let Some(v) = non_empty("MODEGATE_PRODUCTION") {
        cfg.build.production = matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );
    }
    if let Some(v) = non_empty("MODEGATE_STORAGE_DIR") {
        cfg.storage.directory = Some(v);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(
            &mut cfg,
            vars(&[
                ("MODEGATE_APP_MODE", "live"),
                ("MODEGATE_PRODUCTION", "TRUE"),
                ("MODEGATE_STORAGE_DIR", "/tmp/mg"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.store.default_mode, AppMode::Live);
        assert!(cfg.build.production);
        assert_eq!(cfg.storage.directory.as_deref(), Some("/tmp/mg"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, vars(&[("MODEGATE_APP_MODE", "  ")])).unwrap();
        assert_eq!(cfg.store.default_mode, AppMode::Development);
    }

    #[test]
    fn test_bad_env_mode_is_an_error() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, vars(&[("MODEGATE_APP_MODE", "turbo")]));
        assert!(err.is_err());
    }

    #[test]
    fn test_finish_fills_storage_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = finish(AppConfig::default(), tmp.path()).unwrap();
        let dir = cfg.storage.directory.unwrap();
        assert!(dir.ends_with("storage"));
    }

    #[test]
    fn test_read_config_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[store]\ndefault_mode = \"demo\"\n").unwrap();
        let cfg = read_config(&path).unwrap();
        assert_eq!(cfg.store.default_mode, AppMode::Demo);

        std::fs::write(&path, "[store]\ndefault_mode = 3\n").unwrap();
        assert!(read_config(&path).is_err());
    }
}
