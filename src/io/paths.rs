use std::path::{Path, PathBuf};

/// Overrides the data directory (tabs.json, log, lock)
pub const DATA_DIR_ENV: &str = "EZTOOD_DATA_DIR";
/// Overrides the config directory (config.toml)
pub const CONFIG_DIR_ENV: &str = "EZTOOD_CONFIG_DIR";

const APP_DIR: &str = "eztood";

/// Resolve the data directory: explicit flag, then `$EZTOOD_DATA_DIR`,
/// then the platform's per-user application data location.
pub fn data_dir(flag: Option<&Path>) -> PathBuf {
    resolve_data_dir(flag, |key| std::env::var(key).ok(), cfg!(target_os = "macos"))
}

/// Resolve the config directory: `$EZTOOD_CONFIG_DIR`, then
/// `$XDG_CONFIG_HOME/eztood`, then `~/.config/eztood`.
pub fn config_dir() -> PathBuf {
    resolve_config_dir(|key| std::env::var(key).ok())
}

fn resolve_data_dir(
    flag: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    macos: bool,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Some(dir) = non_empty(env(DATA_DIR_ENV)) {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = non_empty(env("XDG_DATA_HOME")) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    let home = home_dir(&env);
    if macos {
        home.join("Library").join("Application Support").join(APP_DIR)
    } else {
        home.join(".local").join("share").join(APP_DIR)
    }
}

fn resolve_config_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = non_empty(env(CONFIG_DIR_ENV)) {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = non_empty(env("XDG_CONFIG_HOME")) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    home_dir(&env).join(".config").join(APP_DIR)
}

fn home_dir(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    non_empty(env("HOME"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
