use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::model::config::{AppConfig, clamp_opacity};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
}

pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE)
}

/// Raw config text; a missing file reads as empty.
fn read_config_text(config_dir: &Path) -> Result<String, ConfigError> {
    let path = config_path(config_dir);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ConfigError::ReadError { path, source: e }),
    }
}

/// Read config.toml (missing file → defaults)
pub fn read_config(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let text = read_config_text(config_dir)?;
    Ok(toml::from_str(&text)?)
}

/// Read config.toml, using defaults for anything unreadable
pub fn load_config_or_default(config_dir: &Path) -> AppConfig {
    read_config(config_dir).unwrap_or_else(|e| {
        warn!(error = %e, "using default config");
        AppConfig::default()
    })
}

/// Set `[ui] opacity` in the document, keeping the rest as written
pub fn set_opacity_in(doc: &mut toml_edit::DocumentMut, opacity: f64) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["opacity"] = toml_edit::value(opacity);
}

/// Persist a new opacity (clamped and snapped). Returns the stored value.
pub fn set_opacity(config_dir: &Path, opacity: f64) -> Result<f64, ConfigError> {
    let opacity = clamp_opacity(opacity);
    let mut doc: toml_edit::DocumentMut = read_config_text(config_dir)?.parse()?;
    set_opacity_in(&mut doc, opacity);

    let path = config_path(config_dir);
    let write_err = |e| ConfigError::WriteError {
        path: path.clone(),
        source: e,
    };
    fs::create_dir_all(config_dir).map_err(write_err)?;
    fs::write(&path, doc.to_string()).map_err(write_err)?;
    Ok(opacity)
}
