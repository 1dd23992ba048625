use crate::error::{LifespanError, Result};
use crate::types::config::{LifespanConfig, Settings};
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "lifespan.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".lifespan/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/lifespan/config.toml";
pub const PORT_ENV: &str = "PORT";

pub fn load_config(root: &Path) -> Result<Option<LifespanConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

/// Merges the global, project and local files in that order. Returns `None`
/// when none of them exist.
pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<LifespanConfig>> {
    let mut merged = Value::Table(Map::new());
    let mut found = false;
    if let Some(path) = global_path {
        found |= merge_file_if_exists(&mut merged, path)?;
    }
    found |= merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    found |= merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;
    if !found {
        return Ok(None);
    }

    let cfg: LifespanConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| LifespanError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

/// Applies the `PORT` environment value on top of file settings.
pub fn apply_port_env(settings: &mut Settings, port: Option<&str>) -> Result<()> {
    let Some(raw) = port.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(());
    };
    settings.port = raw
        .parse()
        .map_err(|_| LifespanError::ConfigParse(format!("{PORT_ENV} is not a valid port: {raw}")))?;
    Ok(())
}

pub fn resolve_settings(root: &Path) -> Result<Settings> {
    let mut settings = Settings::default();
    if let Some(cfg) = load_config(root)? {
        cfg.apply(&mut settings);
    }
    apply_port_env(&mut settings, std::env::var(PORT_ENV).ok().as_deref())?;
    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(true)
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| LifespanError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
