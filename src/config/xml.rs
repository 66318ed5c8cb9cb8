//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a commented template if missing (unless TRASHCAN_CONFIG is set).
//!
//! A broken config never stops the tool: parse failures are logged and the
//! defaults are used. CLI flags override anything loaded here.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config", default)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    days: Option<String>,
    home_trash: Option<String>,
}

fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();
    if let Some(s) = parsed.log_level.as_deref() {
        if let Some(level) = LogLevel::parse(s.trim()) {
            cfg.log_level = level;
        }
    }
    cfg.log_file = parsed
        .log_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    cfg.days = parsed.days.as_deref().and_then(|s| s.trim().parse().ok());
    cfg.home_trash = parsed
        .home_trash
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    cfg
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed))
}

/// Load the effective Config: TRASHCAN_CONFIG or the platform default path.
/// Missing or unparsable files fall back to defaults (with a debug log); a
/// template is written on first run when using the default location.
pub fn load_config() -> Config {
    let explicit = std::env::var_os("TRASHCAN_CONFIG").is_some();
    let Some(path) = default_config_path() else {
        return Config::default();
    };
    if !path.exists() {
        if !explicit {
            if let Err(e) = create_template_config(&path) {
                debug!(path = %path.display(), error = %e, "could not write template config");
            }
        }
        return Config::default();
    }
    match load_config_from_xml_path(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unparsable config");
            Config::default()
        }
    }
}

/// Create the default template config file and parent directory (0700 dir,
/// 0600 file), refusing to follow symlinked ancestors.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        anyhow::bail!(
            "refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = fs::set_permissions(parent, fs::Permissions::from_mode(0o700));
    }

    let content = "\
<!--\n\
  trashcan configuration (XML)\n\n\
  Fields:\n\
    log_level   -> quiet | normal | verbose | debug\n\
    log_file    -> path to log file (optional; stderr/stdout still used)\n\
    days        -> default retention threshold for `trashcan empty`\n\
    home_trash  -> override of the home trash directory\n\n\
  Notes:\n\
    - CLI flags override XML values.\n\
-->\n\
<config>\n\
  <log_level>normal</log_level>\n\
</config>\n";

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("create template config {}", path.display()))?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_all_fields() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(
            &path,
            "<config>\n  <log_level>debug</log_level>\n  <log_file>/tmp/t.log</log_file>\n  <days>14</days>\n  <home_trash>/tmp/Trash</home_trash>\n</config>\n",
        )
        .unwrap();

        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/t.log")));
        assert_eq!(cfg.days, Some(14));
        assert_eq!(cfg.home_trash, Some(PathBuf::from("/tmp/Trash")));
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config></config>").unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Normal);
        assert_eq!(cfg.days, None);
    }

    #[test]
    fn template_is_owner_only_and_parses() {
        let td = tempdir().unwrap();
        let path = td.path().join("cfgdir").join("config.xml");
        create_template_config(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Normal);
    }

    #[test]
    fn garbage_days_value_is_ignored() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><days>soon</days></config>").unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.days, None);
    }
}
