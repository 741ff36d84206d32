use anyhow::{Context, Result};
use fieldkv_store::{DecodePolicy, Medium};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FIELDKV_CONFIG";
pub const DATA_DIR_ENV: &str = "FIELDKV_DATA_DIR";
pub const NO_INFO_ENV: &str = "FIELDKV_NO_INFO";

pub const DEFAULT_CONFIG_FILE: &str = "fieldkv.toml";
pub const DEFAULT_NAME_PREFIX: &str = "hkv-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictCheck {
    #[default]
    None,
    Refetch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicySetting {
    #[default]
    Warn,
    Abort,
}

impl From<DecodePolicySetting> for DecodePolicy {
    fn from(value: DecodePolicySetting) -> Self {
        match value {
            DecodePolicySetting::Warn => Self::Warn,
            DecodePolicySetting::Abort => Self::Abort,
        }
    }
}

/// Contents of `fieldkv.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub medium: Option<Medium>,
    pub no_info: Option<bool>,
    pub decode_policy: Option<DecodePolicySetting>,
    pub conflict_check: Option<ConflictCheck>,
    pub name_prefix: Option<String>,
}

impl FileConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid fieldkv configuration")
    }
}

/// Values given on the command line, which win over file and environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub medium: Option<Medium>,
    pub no_info: bool,
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub medium: Medium,
    pub no_info: bool,
    pub decode_policy: DecodePolicy,
    pub conflict_check: ConflictCheck,
    pub name_prefix: String,
}

impl Settings {
    pub fn collection_name(&self, db: &str) -> String {
        format!("{}{db}", self.name_prefix)
    }
}

/// Merge defaults, config file, environment and flags (in increasing priority).
pub fn resolve(overrides: &Overrides) -> Result<Settings> {
    let file = load_file_config(overrides.config.as_deref())?;

    let data_dir = overrides
        .data_dir
        .clone()
        .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .or(file.data_dir)
        .unwrap_or_else(default_data_dir);

    Ok(Settings {
        data_dir,
        medium: overrides.medium.or(file.medium).unwrap_or_default(),
        no_info: overrides.no_info || env_truthy(NO_INFO_ENV) || file.no_info.unwrap_or(false),
        decode_policy: if overrides.strict {
            DecodePolicy::Abort
        } else {
            file.decode_policy.unwrap_or_default().into()
        },
        conflict_check: file.conflict_check.unwrap_or_default(),
        name_prefix: file
            .name_prefix
            .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_string()),
    })
}

fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match env::var_os(CONFIG_ENV) {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        },
    };

    if !required && !path.exists() {
        return Ok(FileConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    FileConfig::from_toml(&raw).with_context(|| format!("In {}", path.display()))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("fieldkv"))
        .unwrap_or_else(|| PathBuf::from(".fieldkv"))
}

fn env_truthy(var: &str) -> bool {
    env::var(var)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_config() {
        let cfg = FileConfig::from_toml(
            r#"
            data_dir = "/var/lib/fieldkv"
            medium = "labels"
            no_info = true
            decode_policy = "abort"
            conflict_check = "refetch"
            name_prefix = "kv-"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.data_dir, Some(PathBuf::from("/var/lib/fieldkv")));
        assert_eq!(cfg.medium, Some(Medium::Labels));
        assert_eq!(cfg.no_info, Some(true));
        assert_eq!(cfg.decode_policy, Some(DecodePolicySetting::Abort));
        assert_eq!(cfg.conflict_check, Some(ConflictCheck::Refetch));
        assert_eq!(cfg.name_prefix.as_deref(), Some("kv-"));
    }

    #[test]
    fn empty_config_is_valid() {
        let cfg = FileConfig::from_toml("").unwrap();
        assert!(cfg.medium.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(FileConfig::from_toml("token = \"secret\"").is_err());
    }

    #[test]
    fn explicit_config_file_is_required() {
        let overrides = Overrides {
            config: Some(PathBuf::from("/definitely/not/here/fieldkv.toml")),
            ..Overrides::default()
        };
        assert!(resolve(&overrides).is_err());
    }

    #[test]
    fn flags_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldkv.toml");
        fs::write(&path, "medium = \"labels\"\ndata_dir = \"/from/file\"\n").unwrap();

        let settings = resolve(&Overrides {
            config: Some(path),
            data_dir: Some(PathBuf::from("/from/flag")),
            medium: Some(Medium::Rules),
            no_info: true,
            strict: true,
        })
        .unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(settings.medium, Medium::Rules);
        assert!(settings.no_info);
        assert_eq!(settings.decode_policy, DecodePolicy::Abort);
        assert_eq!(settings.collection_name("0"), "hkv-0");
    }
}
