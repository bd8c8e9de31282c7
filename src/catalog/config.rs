use crate::catalog::similarity::DEFAULT_SIMILARITY_THRESHOLD;
use crate::error::CatalogError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogPathsConfig {
    pub archive_root: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub delimiter: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn delimiter_byte(&self) -> Result<u8, CatalogError> {
        let raw = if self.delimiter == "\\t" { "\t" } else { self.delimiter.as_str() };
        match raw.as_bytes() {
            [byte] if byte.is_ascii() && !matches!(*byte, b'"' | b'\n' | b'\r') => Ok(*byte),
            _ => Err(CatalogError::InvalidConfig(format!(
                "catalog delimiter must be one ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    pub paths: CatalogPathsConfig,
    pub similarity: SimilarityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialCatalogConfig {
    paths: Option<CatalogPathsConfig>,
    similarity: Option<SimilarityConfig>,
    storage: Option<StorageConfig>,
}

fn env_or_f64(var: &str, fallback: f64) -> Result<f64> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<f64>()
            .with_context(|| format!("{var} must be a number, got {v:?}")),
        _ => Ok(fallback),
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

pub fn validate(cfg: &CatalogConfig) -> Result<(), CatalogError> {
    let t = cfg.similarity.threshold;
    if !(0.0..=1.0).contains(&t) {
        return Err(CatalogError::InvalidConfig(format!(
            "similarity threshold must be within 0..=1, got {t}"
        )));
    }
    cfg.storage.delimiter_byte()?;
    Ok(())
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(custom) = env_path("CPG_CONFIG_PATH") {
        return Some(custom);
    }
    let home = dirs::home_dir()?;
    Some(home.join(".cpg").join("config.toml"))
}

fn merge_file_config(base: &mut CatalogConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: PartialCatalogConfig = toml::from_str(&raw).map_err(|err| {
        CatalogError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(paths) = parsed.paths {
        base.paths = paths;
    }
    if let Some(similarity) = parsed.similarity {
        base.similarity = similarity;
    }
    if let Some(storage) = parsed.storage {
        base.storage = storage;
    }
    Ok(())
}

fn apply_env(cfg: &mut CatalogConfig) -> Result<()> {
    if let Some(root) = env_path("CPG_ARCHIVE_ROOT") {
        cfg.paths.archive_root = Some(root);
    }
    if let Some(catalog) = env_path("CPG_CATALOG_PATH") {
        cfg.paths.catalog_file = Some(catalog);
    }
    cfg.similarity.threshold = env_or_f64("CPG_SIMILARITY_THRESHOLD", cfg.similarity.threshold)?;
    cfg.storage.delimiter = env_or_string("CPG_CATALOG_DELIMITER", &cfg.storage.delimiter);
    Ok(())
}

/// Defaults, then the config file, then `CPG_*` environment overrides.
pub fn load_config() -> Result<CatalogConfig> {
    let mut cfg = CatalogConfig::default();
    merge_file_config(&mut cfg)?;
    apply_env(&mut cfg)?;
    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = CatalogConfig::default();
        assert_eq!(cfg.similarity.threshold, 0.8);
        assert_eq!(cfg.storage.delimiter_byte().expect("delimiter"), b',');
        assert!(cfg.paths.archive_root.is_none());
        assert!(cfg.paths.catalog_file.is_none());
        validate(&cfg).expect("valid");
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let mut cfg = CatalogConfig::default();
        cfg.similarity.threshold = 1.5;
        assert!(matches!(validate(&cfg), Err(CatalogError::InvalidConfig(_))));
        cfg.similarity.threshold = f64::NAN;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn delimiter_must_be_one_safe_byte() {
        let storage = |d: &str| StorageConfig {
            delimiter: d.to_string(),
        };
        assert_eq!(storage(";").delimiter_byte().expect("semicolon"), b';');
        assert_eq!(storage("\\t").delimiter_byte().expect("tab"), b'\t');
        for bad in ["", ",,", "\"", "\n", "§"] {
            assert!(storage(bad).delimiter_byte().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn partial_file_config_parses_sections_independently() {
        let parsed: PartialCatalogConfig = toml::from_str(
            r#"
[paths]
archive_root = "/srv/archive"

[similarity]
threshold = 0.9
"#,
        )
        .expect("parse");
        let paths = parsed.paths.expect("paths");
        assert_eq!(paths.archive_root, Some(PathBuf::from("/srv/archive")));
        assert!(paths.catalog_file.is_none());
        assert_eq!(parsed.similarity.expect("similarity").threshold, 0.9);
        assert!(parsed.storage.is_none());
    }
}
