use crate::catalog::config::CatalogConfig;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

/// Paths given on the command line; these win over config and environment.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub archive_root: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub archive_root: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
}

impl CatalogPaths {
    pub fn archive_root(&self) -> Result<&Path> {
        self.archive_root.as_deref().ok_or_else(|| {
            anyhow!("archive root not configured; pass --archive-root or set CPG_ARCHIVE_ROOT")
        })
    }

    pub fn catalog_file(&self) -> Result<&Path> {
        self.catalog_file.as_deref().ok_or_else(|| {
            anyhow!("catalog file not configured; pass --catalog or set CPG_CATALOG_PATH")
        })
    }
}

pub fn resolve_paths(cfg: &CatalogConfig, overrides: &PathOverrides) -> CatalogPaths {
    CatalogPaths {
        archive_root: overrides
            .archive_root
            .clone()
            .or_else(|| cfg.paths.archive_root.clone()),
        catalog_file: overrides
            .catalog_file
            .clone()
            .or_else(|| cfg.paths.catalog_file.clone()),
    }
}
