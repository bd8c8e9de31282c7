use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("archive directory unreadable: {}: {source}", path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog file missing: {}", .0.display())]
    CatalogMissing(PathBuf),
    #[error("catalog file corrupt: {}: {reason}", path.display())]
    CatalogCorrupt { path: PathBuf, reason: String },
    #[error("catalog build already running (lock held on {})", .0.display())]
    BuildLocked(PathBuf),
    #[error("config invalid: {0}")]
    InvalidConfig(String),
    #[error("invalid action input: {0}")]
    InvalidAction(String),
    #[error("io failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn code(&self) -> CatalogErrorCode {
        match self {
            Self::ArchiveUnreadable { .. } => CatalogErrorCode::E001ArchiveUnreadable,
            Self::CatalogMissing(_) => CatalogErrorCode::E002CatalogMissing,
            Self::CatalogCorrupt { .. } => CatalogErrorCode::E003CatalogCorrupt,
            Self::BuildLocked(_) => CatalogErrorCode::E004BuildLocked,
            Self::InvalidConfig(_) => CatalogErrorCode::E005ConfigInvalid,
            Self::InvalidAction(_) => CatalogErrorCode::E006ActionInvalid,
            Self::Io { .. } => CatalogErrorCode::E007Io,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorCode {
    E001ArchiveUnreadable,
    E002CatalogMissing,
    E003CatalogCorrupt,
    E004BuildLocked,
    E005ConfigInvalid,
    E006ActionInvalid,
    E007Io,
}

impl CatalogErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001ArchiveUnreadable => "E001_ARCHIVE_UNREADABLE",
            Self::E002CatalogMissing => "E002_CATALOG_MISSING",
            Self::E003CatalogCorrupt => "E003_CATALOG_CORRUPT",
            Self::E004BuildLocked => "E004_BUILD_LOCKED",
            Self::E005ConfigInvalid => "E005_CONFIG_INVALID",
            Self::E006ActionInvalid => "E006_ACTION_INVALID",
            Self::E007Io => "E007_IO",
        }
    }
}
