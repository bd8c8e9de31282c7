use crate::catalog::record::ProjectRecord;
use crate::catalog::store::{self, DEFAULT_DELIMITER, WrittenCatalog};
use crate::catalog::tokens::parse_folder_name;
use crate::catalog::tree::{UnreadableDir, flatten_one_level, list_subdirectories};
use crate::error::CatalogError;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CollectedCatalog {
    pub records: Vec<ProjectRecord>,
    pub year_buckets: usize,
    pub unreadable: Vec<UnreadableDir>,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub year_buckets: usize,
    pub unreadable: Vec<UnreadableDir>,
    pub written: WrittenCatalog,
}

/// Build a catalog record from a project folder name and its file list.
pub fn project_record(folder: &str, year_bucket: &str, files: &[String]) -> ProjectRecord {
    let parsed = parse_folder_name(folder);
    if !parsed.date.is_empty() {
        tracing::trace!(folder, date = %parsed.date, "folder date not kept in catalog");
    }
    ProjectRecord {
        name: parsed.name,
        id: parsed.id,
        year_bucket: year_bucket.to_string(),
        files: files.join(" "),
    }
}

/// Flattens `<archive_root>/<year bucket>/<project folder>/**` into a catalog
/// file. Rebuilds always replace the previous catalog wholesale.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    archive_root: PathBuf,
    catalog_file: PathBuf,
    delimiter: u8,
}

impl CatalogBuilder {
    pub fn new(archive_root: impl Into<PathBuf>, catalog_file: impl Into<PathBuf>) -> Self {
        Self {
            archive_root: archive_root.into(),
            catalog_file: catalog_file.into(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    pub fn catalog_file(&self) -> &Path {
        &self.catalog_file
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .catalog_file
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("catalog"));
        name.push(".lock");
        self.catalog_file.with_file_name(name)
    }

    fn note_unreadable(unreadable: &mut Vec<UnreadableDir>, err: CatalogError) {
        let path = match &err {
            CatalogError::ArchiveUnreadable { path, .. } => path.clone(),
            _ => PathBuf::new(),
        };
        tracing::warn!(
            code = err.code().as_str(),
            path = %path.display(),
            error = %err,
            "treating unreadable archive directory as empty"
        );
        unreadable.push(UnreadableDir {
            path,
            error: err.to_string(),
        });
    }

    /// Walk the archive and produce records without touching the catalog file.
    ///
    /// Unreadable directories and entries contribute nothing and are listed
    /// in the outcome instead of failing the walk. A project with an
    /// unreadable subtree keeps the files that could be read.
    pub fn collect(&self) -> CollectedCatalog {
        let mut out = CollectedCatalog::default();

        let buckets = match list_subdirectories(&self.archive_root, &mut out.unreadable) {
            Ok(buckets) => buckets,
            Err(err) => {
                Self::note_unreadable(&mut out.unreadable, err);
                return out;
            }
        };
        out.year_buckets = buckets.len();

        for (year_bucket, bucket_path) in buckets {
            let projects = match flatten_one_level(&bucket_path, &mut out.unreadable) {
                Ok(projects) => projects,
                Err(err) => {
                    Self::note_unreadable(&mut out.unreadable, err);
                    continue;
                }
            };
            tracing::debug!(
                year_bucket = %year_bucket,
                projects = projects.len(),
                "scanned year bucket"
            );
            for (folder, files) in projects {
                out.records.push(project_record(&folder, &year_bucket, &files));
            }
        }

        out
    }

    fn acquire_lock(&self) -> Result<fs::File, CatalogError> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| CatalogError::Io {
                path: lock_path.clone(),
                source,
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(file),
            Err(err) if err.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                Err(CatalogError::BuildLocked(lock_path))
            }
            Err(source) => Err(CatalogError::Io {
                path: lock_path,
                source,
            }),
        }
    }

    /// Collect the archive and replace the catalog file.
    ///
    /// Holds an exclusive lock next to the catalog for the whole run; a second
    /// concurrent build fails with `BuildLocked`.
    pub fn build(&self) -> Result<BuildOutcome, CatalogError> {
        let lock = self.acquire_lock()?;
        tracing::info!(
            archive_root = %self.archive_root.display(),
            catalog_file = %self.catalog_file.display(),
            "building project catalog"
        );

        let collected = self.collect();
        let written =
            store::write_catalog(&self.catalog_file, &collected.records, self.delimiter)?;
        tracing::info!(
            records = written.records,
            year_buckets = collected.year_buckets,
            unreadable = collected.unreadable.len(),
            content_hash = %written.content_hash,
            "project catalog written"
        );

        drop(lock);
        Ok(BuildOutcome {
            year_buckets: collected.year_buckets,
            unreadable: collected.unreadable,
            written,
        })
    }
}
