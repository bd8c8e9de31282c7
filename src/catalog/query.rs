use crate::catalog::record::{CatalogField, ProjectFiles, ProjectRecord, ProjectSummary};
use crate::catalog::similarity::{DEFAULT_SIMILARITY_THRESHOLD, filter_by_similarity};
use crate::catalog::store::{self, DEFAULT_DELIMITER};
use crate::error::CatalogError;
use std::path::{Path, PathBuf};

/// Read-only lookups over a persisted catalog.
///
/// Every call reloads the catalog file, so results reflect the last completed
/// build and nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    catalog_file: PathBuf,
    delimiter: u8,
    threshold: f64,
}

impl CatalogQuery {
    pub fn new(catalog_file: impl Into<PathBuf>) -> Self {
        Self {
            catalog_file: catalog_file.into(),
            delimiter: DEFAULT_DELIMITER,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn catalog_file(&self) -> &Path {
        &self.catalog_file
    }

    pub fn load(&self) -> Result<Vec<ProjectRecord>, CatalogError> {
        store::read_catalog(&self.catalog_file, self.delimiter)
    }

    fn fuzzy_by<S: AsRef<str>>(
        &self,
        field: CatalogField,
        targets: &[S],
    ) -> Result<Vec<ProjectRecord>, CatalogError> {
        let records = self.load()?;
        let total = records.len();
        let matched = filter_by_similarity(
            records,
            |record| field.value(record),
            targets,
            self.threshold,
        );
        tracing::debug!(
            column = field.column(),
            targets = targets.len(),
            threshold = self.threshold,
            matched = matched.len(),
            total,
            "fuzzy catalog lookup"
        );
        Ok(matched)
    }

    /// Projects whose year bucket equals `year` exactly.
    pub fn by_year(&self, year: &str) -> Result<Vec<ProjectSummary>, CatalogError> {
        Ok(self
            .load()?
            .iter()
            .filter(|record| CatalogField::Year.value(record) == year)
            .map(ProjectRecord::summary)
            .collect())
    }

    pub fn by_fuzzy_name_to_ids<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<ProjectSummary>, CatalogError> {
        Ok(self
            .fuzzy_by(CatalogField::Name, names)?
            .iter()
            .map(ProjectRecord::summary)
            .collect())
    }

    pub fn by_fuzzy_name_to_files<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<ProjectFiles>, CatalogError> {
        Ok(self
            .fuzzy_by(CatalogField::Name, names)?
            .iter()
            .map(ProjectRecord::file_manifest)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::write_catalog;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn record(name: &str, id: &str, year: &str, files: &str) -> ProjectRecord {
        ProjectRecord {
            name: name.to_string(),
            id: id.to_string(),
            year_bucket: year.to_string(),
            files: files.to_string(),
        }
    }

    fn seeded() -> (TempDir, CatalogQuery) {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.csv");
        write_catalog(
            &path,
            &[
                record("Harbor Bridge Survey", "1234", "2023", "report.pdf plan.dwg"),
                record("Kamloops Health Centre", "0815", "2022", "site.pdf"),
                record("Harbor Bridge Survey", "1299", "2021", ""),
            ],
            DEFAULT_DELIMITER,
        )
        .expect("seed catalog");
        (tmp, CatalogQuery::new(path))
    }

    #[test]
    fn by_year_is_exact_match() {
        let (_tmp, query) = seeded();
        let got = query.by_year("2023").expect("query");
        assert_eq!(
            got,
            vec![ProjectSummary {
                name: "Harbor Bridge Survey".to_string(),
                id: "1234".to_string(),
                year: "2023".to_string(),
            }]
        );
        assert!(query.by_year("2023 ").expect("query").is_empty());
        assert!(query.by_year("1999").expect("query").is_empty());
    }

    #[test]
    fn fuzzy_ids_tolerate_typos() {
        let (_tmp, query) = seeded();
        let got = query
            .by_fuzzy_name_to_ids(&["Harbor Bridge Survy"])
            .expect("query");
        let ids: Vec<_> = got.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1234", "1299"]);

        let strict = query
            .clone()
            .with_threshold(0.99)
            .by_fuzzy_name_to_ids(&["Harbor Bridge Survy"])
            .expect("query");
        assert!(strict.is_empty());
    }

    #[test]
    fn fuzzy_files_return_raw_manifest() {
        let (_tmp, query) = seeded();
        let got = query
            .by_fuzzy_name_to_files(&["Kamloops Health Center"])
            .expect("query");
        assert_eq!(
            got,
            vec![ProjectFiles {
                name: "Kamloops Health Centre".to_string(),
                files: "site.pdf".to_string(),
            }]
        );
    }

    #[test]
    fn empty_target_list_returns_nothing() {
        let (_tmp, query) = seeded();
        let none: [&str; 0] = [];
        assert!(query.by_fuzzy_name_to_ids(&none).expect("query").is_empty());
    }

    #[test]
    fn missing_catalog_is_a_hard_failure() {
        let tmp = tempdir().expect("tempdir");
        let query = CatalogQuery::new(tmp.path().join("absent.csv"));
        assert!(matches!(
            query.by_year("2023"),
            Err(CatalogError::CatalogMissing(_))
        ));
    }

    #[test]
    fn each_call_rereads_the_catalog() {
        let (_tmp, query) = seeded();
        assert_eq!(query.by_year("2022").expect("query").len(), 1);
        write_catalog(query.catalog_file(), &[], DEFAULT_DELIMITER).expect("rewrite");
        assert!(query.by_year("2022").expect("query").is_empty());
        fs::remove_file(query.catalog_file()).expect("rm");
        assert!(query.by_year("2022").is_err());
    }
}
