use serde::{Deserialize, Serialize};

pub const COLUMN_NAME: &str = "Project Name";
pub const COLUMN_ID: &str = "Project ID";
pub const COLUMN_YEAR: &str = "Year";
pub const COLUMN_FILES: &str = "Files";

pub const CATALOG_COLUMNS: [&str; 4] = [COLUMN_NAME, COLUMN_ID, COLUMN_YEAR, COLUMN_FILES];

/// One row of the catalog. Every field is a plain string; absent values are
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(rename = "Project Name")]
    pub name: String,
    #[serde(rename = "Project ID")]
    pub id: String,
    #[serde(rename = "Year")]
    pub year_bucket: String,
    #[serde(rename = "Files")]
    pub files: String,
}

impl ProjectRecord {
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            name: self.name.clone(),
            id: self.id.clone(),
            year: self.year_bucket.clone(),
        }
    }

    pub fn file_manifest(&self) -> ProjectFiles {
        ProjectFiles {
            name: self.name.clone(),
            files: self.files.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    Name,
    Id,
    Year,
    Files,
}

impl CatalogField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => COLUMN_NAME,
            Self::Id => COLUMN_ID,
            Self::Year => COLUMN_YEAR,
            Self::Files => COLUMN_FILES,
        }
    }

    pub fn value(self, record: &ProjectRecord) -> &str {
        match self {
            Self::Name => &record.name,
            Self::Id => &record.id,
            Self::Year => &record.year_bucket,
            Self::Files => &record.files,
        }
    }
}

/// `{name, id, year}` projection returned by the lookup-by-year and
/// lookup-ids operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(rename = "Project Name")]
    pub name: String,
    #[serde(rename = "Project ID")]
    pub id: String,
    #[serde(rename = "Year")]
    pub year: String,
}

/// `{name, files}` projection; `files` is the raw space-joined manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFiles {
    #[serde(rename = "Project Name")]
    pub name: String,
    #[serde(rename = "Files")]
    pub files: String,
}
