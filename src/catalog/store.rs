use crate::catalog::record::{CATALOG_COLUMNS, ProjectRecord};
use crate::error::CatalogError;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_DELIMITER: u8 = b',';

#[derive(Debug, Clone)]
pub struct WrittenCatalog {
    pub path: PathBuf,
    pub records: usize,
    pub bytes: usize,
    pub content_hash: String,
}

fn io_failure(path: &Path, source: std::io::Error) -> CatalogError {
    CatalogError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_failure(path: &Path, err: csv::Error) -> CatalogError {
    if err.is_io_error() {
        return io_failure(path, err.into());
    }
    CatalogError::CatalogCorrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn catalog_file_hash(path: &Path) -> Result<String, CatalogError> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => CatalogError::CatalogMissing(path.to_path_buf()),
        _ => io_failure(path, err),
    })?;
    Ok(content_hash(&bytes))
}

/// Serialize records as a delimited table with a header row.
///
/// The header is written even when `records` is empty. Fields are quoted only
/// when they contain the delimiter, a quote, or a line break.
pub fn render_catalog(records: &[ProjectRecord], delimiter: u8) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CATALOG_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

/// Replace the catalog at `path` with `records`.
///
/// The new content lands in a sibling temp file first and is renamed into
/// place, so readers never observe a half-written catalog.
pub fn write_catalog(
    path: &Path,
    records: &[ProjectRecord],
    delimiter: u8,
) -> Result<WrittenCatalog, CatalogError> {
    let bytes = render_catalog(records, delimiter)
        .map_err(|err| io_failure(path, std::io::Error::from(err)))?;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| io_failure(parent, err))?;

    let mut staged = NamedTempFile::new_in(parent).map_err(|err| io_failure(parent, err))?;
    staged
        .write_all(&bytes)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|err| io_failure(staged.path(), err))?;
    staged
        .persist(path)
        .map_err(|err| io_failure(path, err.error))?;

    Ok(WrittenCatalog {
        path: path.to_path_buf(),
        records: records.len(),
        bytes: bytes.len(),
        content_hash: content_hash(&bytes),
    })
}

/// Load every record from the catalog at `path`.
///
/// A missing file and an unparsable one are both hard errors; an empty
/// catalog is only ever a header row.
pub fn read_catalog(path: &Path, delimiter: u8) -> Result<Vec<ProjectRecord>, CatalogError> {
    let file = fs::File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => CatalogError::CatalogMissing(path.to_path_buf()),
        _ => io_failure(path, err),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| read_failure(path, err))?
        .clone();
    if !headers.iter().eq(CATALOG_COLUMNS.iter().copied()) {
        return Err(CatalogError::CatalogCorrupt {
            path: path.to_path_buf(),
            reason: format!(
                "expected columns [{}], found [{}]",
                CATALOG_COLUMNS.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    let mut out = Vec::new();
    for row in reader.deserialize::<ProjectRecord>() {
        out.push(row.map_err(|err| read_failure(path, err))?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, id: &str, year: &str, files: &str) -> ProjectRecord {
        ProjectRecord {
            name: name.to_string(),
            id: id.to_string(),
            year_bucket: year.to_string(),
            files: files.to_string(),
        }
    }

    #[test]
    fn empty_catalog_still_has_header() {
        let bytes = render_catalog(&[], DEFAULT_DELIMITER).expect("render");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "Project Name,Project ID,Year,Files\n"
        );
    }

    #[test]
    fn empty_values_are_bare_fields_and_commas_are_quoted() {
        let rows = vec![
            record("Misc Scans", "", "2022", ""),
            record("Smith, Jones Residence", "0042", "2021", "a.pdf b.pdf"),
        ];
        let text = String::from_utf8(render_catalog(&rows, DEFAULT_DELIMITER).expect("render"))
            .expect("utf8");
        assert_eq!(
            text,
            "Project Name,Project ID,Year,Files\n\
             Misc Scans,,2022,\n\
             \"Smith, Jones Residence\",0042,2021,a.pdf b.pdf\n"
        );
    }

    #[test]
    fn written_catalog_reads_back_with_empty_strings() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("data/projects.csv");
        let rows = vec![
            record("Harbor Bridge Survey", "1234", "2023", "report.pdf plan.dwg"),
            record("Quote \"Q\" Hall", "", "2020", ""),
        ];

        let written = write_catalog(&path, &rows, DEFAULT_DELIMITER).expect("write");
        assert_eq!(written.records, 2);
        assert_eq!(
            written.content_hash,
            catalog_file_hash(&path).expect("hash")
        );

        let loaded = read_catalog(&path, DEFAULT_DELIMITER).expect("read");
        assert_eq!(loaded, rows);
        assert_eq!(loaded[1].id, "");
        assert_eq!(loaded[1].files, "");
    }

    #[test]
    fn leading_zero_ids_survive_as_strings() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.csv");
        fs::write(
            &path,
            "Project Name,Project ID,Year,Files\nOld Depot,0007,1999,scan.tif\n",
        )
        .expect("write");

        let loaded = read_catalog(&path, DEFAULT_DELIMITER).expect("read");
        assert_eq!(loaded[0].id, "0007");
    }

    #[test]
    fn missing_catalog_is_reported_as_missing() {
        let tmp = tempdir().expect("tempdir");
        let err = read_catalog(&tmp.path().join("none.csv"), DEFAULT_DELIMITER)
            .expect_err("missing");
        assert!(matches!(err, CatalogError::CatalogMissing(_)));
    }

    #[test]
    fn wrong_header_is_corrupt() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.csv");
        fs::write(&path, "Name,ID,Year,Files\nA,1,2,x\n").expect("write");
        let err = read_catalog(&path, DEFAULT_DELIMITER).expect_err("corrupt");
        assert!(matches!(err, CatalogError::CatalogCorrupt { .. }));
    }

    #[test]
    fn short_row_is_corrupt() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.csv");
        fs::write(&path, "Project Name,Project ID,Year,Files\nA,1\n").expect("write");
        let err = read_catalog(&path, DEFAULT_DELIMITER).expect_err("corrupt");
        assert!(matches!(err, CatalogError::CatalogCorrupt { .. }));
    }

    #[test]
    fn custom_delimiter_round_trips() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.tsv");
        let rows = vec![record("Harbor, Bridge", "1234", "2023", "a b")];
        write_catalog(&path, &rows, b'\t').expect("write");
        let raw = fs::read_to_string(&path).expect("raw");
        assert!(raw.starts_with("Project Name\tProject ID\tYear\tFiles\n"));
        assert!(raw.contains("Harbor, Bridge\t1234"));
        assert_eq!(read_catalog(&path, b'\t').expect("read"), rows);
    }
}
