use anyhow::Result;
use std::collections::BTreeMap;

use crate::catalog::config::resolve_config_path;
use crate::catalog::record::CatalogField;
use crate::catalog::store::catalog_file_hash;
use crate::commands::{CommandContext, CommandReport};

pub fn run(ctx: &CommandContext) -> Result<CommandReport> {
    let mut report = CommandReport::new("status");

    match resolve_config_path() {
        Some(path) if path.exists() => report.detail(format!("config_file={}", path.display())),
        Some(path) => report.detail(format!("config_file={} (absent)", path.display())),
        None => report.detail("config_file=unresolved"),
    }
    report.detail(format!(
        "similarity.threshold={}",
        ctx.config.similarity.threshold
    ));
    report.detail(format!("storage.delimiter={:?}", ctx.config.storage.delimiter));

    match ctx.paths.archive_root() {
        Ok(root) if root.is_dir() => report.detail(format!("archive_root={}", root.display())),
        Ok(root) => report.issue(format!("archive root is not a directory: {}", root.display())),
        Err(err) => report.issue(err.to_string()),
    }

    let query = match ctx.query() {
        Ok(query) => query,
        Err(err) => {
            report.issue(err.to_string());
            return Ok(report);
        }
    };
    report.detail(format!("catalog_file={}", query.catalog_file().display()));

    let records = match query.load() {
        Ok(records) => records,
        Err(err) => {
            report.issue(format!("{}: {err}", err.code().as_str()));
            return Ok(report);
        }
    };
    report.detail(format!("catalog.records={}", records.len()));
    if let Ok(hash) = catalog_file_hash(query.catalog_file()) {
        report.detail(format!("catalog.content_hash={hash}"));
    }

    let mut per_year: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *per_year.entry(record.year_bucket.as_str()).or_default() += 1;
    }
    for (year, count) in per_year {
        report.detail(format!("catalog.year.{year}={count}"));
    }

    for (label, field) in [("id", CatalogField::Id), ("files", CatalogField::Files)] {
        let blank = records
            .iter()
            .filter(|record| field.value(record).is_empty())
            .count();
        report.detail(format!("catalog.records_without_{label}={blank}"));
    }

    Ok(report)
}
