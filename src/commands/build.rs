use anyhow::Result;

use crate::catalog::tree::UnreadableDir;
use crate::commands::{CommandContext, CommandReport};
use crate::error::CatalogError;

#[derive(Debug, Clone, Default)]
pub struct CatalogBuildOptions {
    pub dry_run: bool,
}

fn report_unreadable(report: &mut CommandReport, unreadable: &[UnreadableDir]) {
    report.detail(format!("unreadable_dirs={}", unreadable.len()));
    for dir in unreadable {
        report.detail(format!(
            "unreadable.dir={} error={}",
            dir.path.display(),
            dir.error
        ));
    }
}

pub fn run(ctx: &CommandContext, opts: &CatalogBuildOptions) -> Result<CommandReport> {
    let builder = ctx.builder()?;
    let mut report = CommandReport::new("build");

    report.detail(format!("archive_root={}", builder.archive_root().display()));
    report.detail(format!("catalog_file={}", builder.catalog_file().display()));

    if opts.dry_run {
        let collected = builder.collect();
        report.detail("dry-run: catalog not written");
        report.detail(format!("year_buckets={}", collected.year_buckets));
        report.detail(format!("records={}", collected.records.len()));
        report_unreadable(&mut report, &collected.unreadable);
        return Ok(report);
    }

    let outcome = match builder.build() {
        Ok(outcome) => outcome,
        Err(err @ CatalogError::BuildLocked(_)) => {
            report.issue(format!("{}: {err}", err.code().as_str()));
            return Ok(report);
        }
        Err(err) => return Err(err.into()),
    };

    report.detail(format!("written={}", outcome.written.path.display()));
    report.detail(format!("year_buckets={}", outcome.year_buckets));
    report.detail(format!("records={}", outcome.written.records));
    report.detail(format!("bytes={}", outcome.written.bytes));
    report.detail(format!("content_hash={}", outcome.written.content_hash));
    report_unreadable(&mut report, &outcome.unreadable);

    Ok(report)
}
