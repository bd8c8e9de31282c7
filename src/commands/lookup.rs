use anyhow::{Result, bail};

use crate::commands::CommandContext;

#[derive(Debug, Clone)]
pub enum CatalogLookup {
    ByYear(String),
    Ids(Vec<String>),
    Files(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct CatalogLookupOptions {
    pub lookup: CatalogLookup,
    pub threshold: Option<f64>,
}

/// Run one lookup and return its rows as a JSON array.
pub fn run(ctx: &CommandContext, opts: &CatalogLookupOptions) -> Result<String> {
    let mut query = ctx.query()?;
    if let Some(threshold) = opts.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("--threshold must be within 0..=1, got {threshold}");
        }
        query = query.with_threshold(threshold);
    }

    let out = match &opts.lookup {
        CatalogLookup::ByYear(year) => serde_json::to_string(&query.by_year(year)?)?,
        CatalogLookup::Ids(names) => serde_json::to_string(&query.by_fuzzy_name_to_ids(names)?)?,
        CatalogLookup::Files(names) => {
            serde_json::to_string(&query.by_fuzzy_name_to_files(names)?)?
        }
    };
    Ok(out)
}
