pub mod action;
pub mod build;
pub mod lookup;
pub mod status;
pub mod tools;

use anyhow::Result;
use serde::Serialize;

use crate::catalog::builder::CatalogBuilder;
use crate::catalog::config::{CatalogConfig, load_config};
use crate::catalog::paths::{CatalogPaths, PathOverrides, resolve_paths};
use crate::catalog::query::CatalogQuery;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("{} ok={}\n", self.command, self.ok);
        for detail in &self.details {
            out.push_str(&format!("  {detail}\n"));
        }
        for issue in &self.issues {
            out.push_str(&format!("  issue: {issue}\n"));
        }
        out
    }
}

/// Resolved configuration shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: CatalogConfig,
    pub paths: CatalogPaths,
}

impl CommandContext {
    pub fn load(overrides: &PathOverrides) -> Result<Self> {
        let config = load_config()?;
        let paths = resolve_paths(&config, overrides);
        Ok(Self { config, paths })
    }

    pub fn delimiter(&self) -> Result<u8> {
        Ok(self.config.storage.delimiter_byte()?)
    }

    pub fn builder(&self) -> Result<CatalogBuilder> {
        Ok(
            CatalogBuilder::new(self.paths.archive_root()?, self.paths.catalog_file()?)
                .with_delimiter(self.delimiter()?),
        )
    }

    pub fn query(&self) -> Result<CatalogQuery> {
        Ok(CatalogQuery::new(self.paths.catalog_file()?)
            .with_delimiter(self.delimiter()?)
            .with_threshold(self.config.similarity.threshold))
    }
}
