use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;

use crate::catalog::actions::dispatch_named;
use crate::commands::CommandContext;

#[derive(Debug, Clone)]
pub struct CatalogActionOptions {
    pub name: String,
    pub data: Option<String>,
}

fn read_payload(data: Option<&str>) -> Result<Value> {
    let raw = match data {
        Some(raw) => raw.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read action input from stdin")?;
            buf
        }
    };
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(&raw).context("action input is not valid JSON")
}

pub fn run(ctx: &CommandContext, opts: &CatalogActionOptions) -> Result<String> {
    let payload = read_payload(opts.data.as_deref())?;
    let query = ctx.query()?;
    Ok(dispatch_named(&query, &opts.name, &payload)?)
}
