use anyhow::Result;

use crate::catalog::actions::tool_definitions;

pub fn run() -> Result<String> {
    Ok(serde_json::to_string_pretty(&tool_definitions())?)
}
