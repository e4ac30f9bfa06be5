//! Filter JSON state records.

use anyhow::{Context, Result};
use attrscope::{ProcessingFilter, ScopeFilter};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Filters the record(s) in `input` (or stdin) and prints the result.
pub fn run(config: Option<&Path>, project: &Path, input: Option<&Path>) -> Result<()> {
    let config = super::load_config(config, project)?;
    let filter = ScopeFilter::new(config.policy()?);

    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let mut document: Value = serde_json::from_str(&text).context("Input is not valid JSON")?;

    match &mut document {
        Value::Array(records) => {
            debug!(records = records.len(), "Filtering state records");
            for (index, record) in records.iter_mut().enumerate() {
                filter
                    .process(record)
                    .with_context(|| format!("Invalid state record at index {index}"))?;
            }
        }
        record => filter.process(record).context("Invalid state record")?,
    }

    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}
