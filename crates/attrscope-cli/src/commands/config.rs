//! Configuration display.

use anyhow::Result;
use clap::ValueEnum;
use std::path::Path;

/// Output format of `attrscope config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
    Json,
}

/// Show the resolved configuration.
pub fn show(config: Option<&Path>, project: &Path, format: OutputFormat) -> Result<()> {
    let config = super::load_config(config, project)?;
    // Reject invalid options here too, not only when filtering.
    config.policy()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Toml => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        OutputFormat::Text => {
            let filter = &config.filter;

            println!("attrscope Configuration");
            println!("=======================\n");

            println!("Filter:");
            println!("  Exact-scope attributes: {}", list(&filter.attributes_with_scope));
            println!("  Scope attributes: {}", list(&filter.scope_attributes));
            println!(
                "  Suffix-scope attributes: {}",
                list(&filter.attributes_with_scope_suffix)
            );
            println!(
                "  Exempt entities: {}",
                list(&filter.ignore_check_for_entities)
            );
            println!("  Ignore case: {}", filter.ignore_case);
        }
    }

    Ok(())
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
