//! The `gradebook init` command.

use std::path::Path;

use anyhow::{Context, Result};

use gradebook_core::config::{GradebookConfig, LOCAL_CONFIG_FILE};

pub fn execute(data_file: Option<&Path>) -> Result<()> {
    let config_path = Path::new(LOCAL_CONFIG_FILE);
    if config_path.exists() {
        println!("{LOCAL_CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }

    let mut config = GradebookConfig::default();
    if let Some(path) = data_file {
        config.data_file = path.to_path_buf();
    }
    let content = format!("{CONFIG_PREAMBLE}{}", config.to_toml()?);
    std::fs::write(config_path, content)
        .with_context(|| format!("failed to write {LOCAL_CONFIG_FILE}"))?;
    println!("Created {LOCAL_CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Run: gradebook add --name Ada --course MTH101 --score 72 --level 100");
    println!("  2. Run: gradebook gpa --name Ada");
    println!("  3. Run: gradebook all-gpas");

    Ok(())
}

const CONFIG_PREAMBLE: &str = "# gradebook configuration

# CSV file holding the grade records, relative to this file.
# The GRADEBOOK_DATA_FILE environment variable overrides it.
";
