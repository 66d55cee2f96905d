//! Subcommand implementations and the options they share.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use gradebook_core::config::load_config_from;
use gradebook_core::{CsvGradeStore, GradeFilter};

pub mod add;
pub mod all_gpas;
pub mod gpa;
pub mod init;
pub mod records;
pub mod scores;
pub mod session;

/// Where the grade records live.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV data file (overrides the config)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,
}

impl StoreArgs {
    /// Resolve the data file and open the store.
    pub fn open(&self) -> Result<CsvGradeStore> {
        if let Some(path) = &self.data_file {
            return Ok(CsvGradeStore::new(path));
        }
        let config = load_config_from(self.config.as_deref())?;
        tracing::debug!("using data file {}", config.data_file.display());
        Ok(config.open_store())
    }
}

/// Selects one student's records.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Student name (case-insensitive)
    #[arg(long)]
    pub name: String,

    /// Only records at this level
    #[arg(long)]
    pub level: Option<String>,

    /// Only records in this semester
    #[arg(long)]
    pub semester: Option<String>,

    /// Only records in this session
    #[arg(long)]
    pub session: Option<String>,
}

impl From<FilterArgs> for GradeFilter {
    fn from(args: FilterArgs) -> Self {
        GradeFilter {
            student_name: Some(args.name.trim().to_string()),
            level: args.level.map(|l| l.trim().to_string()),
            semester: args.semester.map(|s| s.trim().to_string()),
            session: args.session.map(|s| s.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
