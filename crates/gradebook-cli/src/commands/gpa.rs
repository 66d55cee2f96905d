//! The `gradebook gpa` command.

use anyhow::Result;
use serde::Serialize;

use gradebook_core::{GpaResult, GradeFilter, GradeStore};

use super::{FilterArgs, OutputFormat, StoreArgs};

#[derive(Serialize)]
struct StudentResult<'a> {
    student_name: &'a str,
    #[serde(flatten)]
    result: GpaResult,
}

pub fn execute(store_args: &StoreArgs, filter: FilterArgs, format: OutputFormat) -> Result<()> {
    let store = store_args.open()?;
    let name = filter.name.trim().to_string();
    let scores = store.query_scores(&GradeFilter::from(filter))?;
    let result = GpaResult::from_scores(&scores);

    match format {
        OutputFormat::Json => {
            let out = StudentResult {
                student_name: &name,
                result,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text if result.is_empty() => {
            println!("No records found for {name}.");
        }
        OutputFormat::Text => {
            println!("GPA for {name}: {:.2} ({} scores)", result.gpa, result.count);
        }
    }

    Ok(())
}
