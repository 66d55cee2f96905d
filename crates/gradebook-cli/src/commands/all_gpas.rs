//! The `gradebook all-gpas` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::{compute_all_student_gpas, StudentGpa};

use super::{OutputFormat, StoreArgs};

pub fn execute(store_args: &StoreArgs, format: OutputFormat) -> Result<()> {
    let store = store_args.open()?;
    let gpas: Vec<StudentGpa> = compute_all_student_gpas(&store)?.into_values().collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&gpas)?);
        }
        OutputFormat::Text if gpas.is_empty() => {
            println!("No GPA records found.");
        }
        OutputFormat::Text => {
            let mut table = Table::new();
            table.set_header(vec!["Student", "GPA", "Scores"]);
            for s in &gpas {
                table.add_row(vec![
                    Cell::new(&s.student_name),
                    Cell::new(format!("{:.2}", s.gpa)),
                    Cell::new(s.count),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
