//! The `gradebook scores` command.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use gradebook_core::{GradeFilter, GradeStore, Score};

use super::{FilterArgs, OutputFormat, StoreArgs};

#[derive(Serialize)]
struct CourseScore<'a> {
    course: &'a str,
    score: Score,
    grade_point: u8,
}

pub fn execute(store_args: &StoreArgs, filter: FilterArgs, format: OutputFormat) -> Result<()> {
    let store = store_args.open()?;
    let name = filter.name.trim().to_string();
    let pairs = store.query_courses_and_scores(&GradeFilter::from(filter))?;

    let rows: Vec<CourseScore<'_>> = pairs
        .iter()
        .map(|(course, score)| CourseScore {
            course,
            score: *score,
            grade_point: score.grade_point(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text if rows.is_empty() => {
            println!("No records found for {name}.");
        }
        OutputFormat::Text => {
            let mut table = Table::new();
            table.set_header(vec!["Course", "Score", "Grade point"]);
            for row in &rows {
                table.add_row(vec![
                    Cell::new(row.course),
                    Cell::new(row.score),
                    Cell::new(row.grade_point),
                ]);
            }
            println!("Scores for {name}:");
            println!("{table}");
        }
    }

    Ok(())
}
