//! The `gradebook records` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradebook_core::GradeFilter;

use super::StoreArgs;

pub fn execute(store_args: &StoreArgs) -> Result<()> {
    let store = store_args.open()?;
    let report = store.scan(&GradeFilter::all())?;

    if report.records.is_empty() {
        println!("No records found.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "Student", "Course", "Score", "Level", "Semester", "Session",
        ]);
        for r in &report.records {
            table.add_row(vec![
                Cell::new(r.student_name()),
                Cell::new(r.course()),
                Cell::new(r.score()),
                Cell::new(r.level()),
                Cell::new(r.semester()),
                Cell::new(r.session()),
            ]);
        }
        println!("{table}");
        println!("{} record(s)", report.records.len());
    }

    if !report.skipped.is_empty() {
        eprintln!(
            "{} malformed row(s) skipped in {}",
            report.skipped.len(),
            store.path().display()
        );
    }

    Ok(())
}
