//! The `gradebook session` and `gradebook semester` commands.

use anyhow::Result;

use gradebook_core::{semester_gpa, session_report};

use super::{OutputFormat, StoreArgs};

pub fn execute(
    store_args: &StoreArgs,
    name: &str,
    level: &str,
    session: &str,
    format: OutputFormat,
) -> Result<()> {
    let store = store_args.open()?;
    let report = session_report(&store, name, level, session)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!(
            "Semester 1: {:.2} ({})  |  Semester 2: {:.2} ({})  |  Session CGPA: {:.2} ({})",
            report.semester_one.gpa,
            report.semester_one.count,
            report.semester_two.gpa,
            report.semester_two.count,
            report.session.gpa,
            report.session.count,
        ),
    }

    Ok(())
}

pub fn execute_semester(
    store_args: &StoreArgs,
    name: &str,
    level: &str,
    session: &str,
    semester: &str,
    format: OutputFormat,
) -> Result<()> {
    let store = store_args.open()?;
    let result = semester_gpa(&store, name, level, semester, session)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text if result.is_empty() => {
            println!("No records found for this selection.");
        }
        OutputFormat::Text => println!(
            "Semester {} GPA: {:.2} ({} course(s))",
            semester.trim(),
            result.gpa,
            result.count
        ),
    }

    Ok(())
}
