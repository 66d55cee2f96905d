//! The `gradebook add` command.

use anyhow::Result;

use gradebook_core::append_record;

use super::StoreArgs;

pub fn execute(
    store_args: &StoreArgs,
    name: &str,
    course: &str,
    score: i64,
    level: &str,
    semester: &str,
    session: &str,
) -> Result<()> {
    let mut store = store_args.open()?;
    let record = append_record(&mut store, name, course, score, level, semester, session)?;

    tracing::info!("saved record to {}", store.path().display());
    println!(
        "Record saved: {} - {}: {}",
        record.student_name(),
        record.course(),
        record.score()
    );

    Ok(())
}
