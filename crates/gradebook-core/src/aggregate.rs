//! Derived GPA views composed from a [`GradeStore`] scan and the GPA engine.
//!
//! Nothing here is cached; every call re-reads the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GradebookError, Result};
use crate::gpa::GpaResult;
use crate::model::{fold_name, GradeFilter, Score};
use crate::store::GradeStore;

/// Label of the first semester of a session.
pub const SEMESTER_ONE: &str = "1";
/// Label of the second semester of a session.
pub const SEMESTER_TWO: &str = "2";

/// One student's GPA over every stored score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentGpa {
    /// Spelling of the name as first seen in the store.
    pub student_name: String,
    pub gpa: f64,
    pub count: usize,
}

/// GPA for every student in the store, regardless of level, semester or
/// session.
///
/// Names are grouped case-insensitively, so "ada" and "Ada" are one student.
/// The map is keyed by the case-folded name.
pub fn compute_all_student_gpas<S: GradeStore + ?Sized>(
    store: &S,
) -> Result<BTreeMap<String, StudentGpa>> {
    let mut groups: BTreeMap<String, (String, Vec<Score>)> = BTreeMap::new();
    for record in store.list_all()? {
        groups
            .entry(fold_name(record.student_name()))
            .or_insert_with(|| (record.student_name().to_string(), Vec::new()))
            .1
            .push(record.score());
    }

    Ok(groups
        .into_iter()
        .map(|(key, (student_name, scores))| {
            let GpaResult { gpa, count } = GpaResult::from_scores(&scores);
            (
                key,
                StudentGpa {
                    student_name,
                    gpa,
                    count,
                },
            )
        })
        .collect())
}

/// Semester and session GPAs for one student within a level and session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub semester_one: GpaResult,
    pub semester_two: GpaResult,
    /// GPA over both semesters together (CGPA).
    pub session: GpaResult,
}

/// GPA for semester "1", semester "2" and the whole session.
///
/// A semester without scores reports `0.0` with a count of zero.
pub fn session_report<S: GradeStore + ?Sized>(
    store: &S,
    student_name: &str,
    level: &str,
    session: &str,
) -> Result<SessionReport> {
    require("student name", student_name)?;
    require("level", level)?;
    require("session", session)?;

    let base = GradeFilter::student(student_name.trim())
        .level(level.trim())
        .session(session.trim());
    let first = store.query_scores(&base.clone().semester(SEMESTER_ONE))?;
    let second = store.query_scores(&base.semester(SEMESTER_TWO))?;
    let combined: Vec<Score> = first.iter().chain(second.iter()).copied().collect();

    Ok(SessionReport {
        semester_one: GpaResult::from_scores(&first),
        semester_two: GpaResult::from_scores(&second),
        session: GpaResult::from_scores(&combined),
    })
}

/// GPA for a single semester of a session.
pub fn semester_gpa<S: GradeStore + ?Sized>(
    store: &S,
    student_name: &str,
    level: &str,
    semester: &str,
    session: &str,
) -> Result<GpaResult> {
    require("student name", student_name)?;
    require("level", level)?;
    require("semester", semester)?;
    require("session", session)?;

    let filter = GradeFilter::student(student_name.trim())
        .level(level.trim())
        .semester(semester.trim())
        .session(session.trim());
    Ok(GpaResult::from_scores(&store.query_scores(&filter)?))
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(GradebookError::Validation(format!("{what} is required")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{append_record, MemoryGradeStore};

    fn seeded() -> MemoryGradeStore {
        let mut store = MemoryGradeStore::new();
        let rows = [
            ("Ada", "MTH101", 72, "100", "1", "2024/2025"),
            ("ada", "PHY101", 41, "100", "1", "2024/2025"),
            ("ADA", "MTH102", 65, "100", "2", "2024/2025"),
            ("Ada", "CSC201", 90, "200", "1", "2025/2026"),
            ("Bob", "MTH101", 30, "100", "1", "2024/2025"),
        ];
        for (name, course, score, level, semester, session) in rows {
            append_record(&mut store, name, course, score, level, semester, session).unwrap();
        }
        store
    }

    #[test]
    fn all_student_gpas_group_case_insensitively() {
        let gpas = compute_all_student_gpas(&seeded()).unwrap();
        assert_eq!(gpas.len(), 2);

        let ada = &gpas["ada"];
        assert_eq!(ada.student_name, "Ada");
        assert_eq!(ada.count, 4);
        // points 5, 1, 4, 5 -> 3.75
        assert_eq!(ada.gpa, 3.75);

        let bob = &gpas["bob"];
        assert_eq!(bob.count, 1);
        assert_eq!(bob.gpa, 0.0);
    }

    #[test]
    fn all_student_gpas_on_empty_store() {
        let gpas = compute_all_student_gpas(&MemoryGradeStore::new()).unwrap();
        assert!(gpas.is_empty());
    }

    #[test]
    fn session_report_splits_semesters() {
        let report = session_report(&seeded(), "ADA", "100", "2024/2025").unwrap();
        assert_eq!(report.semester_one.count, 2);
        assert_eq!(report.semester_one.gpa, 3.0);
        assert_eq!(report.semester_two.count, 1);
        assert_eq!(report.semester_two.gpa, 4.0);
        assert_eq!(report.session.count, 3);
        // points 5, 1, 4 -> 3.33
        assert_eq!(report.session.gpa, 3.33);
    }

    #[test]
    fn empty_semester_reports_zero() {
        let report = session_report(&seeded(), "Ada", "200", "2025/2026").unwrap();
        assert_eq!(report.semester_two.count, 0);
        assert_eq!(report.semester_two.gpa, 0.0);
        assert_eq!(report.session.gpa, 5.0);
    }

    #[test]
    fn session_report_requires_inputs() {
        let err = session_report(&seeded(), "Ada", "", "2024/2025").unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn single_semester_gpa() {
        let gpa = semester_gpa(&seeded(), "ada", "100", "2", "2024/2025").unwrap();
        assert_eq!(gpa.count, 1);
        assert_eq!(gpa.gpa, 4.0);

        let none = semester_gpa(&seeded(), "Bob", "100", "2", "2024/2025").unwrap();
        assert!(none.is_empty());
    }
}
