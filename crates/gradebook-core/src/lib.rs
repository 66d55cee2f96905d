//! gradebook-core — Grade record store and GPA engine.
//!
//! This crate defines the record model, the append-only CSV store, the
//! grade-point scale and the GPA views that the `gradebook` CLI builds on.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod gpa;
pub mod model;
pub mod store;

pub use aggregate::{
    compute_all_student_gpas, semester_gpa, session_report, SessionReport, StudentGpa,
};
pub use error::{GradebookError, Result};
pub use gpa::{calculate_gpa, compute_gpa, score_to_point, GpaResult};
pub use model::{GradeFilter, GradeRecord, Score};
pub use store::{append_record, CsvGradeStore, GradeStore, MemoryGradeStore};
