//! Core data model types for gradebook.
//!
//! A [`GradeRecord`] is one graded assessment; a [`GradeFilter`] selects
//! records during a store scan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GradebookError, Result};

/// Lowest score on the grading scale.
pub const MIN_SCORE: i64 = 0;
/// Highest score on the grading scale.
pub const MAX_SCORE: i64 = 100;

/// A raw course score, guaranteed to lie in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Validate a raw integer score.
    pub fn new(value: i64) -> Result<Self> {
        if (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(GradebookError::Validation(format!(
                "score must be between {MIN_SCORE} and {MAX_SCORE}, got {value}"
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = GradebookError;

    fn try_from(value: i64) -> Result<Self> {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Score {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| GradebookError::Validation(format!("score is not an integer: {s:?}")))?;
        Score::new(value)
    }
}

/// Case-folded form of a student name, used for matching and grouping.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One graded assessment.
///
/// Fields are private so a record can only be built through
/// [`GradeRecord::new`], which enforces the non-empty name/course rule.
/// The score range is enforced by [`Score`] itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeRecord {
    student_name: String,
    course: String,
    score: Score,
    level: String,
    semester: String,
    session: String,
}

impl GradeRecord {
    /// Build a record from caller input. Name and course are trimmed and must
    /// be non-empty; the score must lie in [0, 100].
    pub fn new(student_name: &str, course: &str, score: i64) -> Result<Self> {
        let student_name = student_name.trim();
        let course = course.trim();
        if student_name.is_empty() {
            return Err(GradebookError::Validation(
                "student name must not be empty".into(),
            ));
        }
        if course.is_empty() {
            return Err(GradebookError::Validation(
                "course must not be empty".into(),
            ));
        }
        Ok(Self {
            student_name: student_name.to_string(),
            course: course.to_string(),
            score: Score::new(score)?,
            level: String::new(),
            semester: String::new(),
            session: String::new(),
        })
    }

    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.trim().to_string();
        self
    }

    pub fn with_semester(mut self, semester: &str) -> Self {
        self.semester = semester.trim().to_string();
        self
    }

    pub fn with_session(mut self, session: &str) -> Self {
        self.session = session.trim().to_string();
        self
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn semester(&self) -> &str {
        &self.semester
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// The record as the six CSV fields, in header order.
    pub(crate) fn to_row(&self) -> [String; 6] {
        [
            self.student_name.clone(),
            self.course.clone(),
            self.score.to_string(),
            self.level.clone(),
            self.semester.clone(),
            self.session.clone(),
        ]
    }
}

/// Selects records during a store scan.
///
/// `None` fields impose no constraint. The student name matches
/// case-insensitively; level, semester and session must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeFilter {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
}

impl GradeFilter {
    /// A filter that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter for one student's records.
    pub fn student(name: impl Into<String>) -> Self {
        Self {
            student_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Whether `record` satisfies every constraint that is set.
    pub fn matches(&self, record: &GradeRecord) -> bool {
        if let Some(name) = &self.student_name {
            if fold_name(name) != fold_name(record.student_name()) {
                return false;
            }
        }
        let exact = |wanted: &Option<String>, actual: &str| match wanted {
            Some(w) => w == actual,
            None => true,
        };
        exact(&self.level, record.level())
            && exact(&self.semester, record.semester())
            && exact(&self.session, record.session())
    }
}
