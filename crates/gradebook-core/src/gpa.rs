//! Grade-point mapping and GPA averaging.
//!
//! Pure functions, no I/O. The average is unweighted: every course counts
//! once regardless of its credit load.

use serde::{Deserialize, Serialize};

use crate::error::{GradebookError, Result};
use crate::model::Score;

/// Grading scale as `(lowest score in tier, grade point)`, highest tier first.
const SCALE: [(u8, u8); 5] = [(70, 5), (60, 4), (50, 3), (45, 2), (40, 1)];

impl Score {
    /// Grade point (0-5) for this score. Tier lower bounds are inclusive.
    pub fn grade_point(self) -> u8 {
        SCALE
            .iter()
            .find(|(floor, _)| self.value() >= *floor)
            .map(|(_, point)| *point)
            .unwrap_or(0)
    }
}

/// Grade point for a raw integer score.
///
/// Scores outside [0, 100] are rejected with [`GradebookError::Domain`]
/// instead of being placed on the nearest tier.
pub fn score_to_point(score: i64) -> Result<u8> {
    Score::new(score)
        .map(Score::grade_point)
        .map_err(|_| GradebookError::Domain(score))
}

/// Mean grade point over `scores`, rounded to two decimals (half away from
/// zero). An empty slice yields `0.0`.
pub fn calculate_gpa(scores: &[Score]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let n = scores.len() as u64;
    let total: u64 = scores.iter().map(|s| u64::from(s.grade_point())).sum();
    // Round in integer hundredths: floor((200 * total + n) / 2n).
    let hundredths = (200 * total + n) / (2 * n);
    hundredths as f64 / 100.0
}

/// [`calculate_gpa`] over raw integers, rejecting any out-of-range score.
pub fn compute_gpa(scores: &[i64]) -> Result<f64> {
    let scores = scores
        .iter()
        .map(|&s| Score::new(s).map_err(|_| GradebookError::Domain(s)))
        .collect::<Result<Vec<_>>>()?;
    Ok(calculate_gpa(&scores))
}

/// A GPA together with the number of scores it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpaResult {
    pub gpa: f64,
    pub count: usize,
}

impl GpaResult {
    pub fn from_scores(scores: &[Score]) -> Self {
        Self {
            gpa: calculate_gpa(scores),
            count: scores.len(),
        }
    }

    /// Whether no scores contributed.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
