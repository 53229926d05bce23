//! Answer checking and score calculation.

use crate::types::{ExamAnswer, ExamResult, ValidationMode};

/// Checks a typed answer against the expected one.
///
/// A blank answer never validates.
pub fn validate_answer(user_answer: &str, correct_answer: &str, mode: ValidationMode) -> bool {
    let user = user_answer.trim().to_lowercase();
    if user.is_empty() {
        return false;
    }

    match mode {
        ValidationMode::Exact => user == correct_answer.trim().to_lowercase(),
        ValidationMode::Fuzzy => correct_answer.to_lowercase().contains(&user),
    }
}

/// Tallies answers. `duration` is left at zero for the caller to fill in.
pub fn calculate_score(answers: &[ExamAnswer], question_count: usize) -> ExamResult {
    let correct_count = answers.iter().filter(|a| a.is_correct).count();
    let incorrect_count = answers.len() - correct_count;

    let percentage = if question_count == 0 {
        0.0
    } else {
        round_one_decimal(correct_count as f64 / question_count as f64 * 100.0)
    };

    ExamResult {
        correct_count,
        incorrect_count,
        percentage,
        duration: 0,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
