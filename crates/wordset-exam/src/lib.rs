//! # wordset-exam
//!
//! Exam generation and scoring for word sets.
//!
//! - [`questions`] - question generation, distractor selection, shuffling
//! - [`scoring`] - answer validation and score calculation
//! - [`types`] - shared exam types
//!
//! ```rust
//! use wordset_exam::{calculate_score, generate_questions, ExamDirection, ExamMode, ExamWord};
//!
//! let words = vec![
//!     ExamWord::new("1", "apple", "사과"),
//!     ExamWord::new("2", "pear", "배"),
//! ];
//! let questions = generate_questions(&words, ExamMode::ShortAnswer, ExamDirection::Forward, 2);
//! assert_eq!(questions.len(), 2);
//!
//! let result = calculate_score(&[], questions.len());
//! assert_eq!(result.percentage, 0.0);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod questions;
pub mod scoring;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use questions::{
    generate_questions, generate_questions_with_rng, generate_wrong_answers,
    generate_wrong_answers_with_rng, multiple_choice_count, shuffle,
};
pub use scoring::{calculate_score, validate_answer};
pub use types::*;
