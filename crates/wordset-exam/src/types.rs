//! Exam Types
//!
//! Shared data structures for question generation and scoring.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==================== Constants ====================

/// Number of distractors attached to each multiple-choice question
pub const WRONG_ANSWER_COUNT: usize = 3;

/// Share of multiple-choice questions in a mixed exam, in tenths
pub const MIXED_MULTIPLE_CHOICE_TENTHS: usize = 3;

// ==================== Inputs ====================

/// A word as seen by the exam generator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamWord {
    pub id: String,
    /// The word itself
    pub text: String,
    /// Its meaning or translation
    pub meaning: String,
}

impl ExamWord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            meaning: meaning.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamMode {
    MultipleChoice,
    ShortAnswer,
    Mixed,
}

/// Which side of the card is shown as the prompt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamDirection {
    /// Show the word, ask for the meaning
    #[default]
    Forward,
    /// Show the meaning, ask for the word
    Reverse,
}

impl ExamDirection {
    /// Returns `(prompt, answer)` for a word in this direction.
    pub fn split<'a>(&self, word: &'a ExamWord) -> (&'a str, &'a str) {
        match self {
            ExamDirection::Forward => (&word.text, &word.meaning),
            ExamDirection::Reverse => (&word.meaning, &word.text),
        }
    }

    /// The field answers are drawn from.
    pub fn answer_of<'a>(&self, word: &'a ExamWord) -> &'a str {
        self.split(word).1
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Case-insensitive, trimmed equality
    #[default]
    Exact,
    /// Case-insensitive containment in the correct answer
    Fuzzy,
}

/// Exam settings chosen before starting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfig {
    pub mode: ExamMode,
    #[serde(default)]
    pub direction: ExamDirection,
    pub question_count: usize,
    #[serde(default)]
    pub validation: ValidationMode,
}

impl ExamConfig {
    pub fn new(mode: ExamMode, direction: ExamDirection, question_count: usize) -> Self {
        Self {
            mode,
            direction,
            question_count,
            validation: ValidationMode::Exact,
        }
    }

    pub fn validate(&self, available_words: usize) -> Result<(), ExamError> {
        if available_words == 0 {
            return Err(ExamError::NoWords);
        }
        if self.question_count == 0 {
            return Err(ExamError::InvalidQuestionCount(self.question_count));
        }
        Ok(())
    }

    /// Number of questions an exam over `available_words` words will have.
    pub fn effective_count(&self, available_words: usize) -> usize {
        self.question_count.min(available_words)
    }
}

// ==================== Outputs ====================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestion {
    pub word_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub prompt: String,
    pub correct_answer: String,
    /// Present only for multiple-choice questions
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub choices: Option<Vec<String>>,
}

impl ExamQuestion {
    pub fn is_multiple_choice(&self) -> bool {
        self.question_type == QuestionType::MultipleChoice
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnswer {
    pub question_index: usize,
    pub user_answer: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Percentage of questions answered correctly, one decimal place
    pub percentage: f64,
    /// Elapsed seconds, filled in by the caller
    pub duration: u64,
}

// ==================== Errors ====================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    #[error("word set has no words")]
    NoWords,
    #[error("invalid question count: {0}")]
    InvalidQuestionCount(usize),
}
