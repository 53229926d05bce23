use rand::Rng;
use serde::{Deserialize, Serialize};
use wordset_exam::{
    calculate_score, generate_questions_with_rng, validate_answer, ExamAnswer, ExamConfig,
    ExamQuestion, ExamResult, ExamWord, ValidationMode,
};

use crate::services::SessionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSession {
    pub word_set_id: String,
    pub config: ExamConfig,
    pub questions: Vec<ExamQuestion>,
    pub answers: Vec<ExamAnswer>,
    pub current_index: usize,
    /// Milliseconds since the Unix epoch
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub result: Option<ExamResult>,
}

impl ExamSession {
    pub fn start<R: Rng + ?Sized>(
        rng: &mut R,
        word_set_id: impl Into<String>,
        config: ExamConfig,
        words: &[ExamWord],
        now_ms: i64,
    ) -> Result<Self, SessionError> {
        config.validate(words.len())?;
        let questions = generate_questions_with_rng(
            rng,
            words,
            config.mode,
            config.direction,
            config.question_count,
        );

        Ok(Self {
            word_set_id: word_set_id.into(),
            config,
            questions,
            answers: Vec::new(),
            current_index: 0,
            started_at: now_ms,
            finished_at: None,
            result: None,
        })
    }

    pub fn current_question(&self) -> Option<&ExamQuestion> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.current_index)
    }

    /// Checks `user_answer` against the current question, records it and
    /// advances. Choices are matched exactly; typed answers use the
    /// configured validation mode.
    pub fn submit_answer(&mut self, user_answer: &str) -> Result<ExamAnswer, SessionError> {
        if self.is_finished() {
            return Err(SessionError::AlreadyFinished);
        }
        let question = self
            .questions
            .get(self.current_index)
            .ok_or(SessionError::NoPendingQuestion)?;

        let mode = if question.is_multiple_choice() {
            ValidationMode::Exact
        } else {
            self.config.validation
        };

        let answer = ExamAnswer {
            question_index: self.current_index,
            user_answer: user_answer.to_string(),
            is_correct: validate_answer(user_answer, &question.correct_answer, mode),
        };
        self.answers.push(answer.clone());
        self.current_index += 1;
        Ok(answer)
    }

    /// Scores the exam. Unanswered questions count against the percentage.
    /// Finishing again returns the stored result unchanged.
    pub fn finish(&mut self, now_ms: i64) -> ExamResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        let mut result = calculate_score(&self.answers, self.questions.len());
        result.duration = elapsed_secs(self.started_at, now_ms);
        self.finished_at = Some(now_ms);
        self.result = Some(result.clone());
        result
    }
}

fn elapsed_secs(started_at: i64, now_ms: i64) -> u64 {
    (now_ms.saturating_sub(started_at).max(0) / 1000) as u64
}
