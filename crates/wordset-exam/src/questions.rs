//! Question Generation
//!
//! Builds exam questions from a word list: picks a random subset, assigns
//! question types, and attaches shuffled distractors to multiple-choice items.

use std::collections::HashSet;

use rand::Rng;

use crate::types::{
    ExamDirection, ExamMode, ExamQuestion, ExamWord, QuestionType, MIXED_MULTIPLE_CHOICE_TENTHS,
    WRONG_ANSWER_COUNT,
};

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Multiple-choice share of a mixed exam with `total` questions, rounded up.
pub fn multiple_choice_count(total: usize) -> usize {
    (total * MIXED_MULTIPLE_CHOICE_TENTHS).div_ceil(10)
}

pub fn generate_questions(
    words: &[ExamWord],
    mode: ExamMode,
    direction: ExamDirection,
    count: usize,
) -> Vec<ExamQuestion> {
    generate_questions_with_rng(&mut rand::rng(), words, mode, direction, count)
}

pub fn generate_questions_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    words: &[ExamWord],
    mode: ExamMode,
    direction: ExamDirection,
    count: usize,
) -> Vec<ExamQuestion> {
    let mut selected: Vec<&ExamWord> = words.iter().collect();
    shuffle(&mut selected, rng);
    selected.truncate(count.min(words.len()));

    let types = assign_types(rng, mode, selected.len());

    selected
        .into_iter()
        .zip(types)
        .map(|(word, question_type)| {
            let (prompt, answer) = direction.split(word);
            let choices = match question_type {
                QuestionType::MultipleChoice => {
                    let candidates: Vec<&str> = words
                        .iter()
                        .filter(|other| other.id != word.id)
                        .map(|other| direction.answer_of(other))
                        .collect();
                    let mut choices =
                        generate_wrong_answers_with_rng(rng, answer, &candidates, WRONG_ANSWER_COUNT);
                    choices.push(answer.to_string());
                    shuffle(&mut choices, rng);
                    Some(choices)
                }
                QuestionType::ShortAnswer => None,
            };

            ExamQuestion {
                word_id: word.id.clone(),
                question_type,
                prompt: prompt.to_string(),
                correct_answer: answer.to_string(),
                choices,
            }
        })
        .collect()
}

fn assign_types<R: Rng + ?Sized>(rng: &mut R, mode: ExamMode, total: usize) -> Vec<QuestionType> {
    match mode {
        ExamMode::MultipleChoice => vec![QuestionType::MultipleChoice; total],
        ExamMode::ShortAnswer => vec![QuestionType::ShortAnswer; total],
        ExamMode::Mixed => {
            let mc = multiple_choice_count(total);
            let mut types = vec![QuestionType::MultipleChoice; mc];
            types.resize(total, QuestionType::ShortAnswer);
            shuffle(&mut types, rng);
            types
        }
    }
}

/// Picks up to `count` distinct wrong answers from `candidates`.
///
/// Blank candidates and anything equal to `correct` (ignoring case and
/// surrounding whitespace) are skipped. Returns fewer than `count` items when
/// there are not enough distinct candidates.
pub fn generate_wrong_answers<S: AsRef<str>>(
    correct: &str,
    candidates: &[S],
    count: usize,
) -> Vec<String> {
    generate_wrong_answers_with_rng(&mut rand::rng(), correct, candidates, count)
}

pub fn generate_wrong_answers_with_rng<R: Rng + ?Sized, S: AsRef<str>>(
    rng: &mut R,
    correct: &str,
    candidates: &[S],
    count: usize,
) -> Vec<String> {
    let target = normalize(correct);
    let mut seen = HashSet::new();
    let mut distinct: Vec<String> = Vec::new();

    for candidate in candidates {
        let candidate = candidate.as_ref().trim();
        let key = normalize(candidate);
        if key.is_empty() || key == target {
            continue;
        }
        if seen.insert(key) {
            distinct.push(candidate.to_string());
        }
    }

    shuffle(&mut distinct, rng);
    distinct.truncate(count);
    distinct
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
