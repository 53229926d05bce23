//! Property-based tests for exam generation and scoring
//!
//! - Score totals: correct + incorrect == answers.len()
//! - Percentage: round(correct / question_count * 100, 1)
//! - Distractors: never the correct answer, never duplicated, min(n, distinct)
//! - Validation: case and surrounding whitespace never matter in exact mode
//! - Mixed split: ceil(30%) multiple-choice questions

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wordset_exam::{
    calculate_score, generate_questions_with_rng, generate_wrong_answers_with_rng,
    multiple_choice_count, validate_answer, ExamAnswer, ExamDirection, ExamMode, ExamWord,
    QuestionType, ValidationMode,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_answers() -> impl Strategy<Value = Vec<ExamAnswer>> {
    proptest::collection::vec(any::<bool>(), 0..60).prop_map(|flags| {
        flags
            .into_iter()
            .enumerate()
            .map(|(question_index, is_correct)| ExamAnswer {
                question_index,
                user_answer: String::new(),
                is_correct,
            })
            .collect()
    })
}

fn arb_words() -> impl Strategy<Value = Vec<ExamWord>> {
    proptest::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}"), 0..30).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (text, meaning))| ExamWord::new(format!("w{i}"), text, meaning))
            .collect()
    })
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

proptest! {
    #[test]
    fn score_counts_add_up(answers in arb_answers(), extra in 0usize..10) {
        let question_count = answers.len() + extra;
        let result = calculate_score(&answers, question_count);

        prop_assert_eq!(result.correct_count + result.incorrect_count, answers.len());

        if question_count > 0 {
            let correct = answers.iter().filter(|a| a.is_correct).count();
            let expected = (correct as f64 / question_count as f64 * 100.0 * 10.0).round() / 10.0;
            prop_assert!((result.percentage - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&result.percentage));
        }
    }

    #[test]
    fn wrong_answers_are_clean(
        seed in any::<u64>(),
        correct in "[a-d]{1,2}",
        candidates in proptest::collection::vec("[a-d ]{0,3}", 0..25),
        n in 0usize..8,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = generate_wrong_answers_with_rng(&mut rng, &correct, &candidates, n);

        let distinct: HashSet<String> = candidates
            .iter()
            .map(|c| normalize(c))
            .filter(|c| !c.is_empty() && *c != normalize(&correct))
            .collect();

        prop_assert_eq!(result.len(), n.min(distinct.len()));

        let keys: HashSet<String> = result.iter().map(|r| normalize(r)).collect();
        prop_assert_eq!(keys.len(), result.len());
        prop_assert!(!keys.contains(&normalize(&correct)));
    }

    #[test]
    fn exact_validation_ignores_case_and_padding(
        answer in "[a-zA-Z]{1,12}",
        left in " {0,3}",
        right in " {0,3}",
        upper in any::<bool>(),
    ) {
        let cased = if upper { answer.to_uppercase() } else { answer.to_lowercase() };
        let typed = format!("{left}{cased}{right}");
        prop_assert!(validate_answer(&typed, &answer, ValidationMode::Exact));
        prop_assert!(validate_answer(&typed, &answer, ValidationMode::Fuzzy));
    }

    #[test]
    fn blank_answers_never_validate(padding in " {0,5}", correct in "[a-z ]{0,8}") {
        prop_assert!(!validate_answer(&padding, &correct, ValidationMode::Exact));
        prop_assert!(!validate_answer(&padding, &correct, ValidationMode::Fuzzy));
    }

    #[test]
    fn mixed_exam_split(seed in any::<u64>(), words in arb_words(), count in 0usize..40) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let questions =
            generate_questions_with_rng(&mut rng, &words, ExamMode::Mixed, ExamDirection::Forward, count);

        let total = count.min(words.len());
        prop_assert_eq!(questions.len(), total);

        let mc = questions
            .iter()
            .filter(|q| q.question_type == QuestionType::MultipleChoice)
            .count();
        prop_assert_eq!(mc, multiple_choice_count(total));

        for question in questions.iter().filter(|q| q.choices.is_some()) {
            let choices = question.choices.as_ref().unwrap();
            prop_assert!(choices.len() <= 4);
            prop_assert!(choices.contains(&question.correct_answer));
        }
    }
}

#[test]
fn ten_question_mixed_exam_is_three_to_seven() {
    let words: Vec<ExamWord> = (0..10)
        .map(|i| ExamWord::new(i.to_string(), format!("word{i}"), format!("뜻{i}")))
        .collect();

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let questions =
            generate_questions_with_rng(&mut rng, &words, ExamMode::Mixed, ExamDirection::Reverse, 10);
        let mc = questions.iter().filter(|q| q.is_multiple_choice()).count();
        assert_eq!(mc, 3);
        assert_eq!(questions.len() - mc, 7);
    }
}
