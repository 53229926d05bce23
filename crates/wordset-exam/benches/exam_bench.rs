//! Benchmark suite for wordset-exam
//!
//! Run with: cargo bench -p wordset-exam

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wordset_exam::{generate_questions, generate_wrong_answers, ExamDirection, ExamMode, ExamWord};

fn sample_words(n: usize) -> Vec<ExamWord> {
    (0..n)
        .map(|i| ExamWord::new(format!("w{i}"), format!("word{i}"), format!("meaning{i}")))
        .collect()
}

fn bench_generate_questions(c: &mut Criterion) {
    let words = sample_words(500);
    c.bench_function("generate_questions mixed 50/500", |b| {
        b.iter(|| {
            generate_questions(
                black_box(&words),
                ExamMode::Mixed,
                ExamDirection::Forward,
                50,
            )
        })
    });
}

fn bench_generate_wrong_answers(c: &mut Criterion) {
    let candidates: Vec<String> = (0..500).map(|i| format!("meaning{i}")).collect();
    c.bench_function("generate_wrong_answers 3/500", |b| {
        b.iter(|| generate_wrong_answers(black_box("meaning0"), black_box(&candidates), 3))
    });
}

criterion_group!(benches, bench_generate_questions, bench_generate_wrong_answers);
criterion_main!(benches);
