use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizkit_core::model::{Answer, AnswerOption, Difficulty, Question, QuestionType, Test};
use quizkit_core::scoring::score;

fn make_test(question_count: usize) -> Test {
    let questions = (0..question_count)
        .map(|i| {
            let kind = match i % 3 {
                0 => QuestionType::Single,
                1 => QuestionType::Multiple,
                _ => QuestionType::Text,
            };
            let options: Vec<AnswerOption> = if kind == QuestionType::Text {
                vec![]
            } else {
                (0..4)
                    .map(|o| AnswerOption {
                        id: format!("q{i}-o{o}"),
                        text: format!("option {o}"),
                    })
                    .collect()
            };
            let correct_answers = match kind {
                QuestionType::Single => vec![format!("q{i}-o1")],
                QuestionType::Multiple => vec![format!("q{i}-o0"), format!("q{i}-o2")],
                QuestionType::Text => vec![],
            };
            Question {
                id: format!("q{i}"),
                text: format!("question {i}"),
                kind,
                options,
                correct_answers,
            }
        })
        .collect();

    Test {
        id: "bench".into(),
        title: "Bench".into(),
        description: "Scoring benchmark".into(),
        time_limit: None,
        questions,
        category: "bench".into(),
        difficulty: Difficulty::Medium,
        created_at: Utc::now(),
    }
}

fn make_answers(test: &Test) -> Vec<Answer> {
    test.questions
        .iter()
        .map(|q| Answer {
            question_id: q.id.clone(),
            selected_options: q.correct_answers.iter().rev().cloned().collect(),
            text_answer: String::new(),
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for size in [10, 100, 1000] {
        let test = make_test(size);
        let answers = make_answers(&test);
        group.bench_function(format!("questions={size}"), |b| {
            b.iter(|| score(black_box(&test), black_box(&answers)))
        });
    }

    group.bench_function("no_answers", |b| {
        let test = make_test(100);
        b.iter(|| score(black_box(&test), black_box(&[])))
    });

    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
