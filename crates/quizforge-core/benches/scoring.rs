use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizforge_core::vocabulary::MultipleChoiceOptions;
use quizforge_core::{Item, Question, Quiz, Quizzable, Term, Value, Vocabulary};

fn make_quiz(n: usize) -> Quiz {
    let items = (0..n as i64)
        .map(|i| {
            Item::from(
                Question::new(format!("{i} + 1?"), vec![(i + 1).into(), i.into(), (i + 2).into()])
                    .unwrap(),
            )
        })
        .collect();
    Quiz::new("Bench", items)
}

fn make_vocabulary(n: usize) -> Vocabulary {
    Vocabulary::from_terms((0..n).map(|i| Term::new(format!("term_{i}"), format!("definition {i}"))))
        .unwrap()
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");

    for n in [10usize, 100, 1000] {
        let responses: Vec<Value> = (0..n as i64).map(|i| Value::from(i + 1)).collect();
        let mut quiz = make_quiz(n);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| quiz.check_responses(black_box(&responses)))
        });
    }

    let mut nested = Quiz::new("Outer", (0..10).map(|_| Item::from(make_quiz(10))).collect());
    let responses: Vec<Value> = (0..10)
        .flat_map(|_| (0..10i64).map(|i| Value::from(i + 1)))
        .collect();
    group.bench_function("nested_10x10", |b| {
        b.iter(|| nested.check_responses(black_box(&responses)))
    });

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("vocabulary");
    let mut rng = StdRng::seed_from_u64(42);

    let small = make_vocabulary(10);
    let large = make_vocabulary(1000);
    let options = MultipleChoiceOptions::default();

    group.bench_function("multiple_choice_10_terms", |b| {
        b.iter(|| small.multiple_choice(&mut rng, black_box(10), options))
    });

    group.bench_function("multiple_choice_1000_terms", |b| {
        b.iter(|| large.multiple_choice(&mut rng, black_box(10), options))
    });

    group.bench_function("matching_5", |b| {
        b.iter(|| large.matching(&mut rng, black_box(5), options.side))
    });

    group.finish();
}

criterion_group!(benches, bench_check, bench_generation);
criterion_main!(benches);
