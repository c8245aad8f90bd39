use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::definition::parse_quiz_spec_str;
use quizforge_core::markdown::parse_document;

fn bench_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown");

    let single = "Q: 1+1?\n\n* 2\n* 3\n* 4\n";
    let with_prose = r#"# Version control

Some words about the quiz.

Q: Which tool is distributed?
- Git
- CVS
- Subversion

A little commentary between questions.

Q: Which command records changes?

1. commit
2. push
3. fetch
"#;
    let large = generate_markdown(200);

    group.bench_function("single", |b| b.iter(|| parse_document(black_box(single))));

    group.bench_function("with_prose", |b| {
        b.iter(|| parse_document(black_box(with_prose)))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| parse_document(black_box(&large)))
    });

    group.finish();
}

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_quiz_toml(5);
    let large_toml = generate_quiz_toml(200);

    group.bench_function("5_terms", |b| {
        b.iter(|| parse_quiz_spec_str(black_box(&small_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_terms", |b| {
        b.iter(|| parse_quiz_spec_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn generate_markdown(n: usize) -> String {
    let mut s = String::from("# Bench\n\n");
    for i in 0..n {
        s.push_str(&format!(
            "Q: What is {i} + 1?\n\n* {}\n* {}\n* {}\n\nSome commentary.\n\n",
            i + 1,
            i + 2,
            i
        ));
    }
    s
}

fn generate_quiz_toml(n: usize) -> String {
    let mut s = String::from("[quiz]\nname = \"Bench\"\n");
    for i in 0..n {
        s.push_str(&format!(
            "\n[[terms]]\nname = \"term_{i}\"\ndefinition = \"Definition number {i}\"\n"
        ));
    }
    s.push_str("\n[[generate]]\nkind = \"multiple_choice\"\ncount = 10\nchoices = 5\n");
    s
}

criterion_group!(benches, bench_markdown, bench_toml_parsing);
criterion_main!(benches);
