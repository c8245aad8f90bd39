//! The `quizforge take` command.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizforge_core::definition::load_definition;
use quizforge_core::{CheckResult, Quiz, QuizView, Session, Value};

use super::make_rng;
use crate::config::load_config_from;

pub fn execute(
    source: PathBuf,
    seed: Option<u64>,
    responses: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if format != "text" && format != "json" {
        anyhow::bail!("unknown format: {format} (expected text or json)");
    }

    let config = load_config_from(config_path.as_deref())?;
    let definition = load_definition(&source)?;
    let code_format = definition
        .completion()
        .cloned()
        .unwrap_or_else(|| config.completion.clone());

    let mut rng = make_rng(seed);
    let quiz = Quiz::instantiate(definition.as_ref(), &mut rng)
        .with_context(|| format!("failed to instantiate quiz: {}", source.display()))?;
    let mut session = Session::new(quiz);

    let result = match responses {
        Some(path) => session.submit_all(&read_responses(&path)?)?,
        None => {
            let view = QuizView::from_quiz(session.quiz(), &mut rng);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            ask_all(&mut session, &view, &mut stdin.lock(), &mut stdout.lock())?
        }
    };

    let code = if result.passed {
        Some(session.completion_code(&code_format, &mut rng)?.to_string())
    } else {
        None
    };

    if format == "json" {
        let out = serde_json::json!({
            "score": result.score,
            "total": result.total,
            "passed": result.passed,
            "code": code,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(&session, &result, code.as_deref());
    }

    Ok(())
}

/// Read a JSON array of responses. String entries are read like typed input,
/// so `"4"` matches the choice `4`.
fn read_responses(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses: {}", path.display()))?;
    let raw: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse responses: {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            Value::Text(s) => Value::parse_scalar(&s),
            other => other,
        })
        .collect())
}

/// Prompt for every question in `view` and submit the answers.
///
/// A number between 1 and the choice count picks that choice; anything else
/// is taken as a literal response.
fn ask_all<R: BufRead, W: Write>(
    session: &mut Session,
    view: &QuizView,
    input: &mut R,
    out: &mut W,
) -> Result<CheckResult> {
    writeln!(out, "{}\n", view.name)?;
    for (i, q) in view.questions.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, q.prompt)?;
        for (n, choice) in q.choices.iter().enumerate() {
            writeln!(out, "   {}) {}", n + 1, choice)?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || line.trim().is_empty() {
            anyhow::bail!("no response for question {}", i + 1);
        }
        let response = match line.trim().parse::<usize>() {
            Ok(n) if (1..=q.choices.len()).contains(&n) => q.choices[n - 1].clone(),
            _ => Value::parse_scalar(&line),
        };
        session.submit(i, response)?;
        writeln!(out)?;
    }

    session
        .result()
        .context("quiz did not complete after all responses")
}

fn print_summary(session: &Session, result: &CheckResult, code: Option<&str>) {
    let quiz = session.quiz();
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Response", "Answer", "Result"]);

    for (i, (q, response)) in quiz.leaves().iter().zip(quiz.responses()).enumerate() {
        let verdict = match q.outcome() {
            Some(true) => "correct",
            Some(false) => "wrong",
            None => "-",
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(q.prompt()),
            Cell::new(response.as_ref().map(Value::to_string).unwrap_or_default()),
            Cell::new(q.answer()),
            Cell::new(verdict),
        ]);
    }

    println!("{table}");
    println!(
        "\n{}: {} / {} ({:.1}%) {}",
        quiz.name(),
        result.score,
        result.total,
        result.ratio() * 100.0,
        if result.passed { "PASSED" } else { "NOT PASSED" }
    );
    if let Some(code) = code {
        println!("Completion code: {code}");
    }
}
