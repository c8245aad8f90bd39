//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_core::definition::{load_sources, validate_quiz};
use quizforge_core::{Quiz, Quizzable};

use super::make_rng;

pub fn execute(source: PathBuf) -> Result<()> {
    let sources = load_sources(&source)?;
    if sources.is_empty() {
        anyhow::bail!("no quiz sources found in {}", source.display());
    }

    let mut rng = make_rng(None);
    let mut total_warnings = 0;

    for src in &sources {
        let quiz = Quiz::instantiate(src.definition.as_ref(), &mut rng)
            .with_context(|| format!("failed to instantiate quiz: {}", src.path.display()))?;
        println!(
            "Quiz: {} ({}, {} questions, {} points)",
            quiz.name(),
            quiz.url(),
            quiz.arity(),
            quiz.total()
        );

        let warnings = validate_quiz(&quiz);
        for w in &warnings {
            let prefix = w
                .question
                .map(|i| format!("  [q{i}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All quizzes valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
