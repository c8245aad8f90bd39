//! The `quizforge publish` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::RngCore;

use quizforge_core::definition::load_sources;
use quizforge_core::{Quiz, QuizView, Quizzable};
use quizforge_report::{
    generate_quiz_html, write_index_html, IndexEntry, PageOptions, PublishKind,
};

use super::make_rng;
use crate::config::load_config_from;

/// A file to write once every source has rendered.
struct Output {
    path: PathBuf,
    content: String,
}

pub fn execute(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    seed: Option<u64>,
    no_answer_key: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    if config.publish.html.is_empty() && config.publish.app.is_empty() {
        anyhow::bail!("no quiz sources configured; add [publish] html or app entries to quizforge.toml");
    }

    let mut rng = make_rng(seed);
    let options = PageOptions {
        answer_key: !no_answer_key,
    };
    let mut entries = Vec::new();
    let mut outputs = Vec::new();

    // Render everything first so a broken source publishes nothing.
    for path in &config.publish.html {
        for quiz in instantiate_all(&config.resolve(path), &mut rng)? {
            let mut view = QuizView::from_quiz(&quiz, &mut rng);
            if no_answer_key {
                view = view.without_answers();
            }
            let entry = index_entry(&quiz, PublishKind::Html);
            outputs.push(Output {
                path: output_dir.join(entry.page_path()),
                content: generate_quiz_html(&view, &options),
            });
            entries.push(entry);
        }
    }

    for path in &config.publish.app {
        for quiz in instantiate_all(&config.resolve(path), &mut rng)? {
            let view = QuizView::from_quiz(&quiz, &mut rng).without_answers();
            let entry = index_entry(&quiz, PublishKind::App);
            outputs.push(Output {
                path: output_dir
                    .join("app")
                    .join(format!("{}.json", entry.url.trim_matches('/'))),
                content: serde_json::to_string_pretty(&view)?,
            });
            entries.push(entry);
        }
    }

    for out in &outputs {
        write_file(&out.path, &out.content)?;
        tracing::info!("wrote {}", out.path.display());
    }

    write_index_html(&entries, &output_dir.join("index.html"))?;
    write_file(
        &output_dir.join("index.json"),
        &serde_json::to_string_pretty(&entries)?,
    )?;

    let pages = entries.iter().filter(|e| e.kind == PublishKind::Html).count();
    println!(
        "Published {} quizzes ({} pages, {} app routes) to {}",
        entries.len(),
        pages,
        entries.len() - pages,
        output_dir.display()
    );

    Ok(())
}

fn instantiate_all(path: &Path, rng: &mut dyn RngCore) -> Result<Vec<Quiz>> {
    load_sources(path)?
        .iter()
        .map(|src| {
            Quiz::instantiate(src.definition.as_ref(), &mut *rng)
                .with_context(|| format!("failed to instantiate quiz: {}", src.path.display()))
        })
        .collect()
}

fn index_entry(quiz: &Quiz, kind: PublishKind) -> IndexEntry {
    IndexEntry {
        name: quiz.name().to_string(),
        url: quiz.url().to_string(),
        kind,
        questions: quiz.arity(),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
