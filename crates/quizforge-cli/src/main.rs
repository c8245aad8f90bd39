//! quizforge CLI: author, validate, publish and take quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use quizforge_core::QuizError;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Markdown and vocabulary quizzes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check quiz sources without publishing
    Validate {
        /// Path to a .md/.toml quiz or a directory of them
        #[arg(long)]
        source: PathBuf,
    },

    /// Render html quizzes and index app quizzes
    Publish {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (overrides the config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed for choice shuffling and vocabulary sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Leave the answer key out of static pages
        #[arg(long)]
        no_answer_key: bool,
    },

    /// Take a quiz in the terminal
    Take {
        /// Path to a .md/.toml quiz
        #[arg(long)]
        source: PathBuf,

        /// Seed for choice shuffling, sampling and the completion code
        #[arg(long)]
        seed: Option<u64>,

        /// JSON array of responses, one per question, instead of prompting
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example quizzes
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { source } => commands::validate::execute(source),
        Commands::Publish {
            config,
            output,
            seed,
            no_answer_key,
        } => commands::publish::execute(config, output, seed, no_answer_key),
        Commands::Take {
            source,
            seed,
            responses,
            format,
            config,
        } => commands::take::execute(source, seed, responses, format, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(exit_code(&e));
    }
}

/// 2 when the quiz source itself is broken, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    let authoring = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<QuizError>())
        .is_some_and(QuizError::is_authoring_error);
    if authoring {
        2
    } else {
        1
    }
}
