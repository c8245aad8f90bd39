//! The `quizforge init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizforge.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quizzes")?;
    write_if_missing(Path::new("quizzes/sample.md"), SAMPLE_MARKDOWN)?;
    write_if_missing(Path::new("quizzes/vocabulary.toml"), SAMPLE_VOCABULARY)?;

    println!("\nNext steps:");
    println!("  1. Edit the quizzes under quizzes/");
    println!("  2. Run: quizforge validate --source quizzes");
    println!("  3. Run: quizforge publish");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

output_dir = "./site"

[publish]
html = ["quizzes/sample.md"]
app = ["quizzes/vocabulary.toml"]

[completion]
mode = "random"
length = 8
"#;

const SAMPLE_MARKDOWN: &str = r#"# Sample quiz

Each question starts with `Q:`. The list that follows holds the choices,
and the first choice is the correct answer. Choices are shuffled when the
quiz is shown.

Q: 1+1?

* 2
* 3
* 4

Q: Which of these is a *prime* number?

* 7
* 8
* 9
"#;

const SAMPLE_VOCABULARY: &str = r#"[quiz]
name = "Version control"
url = "/vocabulary"
threshold = 0.8

[[terms]]
name = "Git"
definition = "Distributed version control system written for the Linux kernel"

[[terms]]
name = "Mercurial"
definition = "Distributed version control system driven by the hg command"

[[terms]]
name = "Subversion"
definition = "Centralized version control system, successor to CVS"

[[terms]]
name = "Github"
definition = "Hosted git service built around pull requests"

[[terms]]
name = "Gitlab"
definition = "Self-hostable git forge with built-in CI"

[[generate]]
kind = "multiple_choice"
repeat = 5
choices = 4
side = "definition"

[completion]
mode = "pattern"
pattern = "VCS-####"
"#;
