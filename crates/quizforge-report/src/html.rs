//! HTML page generator.
//!
//! Produces self-contained HTML files with all CSS/JS inlined.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use quizforge_core::{CheckResult, QuizView};

use crate::inline::{html_escape, render_inline};

/// Options for a published quiz page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Include a collapsed answer key and let the page score itself.
    /// Without it the page is a plain question sheet with nothing to submit.
    pub answer_key: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self { answer_key: true }
    }
}

/// How a quiz is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishKind {
    /// A static page.
    Html,
    /// A route served by an interactive app.
    App,
}

/// One line of the published index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub url: String,
    pub kind: PublishKind,
    pub questions: usize,
}

impl IndexEntry {
    /// File name of the static page, relative to the output directory.
    pub fn page_path(&self) -> String {
        format!("{}.html", self.url.trim_matches('/'))
    }

    fn href(&self) -> String {
        match self.kind {
            PublishKind::Html => self.page_path(),
            PublishKind::App => self.url.clone(),
        }
    }
}

fn page_header(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate a quiz page from a view.
///
/// Choices appear in the order the view holds them. Radio values are the
/// plain choice text, so a submitted form maps back to responses with
/// [`quizforge_core::view::responses_from_fields`].
pub fn generate_quiz_html(view: &QuizView, options: &PageOptions) -> String {
    let mut html = String::new();
    page_header(&mut html, &view.name);

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&view.name)));
    html.push_str(&format!(
        "<p class=\"meta\">{} questions | {} points | pass at {:.0}%</p>\n",
        view.questions.len(),
        view.total(),
        view.threshold * 100.0
    ));
    html.push_str("</header>\n");

    html.push_str("<form id=\"quiz\">\n");
    for (i, q) in view.questions.iter().enumerate() {
        html.push_str(&format!(
            "<fieldset class=\"question\" id=\"{}\">\n<legend><span class=\"number\">{}.</span> {}</legend>\n",
            html_escape(&q.id),
            i + 1,
            render_inline(&q.prompt)
        ));
        for choice in &q.choices {
            let value = choice.to_string();
            html.push_str(&format!(
                "<label><input type=\"radio\" name=\"{}\" value=\"{}\"> {}</label>\n",
                html_escape(&q.id),
                html_escape(&value),
                render_inline(&value)
            ));
        }
        html.push_str("</fieldset>\n");
    }
    if options.answer_key {
        html.push_str("<button type=\"button\" onclick=\"checkQuiz()\">Check answers</button>\n");
        html.push_str("<p id=\"score\" class=\"meta\"></p>\n");
    } else {
        html.push_str("<p class=\"meta\">Answers are not included in this page.</p>\n");
    }
    html.push_str("</form>\n");

    if options.answer_key {
        html.push_str("<section class=\"answer-key\">\n");
        html.push_str("<details>\n<summary>Answer key</summary>\n<ol>\n");
        for q in &view.questions {
            let answer = q.answer.as_ref().map(|a| a.to_string()).unwrap_or_default();
            html.push_str(&format!("<li>{}</li>\n", render_inline(&answer)));
        }
        html.push_str("</ol>\n</details>\n</section>\n");

        let key: Vec<(&str, String, f64)> = view
            .questions
            .iter()
            .map(|q| {
                let answer = q.answer.as_ref().map(|a| a.to_string()).unwrap_or_default();
                (q.id.as_str(), answer, q.points)
            })
            .collect();
        html.push_str("<script>\n");
        html.push_str(&format!(
            "const ANSWERS = {};\nconst THRESHOLD = {};\n",
            script_json(&key),
            view.threshold
        ));
        html.push_str(JS);
        html.push_str("</script>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write a quiz page to a file.
pub fn write_quiz_html(view: &QuizView, options: &PageOptions, path: &Path) -> Result<()> {
    write_page(&generate_quiz_html(view, options), path)
}

/// Generate the page shown after a quiz has been checked.
pub fn generate_result_html(name: &str, result: &CheckResult, code: Option<&str>) -> String {
    let mut html = String::new();
    page_header(&mut html, name);

    let (class, verdict) = if result.passed {
        ("pass", "Passed")
    } else {
        ("fail", "Not passed")
    };
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(name)));
    html.push_str(&format!(
        "<section class=\"result {class}\">\n<h2>{verdict}</h2>\n<p>Score: {} / {} ({:.1}%)</p>\n",
        result.score,
        result.total,
        result.ratio() * 100.0
    ));
    if let Some(code) = code {
        html.push_str(&format!(
            "<p>Completion code: <code class=\"completion\">{}</code></p>\n",
            html_escape(code)
        ));
    }
    html.push_str("</section>\n");
    html.push_str("</body>\n</html>");
    html
}

/// Generate the index page listing every published quiz.
pub fn generate_index_html(entries: &[IndexEntry]) -> String {
    let mut html = String::new();
    page_header(&mut html, "Quizzes");

    html.push_str("<header>\n<h1>Quizzes</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} quizzes | generated {}</p>\n",
        entries.len(),
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Quiz</th><th>Kind</th><th>Questions</th><th>URL</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for entry in entries {
        let kind = match entry.kind {
            PublishKind::Html => "page",
            PublishKind::App => "app",
        };
        html.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td><code>{}</code></td></tr>\n",
            html_escape(&entry.href()),
            html_escape(&entry.name),
            kind,
            entry.questions,
            html_escape(&entry.url)
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</body>\n</html>");
    html
}

/// Write the index page to a file.
pub fn write_index_html(entries: &[IndexEntry], path: &Path) -> Result<()> {
    write_page(&generate_index_html(entries), path)
}

fn write_page(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// JSON that is safe to embed in a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
fieldset { border: 1px solid var(--border); border-radius: 8px; margin: 1rem 0; padding: 1rem; }
legend { font-weight: bold; padding: 0 0.5rem; }
label { display: block; padding: 0.25rem 0; cursor: pointer; }
button { padding: 0.5rem 1.5rem; border-radius: 6px; border: 1px solid var(--border); cursor: pointer; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.result { border-radius: 8px; padding: 1rem 2rem; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.9rem; }
code.completion { font-size: 1.4rem; letter-spacing: 0.1em; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function checkQuiz() {
  let score = 0, total = 0;
  for (const [id, answer, points] of ANSWERS) {
    total += points;
    const field = document.getElementById(id);
    const picked = document.querySelector('input[name="' + id + '"]:checked');
    const correct = picked !== null && picked.value === answer;
    if (correct) score += points;
    field.classList.toggle('pass', correct);
    field.classList.toggle('fail', !correct);
  }
  const passed = total > 0 && score / total >= THRESHOLD;
  document.getElementById('score').textContent =
    'Score: ' + score + ' / ' + total + (passed ? ' (passed)' : ' (not passed)');
}
"#;
