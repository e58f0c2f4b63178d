//! HTML result view.
//!
//! Produces a self-contained HTML page with all CSS inlined.

use quizkit_core::model::QuestionType;
use quizkit_core::review::{format_duration, OptionMark, ResultReview, ScoreBand, Verdict};

use crate::text::{band_label, verdict_label};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn band_class(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Good => "good",
        ScoreBand::Fair => "fair",
        ScoreBand::Poor => "poor",
    }
}

fn verdict_class(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Correct => "correct",
        Verdict::Incorrect => "incorrect",
        Verdict::Ungraded => "ungraded",
    }
}

fn mark_class(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::SelectedCorrect => "selected-correct",
        OptionMark::SelectedWrong => "selected-wrong",
        OptionMark::MissedCorrect => "missed-correct",
        OptionMark::Neutral => "neutral",
    }
}

/// Generate an HTML page reviewing one result.
pub fn generate_html(review: &ResultReview<'_>) -> String {
    let mut html = String::new();
    let breakdown = review.breakdown();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizkit result: {}</title>\n",
        html_escape(&review.test.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&review.test.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} | completed {}</p>\n",
        html_escape(&review.test.category),
        review.test.difficulty,
        review.result.date.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</header>\n");

    // Score summary
    html.push_str("<section class=\"summary\">\n");
    html.push_str(&format!(
        "<div class=\"score {}\">{}%</div>\n",
        band_class(review.band),
        review.result.score
    ));
    html.push_str(&format!(
        "<p>{} of {} auto-graded questions correct ({}) | time taken {}</p>\n",
        breakdown.correct,
        breakdown.scorable,
        band_label(review.band),
        format_duration(review.result.time_taken)
    ));
    if !review.is_consistent() {
        html.push_str(&format!(
            "<p class=\"warning\">Stored score differs from the answers (rescored {}%).</p>\n",
            review.rescored()
        ));
    }
    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"questions\">\n");
    for question in &review.questions {
        html.push_str(&format!(
            "<article class=\"question {}\">\n",
            verdict_class(question.verdict)
        ));
        html.push_str(&format!(
            "<h2>{}. {}</h2>\n<p class=\"verdict\">{}</p>\n",
            question.index + 1,
            html_escape(&question.question.text),
            verdict_label(question.verdict)
        ));

        if question.question.kind == QuestionType::Text {
            let answer = question
                .answer
                .map(|a| a.text_answer.trim())
                .filter(|t| !t.is_empty());
            match answer {
                Some(text) => html.push_str(&format!(
                    "<blockquote>{}</blockquote>\n",
                    html_escape(text)
                )),
                None => html.push_str("<p class=\"empty\">No answer given.</p>\n"),
            }
        } else {
            html.push_str("<ul class=\"options\">\n");
            for reviewed in &question.options {
                html.push_str(&format!(
                    "<li class=\"{}\">{}</li>\n",
                    mark_class(reviewed.mark),
                    html_escape(&reviewed.option.text)
                ));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(review.result).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --fair: #fef9c3; --poor: #fde2e2; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --poor: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 1rem; }
h2 { font-size: 1.1rem; margin: 0 0 0.5rem; }
.meta, .verdict, .empty { color: var(--muted); }
.score { display: inline-block; font-size: 2.5rem; font-weight: bold; padding: 0.5rem 1.5rem; border-radius: 8px; }
.score.good { background: var(--good); }
.score.fair { background: var(--fair); }
.score.poor { background: var(--poor); }
.warning { font-weight: bold; }
.question { border: 1px solid var(--border); border-left-width: 6px; border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.question.correct { border-left-color: #22c55e; }
.question.incorrect { border-left-color: #ef4444; }
.question.ungraded { border-left-color: var(--muted); }
.options { list-style: none; padding: 0; }
.options li { padding: 0.4rem 0.75rem; margin: 0.25rem 0; border-radius: 6px; border: 1px solid var(--border); }
.options .selected-correct { background: var(--good); }
.options .selected-wrong { background: var(--poor); }
.options .missed-correct { border: 2px dashed #22c55e; }
.options .selected-correct::after { content: " \2713"; }
.options .selected-wrong::after { content: " \2717"; }
blockquote { margin: 0; padding: 0.5rem 1rem; border-left: 4px solid var(--border); white-space: pre-wrap; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn html_review_contains_required_elements() {
        let test = fixtures::test();
        let result = fixtures::result(&test);
        let review = ResultReview::build(&test, &result);
        let html = generate_html(&review);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<div class=\"score poor\">50%</div>"));
        assert!(html.contains("<article class=\"question correct\">"));
        assert!(html.contains("<li class=\"selected-wrong\">*element</li>"));
        assert!(html.contains("<li class=\"missed-correct\">#id</li>"));
        assert!(html.contains("2m 15s"));
    }

    #[test]
    fn user_content_is_escaped() {
        let test = fixtures::test();
        let result = fixtures::result(&test);
        let review = ResultReview::build(&test, &result);
        let html = generate_html(&review);

        assert!(html.contains("Markup &lt;Basics&gt;"));
        assert!(html.contains("<blockquote>At the end of &lt;body&gt;</blockquote>"));
        assert!(!html.contains("<script>"));
    }
}
