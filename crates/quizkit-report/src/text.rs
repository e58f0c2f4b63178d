//! Plain-text and markdown result views.

use std::fmt::Write;

use quizkit_core::model::QuestionType;
use quizkit_core::review::{
    format_duration, OptionMark, QuestionReview, ResultReview, ScoreBand, Verdict,
};

pub(crate) fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Good => "good",
        ScoreBand::Fair => "fair",
        ScoreBand::Poor => "poor",
    }
}

pub(crate) fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Correct => "correct",
        Verdict::Incorrect => "incorrect",
        Verdict::Ungraded => "not auto-graded",
    }
}

fn mark_suffix(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::SelectedCorrect => "  (correct)",
        OptionMark::SelectedWrong => "  (wrong)",
        OptionMark::MissedCorrect => "  (missed)",
        OptionMark::Neutral => "",
    }
}

fn is_selected(mark: OptionMark) -> bool {
    matches!(mark, OptionMark::SelectedCorrect | OptionMark::SelectedWrong)
}

fn summary_lines(review: &ResultReview<'_>) -> [String; 2] {
    let breakdown = review.breakdown();
    [
        format!(
            "Score: {}% ({})  |  {} of {} auto-graded questions correct",
            review.result.score,
            band_label(review.band),
            breakdown.correct,
            breakdown.scorable
        ),
        format!(
            "Time taken: {}  |  Completed: {}",
            format_duration(review.result.time_taken),
            review.result.date.format("%Y-%m-%d %H:%M UTC")
        ),
    ]
}

fn text_answer<'a>(question: &QuestionReview<'a>) -> &'a str {
    question
        .answer
        .map(|a| a.text_answer.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or("(no answer)")
}

/// Render a review for a terminal.
pub fn generate_text(review: &ResultReview<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", review.test.title);
    for line in summary_lines(review) {
        let _ = writeln!(out, "{line}");
    }
    if !review.is_consistent() {
        let _ = writeln!(
            out,
            "Warning: stored score differs from the answers (rescored {}%)",
            review.rescored()
        );
    }

    for question in &review.questions {
        let _ = writeln!(
            out,
            "\n{}. {}  [{}]",
            question.index + 1,
            question.question.text,
            verdict_label(question.verdict)
        );
        if question.question.kind == QuestionType::Text {
            let _ = writeln!(out, "   Answer: {}", text_answer(question));
            continue;
        }
        for reviewed in &question.options {
            let _ = writeln!(
                out,
                "   [{}] {}{}",
                if is_selected(reviewed.mark) { "x" } else { " " },
                reviewed.option.text,
                mark_suffix(reviewed.mark)
            );
        }
    }
    out
}

/// Render a review as a markdown document.
pub fn generate_markdown(review: &ResultReview<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", review.test.title);
    for line in summary_lines(review) {
        let _ = writeln!(out, "- {line}");
    }

    for question in &review.questions {
        let _ = writeln!(
            out,
            "\n## {}. {}\n\n_{}_\n",
            question.index + 1,
            question.question.text,
            verdict_label(question.verdict)
        );
        if question.question.kind == QuestionType::Text {
            let _ = writeln!(out, "> {}", text_answer(question));
            continue;
        }
        for reviewed in &question.options {
            let _ = writeln!(
                out,
                "- [{}] {}{}",
                if is_selected(reviewed.mark) { "x" } else { " " },
                reviewed.option.text,
                mark_suffix(reviewed.mark)
            );
        }
    }
    out
}
