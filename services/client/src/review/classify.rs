//! services/client/src/review/classify.rs
//!
//! Infers how a stored question should be presented during review. The rules
//! run in a fixed order; classification happens once at session load and the
//! result is immutable afterwards.

use elevate_core::domain::{Question, QuestionType, ReviewQuestion};
use regex::Regex;

/// Prepares a stored question for review by inferring its presentation type.
pub fn classify_question(question: Question) -> ReviewQuestion {
    let (question_type, options) = infer_type(&question.text, &question.answer);
    ReviewQuestion {
        id: question.id,
        text: question.text,
        answer: question.answer,
        question_type,
        options,
    }
}

fn infer_type(text: &str, answer: &str) -> (QuestionType, Vec<String>) {
    if is_true_false(text, answer) {
        return (QuestionType::TrueFalse, Vec::new());
    }

    let options = extract_options(text);
    if options.len() >= 2 {
        return (QuestionType::MultipleChoice, options);
    }

    (QuestionType::ShortAnswer, Vec::new())
}

/// The question must both phrase itself as true-or-false and store a boolean
/// answer; either signal alone is not enough.
fn is_true_false(text: &str, answer: &str) -> bool {
    let lowered = text.to_lowercase();
    if !lowered.contains("true or false") && !lowered.contains("true/false") {
        return false;
    }
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("true") || answer.eq_ignore_ascii_case("false")
}

/// Lines like "a) ...", "B. ...", "1. ..." or "(c) ..." are treated as
/// enumerated options; the enumerator prefix is stripped and the remainder
/// trimmed. At least two such lines make a multiple-choice question.
fn extract_options(text: &str) -> Vec<String> {
    let option_line = Regex::new(r"^\s*(?:\((?:[A-Za-z]|\d+)\)|(?:[A-Za-z]|\d+)[\)\.])\s*(.+)$").unwrap();
    text.lines()
        .filter_map(|line| {
            option_line
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .filter(|option| !option.is_empty())
        .collect()
}
