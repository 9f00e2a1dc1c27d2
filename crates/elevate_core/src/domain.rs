//! crates/elevate_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any wire format or storage backend.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The signed-in user, as derived from the bearer token's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: String,
}

/// A named collection of questions that is reviewed as one session.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A single stored question with its canonical answer.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub answer: String,
}

/// How a question is presented and answered during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    ShortAnswer,
    TrueFalse,
    MultipleChoice,
}

/// A question prepared for review: the stored question plus its inferred
/// presentation type. `options` is only populated for multiple choice.
#[derive(Debug, Clone)]
pub struct ReviewQuestion {
    pub id: Uuid,
    pub text: String,
    pub answer: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
}

/// The normalized result returned by the answer-scoring service.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub is_correct: bool,
    /// 0-100. Absent when the service could not produce a score.
    pub score_achieved: Option<f64>,
    pub feedback: String,
    pub new_learning_stage: Option<u32>,
}

/// Pedagogical classification of a question's review stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UueFocus {
    Understand,
    Use,
    Explore,
}

impl UueFocus {
    /// Maps the scoring service's numeric learning stage onto a focus.
    /// An absent stage counts as the earliest one.
    pub fn from_stage(stage: Option<u32>) -> Self {
        match stage {
            None => UueFocus::Understand,
            Some(s) if s <= 1 => UueFocus::Understand,
            Some(s) if s <= 3 => UueFocus::Use,
            Some(_) => UueFocus::Explore,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UueFocus::Understand => "Understand",
            UueFocus::Use => "Use",
            UueFocus::Explore => "Explore",
        }
    }
}

/// The recorded result of one answered question within a review session.
/// Outcomes are appended in answer order and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub question_id: Uuid,
    pub user_answer: String,
    /// 0-100, rounded from the evaluation's score.
    pub score_achieved: u8,
    pub uue_focus: UueFocus,
}

/// Everything the backend needs to persist a finished review session.
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    pub question_set_id: Uuid,
    pub outcomes: Vec<QuestionOutcome>,
    pub time_spent_secs: u64,
}

/// The token granted by a successful credential login. The backend also
/// returns a user object, but the client re-derives the user from the token
/// claims so the two can never disagree.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: String,
}
