//! crates/elevate_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the
//! backend API or the token store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthGrant, Evaluation, Question, QuestionSet, ReviewQuestion, ReviewSubmission};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP
/// client, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The single durable key the client owns: the persisted bearer token.
/// Reads and writes are synchronous; only one logical session exists per
/// client at a time, so no locking is layered on top.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> PortResult<Option<String>>;
    fn store(&self, token: &str) -> PortResult<()>;
    fn clear(&self) -> PortResult<()>;
}

/// Supplies the current bearer token for outgoing requests, if any.
pub trait BearerTokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// The backend API the client studies against.
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthGrant>;

    async fn list_question_sets(&self) -> PortResult<Vec<QuestionSet>>;

    async fn get_question_set(&self, set_id: Uuid) -> PortResult<QuestionSet>;

    async fn get_questions(&self, set_id: Uuid) -> PortResult<Vec<Question>>;

    /// Persists the aggregated outcomes of a finished review session.
    async fn submit_review(&self, submission: &ReviewSubmission) -> PortResult<()>;
}

/// The external answer-scoring service.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    /// Scores a user's answer against a question, in the context of the
    /// question set it belongs to.
    async fn evaluate(
        &self,
        question: &ReviewQuestion,
        set_name: &str,
        user_answer: &str,
    ) -> PortResult<Evaluation>;
}
