//! services/client/src/adapters/backend.rs
//!
//! This module contains the HTTP adapter for the Elevate backend API.
//! It implements the `StudyApi` port from the `core` crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use elevate_core::domain::{AuthGrant, Question, QuestionSet, ReviewSubmission};
use elevate_core::ports::{BearerTokenSource, PortError, PortResult, StudyApi};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `StudyApi` port against the backend's REST
/// endpoints, attaching the bearer token to every request when one exists.
#[derive(Clone)]
pub struct HttpStudyAdapter {
    client: Client,
    base_url: String,
    token_source: Arc<dyn BearerTokenSource>,
}

impl HttpStudyAdapter {
    /// Creates a new `HttpStudyAdapter`.
    pub fn new(client: Client, base_url: String, token_source: Arc<dyn BearerTokenSource>) -> Self {
        Self {
            client,
            base_url,
            token_source,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token_source.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Maps an HTTP response onto the port error taxonomy. 401 surfaces as
/// `Unauthorized` so the application layer can force a logout.
pub(crate) async fn check_status(response: Response) -> PortResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!("Request failed with {}: {}", status, body);
    match status {
        StatusCode::UNAUTHORIZED => Err(PortError::Unauthorized),
        StatusCode::NOT_FOUND => Err(PortError::NotFound(body)),
        _ => Err(PortError::Transport(format!(
            "server returned {}: {}",
            status, body
        ))),
    }
}

pub(crate) fn transport(e: reqwest::Error) -> PortError {
    PortError::Transport(e.to_string())
}

pub(crate) fn bad_body(e: reqwest::Error) -> PortError {
    PortError::Unexpected(format!("failed to decode response body: {}", e))
}

//=========================================================================================
// Wire Record Structs
//=========================================================================================

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginRecord {
    token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionSetRecord {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}
impl QuestionSetRecord {
    fn to_domain(self) -> QuestionSet {
        QuestionSet {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

#[derive(Deserialize)]
struct QuestionRecord {
    id: Uuid,
    text: String,
    answer: String,
}
impl QuestionRecord {
    fn to_domain(self) -> Question {
        Question {
            id: self.id,
            text: self.text,
            answer: self.answer,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomePayload<'a> {
    question_id: Uuid,
    user_answer: &'a str,
    score_achieved: u8,
    uue_focus: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionPayload<'a> {
    question_set_id: Uuid,
    outcomes: Vec<OutcomePayload<'a>>,
    time_spent: u64,
}

//=========================================================================================
// `StudyApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl StudyApi for HttpStudyAdapter {
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthGrant> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(transport)?;
        let record: LoginRecord = check_status(response).await?.json().await.map_err(bad_body)?;
        Ok(AuthGrant {
            token: record.token,
        })
    }

    async fn list_question_sets(&self) -> PortResult<Vec<QuestionSet>> {
        let url = format!("{}/api/questionsets", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(transport)?;
        let records: Vec<QuestionSetRecord> =
            check_status(response).await?.json().await.map_err(bad_body)?;
        Ok(records.into_iter().map(QuestionSetRecord::to_domain).collect())
    }

    async fn get_question_set(&self, set_id: Uuid) -> PortResult<QuestionSet> {
        let url = format!("{}/api/questionsets/{}", self.base_url, set_id);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(transport)?;
        let record: QuestionSetRecord =
            check_status(response).await?.json().await.map_err(bad_body)?;
        Ok(record.to_domain())
    }

    async fn get_questions(&self, set_id: Uuid) -> PortResult<Vec<Question>> {
        let url = format!("{}/api/questionsets/{}/questions", self.base_url, set_id);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(transport)?;
        let records: Vec<QuestionRecord> =
            check_status(response).await?.json().await.map_err(bad_body)?;
        Ok(records.into_iter().map(QuestionRecord::to_domain).collect())
    }

    async fn submit_review(&self, submission: &ReviewSubmission) -> PortResult<()> {
        let url = format!("{}/api/reviews", self.base_url);
        let payload = SubmissionPayload {
            question_set_id: submission.question_set_id,
            outcomes: submission
                .outcomes
                .iter()
                .map(|o| OutcomePayload {
                    question_id: o.question_id,
                    user_answer: &o.user_answer,
                    score_achieved: o.score_achieved,
                    uue_focus: o.uue_focus.as_str(),
                })
                .collect(),
            time_spent: submission.time_spent_secs,
        };
        let response = self
            .authorize(self.client.post(&url))
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }
}
