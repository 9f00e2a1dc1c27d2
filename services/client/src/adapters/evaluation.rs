//! services/client/src/adapters/evaluation.rs
//!
//! This module contains the adapter for the answer-scoring service.
//! It implements the `EvaluationService` port from the `core` crate.

use async_trait::async_trait;
use elevate_core::domain::{Evaluation, ReviewQuestion};
use elevate_core::ports::{BearerTokenSource, EvaluationService, PortResult};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::backend::{bad_body, check_status, transport};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `EvaluationService` port by calling the
/// backend's AI scoring endpoint. The engine treats every failure shape the
/// same way, so this adapter only has to map errors onto `PortError`.
#[derive(Clone)]
pub struct HttpEvaluationAdapter {
    client: Client,
    base_url: String,
    token_source: Arc<dyn BearerTokenSource>,
}

impl HttpEvaluationAdapter {
    /// Creates a new `HttpEvaluationAdapter`.
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

//=========================================================================================
// Wire Record Structs
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationRequest<'a> {
    question_id: Uuid,
    question_text: &'a str,
    question_set_name: &'a str,
    expected_answer: &'a str,
    user_answer: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationRecord {
    is_correct: bool,
    score_achieved: Option<f64>,
    feedback: Option<String>,
    new_learning_stage: Option<u32>,
}
impl EvaluationRecord {
    fn to_domain(self) -> Evaluation {
        Evaluation {
            is_correct: self.is_correct,
            score_achieved: self.score_achieved,
            feedback: self.feedback.unwrap_or_default(),
            new_learning_stage: self.new_learning_stage,
        }
    }
}

//=========================================================================================
// `EvaluationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl EvaluationService for HttpEvaluationAdapter {
    async fn evaluate(
        &self,
        question: &ReviewQuestion,
        set_name: &str,
        user_answer: &str,
    ) -> PortResult<Evaluation> {
        let url = format!("{}/api/ai/evaluate", self.base_url);
        let request = EvaluationRequest {
            question_id: question.id,
            question_text: &question.text,
            question_set_name: set_name,
            expected_answer: &question.answer,
            user_answer,
        };
        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let record: EvaluationRecord =
            check_status(response).await?.json().await.map_err(bad_body)?;
        Ok(record.to_domain())
    }
}
