//! Shared test doubles for the review-engine integration tests.
//!
//! The engine only sees the core ports, so the fakes below stand in for the
//! backend API and the scoring service without any HTTP involved.

use async_trait::async_trait;
use chrono::Utc;
use elevate_core::domain::{
    AuthGrant, Evaluation, Question, QuestionSet, ReviewQuestion, ReviewSubmission,
};
use elevate_core::ports::{EvaluationService, PortError, PortResult, StudyApi};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

// ============================================================================
// Backend Fake
// ============================================================================

pub struct FakeStudyApi {
    set_id: Uuid,
    set_name: String,
    questions: Mutex<Vec<Question>>,
    pub fail_fetch: bool,
    pub fail_submit: bool,
    pub submissions: Mutex<Vec<ReviewSubmission>>,
}

impl FakeStudyApi {
    pub fn with_questions(set_id: Uuid, questions: Vec<Question>) -> Self {
        Self {
            set_id,
            set_name: "Biology basics".to_string(),
            questions: Mutex::new(questions),
            fail_fetch: false,
            fail_submit: false,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn set_questions(&self, questions: Vec<Question>) {
        *self.questions.lock().unwrap() = questions;
    }

    pub fn submitted(&self) -> Vec<ReviewSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudyApi for FakeStudyApi {
    async fn login(&self, _email: &str, _password: &str) -> PortResult<AuthGrant> {
        Err(PortError::Unexpected("login is not used in these tests".to_string()))
    }

    async fn list_question_sets(&self) -> PortResult<Vec<QuestionSet>> {
        Ok(vec![QuestionSet {
            id: self.set_id,
            name: self.set_name.clone(),
            created_at: Utc::now(),
        }])
    }

    async fn get_question_set(&self, set_id: Uuid) -> PortResult<QuestionSet> {
        if self.fail_fetch {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        if set_id != self.set_id {
            return Err(PortError::NotFound(format!("no question set {}", set_id)));
        }
        Ok(QuestionSet {
            id: self.set_id,
            name: self.set_name.clone(),
            created_at: Utc::now(),
        })
    }

    async fn get_questions(&self, set_id: Uuid) -> PortResult<Vec<Question>> {
        if self.fail_fetch {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        if set_id != self.set_id {
            return Err(PortError::NotFound(format!("no question set {}", set_id)));
        }
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn submit_review(&self, submission: &ReviewSubmission) -> PortResult<()> {
        if self.fail_submit {
            return Err(PortError::Transport("connection reset during submit".to_string()));
        }
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

// ============================================================================
// Scoring Service Fake
// ============================================================================

pub enum ScriptedEvaluation {
    Succeed(Evaluation),
    Fail,
}

/// Hands out evaluations in the scripted order; counts every call.
pub struct FakeEvaluator {
    script: Mutex<VecDeque<ScriptedEvaluation>>,
    pub calls: AtomicUsize,
}

impl FakeEvaluator {
    pub fn scripted(script: Vec<ScriptedEvaluation>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvaluationService for FakeEvaluator {
    async fn evaluate(
        &self,
        _question: &ReviewQuestion,
        _set_name: &str,
        _user_answer: &str,
    ) -> PortResult<Evaluation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedEvaluation::Succeed(evaluation)) => Ok(evaluation),
            Some(ScriptedEvaluation::Fail) => {
                Err(PortError::Transport("scoring service unavailable".to_string()))
            }
            None => Ok(evaluation(100.0, 1)),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn question(text: &str, answer: &str) -> Question {
    Question {
        id: Uuid::new_v4(),
        text: text.to_string(),
        answer: answer.to_string(),
    }
}

pub fn evaluation(score: f64, stage: u32) -> Evaluation {
    Evaluation {
        is_correct: score >= 50.0,
        score_achieved: Some(score),
        feedback: "Looks good.".to_string(),
        new_learning_stage: Some(stage),
    }
}
