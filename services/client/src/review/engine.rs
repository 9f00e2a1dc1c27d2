//! services/client/src/review/engine.rs
//!
//! Drives a single review session as an explicit state machine, independent
//! of any rendering layer: question sequencing, answer capture, evaluation
//! dispatch, outcome accumulation, and final submission.

use std::sync::Arc;
use std::time::Instant;

use elevate_core::domain::{
    Evaluation, QuestionOutcome, ReviewQuestion, ReviewSubmission, UueFocus,
};
use elevate_core::ports::{EvaluationService, PortError, StudyApi};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::review::classify::classify_question;

/// Feedback attached to the synthetic outcome when the scoring service fails.
const EVALUATION_FAILURE_FEEDBACK: &str =
    "Error evaluating answer. Your response was recorded with a score of 0.";

//=========================================================================================
// Engine States
//=========================================================================================

/// The externally observable phase of a review session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// The question set has not been fetched yet.
    Loading,
    /// Questions are being presented and answered.
    Answering,
    /// The session is over and the summary can be shown.
    Completed,
    /// The initial fetch failed; `load` may be called again to retry.
    Failed { message: String },
}

/// What `next` did with the question cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Advanced to another question.
    NextQuestion,
    /// No questions remain; the caller should finish with `complete`.
    EndOfSession,
    /// The current question is not marked yet, so nothing changed.
    NotReady,
}

/// The figures shown on the completion screen.
#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub set_name: String,
    pub total_questions: usize,
    pub answered: usize,
    /// 0-100, rounded mean over the recorded outcomes.
    pub average_score: u8,
    pub time_spent_secs: u64,
    /// Present when the outcomes could not be persisted; the summary is
    /// still shown.
    pub submission_error: Option<String>,
}

//=========================================================================================
// ReviewEngine
//=========================================================================================

/// The state machine for one review session. Created per session and
/// discarded on navigation away; nothing is persisted until `complete`.
pub struct ReviewEngine {
    api: Arc<dyn StudyApi>,
    evaluator: Arc<dyn EvaluationService>,
    question_set_id: Uuid,
    set_name: String,
    questions: Vec<ReviewQuestion>,
    current_index: usize,
    outcomes: Vec<QuestionOutcome>,
    started_at: Option<Instant>,
    time_spent_secs: u64,
    phase: SessionPhase,
    answer_draft: Option<String>,
    evaluation: Option<Evaluation>,
    marked: bool,
    marking_in_flight: bool,
    submission_error: Option<String>,
}

impl ReviewEngine {
    pub fn new(
        api: Arc<dyn StudyApi>,
        evaluator: Arc<dyn EvaluationService>,
        question_set_id: Uuid,
    ) -> Self {
        Self {
            api,
            evaluator,
            question_set_id,
            set_name: String::new(),
            questions: Vec::new(),
            current_index: 0,
            outcomes: Vec::new(),
            started_at: None,
            time_spent_secs: 0,
            phase: SessionPhase::Loading,
            answer_draft: None,
            evaluation: None,
            marked: false,
            marking_in_flight: false,
            submission_error: None,
        }
    }

    /// Fetches the question set and its questions, classifies every question,
    /// and starts the session clock. A failure leaves the engine in `Failed`
    /// with a user-facing message; calling `load` again retries from scratch.
    pub async fn load(&mut self) -> Result<(), PortError> {
        self.phase = SessionPhase::Loading;

        let set = match self.api.get_question_set(self.question_set_id).await {
            Ok(set) => set,
            Err(e) => return Err(self.fail_load(e)),
        };
        let questions = match self.api.get_questions(self.question_set_id).await {
            Ok(questions) => questions,
            Err(e) => return Err(self.fail_load(e)),
        };
        if questions.is_empty() {
            let e = PortError::NotFound(format!(
                "Question set '{}' has no questions to review.",
                set.name
            ));
            return Err(self.fail_load(e));
        }

        info!("Loaded {} questions from set '{}'.", questions.len(), set.name);
        self.set_name = set.name;
        self.questions = questions.into_iter().map(classify_question).collect();
        self.current_index = 0;
        self.outcomes.clear();
        self.answer_draft = None;
        self.evaluation = None;
        self.marked = false;
        self.marking_in_flight = false;
        self.submission_error = None;
        self.time_spent_secs = 0;
        self.started_at = Some(Instant::now());
        self.phase = SessionPhase::Answering;
        Ok(())
    }

    fn fail_load(&mut self, e: PortError) -> PortError {
        error!("Failed to load review session: {}", e);
        self.phase = SessionPhase::Failed {
            message: e.to_string(),
        };
        e
    }

    /// Stores the draft answer for the current question. Ignored once the
    /// question has been marked.
    pub fn record_answer(&mut self, text: &str) {
        if self.phase != SessionPhase::Answering || self.marked {
            return;
        }
        self.answer_draft = Some(text.to_string());
    }

    /// Sends the current answer to the scoring service and records the
    /// outcome. Does nothing without a non-empty answer, while a mark is
    /// already in flight, or once the question is marked (so one question can
    /// never produce two outcomes). A scoring failure is absorbed into a
    /// zero-score outcome; marking never blocks forward progress.
    pub async fn mark_answer(&mut self) {
        if self.phase != SessionPhase::Answering || self.marked || self.marking_in_flight {
            return;
        }
        let answer = match self.answer_draft.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => a.to_string(),
            _ => return,
        };
        let question = match self.questions.get(self.current_index) {
            Some(q) => q.clone(),
            None => return,
        };

        self.marking_in_flight = true;
        let result = self
            .evaluator
            .evaluate(&question, &self.set_name, &answer)
            .await;
        self.marking_in_flight = false;

        let evaluation = match result {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!("Evaluation failed for question {}: {}", question.id, e);
                Evaluation {
                    is_correct: false,
                    score_achieved: Some(0.0),
                    feedback: EVALUATION_FAILURE_FEEDBACK.to_string(),
                    new_learning_stage: None,
                }
            }
        };

        let score = evaluation
            .score_achieved
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0);
        self.outcomes.push(QuestionOutcome {
            question_id: question.id,
            user_answer: answer,
            score_achieved: score,
            uue_focus: UueFocus::from_stage(evaluation.new_learning_stage),
        });
        self.evaluation = Some(evaluation);
        self.marked = true;
    }

    /// Moves to the next question and resets the per-question transient
    /// state. Only valid once the current question is marked.
    pub fn next(&mut self) -> StepOutcome {
        if self.phase != SessionPhase::Answering || !self.marked {
            return StepOutcome::NotReady;
        }
        if self.current_index + 1 >= self.questions.len() {
            return StepOutcome::EndOfSession;
        }
        self.current_index += 1;
        self.answer_draft = None;
        self.evaluation = None;
        self.marked = false;
        StepOutcome::NextQuestion
    }

    /// Ends the session. Recorded outcomes are submitted to the backend; a
    /// submission failure is kept as a warning next to the `Completed` state
    /// so the user still sees their summary. With nothing recorded, the
    /// submission is skipped entirely.
    pub async fn complete(&mut self) {
        if self.phase == SessionPhase::Completed {
            return;
        }
        self.time_spent_secs = self
            .started_at
            .map(|started| started.elapsed().as_secs())
            .unwrap_or(0);

        if self.outcomes.is_empty() {
            info!("Review session ended with no recorded outcomes; skipping submission.");
            self.phase = SessionPhase::Completed;
            return;
        }

        let submission = ReviewSubmission {
            question_set_id: self.question_set_id,
            outcomes: self.outcomes.clone(),
            time_spent_secs: self.time_spent_secs,
        };
        match self.api.submit_review(&submission).await {
            Ok(()) => {
                info!(
                    "Submitted {} outcomes for set '{}'.",
                    submission.outcomes.len(),
                    self.set_name
                );
            }
            Err(e) => {
                warn!("Failed to submit review outcomes: {}", e);
                self.submission_error = Some(e.to_string());
            }
        }
        self.phase = SessionPhase::Completed;
    }

    //=====================================================================================
    // Read Accessors
    //=====================================================================================

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    /// The question currently being answered, if the session is in progress.
    pub fn current_question(&self) -> Option<&ReviewQuestion> {
        if self.phase != SessionPhase::Answering {
            return None;
        }
        self.questions.get(self.current_index)
    }

    /// The evaluation of the current question, once it has been marked.
    pub fn current_evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// True while an evaluation request is in flight; the UI should disable
    /// the marking trigger for the duration.
    pub fn is_marking(&self) -> bool {
        self.marking_in_flight
    }

    /// (1-based position, total question count).
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.questions.len())
    }

    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> ReviewSummary {
        let answered = self.outcomes.len();
        let average_score = if answered == 0 {
            0
        } else {
            let total: u32 = self.outcomes.iter().map(|o| u32::from(o.score_achieved)).sum();
            (f64::from(total) / answered as f64).round() as u8
        };
        ReviewSummary {
            set_name: self.set_name.clone(),
            total_questions: self.questions.len(),
            answered,
            average_score,
            time_spent_secs: self.time_spent_secs,
            submission_error: self.submission_error.clone(),
        }
    }
}
