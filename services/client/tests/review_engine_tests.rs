//! Integration tests for the review-session state machine.
//!
//! The engine is driven end to end against in-memory fakes of the backend
//! and the scoring service: sequencing, marking, outcome aggregation, and
//! submission, including every non-fatal failure path.

mod common;

use client_lib::review::{ReviewEngine, SessionPhase, StepOutcome};
use common::{evaluation, question, FakeEvaluator, FakeStudyApi, ScriptedEvaluation};
use elevate_core::domain::{QuestionType, UueFocus};
use elevate_core::ports::PortError;
use std::sync::Arc;
use uuid::Uuid;

fn three_question_set() -> Vec<elevate_core::domain::Question> {
    vec![
        question("What is the capital of France?", "Paris"),
        question("Name one noble gas.", "Helium"),
        question("What does DNA stand for?", "Deoxyribonucleic acid"),
    ]
}

/// Answers and marks the current question, then steps forward.
async fn answer_and_advance(engine: &mut ReviewEngine, answer: &str) -> StepOutcome {
    engine.record_answer(answer);
    engine.mark_answer().await;
    engine.next()
}

// ============================================================================
// Loading & Classification
// ============================================================================

#[tokio::test]
async fn load_classifies_questions_and_enters_answering() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(
        set_id,
        vec![question("True or False: birds are dinosaurs.", "True")],
    ));
    let evaluator = Arc::new(FakeEvaluator::scripted(Vec::new()));
    let mut engine = ReviewEngine::new(api, evaluator, set_id);

    engine.load().await.unwrap();

    assert_eq!(engine.phase(), &SessionPhase::Answering);
    assert_eq!(engine.set_name(), "Biology basics");
    let current = engine.current_question().unwrap();
    assert_eq!(current.question_type, QuestionType::TrueFalse);
}

#[tokio::test]
async fn load_fails_with_not_found_on_an_empty_set() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, Vec::new()));
    let evaluator = Arc::new(FakeEvaluator::scripted(Vec::new()));
    let mut engine = ReviewEngine::new(api, evaluator, set_id);

    let result = engine.load().await;

    assert!(matches!(result, Err(PortError::NotFound(_))));
    assert!(matches!(engine.phase(), SessionPhase::Failed { .. }));
    assert!(engine.current_question().is_none());
}

#[tokio::test]
async fn a_failed_load_can_be_retried() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, Vec::new()));
    let evaluator = Arc::new(FakeEvaluator::scripted(Vec::new()));
    let mut engine = ReviewEngine::new(api.clone(), evaluator, set_id);

    assert!(engine.load().await.is_err());
    assert!(matches!(engine.phase(), SessionPhase::Failed { .. }));

    api.set_questions(three_question_set());
    engine.load().await.unwrap();
    assert_eq!(engine.phase(), &SessionPhase::Answering);
    assert_eq!(engine.progress(), (1, 3));
}

// ============================================================================
// Marking Guards
// ============================================================================

#[tokio::test]
async fn marking_without_an_answer_is_silently_ignored() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, three_question_set()));
    let evaluator = Arc::new(FakeEvaluator::scripted(Vec::new()));
    let mut engine = ReviewEngine::new(api, evaluator.clone(), set_id);
    engine.load().await.unwrap();

    engine.record_answer("   ");
    engine.mark_answer().await;

    assert_eq!(evaluator.call_count(), 0);
    assert!(!engine.is_marked());
    assert!(engine.outcomes().is_empty());
    assert_eq!(engine.next(), StepOutcome::NotReady);
}

#[tokio::test]
async fn marking_twice_records_exactly_one_outcome() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, three_question_set()));
    let evaluator = Arc::new(FakeEvaluator::scripted(vec![ScriptedEvaluation::Succeed(
        evaluation(80.0, 2),
    )]));
    let mut engine = ReviewEngine::new(api, evaluator.clone(), set_id);
    engine.load().await.unwrap();

    engine.record_answer("Paris");
    engine.mark_answer().await;
    engine.mark_answer().await;

    assert_eq!(evaluator.call_count(), 1);
    assert_eq!(engine.outcomes().len(), 1);
}

#[tokio::test]
async fn answers_recorded_after_marking_are_ignored() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, three_question_set()));
    let evaluator = Arc::new(FakeEvaluator::scripted(vec![ScriptedEvaluation::Succeed(
        evaluation(80.0, 2),
    )]));
    let mut engine = ReviewEngine::new(api, evaluator, set_id);
    engine.load().await.unwrap();

    engine.record_answer("Paris");
    engine.mark_answer().await;
    engine.record_answer("changed my mind");

    assert_eq!(engine.outcomes()[0].user_answer, "Paris");
}

// ============================================================================
// The Full Session
// ============================================================================

#[tokio::test]
async fn a_full_session_submits_outcomes_in_answer_order() {
    let set_id = Uuid::new_v4();
    let questions = three_question_set();
    let expected_ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, questions));
    // Q1 scores 90 at stage 1, Q2 scores 40 at stage 3, Q3's evaluation
    // fails outright.
    let evaluator = Arc::new(FakeEvaluator::scripted(vec![
        ScriptedEvaluation::Succeed(evaluation(90.0, 1)),
        ScriptedEvaluation::Succeed(evaluation(40.0, 3)),
        ScriptedEvaluation::Fail,
    ]));
    let mut engine = ReviewEngine::new(api.clone(), evaluator, set_id);
    engine.load().await.unwrap();

    assert_eq!(answer_and_advance(&mut engine, "Paris").await, StepOutcome::NextQuestion);
    assert_eq!(answer_and_advance(&mut engine, "Argon").await, StepOutcome::NextQuestion);

    engine.record_answer("Deoxyribonucleic acid");
    engine.mark_answer().await;
    let synthetic = engine.current_evaluation().unwrap();
    assert!(!synthetic.is_correct);
    assert!(synthetic.feedback.starts_with("Error evaluating answer"));
    assert_eq!(engine.next(), StepOutcome::EndOfSession);

    engine.complete().await;
    assert_eq!(engine.phase(), &SessionPhase::Completed);

    let submitted = api.submitted();
    assert_eq!(submitted.len(), 1);
    let submission = &submitted[0];
    assert_eq!(submission.question_set_id, set_id);
    assert_eq!(submission.outcomes.len(), 3);
    let ids: Vec<Uuid> = submission.outcomes.iter().map(|o| o.question_id).collect();
    assert_eq!(ids, expected_ids);
    let scores: Vec<u8> = submission.outcomes.iter().map(|o| o.score_achieved).collect();
    assert_eq!(scores, vec![90, 40, 0]);
    let focuses: Vec<UueFocus> = submission.outcomes.iter().map(|o| o.uue_focus).collect();
    assert_eq!(focuses, vec![UueFocus::Understand, UueFocus::Use, UueFocus::Understand]);

    let summary = engine.summary();
    assert_eq!(summary.answered, 3);
    // 90 + 40 + 0 averages to 43.33, reported rounded.
    assert_eq!(summary.average_score, 43);
    assert!(summary.submission_error.is_none());
}

#[tokio::test]
async fn a_submission_failure_still_completes_the_session() {
    let set_id = Uuid::new_v4();
    let mut api = FakeStudyApi::with_questions(set_id, vec![question("Q?", "A")]);
    api.fail_submit = true;
    let api = Arc::new(api);
    let evaluator = Arc::new(FakeEvaluator::scripted(vec![ScriptedEvaluation::Succeed(
        evaluation(70.0, 4),
    )]));
    let mut engine = ReviewEngine::new(api.clone(), evaluator, set_id);
    engine.load().await.unwrap();

    assert_eq!(answer_and_advance(&mut engine, "A").await, StepOutcome::EndOfSession);
    engine.complete().await;

    assert_eq!(engine.phase(), &SessionPhase::Completed);
    let summary = engine.summary();
    assert!(summary.submission_error.is_some());
    assert_eq!(summary.average_score, 70);
    assert_eq!(summary.total_questions, 1);
    assert!(api.submitted().is_empty());
}

#[tokio::test]
async fn completing_with_no_outcomes_skips_submission() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, three_question_set()));
    let evaluator = Arc::new(FakeEvaluator::scripted(Vec::new()));
    let mut engine = ReviewEngine::new(api.clone(), evaluator, set_id);
    engine.load().await.unwrap();

    engine.complete().await;

    assert_eq!(engine.phase(), &SessionPhase::Completed);
    assert!(api.submitted().is_empty());
    assert!(engine.summary().submission_error.is_none());
}

#[tokio::test]
async fn a_high_stage_evaluation_maps_to_explore() {
    let set_id = Uuid::new_v4();
    let api = Arc::new(FakeStudyApi::with_questions(set_id, vec![question("Q?", "A")]));
    let evaluator = Arc::new(FakeEvaluator::scripted(vec![ScriptedEvaluation::Succeed(
        evaluation(95.0, 5),
    )]));
    let mut engine = ReviewEngine::new(api, evaluator, set_id);
    engine.load().await.unwrap();

    engine.record_answer("A");
    engine.mark_answer().await;

    assert_eq!(engine.outcomes()[0].uue_focus, UueFocus::Explore);
}
