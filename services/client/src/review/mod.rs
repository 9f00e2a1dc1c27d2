pub mod classify;
pub mod engine;

pub use classify::classify_question;
pub use engine::{ReviewEngine, ReviewSummary, SessionPhase, StepOutcome};
