pub mod domain;
pub mod ports;

pub use domain::{
    AuthGrant, Evaluation, Question, QuestionOutcome, QuestionSet, QuestionType, ReviewQuestion,
    ReviewSubmission, User, UueFocus,
};
pub use ports::{
    BearerTokenSource, EvaluationService, PortError, PortResult, StudyApi, TokenStorage,
};
