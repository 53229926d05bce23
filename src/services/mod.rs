pub mod exam_session;
pub mod learn_session;
pub mod session_store;

use thiserror::Error;
use wordset_exam::ExamError;

pub use exam_session::ExamSession;
pub use learn_session::{LearnAction, LearnOrder, LearnProgress, LearnSession};
pub use session_store::{
    MemorySessionStore, SessionRepository, SessionStore, SessionStoreError, SqliteSessionStore,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("단어장에 단어가 없습니다")]
    EmptyWordSet,
    #[error("이미 종료된 시험입니다")]
    AlreadyFinished,
    #[error("남은 문제가 없습니다")]
    NoPendingQuestion,
    #[error("{}", describe_exam_error(.0))]
    Exam(#[from] ExamError),
}

fn describe_exam_error(err: &ExamError) -> &'static str {
    match err {
        ExamError::NoWords => "단어장에 단어가 없습니다",
        ExamError::InvalidQuestionCount(_) => "문제 수는 1 이상이어야 합니다",
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
