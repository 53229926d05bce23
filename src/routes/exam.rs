use axum::extract::{Path, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use wordset_exam::{generate_questions, ExamAnswer, ExamConfig, ExamQuestion, ExamWord};

use crate::db::operations;
use crate::response::{self, AppError};
use crate::routes::extract::AppJson;
use crate::routes::require_word_set;
use crate::services::{now_millis, ExamSession, SessionError};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExamView<'a> {
    #[serde(flatten)]
    session: &'a ExamSession,
    current_question: Option<&'a ExamQuestion>,
    remaining: usize,
    is_complete: bool,
}

impl<'a> ExamView<'a> {
    fn new(session: &'a ExamSession) -> Self {
        Self {
            session,
            current_question: session.current_question(),
            remaining: session.remaining(),
            is_complete: session.is_complete(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    answer: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerView<'a> {
    answer: ExamAnswer,
    correct_answer: String,
    exam: ExamView<'a>,
}

async fn load_exam_words(state: &AppState, word_set_id: &str) -> Result<Vec<ExamWord>, AppError> {
    require_word_set(state, word_set_id).await?;
    let words = operations::list_words(state.db(), word_set_id).await?;
    Ok(words
        .into_iter()
        .map(|word| ExamWord::new(word.id, word.text, word.meaning))
        .collect())
}

async fn require_exam(state: &AppState, word_set_id: &str) -> Result<ExamSession, AppError> {
    state
        .sessions()
        .load_exam(word_set_id)
        .await?
        .ok_or_else(|| AppError::not_found("진행 중인 시험이 없습니다"))
}

pub async fn preview_exam(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    AppJson(config): AppJson<ExamConfig>,
) -> Result<Response, AppError> {
    let words = load_exam_words(&state, &word_set_id).await?;
    config.validate(words.len()).map_err(SessionError::from)?;

    let questions = generate_questions(
        &words,
        config.mode,
        config.direction,
        config.question_count,
    );
    Ok(response::ok(questions))
}

pub async fn start_exam(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    AppJson(config): AppJson<ExamConfig>,
) -> Result<Response, AppError> {
    let words = load_exam_words(&state, &word_set_id).await?;

    let session = {
        let mut rng = rand::rng();
        ExamSession::start(&mut rng, word_set_id.as_str(), config, &words, now_millis())?
    };
    state.sessions().save_exam(&session).await?;

    tracing::info!(
        %word_set_id,
        questions = session.questions.len(),
        mode = ?session.config.mode,
        "exam started"
    );
    Ok(response::created(ExamView::new(&session)))
}

pub async fn get_exam(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    require_word_set(&state, &word_set_id).await?;
    let session = state.sessions().load_exam(&word_set_id).await?;
    Ok(response::ok(session.as_ref().map(ExamView::new)))
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    AppJson(payload): AppJson<SubmitAnswerRequest>,
) -> Result<Response, AppError> {
    let mut session = require_exam(&state, &word_set_id).await?;

    let answer = session.submit_answer(&payload.answer)?;
    let correct_answer = session
        .questions
        .get(answer.question_index)
        .map(|question| question.correct_answer.clone())
        .unwrap_or_default();
    state.sessions().save_exam(&session).await?;

    Ok(response::ok(AnswerView {
        answer,
        correct_answer,
        exam: ExamView::new(&session),
    }))
}

pub async fn finish_exam(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    let mut session = require_exam(&state, &word_set_id).await?;

    let already_finished = session.is_finished();
    let result = session.finish(now_millis());
    if !already_finished {
        state.sessions().save_exam(&session).await?;
        tracing::info!(
            %word_set_id,
            correct = result.correct_count,
            incorrect = result.incorrect_count,
            percentage = result.percentage,
            "exam finished"
        );
    }

    Ok(response::ok(ExamView::new(&session)))
}

pub async fn clear_exam(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    if !operations::word_set_exists(state.db(), &word_set_id).await? {
        return Err(AppError::not_found("단어장을 찾을 수 없습니다"));
    }
    state.sessions().clear_exam(&word_set_id).await?;
    Ok(response::message("시험 기록이 삭제되었습니다"))
}
