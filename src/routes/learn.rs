use axum::extract::{Path, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::db::operations::{self, Word};
use crate::response::{self, AppError};
use crate::routes::extract::{AppJson, JsonOrDefault};
use crate::routes::require_word_set;
use crate::services::{now_millis, LearnAction, LearnOrder, LearnProgress, LearnSession};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StartLearnRequest {
    #[serde(default)]
    order: LearnOrder,
}

#[derive(Debug, Deserialize)]
pub struct LearnActionRequest {
    action: LearnAction,
    order: Option<LearnOrder>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LearnView<'a> {
    #[serde(flatten)]
    session: &'a LearnSession,
    progress: LearnProgress,
    current_word: Option<&'a Word>,
}

impl<'a> LearnView<'a> {
    fn new(session: &'a LearnSession, words: &'a [Word]) -> Self {
        let current_word = session
            .current_word_id()
            .and_then(|id| words.iter().find(|word| word.id == id));
        Self {
            session,
            progress: session.progress(),
            current_word,
        }
    }
}

fn word_ids(words: &[Word]) -> Vec<String> {
    words.iter().map(|word| word.id.clone()).collect()
}

/// Loads the stored session and brings it in line with the current words.
/// A session whose words were all deleted is dropped.
async fn restore_learn(
    state: &AppState,
    word_set_id: &str,
    words: &[Word],
) -> Result<Option<LearnSession>, AppError> {
    let Some(mut session) = state.sessions().load_learn(word_set_id).await? else {
        return Ok(None);
    };

    if !session.reconcile(&word_ids(words)) {
        return Ok(Some(session));
    }
    if session.word_ids.is_empty() {
        state.sessions().clear_learn(word_set_id).await?;
        return Ok(None);
    }

    session.updated_at = now_millis();
    state.sessions().save_learn(&session).await?;
    tracing::debug!(%word_set_id, total = session.word_ids.len(), "learn session reconciled");
    Ok(Some(session))
}

pub async fn start_learn(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    JsonOrDefault(payload): JsonOrDefault<StartLearnRequest>,
) -> Result<Response, AppError> {
    require_word_set(&state, &word_set_id).await?;
    let words = operations::list_words(state.db(), &word_set_id).await?;

    let session = {
        let mut rng = rand::rng();
        LearnSession::start(
            &mut rng,
            word_set_id.as_str(),
            word_ids(&words),
            payload.order,
            now_millis(),
        )?
    };
    state.sessions().save_learn(&session).await?;

    tracing::info!(%word_set_id, order = ?session.order, cards = session.word_ids.len(), "learn session started");
    Ok(response::created(LearnView::new(&session, &words)))
}

pub async fn get_learn(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    require_word_set(&state, &word_set_id).await?;
    let words = operations::list_words(state.db(), &word_set_id).await?;
    let session = restore_learn(&state, &word_set_id, &words).await?;
    Ok(response::ok(
        session.as_ref().map(|session| LearnView::new(session, &words)),
    ))
}

pub async fn apply_action(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    AppJson(payload): AppJson<LearnActionRequest>,
) -> Result<Response, AppError> {
    require_word_set(&state, &word_set_id).await?;
    let words = operations::list_words(state.db(), &word_set_id).await?;
    let mut session = restore_learn(&state, &word_set_id, &words)
        .await?
        .ok_or_else(|| AppError::not_found("진행 중인 학습이 없습니다"))?;

    {
        let mut rng = rand::rng();
        session.apply(
            &mut rng,
            payload.action,
            payload.order,
            &word_ids(&words),
            now_millis(),
        );
    }
    state.sessions().save_learn(&session).await?;

    Ok(response::ok(LearnView::new(&session, &words)))
}

pub async fn clear_learn(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    if !operations::word_set_exists(state.db(), &word_set_id).await? {
        return Err(AppError::not_found("단어장을 찾을 수 없습니다"));
    }
    state.sessions().clear_learn(&word_set_id).await?;
    Ok(response::message("학습 기록이 삭제되었습니다"))
}
