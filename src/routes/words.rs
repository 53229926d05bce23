use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;

use crate::db::operations::{self, NewWord};
use crate::response::{self, AppError};
use crate::routes::extract::AppJson;
use crate::routes::{require_word_set, validation};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct WordInput {
    pub text: Option<String>,
    pub meaning: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateWordsRequest {
    Bulk { words: Vec<WordInput> },
    Single(WordInput),
}

pub fn validate_words(inputs: &[WordInput]) -> Result<Vec<NewWord>, AppError> {
    inputs
        .iter()
        .map(|input| {
            Ok(NewWord {
                text: validation::word_text(input.text.as_deref())?,
                meaning: validation::word_meaning(input.meaning.as_deref())?,
            })
        })
        .collect()
}

pub async fn list_words(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    require_word_set(&state, &word_set_id).await?;
    let words = operations::list_words(state.db(), &word_set_id).await?;
    Ok(response::ok(words))
}

pub async fn create_words(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    AppJson(payload): AppJson<CreateWordsRequest>,
) -> Result<Response, AppError> {
    require_word_set(&state, &word_set_id).await?;

    let words = match payload {
        CreateWordsRequest::Bulk { words } => {
            if words.is_empty() {
                return Err(AppError::validation("추가할 단어가 없습니다"));
            }
            validate_words(&words)?
        }
        CreateWordsRequest::Single(word) => validate_words(std::slice::from_ref(&word))?,
    };

    let inserted = operations::insert_words(state.db(), &word_set_id, &words).await?;
    tracing::debug!(%word_set_id, count = inserted.len(), "words added");
    Ok(response::created(inserted))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWordRequest {
    text: Option<String>,
    meaning: Option<String>,
}

pub async fn update_word(
    State(state): State<AppState>,
    Path((word_set_id, word_id)): Path<(String, String)>,
    AppJson(payload): AppJson<UpdateWordRequest>,
) -> Result<Response, AppError> {
    let mut word = operations::get_word(state.db(), &word_set_id, &word_id)
        .await?
        .ok_or_else(|| AppError::not_found("단어를 찾을 수 없습니다"))?;

    if let Some(text) = payload.text.as_deref() {
        word.text = validation::word_text(Some(text))?;
    }
    if let Some(meaning) = payload.meaning.as_deref() {
        word.meaning = validation::word_meaning(Some(meaning))?;
    }

    operations::update_word(state.db(), &word).await?;
    Ok(response::ok(word))
}

pub async fn delete_word(
    State(state): State<AppState>,
    Path((word_set_id, word_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if !operations::delete_word(state.db(), &word_set_id, &word_id).await? {
        return Err(AppError::not_found("단어를 찾을 수 없습니다"));
    }
    Ok(response::message("단어가 삭제되었습니다"))
}
