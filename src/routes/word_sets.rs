use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::db::operations::{self, NewWordSet, Word, WordSet, WordSetFilter};
use crate::response::{self, AppError};
use crate::routes::extract::AppJson;
use crate::routes::validation::{self, double_option};
use crate::routes::words::{self as word_routes, WordInput};
use crate::routes::{exam, learn, require_word_set};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListWordSetsQuery {
    folder_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWordSetRequest {
    name: Option<String>,
    description: Option<String>,
    folder_id: Option<String>,
    #[serde(default)]
    words: Vec<WordInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateWordSetRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    folder_id: Option<Option<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordSetDetail {
    #[serde(flatten)]
    word_set: WordSet,
    words: Vec<Word>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_word_sets).post(create_word_set))
        .route(
            "/:id",
            get(get_word_set).put(update_word_set).delete(delete_word_set),
        )
        .route(
            "/:id/words",
            get(word_routes::list_words).post(word_routes::create_words),
        )
        .route(
            "/:id/words/:word_id",
            put(word_routes::update_word).delete(word_routes::delete_word),
        )
        .route("/:id/exam/preview", post(exam::preview_exam))
        .route(
            "/:id/exam",
            get(exam::get_exam)
                .post(exam::start_exam)
                .delete(exam::clear_exam),
        )
        .route("/:id/exam/answers", post(exam::submit_answer))
        .route("/:id/exam/finish", post(exam::finish_exam))
        .route(
            "/:id/learn",
            get(learn::get_learn)
                .post(learn::start_learn)
                .delete(learn::clear_learn),
        )
        .route("/:id/learn/actions", post(learn::apply_action))
}

async fn list_word_sets(
    State(state): State<AppState>,
    Query(query): Query<ListWordSetsQuery>,
) -> Result<Response, AppError> {
    let filter = match query.folder_id.as_deref().map(str::trim) {
        None | Some("") => WordSetFilter::All,
        Some("none") | Some("null") => WordSetFilter::Unfiled,
        Some(folder_id) => WordSetFilter::Folder(folder_id.to_string()),
    };

    let word_sets = operations::list_word_sets(state.db(), &filter).await?;
    Ok(response::ok(word_sets))
}

async fn create_word_set(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateWordSetRequest>,
) -> Result<Response, AppError> {
    let name = validation::name(payload.name.as_deref())?;
    let description = validation::description(payload.description.as_deref())?;
    let folder_id = validation::optional_id(payload.folder_id.as_deref());
    let words = word_routes::validate_words(&payload.words)?;

    if let Some(folder_id) = folder_id.as_deref() {
        ensure_folder_exists(&state, folder_id).await?;
    }

    let (word_set, words) = operations::insert_word_set(
        state.db(),
        &NewWordSet {
            name,
            description,
            folder_id,
        },
        &words,
    )
    .await?;

    tracing::info!(word_set_id = %word_set.id, words = words.len(), "word set created");
    Ok(response::created(WordSetDetail { word_set, words }))
}

async fn get_word_set(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    let word_set = require_word_set(&state, &word_set_id).await?;
    let words = operations::list_words(state.db(), &word_set_id).await?;
    Ok(response::ok(WordSetDetail { word_set, words }))
}

async fn update_word_set(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
    AppJson(payload): AppJson<UpdateWordSetRequest>,
) -> Result<Response, AppError> {
    let mut word_set = require_word_set(&state, &word_set_id).await?;

    if let Some(name) = payload.name.as_deref() {
        word_set.name = validation::name(Some(name))?;
    }
    if let Some(description) = payload.description {
        word_set.description = validation::description(description.as_deref())?;
    }
    if let Some(folder_id) = payload.folder_id {
        let folder_id = validation::optional_id(folder_id.as_deref());
        if let Some(folder_id) = folder_id.as_deref() {
            ensure_folder_exists(&state, folder_id).await?;
        }
        word_set.folder_id = folder_id;
    }

    operations::update_word_set(state.db(), &mut word_set).await?;
    Ok(response::ok(word_set))
}

async fn delete_word_set(
    State(state): State<AppState>,
    Path(word_set_id): Path<String>,
) -> Result<Response, AppError> {
    if !operations::delete_word_set(state.db(), &word_set_id).await? {
        return Err(AppError::not_found("단어장을 찾을 수 없습니다"));
    }

    if let Err(err) = state.sessions().clear_all(&word_set_id).await {
        tracing::warn!(%word_set_id, error = %err, "failed to clear sessions of deleted word set");
    }

    tracing::info!(%word_set_id, "word set deleted");
    Ok(response::message("단어장이 삭제되었습니다"))
}

async fn ensure_folder_exists(state: &AppState, folder_id: &str) -> Result<(), AppError> {
    match operations::get_folder(state.db(), folder_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("폴더를 찾을 수 없습니다")),
    }
}
