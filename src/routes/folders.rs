use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::db::operations::{self, Folder, NewFolder, WordSet, WordSetFilter};
use crate::response::{self, AppError};
use crate::routes::extract::AppJson;
use crate::routes::validation::{self, double_option};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderRequest {
    name: Option<String>,
    description: Option<String>,
    parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFolderRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    parent_id: Option<Option<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FolderDetail {
    #[serde(flatten)]
    folder: Folder,
    word_sets: Vec<WordSet>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_folders).post(create_folder))
        .route(
            "/:id",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
}

async fn list_folders(State(state): State<AppState>) -> Result<Response, AppError> {
    let folders = operations::list_folders(state.db()).await?;
    Ok(response::ok(folders))
}

async fn create_folder(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFolderRequest>,
) -> Result<Response, AppError> {
    let name = validation::name(payload.name.as_deref())?;
    let description = validation::description(payload.description.as_deref())?;
    let parent_id = validation::optional_id(payload.parent_id.as_deref());

    if let Some(parent_id) = parent_id.as_deref() {
        ensure_valid_parent(&state, None, parent_id).await?;
    }

    let folder = operations::insert_folder(
        state.db(),
        &NewFolder {
            name,
            description,
            parent_id,
        },
    )
    .await?;

    tracing::info!(folder_id = %folder.id, "folder created");
    Ok(response::created(folder))
}

async fn get_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Result<Response, AppError> {
    let folder = require_folder(&state, &folder_id).await?;
    let word_sets =
        operations::list_word_sets(state.db(), &WordSetFilter::Folder(folder_id)).await?;
    Ok(response::ok(FolderDetail { folder, word_sets }))
}

async fn update_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
    AppJson(payload): AppJson<UpdateFolderRequest>,
) -> Result<Response, AppError> {
    let mut folder = require_folder(&state, &folder_id).await?;

    if let Some(name) = payload.name.as_deref() {
        folder.name = validation::name(Some(name))?;
    }
    if let Some(description) = payload.description {
        folder.description = validation::description(description.as_deref())?;
    }
    if let Some(parent_id) = payload.parent_id {
        let parent_id = validation::optional_id(parent_id.as_deref());
        if let Some(parent_id) = parent_id.as_deref() {
            ensure_valid_parent(&state, Some(&folder.id), parent_id).await?;
        }
        folder.parent_id = parent_id;
    }

    operations::update_folder(state.db(), &mut folder).await?;
    Ok(response::ok(folder))
}

async fn delete_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Result<Response, AppError> {
    if !operations::delete_folder(state.db(), &folder_id).await? {
        return Err(AppError::not_found("폴더를 찾을 수 없습니다"));
    }

    tracing::info!(%folder_id, "folder deleted, word sets detached");
    Ok(response::message("폴더가 삭제되었습니다"))
}

async fn require_folder(state: &AppState, folder_id: &str) -> Result<Folder, AppError> {
    operations::get_folder(state.db(), folder_id)
        .await?
        .ok_or_else(|| AppError::not_found("폴더를 찾을 수 없습니다"))
}

/// Folders nest one level deep: the parent must be a top-level folder, and
/// a folder that already has children cannot itself be nested.
async fn ensure_valid_parent(
    state: &AppState,
    folder_id: Option<&str>,
    parent_id: &str,
) -> Result<(), AppError> {
    if folder_id == Some(parent_id) {
        return Err(AppError::validation(
            "폴더를 자기 자신의 하위 폴더로 지정할 수 없습니다",
        ));
    }

    let parent = operations::get_folder(state.db(), parent_id)
        .await?
        .ok_or_else(|| AppError::not_found("상위 폴더를 찾을 수 없습니다"))?;
    if parent.parent_id.is_some() {
        return Err(AppError::validation("폴더는 한 단계까지만 중첩할 수 있습니다"));
    }

    if let Some(folder_id) = folder_id {
        if operations::count_child_folders(state.db(), folder_id).await? > 0 {
            return Err(AppError::validation(
                "하위 폴더가 있는 폴더는 다른 폴더 안으로 옮길 수 없습니다",
            ));
        }
    }
    Ok(())
}
