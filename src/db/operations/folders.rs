use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::{new_id, now_iso, Database};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub word_set_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

const SELECT_FOLDER: &str = r#"
    SELECT f.*,
        (SELECT COUNT(*) FROM "word_sets" ws WHERE ws."folderId" = f."id") AS "wordSetCount"
    FROM "folders" f
"#;

pub async fn list_folders(db: &Database) -> Result<Vec<Folder>, sqlx::Error> {
    let rows = sqlx::query(&format!(r#"{SELECT_FOLDER} ORDER BY f."createdAt" ASC, f.rowid ASC"#))
        .fetch_all(db.pool())
        .await?;
    Ok(rows.iter().map(map_folder).collect())
}

pub async fn get_folder(db: &Database, folder_id: &str) -> Result<Option<Folder>, sqlx::Error> {
    let row = sqlx::query(&format!(r#"{SELECT_FOLDER} WHERE f."id" = ? LIMIT 1"#))
        .bind(folder_id)
        .fetch_optional(db.pool())
        .await?;
    Ok(row.as_ref().map(map_folder))
}

pub async fn insert_folder(db: &Database, folder: &NewFolder) -> Result<Folder, sqlx::Error> {
    let id = new_id();
    let now = now_iso();
    sqlx::query(
        r#"
        INSERT INTO "folders" ("id", "name", "description", "parentId", "createdAt", "updatedAt")
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&folder.name)
    .bind(&folder.description)
    .bind(&folder.parent_id)
    .bind(&now)
    .bind(&now)
    .execute(db.pool())
    .await?;

    Ok(Folder {
        id,
        name: folder.name.clone(),
        description: folder.description.clone(),
        parent_id: folder.parent_id.clone(),
        word_set_count: 0,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Writes name, description and parent back; bumps `updatedAt` on `folder`.
pub async fn update_folder(db: &Database, folder: &mut Folder) -> Result<(), sqlx::Error> {
    folder.updated_at = now_iso();
    sqlx::query(
        r#"
        UPDATE "folders"
        SET "name" = ?, "description" = ?, "parentId" = ?, "updatedAt" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(&folder.name)
    .bind(&folder.description)
    .bind(&folder.parent_id)
    .bind(&folder.updated_at)
    .bind(&folder.id)
    .execute(db.pool())
    .await?;
    Ok(())
}

/// Deletes the folder. Its word sets and child folders are detached by the
/// `ON DELETE SET NULL` foreign keys, never removed.
pub async fn delete_folder(db: &Database, folder_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM "folders" WHERE "id" = ?"#)
        .bind(folder_id)
        .execute(db.pool())
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_child_folders(db: &Database, folder_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "folders" WHERE "parentId" = ?"#)
        .bind(folder_id)
        .fetch_one(db.pool())
        .await
}

fn map_folder(row: &SqliteRow) -> Folder {
    Folder {
        id: row.try_get("id").unwrap_or_default(),
        name: row.try_get("name").unwrap_or_default(),
        description: row.try_get("description").ok().flatten(),
        parent_id: row.try_get("parentId").ok().flatten(),
        word_set_count: row.try_get("wordSetCount").unwrap_or(0),
        created_at: row.try_get("createdAt").unwrap_or_default(),
        updated_at: row.try_get("updatedAt").unwrap_or_default(),
    }
}
