use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::operations::words::{insert_words_on, NewWord, Word};
use crate::db::{new_id, now_iso, Database};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSet {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub folder_id: Option<String>,
    pub word_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewWordSet {
    pub name: String,
    pub description: Option<String>,
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSetFilter {
    All,
    Folder(String),
    Unfiled,
}

const SELECT_WORD_SET: &str = r#"
    SELECT ws.*,
        (SELECT COUNT(*) FROM "words" w WHERE w."wordSetId" = ws."id") AS "wordCount"
    FROM "word_sets" ws
"#;

pub async fn list_word_sets(
    db: &Database,
    filter: &WordSetFilter,
) -> Result<Vec<WordSet>, sqlx::Error> {
    let order = r#"ORDER BY ws."createdAt" ASC, ws.rowid ASC"#;
    let rows = match filter {
        WordSetFilter::All => {
            sqlx::query(&format!("{SELECT_WORD_SET} {order}"))
                .fetch_all(db.pool())
                .await?
        }
        WordSetFilter::Folder(folder_id) => {
            sqlx::query(&format!(r#"{SELECT_WORD_SET} WHERE ws."folderId" = ? {order}"#))
                .bind(folder_id)
                .fetch_all(db.pool())
                .await?
        }
        WordSetFilter::Unfiled => {
            sqlx::query(&format!(r#"{SELECT_WORD_SET} WHERE ws."folderId" IS NULL {order}"#))
                .fetch_all(db.pool())
                .await?
        }
    };
    Ok(rows.iter().map(map_word_set).collect())
}

pub async fn get_word_set(db: &Database, word_set_id: &str) -> Result<Option<WordSet>, sqlx::Error> {
    let row = sqlx::query(&format!(r#"{SELECT_WORD_SET} WHERE ws."id" = ? LIMIT 1"#))
        .bind(word_set_id)
        .fetch_optional(db.pool())
        .await?;
    Ok(row.as_ref().map(map_word_set))
}

/// Creates the word set and its initial words in one transaction.
pub async fn insert_word_set(
    db: &Database,
    word_set: &NewWordSet,
    words: &[NewWord],
) -> Result<(WordSet, Vec<Word>), sqlx::Error> {
    let id = new_id();
    let now = now_iso();

    let mut tx = db.pool().begin().await?;
    sqlx::query(
        r#"
        INSERT INTO "word_sets" ("id", "name", "description", "folderId", "createdAt", "updatedAt")
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&word_set.name)
    .bind(&word_set.description)
    .bind(&word_set.folder_id)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let inserted = insert_words_on(&mut tx, &id, words, &now).await?;
    tx.commit().await?;

    Ok((
        WordSet {
            id,
            name: word_set.name.clone(),
            description: word_set.description.clone(),
            folder_id: word_set.folder_id.clone(),
            word_count: inserted.len() as i64,
            created_at: now.clone(),
            updated_at: now,
        },
        inserted,
    ))
}

pub async fn update_word_set(db: &Database, word_set: &mut WordSet) -> Result<(), sqlx::Error> {
    word_set.updated_at = now_iso();
    sqlx::query(
        r#"
        UPDATE "word_sets"
        SET "name" = ?, "description" = ?, "folderId" = ?, "updatedAt" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(&word_set.name)
    .bind(&word_set.description)
    .bind(&word_set.folder_id)
    .bind(&word_set.updated_at)
    .bind(&word_set.id)
    .execute(db.pool())
    .await?;
    Ok(())
}

/// Deletes the word set; its words follow through `ON DELETE CASCADE`.
pub async fn delete_word_set(db: &Database, word_set_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM "word_sets" WHERE "id" = ?"#)
        .bind(word_set_id)
        .execute(db.pool())
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn word_set_exists(db: &Database, word_set_id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<String> =
        sqlx::query_scalar(r#"SELECT "id" FROM "word_sets" WHERE "id" = ? LIMIT 1"#)
            .bind(word_set_id)
            .fetch_optional(db.pool())
            .await?;
    Ok(found.is_some())
}

fn map_word_set(row: &SqliteRow) -> WordSet {
    WordSet {
        id: row.try_get("id").unwrap_or_default(),
        name: row.try_get("name").unwrap_or_default(),
        description: row.try_get("description").ok().flatten(),
        folder_id: row.try_get("folderId").ok().flatten(),
        word_count: row.try_get("wordCount").unwrap_or(0),
        created_at: row.try_get("createdAt").unwrap_or_default(),
        updated_at: row.try_get("updatedAt").unwrap_or_default(),
    }
}
