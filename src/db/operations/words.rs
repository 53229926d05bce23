use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::db::{new_id, now_iso, Database};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub text: String,
    pub meaning: String,
    pub word_set_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewWord {
    pub text: String,
    pub meaning: String,
}

pub async fn list_words(db: &Database, word_set_id: &str) -> Result<Vec<Word>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "words"
        WHERE "wordSetId" = ?
        ORDER BY "createdAt" ASC, rowid ASC
        "#,
    )
    .bind(word_set_id)
    .fetch_all(db.pool())
    .await?;
    Ok(rows.iter().map(map_word).collect())
}

pub async fn get_word(
    db: &Database,
    word_set_id: &str,
    word_id: &str,
) -> Result<Option<Word>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "words" WHERE "id" = ? AND "wordSetId" = ? LIMIT 1"#)
        .bind(word_id)
        .bind(word_set_id)
        .fetch_optional(db.pool())
        .await?;
    Ok(row.as_ref().map(map_word))
}

pub async fn insert_words(
    db: &Database,
    word_set_id: &str,
    words: &[NewWord],
) -> Result<Vec<Word>, sqlx::Error> {
    let now = now_iso();
    let mut tx = db.pool().begin().await?;
    let inserted = insert_words_on(&mut tx, word_set_id, words, &now).await?;
    touch_word_set(&mut tx, word_set_id, &now).await?;
    tx.commit().await?;
    Ok(inserted)
}

pub(crate) async fn insert_words_on(
    conn: &mut SqliteConnection,
    word_set_id: &str,
    words: &[NewWord],
    now: &str,
) -> Result<Vec<Word>, sqlx::Error> {
    let mut inserted = Vec::with_capacity(words.len());
    for word in words {
        let id = new_id();
        sqlx::query(
            r#"
            INSERT INTO "words" ("id", "text", "meaning", "wordSetId", "createdAt")
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&word.text)
        .bind(&word.meaning)
        .bind(word_set_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        inserted.push(Word {
            id,
            text: word.text.clone(),
            meaning: word.meaning.clone(),
            word_set_id: word_set_id.to_string(),
            created_at: now.to_string(),
        });
    }
    Ok(inserted)
}

pub async fn update_word(db: &Database, word: &Word) -> Result<(), sqlx::Error> {
    let now = now_iso();
    let mut tx = db.pool().begin().await?;
    sqlx::query(r#"UPDATE "words" SET "text" = ?, "meaning" = ? WHERE "id" = ? AND "wordSetId" = ?"#)
        .bind(&word.text)
        .bind(&word.meaning)
        .bind(&word.id)
        .bind(&word.word_set_id)
        .execute(&mut *tx)
        .await?;
    touch_word_set(&mut tx, &word.word_set_id, &now).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_word(db: &Database, word_set_id: &str, word_id: &str) -> Result<bool, sqlx::Error> {
    let now = now_iso();
    let mut tx = db.pool().begin().await?;
    let result = sqlx::query(r#"DELETE FROM "words" WHERE "id" = ? AND "wordSetId" = ?"#)
        .bind(word_id)
        .bind(word_set_id)
        .execute(&mut *tx)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        touch_word_set(&mut tx, word_set_id, &now).await?;
    }
    tx.commit().await?;
    Ok(deleted)
}

async fn touch_word_set(
    conn: &mut SqliteConnection,
    word_set_id: &str,
    now: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE "word_sets" SET "updatedAt" = ? WHERE "id" = ?"#)
        .bind(now)
        .bind(word_set_id)
        .execute(conn)
        .await?;
    Ok(())
}

fn map_word(row: &SqliteRow) -> Word {
    Word {
        id: row.try_get("id").unwrap_or_default(),
        text: row.try_get("text").unwrap_or_default(),
        meaning: row.try_get("meaning").unwrap_or_default(),
        word_set_id: row.try_get("wordSetId").unwrap_or_default(),
        created_at: row.try_get("createdAt").unwrap_or_default(),
    }
}
