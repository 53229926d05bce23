use std::sync::Arc;

use tempfile::TempDir;

use wordset_backend::db::operations::{self, NewFolder, NewWord, NewWordSet, WordSetFilter};
use wordset_backend::db::{schema, Database};
use wordset_backend::services::{
    LearnOrder, LearnSession, SessionRepository, SessionStore, SqliteSessionStore,
};

fn db_url(dir: &TempDir) -> String {
    format!("sqlite:{}?mode=rwc", dir.path().join("nested/data.db").display())
}

#[tokio::test]
async fn test_file_database_persists_across_reconnect() {
    let dir = TempDir::new().unwrap();
    let url = db_url(&dir);

    let set_id = {
        let db = Database::connect(&url).await.unwrap();
        let folder = operations::insert_folder(
            &db,
            &NewFolder {
                name: "Travel".to_string(),
                description: None,
                parent_id: None,
            },
        )
        .await
        .unwrap();
        let (word_set, words) = operations::insert_word_set(
            &db,
            &NewWordSet {
                name: "Airport".to_string(),
                description: Some("checking in".to_string()),
                folder_id: Some(folder.id.clone()),
            },
            &[
                NewWord {
                    text: "gate".to_string(),
                    meaning: "탑승구".to_string(),
                },
                NewWord {
                    text: "boarding pass".to_string(),
                    meaning: "탑승권".to_string(),
                },
            ],
        )
        .await
        .unwrap();
        assert_eq!(words.len(), 2);
        db.pool().close().await;
        word_set.id
    };

    assert!(dir.path().join("nested/data.db").exists());

    let db = Database::connect(&url).await.unwrap();
    assert!(!schema::run_migrations(db.pool()).await.unwrap());

    let word_set = operations::get_word_set(&db, &set_id).await.unwrap().unwrap();
    assert_eq!(word_set.word_count, 2);
    assert_eq!(word_set.description.as_deref(), Some("checking in"));

    let words = operations::list_words(&db, &set_id).await.unwrap();
    assert_eq!(words[0].text, "gate");
    assert_eq!(words[1].text, "boarding pass");

    let folder_id = word_set.folder_id.unwrap();
    let in_folder = operations::list_word_sets(&db, &WordSetFilter::Folder(folder_id.clone()))
        .await
        .unwrap();
    assert_eq!(in_folder.len(), 1);

    assert!(operations::delete_folder(&db, &folder_id).await.unwrap());
    let unfiled = operations::list_word_sets(&db, &WordSetFilter::Unfiled).await.unwrap();
    assert_eq!(unfiled.len(), 1);

    assert!(operations::delete_word_set(&db, &set_id).await.unwrap());
    assert!(operations::list_words(&db, &set_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sqlite_session_store_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let url = db_url(&dir);

    let session = {
        let mut rng = rand::rng();
        LearnSession::start(
            &mut rng,
            "set-1",
            vec!["a".to_string(), "b".to_string()],
            LearnOrder::Sequential,
            1_000,
        )
        .unwrap()
    };

    {
        let db = Database::connect(&url).await.unwrap();
        let sessions = SessionRepository::new(Arc::new(SqliteSessionStore::new(db.clone())));
        sessions.save_learn(&session).await.unwrap();
        db.pool().close().await;
    }

    let db = Database::connect(&url).await.unwrap();
    let store = Arc::new(SqliteSessionStore::new(db.clone()));
    let sessions = SessionRepository::new(store.clone());
    assert_eq!(sessions.load_learn("set-1").await.unwrap(), Some(session));

    // A corrupt snapshot reads as no session.
    store
        .set("exam_session_set-1", "{not json".to_string())
        .await
        .unwrap();
    assert!(sessions.load_exam("set-1").await.unwrap().is_none());

    sessions.clear_all("set-1").await.unwrap();
    assert!(sessions.load_learn("set-1").await.unwrap().is_none());
    assert!(store.get("exam_session_set-1").await.unwrap().is_none());
}
