pub mod folders;
pub mod notes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use utoipa::OpenApi;

use crate::{
    auth,
    dto::{
        CreateFolderRequest, CreateNoteRequest, FolderResponse, NoteResponse, UpdateFolderRequest,
        UpdateNoteRequest,
    },
    service::{FolderService, NoteService},
};

/// Everything a request handler needs, injected at construction time. The
/// store handle lives behind the services; no handler reads global state.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub folders: FolderService,
    pub api_token: Arc<str>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        notes::get_all_notes,
        notes::create_note,
        notes::get_one_note,
        notes::delete_note,
        notes::update_note,
        folders::get_all_folders,
        folders::create_folder,
        folders::get_one_folder,
        folders::delete_folder,
        folders::update_folder
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        FolderResponse,
        CreateFolderRequest,
        UpdateFolderRequest
    )),
    tags(
        (name = "notes", description = "Notes management API"),
        (name = "folders", description = "Folders management API")
    )
)]
pub struct ApiDoc;

/// The protected `/api` surface. Bearer auth wraps every route here; the
/// health and swagger routes are mounted outside in `main`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/notes", get(notes::get_all_notes))
        .route("/api/notes", post(notes::create_note))
        .route("/api/notes/{id}", get(notes::get_one_note))
        .route("/api/notes/{id}", delete(notes::delete_note))
        .route("/api/notes/{id}", patch(notes::update_note))
        .route("/api/folders", get(folders::get_all_folders))
        .route("/api/folders", post(folders::create_folder))
        .route("/api/folders/{id}", get(folders::get_one_folder))
        .route("/api/folders/{id}", delete(folders::delete_folder))
        .route("/api/folders/{id}", patch(folders::update_folder))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        models::{Folder, FolderPatch, NewFolder, NewNote, Note, NotePatch},
        repository::{FolderStore, NoteStore},
    };

    use super::*;

    const TEST_TOKEN: &str = "test-token";

    /// In-memory stand-in for the Postgres repository. Counts every store
    /// access so tests can assert that auth short-circuits before the store.
    #[derive(Default)]
    struct MemStore {
        notes: Mutex<Vec<Note>>,
        folders: Mutex<Vec<Folder>>,
        accesses: AtomicUsize,
    }

    impl MemStore {
        fn touch(&self) {
            self.accesses.fetch_add(1, Ordering::SeqCst);
        }

        fn access_count(&self) -> usize {
            self.accesses.load(Ordering::SeqCst)
        }

        fn note_count(&self) -> usize {
            self.notes.lock().unwrap().len()
        }

        fn seed_notes(&self, notes: Vec<Note>) {
            *self.notes.lock().unwrap() = notes;
        }

        fn seed_folders(&self, folders: Vec<Folder>) {
            *self.folders.lock().unwrap() = folders;
        }
    }

    #[async_trait]
    impl NoteStore for MemStore {
        async fn list_notes(&self) -> Result<Vec<Note>, tokio_postgres::Error> {
            self.touch();
            Ok(self.notes.lock().unwrap().clone())
        }

        async fn insert_note(&self, new: NewNote) -> Result<Note, tokio_postgres::Error> {
            self.touch();
            let mut notes = self.notes.lock().unwrap();
            let note = Note {
                id: notes.iter().map(|n| n.id).max().unwrap_or(0) + 1,
                title: new.title,
                content: new.content,
                modified: new.modified,
                folder_id: new.folder_id,
            };
            notes.push(note.clone());
            Ok(note)
        }

        async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error> {
            self.touch();
            Ok(self.notes.lock().unwrap().iter().find(|n| n.id == id).cloned())
        }

        async fn delete_note_by_id(&self, id: i64) -> Result<u64, tokio_postgres::Error> {
            self.touch();
            let mut notes = self.notes.lock().unwrap();
            let before = notes.len();
            notes.retain(|n| n.id != id);
            Ok((before - notes.len()) as u64)
        }

        async fn update_note(
            &self,
            id: i64,
            patch: NotePatch,
        ) -> Result<u64, tokio_postgres::Error> {
            self.touch();
            let mut notes = self.notes.lock().unwrap();
            let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
                return Ok(0);
            };
            if let Some(title) = patch.title {
                note.title = title;
            }
            if let Some(content) = patch.content {
                note.content = content;
            }
            if let Some(modified) = patch.modified {
                note.modified = modified;
            }
            if let Some(folder_id) = patch.folder_id {
                note.folder_id = Some(folder_id);
            }
            Ok(1)
        }
    }

    #[async_trait]
    impl FolderStore for MemStore {
        async fn list_folders(&self) -> Result<Vec<Folder>, tokio_postgres::Error> {
            self.touch();
            Ok(self.folders.lock().unwrap().clone())
        }

        async fn insert_folder(&self, new: NewFolder) -> Result<Folder, tokio_postgres::Error> {
            self.touch();
            let mut folders = self.folders.lock().unwrap();
            let folder = Folder {
                folder_id: folders.iter().map(|f| f.folder_id).max().unwrap_or(0) + 1,
                title: new.title,
                count: new.count,
            };
            folders.push(folder.clone());
            Ok(folder)
        }

        async fn get_folder_by_id(
            &self,
            id: i64,
        ) -> Result<Option<Folder>, tokio_postgres::Error> {
            self.touch();
            Ok(self
                .folders
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.folder_id == id)
                .cloned())
        }

        async fn delete_folder_by_id(&self, id: i64) -> Result<u64, tokio_postgres::Error> {
            self.touch();
            let mut folders = self.folders.lock().unwrap();
            let before = folders.len();
            folders.retain(|f| f.folder_id != id);
            Ok((before - folders.len()) as u64)
        }

        async fn update_folder(
            &self,
            id: i64,
            patch: FolderPatch,
        ) -> Result<u64, tokio_postgres::Error> {
            self.touch();
            let mut folders = self.folders.lock().unwrap();
            let Some(folder) = folders.iter_mut().find(|f| f.folder_id == id) else {
                return Ok(0);
            };
            if let Some(title) = patch.title {
                folder.title = title;
            }
            Ok(1)
        }
    }

    fn test_app() -> (Router, Arc<MemStore>) {
        let store = Arc::new(MemStore::default());
        let state = AppState {
            notes: NoteService::new(store.clone()),
            folders: FolderService::new(store.clone()),
            api_token: Arc::from(TEST_TOKEN),
        };
        (api_router(state), store)
    }

    fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"));

        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_notes() -> Vec<Note> {
        vec![
            Note {
                id: 1,
                title: "Dogs".to_string(),
                content: "content".to_string(),
                modified: "2019-01-03T00:00:00Z".parse().unwrap(),
                folder_id: Some(1),
            },
            Note {
                id: 2,
                title: "Cats".to_string(),
                content: "content".to_string(),
                modified: "2018-08-15T23:00:00Z".parse().unwrap(),
                folder_id: Some(2),
            },
            Note {
                id: 3,
                title: "Pigs".to_string(),
                content: "content".to_string(),
                modified: "2018-03-01T00:00:00Z".parse().unwrap(),
                folder_id: Some(3),
            },
        ]
    }

    #[tokio::test]
    async fn missing_token_is_401_before_any_store_access() {
        let (app, store) = test_app();

        for (method, uri) in [
            ("GET", "/api/notes"),
            ("GET", "/api/notes/1"),
            ("DELETE", "/api/folders/1"),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_json(response).await, json!({ "error": "Unauthorized request" }));
        }

        assert_eq!(store.access_count(), 0);
    }

    #[tokio::test]
    async fn wrong_token_is_401_before_any_store_access() {
        let (app, store) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/notes")
                    .header(header::AUTHORIZATION, "Bearer wrong-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.access_count(), 0);
    }

    #[tokio::test]
    async fn listing_an_empty_table_returns_an_empty_array() {
        let (app, _store) = test_app();

        let response = app.oneshot(authed("GET", "/api/notes", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn create_missing_field_is_400_and_inserts_nothing() {
        let (app, store) = test_app();

        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                "/api/notes",
                Some(json!({ "title": "Dogs", "modified": "2019-01-03T00:00:00Z" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "Missing 'content' in request body." } })
        );
        assert_eq!(store.note_count(), 0);

        let response = app
            .oneshot(authed("POST", "/api/folders", Some(json!({ "count": 0 }))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "Missing 'title' in request body." } })
        );
    }

    #[tokio::test]
    async fn create_note_round_trips_through_get() {
        let (app, _store) = test_app();

        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                "/api/notes",
                Some(json!({
                    "title": "Dogs",
                    "content": "content",
                    "modified": "2019-01-03T00:00:00Z",
                    "folderId": 1
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/notes/1"
        );
        let created = body_json(response).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["title"], "Dogs");

        let response = app
            .oneshot(authed("GET", "/api/notes/1", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn absent_id_is_404_with_resource_message() {
        let (app, _store) = test_app();

        let response = app
            .clone()
            .oneshot(authed("GET", "/api/notes/123456", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "Note Not Found" } })
        );

        let response = app
            .oneshot(authed("GET", "/api/folders/123456", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "Folder Not Found" } })
        );
    }

    #[tokio::test]
    async fn delete_is_terminal_and_not_repeatable() {
        let (app, store) = test_app();
        store.seed_notes(sample_notes());

        let response = app
            .clone()
            .oneshot(authed("DELETE", "/api/notes/2", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let response = app
            .clone()
            .oneshot(authed("GET", "/api/notes/2", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The load step fails first, so a repeated delete is 404, not 204.
        let response = app
            .oneshot(authed("DELETE", "/api/notes/2", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_updates_only_the_supplied_fields() {
        let (app, store) = test_app();
        store.seed_notes(sample_notes());

        let response = app
            .clone()
            .oneshot(authed("GET", "/api/notes/2", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let before = body_json(response).await;
        assert_eq!(before["id"], 2);

        let response = app
            .clone()
            .oneshot(authed(
                "PATCH",
                "/api/notes/2",
                Some(json!({ "title": "New" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed("GET", "/api/notes/2", None))
            .await
            .unwrap();
        let after = body_json(response).await;
        assert_eq!(after["title"], "New");
        assert_eq!(after["content"], before["content"]);
        assert_eq!(after["modified"], before["modified"]);
    }

    #[tokio::test]
    async fn empty_patch_body_is_400_on_an_existing_row() {
        let (app, store) = test_app();
        store.seed_notes(sample_notes());
        store.seed_folders(vec![Folder {
            folder_id: 1,
            title: "Important".to_string(),
            count: Some(3),
        }]);

        for uri in ["/api/notes/1", "/api/folders/1"] {
            let response = app
                .clone()
                .oneshot(authed("PATCH", uri, Some(json!({}))))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({ "error": { "message": "Request body must contain at least one updatable field" } })
            );
        }
    }

    #[tokio::test]
    async fn empty_patch_on_an_absent_row_is_404_because_load_runs_first() {
        let (app, _store) = test_app();

        let response = app
            .oneshot(authed("PATCH", "/api/notes/999", Some(json!({}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stored_markup_is_sanitized_on_every_read() {
        let (app, store) = test_app();
        store.seed_notes(vec![Note {
            id: 911,
            title: "Naughty naughty very naughty <script>alert(\"xss\");</script>".to_string(),
            content: "bad".to_string(),
            modified: "2018-03-01T00:00:00Z".parse().unwrap(),
            folder_id: None,
        }]);

        let response = app
            .clone()
            .oneshot(authed("GET", "/api/notes/911", None))
            .await
            .unwrap();
        let first = body_json(response).await;

        let title = first["title"].as_str().unwrap();
        assert!(!title.contains("<script>"));
        assert!(title.contains("&lt;script&gt;"));
        assert_eq!(first["content"], "bad");

        let response = app
            .oneshot(authed("GET", "/api/notes/911", None))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, first);
    }

    #[tokio::test]
    async fn folder_crud_mirrors_the_notes_contract() {
        let (app, _store) = test_app();

        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                "/api/folders",
                Some(json!({ "title": "Important" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/folders/1"
        );
        let created = body_json(response).await;
        assert_eq!(created, json!({ "folderId": 1, "title": "Important" }));

        let response = app
            .clone()
            .oneshot(authed(
                "PATCH",
                "/api/folders/1",
                Some(json!({ "title": "Renamed" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(authed("GET", "/api/folders", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{ "folderId": 1, "title": "Renamed" }])
        );

        let response = app
            .clone()
            .oneshot(authed("DELETE", "/api/folders/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed("GET", "/api/folders/1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
