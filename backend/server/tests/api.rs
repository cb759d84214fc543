use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use server::{
    app,
    auth::USER_HEADER,
    config::Config,
    database::Store,
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

fn router() -> (Router, Arc<AppState>) {
    let state = AppState::with_store(Config::memory(), Store::memory());

    (app(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, "alice", method, uri, body).await
}

async fn send_as(
    app: &Router,
    user: &str,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_HEADER, user);

    let body = match body {
        Some(body) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn stroke(x: f64) -> Value {
    json!({"points": [{"x": x, "y": x}], "brushColor": "#000", "brushRadius": 3})
}

#[tokio::test]
async fn test_requires_identity() {
    let (app, _) = router();

    let response = app
        .oneshot(Request::builder().uri("/notes").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_note_crud() {
    let (app, _) = router();

    let (status, created) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": "Groceries", "content": "milk", "folder": "Home", "tags": ["Food"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "text");
    assert_eq!(created["tags"], json!(["food"]));

    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/notes/{id}"),
        Some(json!({"title": "Groceries", "content": "milk, eggs"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "milk, eggs");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, _) = send(&app, "DELETE", &format!("/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notes_are_private() {
    let (app, _) = router();

    let (_, created) = send(&app, "POST", "/notes", Some(json!({"title": "Secret"}))).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send_as(&app, "bob", "GET", &format!("/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send_as(&app, "bob", "GET", "/notes", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_list_is_refreshed_after_write() {
    let (app, _) = router();

    let (_, listed) = send(&app, "GET", "/notes", None).await;
    assert_eq!(listed, json!([]));

    send(&app, "POST", "/notes", Some(json!({"title": "One", "folder": "Work"}))).await;
    send(&app, "POST", "/notes", Some(json!({"title": "Two", "tags": ["idea"]}))).await;

    let (_, listed) = send(&app, "GET", "/notes", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (_, work) = send(&app, "GET", "/notes?folder=Work", None).await;
    assert_eq!(work.as_array().unwrap().len(), 1);
    assert_eq!(work[0]["title"], "One");

    let (_, ideas) = send(&app, "GET", "/notes?tag=idea", None).await;
    assert_eq!(ideas[0]["title"], "Two");

    let (_, folders) = send(&app, "GET", "/folders", None).await;
    assert_eq!(folders, json!(["Work"]));

    let (_, tags) = send(&app, "GET", "/tags", None).await;
    assert_eq!(tags, json!(["idea"]));
}

#[tokio::test]
async fn test_search() {
    let (app, _) = router();

    send(&app, "POST", "/notes", Some(json!({"title": "Rust notes", "content": "ownership"}))).await;
    send(&app, "POST", "/notes", Some(json!({"title": "Go notes", "content": "goroutines"}))).await;

    let (status, found) = send(&app, "GET", "/search?q=OWNER", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Rust notes");

    let (status, _) = send(&app, "GET", "/search?q=%28oops", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_handwritten_note_is_normalized() {
    let (app, _) = router();
    let legacy = r#"{"lines":[{"points":[]},{"points":[{"x":1,"y":1}]}],"width":10,"height":10}"#;

    let (status, created) = send(
        &app,
        "POST",
        "/notes",
        Some(json!({"title": "Doodle", "type": "handwritten", "content": "x", "drawingData": legacy})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["content"], "Handwritten Note");

    let pages: Vec<String> =
        serde_json::from_str(created["drawingData"].as_str().unwrap()).unwrap();
    assert_eq!(
        pages,
        vec![r#"{"lines":[{"points":[{"x":1,"y":1}]}],"width":10,"height":10}"#.to_string()]
    );

    let (_, listed) = send(&app, "GET", "/notes", None).await;
    assert!(listed[0].get("drawingData").is_none());
}

#[tokio::test]
async fn test_canvas_session_flow() {
    let (app, state) = router();

    let (status, view) = send(&app, "POST", "/canvas", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["pageCount"], 1);
    assert_eq!(view["noteId"], Value::Null);

    let sid = view["sessionId"].as_str().unwrap().to_string();
    let canvas = format!("/canvas/{sid}");

    let (_, drawn) = send(&app, "POST", &format!("{canvas}/strokes"), Some(stroke(5.0))).await;
    let first_page = drawn["page"].clone();

    let (status, view) = send(&app, "POST", &format!("{canvas}/pages"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["currentPage"], 1);
    assert_eq!(view["pageCount"], 2);

    send(&app, "POST", &format!("{canvas}/strokes"), Some(stroke(9.0))).await;

    let (_, view) = send(&app, "PUT", &format!("{canvas}/page"), Some(json!({"index": 0}))).await;
    assert_eq!(view["currentPage"], 0);
    assert_eq!(view["page"], first_page);

    let (status, saved) = send(
        &app,
        "POST",
        &format!("{canvas}/save"),
        Some(json!({"title": "Sketches", "tags": ["Art"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["type"], "handwritten");
    assert_eq!(saved["content"], "Handwritten Note");

    let note_id = saved["id"].as_str().unwrap().to_string();
    let (_, note) = send(&app, "GET", &format!("/notes/{note_id}"), None).await;
    let pages: Vec<String> = serde_json::from_str(note["drawingData"].as_str().unwrap()).unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages[1].contains("\"x\":9.0"));

    // Second save updates the same note.
    send(&app, "POST", &format!("{canvas}/undo"), None).await;
    let (_, resaved) = send(&app, "POST", &format!("{canvas}/save"), Some(json!({}))).await;
    assert_eq!(resaved["id"], saved["id"]);
    assert_eq!(resaved["title"], "Sketches");

    let (status, _) = send(&app, "DELETE", &canvas, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.sessions.count(), 0);

    let (status, _) = send(&app, "GET", &canvas, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_canvas_reopens_saved_note() {
    let (app, _) = router();

    let (_, view) = send(&app, "POST", "/canvas", Some(json!({}))).await;
    let sid = view["sessionId"].as_str().unwrap().to_string();
    send(&app, "POST", &format!("/canvas/{sid}/strokes"), Some(stroke(2.0))).await;
    let (_, saved) = send(&app, "POST", &format!("/canvas/{sid}/save"), Some(json!({}))).await;

    let (status, reopened) = send(
        &app,
        "POST",
        "/canvas",
        Some(json!({"noteId": saved["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reopened["noteId"], saved["id"]);
    assert!(reopened["page"].as_str().unwrap().contains("\"x\":2.0"));

    let (_, text) = send(&app, "POST", "/notes", Some(json!({"title": "plain"}))).await;
    let (status, _) = send(&app, "POST", "/canvas", Some(json!({"noteId": text["id"]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_canvas_page_errors() {
    let (app, _) = router();

    let (_, view) = send(&app, "POST", "/canvas", Some(json!({}))).await;
    let sid = view["sessionId"].as_str().unwrap().to_string();
    let canvas = format!("/canvas/{sid}");

    let (status, _) = send(&app, "DELETE", &format!("{canvas}/pages/current"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    for _ in 1..ink::MAX_PAGES {
        let (status, _) = send(&app, "POST", &format!("{canvas}/pages"), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&app, "POST", &format!("{canvas}/pages"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, view) = send(&app, "PUT", &format!("{canvas}/page"), Some(json!({"index": 99}))).await;
    assert_eq!(view["currentPage"], ink::MAX_PAGES - 1);

    let (status, _) = send(
        &app,
        "POST",
        &format!("{canvas}/strokes"),
        Some(json!({"points": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_as(&app, "bob", "GET", &canvas, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_canvas_save_after_note_deleted() {
    let (app, _) = router();

    let (_, view) = send(&app, "POST", "/canvas", Some(json!({}))).await;
    let canvas = format!("/canvas/{}", view["sessionId"].as_str().unwrap());
    send(&app, "POST", &format!("{canvas}/strokes"), Some(stroke(3.0))).await;

    let (_, first) = send(&app, "POST", &format!("{canvas}/save"), Some(json!({"title": "Kept"}))).await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let (status, _) = send(&app, "DELETE", &format!("/notes/{first_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, second) = send(&app, "POST", &format!("{canvas}/save"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(second["id"], first["id"]);
    assert_eq!(second["title"], "Kept");

    let (_, note) = send(&app, "GET", &format!("/notes/{}", second["id"].as_str().unwrap()), None).await;
    let pages: Vec<String> = serde_json::from_str(note["drawingData"].as_str().unwrap()).unwrap();
    assert!(pages[0].contains("\"x\":3.0"));

    let (_, view) = send(&app, "GET", &canvas, None).await;
    assert_eq!(view["noteId"], second["id"]);
}

#[tokio::test]
async fn test_overlapping_saves_write_once() {
    let (app, state) = router();

    let (_, view) = send(&app, "POST", "/canvas", Some(json!({}))).await;
    let id: Uuid = view["sessionId"].as_str().unwrap().parse().unwrap();
    let save = format!("/canvas/{id}/save");
    send(&app, "POST", &format!("/canvas/{id}/strokes"), Some(stroke(1.0))).await;

    // Holding the draft parks the first save after it claimed the session.
    let session = state.sessions.get("alice", id).unwrap();
    let draft = session.draft.lock().await;

    let first = tokio::spawn({
        let app = app.clone();
        let save = save.clone();
        async move { send(&app, "POST", &save, Some(json!({"title": "Once"}))).await }
    });
    while !session.is_saving() {
        tokio::task::yield_now().await;
    }

    let (status, body) = send(&app, "POST", &save, Some(json!({"title": "Twice"}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, Value::Null);

    drop(draft);
    let (status, saved) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["title"], "Once");
    assert!(!session.is_saving());

    let notes = state.store.list_notes("alice").await.unwrap();
    assert_eq!(notes.len(), 1);
}

#[tokio::test]
async fn test_canvas_reports_dropped_pages() {
    let (app, state) = router();

    let (_, created) = send(&app, "POST", "/notes", Some(json!({"title": "Long", "type": "handwritten"}))).await;
    let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let mut note = state.store.get_note("alice", id).await.unwrap().unwrap();
    let pages = vec![r#"{"lines":[],"width":800,"height":600}"#; ink::MAX_PAGES + 5];
    note.drawing_data = Some(serde_json::to_string(&pages).unwrap());
    state.store.put_note("alice", &note).await.unwrap();

    let (status, view) = send(&app, "POST", "/canvas", Some(json!({"noteId": id}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["pageCount"], ink::MAX_PAGES);
    assert_eq!(view["droppedPages"], 5);

    let (_, fresh) = send(&app, "POST", "/canvas", Some(json!({}))).await;
    assert_eq!(fresh["droppedPages"], 0);
}
