use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ink::{Notebook, Sketch, Stroke};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{NoteInput, NoteKind},
    sessions::{CanvasSession, Draft},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCanvas {
    pub note_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PageTarget {
    pub index: usize,
}

/// Optional metadata sent with a save; missing fields keep their previous values.
#[derive(Debug, Default, Deserialize)]
pub struct SaveCanvas {
    pub title: Option<String>,
    pub folder: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasView {
    pub session_id: Uuid,
    pub note_id: Option<Uuid>,
    pub current_page: usize,
    pub page_count: usize,
    /// Pages past the limit that were cut when the note was opened.
    pub dropped_pages: usize,
    pub page: String,
}

impl CanvasView {
    fn of(session: &CanvasSession, draft: &Draft) -> Self {
        Self {
            session_id: session.id,
            note_id: draft.note_id,
            current_page: draft.notebook.current_page(),
            page_count: draft.notebook.page_count(),
            dropped_pages: draft.notebook.dropped_pages(),
            page: draft.notebook.live_page(),
        }
    }
}

pub async fn open_canvas_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(open): Json<OpenCanvas>,
) -> Result<impl IntoResponse, AppError> {
    let size = state.config.canvas;

    let draft = match open.note_id {
        None => Draft {
            notebook: Notebook::open(None, Sketch::new(size), size),
            note_id: None,
            title: String::new(),
            folder: None,
            tags: Vec::new(),
        },
        Some(id) => {
            let note = state
                .store
                .get_note(&user, id)
                .await?
                .ok_or(AppError::NoteNotFound)?;

            if note.kind != NoteKind::Handwritten {
                return Err(AppError::MalformedPayload("note is not handwritten"));
            }

            Draft {
                notebook: Notebook::open(note.drawing_data.as_deref(), Sketch::new(size), size),
                note_id: Some(note.id),
                title: note.title,
                folder: note.folder,
                tags: note.tags,
            }
        }
    };

    let session = state.sessions.open(user, draft);
    let draft = session.draft.lock().await;

    Ok((StatusCode::CREATED, Json(CanvasView::of(&session, &draft))))
}

pub async fn view_canvas_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CanvasView>, AppError> {
    let session = state.sessions.get(&user, id)?;
    let draft = session.draft.lock().await;

    Ok(Json(CanvasView::of(&session, &draft)))
}

pub async fn close_canvas_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(&user, id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn stroke_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(stroke): Json<Stroke>,
) -> Result<Json<CanvasView>, AppError> {
    if stroke.points.is_empty() {
        return Err(AppError::MalformedPayload("stroke has no points"));
    }

    let session = state.sessions.get(&user, id)?;
    let mut draft = session.draft.lock().await;
    draft.notebook.commit_stroke(stroke);

    Ok(Json(CanvasView::of(&session, &draft)))
}

pub async fn undo_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CanvasView>, AppError> {
    let session = state.sessions.get(&user, id)?;
    let mut draft = session.draft.lock().await;

    if !draft.notebook.undo() {
        debug!("Nothing to undo in session {id}");
    }

    Ok(Json(CanvasView::of(&session, &draft)))
}

pub async fn add_page_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CanvasView>, AppError> {
    let session = state.sessions.get(&user, id)?;
    let mut draft = session.draft.lock().await;
    draft.notebook.add_page()?;

    Ok(Json(CanvasView::of(&session, &draft)))
}

pub async fn delete_page_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CanvasView>, AppError> {
    let session = state.sessions.get(&user, id)?;
    let mut draft = session.draft.lock().await;
    draft.notebook.delete_page()?;

    Ok(Json(CanvasView::of(&session, &draft)))
}

pub async fn go_to_page_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(target): Json<PageTarget>,
) -> Result<Json<CanvasView>, AppError> {
    let session = state.sessions.get(&user, id)?;
    let mut draft = session.draft.lock().await;
    draft.notebook.go_to_page(target.index);

    Ok(Json(CanvasView::of(&session, &draft)))
}

/// Duplicate saves of one session answer `202 Accepted` and do nothing. A failed
/// save leaves the draft untouched so the client can retry. When the note was
/// deleted since the session opened, the drawing is saved as a new note.
pub async fn save_canvas_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(meta): Json<SaveCanvas>,
) -> Result<Response, AppError> {
    let session = state.sessions.get(&user, id)?;

    let Some(_saving) = session.try_begin_save() else {
        debug!("Save already in flight for session {id}, ignoring");
        return Ok(StatusCode::ACCEPTED.into_response());
    };

    let mut draft = session.draft.lock().await;
    let drawing_data = draft.notebook.save();

    let input = NoteInput {
        title: meta.title.unwrap_or_else(|| draft.title.clone()),
        content: String::new(),
        kind: NoteKind::Handwritten,
        folder: meta.folder.or_else(|| draft.folder.clone()),
        tags: meta.tags.unwrap_or_else(|| draft.tags.clone()),
        drawing_data: Some(drawing_data),
    };

    let note = match state.save_note(&user, draft.note_id, input.clone()).await {
        Err(AppError::NoteNotFound) if draft.note_id.is_some() => {
            warn!("Note of session {id} is gone, saving as a new note");
            state.save_note(&user, None, input).await?
        }
        result => result?,
    };
    info!(
        "Saved {} pages of note {} from session {id}",
        draft.notebook.page_count(),
        note.id
    );

    draft.note_id = Some(note.id);
    draft.title = note.title.clone();
    draft.folder = note.folder.clone();
    draft.tags = note.tags.clone();

    Ok(Json(note.summary()).into_response())
}
