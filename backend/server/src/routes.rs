use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::{Note, NoteInput, NoteSummary},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub folder: Option<String>,
    pub tag: Option<String>,
}

pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<NoteSummary>>, AppError> {
    let notes = state.notes(&user).await?;

    Ok(Json(
        notes
            .iter()
            .filter(|note| note.matches(filter.folder.as_deref(), filter.tag.as_deref()))
            .cloned()
            .collect(),
    ))
}

pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(input): Json<NoteInput>,
) -> Result<impl IntoResponse, AppError> {
    let note = state.save_note(&user, None, input).await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, AppError> {
    state
        .store
        .get_note(&user, id)
        .await?
        .map(Json)
        .ok_or(AppError::NoteNotFound)
}

pub async fn update_note_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<NoteInput>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(state.save_note(&user, Some(id), input).await?))
}

pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.delete_note(&user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
