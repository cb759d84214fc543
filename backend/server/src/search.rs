//! # Search
//!
//! Case-insensitive regular expression over titles and contents of the caller's notes.
//!
//! Handwritten notes only expose their placeholder content, so drawings are never
//! parsed here. Patterns are length capped and compiled with a size limit to keep
//! hostile input cheap.
use std::{collections::BTreeSet, sync::Arc};

use axum::{
    Json,
    extract::{Query, State},
};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::{auth::AuthUser, error::AppError, models::NoteSummary, state::AppState};

pub const MAX_PATTERN_LEN: usize = 256;
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn compile(pattern: &str) -> Result<Regex, AppError> {
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(AppError::MalformedPayload("search pattern too long"));
    }

    Ok(RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()?)
}

pub fn search<'a>(
    notes: &'a [NoteSummary],
    pattern: &Regex,
) -> impl Iterator<Item = &'a NoteSummary> {
    notes
        .iter()
        .filter(move |note| pattern.is_match(&note.title) || pattern.is_match(&note.content))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<NoteSummary>>, AppError> {
    let pattern = compile(&query.q)?;
    let notes = state.notes(&user).await?;

    Ok(Json(search(&notes, &pattern).cloned().collect()))
}

pub async fn folders_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    let notes = state.notes(&user).await?;
    let folders: BTreeSet<&String> = notes.iter().filter_map(|note| note.folder.as_ref()).collect();

    Ok(Json(folders.into_iter().cloned().collect()))
}

pub async fn tags_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    let notes = state.notes(&user).await?;
    let tags: BTreeSet<&String> = notes.iter().flat_map(|note| &note.tags).collect();

    Ok(Json(tags.into_iter().cloned().collect()))
}
