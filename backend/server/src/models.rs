use chrono::{DateTime, Utc};
use ink::{CanvasSize, persistence};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    utils::{clean_folder, clean_tags, clean_title},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Text,
    Handwritten,
}

/// Stored note document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: NoteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create/replace requests.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: NoteKind,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub drawing_data: Option<String>,
}

/// List/search view of a note, without drawing data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn create(input: NoteInput, canvas: CanvasSize) -> Result<Self, AppError> {
        let now = Utc::now();
        let mut note = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            content: String::new(),
            kind: NoteKind::Text,
            folder: None,
            tags: Vec::new(),
            drawing_data: None,
            created_at: now,
            updated_at: now,
        };

        note.apply(input, canvas)?;
        Ok(note)
    }

    /// Replaces every editable field. Handwritten notes get their drawing data
    /// normalized into the paged format and the placeholder content.
    pub fn apply(&mut self, input: NoteInput, canvas: CanvasSize) -> Result<(), AppError> {
        self.title = clean_title(&input.title)?;
        self.folder = clean_folder(input.folder.as_deref());
        self.tags = clean_tags(&input.tags)?;
        self.kind = input.kind;

        match input.kind {
            NoteKind::Handwritten => {
                self.content = persistence::HANDWRITTEN_CONTENT.to_string();
                self.drawing_data = Some(persistence::normalize(
                    input.drawing_data.as_deref(),
                    canvas,
                ));
            }
            NoteKind::Text => {
                self.content = input.content;
                self.drawing_data = None;
            }
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            kind: self.kind,
            folder: self.folder.clone(),
            tags: self.tags.clone(),
            updated_at: self.updated_at,
        }
    }
}

impl NoteSummary {
    pub fn matches(&self, folder: Option<&str>, tag: Option<&str>) -> bool {
        folder.is_none_or(|folder| self.folder.as_deref() == Some(folder))
            && tag.is_none_or(|tag| self.tags.iter().any(|t| t == &tag.to_lowercase()))
    }
}
