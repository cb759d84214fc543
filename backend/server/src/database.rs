//! # Redis
//!
//! Document store for notes.
//!
//! ## Layout
//!
//! - `notes:{user}`: hash, note id to JSON note document
//! - `note-users`: set of every user that ever stored a note, walked by the migration tool
//!
//! ## Notes
//!
//! - One hash per user keeps listing a user's notes to a single `HGETALL`
//! - Writes go through a `MULTI` pipeline so the user set never misses an owner
//! - `STORE=memory` swaps in a process-local map with the same semantics, handy for
//!   development and the API tests
use std::{collections::HashMap, sync::Arc, time::Duration};

use ink::CanvasSize;
use redis::{
    AsyncCommands, Client, RedisResult,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Note, NoteInput},
};

pub const USERS_KEY: &str = "note-users";

pub fn notes_key(user: &str) -> String {
    format!("notes:{user}")
}

pub async fn init_redis(redis_url: &str) -> RedisResult<ConnectionManager> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    client.get_connection_manager_with_config(config).await
}

type MemoryNotes = Arc<RwLock<HashMap<String, HashMap<Uuid, Note>>>>;

#[derive(Clone)]
pub enum Store {
    Redis(ConnectionManager),
    Memory(MemoryNotes),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryNotes::default())
    }

    pub async fn get_note(&self, user: &str, id: Uuid) -> Result<Option<Note>, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let raw: Option<String> = connection
                    .hget(notes_key(user), id.to_string())
                    .await?;

                Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
            }
            Store::Memory(notes) => Ok(notes
                .read()
                .await
                .get(user)
                .and_then(|notes| notes.get(&id))
                .cloned()),
        }
    }

    /// Unreadable documents are skipped with a warning instead of failing the whole list.
    pub async fn list_notes(&self, user: &str) -> Result<Vec<Note>, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let raw: HashMap<String, String> = connection.hgetall(notes_key(user)).await?;

                Ok(raw
                    .into_iter()
                    .filter_map(|(id, raw)| {
                        serde_json::from_str(&raw)
                            .map_err(|e| warn!("Skipping unreadable note {id} of {user}: {e}"))
                            .ok()
                    })
                    .collect())
            }
            Store::Memory(notes) => Ok(notes
                .read()
                .await
                .get(user)
                .map(|notes| notes.values().cloned().collect())
                .unwrap_or_default()),
        }
    }

    /// Creates a note when `id` is `None`, otherwise replaces an existing one.
    pub async fn save_note(
        &self,
        user: &str,
        id: Option<Uuid>,
        input: NoteInput,
        canvas: CanvasSize,
    ) -> Result<Note, AppError> {
        let note = match id {
            None => Note::create(input, canvas)?,
            Some(id) => {
                let mut note = self.get_note(user, id).await?.ok_or(AppError::NoteNotFound)?;
                note.apply(input, canvas)?;
                note
            }
        };

        self.put_note(user, &note).await?;
        Ok(note)
    }

    pub async fn put_note(&self, user: &str, note: &Note) -> Result<(), AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let document = serde_json::to_string(note)?;

                let _: () = redis::pipe()
                    .atomic()
                    .hset(notes_key(user), note.id.to_string(), document)
                    .ignore()
                    .sadd(USERS_KEY, user)
                    .ignore()
                    .query_async(&mut connection)
                    .await?;
            }
            Store::Memory(notes) => {
                notes
                    .write()
                    .await
                    .entry(user.to_string())
                    .or_default()
                    .insert(note.id, note.clone());
            }
        }

        Ok(())
    }

    /// Returns whether a note was removed.
    pub async fn delete_note(&self, user: &str, id: Uuid) -> Result<bool, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let removed: i64 = connection.hdel(notes_key(user), id.to_string()).await?;

                Ok(removed > 0)
            }
            Store::Memory(notes) => Ok(notes
                .write()
                .await
                .get_mut(user)
                .is_some_and(|notes| notes.remove(&id).is_some())),
        }
    }

    pub async fn users(&self) -> Result<Vec<String>, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let users: Vec<String> = connection.smembers(USERS_KEY).await?;

                Ok(users)
            }
            Store::Memory(notes) => Ok(notes.read().await.keys().cloned().collect()),
        }
    }
}
