//! # Note list cache
//!
//! Read-through cache of each user's note summaries, newest first.
//!
//! Invalidation is refresh-after-write: every create, replace or delete for a
//! user drops that user's entry, and the next list call repopulates it.
//!
//! A list read from the store while an invalidation happened may predate the
//! write, so it is served once but never cached. Each invalidation bumps a
//! generation; a miss only inserts when the generation it started from is
//! still current.
use std::sync::{Arc, Mutex, PoisonError};

use moka::sync::Cache;
use tracing::debug;

use crate::{database::Store, error::AppError, models::NoteSummary};

pub type NoteList = Arc<Vec<NoteSummary>>;

pub struct NoteListCache {
    lists: Cache<String, NoteList>,
    generation: Mutex<u64>,
}

impl NoteListCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            lists: Cache::new(capacity),
            generation: Mutex::new(0),
        }
    }

    pub async fn read_through(&self, store: &Store, user: &str) -> Result<NoteList, AppError> {
        if let Some(list) = self.lists.get(user) {
            return Ok(list);
        }

        debug!("Note list cache miss for {user}");
        let generation = self.generation();

        let mut summaries: Vec<NoteSummary> = store
            .list_notes(user)
            .await?
            .iter()
            .map(|note| note.summary())
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let list = Arc::new(summaries);
        self.insert_if_current(user, list.clone(), generation);

        Ok(list)
    }

    pub fn invalidate(&self, user: &str) {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.lists.invalidate(user);
    }

    fn generation(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_if_current(&self, user: &str, list: NoteList, seen: u64) {
        let generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);

        if *generation == seen {
            self.lists.insert(user.to_string(), list);
        } else {
            debug!("Note list of {user} raced a write, not caching it");
        }
    }
}

#[cfg(test)]
mod tests {
    use ink::CanvasSize;

    use super::*;
    use crate::models::NoteInput;

    #[tokio::test]
    async fn test_refresh_after_write() {
        let store = Store::memory();
        let cache = NoteListCache::new(16);

        assert!(cache.read_through(&store, "alice").await.unwrap().is_empty());

        store
            .save_note("alice", None, NoteInput::default(), CanvasSize::default())
            .await
            .unwrap();
        assert!(cache.read_through(&store, "alice").await.unwrap().is_empty());

        cache.invalidate("alice");
        assert_eq!(cache.read_through(&store, "alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_read_during_write_is_not_cached() {
        let store = Store::memory();
        let cache = NoteListCache::new(16);

        // A miss starts, then a write lands before its result is inserted.
        let seen = cache.generation();
        let stale = Arc::new(Vec::new());
        store
            .save_note("alice", None, NoteInput::default(), CanvasSize::default())
            .await
            .unwrap();
        cache.invalidate("alice");
        cache.insert_if_current("alice", stale, seen);

        assert_eq!(cache.read_through(&store, "alice").await.unwrap().len(), 1);
    }
}
