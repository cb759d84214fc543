use std::{sync::Arc, time::Duration};

use uuid::Uuid;

use super::{
    cache::{NoteList, NoteListCache},
    config::{Config, StoreKind},
    database::{Store, init_redis},
    error::AppError,
    models::{Note, NoteInput},
    sessions::Sessions,
};

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub cache: NoteListCache,
    pub sessions: Sessions,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load();

        let store = match config.store {
            StoreKind::Redis => Store::Redis(init_redis(&config.redis_url).await?),
            StoreKind::Memory => Store::memory(),
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self {
            cache: NoteListCache::new(config.list_cache_capacity),
            sessions: Sessions::new(
                config.session_capacity,
                Duration::from_secs(config.session_idle_secs),
            ),
            config,
            store,
        })
    }

    pub async fn notes(&self, user: &str) -> Result<NoteList, AppError> {
        self.cache.read_through(&self.store, user).await
    }

    pub async fn save_note(
        &self,
        user: &str,
        id: Option<Uuid>,
        input: NoteInput,
    ) -> Result<Note, AppError> {
        let note = self
            .store
            .save_note(user, id, input, self.config.canvas)
            .await?;
        self.cache.invalidate(user);

        Ok(note)
    }

    pub async fn delete_note(&self, user: &str, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_note(user, id).await? {
            return Err(AppError::NoteNotFound);
        }
        self.cache.invalidate(user);

        Ok(())
    }
}
