//! Persistent key/value preferences
//!
//! Values are postcard encoded. The fjall backed store survives restarts;
//! the in-memory store is for tests and ephemeral runs.

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::{Arc, Mutex};

use fjall::Keyspace;
use serde::{Serialize, de::DeserializeOwned};
use tokio::task;

use crate::{Result, WanderlustError};

/// Storage seam for user preferences
pub trait PreferenceStore: Send + Sync {
    /// Value stored under `key`, `None` when absent
    fn get<T: DeserializeOwned + Send + 'static>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<T>>> + Send;

    /// Store `value` under `key`, replacing any previous value
    fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Preferences kept in a fjall keyspace on disk
#[derive(Clone)]
pub struct FjallPreferenceStore {
    store: Keyspace,
}

impl FjallPreferenceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("preferences", fjall::KeyspaceCreateOptions::default)?;
        Ok(Self { store: items })
    }
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

fn join_error(err: task::JoinError) -> WanderlustError {
    WanderlustError::storage(format!("storage task failed: {err}"))
}

impl PreferenceStore for FjallPreferenceStore {
    #[tracing::instrument(name = "query_preference", level = "debug", skip(self))]
    async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(join_error)??;

        match maybe_bytes {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes)?)),
            None => {
                tracing::debug!("Key not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(name = "put_preference", level = "debug", skip(self))]
    async fn put<T: Serialize + Send + Debug + 'static>(&self, key: &str, value: T) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let bytes = postcard::to_stdvec(&value)?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(join_error)??;
        Ok(())
    }
}

/// Preferences held in process memory
#[derive(Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| WanderlustError::storage("preference map poisoned"))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let bytes = self.lock()?.get(key).cloned();
        match bytes {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put<T: Serialize + Send + Debug + 'static>(&self, key: &str, value: T) -> Result<()> {
        let bytes = postcard::to_stdvec(&value)?;
        self.lock()?.insert(key.to_string(), bytes);
        Ok(())
    }
}
