use crate::error::ApiError;
use leadline_store::{Store, StoreError};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(store: Store, api_key: impl Into<Arc<str>>) -> Self {
        Self::shared(Arc::new(Mutex::new(store)), api_key)
    }

    /// Wraps a store the caller keeps a handle to.
    pub fn shared(store: Arc<Mutex<Store>>, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Runs `op` against the store on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| ApiError::Internal("store mutex poisoned".to_string()))?;
            op(&guard).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
