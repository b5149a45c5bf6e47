//! Shared handler state and per-request connection scoping.

use crate::error::ApiError;
use leadroute_core::db::open_db;
use leadroute_core::RepoResult;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;

/// State shared by all handlers. Holds no connection, only how to open one.
#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    /// Runs `work` on a fresh connection in a blocking task.
    ///
    /// The connection lives exactly as long as `work`; it is dropped (and any
    /// uncommitted transaction rolled back) before the result is returned.
    pub async fn with_connection<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let conn = open_db(db_path.as_path())?;
            Ok(work(&conn)?)
        })
        .await?
    }
}
