use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use super::security_config::SecurityConfig;
use crate::services::jobs::JobDispatcher;

/// Application state shared by every request.
///
/// Built once at startup by [`crate::infra::state::build_state`] and handed to
/// actix as `web::Data<AppState>`; nothing in the crate reaches for a global
/// connection. The pool is shared with the job worker through the `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Sink for fire-and-forget work (activity log, view counters)
    pub jobs: JobDispatcher,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, security: SecurityConfig, jobs: JobDispatcher) -> Self {
        Self { db, security, jobs }
    }

    /// State whose background jobs are dropped (logged at debug level).
    ///
    /// Used by tests running against a mock connection, where a job would
    /// consume query results meant for the request under test.
    pub fn without_jobs(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self::new(Arc::new(db), security, JobDispatcher::disabled())
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the pool. Call after the job worker has drained and released
    /// its handle.
    pub async fn shutdown(self) {
        match Arc::try_unwrap(self.db) {
            Ok(db) => {
                if let Err(e) = db.close().await {
                    warn!(error = %e, "failed to close database connection");
                }
            }
            Err(_) => warn!("database connection still shared at shutdown; left to drop"),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("security", &self.security)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}
