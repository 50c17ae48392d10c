use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::db::DbProfile;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::jobs::{spawn_worker, JobDispatcher, JobWorker};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    db_profile: Option<DbProfile>,
    connection: Option<DatabaseConnection>,
    background_jobs: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            db_profile: None,
            connection: None,
            background_jobs: false,
        }
    }

    /// Connect (and migrate) for `profile` during `build`.
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Use an existing connection, e.g. a `MockDatabase` in tests.
    pub fn with_connection(mut self, db: DatabaseConnection) -> Self {
        self.connection = Some(db);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    /// Spawn the job worker; without it dispatched jobs are dropped.
    pub fn with_background_jobs(mut self) -> Self {
        self.background_jobs = true;
        self
    }

    /// The returned worker must be shut down after the server stops so
    /// queued jobs are flushed.
    pub async fn build(self) -> Result<(AppState, Option<JobWorker>), AppError> {
        let security = self
            .security_config
            .ok_or_else(|| AppError::config("security configuration is required"))?;

        let db = match (self.connection, self.db_profile) {
            (Some(conn), _) => conn,
            // single entrypoint: build + migrate
            (None, Some(profile)) => bootstrap_db(profile).await?,
            (None, None) => {
                return Err(AppError::config(
                    "a database profile or connection is required",
                ))
            }
        };

        let db = Arc::new(db);
        if self.background_jobs {
            let (jobs, worker) = spawn_worker(Arc::clone(&db));
            Ok((AppState::new(db, security, jobs), Some(worker)))
        } else {
            Ok((AppState::new(db, security, JobDispatcher::disabled()), None))
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn mock_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn security() -> SecurityConfig {
        SecurityConfig::new("state-test-secret-0123456789abcdef".as_bytes())
    }

    #[tokio::test]
    async fn missing_security_is_a_config_error() {
        let result = build_state().with_connection(mock_db()).build().await;
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[tokio::test]
    async fn missing_database_is_a_config_error() {
        let result = build_state().with_security(security()).build().await;
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[tokio::test]
    async fn builds_without_worker_by_default() {
        let (state, worker) = build_state()
            .with_connection(mock_db())
            .with_security(security())
            .build()
            .await
            .unwrap();
        assert!(worker.is_none());
        assert_eq!(state.security.jwt_secret, security().jwt_secret);
    }

    #[tokio::test]
    async fn background_jobs_spawn_a_worker() {
        let (state, worker) = build_state()
            .with_connection(mock_db())
            .with_security(security())
            .with_background_jobs()
            .build()
            .await
            .unwrap();
        let worker = worker.expect("worker requested");
        worker.shutdown().await;
        assert_eq!(Arc::strong_count(&state.db), 1);
    }
}
