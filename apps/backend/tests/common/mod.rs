#![allow(dead_code)]

// tests/common/mod.rs
use std::time::SystemTime;

use masjid_backend::auth::password::hash_password;
use masjid_backend::entities::users as user_entity;
use masjid_backend::{issue_token, AppState, Role, SecurityConfig, TokenSubject};
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes())
}

pub fn email_for(id: i64) -> String {
    format!("staff{id}@masjid.test")
}

/// A users row as the gate or the login service reads it.
pub fn user_row(id: i64, role: Role, is_active: bool) -> user_entity::Model {
    user_row_with_hash(id, role, is_active, "$argon2id$not-a-real-hash".to_string())
}

pub fn user_row_with_password(
    id: i64,
    role: Role,
    is_active: bool,
    password: &str,
) -> user_entity::Model {
    let hash = hash_password(password).expect("hash test password");
    user_row_with_hash(id, role, is_active, hash)
}

fn user_row_with_hash(
    id: i64,
    role: Role,
    is_active: bool,
    password_hash: String,
) -> user_entity::Model {
    let now = OffsetDateTime::now_utc();
    user_entity::Model {
        id,
        email: email_for(id),
        name: format!("Staff {id}"),
        password_hash,
        role,
        is_active,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn bearer_for(id: i64, role: Role) -> String {
    let token = issue_token(
        &TokenSubject {
            id,
            email: email_for(id),
            role,
        },
        SystemTime::now(),
        &security(),
    )
    .expect("issue test token");
    format!("Bearer {token}")
}

/// State over a mock connection; background jobs are dropped so they can't
/// consume mock results queued for the request.
pub fn state(db: DatabaseConnection) -> AppState {
    AppState::without_jobs(db, security())
}

/// Build the service under test: production routes behind the trace
/// middleware, against the given state.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(masjid_backend::StructuredLogger)
                .wrap(masjid_backend::TraceSpan)
                .wrap(masjid_backend::RequestTrace)
                .app_data(actix_web::web::Data::new($state))
                .configure(masjid_backend::routes::configure),
        )
        .await
    };
}
