// tests/common/mod.rs

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use formgrade::{
    config::Config,
    generator::QuizGenerator,
    models::principal::Principal,
    routes,
    state::AppState,
    store::{MemoryStore, Store},
    utils::{
        identity::{IdentityError, IdentityProvider},
        jwt::{JwtIdentityProvider, sign_jwt},
    },
};

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";

pub fn test_config() -> Config {
    Config {
        database_url: "memory".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        request_timeout_secs: 10,
        db_acquire_timeout_secs: 1,
        auth_timeout_secs: 1,
        generator: None,
    }
}

/// Spawns the app on a random port backed by a fresh in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app(generator: Option<Arc<dyn QuizGenerator>>) -> String {
    spawn_app_with(
        Arc::new(MemoryStore::new()),
        Arc::new(JwtIdentityProvider::new(TEST_SECRET)),
        generator,
    )
    .await
}

/// Same as `spawn_app`, with every collaborator supplied by the caller.
pub async fn spawn_app_with(
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityProvider>,
    generator: Option<Arc<dyn QuizGenerator>>,
) -> String {
    let state = AppState {
        store,
        identity,
        generator,
        config: test_config(),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Signed bearer token for a fresh user with the given email.
pub fn token_for(email: &str) -> String {
    let principal = Principal {
        principal_id: format!("uid-{email}"),
        email: email.to_string(),
        display_name: Some(email.split('@').next().unwrap_or(email).to_string()),
    };
    sign_jwt(&principal, TEST_SECRET, 600).expect("Failed to sign token")
}

/// Random email so tests never share identities.
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

pub fn quiz1_body(name: &str, show_answers: bool, protected: bool) -> serde_json::Value {
    serde_json::json!({
        "form_name": name,
        "protected": protected,
        "show_answers": show_answers,
        "questions": [
            {"question": "First letter?", "options": ["A", "B"], "correct_answer": "A", "marks": 1},
            {"question": "Last letter?", "options": ["C", "D"], "correct_answer": "D", "marks": 2}
        ]
    })
}

/// Identity provider that never answers within the auth timeout.
pub struct StalledIdentity;

#[async_trait]
impl IdentityProvider for StalledIdentity {
    async fn verify(&self, _token: &str) -> Result<Principal, IdentityError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(IdentityError::Unavailable("stalled".to_string()))
    }
}

/// Identity provider that is unreachable.
pub struct OfflineIdentity;

#[async_trait]
impl IdentityProvider for OfflineIdentity {
    async fn verify(&self, _token: &str) -> Result<Principal, IdentityError> {
        Err(IdentityError::Unavailable("connection refused".to_string()))
    }
}
