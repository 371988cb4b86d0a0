#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::{TestRequest, TestServer};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use serde::Deserialize;
use serde_json::json;
use tutorly_api::{ApiState, build_router, middleware::auth};
use tutorly_core::{
    models::identity::{LoginResponse, NewUser, Role},
    store::{MemoryStore, Store},
};
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse battery";

/// `{"success": true, "data": ...}` as returned by mutations.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// A logged-in account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl Account {
    pub fn bearer(&self) -> (HeaderName, HeaderValue) {
        bearer(&self.token)
    }
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub trait Authorized {
    fn as_user(self, account: &Account) -> Self;
}

impl Authorized for TestRequest {
    fn as_user(self, account: &Account) -> Self {
        let (name, value) = account.bearer();
        self.add_header(name, value)
    }
}

/// Router backed by an in-memory store.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            server: server_with(store.clone()),
            store,
        }
    }

    pub async fn sign_up(&self, role: Role) -> Account {
        self.sign_up_in(role, None).await
    }

    pub async fn sign_up_in(&self, role: Role, organization_id: Option<Uuid>) -> Account {
        let email: String = SafeEmail().fake();
        let email = format!("{}.{}", Uuid::new_v4().simple(), email);
        let name: String = Name().fake();

        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "name": name,
                "password": PASSWORD,
                "role": role,
                "organization_id": organization_id,
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        self.login(&email).await
    }

    /// Admins cannot self-register, so they are seeded through the store.
    pub async fn admin(&self) -> Account {
        let email = format!("admin.{}@example.com", Uuid::new_v4().simple());
        self.store
            .create_user(NewUser {
                email: email.clone(),
                name: "Site Admin".to_string(),
                password_hash: auth::hash_password(PASSWORD).unwrap(),
                role: Role::Admin,
                organization_id: None,
            })
            .await
            .unwrap();
        self.login(&email).await
    }

    pub async fn login(&self, email: &str) -> Account {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .await;
        let login: Envelope<LoginResponse> = response.json();
        Account {
            id: login.data.identity.id,
            email: email.to_string(),
            token: login.data.token,
        }
    }
}

/// A router over any store, e.g. a mock.
pub fn server_with(store: Arc<dyn Store>) -> TestServer {
    let state = Arc::new(ApiState::new(store, 168));
    TestServer::new(build_router(state)).unwrap()
}
