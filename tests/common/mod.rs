#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use email_engine::api::AppState;
use email_engine::config::Config;
use email_engine::db::{Gender, NewUser};
use email_engine::services::{MailError, MailTransport, OutgoingMail};
use email_engine::state::SharedState;
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Keeps every message it is handed. Recipients listed in `reject` fail
/// with a transport error instead.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub reject: Vec<String>,
}

impl RecordingMailer {
    pub fn rejecting(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::default(),
            reject: addresses.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        mail.validate()?;
        if self.reject.contains(&mail.to) {
            return Err(MailError::Transport("Connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }

    async fn verify(&self) -> Result<bool, MailError> {
        Ok(true)
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub token: String,
}

/// In-memory database on a single pooled connection, so every query in a
/// test sees the same data and nothing is left on disk.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.seed.demo_users = false;
    config.mail.from_address = "noreply@emailengine.com".to_string();
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_mailer(RecordingMailer::default()).await
}

pub async fn spawn_app_with_mailer(mailer: RecordingMailer) -> TestApp {
    let config = test_config();
    let mailer = Arc::new(mailer);

    let shared = SharedState::with_mailer(config, mailer.clone())
        .await
        .expect("failed to create shared state");
    shared
        .store
        .seed(&shared.config.seed, &shared.config.security)
        .await
        .expect("failed to seed admin");

    let state = email_engine::api::create_app_state(Arc::new(shared), None);
    let router = email_engine::api::router(state.clone());

    let mut app = TestApp {
        state,
        router,
        mailer,
        token: String::new(),
    };
    app.token = app.login("admin", "admin123").await;
    app
}

impl TestApp {
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token missing").to_string()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// Authenticated request as the seeded admin.
    pub async fn authed(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        self.send(method, uri, Some(&self.token), body).await
    }

    /// Inserts users and returns their ids in insertion order.
    pub async fn add_users(&self, users: Vec<NewUser>) -> Vec<i32> {
        let store = self.state.store();
        let before = store.list_users().await.unwrap().len();
        store.insert_users(users).await.unwrap();
        store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .skip(before)
            .map(|u| u.user_id)
            .collect()
    }

    pub async fn create_template(&self, name: &str, body: &str) -> i32 {
        let (status, json) = self
            .authed(
                "POST",
                "/api/templates",
                Some(serde_json::json!({ "template_name": name, "template_body": body })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {json}");
        i32::try_from(json["template_id"].as_i64().unwrap()).unwrap()
    }
}

pub fn user(name: &str, email: &str) -> NewUser {
    NewUser::new(name, email)
}

pub fn user_with(
    name: &str,
    email: &str,
    city: Option<&str>,
    state: Option<&str>,
    gender: Option<Gender>,
) -> NewUser {
    NewUser {
        city: city.map(ToString::to_string),
        state: state.map(ToString::to_string),
        gender,
        ..NewUser::new(name, email)
    }
}
