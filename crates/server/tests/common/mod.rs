//! Common test utilities for in-process HTTP testing.
//!
//! [`TestFixture`] builds the full router over a temporary SQLite database
//! and behaves like a browser with a cookie jar holding the session cookie.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_core::{
    AuthConfig, Config, DatabaseConfig, EquipmentStore, HelpdeskService, ServerConfig,
    SessionAuthenticator, SessionStore, SqliteEquipmentStore, SqliteSessionStore,
    SqliteTicketStore, SqliteUserStore, TicketStore, UserSeed, UserStore,
};

pub const DEMO_USER: &str = "EMP45678";

/// Test fixture running the router in-process.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Direct store access for arranging state the HTTP surface can't reach
    pub tickets: Arc<SqliteTicketStore>,
    pub equipment: Arc<SqliteEquipmentStore>,
    pub sessions: Arc<SqliteSessionStore>,
    /// Value of the session cookie, as a browser would keep it
    cookie: Mutex<Option<String>>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: Value,
    /// Raw body, for non-JSON responses.
    pub text: String,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let mut profile = Map::new();
        profile.insert("name".to_string(), Value::String("Ada Lovelace".to_string()));
        profile.insert("department".to_string(), Value::String("IT".to_string()));

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            auth: AuthConfig::default(),
            users: vec![UserSeed {
                id: DEMO_USER.to_string(),
                profile,
            }],
        };

        let users = Arc::new(SqliteUserStore::new(&db_path).expect("Failed to create user store"));
        let tickets =
            Arc::new(SqliteTicketStore::new(&db_path).expect("Failed to create ticket store"));
        let equipment = Arc::new(
            SqliteEquipmentStore::new(&db_path).expect("Failed to create equipment store"),
        );
        let sessions = Arc::new(
            SqliteSessionStore::new(&db_path, Duration::minutes(30))
                .expect("Failed to create session store"),
        );

        let service = HelpdeskService::new(
            users as Arc<dyn UserStore>,
            Arc::clone(&tickets) as Arc<dyn TicketStore>,
            Arc::clone(&equipment) as Arc<dyn EquipmentStore>,
        );
        service
            .seed_users(&config.users)
            .expect("Failed to seed users");

        let session_store = Arc::clone(&sessions) as Arc<dyn SessionStore>;
        let state = Arc::new(helpdesk_server::state::AppState::new(
            config,
            Arc::new(SessionAuthenticator::new(Arc::clone(&session_store))),
            session_store,
            service,
        ));

        Self {
            router: helpdesk_server::api::create_router(state),
            tickets,
            equipment,
            sessions,
            cookie: Mutex::new(None),
            temp_dir,
        }
    }

    /// Sign in through the entry route.
    pub async fn login(&self) -> TestResponse {
        self.get("/").await
    }

    pub fn cookie(&self) -> Option<String> {
        self.cookie.lock().unwrap().clone()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a POST request with a urlencoded form body.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.request("POST", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, form: Option<String>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(token) = self.cookie() {
            request_builder =
                request_builder.header(header::COOKIE, format!("helpdesk_session={}", token));
        }

        let body = match form {
            Some(form) => {
                request_builder = request_builder
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());

        if let Some(set_cookie) = &set_cookie {
            let value = set_cookie
                .split(';')
                .next()
                .and_then(|pair| pair.strip_prefix("helpdesk_session="))
                .unwrap_or_default();
            *self.cookie.lock().unwrap() = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }

        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            location,
            set_cookie,
            body,
            text,
        }
    }
}

fn form_encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            other => format!("%{:02X}", other),
        })
        .collect()
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a response is a redirect to `$location`.
#[macro_export]
macro_rules! assert_redirect {
    ($response:expr, $location:expr) => {
        assert_eq!($response.status, axum::http::StatusCode::FOUND);
        assert_eq!($response.location.as_deref(), Some($location));
    };
}
