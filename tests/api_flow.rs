//! End-to-end flows against a real Postgres.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`; every test
//! gets a fresh database with the migrations applied.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sportspotter::{
    app::build_app,
    auth::services::JwtKeys,
    config::{AppConfig, JwtConfig},
    state::AppState,
};
use sqlx::PgPool;
use tower::ServiceExt;

fn config() -> AppConfig {
    AppConfig {
        database_url: String::new(),
        db_max_connections: 5,
        host: "127.0.0.1".into(),
        port: 0,
        geojson_path: "./data.geojson".into(),
        cors_origins: vec!["http://localhost:5000".into()],
        jwt: JwtConfig {
            secret: "flow-secret".into(),
            issuer: "sportspotter".into(),
            audience: "sportspotter-users".into(),
            ttl_minutes: 30,
        },
    }
}

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new(pool: PgPool) -> Self {
        let state = AppState::from_parts(pool, Arc::new(config()));
        Self {
            router: build_app(state).expect("app builds"),
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Sign up `name` and return the bearer token.
    async fn signup(&self, name: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/signup",
                None,
                Some(json!({
                    "email": format!("{name}@example.com"),
                    "username": name,
                    "password": "hunter22",
                    "confirm_password": "hunter22"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn create_event(&self, token: &str, title: &str, date: &str, time: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/events",
                Some(token),
                Some(json!({
                    "title": title,
                    "location": "Aasee",
                    "date": date,
                    "time": time,
                    "tag": "volleyball"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

async fn event_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sports_events")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn signup_then_login(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("anna").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "anna@example.com", "password": "hunter22" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "anna");
    assert_eq!(body["user"]["is_active"], true);
    assert_eq!(body["token_type"], "bearer");
    assert!(body["user"].get("password_hash").is_none());
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn signup_rejects_taken_email_or_username(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("ben").await;

    for (email, username) in [("ben@example.com", "other"), ("other@example.com", "ben")] {
        let (status, body) = app
            .call(
                Method::POST,
                "/api/signup",
                None,
                Some(json!({
                    "email": email,
                    "username": username,
                    "password": "pw",
                    "confirm_password": "pw"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Email or username already registered");
    }
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn blank_username_is_rejected_and_padded_one_is_trimmed(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let body = |username: &str| {
        Some(json!({
            "email": "hal@example.com",
            "username": username,
            "password": "hunter22",
            "confirm_password": "hunter22"
        }))
    };

    let (status, err) = app
        .call(Method::POST, "/api/signup", None, body(" \t "))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["detail"], "Username must not be empty");
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 0);

    let (status, created) = app
        .call(Method::POST, "/api/signup", None, body("  hal  "))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["user"]["username"], "hal");

    let token = created["access_token"].as_str().unwrap();
    let event = app
        .create_event(token, "Morning swim", "2024-08-01", "06:30")
        .await;
    assert_eq!(event["time"], "06:30:00");
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn login_with_wrong_password_or_unknown_email(pool: PgPool) {
    let app = TestApp::new(pool);
    app.signup("carla").await;

    for (email, password) in [
        ("carla@example.com", "wrong"),
        ("nobody@example.com", "hunter22"),
    ] {
        let (status, body) = app
            .call(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Incorrect email or password");
    }
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn token_for_unknown_user_is_rejected(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = JwtKeys::from_config(&config().jwt)
        .sign_access("ghost")
        .unwrap();
    let (status, _) = app
        .call(
            Method::POST,
            "/api/events",
            Some(&token),
            Some(json!({
                "title": "x", "location": "y", "date": "2024-01-01",
                "time": "10:00:00", "tag": "z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn created_event_round_trips(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.signup("dora").await;
    let created = app
        .create_event(&token, "Evening run", "2024-05-20", "19:15:00")
        .await;

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = app
        .call(Method::GET, &format!("/api/events/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["title"], "Evening run");
    assert_eq!(fetched["location"], "Aasee");
    assert_eq!(fetched["date"], "2024-05-20");
    assert_eq!(fetched["time"], "19:15:00");
    assert_eq!(fetched["tag"], "volleyball");
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn unknown_event_is_not_found(pool: PgPool) {
    let app = TestApp::new(pool);
    let (status, body) = app.call(Method::GET, "/api/events/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Event not found");
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn partial_update_keeps_omitted_fields(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.signup("emil").await;
    let created = app
        .create_event(&token, "Beach volleyball", "2024-06-01", "18:30:00")
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .call(
            Method::PUT,
            &format!("/api/events/{id}"),
            Some(&token),
            Some(json!({ "tag": "beach" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["tag"], "beach");
    assert_eq!(updated["title"], "Beach volleyball");
    assert_eq!(updated["location"], "Aasee");
    assert_eq!(updated["date"], "2024-06-01");
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn listing_pages_most_recent_first(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.signup("finn").await;

    // Days 1..=15 with alternating times.
    for day in 1..=15 {
        let time = if day % 2 == 0 { "08:00:00" } else { "20:00:00" };
        app.create_event(&token, &format!("event {day}"), &format!("2024-03-{day:02}"), time)
            .await;
    }
    // Same day as the newest, earlier time.
    app.create_event(&token, "early bird", "2024-03-15", "06:00:00")
        .await;

    let (status, page) = app
        .call(Method::GET, "/api/events?skip=0&limit=10", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0]["title"], "event 15");
    assert_eq!(page[1]["title"], "early bird");
    assert_eq!(page[2]["title"], "event 14");

    let keys: Vec<(String, String)> = page
        .iter()
        .map(|e| {
            (
                e["date"].as_str().unwrap().to_string(),
                e["time"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(keys, sorted);

    let (_, rest) = app.call(Method::GET, "/api/events?skip=10", None, None).await;
    assert_eq!(rest.as_array().unwrap().len(), 6);
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn deleting_unknown_event_changes_nothing(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    let token = app.signup("greta").await;
    app.create_event(&token, "Yoga", "2024-04-04", "09:00:00")
        .await;
    let before = event_count(&pool).await;

    let (status, _) = app
        .call(Method::DELETE, "/api/events/424242", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(event_count(&pool).await, before);
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn creator_can_delete_own_event(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.signup("hugo").await;
    let created = app
        .create_event(&token, "Climbing", "2024-02-02", "16:00:00")
        .await;
    let uri = format!("/api/events/{}", created["id"]);

    let (status, body) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, _) = app.call(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[ignore = "needs a Postgres server via DATABASE_URL"]
async fn other_users_cannot_modify_event(pool: PgPool) {
    let app = TestApp::new(pool);
    let owner = app.signup("ida").await;
    let intruder = app.signup("jan").await;
    let created = app
        .create_event(&owner, "Table tennis", "2024-08-08", "12:00:00")
        .await;
    let uri = format!("/api/events/{}", created["id"]);

    let (status, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(&intruder),
            Some(json!({ "title": "hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "You are not authorized to update this event");

    let (status, body) = app.call(Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "You are not authorized to delete this event");

    let (_, fetched) = app.call(Method::GET, &uri, None, None).await;
    assert_eq!(fetched, created);
}
