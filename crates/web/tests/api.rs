//! End-to-end tests of the HTTP surface against the in-memory backend.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use storage::{
    models::User,
    repository::memory::{MemoryAthleteRepository, MemoryUserRepository},
};
use tower::ServiceExt;
use uuid::Uuid;

use web::{
    config::{Config, UploadConfig},
    features::{auth::services::hash_password, upload::services::MAX_UPLOAD_BYTES},
    state::AppState,
};

struct TestApp {
    router: Router,
    state: AppState,
    admin: String,
    coach: String,
    athlete: String,
}

// Hashing is slow in debug builds, so only accounts that sign in get a password.
fn account(email: &str, password: Option<&str>) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: Some("Test Account".to_string()),
        password_hash: password.map(|p| hash_password(p).unwrap()),
    }
}

fn test_app() -> TestApp {
    test_app_with(|_| {})
}

fn test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let admin = account("admin@example.com", None);
    let coach = account("coach@example.com", Some("coach123"));
    let athlete = account("athlete@example.com", None);

    let users = MemoryUserRepository::with_accounts([
        (admin.clone(), vec!["admin".to_string()]),
        (coach.clone(), vec!["coach".to_string()]),
        (athlete.clone(), vec!["athlete".to_string()]),
    ]);

    let mut config = Config {
        jwt_secret: "test-secret".to_string(),
        upload: UploadConfig {
            dir: std::env::temp_dir().join(format!("api-uploads-{}", Uuid::new_v4())),
            object_storage: None,
        },
        ..Config::default()
    };
    configure(&mut config);

    let state = AppState::new(
        config,
        Arc::new(MemoryAthleteRepository::new()),
        Arc::new(users),
        None,
    )
    .unwrap();

    let token = |user: &User| state.tokens.issue(user.id, &user.email).unwrap();

    TestApp {
        router: web::app(state.clone()),
        admin: token(&admin),
        coach: token(&coach),
        athlete: token(&athlete),
        state,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn delete(&self, uri: &str, token: &str) -> StatusCode {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await.0
    }

    async fn upload(
        &self,
        token: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
    ) -> (StatusCode, Value) {
        self.upload_content(token, field, file_name, content_type, b"fake-media-bytes")
            .await
    }

    async fn upload_content(
        &self,
        token: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        content: &[u8],
    ) -> (StatusCode, Value) {
        let boundary = "XtestboundaryX";
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

fn ivan() -> Value {
    json!({ "firstName": "Ivan", "lastName": "Petrov", "sport": "Swimming", "age": 17 })
}

#[tokio::test]
async fn test_list_starts_empty() {
    let app = test_app();
    let (status, body) = app.get("/api/athletes", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [], "total": 0 }));
}

#[tokio::test]
async fn test_create_update_delete_scenario() {
    let app = test_app();

    let (status, created) = app
        .json("POST", "/api/athletes", Some(&app.coach), ivan())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(created.get("metrics").is_none());
    assert!(created.get("team").is_none());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let (status, updated) = app
        .json(
            "PUT",
            &format!("/api/athletes/{}", id),
            Some(&app.coach),
            json!({ "team": "Alpha" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["team"], "Alpha");
    for field in ["id", "firstName", "lastName", "sport", "age", "createdAt"] {
        assert_eq!(updated[field], created[field], "{} changed", field);
    }

    assert_eq!(
        app.delete(&format!("/api/athletes/{}", id), &app.admin).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&format!("/api/athletes/{}", id), &app.admin).await,
        StatusCode::NO_CONTENT
    );

    let (_, listed) = app.get("/api/athletes", None).await;
    assert_eq!(listed["total"], 0);
    assert!(
        listed["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|a| a["id"] != id.as_str())
    );
}

#[tokio::test]
async fn test_create_returns_unique_ids_newest_first() {
    let app = test_app();
    let (_, first) = app
        .json("POST", "/api/athletes", Some(&app.admin), ivan())
        .await;
    let (_, second) = app
        .json("POST", "/api/athletes", Some(&app.admin), ivan())
        .await;
    assert_ne!(first["id"], second["id"]);

    let (_, listed) = app.get("/api/athletes", None).await;
    assert_eq!(listed["total"], 2);
    assert_eq!(listed["items"][0]["id"], second["id"]);
}

#[tokio::test]
async fn test_create_missing_first_name_is_rejected() {
    let app = test_app();
    let (status, body) = app
        .json(
            "POST",
            "/api/athletes",
            Some(&app.coach),
            json!({ "lastName": "Petrov", "sport": "Swimming", "age": 17 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["details"], json!(["firstName is required"]));

    let (_, listed) = app.get("/api/athletes", None).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn test_create_with_non_numeric_age_is_rejected() {
    let app = test_app();
    let (status, _) = app
        .json(
            "POST",
            "/api/athletes",
            Some(&app.coach),
            json!({ "firstName": "Ivan", "lastName": "Petrov", "sport": "Swimming", "age": "17" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_accepts_integral_float_age() {
    let app = test_app();
    let (status, created) = app
        .json(
            "POST",
            "/api/athletes",
            Some(&app.coach),
            json!({ "firstName": "Ivan", "lastName": "Petrov", "sport": "Swimming", "age": 17.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["age"], 17);

    let (status, body) = app
        .json(
            "POST",
            "/api/athletes",
            Some(&app.coach),
            json!({ "firstName": "Ivan", "lastName": "Petrov", "sport": "Swimming", "age": 17.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("age must be a whole number"));
    assert!(!message.contains("i32"));
}

#[tokio::test]
async fn test_update_with_null_keeps_stored_value() {
    let app = test_app();
    let (_, created) = app
        .json(
            "POST",
            "/api/athletes",
            Some(&app.coach),
            json!({
                "firstName": "Ivan",
                "lastName": "Petrov",
                "sport": "Swimming",
                "age": 17,
                "team": "Alpha"
            }),
        )
        .await;
    assert_eq!(created["team"], "Alpha");

    let (status, updated) = app
        .json(
            "PUT",
            &format!("/api/athletes/{}", created["id"].as_str().unwrap()),
            Some(&app.coach),
            json!({ "team": null, "sport": "Diving" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["team"], "Alpha");
    assert_eq!(updated["sport"], "Diving");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = test_app();
    let (status, body) = app
        .json(
            "PUT",
            "/api/athletes/does-not-exist",
            Some(&app.coach),
            json!({ "team": "Alpha" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_mutations_require_token_and_role() {
    let app = test_app();

    let (status, body) = app.json("POST", "/api/athletes", None, ivan()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = app
        .json("POST", "/api/athletes", Some("not-a-jwt"), ivan())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .json("POST", "/api/athletes", Some(&app.athlete), ivan())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (_, created) = app
        .json("POST", "/api/athletes", Some(&app.coach), ivan())
        .await;
    let uri = format!("/api/athletes/{}", created["id"].as_str().unwrap());
    assert_eq!(app.delete(&uri, &app.coach).await, StatusCode::FORBIDDEN);

    let (_, listed) = app.get("/api/athletes", None).await;
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn test_token_for_unknown_user_has_no_roles() {
    let app = test_app();
    let stranger = app
        .state
        .tokens
        .issue(Uuid::new_v4(), "stranger@example.com")
        .unwrap();

    let (status, _) = app
        .json("POST", "/api/athletes", Some(&stranger), ivan())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = test_app();

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "coach@example.com", "password": "coach123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "coach@example.com");
    assert_eq!(body["user"]["roles"], json!(["coach"]));
    assert_eq!(body["user"]["fullName"], "Test Account");

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["email"], "coach@example.com");
    assert_eq!(me["user"]["roles"], json!(["coach"]));

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures() {
    let app = test_app();

    let (status, body) = app
        .json("POST", "/api/auth/login", None, json!({ "email": "coach@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password required");

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "coach@example.com", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "coach123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "admin@example.com", "password": "admin123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Password not set");
}

#[tokio::test]
async fn test_upload_stores_media_locally() {
    let app = test_app();

    let (status, body) = app
        .upload(&app.athlete, "file", "my avatar.png", "image/png")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with("-my_avatar.png"));

    let request = Request::builder().uri(url).body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake-media-bytes");

    std::fs::remove_dir_all(app.state.uploads.local_dir()).ok();
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = test_app();

    let (status, body) = app
        .upload(&app.coach, "file", "notes.txt", "text/plain")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only image/video allowed");

    let (status, body) = app
        .upload(&app.coach, "attachment", "clip.mp4", "video/mp4")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file");

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.0, StatusCode::UNAUTHORIZED);

    std::fs::remove_dir_all(app.state.uploads.local_dir()).ok();
}

#[tokio::test]
async fn test_seed_requires_database() {
    let app = test_app();

    let (status, body) = app
        .json("POST", "/api/seed", Some(&app.admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Database not configured");

    let (status, _) = app
        .json("POST", "/api/seed", Some(&app.coach), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.json("POST", "/api/seed-open", None, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_size_limit() {
    let app = test_app();

    let max = vec![b'x'; MAX_UPLOAD_BYTES];
    let (status, body) = app
        .upload_content(&app.coach, "file", "clip.mp4", "video/mp4", &max)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["url"].as_str().unwrap().ends_with("-clip.mp4"));

    let over = vec![b'x'; MAX_UPLOAD_BYTES + 1];
    let (status, body) = app
        .upload_content(&app.coach, "file", "clip.mp4", "video/mp4", &over)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File too large");

    std::fs::remove_dir_all(app.state.uploads.local_dir()).ok();
}

#[tokio::test]
async fn test_open_seed_route_when_allowed() {
    let app = test_app_with(|config| config.allow_open_seed = true);

    let (status, body) = app.json("POST", "/api/seed-open", None, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Database not configured");
}

#[tokio::test]
async fn test_ping() {
    let app = test_app();
    let (status, body) = app.get("/api/ping", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "ping" }));
}
