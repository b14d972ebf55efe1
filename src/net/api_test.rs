use super::*;
use crate::storage::MemoryTokenStore;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

// =========================================================================
// Test server
// =========================================================================

type Reply = (StatusCode, Json<Value>);

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] == "x" {
        (StatusCode::OK, Json(json!({ "access_token": "t1", "user": { "id": 1, "email": body["email"] } })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" })))
    }
}

async fn register(Json(body): Json<Value>) -> Reply {
    if body["username"] == "taken" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Username already exists" })));
    }
    (StatusCode::CREATED, Json(json!({ "message": "registered" })))
}

async fn current_user(headers: HeaderMap) -> Reply {
    match bearer(&headers) {
        Some("t1") => (StatusCode::OK, Json(json!({ "id": 1, "username": "ana", "is_admin": true }))),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "Missing Authorization Header" }))),
    }
}

async fn list_videos() -> Reply {
    (StatusCode::OK, Json(json!([{ "id": 1, "slug": "a" }, { "id": 2, "slug": "b", "title": "B" }])))
}

async fn list_user_videos(headers: HeaderMap) -> Reply {
    if bearer(&headers).is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "Missing Authorization Header" })));
    }
    (StatusCode::OK, Json(json!([{ "id": 2, "slug": "b" }])))
}

async fn upload(headers: HeaderMap, body: axum::body::Bytes) -> Reply {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("multipart/form-data") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "expected multipart" })));
    }
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"video\"") || !text.contains("My trip") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No video file provided" })));
    }
    (StatusCode::CREATED, Json(json!({ "message": "uploaded", "video": { "id": 5, "slug": "my-trip" } })))
}

async fn get_video(Path(slug): Path<String>) -> Reply {
    if slug == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Video not available" })));
    }
    (StatusCode::OK, Json(json!({ "id": 9, "slug": slug, "views": 1 })))
}

async fn delete_video(Path(id): Path<i64>) -> Reply {
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({ "message": "deleted" })))
}

async fn create_embed(Path(id): Path<i64>, Json(cfg): Json<Value>) -> Reply {
    let url = format!("/embed/clip-{id}?config=1");
    (
        StatusCode::CREATED,
        Json(json!({
            "embed_code": format!("<iframe src=\"{url}\" width=\"{}\" height=\"{}\"></iframe>", cfg["width"], cfg["height"]),
            "embed_url": url,
        })),
    )
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/user", get(current_user))
        .route("/api/user/videos", get(list_user_videos))
        .route("/api/videos", get(list_videos).post(upload))
        .route("/api/videos/{slug}", get(get_video).delete(delete_video))
        .route("/api/videos/{id}/embed", post(create_embed));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base_url: &str, tokens: Arc<dyn TokenStore>) -> HttpApi {
    let config = ClientConfig { base_url: base_url.to_owned(), ..ClientConfig::default() };
    HttpApi::new(&config, tokens).unwrap()
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn new_rejects_unparseable_base_url() {
    let config = ClientConfig { base_url: "not a url".into(), ..ClientConfig::default() };
    let result = HttpApi::new(&config, Arc::new(MemoryTokenStore::new()));
    assert!(matches!(result, Err(ApiError::HttpClientBuild(_))));
}

#[test]
fn endpoint_appends_and_encodes_segments() {
    let api = client("http://localhost:5000/api", Arc::new(MemoryTokenStore::new()));
    let url = api.endpoint(&["videos", "a b/c"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:5000/api/videos/a%20b%2Fc");
}

#[test]
fn endpoint_tolerates_trailing_slash_base() {
    let api = client("http://localhost:5000/api/", Arc::new(MemoryTokenStore::new()));
    assert_eq!(api.endpoint(&["user"]).unwrap().as_str(), "http://localhost:5000/api/user");
}

// =========================================================================
// Wire behavior
// =========================================================================

#[tokio::test]
async fn login_success_parses_token_and_user() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::new()));

    let resp = api.login(&Credentials::with_email("a@b.com", "x")).await.unwrap();
    assert_eq!(resp.access_token, "t1");
    assert_eq!(resp.user.id, 1);
    assert_eq!(resp.user.email.as_deref(), Some("a@b.com"));
}

#[tokio::test]
async fn login_rejection_carries_server_message() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::new()));

    let err = api.login(&Credentials::with_email("a@b.com", "wrong")).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn register_success_and_rejection() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::new()));

    let ok = Registration { username: "ana".into(), email: "a@b.com".into(), password: "x".into() };
    api.register(&ok).await.unwrap();

    let taken = Registration { username: "taken".into(), ..ok };
    let err = api.register(&taken).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Username already exists"));
}

#[tokio::test]
async fn bearer_header_follows_token_store() {
    let base = spawn_server().await;
    let tokens = Arc::new(MemoryTokenStore::new());
    let api = client(&base, tokens.clone());

    let err = api.current_user().await.unwrap_err();
    assert_eq!(err.server_message(), Some("Missing Authorization Header"));

    tokens.set_token("t1").unwrap();
    let user = api.current_user().await.unwrap();
    assert_eq!(user.username.as_deref(), Some("ana"));
    assert!(user.is_admin);

    tokens.clear_token().unwrap();
    assert!(api.list_user_videos().await.is_err());
}

#[tokio::test]
async fn list_videos_preserves_order_and_fields() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::new()));

    let videos = api.list_videos().await.unwrap();
    let slugs: Vec<&str> = videos.iter().map(|v| v.slug.as_str()).collect();
    assert_eq!(slugs, vec!["a", "b"]);
    assert_eq!(videos[1].field_str("title"), Some("B"));
}

#[tokio::test]
async fn upload_sends_multipart_and_unwraps_record() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::with_token("t1")));

    let form = UploadForm::new("My trip", "beach", "trip.mp4", b"0000".to_vec());
    let video = api.upload_video(&form).await.unwrap();
    assert_eq!(video.id, 5);
    assert_eq!(video.slug, "my-trip");
}

#[tokio::test]
async fn get_video_by_slug_and_not_found() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::new()));

    let video = api.get_video("intro").await.unwrap();
    assert_eq!(video.slug, "intro");

    let err = api.get_video("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_embed_posts_config() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::new()));

    let code = api.create_embed(3, &EmbedConfig::default()).await.unwrap();
    assert_eq!(code.embed_url, "/embed/clip-3?config=1");
    assert!(code.embed_code.contains("width=\"800\""));
}

#[tokio::test]
async fn delete_video_status_mapping() {
    let base = spawn_server().await;
    let api = client(&base, Arc::new(MemoryTokenStore::with_token("t1")));

    api.delete_video(7).await.unwrap();
    let err = api.delete_video(404).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 404, message: None }));
}

#[tokio::test]
async fn unexpected_success_body_is_parse_error() {
    let app = Router::new().route("/api/videos", get(|| async { "not json" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = client(&format!("http://{addr}/api"), Arc::new(MemoryTokenStore::new()));
    assert!(matches!(api.list_videos().await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn closed_port_is_network_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}/api"), Arc::new(MemoryTokenStore::new()));
    assert!(matches!(api.list_videos().await, Err(ApiError::Network(_))));
}
