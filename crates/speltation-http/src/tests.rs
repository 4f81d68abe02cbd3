//! `HttpRemote` against a local axum stand-in for the three endpoints.

use std::{collections::HashMap, time::Duration};

use axum::{
  Json, Router,
  extract::Query,
  http::StatusCode,
  routing::{get, post},
};
use serde_json::{Value, json};
use speltation_core::{
  Error, Rejection,
  article::Category,
  remote::NewsRemote,
  user::PreferencesPatch,
};

use crate::{BuildError, HttpRemote, RemoteConfig};

// ─── Stand-in endpoints ───────────────────────────────────────────────────────

fn user_json(id: i64, username: &str) -> Value {
  json!({
    "id": id,
    "username": username,
    "avatar_url": null,
    "bio": "Пишу о бизнесе",
    "subscribers_count": 89,
    "likes_count": 567,
    "publications_count": 12,
    "dark_theme": false,
    "sound_enabled": true
  })
}

async fn auth_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  match body["action"].as_str() {
    Some("login") if body["password"] == "secret" => {
      let name = body["username"].as_str().unwrap_or_default();
      (StatusCode::OK, Json(json!({ "user": user_json(2, name) })))
    }
    Some("login") => (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "error": "Неверное имя пользователя или пароль" })),
    ),
    Some("register") => (
      StatusCode::CONFLICT,
      Json(json!({ "error": "Пользователь уже существует" })),
    ),
    Some("change_password") if body["old_password"] == "old" => (
      StatusCode::OK,
      Json(json!({ "message": "Пароль успешно изменен" })),
    ),
    Some("change_password") => (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "error": "Неверный текущий пароль" })),
    ),
    _ => (
      StatusCode::METHOD_NOT_ALLOWED,
      Json(json!({ "error": "Метод не поддерживается" })),
    ),
  }
}

async fn auth_put(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  // Absent fields must not be sent at all.
  if body.get("bio").is_some() || body.get("sound_enabled").is_some() {
    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unexpected field" })));
  }
  let mut user = user_json(body["user_id"].as_i64().unwrap_or_default(), "Дмитрий Петров");
  user["dark_theme"] = body["dark_theme"].clone();
  (StatusCode::OK, Json(json!({ "user": user })))
}

async fn news_get(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
  let liked = q.get("user_id").is_some_and(|id| id == "2");
  Json(json!({
    "articles": [{
      "id": 10,
      "title": "Рынок недвижимости: тренды 2025 года",
      "content": "Эксперты делятся прогнозами",
      "excerpt": "Эксперты делятся прогнозами",
      "category": "Бизнес",
      "author_id": 2,
      "likes_count": 187,
      "created_at": "2025-03-01T10:15:00.500000",
      "author_name": "Дмитрий Петров",
      "author_avatar": null,
      "subscribers_count": 89,
      "author_total_likes": 567,
      "publications_count": 12,
      "comments": [],
      "date": "5 ч назад",
      "is_liked": liked
    }]
  }))
}

async fn news_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  match body["action"].as_str() {
    Some("like") => (
      StatusCode::OK,
      Json(json!({ "is_liked": true, "likes_count": 188 })),
    ),
    Some("comment") => (
      StatusCode::CREATED,
      Json(json!({ "comment": {
        "id": 55,
        "content": body["content"],
        "author_name": "Дмитрий Петров",
        "author_avatar": null,
        "created_at": "2025-03-01T10:20:00",
        "timestamp": "только что"
      }})),
    ),
    Some("create") if body["title"] == "" => (
      StatusCode::BAD_REQUEST,
      Json(json!({ "error": "Все поля обязательны" })),
    ),
    Some("create") => (
      StatusCode::CREATED,
      Json(json!({ "article": {
        "id": 11,
        "title": body["title"],
        "content": body["content"],
        "excerpt": body["content"],
        "category": body["category"],
        "author_id": body["author_id"],
        "likes_count": 0,
        "created_at": "2025-03-01T10:30:00"
      }})),
    ),
    _ => (StatusCode::METHOD_NOT_ALLOWED, Json(json!({}))),
  }
}

async fn users_get(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
  let mut author = user_json(3, "Елена Смирнова");
  author["is_subscribed"] = json!(q.contains_key("current_user_id"));
  Json(json!({ "users": [author] }))
}

async fn users_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
  if body["subscriber_id"] == body["author_id"] {
    return (
      StatusCode::BAD_REQUEST,
      Json(json!({ "error": "Нельзя подписаться на самого себя" })),
    );
  }
  (
    StatusCode::OK,
    Json(json!({ "is_subscribed": true, "subscribers_count": 90 })),
  )
}

async fn broken() -> (StatusCode, &'static str) {
  (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn garbled() -> &'static str { "{\"articles\": 7}" }

fn router() -> Router {
  Router::new()
    .route("/auth", post(auth_post).put(auth_put))
    .route("/news", get(news_get).post(news_post))
    .route("/users", get(users_get).post(users_post))
    .route("/broken/news", get(broken))
    .route("/garbled/news", get(garbled))
}

async fn serve() -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("bind");
  let addr = listener.local_addr().expect("addr");
  tokio::spawn(async move {
    axum::serve(listener, router()).await.ok();
  });
  format!("http://{addr}")
}

async fn remote() -> HttpRemote {
  let base = serve().await;
  HttpRemote::new(RemoteConfig::under(&base)).expect("client")
}

// ─── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_returns_user() {
  let r = remote().await;
  let user = r.login("Дмитрий Петров", "secret").await.unwrap();
  assert_eq!(user.id, 2);
  assert_eq!(user.username, "Дмитрий Петров");
  assert!(user.sound_enabled);
}

#[tokio::test]
async fn bad_login_surfaces_server_message() {
  let r = remote().await;
  let err = r.login("Дмитрий Петров", "nope").await.unwrap_err();
  assert_eq!(err.rejection(), Some(Rejection::InvalidCredentials));
  assert_eq!(err.to_string(), "Неверное имя пользователя или пароль");
}

#[tokio::test]
async fn register_conflict_is_classified() {
  let r = remote().await;
  let err = r.register("taken", "secret").await.unwrap_err();
  assert_eq!(err.rejection(), Some(Rejection::Conflict));
}

#[tokio::test]
async fn change_password_ack_and_rejection() {
  let r = remote().await;
  r.change_password(2, "old", "newpass").await.unwrap();
  let err = r.change_password(2, "wrong", "newpass").await.unwrap_err();
  assert_eq!(err.rejection(), Some(Rejection::InvalidCredentials));
}

#[tokio::test]
async fn preferences_are_sent_as_partial_put() {
  let r = remote().await;
  let user = r
    .update_preferences(2, &PreferencesPatch {
      dark_theme: Some(true),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(user.id, 2);
  assert!(user.dark_theme);
}

// ─── News ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn articles_are_personalised_by_viewer_query() {
  let r = remote().await;
  let signed_out = r.list_articles(None).await.unwrap();
  assert!(!signed_out[0].is_liked);
  let as_dmitry = r.list_articles(Some(2)).await.unwrap();
  assert!(as_dmitry[0].is_liked);
  assert_eq!(as_dmitry[0].category, Category::Business);
}

#[tokio::test]
async fn like_comment_and_create_round_trip() {
  let r = remote().await;
  let like = r.toggle_like(10, 2).await.unwrap();
  assert!(like.is_liked);
  assert_eq!(like.likes_count, 188);

  let comment = r.add_comment(10, 2, "Интересно").await.unwrap();
  assert_eq!(comment.id, 55);
  assert_eq!(comment.content, "Интересно");

  let article = r
    .create_article(2, "Заголовок", "Текст", Category::Science)
    .await
    .unwrap();
  assert_eq!(article.id, 11);
  assert_eq!(article.category, Category::Science);
  assert!(article.author_name.is_empty());
}

#[tokio::test]
async fn create_validation_failure_is_a_request_failure() {
  let r = remote().await;
  let err = r
    .create_article(2, "", "Текст", Category::Science)
    .await
    .unwrap_err();
  assert_eq!(err.rejection(), Some(Rejection::Invalid));
  assert_eq!(err.to_string(), "Все поля обязательны");
}

// ─── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn authors_are_personalised_by_viewer_query() {
  let r = remote().await;
  assert!(!r.list_authors(None).await.unwrap()[0].is_subscribed);
  assert!(r.list_authors(Some(2)).await.unwrap()[0].is_subscribed);
}

#[tokio::test]
async fn subscribe_and_self_subscribe() {
  let r = remote().await;
  let state = r.toggle_subscribe(2, 3).await.unwrap();
  assert!(state.is_subscribed);
  assert_eq!(state.subscribers_count, 90);

  let err = r.toggle_subscribe(2, 2).await.unwrap_err();
  assert_eq!(err.to_string(), "Нельзя подписаться на самого себя");
}

// ─── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_json_failure_gets_generic_message() {
  let base = serve().await;
  let r = HttpRemote::new(RemoteConfig::under(&format!("{base}/broken"))).unwrap();
  let err = r.list_articles(None).await.unwrap_err();
  match err {
    Error::RequestFailed { status, message } => {
      assert_eq!(status, 500);
      assert_eq!(message, Error::GENERIC_FAILURE);
    }
    other => panic!("expected RequestFailed, got {other:?}"),
  }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
  let base = serve().await;
  let r = HttpRemote::new(RemoteConfig::under(&format!("{base}/garbled"))).unwrap();
  let err = r.list_articles(None).await.unwrap_err();
  assert!(matches!(err, Error::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_a_connectivity_error() {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let mut config = RemoteConfig::under(&format!("http://{addr}"));
  config.timeout = Duration::from_secs(2);
  let r = HttpRemote::new(config).unwrap();
  let err = r.list_authors(None).await.unwrap_err();
  assert!(matches!(err, Error::Connectivity(_)), "{err:?}");
}

#[test]
fn empty_url_is_rejected_at_build_time() {
  let mut config = RemoteConfig::under("http://localhost");
  config.news_url = String::new();
  assert!(matches!(
    HttpRemote::new(config),
    Err(BuildError::MissingUrl("news"))
  ));
}

#[test]
fn under_joins_without_double_slash() {
  let c = RemoteConfig::under("http://example.test/api/");
  assert_eq!(c.auth_url, "http://example.test/api/auth");
  assert_eq!(c.users_url, "http://example.test/api/users");
}
