//! Async HTTP client wrapping the auth, news and users endpoints.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use speltation_core::{
  Error, Result,
  article::{Article, ArticleId, Category, Comment, LikeState},
  remote::NewsRemote,
  user::{PreferencesPatch, SubscriptionState, User, UserId},
};
use tracing::debug;

use crate::{
  error::BuildError,
  wire::{
    ArticleEnvelope, ArticlesEnvelope, AuthAction, CommentEnvelope, ErrorBody, MessageEnvelope,
    NewsAction, PreferencesBody, UserEnvelope, UsersAction, UsersEnvelope,
  },
};

/// Endpoint locations and transport settings.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
  pub auth_url:  String,
  pub news_url:  String,
  pub users_url: String,
  pub timeout:   Duration,
}

impl RemoteConfig {
  /// All three endpoints under one base URL: `<base>/auth`, `<base>/news`,
  /// `<base>/users`.
  pub fn under(base: &str) -> Self {
    let base = base.trim_end_matches('/');
    Self {
      auth_url:  format!("{base}/auth"),
      news_url:  format!("{base}/news"),
      users_url: format!("{base}/users"),
      timeout:   Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the news endpoints.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpRemote {
  client: Client,
  config: RemoteConfig,
}

/// Map a transport failure onto the error taxonomy.
fn transport(e: reqwest::Error) -> Error {
  if e.is_decode() {
    Error::Decode(e.to_string())
  } else {
    Error::Connectivity(e.to_string())
  }
}

impl HttpRemote {
  pub fn new(config: RemoteConfig) -> Result<Self, BuildError> {
    for (name, url) in [
      ("auth", &config.auth_url),
      ("news", &config.news_url),
      ("users", &config.users_url),
    ] {
      if url.trim().is_empty() {
        return Err(BuildError::MissingUrl(name));
      }
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &RemoteConfig { &self.config }

  /// Send `req` and decode a success body as `T`.
  ///
  /// A non-success status becomes [`Error::RequestFailed`] carrying the
  /// body's `error` field, or a generic message when there is none.
  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    debug!(request = what, "sending");
    let resp = req.send().await.map_err(transport)?;
    let status = resp.status();
    let body = resp.bytes().await.map_err(transport)?;

    if !status.is_success() {
      let message = serde_json::from_slice::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| Error::GENERIC_FAILURE.to_string());
      debug!(request = what, %status, %message, "rejected");
      return Err(Error::RequestFailed {
        status: status.as_u16(),
        message,
      });
    }

    serde_json::from_slice(&body).map_err(|e| Error::Decode(format!("{what}: {e}")))
  }

  fn post_json<B: Serialize>(&self, url: &str, body: &B) -> RequestBuilder {
    self.client.post(url).json(body)
  }

  fn get_for(&self, url: &str, param: &str, viewer: Option<UserId>) -> RequestBuilder {
    let req = self.client.get(url);
    match viewer {
      Some(id) => req.query(&[(param, id)]),
      None => req,
    }
  }
}

impl NewsRemote for HttpRemote {
  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST auth {action: "register"}`
  async fn register(&self, username: &str, password: &str) -> Result<User> {
    let body = AuthAction::Register { username, password };
    let env: UserEnvelope = self
      .send(self.post_json(&self.config.auth_url, &body), "register")
      .await?;
    Ok(env.user)
  }

  /// `POST auth {action: "login"}`
  async fn login(&self, username: &str, password: &str) -> Result<User> {
    let body = AuthAction::Login { username, password };
    let env: UserEnvelope = self
      .send(self.post_json(&self.config.auth_url, &body), "login")
      .await?;
    Ok(env.user)
  }

  /// `POST auth {action: "change_password"}`
  async fn change_password(
    &self,
    user_id: UserId,
    old_password: &str,
    new_password: &str,
  ) -> Result<()> {
    let body = AuthAction::ChangePassword {
      user_id,
      old_password,
      new_password,
    };
    let ack: MessageEnvelope = self
      .send(self.post_json(&self.config.auth_url, &body), "change_password")
      .await?;
    debug!(message = ?ack.message, "password change acknowledged");
    Ok(())
  }

  /// `PUT auth {user_id, ...patch}`
  async fn update_preferences(&self, user_id: UserId, patch: &PreferencesPatch) -> Result<User> {
    let body = PreferencesBody { user_id, patch };
    let env: UserEnvelope = self
      .send(
        self.client.put(&self.config.auth_url).json(&body),
        "update_preferences",
      )
      .await?;
    Ok(env.user)
  }

  // ── News ──────────────────────────────────────────────────────────────────

  /// `GET news[?user_id=<id>]`
  async fn list_articles(&self, viewer: Option<UserId>) -> Result<Vec<Article>> {
    let env: ArticlesEnvelope = self
      .send(
        self.get_for(&self.config.news_url, "user_id", viewer),
        "list_articles",
      )
      .await?;
    Ok(env.articles)
  }

  /// `POST news {action: "create"}`
  async fn create_article(
    &self,
    author_id: UserId,
    title: &str,
    content: &str,
    category: Category,
  ) -> Result<Article> {
    let body = NewsAction::Create {
      title,
      content,
      category,
      author_id,
    };
    let env: ArticleEnvelope = self
      .send(self.post_json(&self.config.news_url, &body), "create_article")
      .await?;
    Ok(env.article)
  }

  /// `POST news {action: "like"}`
  async fn toggle_like(&self, article_id: ArticleId, user_id: UserId) -> Result<LikeState> {
    let body = NewsAction::Like {
      article_id,
      user_id,
    };
    self
      .send(self.post_json(&self.config.news_url, &body), "toggle_like")
      .await
  }

  /// `POST news {action: "comment"}`
  async fn add_comment(
    &self,
    article_id: ArticleId,
    author_id: UserId,
    content: &str,
  ) -> Result<Comment> {
    let body = NewsAction::Comment {
      article_id,
      author_id,
      content,
    };
    let env: CommentEnvelope = self
      .send(self.post_json(&self.config.news_url, &body), "add_comment")
      .await?;
    Ok(env.comment)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET users[?current_user_id=<id>]`
  async fn list_authors(&self, viewer: Option<UserId>) -> Result<Vec<User>> {
    let env: UsersEnvelope = self
      .send(
        self.get_for(&self.config.users_url, "current_user_id", viewer),
        "list_authors",
      )
      .await?;
    Ok(env.users)
  }

  /// `POST users {action: "subscribe"}`
  async fn toggle_subscribe(
    &self,
    subscriber_id: UserId,
    author_id: UserId,
  ) -> Result<SubscriptionState> {
    let body = UsersAction::Subscribe {
      subscriber_id,
      author_id,
    };
    self
      .send(self.post_json(&self.config.users_url, &body), "toggle_subscribe")
      .await
  }
}
