//! The `NewsRemote` trait: one method per request the client can issue.
//!
//! Implemented by transports (e.g. `speltation-http`). Implementations issue
//! exactly one request per call: no retries, no backoff, no deduplication.
//! Every failure is reported through the [`crate::Error`] taxonomy.

use std::future::Future;

use crate::{
  Result,
  article::{Article, ArticleId, Category, Comment, LikeState},
  user::{PreferencesPatch, SubscriptionState, User, UserId},
};

/// Abstraction over the auth, news and users endpoints.
///
/// All methods return `Send` futures so implementations can be driven from a
/// multi-threaded tokio runtime.
pub trait NewsRemote: Send + Sync {
  // ── Auth ──────────────────────────────────────────────────────────────

  /// Create an account and return it.
  fn register<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<User>> + Send + 'a;

  fn login<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<User>> + Send + 'a;

  /// Replace the password. Fails with a 401 rejection when `old_password`
  /// does not match.
  fn change_password<'a>(
    &'a self,
    user_id: UserId,
    old_password: &'a str,
    new_password: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Apply a partial preference update and return the whole updated user.
  fn update_preferences<'a>(
    &'a self,
    user_id: UserId,
    patch: &'a PreferencesPatch,
  ) -> impl Future<Output = Result<User>> + Send + 'a;

  // ── News ──────────────────────────────────────────────────────────────

  /// All articles, newest first, with `is_liked` computed for `viewer`.
  fn list_articles(
    &self,
    viewer: Option<UserId>,
  ) -> impl Future<Output = Result<Vec<Article>>> + Send + '_;

  fn create_article<'a>(
    &'a self,
    author_id: UserId,
    title: &'a str,
    content: &'a str,
    category: Category,
  ) -> impl Future<Output = Result<Article>> + Send + 'a;

  /// Flip the like of `user_id` on `article_id`; returns the new state.
  fn toggle_like(
    &self,
    article_id: ArticleId,
    user_id: UserId,
  ) -> impl Future<Output = Result<LikeState>> + Send + '_;

  fn add_comment<'a>(
    &'a self,
    article_id: ArticleId,
    author_id: UserId,
    content: &'a str,
  ) -> impl Future<Output = Result<Comment>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// All authors, with `is_subscribed` computed for `viewer`.
  fn list_authors(
    &self,
    viewer: Option<UserId>,
  ) -> impl Future<Output = Result<Vec<User>>> + Send + '_;

  /// Flip the subscription of `subscriber_id` to `author_id`.
  fn toggle_subscribe(
    &self,
    subscriber_id: UserId,
    author_id: UserId,
  ) -> impl Future<Output = Result<SubscriptionState>> + Send + '_;
}
