//! The session context and its command handlers.
//!
//! A [`Session`] owns the remote, the durable slot and the [`ViewState`].
//! Its lifecycle is explicit: [`Session::restore`] rehydrates the signed-in
//! user before the first render, [`Session::logout`] tears it down. Every
//! user action is a method returning `Result`, independent of rendering.

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  article::{Article, ArticleDraft, ArticleId, Comment, LikeState},
  remote::NewsRemote,
  slot::SessionSlot,
  user::{PreferencesPatch, SubscriptionState, User, UserId},
  view::{EntityKey, ViewState},
};

fn required(value: &str, what: &str) -> Result<()> {
  if value.trim().is_empty() {
    Err(Error::ValidationFailed(format!("{what} is required")))
  } else {
    Ok(())
  }
}

pub struct Session<R, S> {
  remote: R,
  slot:   S,
  view:   ViewState,

  /// Failure of the list refetch that follows an identity change. The
  /// identity change itself still succeeded.
  refresh_error: Option<Error>,
}

impl<R, S> Session<R, S>
where
  R: NewsRemote,
  S: SessionSlot,
{
  /// A signed-out session with empty lists. Call [`Session::restore`] and
  /// [`Session::refresh`] before rendering.
  pub fn new(remote: R, slot: S) -> Self {
    Self {
      remote,
      slot,
      view: ViewState::default(),
      refresh_error: None,
    }
  }

  pub fn view(&self) -> &ViewState { &self.view }

  pub fn user(&self) -> Option<&User> { self.view.user() }

  pub fn remote(&self) -> &R { &self.remote }

  pub fn slot(&self) -> &S { &self.slot }

  /// The error of the last refetch triggered by sign-in, registration or
  /// logout, if it failed. Cleared by reading it.
  pub fn take_refresh_error(&mut self) -> Option<Error> { self.refresh_error.take() }

  fn require_user(&self, action: &'static str) -> Result<User> {
    self
      .view
      .user()
      .cloned()
      .ok_or(Error::AuthenticationRequired(action))
  }

  fn signed_in(&self) -> Result<&User> {
    self
      .view
      .user()
      .ok_or(Error::AuthenticationRequired("continue"))
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Rehydrate the signed-in user from the durable slot.
  pub async fn restore(&mut self) -> Result<Option<&User>> {
    let stored = self.slot.load().await.map_err(Error::storage)?;
    if let Some(user) = &stored {
      info!(user_id = user.id, "restored session");
    }
    self.view.set_user(stored);
    Ok(self.view.user())
  }

  /// Refetch articles and authors for the current viewer.
  pub async fn refresh(&mut self) -> Result<()> {
    let ticket = self.view.issue_refresh();
    let viewer = self.view.viewer_id();
    debug!(?viewer, "refreshing lists");
    let articles = self.remote.list_articles(viewer).await?;
    let authors = self.remote.list_authors(viewer).await?;
    self.view.apply_refresh(ticket, articles, authors);
    Ok(())
  }

  /// Install `user` as the session user, persist it, and refetch the lists
  /// if the viewer identity changed.
  async fn sign_in(&mut self, user: User) -> Result<()> {
    self.slot.save(&user).await.map_err(Error::storage)?;
    info!(user_id = user.id, "signed in");
    if self.view.set_user(Some(user)) {
      self.refresh_after_identity_change().await;
    }
    Ok(())
  }

  /// Clear the session and the slot, then refetch both lists signed out.
  ///
  /// Succeeds once the session is cleared; a failed refetch is left in
  /// [`Session::take_refresh_error`].
  pub async fn logout(&mut self) -> Result<()> {
    self.slot.clear().await.map_err(Error::storage)?;
    if self.view.set_user(None) {
      info!("signed out");
    }
    self.refresh_after_identity_change().await;
    Ok(())
  }

  async fn refresh_after_identity_change(&mut self) {
    self.refresh_error = None;
    if let Err(e) = self.refresh().await {
      warn!(error = %e, "refetch after identity change failed");
      self.refresh_error = Some(e);
    }
  }

  // ── Account ───────────────────────────────────────────────────────────

  pub async fn register(&mut self, username: &str, password: &str) -> Result<&User> {
    required(username, "username")?;
    required(password, "password")?;
    let user = self.remote.register(username.trim(), password).await?;
    self.sign_in(user).await?;
    self.signed_in()
  }

  pub async fn login(&mut self, username: &str, password: &str) -> Result<&User> {
    required(username, "username")?;
    required(password, "password")?;
    let user = self.remote.login(username.trim(), password).await?;
    self.sign_in(user).await?;
    self.signed_in()
  }

  pub async fn change_password(&mut self, old_password: &str, new_password: &str) -> Result<()> {
    let user = self.require_user("change your password")?;
    required(old_password, "current password")?;
    required(new_password, "new password")?;
    self
      .remote
      .change_password(user.id, old_password, new_password)
      .await?;
    info!(user_id = user.id, "password changed");
    Ok(())
  }

  /// Apply a partial settings update; the returned user replaces the
  /// session user and is persisted.
  pub async fn update_preferences(&mut self, patch: PreferencesPatch) -> Result<&User> {
    let user = self.require_user("change settings")?;
    if patch.is_empty() {
      return Err(Error::ValidationFailed("nothing to update".into()));
    }
    let updated = self.remote.update_preferences(user.id, &patch).await?;
    self.slot.save(&updated).await.map_err(Error::storage)?;
    self.view.set_user(Some(updated));
    self.view.merge_own_profile();
    self.signed_in()
  }

  // ── Articles ──────────────────────────────────────────────────────────

  pub async fn create_article(&mut self, draft: ArticleDraft) -> Result<&Article> {
    let author = self.require_user("publish")?;
    required(&draft.title, "title")?;
    required(&draft.content, "content")?;
    let mut article = self
      .remote
      .create_article(
        author.id,
        draft.title.trim(),
        draft.content.trim(),
        draft.category,
      )
      .await?;
    // The create response carries no author join; fill it from the session.
    article.author_name = author.username.clone();
    article.author_avatar = author.avatar_url.clone();
    article.subscribers_count = author.subscribers_count;
    article.author_total_likes = author.likes_count;
    article.publications_count = author.publications_count;
    let id = article.id;
    info!(article_id = id, "published article");
    self.view.insert_article(article);
    self
      .view
      .article(id)
      .ok_or_else(|| Error::Decode(format!("article {id} missing after insert")))
  }

  pub async fn toggle_like(&mut self, article_id: ArticleId) -> Result<LikeState> {
    let user = self.require_user("like articles")?;
    let ticket = self.view.issue(EntityKey::ArticleLikes(article_id));
    match self.remote.toggle_like(article_id, user.id).await {
      Ok(state) => {
        self.view.apply_like(ticket, state);
        Ok(state)
      }
      Err(e) => {
        warn!(article_id, error = %e, "like failed");
        self.view.release(ticket);
        Err(e)
      }
    }
  }

  pub async fn add_comment(&mut self, article_id: ArticleId, content: &str) -> Result<Comment> {
    let user = self.require_user("comment")?;
    required(content, "comment")?;
    let ticket = self.view.issue(EntityKey::ArticleComments(article_id));
    match self
      .remote
      .add_comment(article_id, user.id, content.trim())
      .await
    {
      Ok(comment) => {
        self.view.apply_comment(ticket, comment.clone());
        Ok(comment)
      }
      Err(e) => {
        warn!(article_id, error = %e, "comment failed");
        self.view.release(ticket);
        Err(e)
      }
    }
  }

  pub fn toggle_expanded(&mut self, article_id: ArticleId) { self.view.toggle_expanded(article_id); }

  // ── Authors ───────────────────────────────────────────────────────────

  pub async fn toggle_subscribe(&mut self, author_id: UserId) -> Result<SubscriptionState> {
    let user = self.require_user("subscribe")?;
    let ticket = self.view.issue(EntityKey::Author(author_id));
    match self.remote.toggle_subscribe(user.id, author_id).await {
      Ok(state) => {
        self.view.apply_subscription(ticket, state);
        Ok(state)
      }
      Err(e) => {
        warn!(author_id, error = %e, "subscribe failed");
        self.view.release(ticket);
        Err(e)
      }
    }
  }
}
