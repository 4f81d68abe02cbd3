//! Application state machine and event dispatcher.
//!
//! Owns the [`Session`] plus everything that only matters on screen: the
//! active tab, cursors, search text, input buffers and the transient notice.

use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use speltation_core::{
  Error,
  article::{Article, ArticleId, CategoryFilter, server_now},
  filter,
  remote::NewsRemote,
  session::Session,
  slot::SessionSlot,
  user::{PreferencesPatch, User},
};

use crate::form::{AuthForm, AuthKind, ComposeForm, SettingsForm, SettingsRow, TextField};

/// How long a notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

// ─── Tab / Mode ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  News,
  Authors,
}

/// Where keystrokes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing into the search query.
  Search,
  /// Typing a comment for the given article.
  Comment(ArticleId),
  Compose(ComposeForm),
  Auth(AuthForm),
  Settings(SettingsForm),
}

// ─── Notice ───────────────────────────────────────────────────────────────────

/// One-line transient message for the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
  pub text:     String,
  pub is_error: bool,
  pub at:       Instant,
}

impl Notice {
  pub fn is_fresh(&self) -> bool { self.at.elapsed() < NOTICE_TTL }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<R, S> {
  pub session: Session<R, S>,

  pub tab:  Tab,
  pub mode: Mode,

  /// Search text shared by both tabs.
  pub query:    String,
  /// Category selector for the news tab.
  pub category: CategoryFilter,

  /// Cursor positions within the *filtered* lists.
  pub news_cursor:    usize,
  pub authors_cursor: usize,

  /// Scroll offset within the detail pane.
  pub detail_scroll: u16,

  /// Comment being typed; survives a failed submission.
  pub comment: TextField,

  pub notice: Option<Notice>,

  /// Reference clock for relative timestamps.
  pub clock: fn() -> NaiveDateTime,

  /// Set when a notice should ring the terminal bell.
  bell: bool,
}

impl<R, S> App<R, S>
where
  R: NewsRemote,
  S: SessionSlot,
{
  pub fn new(session: Session<R, S>) -> Self {
    Self {
      session,
      tab: Tab::News,
      mode: Mode::Normal,
      query: String::new(),
      category: CategoryFilter::All,
      news_cursor: 0,
      authors_cursor: 0,
      detail_scroll: 0,
      comment: TextField::default(),
      notice: None,
      clock: server_now,
      bell: false,
    }
  }

  // ── Startup ───────────────────────────────────────────────────────────────

  /// Rehydrate the session from the slot, then fetch both lists.
  pub async fn start(&mut self) {
    let restored = self
      .session
      .restore()
      .await
      .map(|u| u.map(|u| u.username.clone()));
    match restored {
      Ok(Some(name)) => self.notify(format!("Welcome back, {name}")),
      Ok(None) => {}
      Err(e) => {
        tracing::warn!(error = %e, "could not restore session");
        self.report(&e);
      }
    }
    self.reload().await;
  }

  async fn reload(&mut self) {
    match self.session.refresh().await {
      Ok(()) => self.clamp_cursors(),
      Err(e) => self.report(&e),
    }
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  pub fn notify(&mut self, text: impl Into<String>) { self.set_notice(text.into(), false); }

  /// Turn a command error into a notice. Never fatal.
  pub fn report(&mut self, e: &Error) {
    let text = match e {
      Error::AuthenticationRequired(action) => format!("Sign in to {action} (press a)"),
      other => other.to_string(),
    };
    self.set_notice(text, true);
  }

  fn set_notice(&mut self, text: String, is_error: bool) {
    if self.session.user().is_some_and(|u| u.sound_enabled) {
      self.bell = true;
    }
    self.notice = Some(Notice {
      text,
      is_error,
      at: Instant::now(),
    });
  }

  /// The notice to display, if it has not expired.
  pub fn live_notice(&self) -> Option<&Notice> { self.notice.as_ref().filter(|n| n.is_fresh()) }

  /// Whether to ring the bell; resets the request.
  pub fn take_bell(&mut self) -> bool { std::mem::take(&mut self.bell) }

  pub fn now(&self) -> NaiveDateTime { (self.clock)() }

  pub fn dark(&self) -> bool { self.session.user().is_none_or(|u| u.dark_theme) }

  // ── Filtered lists ────────────────────────────────────────────────────────

  pub fn visible_articles(&self) -> Vec<&Article> {
    filter::visible_articles(self.session.view().articles(), &self.query, self.category)
  }

  pub fn visible_authors(&self) -> Vec<&User> {
    filter::visible_authors(self.session.view().authors(), &self.query)
  }

  pub fn cursor_article(&self) -> Option<&Article> {
    self.visible_articles().get(self.news_cursor).copied()
  }

  pub fn cursor_author(&self) -> Option<&User> {
    self.visible_authors().get(self.authors_cursor).copied()
  }

  fn clamp_cursors(&mut self) {
    let news = self.visible_articles().len();
    let authors = self.visible_authors().len();
    self.news_cursor = self.news_cursor.min(news.saturating_sub(1));
    self.authors_cursor = self.authors_cursor.min(authors.saturating_sub(1));
  }

  fn reset_cursors(&mut self) {
    self.news_cursor = 0;
    self.authors_cursor = 0;
    self.detail_scroll = 0;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match std::mem::replace(&mut self.mode, Mode::Normal) {
      Mode::Normal => return self.handle_normal_key(key).await,
      Mode::Search => self.handle_search_key(key),
      Mode::Comment(id) => self.handle_comment_key(key, id).await,
      Mode::Compose(form) => self.handle_compose_key(key, form).await,
      Mode::Auth(form) => self.handle_auth_key(key, form).await,
      Mode::Settings(form) => self.handle_settings_key(key, form).await,
    }
    true
  }

  async fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      // Tabs
      KeyCode::Tab | KeyCode::BackTab => {
        self.tab = match self.tab {
          Tab::News => Tab::Authors,
          Tab::Authors => Tab::News,
        };
        self.detail_scroll = 0;
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
      KeyCode::PageDown | KeyCode::Char(']') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::PageUp | KeyCode::Char('[') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      // Search
      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Esc => {
        self.query.clear();
        self.reset_cursors();
      }
      KeyCode::Char('c') if self.tab == Tab::News => {
        self.category = self.category.next();
        self.reset_cursors();
      }

      // Articles
      KeyCode::Enter if self.tab == Tab::News => {
        if let Some(id) = self.cursor_article().map(|a| a.id) {
          self.session.toggle_expanded(id);
          self.detail_scroll = 0;
        }
      }
      KeyCode::Char('l') if self.tab == Tab::News => self.like().await,
      KeyCode::Char('m') if self.tab == Tab::News => self.open_comment(),
      KeyCode::Char('n') => self.open_compose(),

      // Authors
      KeyCode::Char('s') if self.tab == Tab::Authors => self.subscribe().await,

      // Account
      KeyCode::Char('a') => self.open_auth(AuthKind::Login),
      KeyCode::Char('R') => self.open_auth(AuthKind::Register),
      KeyCode::Char('o') => self.logout().await,
      KeyCode::Char('p') => self.open_settings(),
      KeyCode::Char('g') => {
        self.reload().await;
        self.notify("Refreshed");
      }

      _ => {}
    }
    true
  }

  fn move_cursor(&mut self, delta: isize) {
    let (cursor, len) = match self.tab {
      Tab::News => (self.news_cursor, self.visible_articles().len()),
      Tab::Authors => (self.authors_cursor, self.visible_authors().len()),
    };
    let next = cursor.saturating_add_signed(delta).min(len.saturating_sub(1));
    match self.tab {
      Tab::News => self.news_cursor = next,
      Tab::Authors => self.authors_cursor = next,
    }
    if next != cursor {
      self.detail_scroll = 0;
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.query.clear();
        self.reset_cursors();
      }
      KeyCode::Enter => {}
      KeyCode::Backspace => {
        self.query.pop();
        self.reset_cursors();
        self.mode = Mode::Search;
      }
      KeyCode::Char(c) => {
        self.query.push(c);
        self.reset_cursors();
        self.mode = Mode::Search;
      }
      _ => self.mode = Mode::Search,
    }
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn like(&mut self) {
    let Some(id) = self.cursor_article().map(|a| a.id) else {
      return;
    };
    match self.session.toggle_like(id).await {
      Ok(state) if state.is_liked => self.notify("Liked"),
      Ok(_) => self.notify("Like removed"),
      Err(e) => self.report(&e),
    }
  }

  fn open_comment(&mut self) {
    if self.session.user().is_none() {
      self.report(&Error::AuthenticationRequired("comment"));
      return;
    }
    let Some(id) = self.cursor_article().map(|a| a.id) else {
      return;
    };
    if self.session.view().expanded() != Some(id) {
      self.session.toggle_expanded(id);
    }
    self.mode = Mode::Comment(id);
  }

  async fn handle_comment_key(&mut self, key: KeyEvent, id: ArticleId) {
    match key.code {
      KeyCode::Esc => self.comment.clear(),
      KeyCode::Enter => {
        let text = self.comment.value.clone();
        match self.session.add_comment(id, &text).await {
          Ok(_) => {
            self.comment.clear();
            self.notify("Comment posted");
          }
          Err(e) => {
            self.report(&e);
            self.mode = Mode::Comment(id);
          }
        }
      }
      KeyCode::Backspace => {
        self.comment.pop();
        self.mode = Mode::Comment(id);
      }
      KeyCode::Char(c) => {
        self.comment.push(c);
        self.mode = Mode::Comment(id);
      }
      _ => self.mode = Mode::Comment(id),
    }
  }

  fn open_compose(&mut self) {
    if self.session.user().is_none() {
      self.report(&Error::AuthenticationRequired("publish"));
      return;
    }
    self.mode = Mode::Compose(ComposeForm::default());
  }

  async fn handle_compose_key(&mut self, key: KeyEvent, mut form: ComposeForm) {
    match key.code {
      KeyCode::Esc => return,
      KeyCode::Tab | KeyCode::Down => form.next_field(),
      KeyCode::Enter => {
        let created = self
          .session
          .create_article(form.draft())
          .await
          .map(|a| a.title.clone());
        match created {
          Ok(title) => {
            self.tab = Tab::News;
            self.query.clear();
            self.category = CategoryFilter::All;
            self.reset_cursors();
            self.notify(format!("Published \"{title}\""));
            return;
          }
          Err(e) => self.report(&e),
        }
      }
      KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.focus == 2 => {
        form.category = form.category.next();
      }
      KeyCode::Backspace => {
        if let Some(field) = form.focused() {
          field.pop();
        }
      }
      KeyCode::Char(c) => {
        if let Some(field) = form.focused() {
          field.push(c);
        }
      }
      _ => {}
    }
    self.mode = Mode::Compose(form);
  }

  // ── Authors ───────────────────────────────────────────────────────────────

  async fn subscribe(&mut self) {
    let Some(id) = self.cursor_author().map(|u| u.id) else {
      return;
    };
    match self.session.toggle_subscribe(id).await {
      Ok(state) if state.is_subscribed => self.notify("Subscribed"),
      Ok(_) => self.notify("Unsubscribed"),
      Err(e) => self.report(&e),
    }
  }

  // ── Account ───────────────────────────────────────────────────────────────

  fn open_auth(&mut self, kind: AuthKind) {
    if let Some(name) = self.session.user().map(|u| u.username.clone()) {
      self.notify(format!("Already signed in as {name} (press o to sign out)"));
      return;
    }
    self.mode = Mode::Auth(AuthForm::new(kind));
  }

  async fn handle_auth_key(&mut self, key: KeyEvent, mut form: AuthForm) {
    match key.code {
      KeyCode::Esc => return,
      KeyCode::Tab | KeyCode::Down | KeyCode::Up => form.next_field(),
      KeyCode::Enter => {
        let (username, password) = (form.username.value.clone(), form.password.value.clone());
        let result = match form.kind {
          AuthKind::Login => self.session.login(&username, &password).await,
          AuthKind::Register => self.session.register(&username, &password).await,
        }
        .map(|u| u.username.clone());
        match result {
          Ok(name) => {
            self.identity_changed(format!("Signed in as {name}"));
            return;
          }
          Err(e) => self.report(&e),
        }
      }
      KeyCode::Backspace => form.focused().pop(),
      KeyCode::Char(c) => form.focused().push(c),
      _ => {}
    }
    self.mode = Mode::Auth(form);
  }

  async fn logout(&mut self) {
    if self.session.user().is_none() {
      return;
    }
    match self.session.logout().await {
      Ok(()) => self.identity_changed("Signed out".to_string()),
      Err(e) => self.report(&e),
    }
  }

  /// Announce a sign-in or sign-out, folding in a failed refetch.
  fn identity_changed(&mut self, done: String) {
    self.reset_cursors();
    match self.session.take_refresh_error() {
      Some(e) => self.set_notice(format!("{done}; lists not refreshed: {e}"), true),
      None => self.notify(done),
    }
  }

  fn open_settings(&mut self) {
    match self.session.user() {
      Some(user) => self.mode = Mode::Settings(SettingsForm::for_user(user)),
      None => self.report(&Error::AuthenticationRequired("change settings")),
    }
  }

  async fn handle_settings_key(&mut self, key: KeyEvent, mut form: SettingsForm) {
    match (key.code, form.row()) {
      (KeyCode::Esc, _) => return,
      (KeyCode::Tab | KeyCode::Down, _) => form.next_row(),
      (KeyCode::BackTab | KeyCode::Up, _) => form.prev_row(),

      (KeyCode::Enter | KeyCode::Char(' '), SettingsRow::Theme) => {
        let on = !self.session.user().is_some_and(|u| u.dark_theme);
        self
          .save_preferences(
            PreferencesPatch {
              dark_theme: Some(on),
              ..Default::default()
            },
            if on { "Dark theme on" } else { "Dark theme off" },
          )
          .await;
      }
      (KeyCode::Enter | KeyCode::Char(' '), SettingsRow::Sound) => {
        let on = !self.session.user().is_some_and(|u| u.sound_enabled);
        self
          .save_preferences(
            PreferencesPatch {
              sound_enabled: Some(on),
              ..Default::default()
            },
            if on { "Sound on" } else { "Sound off" },
          )
          .await;
      }
      (KeyCode::Enter, SettingsRow::Bio) => {
        let bio = form.bio.value.trim().to_string();
        self
          .save_preferences(
            PreferencesPatch {
              bio: Some(bio),
              ..Default::default()
            },
            "Bio saved",
          )
          .await;
      }
      (KeyCode::Enter, SettingsRow::OldPassword | SettingsRow::NewPassword) => {
        let (old, new) = (form.old_password.value.clone(), form.new_password.value.clone());
        match self.session.change_password(&old, &new).await {
          Ok(()) => {
            form.old_password.clear();
            form.new_password.clear();
            self.notify("Password changed");
          }
          Err(e) => self.report(&e),
        }
      }

      (KeyCode::Backspace, _) => {
        if let Some(field) = form.focused() {
          field.pop();
        }
      }
      (KeyCode::Char(c), _) => {
        if let Some(field) = form.focused() {
          field.push(c);
        }
      }
      _ => {}
    }
    self.mode = Mode::Settings(form);
  }

  async fn save_preferences(&mut self, patch: PreferencesPatch, done: &str) {
    match self.session.update_preferences(patch).await {
      Ok(_) => self.notify(done),
      Err(e) => self.report(&e),
    }
  }
}

#[cfg(test)]
mod tests;
