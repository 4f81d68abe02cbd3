//! An in-memory [`NewsRemote`] that behaves like the real endpoints.
//!
//! Enabled for this crate's tests and, through the `test-util` feature, for
//! downstream crates. Requests can be made to fail one at a time, and every
//! call is counted so tests can assert that nothing was sent.

use std::{
  collections::{BTreeMap, HashSet},
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
  Error, Result,
  article::{Article, ArticleId, Category, Comment, LikeState},
  remote::NewsRemote,
  user::{PreferencesPatch, SubscriptionState, User, UserId},
};

#[derive(Default)]
struct World {
  users:         BTreeMap<UserId, (User, String)>,
  articles:      Vec<Article>,
  likes:         HashSet<(ArticleId, UserId)>,
  subscriptions: HashSet<(UserId, UserId)>,
  next_id:       i64,
  fail_next:     Option<(u16, String)>,
  offline:       bool,
  lists_down:    bool,
}

impl World {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn check(&mut self) -> Result<()> {
    if self.offline {
      return Err(Error::Connectivity("connection refused".into()));
    }
    match self.fail_next.take() {
      Some((status, message)) => Err(Error::RequestFailed { status, message }),
      None => Ok(()),
    }
  }

  fn check_lists(&self) -> Result<()> {
    if self.lists_down {
      Err(Error::Connectivity("listing unavailable".into()))
    } else {
      Ok(())
    }
  }

  fn user_mut(&mut self, id: UserId) -> Result<&mut User> {
    self
      .users
      .get_mut(&id)
      .map(|(u, _)| u)
      .ok_or_else(|| rejected(404, "user not found"))
  }
}

fn rejected(status: u16, message: &str) -> Error {
  Error::RequestFailed {
    status,
    message: message.into(),
  }
}

fn epoch() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2025, 1, 1)
    .and_then(|d| d.and_hms_opt(9, 0, 0))
    .unwrap_or_default()
}

#[derive(Default)]
pub struct FakeRemote {
  world: Mutex<World>,
  calls: AtomicUsize,
}

impl FakeRemote {
  pub fn new() -> Self { Self::default() }

  fn with_world<T>(&self, f: impl FnOnce(&mut World) -> Result<T>) -> Result<T> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let mut world = self
      .world
      .lock()
      .map_err(|_| Error::Connectivity("fake remote poisoned".into()))?;
    world.check()?;
    f(&mut world)
  }

  /// Number of requests received so far.
  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  /// Make the next request fail with `status` and an `{error: message}` body.
  pub fn fail_next(&self, status: u16, message: &str) {
    if let Ok(mut w) = self.world.lock() {
      w.fail_next = Some((status, message.into()));
    }
  }

  /// While offline every request fails with a connectivity error.
  pub fn set_offline(&self, offline: bool) {
    if let Ok(mut w) = self.world.lock() {
      w.offline = offline;
    }
  }

  /// While down, both list requests fail with a connectivity error; every
  /// other request still succeeds.
  pub fn set_lists_down(&self, down: bool) {
    if let Ok(mut w) = self.world.lock() {
      w.lists_down = down;
    }
  }

  /// Seed an account directly, bypassing `register`.
  pub fn seed_user(&self, username: &str, password: &str, bio: &str) -> User {
    let mut w = match self.world.lock() {
      Ok(w) => w,
      Err(poisoned) => poisoned.into_inner(),
    };
    let id = w.next_id();
    let user = User {
      id,
      username: username.into(),
      avatar_url: None,
      bio: Some(bio.into()),
      subscribers_count: 0,
      likes_count: 0,
      publications_count: 0,
      dark_theme: false,
      sound_enabled: false,
      is_subscribed: false,
    };
    w.users.insert(id, (user.clone(), password.into()));
    user
  }

  /// Seed an article by `author_id`, bypassing `create_article`.
  pub fn seed_article(&self, author_id: UserId, title: &str, category: Category) -> ArticleId {
    let mut w = match self.world.lock() {
      Ok(w) => w,
      Err(poisoned) => poisoned.into_inner(),
    };
    let id = w.next_id();
    let article = Article {
      id,
      title: title.into(),
      content: format!("{title}: full text"),
      excerpt: format!("{title}: full text"),
      category,
      author_id,
      author_name: String::new(),
      author_avatar: None,
      subscribers_count: 0,
      author_total_likes: 0,
      publications_count: 0,
      created_at: epoch(),
      likes_count: 0,
      comments: Vec::new(),
      is_liked: false,
    };
    w.articles.insert(0, article);
    if let Some((u, _)) = w.users.get_mut(&author_id) {
      u.publications_count += 1;
    }
    id
  }

  /// Like `article_id` as `user_id` behind the client's back.
  pub fn external_like(&self, article_id: ArticleId, user_id: UserId) {
    if let Ok(mut w) = self.world.lock() {
      let _ = toggle_like_in(&mut w, article_id, user_id);
    }
  }
}

fn toggle_like_in(w: &mut World, article_id: ArticleId, user_id: UserId) -> Result<LikeState> {
  let now_liked = if w.likes.remove(&(article_id, user_id)) {
    false
  } else {
    w.likes.insert((article_id, user_id));
    true
  };
  let delta = if now_liked { 1 } else { -1 };
  let article = w
    .articles
    .iter_mut()
    .find(|a| a.id == article_id)
    .ok_or_else(|| rejected(404, "article not found"))?;
  article.likes_count += delta;
  let state = LikeState {
    is_liked:    now_liked,
    likes_count: article.likes_count,
  };
  let author_id = article.author_id;
  if let Some((u, _)) = w.users.get_mut(&author_id) {
    u.likes_count += delta;
  }
  Ok(state)
}

impl NewsRemote for FakeRemote {
  async fn register(&self, username: &str, password: &str) -> Result<User> {
    self.with_world(|w| {
      if w.users.values().any(|(u, _)| u.username == username) {
        return Err(rejected(409, "Conflict"));
      }
      let id = w.next_id();
      let user = User {
        id,
        username: username.into(),
        avatar_url: None,
        bio: None,
        subscribers_count: 0,
        likes_count: 0,
        publications_count: 0,
        dark_theme: false,
        sound_enabled: false,
        is_subscribed: false,
      };
      w.users.insert(id, (user.clone(), password.into()));
      Ok(user)
    })
  }

  async fn login(&self, username: &str, password: &str) -> Result<User> {
    self.with_world(|w| {
      w.users
        .values()
        .find(|(u, p)| u.username == username && p == password)
        .map(|(u, _)| u.clone())
        .ok_or_else(|| rejected(401, "InvalidCredentials"))
    })
  }

  async fn change_password(&self, user_id: UserId, old_password: &str, new_password: &str) -> Result<()> {
    self.with_world(|w| match w.users.get_mut(&user_id) {
      Some((_, p)) if p == old_password => {
        *p = new_password.into();
        Ok(())
      }
      _ => Err(rejected(401, "WrongPassword")),
    })
  }

  async fn update_preferences(&self, user_id: UserId, patch: &PreferencesPatch) -> Result<User> {
    self.with_world(|w| {
      let user = w.user_mut(user_id)?;
      if let Some(v) = patch.dark_theme {
        user.dark_theme = v;
      }
      if let Some(v) = patch.sound_enabled {
        user.sound_enabled = v;
      }
      if let Some(v) = &patch.bio {
        user.bio = Some(v.clone());
      }
      Ok(user.clone())
    })
  }

  async fn list_articles(&self, viewer: Option<UserId>) -> Result<Vec<Article>> {
    self.with_world(|w| {
      w.check_lists()?;
      Ok(
        w.articles
          .iter()
          .map(|a| {
            let mut a = a.clone();
            if let Some((author, _)) = w.users.get(&a.author_id) {
              a.author_name = author.username.clone();
              a.subscribers_count = author.subscribers_count;
              a.author_total_likes = author.likes_count;
              a.publications_count = author.publications_count;
            }
            a.is_liked = viewer.is_some_and(|v| w.likes.contains(&(a.id, v)));
            a
          })
          .collect(),
      )
    })
  }

  async fn create_article(
    &self,
    author_id: UserId,
    title: &str,
    content: &str,
    category: Category,
  ) -> Result<Article> {
    self.with_world(|w| {
      if title.is_empty() || content.is_empty() {
        return Err(rejected(400, "ValidationFailed"));
      }
      let id = w.next_id();
      let article = Article {
        id,
        title: title.into(),
        content: content.into(),
        excerpt: content.chars().take(200).collect(),
        category,
        author_id,
        author_name: String::new(),
        author_avatar: None,
        subscribers_count: 0,
        author_total_likes: 0,
        publications_count: 0,
        created_at: epoch(),
        likes_count: 0,
        comments: Vec::new(),
        is_liked: false,
      };
      w.articles.insert(0, article.clone());
      w.user_mut(author_id)?.publications_count += 1;
      Ok(article)
    })
  }

  async fn toggle_like(&self, article_id: ArticleId, user_id: UserId) -> Result<LikeState> {
    self.with_world(|w| toggle_like_in(w, article_id, user_id))
  }

  async fn add_comment(&self, article_id: ArticleId, author_id: UserId, content: &str) -> Result<Comment> {
    self.with_world(|w| {
      let author_name = w.user_mut(author_id)?.username.clone();
      let id = w.next_id();
      let comment = Comment {
        id,
        content: content.into(),
        author_name,
        author_avatar: None,
        created_at: epoch(),
      };
      let article = w
        .articles
        .iter_mut()
        .find(|a| a.id == article_id)
        .ok_or_else(|| rejected(404, "article not found"))?;
      article.comments.insert(0, comment.clone());
      Ok(comment)
    })
  }

  async fn list_authors(&self, viewer: Option<UserId>) -> Result<Vec<User>> {
    self.with_world(|w| {
      w.check_lists()?;
      let mut users: Vec<User> = w
        .users
        .values()
        .map(|(u, _)| {
          let mut u = u.clone();
          u.is_subscribed = viewer.is_some_and(|v| w.subscriptions.contains(&(v, u.id)));
          u.dark_theme = false;
          u.sound_enabled = false;
          u
        })
        .collect();
      users.sort_by(|a, b| b.subscribers_count.cmp(&a.subscribers_count));
      Ok(users)
    })
  }

  async fn toggle_subscribe(&self, subscriber_id: UserId, author_id: UserId) -> Result<SubscriptionState> {
    self.with_world(|w| {
      if subscriber_id == author_id {
        return Err(rejected(400, "cannot subscribe to yourself"));
      }
      let now_subscribed = if w.subscriptions.remove(&(subscriber_id, author_id)) {
        false
      } else {
        w.subscriptions.insert((subscriber_id, author_id));
        true
      };
      let author = w.user_mut(author_id)?;
      author.subscribers_count += if now_subscribed { 1 } else { -1 };
      Ok(SubscriptionState {
        is_subscribed:     now_subscribed,
        subscribers_count: author.subscribers_count,
      })
    })
  }
}
