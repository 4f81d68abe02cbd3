//! The view state store: everything the presentation layer renders from.
//!
//! Mutations are never guessed locally. Each request takes a [`Ticket`] for
//! the entity it touches; when the response lands it is merged only if that
//! ticket is still the newest one for the entity, so a slow response cannot
//! overwrite the result of a later click.

use std::collections::HashMap;

use crate::{
  article::{Article, ArticleId, Comment, LikeState},
  user::{SubscriptionState, User, UserId},
};

// ─── Tickets ─────────────────────────────────────────────────────────────────

/// The entity fields a pending request will modify. Requests that touch
/// disjoint fields of one entity get distinct keys and never supersede each
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
  /// `is_liked` and `likes_count` of an article.
  ArticleLikes(ArticleId),
  /// The comment list of an article.
  ArticleComments(ArticleId),
  /// `is_subscribed` and `subscribers_count` of an author.
  Author(UserId),
}

/// Proof of issue for one request against one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
  key: EntityKey,
  seq: u64,
}

/// Issued before a list refresh; remembers which viewer it was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket {
  viewer: Option<UserId>,
  seq:    u64,
}

// ─── ViewState ───────────────────────────────────────────────────────────────

/// Session user, fetched lists and selection.
#[derive(Debug, Default)]
pub struct ViewState {
  user:     Option<User>,
  articles: Vec<Article>,
  authors:  Vec<User>,
  expanded: Option<ArticleId>,

  next_seq:       u64,
  pending:        HashMap<EntityKey, u64>,
  latest_refresh: u64,
}

impl ViewState {
  pub fn user(&self) -> Option<&User> { self.user.as_ref() }

  pub fn viewer_id(&self) -> Option<UserId> { self.user.as_ref().map(|u| u.id) }

  pub fn articles(&self) -> &[Article] { &self.articles }

  pub fn authors(&self) -> &[User] { &self.authors }

  pub fn article(&self, id: ArticleId) -> Option<&Article> {
    self.articles.iter().find(|a| a.id == id)
  }

  pub fn author(&self, id: UserId) -> Option<&User> {
    self.authors.iter().find(|u| u.id == id)
  }

  pub fn expanded(&self) -> Option<ArticleId> { self.expanded }

  // ── Session ───────────────────────────────────────────────────────────

  /// Replace the session user. Returns `true` if the viewer identity changed,
  /// in which case the caller must refresh both lists.
  ///
  /// On a change the viewer-relative flags are cleared at once, so the lists
  /// never show the previous viewer's likes or subscriptions, even when the
  /// refresh that follows fails.
  pub fn set_user(&mut self, user: Option<User>) -> bool {
    let changed = self.viewer_id() != user.as_ref().map(|u| u.id);
    self.user = user;
    if changed {
      // Outstanding responses were computed for the previous viewer.
      self.pending.clear();
      for article in &mut self.articles {
        article.is_liked = false;
      }
      for author in &mut self.authors {
        author.is_subscribed = false;
      }
    }
    changed
  }

  /// Copy the session user's profile fields onto their own entry in the
  /// author directory.
  pub fn merge_own_profile(&mut self) {
    let Some(me) = &self.user else {
      return;
    };
    if let Some(entry) = self.authors.iter_mut().find(|u| u.id == me.id) {
      entry.username = me.username.clone();
      entry.avatar_url = me.avatar_url.clone();
      entry.bio = me.bio.clone();
    }
  }

  // ── Selection ─────────────────────────────────────────────────────────

  /// Expand `id`, or collapse it if it is already expanded.
  pub fn toggle_expanded(&mut self, id: ArticleId) {
    self.expanded = if self.expanded == Some(id) { None } else { Some(id) };
  }

  // ── Versioning ────────────────────────────────────────────────────────

  fn bump(&mut self) -> u64 {
    self.next_seq += 1;
    self.next_seq
  }

  /// Register a pending request for `key`, superseding any earlier one.
  pub fn issue(&mut self, key: EntityKey) -> Ticket {
    let seq = self.bump();
    self.pending.insert(key, seq);
    Ticket { key, seq }
  }

  /// Forget `ticket` after its request failed, unless it was already
  /// superseded.
  pub fn release(&mut self, ticket: Ticket) {
    if self.pending.get(&ticket.key) == Some(&ticket.seq) {
      self.pending.remove(&ticket.key);
    }
  }

  /// Consume `ticket`; `true` if it is still the newest for its entity.
  fn redeem(&mut self, ticket: Ticket) -> bool {
    if self.pending.get(&ticket.key) == Some(&ticket.seq) {
      self.pending.remove(&ticket.key);
      true
    } else {
      tracing::debug!(?ticket.key, "dropping superseded response");
      false
    }
  }

  pub fn issue_refresh(&mut self) -> RefreshTicket {
    let seq = self.bump();
    self.latest_refresh = seq;
    RefreshTicket {
      viewer: self.viewer_id(),
      seq,
    }
  }

  // ── Merging responses ─────────────────────────────────────────────────

  /// Install freshly fetched lists. Dropped if the viewer changed or a newer
  /// refresh was issued meanwhile.
  pub fn apply_refresh(
    &mut self,
    ticket: RefreshTicket,
    articles: Vec<Article>,
    authors: Vec<User>,
  ) -> bool {
    if ticket.seq != self.latest_refresh || ticket.viewer != self.viewer_id() {
      tracing::debug!("dropping stale list refresh");
      return false;
    }
    self.articles = articles;
    self.authors = authors;
    if let Some(id) = self.expanded
      && self.article(id).is_none()
    {
      self.expanded = None;
    }
    true
  }

  /// Overwrite `is_liked` and `likes_count` together from the server.
  pub fn apply_like(&mut self, ticket: Ticket, state: LikeState) -> bool {
    let EntityKey::ArticleLikes(id) = ticket.key else {
      return false;
    };
    if !self.redeem(ticket) {
      return false;
    }
    match self.articles.iter_mut().find(|a| a.id == id) {
      Some(article) => {
        article.is_liked = state.is_liked;
        article.likes_count = state.likes_count;
        true
      }
      None => false,
    }
  }

  /// Overwrite `is_subscribed` and `subscribers_count` together.
  pub fn apply_subscription(&mut self, ticket: Ticket, state: SubscriptionState) -> bool {
    let EntityKey::Author(id) = ticket.key else {
      return false;
    };
    if !self.redeem(ticket) {
      return false;
    }
    match self.authors.iter_mut().find(|u| u.id == id) {
      Some(author) => {
        author.is_subscribed = state.is_subscribed;
        author.subscribers_count = state.subscribers_count;
        true
      }
      None => false,
    }
  }

  /// Insert a new comment at the head of its article's comments.
  ///
  /// Comments are append-only, so a comment is never dropped as superseded;
  /// the ticket only has to belong to the right article.
  pub fn apply_comment(&mut self, ticket: Ticket, comment: Comment) -> bool {
    let EntityKey::ArticleComments(id) = ticket.key else {
      return false;
    };
    self.release(ticket);
    match self.articles.iter_mut().find(|a| a.id == id) {
      Some(article) => {
        if article.comments.iter().any(|c| c.id == comment.id) {
          return false;
        }
        article.comments.insert(0, comment);
        true
      }
      None => false,
    }
  }

  /// Put a newly created article at the head of the list.
  pub fn insert_article(&mut self, article: Article) {
    if self.article(article.id).is_none() {
      self.articles.insert(0, article);
    }
  }
}
