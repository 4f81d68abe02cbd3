//! Articles, their comments, and the fixed category list.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{badge::Standing, user::UserId};

pub type ArticleId = i64;
pub type CommentId = i64;

// ─── Category ────────────────────────────────────────────────────────────────

/// The eight fixed article categories. The wire form is the Russian label.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  IntoStaticStr,
  EnumIter,
)]
pub enum Category {
  #[serde(rename = "Технологии")]
  #[strum(serialize = "Технологии")]
  Technology,
  #[serde(rename = "Бизнес")]
  #[strum(serialize = "Бизнес")]
  Business,
  #[serde(rename = "Культура")]
  #[strum(serialize = "Культура")]
  Culture,
  #[serde(rename = "Спорт")]
  #[strum(serialize = "Спорт")]
  Sport,
  #[serde(rename = "Наука")]
  #[strum(serialize = "Наука")]
  Science,
  #[serde(rename = "Политика")]
  #[strum(serialize = "Политика")]
  Politics,
  #[serde(rename = "Здоровье")]
  #[strum(serialize = "Здоровье")]
  Health,
  #[serde(rename = "Развлечения")]
  #[strum(serialize = "Развлечения")]
  Entertainment,
}

impl Category {
  /// The category after `self` in declaration order, wrapping around.
  pub fn next(self) -> Self {
    let all: Vec<_> = Self::iter().collect();
    let pos = all.iter().position(|c| *c == self).unwrap_or_default();
    all[(pos + 1) % all.len()]
  }
}

/// Category selector for the article filter; `All` disables the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(Category),
}

impl CategoryFilter {
  pub fn admits(self, category: Category) -> bool {
    match self {
      Self::All => true,
      Self::Only(c) => c == category,
    }
  }

  /// Cycle `All → first category → … → last category → All`.
  pub fn next(self) -> Self {
    match self {
      Self::All => Self::Only(Category::Technology),
      Self::Only(Category::Entertainment) => Self::All,
      Self::Only(c) => Self::Only(c.next()),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Only(c) => c.into(),
    }
  }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

/// A comment on an article. Comments are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:            CommentId,
  pub content:       String,
  pub author_name:   String,
  #[serde(default)]
  pub author_avatar: Option<String>,
  pub created_at:    NaiveDateTime,
}

// ─── Article ─────────────────────────────────────────────────────────────────

/// An article as returned by the news endpoint.
///
/// The listing joins in the author's display fields and counters; the create
/// response does not, so those default and are filled in by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  pub id:                 ArticleId,
  pub title:              String,
  pub content:            String,
  #[serde(default)]
  pub excerpt:            String,
  pub category:           Category,
  pub author_id:          UserId,
  #[serde(default)]
  pub author_name:        String,
  #[serde(default)]
  pub author_avatar:      Option<String>,
  /// Author's subscriber count at fetch time.
  #[serde(default)]
  pub subscribers_count:  i64,
  /// Author's total likes across all their articles.
  #[serde(default)]
  pub author_total_likes: i64,
  #[serde(default)]
  pub publications_count: i64,
  pub created_at:         NaiveDateTime,
  #[serde(default)]
  pub likes_count:        i64,
  /// Newest first, as the endpoint orders them.
  #[serde(default)]
  pub comments:           Vec<Comment>,
  /// Viewer-relative: whether the current viewer likes this article.
  #[serde(default)]
  pub is_liked:           bool,
}

impl Article {
  pub fn author_standing(&self) -> Standing {
    Standing {
      subscribers:  self.subscribers_count,
      likes:        self.author_total_likes,
      publications: self.publications_count,
    }
  }
}

/// Server answer to a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
  pub is_liked:    bool,
  pub likes_count: i64,
}

/// Fields of a new post as typed by the author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
  pub title:    String,
  pub content:  String,
  pub category: Category,
}

// ─── Relative time ───────────────────────────────────────────────────────────

/// Current time on the server's clock. Server timestamps are naive UTC.
pub fn server_now() -> NaiveDateTime { Utc::now().naive_utc() }

/// Human-readable age of `at` relative to `now`.
pub fn time_ago(at: NaiveDateTime, now: NaiveDateTime) -> String {
  let seconds = (now - at).num_seconds().max(0);
  match seconds {
    s if s < 60 => "just now".to_string(),
    s if s < 3_600 => format!("{} min ago", s / 60),
    s if s < 86_400 => format!("{} h ago", s / 3_600),
    s => format!("{} d ago", s / 86_400),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, NaiveDate};

  use super::*;

  fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
      .unwrap()
      .and_hms_opt(12, 0, 0)
      .unwrap()
  }

  #[test]
  fn listing_entry_deserialises() {
    let json = serde_json::json!({
      "id": 7,
      "title": "Выставка современного искусства",
      "content": "Более 50 художников",
      "excerpt": "Более 50 художников",
      "category": "Культура",
      "author_id": 3,
      "likes_count": 523,
      "created_at": "2025-03-01T12:00:00.123456",
      "author_name": "Елена Смирнова",
      "author_avatar": null,
      "subscribers_count": 432,
      "author_total_likes": 2341,
      "publications_count": 120,
      "comments": [{
        "id": 1,
        "content": "Отлично!",
        "author_name": "Дмитрий Петров",
        "author_avatar": null,
        "created_at": "2025-03-01T13:00:00",
        "timestamp": "1 ч назад"
      }],
      "date": "1 д назад",
      "is_liked": true
    });
    let article: Article = serde_json::from_value(json).unwrap();
    assert_eq!(article.category, Category::Culture);
    assert_eq!(article.comments.len(), 1);
    assert!(article.is_liked);
    assert_eq!(article.author_standing().publications, 120);
  }

  #[test]
  fn created_article_defaults_author_fields() {
    let json = serde_json::json!({
      "id": 8,
      "title": "t",
      "content": "c",
      "excerpt": "c",
      "category": "Спорт",
      "author_id": 1,
      "likes_count": 0,
      "created_at": "2025-03-01T12:00:00"
    });
    let article: Article = serde_json::from_value(json).unwrap();
    assert!(article.author_name.is_empty());
    assert!(article.comments.is_empty());
    assert!(!article.is_liked);
  }

  #[test]
  fn unknown_category_is_rejected() {
    let r: Result<Category, _> = serde_json::from_str("\"Погода\"");
    assert!(r.is_err());
  }

  #[test]
  fn category_display_matches_wire_label() {
    assert_eq!(Category::Technology.to_string(), "Технологии");
    assert_eq!(
      serde_json::to_string(&Category::Health).unwrap(),
      "\"Здоровье\""
    );
    assert_eq!(Category::iter().count(), 8);
  }

  #[test]
  fn category_filter_cycles_through_all_eight() {
    let mut f = CategoryFilter::All;
    let mut seen = Vec::new();
    loop {
      f = f.next();
      if f == CategoryFilter::All {
        break;
      }
      seen.push(f);
    }
    assert_eq!(seen.len(), 8);
    assert_eq!(seen[0], CategoryFilter::Only(Category::Technology));
  }

  #[test]
  fn time_ago_buckets() {
    let now = noon();
    assert_eq!(time_ago(now - Duration::seconds(5), now), "just now");
    assert_eq!(time_ago(now - Duration::minutes(12), now), "12 min ago");
    assert_eq!(time_ago(now - Duration::hours(5), now), "5 h ago");
    assert_eq!(time_ago(now - Duration::days(3), now), "3 d ago");
    // Clock skew never produces a negative age.
    assert_eq!(time_ago(now + Duration::minutes(1), now), "just now");
  }
}
