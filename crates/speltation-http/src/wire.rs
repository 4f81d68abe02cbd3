//! Request bodies and response envelopes of the three endpoints.

use serde::{Deserialize, Serialize};
use speltation_core::{
  article::{Article, ArticleId, Category, Comment},
  user::{PreferencesPatch, User, UserId},
};

// ─── Requests ─────────────────────────────────────────────────────────────────

/// `POST auth`
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuthAction<'a> {
  Register {
    username: &'a str,
    password: &'a str,
  },
  Login {
    username: &'a str,
    password: &'a str,
  },
  ChangePassword {
    user_id:      UserId,
    old_password: &'a str,
    new_password: &'a str,
  },
}

/// `PUT auth`
#[derive(Debug, Serialize)]
pub struct PreferencesBody<'a> {
  pub user_id: UserId,
  #[serde(flatten)]
  pub patch:   &'a PreferencesPatch,
}

/// `POST news`
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NewsAction<'a> {
  Create {
    title:     &'a str,
    content:   &'a str,
    category:  Category,
    author_id: UserId,
  },
  Like {
    article_id: ArticleId,
    user_id:    UserId,
  },
  Comment {
    article_id: ArticleId,
    author_id:  UserId,
    content:    &'a str,
  },
}

/// `POST users`
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UsersAction {
  Subscribe {
    subscriber_id: UserId,
    author_id:     UserId,
  },
}

// ─── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
  pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct UsersEnvelope {
  pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct ArticlesEnvelope {
  pub articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleEnvelope {
  pub article: Article,
}

#[derive(Debug, Deserialize)]
pub struct CommentEnvelope {
  pub comment: Comment,
}

/// Acknowledgement body, e.g. after a password change.
#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
  #[serde(default)]
  pub message: Option<String>,
}

/// Body of a non-success response, when the endpoint sent one.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  pub error: String,
}
