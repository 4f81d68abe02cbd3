//! Users: both the signed-in account and the authors shown in the directory.

use serde::{Deserialize, Serialize};

use crate::badge::Standing;

pub type UserId = i64;

/// A user as returned by the auth and users endpoints.
///
/// The users listing omits the preference flags and the auth endpoint omits
/// `is_subscribed`, so both default to `false` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:                 UserId,
  pub username:           String,
  #[serde(default)]
  pub avatar_url:         Option<String>,
  #[serde(default)]
  pub bio:                Option<String>,
  #[serde(default)]
  pub subscribers_count:  i64,
  #[serde(default)]
  pub likes_count:        i64,
  #[serde(default)]
  pub publications_count: i64,
  #[serde(default)]
  pub dark_theme:         bool,
  #[serde(default)]
  pub sound_enabled:      bool,
  /// Viewer-relative: whether the current viewer subscribes to this user.
  #[serde(default)]
  pub is_subscribed:      bool,
}

impl User {
  pub fn standing(&self) -> Standing {
    Standing {
      subscribers:  self.subscribers_count,
      likes:        self.likes_count,
      publications: self.publications_count,
    }
  }

  pub fn bio_or_empty(&self) -> &str { self.bio.as_deref().unwrap_or_default() }
}

/// Partial update accepted by the preferences endpoint. Absent fields are
/// left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferencesPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dark_theme:    Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sound_enabled: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bio:           Option<String>,
}

impl PreferencesPatch {
  pub fn is_empty(&self) -> bool {
    self.dark_theme.is_none() && self.sound_enabled.is_none() && self.bio.is_none()
  }
}

/// Server answer to a subscribe toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
  pub is_subscribed:     bool,
  pub subscribers_count: i64,
}
