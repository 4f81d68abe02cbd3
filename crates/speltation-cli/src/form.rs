//! Input buffers for the modal forms.

use speltation_core::{
  article::{ArticleDraft, Category},
  user::User,
};

/// A single-line (or, for post bodies, multi-line) text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
  pub value:  String,
  /// Render as bullets.
  pub masked: bool,
}

impl TextField {
  pub fn masked() -> Self {
    Self {
      value:  String::new(),
      masked: true,
    }
  }

  pub fn with_value(value: impl Into<String>) -> Self {
    Self {
      value:  value.into(),
      masked: false,
    }
  }

  pub fn push(&mut self, c: char) { self.value.push(c); }

  pub fn pop(&mut self) { self.value.pop(); }

  pub fn clear(&mut self) { self.value.clear(); }

  /// What to draw for this field.
  pub fn display(&self) -> String {
    if self.masked {
      "•".repeat(self.value.chars().count())
    } else {
      self.value.clone()
    }
  }
}

// ─── Sign in / register ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
  Login,
  Register,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
  pub kind:     AuthKind,
  pub username: TextField,
  pub password: TextField,
  /// 0 = username, 1 = password.
  pub focus:    usize,
}

impl AuthForm {
  pub fn new(kind: AuthKind) -> Self {
    Self {
      kind,
      username: TextField::default(),
      password: TextField::masked(),
      focus: 0,
    }
  }

  pub fn focused(&mut self) -> &mut TextField {
    if self.focus == 0 { &mut self.username } else { &mut self.password }
  }

  pub fn next_field(&mut self) { self.focus = (self.focus + 1) % 2; }

  pub fn title(&self) -> &'static str {
    match self.kind {
      AuthKind::Login => " Sign in ",
      AuthKind::Register => " Register ",
    }
  }
}

// ─── New post ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeForm {
  pub title:    TextField,
  pub content:  TextField,
  pub category: Category,
  /// 0 = title, 1 = content, 2 = category.
  pub focus:    usize,
}

impl Default for ComposeForm {
  fn default() -> Self {
    Self {
      title:    TextField::default(),
      content:  TextField::default(),
      category: Category::Technology,
      focus:    0,
    }
  }
}

impl ComposeForm {
  pub fn next_field(&mut self) { self.focus = (self.focus + 1) % 3; }

  pub fn focused(&mut self) -> Option<&mut TextField> {
    match self.focus {
      0 => Some(&mut self.title),
      1 => Some(&mut self.content),
      _ => None,
    }
  }

  pub fn draft(&self) -> ArticleDraft {
    ArticleDraft {
      title:    self.title.value.clone(),
      content:  self.content.value.clone(),
      category: self.category,
    }
  }
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Rows of the settings form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
  Theme,
  Sound,
  Bio,
  OldPassword,
  NewPassword,
}

impl SettingsRow {
  pub const ALL: [SettingsRow; 5] = [
    SettingsRow::Theme,
    SettingsRow::Sound,
    SettingsRow::Bio,
    SettingsRow::OldPassword,
    SettingsRow::NewPassword,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::Theme => "Dark theme",
      Self::Sound => "Sound",
      Self::Bio => "Bio",
      Self::OldPassword => "Current password",
      Self::NewPassword => "New password",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
  pub bio:          TextField,
  pub old_password: TextField,
  pub new_password: TextField,
  pub focus:        usize,
}

impl SettingsForm {
  pub fn for_user(user: &User) -> Self {
    Self {
      bio:          TextField::with_value(user.bio_or_empty()),
      old_password: TextField::masked(),
      new_password: TextField::masked(),
      focus:        0,
    }
  }

  pub fn row(&self) -> SettingsRow {
    SettingsRow::ALL[self.focus % SettingsRow::ALL.len()]
  }

  pub fn next_row(&mut self) { self.focus = (self.focus + 1) % SettingsRow::ALL.len(); }

  pub fn prev_row(&mut self) {
    self.focus = (self.focus + SettingsRow::ALL.len() - 1) % SettingsRow::ALL.len();
  }

  pub fn focused(&mut self) -> Option<&mut TextField> {
    match self.row() {
      SettingsRow::Bio => Some(&mut self.bio),
      SettingsRow::OldPassword => Some(&mut self.old_password),
      SettingsRow::NewPassword => Some(&mut self.new_password),
      SettingsRow::Theme | SettingsRow::Sound => None,
    }
  }
}
