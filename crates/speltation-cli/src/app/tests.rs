//! Key-driven tests for [`App`] over the in-memory remote.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use speltation_core::{
  article::{Category, CategoryFilter},
  fake::FakeRemote,
  session::Session,
  slot::MemorySlot,
};

use super::{App, Mode, Tab};

type TestApp = App<FakeRemote, MemorySlot>;

fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

async fn press(app: &mut TestApp, code: KeyCode) -> bool { app.handle_key(key(code)).await }

async fn type_text(app: &mut TestApp, text: &str) {
  for c in text.chars() {
    press(app, KeyCode::Char(c)).await;
  }
}

/// Two authors, one article each, started signed out.
async fn started() -> TestApp {
  let remote = FakeRemote::new();
  let alexandra = remote.seed_user("Александра Иванова", "secret1", "Технологии и медиа");
  let dmitry = remote.seed_user("Дмитрий Петров", "secret2", "Пишу о бизнесе");
  remote.seed_article(alexandra.id, "ИИ меняет медиа", Category::Technology);
  remote.seed_article(dmitry.id, "Рынок недвижимости", Category::Business);

  let mut app = App::new(Session::new(remote, MemorySlot::default()));
  app.start().await;
  app
}

async fn signed_in_as_dmitry() -> TestApp {
  let mut app = started().await;
  press(&mut app, KeyCode::Char('a')).await;
  type_text(&mut app, "Дмитрий Петров").await;
  press(&mut app, KeyCode::Tab).await;
  type_text(&mut app, "secret2").await;
  press(&mut app, KeyCode::Enter).await;
  app
}

// ─── Startup and navigation ──────────────────────────────────────────────────

#[tokio::test]
async fn start_loads_both_lists_signed_out() {
  let app = started().await;
  assert!(app.session.user().is_none());
  assert_eq!(app.visible_articles().len(), 2);
  assert_eq!(app.visible_authors().len(), 2);
  assert!(app.live_notice().is_none());
}

#[tokio::test]
async fn start_offline_reports_instead_of_failing() {
  let remote = FakeRemote::new();
  remote.set_offline(true);
  let mut app = App::new(Session::new(remote, MemorySlot::default()));
  app.start().await;
  let notice = app.live_notice().expect("notice");
  assert!(notice.is_error);
  assert!(app.visible_articles().is_empty());
}

#[tokio::test]
async fn q_and_ctrl_c_quit() {
  let mut app = started().await;
  assert!(press(&mut app, KeyCode::Char('j')).await);
  assert!(!press(&mut app, KeyCode::Char('q')).await);
  assert!(
    !app
      .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
      .await
  );
}

#[tokio::test]
async fn cursor_stays_within_the_filtered_list() {
  let mut app = started().await;
  for _ in 0..5 {
    press(&mut app, KeyCode::Down).await;
  }
  assert_eq!(app.news_cursor, 1);
  press(&mut app, KeyCode::Up).await;
  press(&mut app, KeyCode::Up).await;
  assert_eq!(app.news_cursor, 0);
}

#[tokio::test]
async fn tab_switches_between_news_and_authors() {
  let mut app = started().await;
  press(&mut app, KeyCode::Tab).await;
  assert_eq!(app.tab, Tab::Authors);
  press(&mut app, KeyCode::Tab).await;
  assert_eq!(app.tab, Tab::News);
}

#[tokio::test]
async fn detail_scroll_saturates() {
  let mut app = started().await;
  app.detail_scroll = u16::MAX;
  press(&mut app, KeyCode::Char(']')).await;
  assert_eq!(app.detail_scroll, u16::MAX);
  app.detail_scroll = 0;
  press(&mut app, KeyCode::Char('[')).await;
  assert_eq!(app.detail_scroll, 0);
}

// ─── Search and category ─────────────────────────────────────────────────────

#[tokio::test]
async fn search_narrows_articles_by_author_name() {
  let mut app = started().await;
  press(&mut app, KeyCode::Char('/')).await;
  assert_eq!(app.mode, Mode::Search);
  type_text(&mut app, "петров").await;
  let titles: Vec<_> = app.visible_articles().iter().map(|a| a.title.clone()).collect();
  assert_eq!(titles, vec!["Рынок недвижимости".to_string()]);

  // Enter leaves search mode but keeps the query.
  press(&mut app, KeyCode::Enter).await;
  assert_eq!(app.mode, Mode::Normal);
  assert_eq!(app.query, "петров");

  press(&mut app, KeyCode::Esc).await;
  assert!(app.query.is_empty());
  assert_eq!(app.visible_articles().len(), 2);
}

#[tokio::test]
async fn category_key_cycles_the_filter() {
  let mut app = started().await;
  press(&mut app, KeyCode::Char('c')).await;
  assert_eq!(app.category, CategoryFilter::Only(Category::Technology));
  assert_eq!(app.visible_articles().len(), 1);
  press(&mut app, KeyCode::Char('c')).await;
  assert_eq!(app.category, CategoryFilter::Only(Category::Business));
  assert_eq!(app.visible_articles()[0].title, "Рынок недвижимости");
}

// ─── Sign-in prompts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn signed_out_like_prompts_without_a_request() {
  let mut app = started().await;
  let before = app.session.remote().calls();
  press(&mut app, KeyCode::Char('l')).await;
  assert_eq!(app.session.remote().calls(), before);
  let notice = app.live_notice().expect("notice");
  assert!(notice.is_error);
  assert!(notice.text.contains("Sign in"));
}

#[tokio::test]
async fn signed_out_forms_do_not_open() {
  let mut app = started().await;
  for c in ['m', 'n', 'p'] {
    press(&mut app, KeyCode::Char(c)).await;
    assert_eq!(app.mode, Mode::Normal);
  }
}

// ─── Account ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_form_signs_in_and_closes() {
  let app = signed_in_as_dmitry().await;
  assert_eq!(app.mode, Mode::Normal);
  assert_eq!(
    app.session.user().map(|u| u.username.as_str()),
    Some("Дмитрий Петров")
  );
  assert!(app.session.slot().current().is_some());
}

#[tokio::test]
async fn bad_login_keeps_the_form_open() {
  let mut app = started().await;
  press(&mut app, KeyCode::Char('a')).await;
  type_text(&mut app, "Дмитрий Петров").await;
  press(&mut app, KeyCode::Tab).await;
  type_text(&mut app, "wrong").await;
  press(&mut app, KeyCode::Enter).await;

  assert!(matches!(app.mode, Mode::Auth(_)));
  assert!(app.session.user().is_none());
  assert!(app.live_notice().is_some_and(|n| n.is_error));

  press(&mut app, KeyCode::Esc).await;
  assert_eq!(app.mode, Mode::Normal);
}

#[tokio::test]
async fn register_form_creates_account() {
  let mut app = started().await;
  press(&mut app, KeyCode::Char('R')).await;
  type_text(&mut app, "Елена Смирнова").await;
  press(&mut app, KeyCode::Tab).await;
  type_text(&mut app, "pw").await;
  press(&mut app, KeyCode::Enter).await;

  assert_eq!(app.mode, Mode::Normal);
  assert_eq!(app.visible_authors().len(), 3);
}

#[tokio::test]
async fn logout_clears_user_and_slot() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Char('o')).await;
  assert!(app.session.user().is_none());
  assert!(app.session.slot().current().is_none());
}

#[tokio::test]
async fn login_with_lists_down_signs_in_and_reports() {
  let mut app = started().await;
  app.session.remote().set_lists_down(true);
  press(&mut app, KeyCode::Char('a')).await;
  type_text(&mut app, "Дмитрий Петров").await;
  press(&mut app, KeyCode::Tab).await;
  type_text(&mut app, "secret2").await;
  press(&mut app, KeyCode::Enter).await;

  assert_eq!(app.mode, Mode::Normal);
  assert_eq!(app.session.user().unwrap().username, "Дмитрий Петров");
  let notice = app.live_notice().unwrap();
  assert!(notice.is_error);
  assert!(notice.text.starts_with("Signed in as Дмитрий Петров"));
}

#[tokio::test]
async fn logout_with_lists_down_still_signs_out() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Char('l')).await;
  app.session.remote().set_lists_down(true);
  press(&mut app, KeyCode::Char('o')).await;

  assert!(app.session.user().is_none());
  assert!(app.live_notice().unwrap().is_error);
  assert!(app.visible_articles().iter().all(|a| !a.is_liked));
}

// ─── Article actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn like_key_toggles_cursor_article() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Char('l')).await;
  let article = app.cursor_article().expect("article");
  assert!(article.is_liked);
  assert_eq!(article.likes_count, 1);

  press(&mut app, KeyCode::Char('l')).await;
  assert!(!app.cursor_article().expect("article").is_liked);
}

#[tokio::test]
async fn comment_mode_posts_and_expands() {
  let mut app = signed_in_as_dmitry().await;
  let id = app.cursor_article().expect("article").id;
  press(&mut app, KeyCode::Char('m')).await;
  assert_eq!(app.mode, Mode::Comment(id));
  assert_eq!(app.session.view().expanded(), Some(id));

  type_text(&mut app, "Интересно").await;
  press(&mut app, KeyCode::Enter).await;

  assert_eq!(app.mode, Mode::Normal);
  assert!(app.comment.value.is_empty());
  let comments = &app.session.view().article(id).expect("article").comments;
  assert_eq!(comments[0].content, "Интересно");
}

#[tokio::test]
async fn failed_comment_keeps_the_text() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Char('m')).await;
  type_text(&mut app, "Интересно").await;
  app.session.remote().fail_next(500, "boom");
  press(&mut app, KeyCode::Enter).await;

  assert!(matches!(app.mode, Mode::Comment(_)));
  assert_eq!(app.comment.value, "Интересно");
}

#[tokio::test]
async fn compose_publishes_at_the_head() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Char('c')).await;
  press(&mut app, KeyCode::Char('n')).await;
  type_text(&mut app, "Новости науки").await;
  press(&mut app, KeyCode::Tab).await;
  type_text(&mut app, "Открытие").await;
  press(&mut app, KeyCode::Tab).await;
  for _ in 0..4 {
    press(&mut app, KeyCode::Right).await;
  }
  press(&mut app, KeyCode::Enter).await;

  assert_eq!(app.mode, Mode::Normal);
  assert_eq!(app.category, CategoryFilter::All);
  let head = app.cursor_article().expect("article");
  assert_eq!(head.title, "Новости науки");
  assert_eq!(head.category, Category::Science);
  assert_eq!(head.author_name, "Дмитрий Петров");
}

#[tokio::test]
async fn empty_compose_stays_open() {
  let mut app = signed_in_as_dmitry().await;
  let calls = app.session.remote().calls();
  press(&mut app, KeyCode::Char('n')).await;
  press(&mut app, KeyCode::Enter).await;
  assert!(matches!(app.mode, Mode::Compose(_)));
  assert_eq!(app.session.remote().calls(), calls);
}

// ─── Authors ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn subscribe_key_toggles_cursor_author() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Tab).await;
  let target = app
    .visible_authors()
    .iter()
    .position(|u| u.username == "Александра Иванова")
    .expect("author");
  app.authors_cursor = target;

  press(&mut app, KeyCode::Char('s')).await;
  let author = app.cursor_author().expect("author");
  assert!(author.is_subscribed);
  assert_eq!(author.subscribers_count, 1);
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_theme_toggle_switches_palette() {
  let mut app = signed_in_as_dmitry().await;
  assert!(!app.dark());
  press(&mut app, KeyCode::Char('p')).await;
  press(&mut app, KeyCode::Enter).await;
  assert!(app.dark());
  assert!(matches!(app.mode, Mode::Settings(_)));
}

#[tokio::test]
async fn sound_on_rings_the_bell_for_notices() {
  let mut app = signed_in_as_dmitry().await;
  app.take_bell();
  press(&mut app, KeyCode::Char('p')).await;
  press(&mut app, KeyCode::Down).await;
  press(&mut app, KeyCode::Char(' ')).await;
  assert!(app.session.user().is_some_and(|u| u.sound_enabled));
  assert!(app.take_bell());
  assert!(!app.take_bell());
}

#[tokio::test]
async fn settings_password_change_clears_fields() {
  let mut app = signed_in_as_dmitry().await;
  press(&mut app, KeyCode::Char('p')).await;
  for _ in 0..3 {
    press(&mut app, KeyCode::Down).await;
  }
  type_text(&mut app, "secret2").await;
  press(&mut app, KeyCode::Down).await;
  type_text(&mut app, "secret3").await;
  press(&mut app, KeyCode::Enter).await;

  let Mode::Settings(form) = &app.mode else {
    panic!("settings closed");
  };
  assert!(form.old_password.value.is_empty());
  assert!(form.new_password.value.is_empty());
  assert!(app.live_notice().is_some_and(|n| !n.is_error));
}
