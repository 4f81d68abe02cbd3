//! TUI rendering; orchestrates all panes.

pub mod article_list;
pub mod author_list;
pub mod detail;
pub mod forms;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};
use speltation_core::{remote::NewsRemote, slot::SessionSlot};

use crate::app::{App, Mode, Tab};

// ─── Palette ──────────────────────────────────────────────────────────────────

/// Colours for one theme. The signed-in user's `dark_theme` picks which.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
  pub fg:        Color,
  pub bg:        Color,
  pub bar:       Color,
  pub dim:       Color,
  pub accent:    Color,
  pub cursor_fg: Color,
  pub cursor_bg: Color,
  pub liked:     Color,
  pub error:     Color,
}

impl Palette {
  pub const DARK: Palette = Palette {
    fg:        Color::White,
    bg:        Color::Black,
    bar:       Color::DarkGray,
    dim:       Color::Gray,
    accent:    Color::Cyan,
    cursor_fg: Color::White,
    cursor_bg: Color::Blue,
    liked:     Color::LightRed,
    error:     Color::LightRed,
  };

  pub const LIGHT: Palette = Palette {
    fg:        Color::Black,
    bg:        Color::White,
    bar:       Color::Gray,
    dim:       Color::DarkGray,
    accent:    Color::Blue,
    cursor_fg: Color::White,
    cursor_bg: Color::Blue,
    liked:     Color::Red,
    error:     Color::Red,
  };

  pub fn for_theme(dark: bool) -> Self { if dark { Self::DARK } else { Self::LIGHT } }

  pub fn text(&self) -> Style { Style::default().fg(self.fg).bg(self.bg) }

  pub fn muted(&self) -> Style { Style::default().fg(self.dim) }

  pub fn heading(&self) -> Style {
    Style::default()
      .fg(self.accent)
      .add_modifier(Modifier::BOLD)
  }

  pub fn cursor(&self) -> Style {
    Style::default()
      .fg(self.cursor_fg)
      .bg(self.cursor_bg)
      .add_modifier(Modifier::BOLD)
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<R: NewsRemote, S: SessionSlot>(f: &mut Frame, app: &App<R, S>) {
  let area = f.area();
  let palette = Palette::for_theme(app.dark());
  f.render_widget(Block::default().style(palette.text()), area);

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app, &palette);
  draw_body(f, rows[1], app, &palette);
  draw_status(f, rows[2], app, &palette);

  match &app.mode {
    Mode::Auth(form) => forms::draw_auth(f, area, form, &palette),
    Mode::Compose(form) => forms::draw_compose(f, area, form, &palette),
    Mode::Settings(form) => {
      if let Some(user) = app.session.user() {
        forms::draw_settings(f, area, form, user, &palette);
      }
    }
    Mode::Normal | Mode::Search | Mode::Comment(_) => {}
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let tab = |label: &'static str, active: bool| {
    if active {
      Span::styled(format!(" {label} "), palette.cursor())
    } else {
      Span::styled(format!(" {label} "), Style::default().fg(palette.fg))
    }
  };

  let who = match app.session.user() {
    Some(user) => format!("{}  ", user.username),
    None => "signed out  ".to_string(),
  };

  let left = vec![
    Span::styled(
      " speltation ",
      Style::default()
        .fg(palette.fg)
        .add_modifier(Modifier::BOLD),
    ),
    tab("News", app.tab == Tab::News),
    tab("Authors", app.tab == Tab::Authors),
  ];
  let right = vec![
    Span::styled(who, Style::default().fg(palette.accent)),
    Span::styled(format!("{date} "), palette.muted()),
  ];

  // Simple left-right header: pad the middle.
  let used: usize = left.iter().chain(&right).map(Span::width).sum();
  let pad = (area.width as usize).saturating_sub(used);

  let mut spans = left;
  spans.push(Span::raw(" ".repeat(pad)));
  spans.extend(right);

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bar)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  // Split into left list pane (40%) and right detail pane (60%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  match app.tab {
    Tab::News => {
      article_list::draw(f, cols[0], app, palette);
      detail::draw_article(f, cols[1], app, palette);
    }
    Tab::Authors => {
      author_list::draw(f, cols[0], app, palette);
      detail::draw_author(f, cols[1], app, palette);
    }
  }
}

/// Search bar drawn along the bottom row of a list pane. Returns the area
/// left for the list itself.
pub(crate) fn draw_search_bar<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  mut inner: Rect,
  app: &App<R, S>,
  palette: &Palette,
) -> Rect {
  let searching = app.mode == Mode::Search;
  if !(searching || !app.query.is_empty()) || inner.height < 2 {
    return inner;
  }
  let bar = Rect {
    x:      inner.x,
    y:      inner.y + inner.height - 1,
    width:  inner.width,
    height: 1,
  };
  inner.height -= 1;

  let text = if searching {
    format!("/{}_", app.query)
  } else {
    format!("/{}", app.query)
  };
  f.render_widget(
    Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
    bar,
  );
  inner
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  let (mode_label, hints) = match (&app.mode, app.tab) {
    (Mode::Search, _) => ("SEARCH", "Type to filter  Enter done  Esc clear"),
    (Mode::Comment(_), _) => ("COMMENT", "Type a comment  Enter send  Esc cancel"),
    (Mode::Compose(_), _) => (
      "POST",
      "Tab next field  ←→ category  Enter publish  Esc cancel",
    ),
    (Mode::Auth(_), _) => ("ACCOUNT", "Tab next field  Enter submit  Esc cancel"),
    (Mode::Settings(_), _) => ("SETTINGS", "↑↓ row  Space toggle  Enter save  Esc close"),
    (Mode::Normal, Tab::News) => (
      "NEWS",
      "jk move  Enter open  l like  m comment  c category  / search  n post  Tab authors  q quit",
    ),
    (Mode::Normal, Tab::Authors) => (
      "AUTHORS",
      "jk move  s subscribe  / search  a sign in  R register  p settings  o sign out  q quit",
    ),
  };

  let (status, status_style) = match app.live_notice() {
    Some(n) if n.is_error => (n.text.clone(), Style::default().fg(palette.error)),
    Some(n) => (n.text.clone(), Style::default().fg(palette.fg)),
    None => (hints.to_string(), palette.muted()),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(palette.accent)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), status_style);

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(palette.bar)),
    area,
  );
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// A rectangle of `width` × `height` cells centred in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}
