//! Modal overlays for sign-in, new posts and settings.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use speltation_core::user::User;

use super::{Palette, centered};
use crate::form::{AuthForm, ComposeForm, SettingsForm, SettingsRow, TextField};

fn overlay(f: &mut Frame, area: Rect, title: &str, height: u16, palette: &Palette) -> Rect {
  let rect = centered(area, 64, height);
  f.render_widget(Clear, rect);
  let block = Block::default()
    .title(title.to_string())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(palette.accent))
    .style(palette.text());
  let inner = block.inner(rect);
  f.render_widget(block, rect);
  inner
}

/// `label: value`, with a cursor when focused.
fn field_line(label: &str, field: &TextField, focused: bool, palette: &Palette) -> Line<'static> {
  let label_style = if focused {
    palette.heading()
  } else {
    palette.muted()
  };
  let value = if focused {
    format!("{}_", field.display())
  } else {
    field.display()
  };
  Line::from(vec![
    Span::styled(format!("{label:<18}"), label_style),
    Span::raw(value),
  ])
}

pub fn draw_auth(f: &mut Frame, area: Rect, form: &AuthForm, palette: &Palette) {
  let inner = overlay(f, area, form.title(), 7, palette);
  let lines = vec![
    field_line("Username", &form.username, form.focus == 0, palette),
    field_line("Password", &form.password, form.focus == 1, palette),
    Line::from(""),
    Line::from(Span::styled("Tab switch field  Enter submit  Esc cancel", palette.muted())),
  ];
  f.render_widget(Paragraph::new(lines), inner);
}

pub fn draw_compose(f: &mut Frame, area: Rect, form: &ComposeForm, palette: &Palette) {
  let inner = overlay(f, area, " New post ", 12, palette);
  let category_style = if form.focus == 2 {
    palette.heading()
  } else {
    palette.muted()
  };
  let lines = vec![
    field_line("Title", &form.title, form.focus == 0, palette),
    field_line("Text", &form.content, form.focus == 1, palette),
    Line::from(vec![
      Span::styled(format!("{:<18}", "Category"), category_style),
      Span::styled(
        format!("◂ {} ▸", form.category),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ]),
    Line::from(""),
    Line::from(Span::styled(
      "Tab next field  ←→ category  Enter publish  Esc cancel",
      palette.muted(),
    )),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

pub fn draw_settings(
  f: &mut Frame,
  area: Rect,
  form: &SettingsForm,
  user: &User,
  palette: &Palette,
) {
  let inner = overlay(f, area, " Settings ", 10, palette);
  let focused = form.row();
  let switch = |on: bool| if on { "[x]" } else { "[ ]" };

  let lines: Vec<Line> = SettingsRow::ALL
    .iter()
    .map(|&row| {
      let is_focused = row == focused;
      match row {
        SettingsRow::Theme | SettingsRow::Sound => {
          let on = if row == SettingsRow::Theme {
            user.dark_theme
          } else {
            user.sound_enabled
          };
          let style = if is_focused {
            palette.heading()
          } else {
            palette.muted()
          };
          Line::from(vec![
            Span::styled(format!("{:<18}", row.label()), style),
            Span::raw(switch(on)),
          ])
        }
        SettingsRow::Bio => field_line(row.label(), &form.bio, is_focused, palette),
        SettingsRow::OldPassword => field_line(row.label(), &form.old_password, is_focused, palette),
        SettingsRow::NewPassword => field_line(row.label(), &form.new_password, is_focused, palette),
      }
    })
    .chain([
      Line::from(""),
      Line::from(Span::styled(
        "↑↓ row  Space toggle  Enter save  Esc close",
        palette.muted(),
      )),
    ])
    .collect();
  f.render_widget(Paragraph::new(lines), inner);
}
