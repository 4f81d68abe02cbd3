//! Detail pane; right panel for the article or author under the cursor.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use speltation_core::{
  article::time_ago,
  badge::{CATALOG, Standing, badges_for},
  remote::NewsRemote,
  slot::SessionSlot,
};

use super::Palette;
use crate::app::{App, Mode};

// ─── Article ──────────────────────────────────────────────────────────────────

pub fn draw_article<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  let Some(article) = app.cursor_article() else {
    draw_empty(f, area, "No articles match.", palette);
    return;
  };
  let now = app.now();
  let expanded = app.session.view().expanded() == Some(article.id);

  let block = Block::default()
    .title(format!(" {} ", article.category))
    .borders(Borders::ALL)
    .border_style(palette.muted());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![
    Line::from(Span::styled(article.title.clone(), palette.heading())),
    Line::from(vec![
      Span::raw(article.author_name.clone()),
      Span::styled(
        format!(
          "  {} subs  {}",
          article.subscribers_count,
          time_ago(article.created_at, now)
        ),
        palette.muted(),
      ),
    ]),
  ];
  lines.extend(badge_line(article.author_standing(), palette));
  lines.push(Line::from(""));

  if expanded {
    lines.extend(article.content.lines().map(|l| Line::from(l.to_string())));
  } else {
    lines.push(Line::from(article.excerpt.clone()));
    lines.push(Line::from(Span::styled("Enter to read more", palette.muted())));
  }

  lines.push(Line::from(""));
  let heart = if article.is_liked { "♥ liked" } else { "♡ like" };
  lines.push(Line::from(vec![
    Span::styled(
      format!("{heart}  {}", article.likes_count),
      if article.is_liked {
        Style::default().fg(palette.liked)
      } else {
        palette.muted()
      },
    ),
    Span::styled(format!("   💬 {}", article.comments.len()), palette.muted()),
  ]));

  if expanded {
    lines.push(Line::from(""));
    if app.mode == Mode::Comment(article.id) {
      lines.push(Line::from(vec![
        Span::styled("> ", palette.heading()),
        Span::raw(format!("{}_", app.comment.display())),
      ]));
      lines.push(Line::from(""));
    }
    if article.comments.is_empty() {
      lines.push(Line::from(Span::styled("No comments yet.", palette.muted())));
    }
    for comment in &article.comments {
      lines.push(Line::from(vec![
        Span::styled(
          comment.author_name.clone(),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", time_ago(comment.created_at, now)), palette.muted()),
      ]));
      lines.push(Line::from(format!("  {}", comment.content)));
    }
  }

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}

// ─── Author ───────────────────────────────────────────────────────────────────

pub fn draw_author<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  let Some(author) = app.cursor_author() else {
    draw_empty(f, area, "No authors match.", palette);
    return;
  };
  let standing = author.standing();

  let block = Block::default()
    .title(format!(" {} ", author.username))
    .borders(Borders::ALL)
    .border_style(palette.muted());
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![Line::from(Span::styled(author.username.clone(), palette.heading()))];
  lines.extend(badge_line(standing, palette));
  if !author.bio_or_empty().is_empty() {
    lines.push(Line::from(author.bio_or_empty().to_string()));
  }
  lines.push(Line::from(""));
  for (label, value) in [
    ("subscribers", author.subscribers_count),
    ("likes", author.likes_count),
    ("publications", author.publications_count),
  ] {
    lines.push(Line::from(vec![
      Span::styled(format!("{label:<14}"), palette.heading()),
      Span::raw(value.to_string()),
    ]));
  }

  lines.push(Line::from(""));
  let viewer = app.session.view().viewer_id();
  let relation = match viewer {
    Some(id) if id == author.id => "This is you.",
    Some(_) if author.is_subscribed => "Subscribed (s to unsubscribe)",
    Some(_) => "Not subscribed (s to subscribe)",
    None => "Sign in to subscribe.",
  };
  lines.push(Line::from(Span::styled(relation, palette.muted())));

  // Full catalog with progress, earned ones highlighted.
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled("Badges", palette.heading())));
  for badge in &CATALOG {
    let style = if badge.is_earned(standing) {
      Style::default().fg(palette.fg)
    } else {
      palette.muted()
    };
    lines.push(Line::from(vec![
      Span::styled(format!("{} {:<10}", badge.icon, badge.name), style),
      Span::styled(badge.requirement, palette.muted()),
    ]));
  }

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Earned badge icons and names, or nothing when none are earned.
fn badge_line(standing: Standing, palette: &Palette) -> Option<Line<'static>> {
  let earned = badges_for(standing);
  if earned.is_empty() {
    return None;
  }
  let spans = earned
    .iter()
    .map(|b| Span::styled(format!("{} {}  ", b.icon, b.name), Style::default().fg(palette.accent)))
    .collect::<Vec<_>>();
  Some(Line::from(spans))
}

fn draw_empty(f: &mut Frame, area: Rect, message: &str, palette: &Palette) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(palette.muted());
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(message.to_string(), palette.muted()))),
    inner,
  );
}
