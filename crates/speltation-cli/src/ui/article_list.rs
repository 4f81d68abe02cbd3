//! Article list pane; left panel of the News tab.

use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};
use speltation_core::{
  article::{CategoryFilter, time_ago},
  badge::badge_icons,
  remote::NewsRemote,
  slot::SessionSlot,
};

use super::Palette;
use crate::app::App;

/// Render the filtered article list into `area`.
pub fn draw<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  let visible = app.visible_articles();
  let total = app.session.view().articles().len();
  let now = app.now();

  let count = if visible.len() == total {
    format!("{total}")
  } else {
    format!("{}/{}", visible.len(), total)
  };
  let title = match app.category {
    CategoryFilter::All => format!(" News ({count}) "),
    other => format!(" News · {} ({count}) ", other.label()),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(palette.muted());
  let inner = block.inner(area);
  f.render_widget(block, area);
  let inner = super::draw_search_bar(f, inner, app, palette);

  let items: Vec<ListItem> = visible
    .iter()
    .map(|article| {
      let heart = if article.is_liked { "♥" } else { "♡" };
      let heart_style = if article.is_liked {
        Style::default().fg(palette.liked)
      } else {
        palette.muted()
      };
      let badges = badge_icons(article.author_standing());
      let expanded = app.session.view().expanded() == Some(article.id);

      ListItem::new(vec![
        Line::from(vec![
          Span::raw(if expanded { "▾ " } else { "▸ " }),
          Span::raw(article.title.clone()),
        ]),
        Line::from(vec![
          Span::styled(format!("  {}", article.author_name), palette.muted()),
          Span::raw(if badges.is_empty() {
            String::new()
          } else {
            format!(" {badges}")
          }),
          Span::styled(format!("  {}  ", article.category), palette.muted()),
          Span::styled(format!("{heart} {}", article.likes_count), heart_style),
          Span::styled(
            format!("  💬 {}  {}", article.comments.len(), time_ago(article.created_at, now)),
            palette.muted(),
          ),
        ]),
      ])
    })
    .collect();

  let mut state = ListState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.news_cursor)
  });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(palette.cursor())
      .highlight_symbol(""),
    inner,
    &mut state,
  );
}
