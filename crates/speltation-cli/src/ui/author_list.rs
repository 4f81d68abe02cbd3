//! Author directory pane; left panel of the Authors tab.

use ratatui::{
  Frame,
  layout::Rect,
  style::Style,
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};
use speltation_core::{badge::badge_icons, remote::NewsRemote, slot::SessionSlot};

use super::Palette;
use crate::app::App;

pub fn draw<R: NewsRemote, S: SessionSlot>(
  f: &mut Frame,
  area: Rect,
  app: &App<R, S>,
  palette: &Palette,
) {
  let visible = app.visible_authors();
  let total = app.session.view().authors().len();
  let me = app.session.view().viewer_id();

  let title = if visible.len() == total {
    format!(" Authors ({total}) ")
  } else {
    format!(" Authors ({}/{}) ", visible.len(), total)
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
    .map(|author| {
      let mark = if Some(author.id) == me {
        Span::styled(" (you)", palette.muted())
      } else if author.is_subscribed {
        Span::styled(" ✓", Style::default().fg(palette.accent))
      } else {
        Span::raw("")
      };
      let badges = badge_icons(author.standing());

      ListItem::new(Line::from(vec![
        Span::raw(author.username.clone()),
        mark,
        Span::raw(if badges.is_empty() {
          String::new()
        } else {
          format!(" {badges}")
        }),
        Span::styled(format!("  {} subs", author.subscribers_count), palette.muted()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.authors_cursor)
  });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(palette.cursor())
      .highlight_symbol(""),
    inner,
    &mut state,
  );
}
