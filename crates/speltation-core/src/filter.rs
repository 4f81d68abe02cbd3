//! Derived views over the fetched lists: plain case-insensitive substring
//! search plus the article category selector.

use crate::{
  article::{Article, CategoryFilter},
  user::User,
};

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
  haystack.to_lowercase().contains(needle_lower)
}

/// Articles whose title or author name contains `query` and whose category
/// passes `category`. An empty query matches every article.
pub fn visible_articles<'a>(
  all: &'a [Article],
  query: &str,
  category: CategoryFilter,
) -> Vec<&'a Article> {
  let needle = query.to_lowercase();
  all
    .iter()
    .filter(|a| category.admits(a.category))
    .filter(|a| {
      needle.is_empty()
        || contains_folded(&a.title, &needle)
        || contains_folded(&a.author_name, &needle)
    })
    .collect()
}

/// Users whose username or bio contains `query`.
pub fn visible_authors<'a>(all: &'a [User], query: &str) -> Vec<&'a User> {
  let needle = query.to_lowercase();
  all
    .iter()
    .filter(|u| {
      needle.is_empty()
        || contains_folded(&u.username, &needle)
        || contains_folded(u.bio_or_empty(), &needle)
    })
    .collect()
}
