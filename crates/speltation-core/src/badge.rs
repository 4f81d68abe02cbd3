//! Achievement badges: a fixed catalog unlocked by counter thresholds.
//!
//! Badges are never stored; [`badges_for`] recomputes them from a
//! [`Standing`] every time they are displayed.

/// The counters a badge threshold can look at. Build one explicitly with
/// [`crate::user::User::standing`] or [`crate::article::Article::author_standing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Standing {
  pub subscribers:  i64,
  pub likes:        i64,
  pub publications: i64,
}

/// Which counter a badge watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
  Subscribers,
  Likes,
  Publications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
  pub id:          &'static str,
  pub name:        &'static str,
  pub icon:        &'static str,
  pub requirement: &'static str,
  pub counter:     Counter,
  pub threshold:   i64,
}

impl Badge {
  pub fn is_earned(&self, standing: Standing) -> bool {
    let value = match self.counter {
      Counter::Subscribers => standing.subscribers,
      Counter::Likes => standing.likes,
      Counter::Publications => standing.publications,
    };
    value >= self.threshold
  }
}

pub const CATALOG: [Badge; 4] = [
  Badge {
    id:          "1",
    name:        "Сердечко",
    icon:        "❤️",
    requirement: "10+ подписчиков",
    counter:     Counter::Subscribers,
    threshold:   10,
  },
  Badge {
    id:          "2",
    name:        "Меч",
    icon:        "⚔️",
    requirement: "50+ лайков",
    counter:     Counter::Likes,
    threshold:   50,
  },
  Badge {
    id:          "3",
    name:        "Звезда",
    icon:        "⭐",
    requirement: "100+ публикаций",
    counter:     Counter::Publications,
    threshold:   100,
  },
  Badge {
    id:          "4",
    name:        "Корона",
    icon:        "👑",
    requirement: "500+ подписчиков",
    counter:     Counter::Subscribers,
    threshold:   500,
  },
];

/// Badges earned at `standing`, in catalog order.
pub fn badges_for(standing: Standing) -> Vec<&'static Badge> {
  CATALOG.iter().filter(|b| b.is_earned(standing)).collect()
}

/// Concatenated icons of the earned badges, for compact display.
pub fn badge_icons(standing: Standing) -> String {
  badges_for(standing).iter().map(|b| b.icon).collect()
}
