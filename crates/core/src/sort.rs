use std::cmp::Ordering;

use crate::stories::Story;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    Author,
    Comments,
    Points,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Title,
        SortKey::Author,
        SortKey::Comments,
        SortKey::Points,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Title => "Title",
            SortKey::Author => "Author",
            SortKey::Comments => "Comments",
            SortKey::Points => "Points",
        }
    }

    fn compare(self, a: &Story, b: &Story) -> Ordering {
        match self {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Author => a.author.cmp(&b.author),
            SortKey::Comments => a.num_comments.cmp(&b.num_comments),
            SortKey::Points => a.points.cmp(&b.points),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub reverse: bool,
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        Self { key, reverse: false }
    }

    /// Same key flips direction; a new key starts ascending.
    pub fn toggled(current: Option<SortState>, key: SortKey) -> Self {
        match current {
            Some(s) if s.key == key => Self {
                key,
                reverse: !s.reverse,
            },
            _ => Self::ascending(key),
        }
    }

    // sort_by is stable, so equal keys keep their current order both ways.
    pub fn apply(&self, stories: &mut [Story]) {
        let key = self.key;
        if self.reverse {
            stories.sort_by(|a, b| key.compare(b, a));
        } else {
            stories.sort_by(|a, b| key.compare(a, b));
        }
    }

    pub fn arrow(&self) -> &'static str {
        if self.reverse {
            "v"
        } else {
            "^"
        }
    }
}
