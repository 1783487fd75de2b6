use std::collections::VecDeque;

/// Number of distinct terms remembered besides the active one.
pub const HISTORY_LIMIT: usize = 5;

/// Distinct previously searched terms, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHistory {
    terms: VecDeque<String>,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchHistory {
    pub fn new() -> Self {
        Self {
            terms: VecDeque::with_capacity(HISTORY_LIMIT + 1),
        }
    }

    /// Record `term` as the most recent entry. An existing entry is moved
    /// rather than duplicated. Returns the evicted term, if any.
    pub fn push(&mut self, term: &str) -> Option<String> {
        if self.latest() == Some(term) {
            return None;
        }
        if let Some(pos) = self.terms.iter().position(|t| t == term) {
            self.terms.remove(pos);
        }
        self.terms.push_back(term.to_string());
        if self.terms.len() > HISTORY_LIMIT {
            self.terms.pop_front()
        } else {
            None
        }
    }

    /// Drop `term` if present. Returns whether it was there.
    pub fn remove(&mut self, term: &str) -> bool {
        match self.terms.iter().position(|t| t == term) {
            Some(pos) => {
                self.terms.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn latest(&self) -> Option<&str> {
        self.terms.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
