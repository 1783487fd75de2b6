use thiserror::Error;
use tracing::{debug, info, warn};

use crate::history::SearchHistory;
use crate::sort::{SortKey, SortState};
use crate::stories::{FetchError, Story, StoryPage, StorySource};
use crate::store::{KeyValueStore, SEARCH_KEY};

/// Term used when nothing has been persisted yet.
pub const DEFAULT_TERM: &str = "React";

/// A fetch the adapter must run and hand back through [`SearchController::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFetch {
    pub seq: u64,
    pub term: String,
    pub page: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Replaced,
    Appended,
    Failed,
    Stale,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("search term is empty")] EmptyTerm,
    #[error("'{0}' is not in the search history")] NotInHistory(String),
    #[error("no page loaded for the active term")] NothingLoaded,
    #[error("a fetch is already in flight")] FetchInFlight,
}

pub struct SearchController<S> {
    store: S,
    history: SearchHistory,
    active: String,
    stories: Vec<Story>,
    sort: Option<SortState>,
    status: FetchStatus,
    last_error: Option<FetchError>,
    loaded_page: Option<u32>,
    nb_pages: Option<u32>,
    last_page_len: usize,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl<S: KeyValueStore> SearchController<S> {
    /// Picks the persisted term (or `default_term`) and issues its first page.
    pub fn restore(store: S, default_term: &str) -> (Self, PendingFetch) {
        let fallback = match default_term.trim() {
            "" => DEFAULT_TERM,
            t => t,
        };
        let active = store
            .get(SEARCH_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        let mut c = Self {
            store,
            history: SearchHistory::new(),
            active: String::new(),
            stories: Vec::new(),
            sort: None,
            status: FetchStatus::Idle,
            last_error: None,
            loaded_page: None,
            nb_pages: None,
            last_page_len: 0,
            next_seq: 0,
            in_flight: None,
        };
        info!(target: "core::controller", "restore: active={}", active);
        let ticket = c.activate(active);
        (c, ticket)
    }

    pub fn submit(&mut self, term: &str) -> Result<PendingFetch, ControlError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ControlError::EmptyTerm);
        }
        self.remember_active(term);
        Ok(self.activate(term.to_string()))
    }

    /// Re-run a remembered term. It leaves the recall list and the term it
    /// replaces takes the newest slot.
    pub fn recall(&mut self, term: &str) -> Result<PendingFetch, ControlError> {
        if !self.history.contains(term) {
            return Err(ControlError::NotInHistory(term.to_string()));
        }
        self.remember_active(term);
        Ok(self.activate(term.to_string()))
    }

    pub fn load_more(&mut self) -> Result<PendingFetch, ControlError> {
        if self.in_flight.is_some() {
            return Err(ControlError::FetchInFlight);
        }
        let Some(page) = self.loaded_page else {
            return Err(ControlError::NothingLoaded);
        };
        Ok(self.issue(page + 1))
    }

    pub fn dismiss(&mut self, story_id: &str) -> bool {
        match self.stories.iter().position(|s| s.object_id == story_id) {
            Some(idx) => {
                self.stories.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn sort_by(&mut self, key: SortKey) -> SortState {
        let next = SortState::toggled(self.sort, key);
        next.apply(&mut self.stories);
        self.sort = Some(next);
        next
    }

    /// Applies a finished fetch. Only the most recently issued ticket is
    /// accepted; anything older is dropped untouched.
    pub fn apply(&mut self, ticket: &PendingFetch, result: Result<StoryPage, FetchError>) -> Applied {
        if self.in_flight != Some(ticket.seq) || ticket.term != self.active {
            debug!(target: "core::controller", "stale response seq={} term={} page={}", ticket.seq, ticket.term, ticket.page);
            return Applied::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(page) => {
                let n = page.hits.len();
                let applied = if ticket.page == 0 {
                    self.stories = page.hits;
                    Applied::Replaced
                } else {
                    self.stories.extend(page.hits);
                    Applied::Appended
                };
                if let Some(sort) = self.sort {
                    sort.apply(&mut self.stories);
                }
                self.loaded_page = Some(ticket.page);
                self.nb_pages = page.nb_pages;
                self.last_page_len = n;
                self.status = FetchStatus::Loaded;
                self.last_error = None;
                info!(target: "core::controller", "loaded term={} page={} hits={} total={}", ticket.term, ticket.page, n, self.stories.len());
                applied
            }
            Err(e) => {
                warn!(target: "core::controller", "fetch failed term={} page={}: {}", ticket.term, ticket.page, e);
                self.status = FetchStatus::Errored;
                self.last_error = Some(e);
                Applied::Failed
            }
        }
    }

    /// Runs `ticket` against `source` and applies the outcome.
    pub async fn fetch_with<F: StorySource>(&mut self, ticket: PendingFetch, source: &F) -> Applied {
        let result = source.fetch_page(&ticket.term, ticket.page).await;
        self.apply(&ticket, result)
    }

    /// Moves the outgoing active term into the history when `next` differs.
    fn remember_active(&mut self, next: &str) {
        if next == self.active {
            return;
        }
        self.history.remove(next);
        if let Some(evicted) = self.history.push(&self.active) {
            debug!(target: "core::controller", "history evicted {}", evicted);
        }
    }

    fn activate(&mut self, term: String) -> PendingFetch {
        if let Err(e) = self.store.set(SEARCH_KEY, &term) {
            warn!(target: "core::controller", "persist search term failed: {}", e);
        }
        self.active = term;
        self.loaded_page = None;
        self.nb_pages = None;
        self.last_page_len = 0;
        self.issue(0)
    }

    fn issue(&mut self, page: u32) -> PendingFetch {
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        self.status = FetchStatus::Loading;
        self.last_error = None;
        PendingFetch {
            seq: self.next_seq,
            term: self.active.clone(),
            page,
        }
    }
}

impl<S> SearchController<S> {
    pub fn active_term(&self) -> &str {
        &self.active
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Remembered terms offered for recall, oldest first. Never holds the
    /// active term.
    pub fn last_searches(&self) -> Vec<&str> {
        self.history.iter().collect()
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn loaded_page(&self) -> Option<u32> {
        self.loaded_page
    }

    pub fn has_more(&self) -> bool {
        let Some(page) = self.loaded_page else {
            return false;
        };
        match self.nb_pages {
            Some(total) => page + 1 < total,
            None => self.last_page_len > 0,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::store::MemoryStore;

    fn page(prefix: &str, n: usize) -> StoryPage {
        StoryPage {
            hits: (0..n)
                .map(|i| Story {
                    object_id: format!("{prefix}-{i}"),
                    title: format!("{prefix} story {i:02}"),
                    url: Some(format!("https://example.com/{prefix}/{i}")),
                    author: format!("author{}", i % 3),
                    num_comments: i as u32,
                    points: (n - i) as u32,
                })
                .collect(),
            page: 0,
            nb_pages: None,
        }
    }

    fn restored() -> (SearchController<MemoryStore>, PendingFetch) {
        SearchController::restore(MemoryStore::new(), DEFAULT_TERM)
    }

    fn loaded(n: usize) -> SearchController<MemoryStore> {
        let (mut c, t) = restored();
        assert_eq!(c.apply(&t, Ok(page("react", n))), Applied::Replaced);
        c
    }

    #[test]
    fn restore_defaults_and_persists_initial_term() {
        let (c, t) = restored();
        assert_eq!(c.active_term(), "React");
        assert_eq!(t.term, "React");
        assert_eq!(t.page, 0);
        assert_eq!(c.store().get(SEARCH_KEY).as_deref(), Some("React"));
        assert_eq!(c.status(), FetchStatus::Loading);
        assert!(c.last_searches().is_empty());
    }

    #[test]
    fn restore_prefers_stored_term() {
        let store = MemoryStore::with_entry(SEARCH_KEY, "Cypress");
        let (c, t) = SearchController::restore(store, DEFAULT_TERM);
        assert_eq!(c.active_term(), "Cypress");
        assert_eq!(t.term, "Cypress");
    }

    #[test]
    fn blank_default_falls_back() {
        let (c, _) = SearchController::restore(MemoryStore::new(), "   ");
        assert_eq!(c.active_term(), DEFAULT_TERM);
    }

    #[test]
    fn submit_sets_and_persists_active_term() {
        let mut c = loaded(20);
        let t = c.submit("  Cypress ").unwrap();
        assert_eq!(t.term, "Cypress");
        assert_eq!(t.page, 0);
        assert_eq!(c.apply(&t, Ok(page("cy", 2))), Applied::Replaced);
        assert_eq!(c.active_term(), "Cypress");
        assert_eq!(c.store().get(SEARCH_KEY).as_deref(), Some("Cypress"));
        assert_eq!(c.stories().len(), 2);
        assert_eq!(c.last_searches(), vec!["React"]);
    }

    #[test]
    fn empty_term_is_rejected() {
        let mut c = loaded(1);
        assert_eq!(c.submit("   "), Err(ControlError::EmptyTerm));
        assert_eq!(c.active_term(), "React");
        assert!(!c.is_loading());
    }

    #[test]
    fn same_term_twice_is_not_duplicated() {
        let mut c = loaded(1);
        c.submit("Cypress").unwrap();
        c.submit("Cypress").unwrap();
        assert_eq!(c.last_searches(), vec!["React"]);
        c.submit("React").unwrap();
        assert_eq!(c.last_searches(), vec!["Cypress"]);
    }

    #[test]
    fn five_previous_terms_stay_recallable() {
        let mut c = loaded(1);
        for t in ["one", "two", "three", "four", "five"] {
            c.submit(t).unwrap();
        }
        assert_eq!(c.active_term(), "five");
        assert_eq!(c.last_searches(), vec!["React", "one", "two", "three", "four"]);
    }

    #[test]
    fn sixth_distinct_term_evicts_oldest() {
        let mut c = loaded(1);
        for t in ["one", "two", "three", "four", "five", "six"] {
            c.submit(t).unwrap();
        }
        assert_eq!(c.history().len(), 5);
        assert!(!c.history().contains("React"));
        assert!(!c.history().contains("six"));
        assert_eq!(c.last_searches(), vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn load_more_appends_next_page() {
        let mut c = loaded(20);
        let t = c.load_more().unwrap();
        assert_eq!(t.page, 1);
        assert_eq!(t.term, "React");
        assert_eq!(c.apply(&t, Ok(page("more", 20))), Applied::Appended);
        assert_eq!(c.stories().len(), 40);
        assert_eq!(c.loaded_page(), Some(1));
        assert_eq!(c.stories()[0].object_id, "react-0");
        assert_eq!(c.stories()[20].object_id, "more-0");
    }

    #[test]
    fn load_more_needs_a_loaded_page() {
        let (mut c, t) = restored();
        assert_eq!(c.load_more(), Err(ControlError::FetchInFlight));
        c.apply(&t, Err(FetchError::Server { status: 500 }));
        assert_eq!(c.load_more(), Err(ControlError::NothingLoaded));
    }

    #[test]
    fn has_more_follows_page_count() {
        let (mut c, t) = restored();
        assert!(!c.has_more());
        let mut p = page("react", 20);
        p.nb_pages = Some(2);
        c.apply(&t, Ok(p));
        assert!(c.has_more());
        let t = c.load_more().unwrap();
        let mut p = page("more", 20);
        p.nb_pages = Some(2);
        c.apply(&t, Ok(p));
        assert!(!c.has_more());
    }

    #[test]
    fn empty_page_without_count_ends_paging() {
        let (mut c, t) = restored();
        c.apply(&t, Ok(StoryPage::default()));
        assert!(!c.has_more());
        assert!(c.stories().is_empty());
    }

    #[test]
    fn dismiss_removes_only_target() {
        let mut c = loaded(2);
        let keep = c.stories()[1].clone();
        assert!(c.dismiss("react-0"));
        assert_eq!(c.stories(), &[keep]);
        assert!(!c.dismiss("react-0"));
        assert_eq!(c.stories().len(), 1);
    }

    #[test]
    fn sort_by_title_toggles_direction() {
        let mut c = loaded(3);
        let s = c.sort_by(SortKey::Title);
        assert!(!s.reverse);
        assert_eq!(c.stories()[0].title, "react story 00");
        let s = c.sort_by(SortKey::Title);
        assert!(s.reverse);
        assert_eq!(c.stories()[0].title, "react story 02");
        assert!(!c.is_loading());
    }

    #[test]
    fn sort_survives_load_more() {
        let mut c = loaded(3);
        c.sort_by(SortKey::Comments);
        c.sort_by(SortKey::Comments);
        let t = c.load_more().unwrap();
        c.apply(&t, Ok(page("more", 5)));
        let counts: Vec<u32> = c.stories().iter().map(|s| s.num_comments).collect();
        assert_eq!(counts, vec![4, 3, 2, 2, 1, 1, 0, 0]);
    }

    #[test]
    fn failures_keep_list_and_set_error() {
        for err in [
            FetchError::Server { status: 500 },
            FetchError::Network("connection refused".into()),
        ] {
            let mut c = loaded(2);
            let t = c.submit("Cypress").unwrap();
            assert!(!c.is_error());
            assert_eq!(c.apply(&t, Err(err.clone())), Applied::Failed);
            assert!(c.is_error());
            assert_eq!(c.last_error(), Some(&err));
            assert_eq!(c.status(), FetchStatus::Errored);
            assert_eq!(c.stories().len(), 2);
            assert_eq!(c.active_term(), "Cypress");
            assert_eq!(c.last_searches(), vec!["React"]);
        }
    }

    #[test]
    fn initial_failure_leaves_list_empty() {
        let (mut c, t) = restored();
        c.apply(&t, Err(FetchError::Network("refused".into())));
        assert!(c.stories().is_empty());
        assert!(c.is_error());
    }

    #[test]
    fn recall_restores_term_with_fresh_first_page() {
        let mut c = loaded(20);
        let t = c.submit("Cypress").unwrap();
        c.apply(&t, Ok(page("cy", 2)));
        let t = c.recall("React").unwrap();
        assert_eq!(t.page, 0);
        assert_eq!(t.term, "React");
        assert_eq!(c.store().get(SEARCH_KEY).as_deref(), Some("React"));
        c.apply(&t, Ok(page("react", 20)));
        assert_eq!(c.stories().len(), 20);
        assert_eq!(c.last_searches(), vec!["Cypress"]);
    }

    #[test]
    fn recall_swaps_slot_with_active_term() {
        let mut c = loaded(1);
        for t in ["one", "two", "three", "four", "five"] {
            c.submit(t).unwrap();
        }
        c.recall("two").unwrap();
        assert_eq!(c.active_term(), "two");
        assert_eq!(c.last_searches(), vec!["React", "one", "three", "four", "five"]);
    }

    #[test]
    fn recall_unknown_term_is_rejected() {
        let mut c = loaded(1);
        assert_eq!(
            c.recall("Vue"),
            Err(ControlError::NotInHistory("Vue".into()))
        );
        assert!(!c.is_loading());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut c = loaded(3);
        let slow = c.submit("Cypress").unwrap();
        let fast = c.submit("Rust").unwrap();
        assert_eq!(c.apply(&fast, Ok(page("rust", 1))), Applied::Replaced);
        assert_eq!(c.apply(&slow, Ok(page("cy", 20))), Applied::Stale);
        assert_eq!(c.stories().len(), 1);
        assert_eq!(c.stories()[0].object_id, "rust-0");
        assert_eq!(c.apply(&fast, Ok(page("rust", 9))), Applied::Stale);
    }

    #[test]
    fn stale_more_page_is_discarded_after_new_search() {
        let mut c = loaded(20);
        let more = c.load_more().unwrap();
        let fresh = c.submit("Cypress").unwrap();
        assert_eq!(c.apply(&more, Ok(page("more", 20))), Applied::Stale);
        assert_eq!(c.stories().len(), 20);
        assert_eq!(c.apply(&fresh, Err(FetchError::Server { status: 503 })), Applied::Failed);
        assert_eq!(c.stories().len(), 20);
    }

    struct FakeSource {
        pages: HashMap<(String, u32), Result<StoryPage, FetchError>>,
    }

    impl StorySource for FakeSource {
        async fn fetch_page(&self, term: &str, page: u32) -> Result<StoryPage, FetchError> {
            self.pages
                .get(&(term.to_string(), page))
                .cloned()
                .unwrap_or(Err(FetchError::Server { status: 404 }))
        }
    }

    #[tokio::test]
    async fn fetch_with_drives_a_source() {
        let mut pages = HashMap::new();
        pages.insert(("React".to_string(), 0), Ok(page("react", 20)));
        pages.insert(("React".to_string(), 1), Ok(page("more", 20)));
        let src = FakeSource { pages };

        let (mut c, t) = restored();
        assert_eq!(c.fetch_with(t, &src).await, Applied::Replaced);
        let t = c.load_more().unwrap();
        assert_eq!(c.fetch_with(t, &src).await, Applied::Appended);
        assert_eq!(c.stories().len(), 40);

        let t = c.submit("Cypress").unwrap();
        assert_eq!(c.fetch_with(t, &src).await, Applied::Failed);
        assert_eq!(c.stories().len(), 40);
        assert_eq!(c.last_error(), Some(&FetchError::Server { status: 404 }));
    }
}
