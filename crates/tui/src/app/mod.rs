use std::sync::mpsc::{channel, Receiver, Sender};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use providers::algolia::{AlgoliaClient, SearchConfig};
use ratatui::layout::{Position, Rect};
use stories_core::controller::{Applied, FetchStatus, PendingFetch, SearchController};
use stories_core::sort::SortKey;
use stories_core::stories::{FetchError, StoryPage, StorySource as _};
use stories_core::store::KeyValueStore;
use tracing::{debug, info};

pub mod input;
pub mod list;
#[cfg(test)]
pub mod testing;

type FetchOutcome = (PendingFetch, Result<StoryPage, FetchError>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Search,
    List,
}

/// Something the mouse can hit; regions are recorded on every draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    SearchBox,
    Submit,
    Recall(String),
    Sort(SortKey),
    Select(usize),
    Dismiss(String),
    More,
}

pub struct App {
    pub controller: SearchController<Box<dyn KeyValueStore>>,
    client: AlgoliaClient,
    rt: tokio::runtime::Runtime,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    pub pending: Option<PendingFetch>,
    pub input: String,
    pub input_cursor: usize,
    pub focus: Focus,
    pub selected: usize,
    pub list_offset: usize,
    pub list_viewport: usize,
    pub notice: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    pub dirty: bool,
    pub targets: Vec<(Rect, Target)>,
}

impl App {
    pub fn new(cfg: SearchConfig, store: Box<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let client = AlgoliaClient::new(cfg.clone())?;
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (tx, rx) = channel();
        let (controller, ticket) = SearchController::restore(store, &cfg.default_term);
        let mut s = Self {
            controller,
            client,
            rt,
            tx,
            rx,
            pending: None,
            input: String::new(),
            input_cursor: 0,
            focus: Focus::Search,
            selected: 0,
            list_offset: 0,
            list_viewport: 0,
            notice: None,
            show_help: false,
            should_quit: false,
            dirty: true,
            targets: Vec::new(),
        };
        let term = s.controller.active_term().to_string();
        s.set_input(&term);
        s.dispatch(ticket);
        Ok(s)
    }

    fn dispatch(&mut self, ticket: PendingFetch) {
        debug!(target: "tui", "dispatch seq={} term={} page={}", ticket.seq, ticket.term, ticket.page);
        self.pending = Some(ticket.clone());
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = client.fetch_page(&ticket.term, ticket.page).await;
            let _ = tx.send((ticket, result));
        });
        self.dirty = true;
    }

    /// Hand a finished fetch to the controller.
    pub fn deliver(&mut self, ticket: PendingFetch, result: Result<StoryPage, FetchError>) {
        let applied = self.controller.apply(&ticket, result);
        if self.pending.as_ref() == Some(&ticket) {
            self.pending = None;
        }
        if applied == Applied::Replaced {
            self.selected = 0;
            self.list_offset = 0;
        }
        self.clamp_selection();
        self.dirty = true;
    }

    pub fn on_tick(&mut self) {
        while let Ok((ticket, result)) = self.rx.try_recv() {
            self.deliver(ticket, result);
        }
    }

    pub fn submit(&mut self) {
        match self.controller.submit(&self.input) {
            Ok(ticket) => {
                let term = self.controller.active_term().to_string();
                info!(target: "tui", "submit: term={}", term);
                self.set_input(&term);
                self.notice = None;
                self.dispatch(ticket);
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn recall(&mut self, term: &str) {
        match self.controller.recall(term) {
            Ok(ticket) => {
                info!(target: "tui", "recall: term={}", term);
                self.set_input(term);
                self.notice = None;
                self.dispatch(ticket);
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn recall_slot(&mut self, slot: usize) {
        let term = self
            .controller
            .last_searches()
            .get(slot)
            .map(|s| s.to_string());
        if let Some(term) = term {
            self.recall(&term);
        }
    }

    pub fn load_more(&mut self) {
        match self.controller.load_more() {
            Ok(ticket) => {
                self.notice = None;
                self.dispatch(ticket);
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn sort_by(&mut self, key: SortKey) {
        let s = self.controller.sort_by(key);
        debug!(target: "tui", "sort key={:?} reverse={}", s.key, s.reverse);
        self.selected = 0;
        self.list_offset = 0;
    }

    pub fn dismiss(&mut self, id: &str) {
        if self.controller.dismiss(id) {
            debug!(target: "tui", "dismissed {}", id);
            self.clamp_selection();
        }
    }

    pub fn dismiss_selected(&mut self) {
        if let Some(id) = self.selected_story().map(|s| s.object_id.clone()) {
            self.dismiss(&id);
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.controller.status() {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Loaded => "loaded",
            FetchStatus::Errored => "error",
        }
    }

    pub fn click(&mut self, x: u16, y: u16) {
        let hit = self
            .targets
            .iter()
            .find(|(r, _)| r.contains(Position::new(x, y)))
            .map(|(_, t)| t.clone());
        let Some(target) = hit else {
            return;
        };
        self.dirty = true;
        match target {
            Target::SearchBox => self.focus = Focus::Search,
            Target::Submit => self.submit(),
            Target::Recall(term) => self.recall(&term),
            Target::Sort(key) => self.sort_by(key),
            Target::Select(idx) => {
                self.focus = Focus::List;
                self.selected = idx;
                self.clamp_selection();
            }
            Target::Dismiss(id) => self.dismiss(&id),
            Target::More => self.load_more(),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.dirty = true;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('n') if ctrl => self.load_more(),
            KeyCode::F(n @ 1..=5) => self.recall_slot(n as usize - 1),
            KeyCode::Char(ch) if alt => {
                if let Some(k) = sort_key_for(ch) {
                    self.sort_by(k);
                }
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Search => Focus::List,
                    Focus::List => Focus::Search,
                };
            }
            _ => match self.focus {
                Focus::Search => self.on_search_key(key, ctrl),
                Focus::List => self.on_list_key(key),
            },
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Down => self.focus = Focus::List,
            KeyCode::Backspace if ctrl => self.delete_prev_word(),
            KeyCode::Backspace => self.delete_left_grapheme(),
            KeyCode::Delete => self.delete_right_grapheme(),
            KeyCode::Left if ctrl => self.cursor_word_left(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right if ctrl => self.cursor_word_right(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            KeyCode::Char('a') if ctrl => self.cursor_home(),
            KeyCode::Char('e') if ctrl => self.cursor_end(),
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.clear_input(),
            KeyCode::Char(ch) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_text(ch.encode_utf8(&mut buf));
            }
            _ => {}
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_up(),
            KeyCode::Down | KeyCode::Char('j') => self.select_down(),
            KeyCode::PageUp => self.select_page_up(),
            KeyCode::PageDown => self.select_page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            KeyCode::Delete | KeyCode::Char('d') => self.dismiss_selected(),
            KeyCode::Char('m') => self.load_more(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(ch) => {
                if let Some(k) = sort_key_for(ch) {
                    self.sort_by(k);
                }
            }
            _ => {}
        }
    }
}

fn sort_key_for(ch: char) -> Option<SortKey> {
    match ch.to_ascii_lowercase() {
        't' => Some(SortKey::Title),
        'a' => Some(SortKey::Author),
        'c' => Some(SortKey::Comments),
        'p' => Some(SortKey::Points),
        _ => None,
    }
}
