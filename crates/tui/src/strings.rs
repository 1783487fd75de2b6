// Centralized UI strings and labels. ASCII-friendly by default.

use stories_core::sort::{SortKey, SortState};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub const TITLE_APP: &str = " Hacker Stories ";
pub const TITLE_SEARCH: &str = " Search ";
pub const TITLE_STORIES: &str = " Stories ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";

pub const LABEL_SUBMIT: &str = "Submit";
pub const LABEL_MORE: &str = "More";
pub const LABEL_LAST_SEARCHES: &str = "Last searches: ";
pub const LABEL_DISMISS: &str = "[x]";
pub const LABEL_ACTIONS: &str = "Act";
pub const LABEL_LINK: &str = "Link";

pub const MSG_ERROR: &str = "Something went wrong ...";
pub const MSG_LOADING: &str = "Loading ...";
pub const MSG_EMPTY: &str = "No stories.";

pub fn recall_label(slot: usize, term: &str) -> String {
    format!("F{} {}", slot + 1, term)
}

pub fn header_label(key: SortKey, sort: Option<SortState>) -> String {
    match sort {
        Some(s) if s.key == key => format!("{} {}", key.label(), s.arrow()),
        _ => key.label().to_string(),
    }
}

/// Truncate or right-pad `s` to exactly `width` display columns.
pub fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    let total = UnicodeWidthStr::width(s);
    let budget = if total > width { width.saturating_sub(1) } else { width };
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > budget {
            break;
        }
        out.push_str(g);
        used += w;
    }
    if total > width && width > 0 {
        out.push('~');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// Build the status bar line with width-aware compaction.
// - term: active search term
// - shown: stories currently listed
// - page: last loaded page (0-based), if any
// - state: short fetch state label
// - max_width: available width for the status text
pub fn build_status_line(
    term: &str,
    shown: usize,
    page: Option<u32>,
    state: &str,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[{}][{}]", term, state));
    segments.push(match page {
        Some(p) => format!("Stories:{} Page:{}", shown, p + 1),
        None => format!("Stories:{}", shown),
    });
    // Hints ordered by importance; will be appended if space allows.
    let hints: [&str; 6] = [
        "Enter: search",
        "Tab: list/search",
        "F1-F5: last searches",
        "Ctrl+N: more",
        "Alt+T/A/C/P: sort",
        "?: help",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Search box",
        "  Type a term, Enter: search    Ctrl+W: delete word    Ctrl+U: clear",
        "  Arrow/Home/End: move cursor    Tab: go to the list",
        "Story list",
        "  Up/Down, PgUp/PgDn: select    d or Delete: dismiss selected",
        "  t/a/c/p: sort by Title/Author/Comments/Points (again to reverse)",
        "  m: more    /: back to search    q: quit",
        "Anywhere",
        "  F1-F5: run a last search    Ctrl+N: more    Alt+T/A/C/P: sort",
        "  Mouse: click buttons, headers, [x] and rows",
        "  ?: open/close this panel (from the list)    Esc/Ctrl-C: quit",
    ]
}
