use unicode_segmentation::UnicodeSegmentation;

use super::App;

impl App {
    pub fn set_input(&mut self, s: &str) {
        self.input = s.to_string();
        self.input_cursor = self.input.graphemes(true).count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    pub fn insert_text(&mut self, s: &str) {
        // Pasted newlines would end up in the query; the box is single-line.
        let s = s.replace(['\r', '\n'], " ");
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        let mut new_input = parts[..idx].concat();
        new_input.push_str(&s);
        new_input.push_str(&parts[idx..].concat());
        self.input = new_input;
        let added = s.graphemes(true).count();
        self.input_cursor = (idx + added).min(self.input.graphemes(true).count());
    }

    pub fn delete_left_grapheme(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        parts.remove(idx - 1);
        self.input = parts.concat();
        self.input_cursor = idx - 1;
    }

    pub fn delete_right_grapheme(&mut self) {
        let mut parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.input = parts.concat();
        }
    }

    pub fn delete_prev_word(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let end = self.input_cursor.min(parts.len());
        let start = Self::word_start(&parts, end);
        let mut newp = parts.clone();
        newp.drain(start..end);
        self.input = newp.concat();
        self.input_cursor = start;
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let l = self.input.graphemes(true).count();
        if self.input_cursor < l {
            self.input_cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.input.graphemes(true).count();
    }

    pub fn cursor_word_left(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        self.input_cursor = Self::word_start(&parts, self.input_cursor.min(parts.len()));
    }

    pub fn cursor_word_right(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.input_cursor = i;
    }

    fn word_start(parts: &[&str], from: usize) -> usize {
        let mut i = from;
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        i
    }
}
