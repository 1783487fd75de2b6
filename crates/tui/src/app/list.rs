use stories_core::stories::Story;

use super::App;

impl App {
    pub fn selected_story(&self) -> Option<&Story> {
        self.controller.stories().get(self.selected)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.controller.stories().len() {
            self.selected += 1;
        }
    }

    pub fn select_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.list_viewport.max(1));
    }

    pub fn select_page_down(&mut self) {
        self.selected += self.list_viewport.max(1);
        self.clamp_selection();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.controller.stories().len().saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.controller.stories().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn ensure_list_visible(&mut self, viewport: usize) {
        if viewport == 0 {
            return;
        }
        if self.selected < self.list_offset {
            self.list_offset = self.selected;
        } else if self.selected >= self.list_offset + viewport {
            self.list_offset = self.selected + 1 - viewport;
        }
        let len = self.controller.stories().len();
        self.list_offset = self.list_offset.min(len.saturating_sub(viewport));
    }
}
