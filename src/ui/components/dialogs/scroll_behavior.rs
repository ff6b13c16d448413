use ratatui::widgets::ScrollbarState;

const PAGE_LINES: usize = 10;

/// Scroll position of a long read-only dialog (help, logs, messages).
///
/// The offset may run past the end; renderers clamp it to the content.
#[derive(Debug, Default)]
pub struct DialogScroll {
    pub offset: usize,
    pub scrollbar_state: ScrollbarState,
}

impl DialogScroll {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn up(&mut self) {
        self.set(self.offset.saturating_sub(1));
    }

    pub fn down(&mut self) {
        self.set(self.offset.saturating_add(1));
    }

    pub fn page_up(&mut self) {
        self.set(self.offset.saturating_sub(PAGE_LINES));
    }

    pub fn page_down(&mut self) {
        self.set(self.offset.saturating_add(PAGE_LINES));
    }

    pub fn top(&mut self) {
        self.set(0);
    }

    pub fn bottom(&mut self) {
        self.set(usize::MAX);
    }

    fn set(&mut self, offset: usize) {
        self.offset = offset;
        self.scrollbar_state = self.scrollbar_state.position(offset);
    }

    /// Clamp to the content and return the visible slice of `lines`.
    pub fn visible<'a>(&mut self, lines: &[&'a str], visible_height: usize) -> Vec<&'a str> {
        let max_scroll = lines.len().saturating_sub(visible_height);
        self.offset = self.offset.min(max_scroll);
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(lines.len())
            .viewport_content_length(visible_height)
            .position(self.offset);

        lines.iter().skip(self.offset).take(visible_height).copied().collect()
    }
}
