//! Scroll state for line based views.

/// First visible line and whether the view follows new output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// Index of the first visible line.
    pub offset: usize,
    /// Keep the last line in view as content grows.
    pub follow: bool,
}

impl ScrollState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }

    fn max_offset(total: usize, height: usize) -> usize {
        total.saturating_sub(height)
    }

    /// Content changed; stay at the bottom when following.
    pub fn on_content(&mut self, total: usize, height: usize) {
        let max = Self::max_offset(total, height);
        if self.follow {
            self.offset = max;
        } else {
            self.offset = self.offset.min(max);
        }
    }

    pub fn scroll_up(&mut self) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, total: usize, height: usize) {
        self.page_down(1, total, height);
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(page_size);
    }

    /// Reaching the bottom resumes following.
    pub fn page_down(&mut self, page_size: usize, total: usize, height: usize) {
        let max = Self::max_offset(total, height);
        self.offset = (self.offset + page_size).min(max);
        if self.offset >= max {
            self.follow = true;
        }
    }

    pub fn home(&mut self) {
        self.follow = false;
        self.offset = 0;
    }

    pub fn end(&mut self, total: usize, height: usize) {
        self.follow = true;
        self.offset = Self::max_offset(total, height);
    }

    /// Percentage of the way through the content, if it overflows.
    #[must_use]
    pub fn percent(&self, total: usize, height: usize) -> Option<usize> {
        let max = Self::max_offset(total, height);
        (max > 0).then(|| self.offset * 100 / max)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
