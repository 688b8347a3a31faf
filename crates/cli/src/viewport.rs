// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Transcript scrolling with auto-follow.
//!
//! While following, new content keeps the view pinned to the bottom. A
//! user scroll that leaves the bottom stops following; reaching the
//! bottom again, or submitting a prompt, resumes it.

/// A scrollable region measured in rows.
pub trait ViewportHandle {
    fn scroll_top(&self) -> usize;
    fn viewport_height(&self) -> usize;
    fn content_height(&self) -> usize;
    fn scroll_to(&mut self, top: usize);

    /// Largest valid `scroll_top`
    fn max_scroll(&self) -> usize {
        self.content_height().saturating_sub(self.viewport_height())
    }

    fn is_at_bottom(&self) -> bool {
        self.scroll_top() >= self.max_scroll()
    }
}

/// Row-based scroll position used by the terminal front end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    scroll_top: usize,
    viewport_height: usize,
    content_height: usize,
}

impl ScrollState {
    pub fn new(viewport_height: usize) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.clamp();
    }

    pub fn set_content_height(&mut self, height: usize) {
        self.content_height = height;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }
}

impl ViewportHandle for ScrollState {
    fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    fn content_height(&self) -> usize {
        self.content_height
    }

    fn scroll_to(&mut self, top: usize) {
        self.scroll_top = top.min(self.max_scroll());
    }
}

/// Owns a viewport and the auto-follow flag.
#[derive(Clone, Debug)]
pub struct ViewportManager<V = ScrollState> {
    view: V,
    auto_follow: bool,
}

impl<V: ViewportHandle> ViewportManager<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            auto_follow: true,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn auto_follow(&self) -> bool {
        self.auto_follow
    }

    /// Resume following and jump to the bottom.
    pub fn follow(&mut self) {
        self.auto_follow = true;
        self.scroll_to_bottom();
    }

    pub fn scroll_to_bottom(&mut self) {
        let bottom = self.view.max_scroll();
        self.view.scroll_to(bottom);
    }

    /// Call after the content grew or the viewport was resized.
    pub fn content_changed(&mut self) {
        if self.auto_follow {
            self.scroll_to_bottom();
        }
    }

    /// User scroll by `delta` rows (negative is up).
    pub fn scroll_by(&mut self, delta: isize) {
        let top = self.view.scroll_top();
        let target = if delta.is_negative() {
            top.saturating_sub(delta.unsigned_abs())
        } else {
            top.saturating_add(delta.unsigned_abs())
        };
        self.view.scroll_to(target);
        self.auto_follow = self.view.is_at_bottom();
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.page() as isize));
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.page() as isize);
    }

    fn page(&self) -> usize {
        self.view.viewport_height().saturating_sub(1).max(1)
    }
}

impl ViewportManager<ScrollState> {
    pub fn set_content_height(&mut self, height: usize) {
        self.view.set_content_height(height);
        self.content_changed();
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.view.set_viewport_height(height);
        self.content_changed();
    }
}

impl Default for ViewportManager<ScrollState> {
    fn default() -> Self {
        Self::new(ScrollState::default())
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
