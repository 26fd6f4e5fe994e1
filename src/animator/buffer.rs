//! Bounded line buffer backing the terminal body.

use std::collections::VecDeque;

/// Ordered, capped list of displayed lines.
///
/// The last line is the one being typed. Pushing past the cap evicts the
/// oldest line, so `len() <= cap()` always holds.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: VecDeque<String>,
    cap: usize,
}

impl LineBuffer {
    /// Start with a single empty line to type into. A zero cap is raised to 1.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        let mut lines = VecDeque::with_capacity(cap);
        lines.push_back(String::new());
        Self { lines, cap }
    }

    /// Replace the line being typed.
    pub fn set_last(&mut self, text: &str) {
        match self.lines.back_mut() {
            Some(last) => {
                last.clear();
                last.push_str(text);
            }
            None => self.lines.push_back(text.to_string()),
        }
    }

    /// Append a line, evicting the oldest on overflow.
    pub fn push_line(&mut self, text: impl Into<String>) {
        self.lines.push_back(text.into());
        while self.lines.len() > self.cap {
            self.lines.pop_front();
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }

    /// The newest `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> {
        self.lines.iter().skip(self.lines.len().saturating_sub(n)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
