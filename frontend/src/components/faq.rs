//! FAQ accordion state.

/// Accordion where at most one item is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    /// Accordion over `len` items with the first one open.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            open: (len > 0).then_some(0),
        }
    }

    /// Item currently expanded.
    pub fn open(&self) -> Option<usize> {
        self.open
    }

    /// Whether `index` is expanded.
    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Clicking an item opens it, or closes it when it is already open.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }
}
