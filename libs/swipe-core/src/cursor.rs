//! Linear position through a fixed card sequence.

/// Index of the next unseen linear card. Always within `0..=len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckCursor {
    position: usize,
    len: usize,
}

impl DeckCursor {
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    /// Cursor at `position`, clamped to the deck length.
    pub fn at(position: usize, len: usize) -> Self {
        Self {
            position: position.min(len),
            len,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once every linear card has been resolved.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.len
    }

    /// Move past the current linear card. Stops at the end of the deck.
    pub fn advance(&mut self) {
        if self.position < self.len {
            self.position += 1;
        }
    }

    /// Step back one card. Stops at the start of the deck.
    pub fn retreat(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}
