//! Carousel - Browsing State Over a Batch
//!
//! Navigation clamps at both ends: `next` on the last entry and `previous` on
//! the first are no-ops. The index always satisfies `0 <= index < len`.

use crate::batch::{Batch, BatchEntry};

#[derive(Debug, Clone)]
pub struct Carousel {
    batch: Batch,
    index: usize,
}

impl Carousel {
    /// Batches are never empty, so the invariant holds from the start.
    pub fn new(batch: Batch) -> Self {
        Self { batch, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn current(&self) -> Option<&BatchEntry> {
        self.batch.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Advance one entry. Returns whether the index moved.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step back one entry. Returns whether the index moved.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `index`, clamped into range.
    pub fn jump_to(&mut self, index: usize) {
        self.index = index.min(self.len().saturating_sub(1));
    }

    /// Swap in a freshly generated batch and rewind.
    pub fn replace(&mut self, batch: Batch) -> Batch {
        self.index = 0;
        std::mem::replace(&mut self.batch, batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{generate_batch_with, BatchOptions};
    use crate::runtime::{initialize, RuntimeConfig};

    fn carousel(count: usize) -> Carousel {
        initialize(&RuntimeConfig::default()).unwrap();
        let options = BatchOptions { count, seed: Some(8), size: 32 };
        let batch = generate_batch_with("Nav", &options).unwrap();
        Carousel::new(batch)
    }

    #[test]
    fn test_clamps_at_both_ends() {
        let mut c = carousel(5);
        assert!(!c.previous());
        assert_eq!(c.index(), 0);
        for _ in 0..10 {
            c.next();
        }
        assert_eq!(c.index(), 4);
        assert!(!c.has_next());
        assert!(c.has_previous());
    }

    #[test]
    fn test_jump_to_clamps() {
        let mut c = carousel(5);
        c.jump_to(99);
        assert_eq!(c.index(), 4);
        c.jump_to(2);
        assert_eq!(c.current().map(|e| e.params.template), Some(c.batch().templates()[2]));
    }

    #[test]
    fn test_replace_rewinds() {
        let mut c = carousel(3);
        c.next();
        let fresh = carousel(2).batch().clone();
        let old = c.replace(fresh);
        assert_eq!(old.len(), 3);
        assert_eq!((c.index(), c.len()), (0, 2));
    }
}
