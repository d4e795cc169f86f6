//! Helpers to walk the queue as a ring.
//!
//! The controller keeps a play `order`: a permutation of queue indices. With
//! shuffle off it is the identity, so walking it is plain queue order.

use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlayOrder {
    order: Vec<usize>,
}

impl PlayOrder {
    /// Queue order for `len` entries.
    pub(crate) fn sequential(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
        }
    }

    /// Random order for `len` entries with `first` (if valid) at the front.
    pub(crate) fn shuffled<R: Rng + ?Sized>(len: usize, first: Option<usize>, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        if let Some(f) = first.filter(|&f| f < len) {
            if let Some(pos) = order.iter().position(|&i| i == f) {
                order.swap(0, pos);
            }
        }
        Self { order }
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Queue index following `current`; the first entry when nothing is current.
    pub(crate) fn next(&self, current: Option<usize>) -> Option<usize> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }
        let pos = match current.and_then(|c| self.position_of(c)) {
            Some(p) => (p + 1) % len,
            None => 0,
        };
        Some(self.order[pos])
    }

    /// Queue index preceding `current`; the last entry when nothing is current.
    pub(crate) fn previous(&self, current: Option<usize>) -> Option<usize> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }
        let pos = match current.and_then(|c| self.position_of(c)) {
            Some(p) => (p + len - 1) % len,
            None => len - 1,
        };
        Some(self.order[pos])
    }

    fn position_of(&self, queue_index: usize) -> Option<usize> {
        self.order.iter().position(|&i| i == queue_index)
    }
}
