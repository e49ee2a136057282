//! A lazy max-heap of triangle candidates, keyed by per-triangle error.
//!
//! Entries are never mutated or removed in place: a triangle whose candidate
//! changes (because it was just created, or because a neighbour's flip
//! affected it) simply gets pushed again. Stale entries — referring to a
//! retired triangle slot, or to a slot whose candidate has since moved on —
//! are recognised and dropped lazily when they reach the top of the heap,
//! using the slot's generation counter rather than a position index back
//! into the heap.

#[derive(Debug, Clone, Copy)]
struct Entry {
    triangle: usize,
    generation: u32,
    error: f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CandidateQueue {
    heap: Vec<Entry>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn push(&mut self, triangle: usize, generation: u32, error: f64) {
        self.heap.push(Entry {
            triangle,
            generation,
            error,
        });
        self.sift_up(self.heap.len() - 1);
    }

    /// Pops entries until one is valid according to `is_current`, or the heap
    /// drains. `is_current(triangle, generation)` must answer whether this
    /// triangle slot is still live at that generation.
    pub fn pop_valid(&mut self, mut is_current: impl FnMut(usize, u32) -> bool) -> Option<(usize, f64)> {
        while let Some(top) = self.pop_raw() {
            if is_current(top.triangle, top.generation) {
                return Some((top.triangle, top.error));
            }
        }
        None
    }

    /// Peeks the top raw entry (without staleness filtering); used only for
    /// tests and diagnostics, never by the refinement loop itself.
    #[cfg(test)]
    fn peek_raw(&self) -> Option<(usize, f64)> {
        self.heap.first().map(|e| (e.triangle, e.error))
    }

    fn pop_raw(&mut self) -> Option<Entry> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        top
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].error <= self.heap[parent].error {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut largest = i;
            if left < n && self.heap[left].error > self.heap[largest].error {
                largest = left;
            }
            if right < n && self.heap[right].error > self.heap[largest].error {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.heap.swap(i, largest);
            i = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_descending_error_order() {
        let mut q = CandidateQueue::new();
        q.push(0, 0, 0.1);
        q.push(1, 0, 0.9);
        q.push(2, 0, 0.5);

        let mut order = Vec::new();
        while let Some((t, e)) = q.pop_valid(|_, _| true) {
            order.push((t, e));
        }
        assert_eq!(order, vec![(1, 0.9), (2, 0.5), (0, 0.1)]);
    }

    #[test]
    fn stale_generation_is_skipped() {
        let mut q = CandidateQueue::new();
        q.push(0, 0, 0.9); // stale: slot 0 is now at generation 1
        q.push(0, 1, 0.2); // current
        let current_gen = |_t: usize, g: u32| g == 1;
        assert_eq!(q.pop_valid(current_gen), Some((0, 0.2)));
        assert_eq!(q.pop_valid(current_gen), None);
    }

    #[test]
    fn retired_slot_is_skipped() {
        let mut q = CandidateQueue::new();
        q.push(5, 0, 0.9);
        let never_live = |_t: usize, _g: u32| false;
        assert_eq!(q.pop_valid(never_live), None);
    }

    #[test]
    fn peek_raw_matches_first_pop() {
        let mut q = CandidateQueue::new();
        q.push(0, 0, 0.3);
        q.push(1, 0, 0.7);
        assert_eq!(q.peek_raw(), Some((1, 0.7)));
    }
}
