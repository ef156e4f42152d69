use std::{cmp::Ordering, collections::BTreeSet};

use crate::misc::FloatingPoint;

/// Whether an event opens or closes a value's interval.
/// Opening sorts before closing at the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SweepEventKind {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepEvent<T, V> {
    key: T,
    kind: SweepEventKind,
    value: V,
}

impl<T: FloatingPoint, V> SweepEvent<T, V> {
    pub fn key(&self) -> T {
        self.key
    }

    pub fn kind(&self) -> SweepEventKind {
        self.kind
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.key
            .partial_cmp(&other.key)
            .unwrap_or(Ordering::Equal)
            .then(self.kind.cmp(&other.kind))
    }
}

/// Sweep line over values occupying intervals along one axis.
///
/// Each value contributes an open event at the low end of its interval and a
/// close event at the high end, both widened by `epsilon`.
/// Taking a value makes it active until its close event is passed.
#[derive(Debug, Clone)]
pub struct SweepQueue<T, V> {
    epsilon: T,
    events: Vec<SweepEvent<T, V>>,
    cursor: usize,
    sorted: bool,
    active: BTreeSet<V>,
}

impl<T: FloatingPoint, V: Copy + Ord> SweepQueue<T, V> {
    pub fn new(epsilon: T) -> Self {
        Self {
            epsilon,
            events: vec![],
            cursor: 0,
            sorted: true,
            active: BTreeSet::new(),
        }
    }

    /// Register `value` over the interval spanned by `a` and `b`.
    pub fn add(&mut self, value: V, a: T, b: T) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.events.push(SweepEvent {
            key: lo - self.epsilon,
            kind: SweepEventKind::Open,
            value,
        });
        self.events.push(SweepEvent {
            key: hi + self.epsilon,
            kind: SweepEventKind::Close,
            value,
        });
        self.sorted = false;
    }

    fn sort(&mut self) {
        if !self.sorted {
            // consumed events stay in place
            self.events[self.cursor..].sort_by(|a, b| a.compare(b));
            self.sorted = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// The next pending event.
    pub fn peek(&mut self) -> Option<&SweepEvent<T, V>> {
        self.sort();
        self.events.get(self.cursor)
    }

    /// Consume the next pending event, updating the active set.
    pub fn next_event(&mut self) -> Option<SweepEvent<T, V>> {
        self.sort();
        let event = *self.events.get(self.cursor)?;
        self.cursor += 1;
        match event.kind {
            SweepEventKind::Open => {
                self.active.insert(event.value);
            }
            SweepEventKind::Close => {
                self.active.remove(&event.value);
            }
        }
        Some(event)
    }

    /// Advance to the next open event and return its value.
    pub fn take(&mut self) -> Option<V> {
        while let Some(event) = self.next_event() {
            if event.kind == SweepEventKind::Open {
                return Some(event.value);
            }
        }
        None
    }

    /// Values whose interval the sweep is currently inside.
    pub fn active(&self) -> impl Iterator<Item = &V> {
        self.active.iter()
    }

    /// Pick the queue whose next event comes first, consuming close events on the way,
    /// and return its index once that next event is an open event (or every queue is drained).
    pub fn next_queue(queues: &mut [Self]) -> usize {
        loop {
            let mut min_index = 0;
            let mut min_event: Option<SweepEvent<T, V>> = None;
            for (i, q) in queues.iter_mut().enumerate() {
                if let Some(e) = q.peek().copied() {
                    let better = match &min_event {
                        None => true,
                        Some(m) => e.compare(m).is_lt(),
                    };
                    if better {
                        min_index = i;
                        min_event = Some(e);
                    }
                }
            }

            match min_event {
                Some(e) if e.kind == SweepEventKind::Close => {
                    queues[min_index].next_event();
                }
                _ => return min_index,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_in_key_order() {
        let mut q = SweepQueue::new(0.);
        q.add('b', 2., 3.);
        q.add('a', 1., 0.);
        q.add('c', 5., 6.);

        assert_eq!(q.take(), Some('a'));
        assert_eq!(q.active().copied().collect::<Vec<_>>(), vec!['a']);
        assert_eq!(q.take(), Some('b'));
        // 'a' closed before 'b' opened
        assert_eq!(q.active().copied().collect::<Vec<_>>(), vec!['b']);
        assert_eq!(q.take(), Some('c'));
        assert_eq!(q.take(), None);
        assert!(q.is_empty());
        assert_eq!(q.active().count(), 0);
    }

    #[test]
    fn open_sorts_before_close() {
        let mut q = SweepQueue::new(0.);
        q.add(1, 0., 1.);
        q.add(2, 1., 2.);
        assert_eq!(q.take(), Some(1));
        assert_eq!(q.take(), Some(2));
        // touching intervals overlap
        assert_eq!(q.active().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn epsilon_widens_intervals() {
        let mut q = SweepQueue::new(0.1);
        q.add(1, 0., 1.);
        q.add(2, 1.05, 2.);
        q.take();
        q.take();
        assert_eq!(q.active().count(), 2);
    }

    #[test]
    fn interleaves_queues() {
        let mut a = SweepQueue::new(0.);
        a.add(0, 0., 1.);
        a.add(1, 4., 5.);
        let mut b = SweepQueue::new(0.);
        b.add(10, 0.5, 2.);

        let mut queues = [a, b];
        let mut order = vec![];
        loop {
            let i = SweepQueue::next_queue(&mut queues);
            match queues[i].take() {
                Some(v) => {
                    let other = queues[1 - i].active().copied().collect::<Vec<_>>();
                    order.push((v, other));
                }
                None => break,
            }
        }

        assert_eq!(order, vec![(0, vec![]), (10, vec![0]), (1, vec![])]);
    }
}
