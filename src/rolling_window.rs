use std::num::NonZero;

/// Bounded FIFO of samples backed by a ring buffer.
///
/// Holds at most `capacity` samples. Once full, every push overwrites and
/// returns the oldest sample.
#[derive(Clone, Debug)]
pub struct RollingWindow<T> {
    buffer: Vec<T>,
    /// Slot of the oldest sample once the buffer is full.
    head: usize,
    capacity: usize,
}

impl<T: Copy> RollingWindow<T> {
    #[must_use]
    pub fn new(capacity: NonZero<usize>) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity.get()),
            head: 0,
            capacity: capacity.get(),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Appends `value`, returning the evicted oldest sample when the
    /// window was already full.
    #[inline]
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.is_full() {
            let old = std::mem::replace(&mut self.buffer[self.head], value);

            self.head += 1;
            if self.head == self.capacity {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer.push(value);

            None
        }
    }

    /// Most recently pushed sample.
    #[inline]
    #[must_use]
    pub fn newest(&self) -> Option<T> {
        if self.is_full() {
            let slot = if self.head == 0 {
                self.capacity - 1
            } else {
                self.head - 1
            };
            Some(self.buffer[slot])
        } else {
            self.buffer.last().copied()
        }
    }

    /// Oldest retained sample.
    #[inline]
    #[must_use]
    pub fn oldest(&self) -> Option<T> {
        if self.is_full() {
            Some(self.buffer[self.head])
        } else {
            self.buffer.first().copied()
        }
    }

    /// Iterates samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (wrapped, leading) = self.buffer.split_at(self.head);
        leading.iter().chain(wrapped).copied()
    }

    /// Drops every sample, keeping the capacity.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::RollingWindow;
    use std::num::NonZero;

    fn window(capacity: usize) -> RollingWindow<f64> {
        RollingWindow::new(NonZero::new(capacity).unwrap())
    }

    #[test]
    fn filling_returns_none() {
        let mut rw = window(3);
        assert_eq!(rw.push(1.0), None);
        assert_eq!(rw.push(2.0), None);
        assert_eq!(rw.push(3.0), None);
        assert!(rw.is_full());
    }

    #[test]
    fn full_evicts_oldest() {
        let mut rw = window(3);
        rw.push(1.0);
        rw.push(2.0);
        rw.push(3.0);
        assert_eq!(rw.push(4.0), Some(1.0));
        assert_eq!(rw.push(5.0), Some(2.0));
        assert_eq!(rw.push(6.0), Some(3.0));
        assert_eq!(rw.len(), 3);
    }

    #[test]
    fn iterates_oldest_to_newest() {
        let mut rw = window(3);
        rw.push(1.0);
        rw.push(2.0);
        assert_eq!(rw.iter().collect::<Vec<_>>(), vec![1.0, 2.0]);

        rw.push(3.0);
        rw.push(4.0); // evicts 1, head wraps to slot 1
        assert_eq!(rw.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn newest_and_oldest_follow_wrap() {
        let mut rw = window(2);
        assert_eq!(rw.newest(), None);
        assert_eq!(rw.oldest(), None);

        rw.push(1.0);
        rw.push(2.0);
        rw.push(3.0);
        assert_eq!(rw.newest(), Some(3.0));
        assert_eq!(rw.oldest(), Some(2.0));

        rw.push(4.0);
        assert_eq!(rw.newest(), Some(4.0));
        assert_eq!(rw.oldest(), Some(3.0));
    }

    #[test]
    fn capacity_one() {
        let mut rw = window(1);
        assert_eq!(rw.push(1.0), None);
        assert!(rw.is_full());
        assert_eq!(rw.push(2.0), Some(1.0));
        assert_eq!(rw.newest(), Some(2.0));
        assert_eq!(rw.oldest(), Some(2.0));
    }

    #[test]
    fn clear_empties_and_restarts() {
        let mut rw = window(2);
        rw.push(1.0);
        rw.push(2.0);
        rw.push(3.0);
        rw.clear();
        assert!(rw.is_empty());
        assert_eq!(rw.capacity(), 2);

        rw.push(7.0);
        assert_eq!(rw.iter().collect::<Vec<_>>(), vec![7.0]);
    }

    #[test]
    fn holds_tuples() {
        let mut rw: RollingWindow<(f64, f64)> = RollingWindow::new(NonZero::new(2).unwrap());
        rw.push((1.0, 0.5));
        rw.push((2.0, 1.5));
        rw.push((3.0, 2.5));
        assert_eq!(rw.oldest(), Some((2.0, 1.5)));
    }
}
