use std::collections::VecDeque;

/// Bounded sliding window over a scalar convergence signal.
#[derive(Debug, Clone)]
pub struct ConvergenceWindow {
    values: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl ConvergenceWindow {
    pub fn new(capacity: usize) -> ConvergenceWindow {
        let capacity = capacity.max(1);
        ConvergenceWindow { values: VecDeque::with_capacity(capacity), capacity, sum: 0.0 }
    }

    /// Adds a value, evicting the oldest once the window is full.
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.values.len() as f64)
        }
    }

    /// True once the window is full and its mean is at least `threshold`.
    pub fn reached(&self, threshold: f64) -> bool {
        self.is_full() && self.mean().is_some_and(|m| m >= threshold)
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}
