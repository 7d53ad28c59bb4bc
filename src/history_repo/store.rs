// Bounded FIFO of samples, oldest at the front.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::models::Sample;

#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends at the tail, evicting from the head once over capacity.
    pub fn append(&mut self, value: f64, timestamp: DateTime<Utc>) {
        self.samples.push_back(Sample::new(value, timestamp));
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Last `count` samples, oldest first. Returns everything when fewer are stored,
    /// nothing when `count <= 0`.
    pub fn recent(&self, count: i64) -> Vec<Sample> {
        if count <= 0 {
            return Vec::new();
        }
        let take = usize::try_from(count).unwrap_or(usize::MAX).min(self.samples.len());
        self.samples
            .iter()
            .skip(self.samples.len() - take)
            .copied()
            .collect()
    }

    /// Samples strictly newer than `cutoff`, oldest first.
    pub fn since(&self, cutoff: DateTime<Utc>) -> Vec<Sample> {
        // Timestamps are appended non-decreasing, so scan back from the tail.
        let newer = self
            .samples
            .iter()
            .rev()
            .take_while(|s| s.timestamp > cutoff)
            .count();
        self.samples
            .iter()
            .skip(self.samples.len() - newer)
            .copied()
            .collect()
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
