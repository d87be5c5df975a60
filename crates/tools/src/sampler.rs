use std::time::Duration;

/// Rolling history of frame timings and draw counts.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    history: Vec<(Duration, usize)>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameSampler {
    /// A sampler keeping the last `capacity` frames. Zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![(Duration::ZERO, 0); capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, elapsed: Duration, drawn: usize) {
        self.history[self.index] = (elapsed, drawn);
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    fn samples(&self) -> &[(Duration, usize)] {
        &self.history[..self.count()]
    }

    pub fn average_elapsed(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.samples().iter().map(|s| s.0).sum();
        total / count as u32
    }

    pub fn max_elapsed(&self) -> Duration {
        self.samples()
            .iter()
            .map(|s| s.0)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn average_drawn(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let total: usize = self.samples().iter().map(|s| s.1).sum();
        total as f64 / count as f64
    }
}
