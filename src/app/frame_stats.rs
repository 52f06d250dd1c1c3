use std::collections::VecDeque;

/// Rolling frame rate over the most recent frames
pub struct FrameStats {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl FrameStats {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Record one frame's duration. Zero-length frames carry no rate and are skipped.
    pub fn record(&mut self, delta_secs: f64) {
        if delta_secs <= 0.0 {
            return;
        }
        self.samples.push_back(1.0 / delta_secs);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn current_fps(&self) -> f64 {
        self.samples.back().copied().unwrap_or(0.0)
    }

    pub fn average_fps(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn title(&self, base: &str) -> String {
        format!(
            "{base} | FPS: {:.3} | AVG: {:.3}",
            self.current_fps(),
            self.average_fps(),
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
