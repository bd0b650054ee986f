/// Fixed-window moving average over a zero-initialised ring
///
/// Every slot starts at zero and the mean always divides by the full
/// window, so the first `window_size - 1` results under-report while the
/// ring fills.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    buffer: Vec<f64>,
    index: usize,
}

impl MovingAverage {
    /// Create a new moving average filter
    ///
    /// # Arguments
    /// * `window_size` - Number of values averaged (at least one)
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: vec![0.0; window_size.max(1)],
            index: 0,
        }
    }

    /// Overwrite the oldest slot with `value` and return the new average
    pub fn add(&mut self, value: f64) -> f64 {
        self.buffer[self.index] = value;
        self.index = (self.index + 1) % self.buffer.len();

        self.average()
    }

    /// Mean of every slot, including slots never written
    pub fn average(&self) -> f64 {
        let sum: f64 = self.buffer.iter().sum();
        sum / self.buffer.len() as f64
    }

    /// Slot the next value will be written to
    pub fn next_slot(&self) -> usize {
        self.index
    }

    pub fn window_size(&self) -> usize {
        self.buffer.len()
    }
}
