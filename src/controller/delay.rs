use smallvec::{smallvec, SmallVec};

/// One quantized measurement of the gap to the lead vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeasurementSample {
    /// The ego vehicle's velocity in m/s.
    pub ego_velocity: f64,
    /// The lead vehicle's velocity in m/s.
    pub lead_velocity: f64,
    /// The distance between the two vehicles in m.
    pub distance: f64,
}

/// A fixed-capacity ring buffer of measurements.
/// Once full, pushing a sample evicts the oldest one.
#[derive(Clone, Debug)]
pub struct DelayBuffer {
    /// Backing storage, always `capacity` long.
    slots: SmallVec<[MeasurementSample; 4]>,
    /// Index of the oldest sample.
    head: usize,
    /// The number of samples held.
    len: usize,
}

impl DelayBuffer {
    /// Creates a buffer that models a latency of `delay_steps` pushes.
    pub fn new(delay_steps: usize) -> Self {
        Self {
            slots: smallvec![MeasurementSample::default(); delay_steps + 1],
            head: 0,
            len: 0,
        }
    }

    /// The maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of samples currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends a sample, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, sample: MeasurementSample) {
        let cap = self.capacity();
        if self.len < cap {
            self.slots[(self.head + self.len) % cap] = sample;
            self.len += 1;
        } else {
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % cap;
        }
    }

    /// The oldest sample in the buffer.
    pub fn oldest(&self) -> Option<MeasurementSample> {
        (self.len > 0).then(|| self.slots[self.head])
    }

    /// The most recently pushed sample.
    pub fn newest(&self) -> Option<MeasurementSample> {
        (self.len > 0).then(|| self.slots[(self.head + self.len - 1) % self.capacity()])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample(distance: f64) -> MeasurementSample {
        MeasurementSample {
            ego_velocity: 10.0,
            lead_velocity: 10.0,
            distance,
        }
    }

    #[test]
    fn zero_delay_holds_one_sample() {
        let mut buffer = DelayBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        assert!(buffer.oldest().is_none());

        buffer.push(sample(1.0));
        buffer.push(sample(2.0));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.oldest(), Some(sample(2.0)));
        assert_eq!(buffer.newest(), Some(sample(2.0)));
    }

    #[test]
    fn reads_oldest_before_full() {
        let mut buffer = DelayBuffer::new(2);
        buffer.push(sample(1.0));
        assert_eq!(buffer.oldest(), Some(sample(1.0)));
        buffer.push(sample(2.0));
        assert_eq!(buffer.oldest(), Some(sample(1.0)));
        assert!(!buffer.is_full());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut buffer = DelayBuffer::new(2);
        for d in 1..=5 {
            buffer.push(sample(d as f64));
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.oldest(), Some(sample(3.0)));
        assert_eq!(buffer.newest(), Some(sample(5.0)));
    }

    #[test]
    fn large_delay_spills_to_heap() {
        let mut buffer = DelayBuffer::new(9);
        for d in 0..25 {
            buffer.push(sample(d as f64));
        }
        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer.oldest(), Some(sample(15.0)));
        assert_eq!(buffer.newest(), Some(sample(24.0)));
        assert_eq!(buffer.len(), 10);
    }
}
