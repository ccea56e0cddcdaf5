use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

/// Decides when the controller runs. Samples are nominally `period` apart,
/// each interval perturbed by uniform jitter in `[-jitter, jitter]`.
/// The first sample is due at t = 0.
#[derive(Clone, Debug)]
pub struct SampleClock {
    /// The time at which the next sample is due, in s.
    next: f64,
    period: f64,
    jitter: Option<Uniform<f64>>,
    rng: StdRng,
}

impl SampleClock {
    /// Creates a sampling clock. A `jitter` of zero disables jitter.
    pub fn new(period: f64, jitter: f64, seed: u64) -> Self {
        Self {
            next: 0.0,
            period,
            jitter: (jitter > 0.0).then(|| Uniform::new_inclusive(-jitter, jitter)),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The time at which the next sample is due, in s.
    pub fn next_sample_time(&self) -> f64 {
        self.next
    }

    /// Whether a sample is due at time `t`.
    pub fn is_due(&self, t: f64) -> bool {
        t >= self.next
    }

    /// Schedules the next sample one jittered period after the last one.
    pub fn advance(&mut self) {
        let jitter = match &self.jitter {
            Some(distr) => distr.sample(&mut self.rng),
            None => 0.0,
        };
        self.next += self.period + jitter;
    }
}
