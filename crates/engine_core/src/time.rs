//! Simulation clock and tick-driven timers.
//!
//! Nothing here reads the wall clock: the host advances [`Time`] by the frame delta and
//! every timer is stepped by the same delta, so a session replays identically.

/// Accumulated simulation time.
#[derive(Debug, Clone, Default)]
pub struct Time {
    /// Duration of the last tick in seconds.
    delta: f32,
    /// Total simulated seconds.
    elapsed: f64,
    /// Ticks since start.
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick. Negative deltas are treated as zero.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.elapsed += self.delta as f64;
        self.frame_count += 1;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed * 1000.0
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Repeating timer. Stopping is idempotent; a stopped timer never fires.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: f32,
    accumulator: f32,
    running: bool,
}

impl IntervalTimer {
    /// A stopped timer with the given period in seconds.
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            accumulator: 0.0,
            running: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(ms as f32 / 1000.0)
    }

    /// Start (or restart) counting from zero.
    pub fn start(&mut self) {
        self.accumulator = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance and return how many periods elapsed during this tick.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += dt.max(0.0);
        let mut fired = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// One-shot delay. Restarting while armed pushes the deadline back (debounce).
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining: Option<f32>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart(&mut self, seconds: f32) {
        self.remaining = Some(seconds.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance; returns true exactly once when the delay expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.remaining.as_mut() {
            Some(left) => {
                *left -= dt.max(0.0);
                if *left <= 0.0 {
                    self.remaining = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}
