//! Common components shared by the simulation crates.

/// Integer hit points for damageable objects. Never drops below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Apply damage. Returns true only on the call that takes health from positive to zero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.current <= 0 {
            return false;
        }
        self.current = (self.current - amount.max(0)).max(0);
        self.current == 0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Remaining fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Elapsed/duration pair for effects and animations advanced by the tick loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub elapsed: f32,
    pub duration: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: seconds.max(0.0),
        }
    }

    /// Advance by `dt`; returns true once the duration has been reached.
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Progress in `[0, 1]`. Zero-length lifetimes report complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_death_once() {
        let mut h = Health::new(8);
        assert!(!h.take_damage(4));
        assert!(h.take_damage(6));
        assert_eq!(h.current, 0);
        assert!(!h.take_damage(4));
        assert_eq!(h.current, 0);
        assert!(h.is_dead());
    }

    #[test]
    fn health_fraction() {
        let mut h = Health::new(100);
        h.take_damage(40);
        assert!((h.fraction() - 0.6).abs() < 1e-6);
        assert_eq!(Health::new(0).max, 1);
    }

    #[test]
    fn lifetime_progress() {
        let mut l = Lifetime::new(1.0);
        assert!(!l.update(0.25));
        assert!((l.progress() - 0.25).abs() < 1e-6);
        assert!(l.update(2.0));
        assert_eq!(l.progress(), 1.0);
        assert!(Lifetime::new(0.0).is_finished());
    }
}
