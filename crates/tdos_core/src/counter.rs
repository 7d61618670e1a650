/// A count bounded by a mutable ceiling, used for health and lives.
///
/// `available` always stays within `[0, max]`. Lowering `max` drags
/// `available` down with it; raising it leaves `available` alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CappedCounter {
    available: u32,
    max: u32,
}

impl CappedCounter {
    pub fn new(available: u32, max: u32) -> Self {
        Self {
            available: available.min(max),
            max,
        }
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Add a signed amount to `available`, clamping into `[0, max]`.
    /// Returns the new value.
    pub fn change(&mut self, delta: i64) -> u32 {
        let next = (self.available as i64 + delta).clamp(0, self.max as i64);
        self.available = next as u32;
        self.available
    }

    /// Add a signed amount to `max`, never going below zero.
    pub fn change_max(&mut self, delta: i64) -> u32 {
        let next = (self.max as i64 + delta).max(0);
        self.max = next as u32;
        self.available = self.available.min(self.max);
        self.max
    }

    pub fn fill(&mut self) -> u32 {
        self.available = self.max;
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_clamps_to_range() {
        let mut health = CappedCounter::new(3, 3);
        assert_eq!(health.change(5), 3);
        assert_eq!(health.change(-10), 0);
        assert!(health.is_empty());
    }

    #[test]
    fn lowering_max_clamps_available() {
        let mut lives = CappedCounter::new(2, 4);
        lives.change_max(-3);
        assert_eq!(lives.max(), 1);
        assert_eq!(lives.available(), 1);
    }

    #[test]
    fn max_never_goes_negative() {
        let mut lives = CappedCounter::new(0, 1);
        assert_eq!(lives.change_max(-5), 0);
        assert_eq!(lives.change(1), 0);
    }

    #[test]
    fn new_clamps_initial_value() {
        let counter = CappedCounter::new(9, 2);
        assert_eq!(counter.available(), 2);
    }
}
