pub const TICKS_PER_MINUTE: u32 = 60;

/// Seconds elapsed in the current minute and how much of the progress band
/// has already been drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerDisplay {
    seconds: u32,
    drawn_to: u32,
}

impl TimerDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// First row not yet covered by the band.
    pub fn drawn_to(&self) -> u32 {
        self.drawn_to
    }

    /// Advances one second. Returns `true` when the minute wrapped and the
    /// surface has to be redrawn from scratch.
    pub fn advance(&mut self) -> bool {
        self.seconds = (self.seconds + 1) % TICKS_PER_MINUTE;
        self.seconds == 0
    }

    pub fn reset(&mut self) {
        self.seconds = 0;
        self.drawn_to = 0;
    }

    /// Forgets the drawn band after the surface was cleared.
    pub fn rewind(&mut self) {
        self.drawn_to = 0;
    }

    pub fn boundary(&self, height: u32) -> u32 {
        (u64::from(height) * u64::from(self.seconds) / u64::from(TICKS_PER_MINUTE)) as u32
    }

    /// Rows `[top, bottom)` still to fill to reach the current boundary.
    pub fn take_band(&mut self, height: u32) -> Option<(u32, u32)> {
        let target = self.boundary(height);
        if target <= self.drawn_to {
            return None;
        }
        let band = (self.drawn_to, target);
        self.drawn_to = target;
        Some(band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_grow_contiguously_over_a_minute() {
        let mut timer = TimerDisplay::new();
        let mut covered = 0;
        for _ in 1..TICKS_PER_MINUTE {
            assert!(!timer.advance());
            if let Some((top, bottom)) = timer.take_band(600) {
                assert_eq!(top, covered);
                assert_eq!(bottom, timer.seconds() * 10);
                covered = bottom;
            }
        }
        assert_eq!(timer.seconds(), 59);
        assert_eq!(covered, 590);
        assert!(timer.advance());
        assert_eq!(timer.seconds(), 0);
    }

    #[test]
    fn short_surfaces_skip_empty_bands() {
        let mut timer = TimerDisplay::new();
        timer.advance();
        assert_eq!(timer.take_band(30), None);
        timer.advance();
        assert_eq!(timer.take_band(30), Some((0, 1)));
        assert_eq!(timer.take_band(30), None);
    }

    #[test]
    fn rewind_redraws_from_the_top() {
        let mut timer = TimerDisplay::new();
        for _ in 0..30 {
            timer.advance();
        }
        assert_eq!(timer.take_band(120), Some((0, 60)));
        timer.rewind();
        assert_eq!(timer.take_band(120), Some((0, 60)));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut timer = TimerDisplay::new();
        for _ in 0..10 {
            timer.advance();
        }
        timer.take_band(60);
        timer.reset();
        assert_eq!(timer, TimerDisplay::new());
        assert_eq!(timer.take_band(60), None);
    }
}
