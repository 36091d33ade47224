//=========================================================================
// Frame Pacer
//=========================================================================
//
// Keeps the loop at a fixed cadence by sleeping out the remainder of
// each frame.
//
// An overrun frame is not made up for: the next frame is measured from
// the moment the overrun was detected.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::debug;

//=== FramePacer ==========================================================

#[derive(Debug, Clone)]
pub struct FramePacer {
    target: Duration,
    last_frame: Option<Instant>,
}

impl FramePacer {
    pub fn new(target: Duration) -> Self {
        Self {
            target,
            last_frame: None,
        }
    }

    /// Pacer targeting `fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not positive.
    pub fn from_fps(fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive");
        Self::new(Duration::from_secs_f64(1.0 / fps))
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Computes the sleep needed at `now` and records `now` as the last
    /// frame time.
    ///
    /// The first call only seeds the timestamp and returns zero.
    pub fn delay_for(&mut self, now: Instant) -> Duration {
        let Some(last) = self.last_frame.replace(now) else {
            return Duration::ZERO;
        };

        let elapsed = now.saturating_duration_since(last);
        let delay = self.target.saturating_sub(elapsed);

        if elapsed > self.target {
            debug!(
                target: "frame",
                "Frame overran by {:?} (target {:?})",
                elapsed - self.target,
                self.target
            );
        }

        delay
    }

    /// Sleeps until the next frame is due.
    pub fn delay_to_next_frame(&mut self) {
        let delay = self.delay_for(Instant::now());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Duration = Duration::from_millis(16);

    #[test]
    fn first_call_does_not_sleep() {
        let mut pacer = FramePacer::new(TARGET);
        assert_eq!(pacer.delay_for(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn first_call_does_not_sleep_right_after_boot() {
        // Instants this close to the clock origin cannot go back a frame
        let mut pacer = FramePacer::new(Duration::from_secs(1_000_000_000));
        assert_eq!(pacer.delay_for(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn sleeps_remainder_of_frame() {
        let mut pacer = FramePacer::new(TARGET);
        let t0 = Instant::now();
        pacer.delay_for(t0);

        let delay = pacer.delay_for(t0 + Duration::from_millis(4));
        assert_eq!(delay, Duration::from_millis(12));
    }

    #[test]
    fn exact_cadence_does_not_sleep() {
        let mut pacer = FramePacer::new(TARGET);
        let t0 = Instant::now();
        pacer.delay_for(t0);
        assert_eq!(pacer.delay_for(t0 + TARGET), Duration::ZERO);
    }

    #[test]
    fn overrun_does_not_catch_up() {
        let mut pacer = FramePacer::new(TARGET);
        let t0 = Instant::now();
        pacer.delay_for(t0);

        // 40ms frame: no sleep, and no shortened frame afterwards
        let t1 = t0 + Duration::from_millis(40);
        assert_eq!(pacer.delay_for(t1), Duration::ZERO);

        let t2 = t1 + Duration::from_millis(6);
        assert_eq!(pacer.delay_for(t2), Duration::from_millis(10));
    }

    #[test]
    fn timestamp_updates_on_every_call() {
        let mut pacer = FramePacer::new(TARGET);
        let t0 = Instant::now();
        pacer.delay_for(t0);

        let t1 = t0 + Duration::from_millis(10);
        pacer.delay_for(t1);

        // Measured from t1, not t0
        let t2 = t1 + Duration::from_millis(10);
        assert_eq!(pacer.delay_for(t2), Duration::from_millis(6));
    }

    #[test]
    fn from_fps_derives_target() {
        let pacer = FramePacer::from_fps(50.0);
        assert_eq!(pacer.target(), Duration::from_millis(20));
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn from_fps_rejects_zero() {
        FramePacer::from_fps(0.0);
    }
}
