//! Simulated playback used by the command line tool and by tests.
//!
//! [`SimulatedVideo`] is a deterministic stand-in for a real media element:
//! it is driven by a [`PlaybackClock`] and queues the signals a browser video
//! would emit. [`Stage`] plays the role of the document that resolves element
//! identifiers.

mod simulation;
mod video;

pub use simulation::{run_simulation, Cue, FiredCue, OVERLAY_ID, VIDEO_ID};
pub use video::{SimulatedVideo, Stage};

/// Monotonic playback position that can be advanced, reset or moved.
#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    pub time_seconds: f64,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
    }

    pub fn advance(&mut self, delta: f64) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }

    pub fn seek(&mut self, position: f64) {
        self.time_seconds = position.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_goes_negative() {
        let mut clock = PlaybackClock::default();
        clock.advance(1.5);
        assert_eq!(clock.time_seconds, 1.5);
        clock.advance(-4.0);
        assert_eq!(clock.time_seconds, 0.0);
        clock.seek(-2.0);
        assert_eq!(clock.time_seconds, 0.0);
    }

    #[test]
    fn clock_seeks_and_resets() {
        let mut clock = PlaybackClock::default();
        clock.seek(42.0);
        assert_eq!(clock.time_seconds, 42.0);
        clock.reset();
        assert_eq!(clock.time_seconds, 0.0);
    }
}
