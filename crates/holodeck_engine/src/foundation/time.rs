//! Frame timing for the per-panel render clock
//!
//! Every panel owns its own [`FrameClock`] with an explicit start/stop
//! lifecycle. There is deliberately no process-wide animation clock:
//! disposing one panel must never stall or skew the clocks of its
//! siblings.

/// Timing information for a single frame tick.
///
/// Passed into the animation driver so that derivation stays a pure
/// function of its inputs; the driver never reads a wall clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Seconds elapsed since the clock started
    pub elapsed: f32,

    /// Seconds elapsed since the previous frame
    pub delta: f32,
}

impl FrameTiming {
    /// Timing for a frame at a given point with a given frame delta
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Per-panel frame clock advanced by the host's frame callback.
///
/// The host supplies the frame delta; the clock only accumulates. A
/// stopped clock ignores further advances, which makes disposal
/// deterministic: no frame observed after `stop()` can carry time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    elapsed: f32,
    delta: f32,
    frame_count: u64,
    running: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new running clock at time zero
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            frame_count: 0,
            running: true,
        }
    }

    /// Advance the clock by one frame delta (seconds)
    ///
    /// Negative or non-finite deltas are treated as zero so a host timer
    /// glitch cannot run the panel's animations backwards.
    pub fn advance(&mut self, delta: f32) {
        if !self.running {
            return;
        }
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Stop the clock; further advances are ignored
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the clock is still accepting advances
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds elapsed since the clock started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds elapsed during the most recent frame
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of frames observed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Timing snapshot for the current frame
    pub fn timing(&self) -> FrameTiming {
        FrameTiming::new(self.elapsed, self.delta)
    }
}
