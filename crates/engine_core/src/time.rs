//! Frame clock driven by the host loop.

/// Tracks frame timing for a host loop that hands gameplay an explicit delta each frame.
///
/// The clock never reads the wall clock itself, so headless sessions and tests replay
/// deterministically.
#[derive(Debug, Clone)]
pub struct Time {
    /// Duration of the last frame in seconds.
    delta: f32,
    /// Total elapsed time since start in seconds.
    elapsed: f64,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed step used by `step` (default 60 Hz).
    fixed_timestep: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock at t = 0 with a 60 Hz fixed step.
    pub fn new() -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            fixed_timestep: 1.0 / 60.0,
        }
    }

    /// Create a clock stepping at `hz` frames per second.
    pub fn with_fixed_rate(hz: f32) -> Self {
        let mut time = Self::new();
        time.set_fixed_rate(hz);
        time
    }

    /// Begin a new frame of length `dt` seconds. Negative deltas are treated as zero.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.elapsed += self.delta as f64;
        self.frame_count += 1;
    }

    /// Begin a new frame of the fixed step length and return that length.
    pub fn step(&mut self) -> f32 {
        self.advance(self.fixed_timestep);
        self.delta
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep
    }

    /// Set the fixed timestep rate in Hz. Non-positive rates are ignored.
    pub fn set_fixed_rate(&mut self, hz: f32) {
        if hz > 0.0 {
            self.fixed_timestep = 1.0 / hz;
        }
    }
}
