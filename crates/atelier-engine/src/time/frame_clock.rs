use std::time::{Duration, Instant};

/// Longest delta reported to a sketch. Debugger pauses and minimized windows
/// otherwise show up as one enormous step.
const MAX_DT: Duration = Duration::from_millis(250);

/// Timing of one executed draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous draw; `0.0` on the first.
    pub dt: f32,
    /// Time since the clock started.
    pub elapsed: Duration,
    /// Draws timed before this one.
    pub frame_index: u64,
}

/// Draw-to-draw clock owned by the frame controller.
///
/// Only executed draws tick it, so skipped and frozen ticks do not count.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Option<Instant>,
    draws: u64,
    max_dt: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_dt(MAX_DT)
    }

    pub fn with_max_dt(max_dt: Duration) -> Self {
        Self {
            origin: Instant::now(),
            last: None,
            draws: 0,
            max_dt,
        }
    }

    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Marks one draw and returns its timing.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last).min(self.max_dt));
        self.last = Some(now);

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.origin),
            frame_index: self.draws,
        };
        self.draws += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
