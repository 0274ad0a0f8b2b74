/// Loop flags for one engine instance.
///
/// Conceptual states:
/// - NotStarted / SetupPending: `!setup_done`
/// - Idle: `setup_done`, between ticks
/// - Drawing: inside `update()` / `draw()`
///
/// Invariants:
/// - `setup_done` flips at most once
/// - `no_loop_drawn` latches only after a draw ran while `!looping && !ignore_no_loop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameState {
    pub frame_count: u64,
    pub looping: bool,
    pub no_loop_drawn: bool,
    pub redraw_requested: bool,
    pub setup_done: bool,
    pub ignore_no_loop: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            frame_count: 0,
            looping: true,
            no_loop_drawn: false,
            redraw_requested: false,
            setup_done: false,
            ignore_no_loop: false,
        }
    }
}

impl FrameState {
    /// True when the no-loop latch freezes the content and nothing overrides it.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.no_loop_drawn && !self.looping && !self.ignore_no_loop && !self.redraw_requested
    }

    /// Ordered should-draw decision. Returns the reason a draw is due, if any.
    pub fn draw_reason(&self, drew_before: bool) -> Option<DrawReason> {
        if self.looping {
            Some(DrawReason::Looping)
        } else if self.redraw_requested {
            Some(DrawReason::Redraw)
        } else if self.ignore_no_loop {
            Some(DrawReason::HostOverride)
        } else if !drew_before && self.frame_count == 0 {
            Some(DrawReason::FirstFrame)
        } else {
            None
        }
    }
}

/// Why a tick decided to draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawReason {
    Looping,
    Redraw,
    HostOverride,
    FirstFrame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_wins_over_everything() {
        let s = FrameState { redraw_requested: true, ..FrameState::default() };
        assert_eq!(s.draw_reason(true), Some(DrawReason::Looping));
    }

    #[test]
    fn redraw_checked_before_override() {
        let s = FrameState {
            looping: false,
            redraw_requested: true,
            ignore_no_loop: true,
            ..FrameState::default()
        };
        assert_eq!(s.draw_reason(true), Some(DrawReason::Redraw));
    }

    #[test]
    fn first_frame_draws_once_without_loop() {
        let s = FrameState { looping: false, ..FrameState::default() };
        assert_eq!(s.draw_reason(false), Some(DrawReason::FirstFrame));
        assert_eq!(s.draw_reason(true), None);
        let later = FrameState { frame_count: 1, ..s };
        assert_eq!(later.draw_reason(false), None);
    }

    #[test]
    fn frozen_requires_latch_and_no_override() {
        let mut s = FrameState { looping: false, no_loop_drawn: true, ..FrameState::default() };
        assert!(s.is_frozen());
        s.redraw_requested = true;
        assert!(!s.is_frozen());
        s.redraw_requested = false;
        s.looping = true;
        assert!(!s.is_frozen());
    }
}
