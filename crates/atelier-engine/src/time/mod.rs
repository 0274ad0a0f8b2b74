//! Draw timing exposed to sketches as `delta_time()` / `millis()`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
