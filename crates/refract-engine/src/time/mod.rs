//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop; call `tick()` once per presented frame
//! - one `FpsCounter` fed with each frame's `dt` to report averaged timings

mod fps;
mod frame_clock;

pub use fps::{FpsCounter, FpsReport};
pub use frame_clock::{FrameClock, FrameTime};
