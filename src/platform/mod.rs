//! Platform abstraction layer
//!
//! Boundary traits for the collaborators the core consumes:
//! - Input intents (non-blocking poll)
//! - Time/ticks
//! - Frame presentation

pub mod frame;
pub mod input;
pub mod time;

pub use frame::{Frame, FrameSink, LogSink};
pub use input::{InputSource, Intent, ScriptedInput};
pub use time::{Clock, ManualClock, SystemClock, unix_now};
