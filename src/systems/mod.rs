//! Application systems
//!
//! Modular systems kept out of main.rs for better organization and testability.

mod compute;
mod render;
mod window;

pub use compute::{ComputePoll, ComputeSystem, ProgressSink, StatusSink, STATUS_COMPUTING, STATUS_READY};
pub use render::RenderSystem;
pub use window::{TitleSink, TitleState, WindowError, WindowSystem};
