//! Application state module

mod app_state;
mod forms;
mod steps;
mod timers;

pub use app_state::*;
pub use forms::*;
pub use steps::*;
pub use timers::*;
