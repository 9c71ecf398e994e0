//! Form rendering module
//!
//! - `field_renderer`: single-line inputs
//! - `steps`: the body of each step

mod field_renderer;
mod steps;

pub use steps::draw_step;
