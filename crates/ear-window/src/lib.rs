//! EAR Sample Window
//!
//! Bounded FIFO history of combined eye-aspect-ratio samples, owned by a
//! single polling loop.

mod stats;
mod window;

pub use stats::WindowStats;
pub use window::{record_sample, EarWindow, DEFAULT_WINDOW_SIZE};

use thiserror::Error;

/// Window construction errors
#[derive(Error, Debug, PartialEq)]
pub enum WindowError {
    #[error("Window capacity must be at least 1")]
    ZeroCapacity,
}
