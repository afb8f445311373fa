use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation error: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("Failed to parse font {}", .0.display())]
    Font(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
