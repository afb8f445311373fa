// ============================================================================
// CRATE LAYOUT
// ============================================================================
//
// Core (no I/O): config, angle, ticks, tick_marks, ranges, markers, needle,
// indicators, layout, plan, gauge.
// Host: canvas (software rasterizer), window (winit + pixels), error.

pub mod angle;
pub mod canvas;
pub mod config;
pub mod error;
pub mod gauge;
pub mod indicators;
pub mod layout;
pub mod markers;
pub mod needle;
pub mod plan;
pub mod ranges;
pub mod tick_marks;
pub mod ticks;
pub mod window;

pub use angle::AngleMapper;
pub use canvas::Canvas;
pub use config::{
    Color, GaugeConfig, Marker, MarkerType, NeedleSize, ScaleDirection, Section,
    TickLabelLocation, TickLabelOrientation, TickMarkType, TierStyle,
};
pub use error::GaugeError;
pub use gauge::{Gauge, GaugeEvent, GaugeState};
pub use layout::{layout, Disk};
pub use plan::{DrawCommand, DrawPlan, Point};
pub use ticks::{TickDescriptor, TickPlanner, TickTier};
pub use window::{GaugeCommand, GaugeWindow, WindowConfig};
