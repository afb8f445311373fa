//! Needle outline.
//!
//! The outline is built pointing straight up from the pivot and rotated by
//! the surface, so a value change only touches the rotation.

use crate::config::{GaugeConfig, TickLabelLocation};
use crate::layout::Disk;
use kurbo::BezPath;

use crate::plan::{NeedleGeometry, Point};

/// Shoulder height of the rounded tip, relative to the needle height
const SHOULDER: f64 = 3.0 / 118.0;
/// Control point height of the tip curve
const TIP_CONTROL: f64 = 1.0 / 118.0;

pub fn needle_height(disk: &Disk, config: &GaugeConfig) -> f64 {
    match config.tick_label_location {
        TickLabelLocation::Outside => disk.scaled(0.3965),
        TickLabelLocation::Inside => disk.scaled(0.455),
    }
}

pub fn build_needle(disk: &Disk, config: &GaugeConfig, rotation: f64) -> NeedleGeometry {
    let w = disk.scaled(config.needle_size.factor());
    let h = needle_height(disk, config);
    let center = disk.center();
    let left = center.x - w * 0.5;
    let top = center.y - h;
    let p = |fx: f64, fy: f64| Point::new(left + w * fx, top + h * fy);

    let mut path = BezPath::new();
    path.move_to(p(0.25, SHOULDER));
    path.curve_to(p(0.25, TIP_CONTROL), p(0.375, 0.0), p(0.5, 0.0));
    path.curve_to(p(0.625, 0.0), p(0.75, TIP_CONTROL), p(0.75, SHOULDER));
    path.curve_to(p(0.75, SHOULDER), p(1.0, 1.0), p(1.0, 1.0));
    path.line_to(p(0.0, 1.0));
    path.curve_to(p(0.0, 1.0), p(0.25, SHOULDER), p(0.25, SHOULDER));
    path.close_path();

    NeedleGeometry {
        path,
        pivot: center,
        rotation,
        width: w,
        height: h,
        fill: config.needle_color,
    }
}

impl NeedleGeometry {
    /// Tip of the needle after rotation.
    pub fn tip(&self) -> Point {
        self.transform() * Point::new(self.pivot.x, self.pivot.y - self.height)
    }
}
