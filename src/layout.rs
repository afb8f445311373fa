//! Turns a gauge state and an available area into a [`DrawPlan`].
//!
//! Every geometric constant elsewhere in the crate is a fraction of the disk
//! size, so this module only decides where the square disk sits and in which
//! order the layers are painted.

use log::debug;

use crate::angle::AngleMapper;
use crate::config::GaugeConfig;
use crate::gauge::GaugeState;
use crate::indicators;
use crate::markers;
use crate::needle;
use crate::plan::{DrawCommand, DrawPlan, Point, Stroke};
use crate::ranges;
use crate::tick_marks::TickRenderer;
use crate::ticks::TickPlanner;

/// Largest disk the layout will produce, in pixels
pub const MAXIMUM_SIZE: f64 = 1024.0;

/// Size used when the host has no opinion
pub const PREFERRED_SIZE: f64 = 250.0;

const KNOB_RADIUS: f64 = 0.05;
const KNOB_STROKE: f64 = 0.005;

/// The square the dial is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub origin: Point,
    pub size: f64,
}

impl Disk {
    pub fn new(origin: Point, size: f64) -> Self {
        Self { origin, size }
    }

    /// Largest square that fits `width × height`, centered, capped at [`MAXIMUM_SIZE`].
    pub fn fit(width: f64, height: f64) -> Option<Self> {
        let size = width.min(height).min(MAXIMUM_SIZE);
        if !size.is_finite() || size <= 0.0 {
            return None;
        }
        Some(Self {
            origin: Point::new((width - size) * 0.5, (height - size) * 0.5),
            size,
        })
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size * 0.5,
            self.origin.y + self.size * 0.5,
        )
    }

    /// `factor · size` scaled to pixels.
    pub fn scaled(&self, factor: f64) -> f64 {
        self.size * factor
    }

    /// Point at `factor · size` from the center along scale-frame angle `theta`.
    pub fn polar(&self, factor: f64, theta: f64) -> Point {
        let center = self.center();
        let (sin, cos) = theta.to_radians().sin_cos();
        let radius = self.size * factor;
        Point::new(center.x + radius * sin, center.y + radius * cos)
    }

    /// Point at fractional offsets from the disk's top-left corner.
    pub fn at(&self, fx: f64, fy: f64) -> Point {
        Point::new(
            self.origin.x + self.size * fx,
            self.origin.y + self.size * fy,
        )
    }
}

/// Full layout pass.
pub fn layout(state: &GaugeState, width: f64, height: f64) -> DrawPlan {
    let Some(disk) = Disk::fit(width, height) else {
        debug!("nothing to lay out in {width}x{height}");
        return DrawPlan::new(width, height, Point::default(), 0.0);
    };
    let config = &state.config;
    let mapper = AngleMapper::from_config(config);
    let mut plan = DrawPlan::new(width, height, disk.origin, disk.size);

    plan.add_command(background(&disk, config));
    if config.areas_visible {
        plan.extend(ranges::render_areas(config, &disk, &mapper));
    }
    if config.sections_visible {
        plan.extend(ranges::render_sections(config, &disk, &mapper));
    }

    let ticks = TickPlanner::new(config).plan(&mapper);
    plan.extend(TickRenderer::new(config, disk).render(&ticks));

    plan.extend(markers::render_markers(
        &state.marker_shapes,
        config,
        &disk,
        &mapper,
    ));

    if config.led_visible {
        plan.extend(indicators::led(&disk, config.led_color, state.led_on));
    }
    if config.lcd_visible {
        plan.add_command(indicators::lcd_panel(&disk, config));
    }
    plan.extend(indicators::captions(&disk, config));

    plan.needle = Some(DrawCommand::Needle(needle::build_needle(
        &disk,
        config,
        mapper.clamped_angle_of(state.current_value),
    )));
    if config.knob_visible {
        plan.foreground.push(knob(&disk, config));
    }
    refresh(&mut plan, state);

    debug!(
        "laid out {} commands on a {:.0}px disk",
        plan.commands.len(),
        disk.size
    );
    plan
}

/// Updates the needle rotation and value readout of an existing plan.
pub fn refresh(plan: &mut DrawPlan, state: &GaugeState) {
    if plan.size <= 0.0 {
        return;
    }
    let disk = Disk::new(plan.origin, plan.size);
    let mapper = AngleMapper::from_config(&state.config);
    let rotation = mapper.clamped_angle_of(state.current_value);
    plan.set_needle_rotation(rotation);
    plan.value_text = state
        .config
        .value_visible
        .then(|| {
            DrawCommand::Text(indicators::value_readout(
                &disk,
                &state.config,
                mapper.value_of(rotation),
            ))
        });
}

fn background(disk: &Disk, config: &GaugeConfig) -> DrawCommand {
    DrawCommand::Circle {
        center: disk.center(),
        radius: disk.size * 0.5,
        fill: config.background_color,
        stroke: Some(Stroke {
            color: config.border_color,
            width: 1.0,
        }),
    }
}

fn knob(disk: &Disk, config: &GaugeConfig) -> DrawCommand {
    DrawCommand::Circle {
        center: disk.center(),
        radius: disk.scaled(KNOB_RADIUS),
        fill: config.knob_color,
        stroke: Some(Stroke {
            color: config.knob_color.darker(),
            width: disk.scaled(KNOB_STROKE),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_centers_the_square() {
        let disk = Disk::fit(400.0, 300.0).unwrap();
        assert_eq!(disk.size, 300.0);
        assert_eq!(disk.origin, Point::new(50.0, 0.0));
        assert_eq!(disk.center(), Point::new(200.0, 150.0));
    }

    #[test]
    fn fit_caps_at_maximum() {
        let disk = Disk::fit(3000.0, 2000.0).unwrap();
        assert_eq!(disk.size, MAXIMUM_SIZE);
        assert_eq!(disk.origin, Point::new(988.0, 488.0));
    }

    #[test]
    fn fit_rejects_empty_area() {
        assert!(Disk::fit(0.0, 200.0).is_none());
        assert!(Disk::fit(-5.0, -5.0).is_none());
    }

    #[test]
    fn polar_zero_points_down() {
        let disk = Disk::new(Point::default(), 200.0);
        let p = disk.polar(0.5, 0.0);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 200.0).abs() < 1e-9);
        let right = disk.polar(0.5, 90.0);
        assert!((right.x - 200.0).abs() < 1e-9);
        assert!((right.y - 100.0).abs() < 1e-9);
    }
}
