//! Value ↔ angle conversion shared by every angle-dependent part of the dial.
//!
//! Three frames are in play:
//! - the *needle* frame (`angle_of`): degrees, screen-clockwise, 0 = pointing up;
//! - the *scale* frame (`scale_angle`): points sit at `(cx + r·sin θ, cy + r·cos θ)`
//!   with y pointing down, so θ = 0 is straight down;
//! - the *surface* frame (`surface_angle`): 0 = +x axis, screen-clockwise, used for arcs.

use crate::config::{GaugeConfig, ScaleDirection};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleMapper {
    min: f64,
    max: f64,
    start_angle: f64,
    angle_range: f64,
    angle_step: f64,
    direction: ScaleDirection,
}

impl AngleMapper {
    pub fn new(
        min: f64,
        max: f64,
        start_angle: f64,
        angle_range: f64,
        direction: ScaleDirection,
    ) -> Self {
        let angle_step = if max > min {
            angle_range / (max - min)
        } else {
            0.0
        };
        Self {
            min,
            max,
            start_angle,
            angle_range,
            angle_step,
            direction,
        }
    }

    pub fn from_config(config: &GaugeConfig) -> Self {
        Self::new(
            config.min,
            config.max,
            config.start_angle,
            config.angle_range,
            config.scale_direction,
        )
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    pub fn direction(&self) -> ScaleDirection {
        self.direction
    }

    /// Angular distance of `value` from `min`, signed by scale direction.
    fn signed_offset(&self, value: f64) -> f64 {
        let offset = (value - self.min) * self.angle_step;
        match self.direction {
            ScaleDirection::Clockwise => offset,
            ScaleDirection::CounterClockwise => -offset,
        }
    }

    /// Needle rotation at which the needle's zero reference sits.
    pub fn base_angle(&self) -> f64 {
        180.0 - self.start_angle
    }

    /// Needle rotation for `value`, unclamped.
    pub fn angle_of(&self, value: f64) -> f64 {
        self.base_angle() + self.signed_offset(value)
    }

    /// Inverse of [`AngleMapper::angle_of`].
    pub fn value_of(&self, angle: f64) -> f64 {
        if self.angle_step == 0.0 {
            return self.min;
        }
        let offset = angle - self.base_angle();
        match self.direction {
            ScaleDirection::Clockwise => offset / self.angle_step + self.min,
            ScaleDirection::CounterClockwise => -offset / self.angle_step + self.min,
        }
    }

    /// Needle rotation for `value`, never past the physical ends of the scale.
    pub fn clamped_angle_of(&self, value: f64) -> f64 {
        let base = self.base_angle();
        let (lower, upper) = match self.direction {
            ScaleDirection::Clockwise => (base, base + self.angle_range),
            ScaleDirection::CounterClockwise => (base - self.angle_range, base),
        };
        self.angle_of(value).clamp(lower.min(upper), lower.max(upper))
    }

    /// Position of `value` in the scale frame.
    pub fn scale_angle(&self, value: f64) -> f64 {
        self.start_angle - self.signed_offset(value)
    }

    /// Position of `value` in the surface frame.
    pub fn surface_angle(&self, value: f64) -> f64 {
        90.0 - self.scale_angle(value)
    }

    /// Signed surface-frame sweep from `from` to `to`.
    pub fn surface_extent(&self, from: f64, to: f64) -> f64 {
        self.signed_offset(to) - self.signed_offset(from)
    }

    pub fn clamp_value(&self, value: f64) -> f64 {
        if self.max > self.min {
            value.clamp(self.min, self.max)
        } else {
            self.min
        }
    }
}
