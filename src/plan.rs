use kurbo::{Affine, BezPath};

use crate::config::Color;

pub use kurbo::Point;

// ============================================================================
// GEOMETRY PRIMITIVES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    /// Anchor point; vertically centered on the text
    pub position: Point,
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    /// Degrees, clockwise on a y-down surface
    pub rotation: f64,
    pub align: TextAlign,
    /// Surfaces shrink the font until the text fits
    pub max_width: Option<f64>,
    pub color: Color,
}

/// The needle outline, unrotated, plus the rotation the surface applies around `pivot`.
#[derive(Debug, Clone, PartialEq)]
pub struct NeedleGeometry {
    pub path: BezPath,
    pub pivot: Point,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

impl NeedleGeometry {
    /// Rotation around the pivot, clockwise on a y-down surface.
    pub fn transform(&self) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), self.pivot)
    }

    pub fn rotated_path(&self) -> BezPath {
        let mut path = self.path.clone();
        path.apply_affine(self.transform());
        path
    }
}

// ============================================================================
// DRAW COMMANDS
// ============================================================================

/// Angles of `Arc` and `Wedge` are in degrees, 0 = +x, clockwise on a y-down surface.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        extent: f64,
        width: f64,
        color: Color,
    },
    Wedge {
        center: Point,
        radius: f64,
        start_angle: f64,
        extent: f64,
        color: Color,
    },
    RoundedRect {
        origin: Point,
        width: f64,
        height: f64,
        corner: f64,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text(TextCommand),
    Needle(NeedleGeometry),
}

// ============================================================================
// DRAW PLAN
// ============================================================================

/// One frame's primitives in paint order.
///
/// The value readout and the needle are kept in their own slots so the
/// per-frame read-back can update them without a new layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawPlan {
    /// Top-left corner of the square disk
    pub origin: Point,
    pub size: f64,
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
    pub value_text: Option<DrawCommand>,
    pub needle: Option<DrawCommand>,
    pub foreground: Vec<DrawCommand>,
}

impl DrawPlan {
    pub fn new(width: f64, height: f64, origin: Point, size: f64) -> Self {
        Self {
            origin,
            size,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend<I: IntoIterator<Item = DrawCommand>>(&mut self, commands: I) {
        self.commands.extend(commands);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.value_text.is_none()
            && self.needle.is_none()
            && self.foreground.is_empty()
    }

    /// Every command in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .chain(self.value_text.iter())
            .chain(self.needle.iter())
            .chain(self.foreground.iter())
    }

    pub fn needle(&self) -> Option<&NeedleGeometry> {
        match &self.needle {
            Some(DrawCommand::Needle(needle)) => Some(needle),
            _ => None,
        }
    }

    pub fn needle_rotation(&self) -> Option<f64> {
        self.needle().map(|needle| needle.rotation)
    }

    pub fn set_needle_rotation(&mut self, rotation: f64) {
        if let Some(DrawCommand::Needle(needle)) = &mut self.needle {
            needle.rotation = rotation;
        }
    }

    pub fn value_text(&self) -> Option<&TextCommand> {
        match &self.value_text {
            Some(DrawCommand::Text(text)) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_is_clockwise_on_screen() {
        let pivot = Point::new(10.0, 10.0);
        let up = Point::new(10.0, 0.0);
        let turned = Affine::rotate_about(90f64.to_radians(), pivot) * up;
        assert!((turned.x - 20.0).abs() < 1e-9);
        assert!((turned.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn iteration_keeps_layer_order() {
        let text = |s: &str| {
            DrawCommand::Text(TextCommand {
                position: Point::default(),
                text: s.to_string(),
                font_size: 10.0,
                bold: false,
                rotation: 0.0,
                align: TextAlign::Center,
                max_width: None,
                color: Color::BLACK,
            })
        };
        let mut plan = DrawPlan::new(100.0, 100.0, Point::default(), 100.0);
        plan.add_command(text("background"));
        plan.foreground.push(text("knob"));
        plan.value_text = Some(text("value"));
        let order: Vec<_> = plan
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(order, ["background", "value", "knob"]);
    }
}
