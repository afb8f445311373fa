// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================
//
// Executes a DrawPlan into an RGBA8 frame buffer. Shapes are anti-aliased by
// distance falloff or 2x2 supersampling; text goes through rusttype.

use kurbo::{BezPath, PathEl};
use log::warn;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::plan::{DrawCommand, DrawPlan, NeedleGeometry, Point, Stroke, TextAlign, TextCommand};

/// Maximum distance in pixels between a curve and its flattened outline
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Smallest font size text is shrunk to when it overflows its max width
const MIN_FONT_SIZE: f32 = 4.0;

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'static>>,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<&'a Font<'static>>) -> Self {
        self.font = font;
        self
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn render(&mut self, plan: &DrawPlan) {
        let mut skipped_text = 0usize;
        for command in plan.iter() {
            if matches!(command, DrawCommand::Text(_)) && self.font.is_none() {
                skipped_text += 1;
                continue;
            }
            self.draw(command);
        }
        if skipped_text > 0 {
            warn!("no font loaded, skipped {skipped_text} text commands");
        }
    }

    pub fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => self.draw_thick_line_aa(*from, *to, *width, *color),
            DrawCommand::Polygon {
                points,
                fill,
                stroke,
            } => {
                self.fill_polygon(points, *fill);
                if let Some(stroke) = stroke {
                    self.stroke_outline(points, *stroke);
                }
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                self.draw_circle(*center, *radius, *fill);
                if let Some(stroke) = stroke {
                    self.draw_ring(*center, *radius, stroke.width, 0.0, 360.0, stroke.color);
                }
            }
            DrawCommand::Arc {
                center,
                radius,
                start_angle,
                extent,
                width,
                color,
            } => self.draw_ring(*center, *radius, *width, *start_angle, *extent, *color),
            DrawCommand::Wedge {
                center,
                radius,
                start_angle,
                extent,
                color,
            } => self.draw_wedge(*center, *radius, *start_angle, *extent, *color),
            DrawCommand::RoundedRect {
                origin,
                width,
                height,
                corner,
                fill,
                stroke,
            } => self.draw_rounded_rect(*origin, *width, *height, *corner, *fill, *stroke),
            DrawCommand::Text(text) => self.draw_text(text),
            DrawCommand::Needle(needle) => self.draw_needle(needle),
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0) * color.a as f64 / 255.0;
        if alpha > 0.001 {
            set_pixel(self.frame, self.width, x as usize, y as usize, color, alpha as f32);
        }
    }

    fn clip_box(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> (i64, i64, i64, i64) {
        (
            (min_x.floor() as i64 - 1).max(0),
            (min_y.floor() as i64 - 1).max(0),
            (max_x.ceil() as i64 + 1).min(self.width as i64 - 1),
            (max_y.ceil() as i64 + 1).min(self.height as i64 - 1),
        )
    }

    fn draw_thick_line_aa(&mut self, from: Point, to: Point, thickness: f64, color: Color) {
        let half = thickness * 0.5;
        let (min_x, min_y, max_x, max_y) = self.clip_box(
            from.x.min(to.x) - half,
            from.y.min(to.y) - half,
            from.x.max(to.x) + half,
            from.y.max(to.y) + half,
        );
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = (dx * dx + dy * dy).max(f64::EPSILON);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5 - from.x;
                let py = y as f64 + 0.5 - from.y;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let dist = ((px - t * dx).powi(2) + (py - t * dy).powi(2)).sqrt();
                let aa = (half + 0.5 - dist).clamp(0.0, 1.0);
                self.blend(x, y, color, aa);
            }
        }
    }

    fn draw_circle(&mut self, center: Point, radius: f64, color: Color) {
        let (min_x, min_y, max_x, max_y) = self.clip_box(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        );
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dist = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
                self.blend(x, y, color, radius + 0.5 - dist);
            }
        }
    }

    /// Band of `width` centered on `radius`, limited to the angular span.
    fn draw_ring(&mut self, center: Point, radius: f64, width: f64, start: f64, extent: f64, color: Color) {
        let outer = radius + width * 0.5;
        let inner = (radius - width * 0.5).max(0.0);
        let span = AngularSpan::new(start, extent);
        let (min_x, min_y, max_x, max_y) = self.clip_box(
            center.x - outer,
            center.y - outer,
            center.x + outer,
            center.y + outer,
        );
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5 - center.x;
                let py = y as f64 + 0.5 - center.y;
                if !span.contains(py.atan2(px).to_degrees()) {
                    continue;
                }
                let dist = (px * px + py * py).sqrt();
                let aa = (outer + 0.5 - dist).min(dist - inner + 0.5);
                self.blend(x, y, color, aa);
            }
        }
    }

    fn draw_wedge(&mut self, center: Point, radius: f64, start: f64, extent: f64, color: Color) {
        let span = AngularSpan::new(start, extent);
        let (min_x, min_y, max_x, max_y) = self.clip_box(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        );
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5 - center.x;
                let py = y as f64 + 0.5 - center.y;
                if !span.contains(py.atan2(px).to_degrees()) {
                    continue;
                }
                let dist = (px * px + py * py).sqrt();
                self.blend(x, y, color, radius + 0.5 - dist);
            }
        }
    }

    /// Even-odd fill with 2x2 supersampling.
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min_x, min_y, max_x, max_y) = points.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        );
        let (min_x, min_y, max_x, max_y) = self.clip_box(min_x, min_y, max_x, max_y);
        const SAMPLES: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let hits = SAMPLES
                    .iter()
                    .filter(|(sx, sy)| contains_point(points, x as f64 + sx, y as f64 + sy))
                    .count();
                if hits > 0 {
                    self.blend(x, y, color, hits as f64 / SAMPLES.len() as f64);
                }
            }
        }
    }

    fn stroke_outline(&mut self, points: &[Point], stroke: Stroke) {
        for (i, from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.draw_thick_line_aa(*from, to, stroke.width, stroke.color);
        }
    }

    fn draw_rounded_rect(
        &mut self,
        origin: Point,
        width: f64,
        height: f64,
        corner: f64,
        fill: Color,
        stroke: Option<Stroke>,
    ) {
        let half_w = width * 0.5;
        let half_h = height * 0.5;
        let center = Point::new(origin.x + half_w, origin.y + half_h);
        let corner = corner.min(half_w).min(half_h);
        let (min_x, min_y, max_x, max_y) =
            self.clip_box(origin.x, origin.y, origin.x + width, origin.y + height);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // signed distance to the rounded box, negative inside
                let qx = (x as f64 + 0.5 - center.x).abs() - (half_w - corner);
                let qy = (y as f64 + 0.5 - center.y).abs() - (half_h - corner);
                let outside = Point::new(qx.max(0.0), qy.max(0.0)).distance(Point::default());
                let sdf = outside + qx.max(qy).min(0.0) - corner;
                self.blend(x, y, fill, 0.5 - sdf);
                if let Some(stroke) = stroke {
                    self.blend(x, y, stroke.color, stroke.width * 0.5 + 0.5 - sdf.abs());
                }
            }
        }
    }

    fn draw_needle(&mut self, needle: &NeedleGeometry) {
        let outline = flatten(&needle.rotated_path());
        self.fill_polygon(&outline, needle.fill);
    }

    fn draw_text(&mut self, command: &TextCommand) {
        let Some(font) = self.font else {
            return;
        };
        if command.text.is_empty() {
            return;
        }

        let mut size = command.font_size as f32;
        let mut width = text_width(font, &command.text, Scale::uniform(size));
        if let Some(max_width) = command.max_width {
            let max_width = max_width as f32;
            if width > max_width && width > 0.0 {
                size = (size * max_width / width).max(MIN_FONT_SIZE);
                width = text_width(font, &command.text, Scale::uniform(size));
            }
        }

        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = font
            .layout(&command.text, scale, point(0.0, v_metrics.ascent))
            .collect();
        let text_height = (v_metrics.ascent - v_metrics.descent) as f64;
        let offset_x = match command.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => width as f64 * 0.5,
            TextAlign::Right => width as f64,
        };
        let (sin, cos) = command.rotation.to_radians().sin_cos();
        let passes: &[f64] = if command.bold { &[0.0, 0.6] } else { &[0.0] };

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                if v <= 0.001 {
                    return;
                }
                for shift in passes {
                    let local_x = (gx as i32 + bb.min.x) as f64 - offset_x + shift;
                    let local_y = (gy as i32 + bb.min.y) as f64 - text_height * 0.5;
                    let x = command.position.x + local_x * cos - local_y * sin;
                    let y = command.position.y + local_x * sin + local_y * cos;
                    self.draw_antialiased_pixel(x, y, command.color, v as f64);
                }
            });
        }
    }

    fn draw_antialiased_pixel(&mut self, x: f64, y: f64, color: Color, alpha: f64) {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let x_frac = x - x_floor;
        let y_frac = y - y_floor;
        let (x0, y0) = (x_floor as i64, y_floor as i64);
        let samples = [
            (x0, y0, (1.0 - x_frac) * (1.0 - y_frac)),
            (x0 + 1, y0, x_frac * (1.0 - y_frac)),
            (x0, y0 + 1, (1.0 - x_frac) * y_frac),
            (x0 + 1, y0 + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            self.blend(px, py, color, alpha * weight);
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Angular range in surface degrees, normalized to a positive sweep.
struct AngularSpan {
    start: f64,
    extent: f64,
}

impl AngularSpan {
    fn new(start: f64, extent: f64) -> Self {
        let (start, extent) = if extent < 0.0 {
            (start + extent, -extent)
        } else {
            (start, extent)
        };
        Self {
            start: start.rem_euclid(360.0),
            extent,
        }
    }

    fn contains(&self, angle: f64) -> bool {
        self.extent >= 360.0 || (angle - self.start).rem_euclid(360.0) <= self.extent
    }
}

fn contains_point(points: &[Point], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Flattens a path into a closed outline.
pub fn flatten(path: &BezPath) -> Vec<Point> {
    let mut outline = Vec::new();
    path.flatten(FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => outline.push(p),
        _ => {}
    });
    outline
}

fn text_width(font: &Font, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map_or(0.0, |glyph| {
            glyph.position().x + glyph.unpositioned().h_metrics().advance_width
        })
}

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: Color, alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [color.r as f32, color.g as f32, color.b as f32];
        let out = [
            (src[0] * alpha + frame[idx] as f32 * (1.0 - alpha)).round() as u8,
            (src[1] * alpha + frame[idx + 1] as f32 * (1.0 - alpha)).round() as u8,
            (src[2] * alpha + frame[idx + 2] as f32 * (1.0 - alpha)).round() as u8,
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}
