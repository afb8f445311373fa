//! Tick mark and tick label geometry.
//!
//! Every radius below is a fraction of the disk size. The two rings differ
//! depending on whether labels sit inside or outside the marks.

use crate::config::{
    color_of_section, Color, GaugeConfig, TickLabelLocation, TickLabelOrientation, TickMarkType,
    TierStyle,
};
use crate::layout::Disk;
use crate::plan::{DrawCommand, Point, TextAlign, TextCommand};
use crate::ticks::{label_decimals, TickDescriptor, TickTier};

/// Geometry slot a mark is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkSlot {
    Major = 0,
    Medium = 1,
    Minor = 2,
}

/// Radii and half-angles for one ring, indexed by [`MarkSlot`].
struct Ring {
    line_inner: [f64; 3],
    line_outer: [f64; 3],
    dot_center: [f64; 3],
    dot_diameter: [f64; 3],
    triangle_inner: [f64; 3],
    triangle_outer: [f64; 3],
    triangle_inner_half: [f64; 3],
    triangle_outer_half: [f64; 3],
    text_mark: f64,
}

const OUTSIDE_RING: Ring = Ring {
    line_inner: [0.3585, 0.3585, 0.3585],
    line_outer: [0.4105, 0.4045, 0.3975],
    dot_center: [0.3685, 0.365375, 0.36225],
    dot_diameter: [0.02, 0.01375, 0.0075],
    triangle_inner: [0.3585, 0.3585, 0.3585],
    triangle_outer: [0.4105, 0.3985, 0.3975],
    triangle_inner_half: [1.2, 1.0, 0.8],
    triangle_outer_half: [0.8, 0.7, 0.6],
    text_mark: 0.3805,
};

const INSIDE_RING: Ring = Ring {
    line_inner: [0.423, 0.43, 0.436],
    line_outer: [0.475, 0.475, 0.475],
    dot_center: [0.4625, 0.465625, 0.46875],
    dot_diameter: [0.025, 0.01875, 0.0125],
    triangle_inner: [0.423, 0.435, 0.440],
    triangle_outer: [0.475, 0.475, 0.475],
    triangle_inner_half: [0.8, 0.7, 0.6],
    triangle_outer_half: [1.2, 1.0, 0.8],
    text_mark: 0.445,
};

const LINE_WIDTH: [f64; 3] = [0.0055, 0.0035, 0.00225];

/// How one tick position is drawn once tier visibility has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMark {
    pub slot: MarkSlot,
    pub mark_type: TickMarkType,
    pub color: Color,
}

/// Rotation for tick label text at scale-frame angle `theta`.
///
/// `Tangent` keeps the baseline perpendicular to the radius, `Radial` runs
/// the text along it. Both flip by 180° so text is never upside down.
pub fn text_rotation(theta: f64, orientation: TickLabelOrientation) -> f64 {
    let flipped = |a: f64| a > 90.0 && a < 270.0;
    match orientation {
        TickLabelOrientation::Horizontal => 0.0,
        TickLabelOrientation::Tangent => {
            if flipped((360.0 - theta).rem_euclid(360.0)) {
                (180.0 - theta).rem_euclid(360.0)
            } else {
                (360.0 - theta).rem_euclid(360.0)
            }
        }
        TickLabelOrientation::Radial => {
            if flipped((270.0 - theta).rem_euclid(360.0)) {
                (90.0 - theta).rem_euclid(360.0)
            } else {
                (270.0 - theta).rem_euclid(360.0)
            }
        }
    }
}

pub struct TickRenderer<'a> {
    config: &'a GaugeConfig,
    disk: Disk,
    ring: &'static Ring,
    decimals: usize,
    spans_zero: bool,
}

impl<'a> TickRenderer<'a> {
    pub fn new(config: &'a GaugeConfig, disk: Disk) -> Self {
        let ring = match config.tick_label_location {
            TickLabelLocation::Outside => &OUTSIDE_RING,
            TickLabelLocation::Inside => &INSIDE_RING,
        };
        Self {
            config,
            disk,
            ring,
            decimals: label_decimals(config.min, config.max),
            spans_zero: config.spans_zero(),
        }
    }

    /// Mark for `tick`, or `None` when nothing is drawn at that position.
    pub fn resolve(&self, tick: &TickDescriptor) -> Option<ResolvedMark> {
        let config = self.config;
        let (slot, style) = match tick.tier {
            TickTier::Major if config.major_tick_mark.visible => {
                (MarkSlot::Major, config.major_tick_mark)
            }
            TickTier::Major if config.minor_tick_mark.visible => {
                (MarkSlot::Minor, config.minor_tick_mark)
            }
            TickTier::Major => (
                MarkSlot::Major,
                TierStyle {
                    mark_type: TickMarkType::None,
                    ..config.major_tick_mark
                },
            ),
            TickTier::Medium => (MarkSlot::Medium, config.medium_tick_mark),
            TickTier::Minor if config.major_tick_mark.mark_type == TickMarkType::TextAsMark => {
                return None
            }
            TickTier::Minor => (MarkSlot::Minor, config.minor_tick_mark),
            TickTier::None => return None,
        };

        let mut mark_type = style.mark_type;
        if mark_type == TickMarkType::TextAsMark
            && (tick.tier != TickTier::Major || !config.major_tick_mark.visible)
        {
            mark_type = if tick.tier == TickTier::Major {
                TickMarkType::None
            } else {
                TickMarkType::Line
            };
        }

        let base = style.color.unwrap_or(config.tick_mark_color);
        let color = if tick.is_zero && self.spans_zero && tick.tier == TickTier::Major {
            config.zero_color
        } else if config.tick_mark_sections_visible {
            color_of_section(&config.tick_mark_sections, tick.value, base)
        } else {
            base
        };

        Some(ResolvedMark {
            slot,
            mark_type,
            color,
        })
    }

    pub fn render(&self, ticks: &[TickDescriptor]) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(ticks.len() * 2);
        for tick in ticks {
            if let Some(mark) = self.resolve(tick) {
                self.push_mark(&mut commands, tick, mark);
            }
            if tick.tier == TickTier::Major && self.config.tick_labels_visible {
                commands.push(DrawCommand::Text(self.label(tick)));
            }
        }
        commands
    }

    fn major_type(&self) -> TickMarkType {
        if self.config.major_tick_mark.visible {
            self.config.major_tick_mark.mark_type
        } else {
            TickMarkType::None
        }
    }

    fn push_mark(&self, commands: &mut Vec<DrawCommand>, tick: &TickDescriptor, mark: ResolvedMark) {
        let ring = self.ring;
        let i = mark.slot as usize;
        let theta = tick.angle;
        match mark.mark_type {
            TickMarkType::Line => commands.push(DrawCommand::Line {
                from: self.disk.polar(ring.line_inner[i], theta),
                to: self.disk.polar(ring.line_outer[i], theta),
                width: self.disk.scaled(LINE_WIDTH[i]),
                color: mark.color,
            }),
            TickMarkType::Triangle => {
                let inner = ring.triangle_inner[i];
                let outer = ring.triangle_outer[i];
                let inner_half = ring.triangle_inner_half[i];
                let outer_half = ring.triangle_outer_half[i];
                commands.push(DrawCommand::Polygon {
                    points: vec![
                        self.disk.polar(inner, theta + inner_half),
                        self.disk.polar(inner, theta - inner_half),
                        self.disk.polar(outer, theta - outer_half),
                        self.disk.polar(outer, theta + outer_half),
                    ],
                    fill: mark.color,
                    stroke: None,
                });
            }
            TickMarkType::Dot => commands.push(DrawCommand::Circle {
                center: self.disk.polar(ring.dot_center[i], theta),
                radius: self.disk.scaled(ring.dot_diameter[i]) * 0.5,
                fill: mark.color,
                stroke: None,
            }),
            TickMarkType::TextAsMark => commands.push(DrawCommand::Text(TextCommand {
                position: self.disk.polar(ring.text_mark, theta),
                text: self.format(tick.value),
                font_size: self.tick_mark_font_size(),
                bold: tick.is_zero && self.spans_zero,
                rotation: text_rotation(theta, self.config.tick_label_orientation),
                align: TextAlign::Center,
                max_width: None,
                color: mark.color,
            })),
            TickMarkType::None => {}
        }
    }

    fn label(&self, tick: &TickDescriptor) -> TextCommand {
        let config = self.config;
        let color = if tick.is_zero && self.spans_zero {
            config.zero_color
        } else if config.tick_label_sections_visible {
            color_of_section(&config.tick_label_sections, tick.value, config.tick_label_color)
        } else {
            config.tick_label_color
        };
        TextCommand {
            position: self.label_position(tick.angle),
            text: self.format(tick.value),
            font_size: self.label_font_size(),
            bold: tick.is_zero && self.spans_zero,
            rotation: text_rotation(tick.angle, config.tick_label_orientation),
            align: TextAlign::Center,
            max_width: None,
            color,
        }
    }

    /// Radius factor of the tick label ring.
    pub fn label_radius(&self) -> f64 {
        let tangent = self.config.tick_label_orientation == TickLabelOrientation::Tangent;
        let dots = self.major_type() == TickMarkType::Dot;
        match self.config.tick_label_location {
            TickLabelLocation::Outside => {
                let factor = if tangent { 0.46 } else { 0.45 };
                if dots {
                    factor * 0.95
                } else {
                    factor
                }
            }
            TickLabelLocation::Inside => {
                let factor = if tangent { 0.39 } else { 0.37 };
                if dots {
                    factor * 1.05
                } else {
                    factor
                }
            }
        }
    }

    fn label_position(&self, theta: f64) -> Point {
        self.disk.polar(self.label_radius(), theta)
    }

    fn orientation_factor(&self) -> f64 {
        match self.config.tick_label_orientation {
            TickLabelOrientation::Horizontal => 0.9,
            _ => 1.0,
        }
    }

    pub fn label_font_size(&self) -> f64 {
        let factor = if self.decimals == 0 { 0.054 } else { 0.051 };
        self.disk.scaled(factor) * self.orientation_factor()
    }

    pub fn tick_mark_font_size(&self) -> f64 {
        let factor = if self.decimals == 0 { 0.047 } else { 0.044 };
        self.disk.scaled(factor) * self.orientation_factor()
    }

    fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::AngleMapper;
    use crate::config::Section;
    use crate::ticks::TickPlanner;

    fn disk() -> Disk {
        Disk::new(Point::default(), 200.0)
    }

    fn render(config: &GaugeConfig) -> Vec<DrawCommand> {
        let ticks = TickPlanner::new(config).plan(&AngleMapper::from_config(config));
        TickRenderer::new(config, disk()).render(&ticks)
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&TextCommand> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn default_scale_draws_lines_and_labels() {
        let commands = render(&GaugeConfig::default());
        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 101);
        let labels = texts(&commands);
        assert_eq!(labels.len(), 11);
        assert_eq!(labels[0].text, "0");
        assert_eq!(labels[10].text, "100");
    }

    #[test]
    fn major_line_spans_inside_ring() {
        let commands = render(&GaugeConfig::default());
        let DrawCommand::Line { from, to, width, .. } = &commands[0] else {
            panic!("first command should be the major line at min");
        };
        let center = disk().center();
        assert!(close(from.distance(center), 200.0 * 0.423));
        assert!(close(to.distance(center), 200.0 * 0.475));
        assert!(close(*width, 200.0 * 0.0055));
    }

    #[test]
    fn outside_labels_use_outside_ring() {
        let config = GaugeConfig::builder()
            .tick_label_location(TickLabelLocation::Outside)
            .build();
        let commands = render(&config);
        let label = texts(&commands)[0];
        assert!(close(label.position.distance(disk().center()), 200.0 * 0.45));
    }

    #[test]
    fn text_as_mark_keeps_labels_and_drops_minors() {
        let config = GaugeConfig::builder()
            .major_tick_mark(TierStyle::with_type(TickMarkType::TextAsMark))
            .medium_tick_mark(TierStyle::hidden())
            .tick_labels_visible(true)
            .build();
        let commands = render(&config);
        assert!(commands.iter().all(|c| matches!(c, DrawCommand::Text(_))));
        let radii: Vec<f64> = texts(&commands)
            .iter()
            .map(|t| t.position.distance(disk().center()) / 200.0)
            .collect();
        assert_eq!(radii.len(), 22);
        assert_eq!(radii.iter().filter(|r| close(**r, 0.445)).count(), 11);
        assert_eq!(radii.iter().filter(|r| close(**r, 0.37)).count(), 11);
    }

    #[test]
    fn hidden_major_falls_back_to_minor_style() {
        let config = GaugeConfig::builder()
            .major_tick_mark(TierStyle::hidden())
            .build();
        let renderer = TickRenderer::new(&config, disk());
        let tick = TickDescriptor {
            value: 10.0,
            angle: 0.0,
            tier: TickTier::Major,
            is_zero: false,
        };
        let mark = renderer.resolve(&tick).unwrap();
        assert_eq!(mark.slot, MarkSlot::Minor);
        assert_eq!(mark.mark_type, TickMarkType::Line);
    }

    #[test]
    fn all_tiers_hidden_still_labels() {
        let config = GaugeConfig::builder()
            .major_tick_mark(TierStyle::hidden())
            .medium_tick_mark(TierStyle::hidden())
            .minor_tick_mark(TierStyle::hidden())
            .build();
        let commands = render(&config);
        assert_eq!(commands.len(), 11);
        assert_eq!(texts(&commands).len(), 11);
    }

    #[test]
    fn triangles_have_four_corners() {
        let config = GaugeConfig::builder()
            .major_tick_mark(TierStyle::with_type(TickMarkType::Triangle))
            .build();
        let commands = render(&config);
        let DrawCommand::Polygon { points, .. } = &commands[0] else {
            panic!("expected triangle mark");
        };
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn dot_majors_pull_labels_outward_when_inside() {
        let config = GaugeConfig::builder()
            .major_tick_mark(TierStyle::with_type(TickMarkType::Dot))
            .build();
        let renderer = TickRenderer::new(&config, disk());
        assert!(close(renderer.label_radius(), 0.37 * 1.05));
    }

    #[test]
    fn tangent_labels_sit_further_out() {
        for (location, expected) in [
            (TickLabelLocation::Outside, 0.46),
            (TickLabelLocation::Inside, 0.39),
        ] {
            let config = GaugeConfig::builder()
                .tick_label_location(location)
                .tick_label_orientation(TickLabelOrientation::Tangent)
                .build();
            assert!(close(TickRenderer::new(&config, disk()).label_radius(), expected));
            let commands = render(&config);
            let label = texts(&commands)[0];
            assert!(close(label.position.distance(disk().center()), 200.0 * expected));
        }
    }

    #[test]
    fn zero_tick_is_highlighted() {
        let config = GaugeConfig::builder().min(-50.0).max(50.0).build();
        let commands = render(&config);
        let zero = texts(&commands)
            .into_iter()
            .find(|t| t.text == "0")
            .unwrap();
        assert!(zero.bold);
        assert_eq!(zero.color, config.zero_color);
        let zero_line = commands.iter().any(|c| {
            matches!(c, DrawCommand::Line { color, .. } if *color == config.zero_color)
        });
        assert!(zero_line);
    }

    #[test]
    fn tick_mark_sections_color_marks() {
        let red = Color::new(0xff, 0, 0);
        let config = GaugeConfig::builder()
            .tick_mark_sections(vec![Section::new(90.0, 100.0, red)])
            .tick_mark_sections_visible(true)
            .build();
        let commands = render(&config);
        let red_lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color, .. } if *color == red))
            .count();
        assert_eq!(red_lines, 11);
    }

    #[test]
    fn short_ranges_use_one_decimal() {
        let config = GaugeConfig::builder()
            .max(5.0)
            .minor_tick_space(0.1)
            .major_tick_space(1.0)
            .build();
        let commands = render(&config);
        let labels: Vec<_> = texts(&commands).iter().map(|t| t.text.clone()).collect();
        assert_eq!(labels, ["0.0", "1.0", "2.0", "3.0", "4.0", "5.0"]);
    }

    #[test]
    fn rotation_rules() {
        use TickLabelOrientation::*;
        assert_eq!(text_rotation(123.0, Horizontal), 0.0);
        assert!(close(text_rotation(0.0, Tangent), 0.0));
        assert!(close(text_rotation(180.0, Tangent), 0.0));
        assert!(close(text_rotation(90.0, Tangent), 270.0));
        assert!(close(text_rotation(90.0, Radial), 0.0));
        assert!(close(text_rotation(270.0, Radial), 0.0));
        assert!(close(text_rotation(0.0, Radial), 270.0));
    }
}
