//! Marker pins and the threshold indicator.

use crate::angle::AngleMapper;
use crate::config::{GaugeConfig, Marker, MarkerType, TickLabelLocation};
use crate::layout::Disk;
use crate::plan::{DrawCommand, Point, Stroke};

/// Drawn outline for a marker, derived from its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Flag,
    Triangle,
    Dot,
}

impl From<MarkerType> for MarkerShape {
    fn from(marker_type: MarkerType) -> Self {
        match marker_type {
            MarkerType::Standard => MarkerShape::Flag,
            MarkerType::Triangle => MarkerShape::Triangle,
            MarkerType::Dot => MarkerShape::Dot,
        }
    }
}

/// Markers paired with their shapes, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerShapes {
    entries: Vec<(Marker, MarkerShape)>,
}

impl MarkerShapes {
    /// Replaces every shape at once from `markers`.
    pub fn rebuild(markers: &[Marker]) -> Self {
        Self {
            entries: markers
                .iter()
                .map(|marker| (marker.clone(), MarkerShape::from(marker.marker_type)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Marker, MarkerShape)> {
        self.entries.iter()
    }
}

const STROKE_WIDTH: f64 = 1.0;

/// Markers in insertion order followed by the threshold, which is always last.
pub fn render_markers(
    shapes: &MarkerShapes,
    config: &GaugeConfig,
    disk: &Disk,
    mapper: &AngleMapper,
) -> Vec<DrawCommand> {
    let outside = config.tick_label_location == TickLabelLocation::Outside;
    let mut commands = Vec::with_capacity(shapes.len() + 1);

    if config.markers_visible {
        let marker_size = disk.scaled(if outside { 0.0125 } else { 0.015 });
        let half = marker_size * 0.3;
        for (marker, shape) in shapes.iter() {
            let theta = mapper.scale_angle(mapper.clamp_value(marker.value));
            let stroke = Some(Stroke {
                color: marker.color.darker(),
                width: STROKE_WIDTH,
            });
            let command = match shape {
                MarkerShape::Flag => {
                    let radii: [f64; 4] = if outside {
                        [0.38, 0.4075, 0.4575, 0.4575]
                    } else {
                        [0.465, 0.436, 0.386, 0.386]
                    };
                    DrawCommand::Polygon {
                        points: vec![
                            disk.polar(radii[0], theta),
                            disk.polar(radii[1], theta - half),
                            disk.polar(radii[2], theta - half),
                            disk.polar(radii[3], theta + half),
                            disk.polar(radii[1], theta + half),
                        ],
                        fill: marker.color,
                        stroke,
                    }
                }
                MarkerShape::Triangle => {
                    let (tip, base) = if outside { (0.38, 0.4075) } else { (0.465, 0.436) };
                    DrawCommand::Polygon {
                        points: vec![
                            disk.polar(tip, theta),
                            disk.polar(base, theta - half),
                            disk.polar(base, theta + half),
                        ],
                        fill: marker.color,
                        stroke,
                    }
                }
                MarkerShape::Dot => DrawCommand::Circle {
                    center: disk.polar(if outside { 0.3945 } else { 0.449 }, theta),
                    radius: marker_size,
                    fill: marker.color,
                    stroke,
                },
            };
            commands.push(command);
        }
    }

    if config.threshold_visible {
        commands.push(threshold(config, disk, mapper, outside));
    }
    commands
}

fn threshold(config: &GaugeConfig, disk: &Disk, mapper: &AngleMapper, outside: bool) -> DrawCommand {
    let theta = mapper.scale_angle(mapper.clamp_value(config.threshold));
    let half = disk.scaled(0.00625);
    let (tip, base) = if outside { (0.38, 0.34) } else { (0.465, 0.425) };
    let points: Vec<Point> = vec![
        disk.polar(tip, theta),
        disk.polar(base, theta - half),
        disk.polar(base, theta + half),
    ];
    DrawCommand::Polygon {
        points,
        fill: config.threshold_color,
        stroke: Some(Stroke {
            color: config.threshold_color.darker(),
            width: STROKE_WIDTH,
        }),
    }
}
