//! Sections (ring segments) and areas (filled wedges).

use log::trace;

use crate::angle::AngleMapper;
use crate::config::{Color, GaugeConfig, Section, TickLabelLocation};
use crate::layout::Disk;
use crate::plan::DrawCommand;

const SECTION_WIDTH: f64 = 0.052;

/// A range clipped to the domain, expressed in the surface frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeArc {
    pub start_angle: f64,
    pub extent: f64,
    pub color: Color,
}

/// Clips `range` to `[min, max]`, or `None` when nothing of it is visible.
pub fn clip_range(range: &Section, mapper: &AngleMapper) -> Option<RangeArc> {
    let start = range.start.max(mapper.min());
    let stop = range.stop.min(mapper.max());
    if stop <= start {
        trace!("range [{}, {}] outside the domain", range.start, range.stop);
        return None;
    }
    Some(RangeArc {
        start_angle: mapper.surface_angle(start),
        extent: mapper.surface_extent(start, stop),
        color: range.color,
    })
}

pub fn render_sections(config: &GaugeConfig, disk: &Disk, mapper: &AngleMapper) -> Vec<DrawCommand> {
    let diameter = match config.tick_label_location {
        TickLabelLocation::Outside => 0.79,
        TickLabelLocation::Inside => 0.897,
    };
    let radius = disk.scaled(diameter) * 0.5;
    let width = disk.scaled(SECTION_WIDTH);
    config
        .sections
        .iter()
        .filter_map(|section| clip_range(section, mapper))
        .map(|arc| DrawCommand::Arc {
            center: disk.center(),
            radius,
            start_angle: arc.start_angle,
            extent: arc.extent,
            width,
            color: arc.color,
        })
        .collect()
}

pub fn render_areas(config: &GaugeConfig, disk: &Disk, mapper: &AngleMapper) -> Vec<DrawCommand> {
    let diameter = match config.tick_label_location {
        TickLabelLocation::Outside => 0.841,
        TickLabelLocation::Inside => 0.95,
    };
    let radius = disk.scaled(diameter) * 0.5;
    config
        .areas
        .iter()
        .filter_map(|area| clip_range(area, mapper))
        .map(|arc| DrawCommand::Wedge {
            center: disk.center(),
            radius,
            start_angle: arc.start_angle,
            extent: arc.extent,
            color: arc.color,
        })
        .collect()
}
