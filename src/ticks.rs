//! Tick planning: walks the domain in minor steps and classifies each position.
//!
//! Positions are computed as `min + k · minor_tick_space` on a fixed-point
//! decimal grid, so a scale of `0.1` steps over thousands of ticks still lands
//! exactly on every major value.

use log::{debug, warn};

use crate::angle::AngleMapper;
use crate::config::GaugeConfig;

/// Upper bound on positions produced by one pass
pub const MAX_TICKS: i128 = 100_000;

/// Digits kept after the decimal point when snapping to the grid
const MAX_DECIMAL_PLACES: u32 = 12;

/// Largest grid magnitude accepted; keeps the stepping arithmetic in range
const MAX_UNITS: i128 = i128::MAX / 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTier {
    Major,
    Medium,
    Minor,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDescriptor {
    pub value: f64,
    /// Scale-frame angle in degrees
    pub angle: f64,
    pub tier: TickTier,
    pub is_zero: bool,
}

/// Label precision: one digit for short ranges, none otherwise.
pub fn label_decimals(min: f64, max: f64) -> usize {
    if (max - min).abs() < 10.0 {
        1
    } else {
        0
    }
}

fn decimal_places(value: f64) -> u32 {
    let text = format!("{}", value.abs());
    text.split_once('.')
        .map_or(0, |(_, fraction)| fraction.len() as u32)
        .min(MAX_DECIMAL_PLACES)
}

/// A decimal grid on which every planner input is an exact integer.
#[derive(Debug, Clone, Copy)]
struct FixedPoint {
    scale: f64,
}

impl FixedPoint {
    fn for_values(values: &[f64]) -> Self {
        let places = values.iter().map(|v| decimal_places(*v)).max().unwrap_or(0);
        Self {
            scale: 10f64.powi(places as i32),
        }
    }

    /// `value` on the grid, or `None` when it does not fit.
    fn units(&self, value: f64) -> Option<i128> {
        let scaled = (value * self.scale).round();
        if scaled.is_finite() && scaled.abs() <= MAX_UNITS as f64 {
            Some(scaled as i128)
        } else {
            None
        }
    }

    fn value(&self, units: i128) -> f64 {
        units as f64 / self.scale
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TickPlanner {
    min: f64,
    max: f64,
    minor_tick_space: f64,
    major_tick_space: f64,
    medium_enabled: bool,
    minor_enabled: bool,
}

impl TickPlanner {
    pub fn new(config: &GaugeConfig) -> Self {
        Self {
            min: config.min,
            max: config.max,
            minor_tick_space: config.minor_tick_space,
            major_tick_space: config.major_tick_space,
            medium_enabled: config.medium_tick_mark.visible,
            minor_enabled: config.minor_tick_mark.visible,
        }
    }

    pub fn plan(&self, mapper: &AngleMapper) -> Vec<TickDescriptor> {
        let finite = [self.min, self.max, self.minor_tick_space]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.minor_tick_space <= 0.0 || self.max <= self.min {
            warn!(
                "skipping ticks for domain [{}, {}] with minor spacing {}",
                self.min, self.max, self.minor_tick_space
            );
            return Vec::new();
        }

        let grid = FixedPoint::for_values(&[
            self.min,
            self.max,
            self.minor_tick_space,
            self.major_tick_space,
        ]);
        let (Some(min), Some(max), Some(minor)) = (
            grid.units(self.min),
            grid.units(self.max),
            grid.units(self.minor_tick_space),
        ) else {
            warn!(
                "domain [{}, {}] with minor spacing {} is too large to tick",
                self.min, self.max, self.minor_tick_space
            );
            return Vec::new();
        };
        if minor <= 0 {
            warn!(
                "minor spacing {} is below the grid resolution of 1e-{MAX_DECIMAL_PLACES}",
                self.minor_tick_space
            );
            return Vec::new();
        }
        // an oversized major spacing never divides a position
        let major = grid.units(self.major_tick_space).unwrap_or(0);

        let count = (max - min) / minor;
        if count + 1 > MAX_TICKS {
            warn!("{} tick positions exceed the limit of {MAX_TICKS}", count + 1);
            return Vec::new();
        }

        let medium_pattern = minor % (2 * minor) != 0;
        let ticks: Vec<TickDescriptor> = (0..=count)
            .map(|k| {
                let counter = min + k * minor;
                let tier = if major > 0 && counter % major == 0 {
                    TickTier::Major
                } else if self.medium_enabled && medium_pattern && counter % (5 * minor) == 0 {
                    TickTier::Medium
                } else if self.minor_enabled && counter % minor == 0 {
                    TickTier::Minor
                } else {
                    TickTier::None
                };
                let value = grid.value(counter);
                TickDescriptor {
                    value,
                    angle: mapper.scale_angle(value),
                    tier,
                    is_zero: counter == 0,
                }
            })
            .collect();

        debug!("planned {} ticks over [{}, {}]", ticks.len(), self.min, self.max);
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierStyle;

    fn plan(config: &GaugeConfig) -> Vec<TickDescriptor> {
        TickPlanner::new(config).plan(&AngleMapper::from_config(config))
    }

    fn values_of(ticks: &[TickDescriptor], tier: TickTier) -> Vec<f64> {
        ticks.iter().filter(|t| t.tier == tier).map(|t| t.value).collect()
    }

    #[test]
    fn majors_every_ten_with_even_minor_steps() {
        let config = GaugeConfig::builder().minor_tick_space(2.0).major_tick_space(10.0).build();
        let ticks = plan(&config);
        assert_eq!(ticks.len(), 51);
        let majors = values_of(&ticks, TickTier::Major);
        assert_eq!(majors, (0..=10).map(|i| i as f64 * 10.0).collect::<Vec<_>>());
    }

    #[test]
    fn mediums_fall_on_fives() {
        let config = GaugeConfig::builder().minor_tick_space(1.0).major_tick_space(10.0).build();
        let ticks = plan(&config);
        let mediums = values_of(&ticks, TickTier::Medium);
        assert_eq!(mediums, (0..10).map(|i| i as f64 * 10.0 + 5.0).collect::<Vec<_>>());
        let minors = values_of(&ticks, TickTier::Minor);
        assert_eq!(minors.len(), 101 - 11 - 10);
        assert!(minors.iter().all(|v| v % 5.0 != 0.0));
    }

    #[test]
    fn hidden_medium_tier_falls_back_to_minor() {
        let config = GaugeConfig::builder()
            .medium_tick_mark(TierStyle::hidden())
            .build();
        let ticks = plan(&config);
        assert!(values_of(&ticks, TickTier::Medium).is_empty());
        assert_eq!(ticks[5].tier, TickTier::Minor);
    }

    #[test]
    fn hidden_minor_tier_leaves_no_mark() {
        let config = GaugeConfig::builder()
            .medium_tick_mark(TierStyle::hidden())
            .minor_tick_mark(TierStyle::hidden())
            .build();
        let ticks = plan(&config);
        assert_eq!(ticks[3].tier, TickTier::None);
        assert_eq!(ticks[10].tier, TickTier::Major);
    }

    #[test]
    fn fractional_steps_do_not_drift() {
        let config = GaugeConfig::builder()
            .max(1000.0)
            .minor_tick_space(0.1)
            .major_tick_space(1.0)
            .build();
        let ticks = plan(&config);
        assert_eq!(ticks.len(), 10_001);
        let majors = values_of(&ticks, TickTier::Major);
        assert_eq!(majors.len(), 1001);
        assert_eq!(majors[737], 737.0);
        assert_eq!(ticks.last().map(|t| t.value), Some(1000.0));
    }

    #[test]
    fn zero_tick_flagged_when_spanning_zero() {
        let config = GaugeConfig::builder().min(-50.0).max(50.0).build();
        let ticks = plan(&config);
        let zeros: Vec<_> = ticks.iter().filter(|t| t.is_zero).collect();
        assert_eq!(zeros.len(), 1);
        assert_eq!(zeros[0].value, 0.0);
        assert_eq!(zeros[0].tier, TickTier::Major);
    }

    #[test]
    fn offset_minimum_produces_unaligned_positions() {
        let config = GaugeConfig::builder().min(0.5).max(10.5).minor_tick_space(1.0).build();
        let ticks = plan(&config);
        assert!(ticks.iter().all(|t| t.tier != TickTier::Major));
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn degenerate_inputs_give_no_ticks() {
        let reversed = GaugeConfig::builder().min(10.0).max(0.0).build();
        assert!(plan(&reversed).is_empty());
        let flat = GaugeConfig::builder().minor_tick_space(0.0).build();
        assert!(plan(&flat).is_empty());
        let negative = GaugeConfig::builder().minor_tick_space(-1.0).build();
        assert!(plan(&negative).is_empty());
    }

    #[test]
    fn huge_domains_give_no_ticks() {
        let config = GaugeConfig::builder()
            .min(-1e38)
            .max(1e38)
            .minor_tick_space(1e36)
            .major_tick_space(1e37)
            .build();
        assert!(plan(&config).is_empty());
    }

    #[test]
    fn spacing_below_grid_resolution_gives_no_ticks() {
        let config = GaugeConfig::builder().max(1.0).minor_tick_space(1e-13).build();
        assert!(plan(&config).is_empty());
    }

    #[test]
    fn oversized_major_spacing_leaves_no_majors() {
        let config = GaugeConfig::builder().major_tick_space(1e40).build();
        let ticks = plan(&config);
        assert_eq!(ticks.len(), 101);
        assert!(values_of(&ticks, TickTier::Major).is_empty());
    }

    #[test]
    fn label_precision_depends_on_range() {
        assert_eq!(label_decimals(0.0, 5.0), 1);
        assert_eq!(label_decimals(0.0, 10.0), 0);
        assert_eq!(label_decimals(-100.0, 100.0), 0);
    }

    #[test]
    fn angles_follow_scale_frame() {
        let config = GaugeConfig::default();
        let ticks = plan(&config);
        assert!((ticks[0].angle - 320.0).abs() < 1e-9);
        assert!((ticks[100].angle - 40.0).abs() < 1e-9);
    }
}
