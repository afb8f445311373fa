//! Host-facing gauge: owns the state, caches the last [`DrawPlan`] and only
//! lays out again when something static changed.

use log::{debug, trace};

use crate::angle::AngleMapper;
use crate::config::{GaugeConfig, Marker, Section};
use crate::layout::{self, PREFERRED_SIZE};
use crate::markers::MarkerShapes;
use crate::plan::DrawPlan;

/// Membership changes reported when the read-back crosses a range boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeEvent {
    SectionEntered(Section),
    SectionLeft(Section),
    AreaEntered(Section),
    AreaLeft(Section),
}

/// Snapshot consumed by a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeState {
    pub config: GaugeConfig,
    /// Target value, always inside the domain
    pub value: f64,
    /// Value the needle currently shows
    pub current_value: f64,
    pub led_on: bool,
    pub marker_shapes: MarkerShapes,
}

impl GaugeState {
    pub fn new(config: GaugeConfig) -> Self {
        let value = config.min;
        let marker_shapes = MarkerShapes::rebuild(&config.markers);
        Self {
            config,
            value,
            current_value: value,
            led_on: false,
            marker_shapes,
        }
    }

    pub fn mapper(&self) -> AngleMapper {
        AngleMapper::from_config(&self.config)
    }
}

#[derive(Debug, Clone)]
pub struct Gauge {
    state: GaugeState,
    plan: DrawPlan,
    dirty: bool,
    size: (f64, f64),
    layout_passes: usize,
    read_back: f64,
    min_measured_value: f64,
    max_measured_value: f64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new(GaugeConfig::default())
    }
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        let state = GaugeState::new(config);
        let read_back = state.value;
        Self {
            state,
            plan: DrawPlan::default(),
            dirty: true,
            size: (PREFERRED_SIZE, PREFERRED_SIZE),
            layout_passes: 0,
            read_back,
            min_measured_value: read_back,
            max_measured_value: read_back,
        }
    }

    pub fn state(&self) -> &GaugeState {
        &self.state
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.state.config
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn current_value(&self) -> f64 {
        self.state.current_value
    }

    /// Value recovered from the needle angle.
    pub fn read_back(&self) -> f64 {
        self.read_back
    }

    pub fn min_measured_value(&self) -> f64 {
        self.min_measured_value
    }

    pub fn max_measured_value(&self) -> f64 {
        self.max_measured_value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Full layout passes run so far.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Plan for a `width × height` surface, laid out again only when needed.
    pub fn frame(&mut self, width: f64, height: f64) -> &DrawPlan {
        if self.dirty || self.size != (width, height) {
            self.plan = layout::layout(&self.state, width, height);
            self.size = (width, height);
            self.dirty = false;
            self.layout_passes += 1;
        }
        layout::refresh(&mut self.plan, &self.state);
        &self.plan
    }

    pub fn set_value(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.state.value = self.state.mapper().clamp_value(value);
    }

    /// Moves the needle. Never triggers a layout.
    pub fn set_current_value(&mut self, value: f64) -> Vec<GaugeEvent> {
        if value.is_nan() {
            return Vec::new();
        }
        self.state.current_value = value;
        let mapper = self.state.mapper();
        let previous = self.read_back;
        self.read_back = mapper.value_of(mapper.clamped_angle_of(value));
        self.min_measured_value = self.min_measured_value.min(self.read_back);
        self.max_measured_value = self.max_measured_value.max(self.read_back);
        trace!("needle read-back {:.4}", self.read_back);

        let config = &self.state.config;
        let mut events = Vec::new();
        if config.check_sections_for_value {
            transitions(
                &config.sections,
                previous,
                self.read_back,
                &mut events,
                GaugeEvent::SectionEntered,
                GaugeEvent::SectionLeft,
            );
        }
        if config.check_areas_for_value {
            transitions(
                &config.areas,
                previous,
                self.read_back,
                &mut events,
                GaugeEvent::AreaEntered,
                GaugeEvent::AreaLeft,
            );
        }
        events
    }

    pub fn reset_measured_values(&mut self) {
        self.min_measured_value = self.read_back;
        self.max_measured_value = self.read_back;
    }

    pub fn set_range(&mut self, min: f64, max: f64) {
        self.update_config(|config| {
            config.min = min;
            config.max = max;
        });
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.update_config(|config| config.markers = markers);
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.update_config(|config| config.sections = sections);
    }

    pub fn set_areas(&mut self, areas: Vec<Section>) {
        self.update_config(|config| config.areas = areas);
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.update_config(|config| config.threshold = threshold);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.update_config(|config| config.title = title);
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        let unit = unit.into();
        self.update_config(|config| config.unit = unit);
    }

    pub fn set_led_on(&mut self, on: bool) {
        if self.state.led_on != on {
            self.state.led_on = on;
            self.dirty = true;
        }
    }

    /// Applies `change` to the configuration and schedules a layout.
    pub fn update_config(&mut self, change: impl FnOnce(&mut GaugeConfig)) {
        let markers_before = self.state.config.markers.clone();
        change(&mut self.state.config);
        if self.state.config.markers != markers_before {
            self.state.marker_shapes = MarkerShapes::rebuild(&self.state.config.markers);
            debug!("rebuilt {} marker shapes", self.state.marker_shapes.len());
        }

        let mapper = self.state.mapper();
        self.state.value = mapper.clamp_value(self.state.value);
        self.state.current_value = mapper.clamp_value(self.state.current_value);
        self.read_back = mapper.value_of(mapper.clamped_angle_of(self.state.current_value));
        self.dirty = true;
    }
}

fn transitions(
    ranges: &[Section],
    previous: f64,
    current: f64,
    events: &mut Vec<GaugeEvent>,
    entered: fn(Section) -> GaugeEvent,
    left: fn(Section) -> GaugeEvent,
) {
    for range in ranges {
        match (range.contains(previous), range.contains(current)) {
            (false, true) => events.push(entered(range.clone())),
            (true, false) => events.push(left(range.clone())),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Color, MarkerType};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn layout_runs_once_until_something_changes() {
        let mut gauge = Gauge::default();
        gauge.frame(200.0, 200.0);
        gauge.set_current_value(30.0);
        gauge.set_current_value(60.0);
        gauge.frame(200.0, 200.0);
        assert_eq!(gauge.layout_passes(), 1);

        gauge.set_title("Speed");
        gauge.set_threshold(80.0);
        assert!(gauge.is_dirty());
        gauge.frame(200.0, 200.0);
        assert_eq!(gauge.layout_passes(), 2);

        gauge.frame(300.0, 200.0);
        assert_eq!(gauge.layout_passes(), 3);
    }

    #[test]
    fn needle_follows_current_value_without_layout() {
        let mut gauge = Gauge::default();
        let mapper = gauge.state().mapper();
        gauge.frame(200.0, 200.0);
        gauge.set_current_value(75.0);
        let plan = gauge.frame(200.0, 200.0);
        assert!(close(plan.needle_rotation().unwrap(), mapper.angle_of(75.0)));
        assert_eq!(plan.value_text().unwrap().text, "75.0");
    }

    #[test]
    fn needle_clamps_past_max() {
        let mut gauge = Gauge::default();
        gauge.set_current_value(250.0);
        let mapper = gauge.state().mapper();
        let plan = gauge.frame(200.0, 200.0);
        assert!(close(plan.needle_rotation().unwrap(), mapper.angle_of(100.0)));
        assert!(close(gauge.read_back(), 100.0));
    }

    #[test]
    fn section_transitions_are_reported() {
        let warning = Section::new(60.0, 80.0, Color::new(0xff, 0x99, 0x00));
        let config = GaugeConfig::builder()
            .sections(vec![warning.clone()])
            .check_sections_for_value(true)
            .build();
        let mut gauge = Gauge::new(config);
        assert!(gauge.set_current_value(40.0).is_empty());
        assert_eq!(
            gauge.set_current_value(70.0),
            [GaugeEvent::SectionEntered(warning.clone())]
        );
        assert!(gauge.set_current_value(75.0).is_empty());
        assert_eq!(gauge.set_current_value(90.0), [GaugeEvent::SectionLeft(warning)]);
    }

    #[test]
    fn unchecked_ranges_stay_quiet() {
        let config = GaugeConfig::builder()
            .areas(vec![Section::new(0.0, 50.0, Color::BLACK)])
            .build();
        let mut gauge = Gauge::new(config);
        assert!(gauge.set_current_value(80.0).is_empty());
    }

    #[test]
    fn measured_extrema_track_read_back() {
        let mut gauge = Gauge::default();
        gauge.set_current_value(42.0);
        gauge.set_current_value(12.0);
        gauge.set_current_value(30.0);
        assert!(close(gauge.min_measured_value(), 0.0));
        assert!(close(gauge.max_measured_value(), 42.0));
        gauge.reset_measured_values();
        assert!(close(gauge.min_measured_value(), 30.0));
        assert!(close(gauge.max_measured_value(), 30.0));
    }

    #[test]
    fn narrowing_the_range_clamps_values() {
        let mut gauge = Gauge::default();
        gauge.set_value(90.0);
        gauge.set_current_value(90.0);
        gauge.set_range(0.0, 50.0);
        assert_eq!(gauge.value(), 50.0);
        assert_eq!(gauge.current_value(), 50.0);
    }

    #[test]
    fn replacing_markers_rebuilds_shapes() {
        let mut gauge = Gauge::default();
        gauge.set_markers(vec![
            Marker::new(10.0, MarkerType::Dot, Color::BLACK),
            Marker::new(20.0, MarkerType::Triangle, Color::BLACK),
            Marker::new(30.0, MarkerType::Standard, Color::BLACK),
        ]);
        assert_eq!(gauge.state().marker_shapes.len(), 3);
        gauge.set_markers(vec![Marker::new(50.0, MarkerType::Dot, Color::BLACK)]);
        assert_eq!(gauge.state().marker_shapes.len(), 1);
    }

    #[test]
    fn nan_values_are_ignored() {
        let mut gauge = Gauge::default();
        gauge.set_current_value(20.0);
        gauge.set_current_value(f64::NAN);
        gauge.set_value(f64::NAN);
        assert_eq!(gauge.current_value(), 20.0);
        assert_eq!(gauge.value(), 0.0);
    }
}
