use bon::Builder;
use serde::{Deserialize, Serialize};

// ============================================================================
// COLOR
// ============================================================================

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    0xff
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Color = Color::rgba(0x00, 0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Scales the HSB brightness, keeping hue and saturation.
    pub fn scale_brightness(self, factor: f64) -> Self {
        let scale = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Outline shade used for marker and threshold strokes.
    pub fn darker(self) -> Self {
        self.scale_brightness(0.7)
    }
}

// ============================================================================
// SCALE & PLACEMENT ENUMS
// ============================================================================

/// Whether increasing values sweep clockwise or counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Whether tick labels sit inside or outside the tick ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickLabelLocation {
    #[default]
    Inside,
    Outside,
}

/// Rotation applied to tick label text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickLabelOrientation {
    /// Upright text
    #[default]
    Horizontal,
    /// Text running along the radius
    Radial,
    /// Text running perpendicular to the radius
    Tangent,
}

/// Shape drawn for a tick mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMarkType {
    #[default]
    Line,
    Triangle,
    Dot,
    /// The numeric label itself is the mark
    TextAsMark,
    /// No mark at all
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    #[default]
    Standard,
    Triangle,
    Dot,
}

/// Needle width as a fraction of the disk size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedleSize {
    Thin,
    #[default]
    Standard,
    Thick,
}

impl NeedleSize {
    pub const fn factor(self) -> f64 {
        match self {
            NeedleSize::Thin => 0.015,
            NeedleSize::Standard => 0.025,
            NeedleSize::Thick => 0.035,
        }
    }
}

// ============================================================================
// RANGES, MARKERS, TICK STYLES
// ============================================================================

/// A colored value range; drawn as a ring segment (section) or a wedge (area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: f64,
    pub stop: f64,
    pub color: Color,
    #[serde(default)]
    pub text: String,
}

impl Section {
    pub fn new(start: f64, stop: f64, color: Color) -> Self {
        Self {
            start,
            stop,
            color,
            text: String::new(),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.stop
    }
}

/// Color of the first section containing `value`, or `fallback`.
pub fn color_of_section(sections: &[Section], value: f64, fallback: Color) -> Color {
    sections
        .iter()
        .find(|section| section.contains(value))
        .map_or(fallback, |section| section.color)
}

/// A point marker on the scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub value: f64,
    #[serde(default)]
    pub marker_type: MarkerType,
    pub color: Color,
    #[serde(default)]
    pub text: String,
}

impl Marker {
    pub fn new(value: f64, marker_type: MarkerType, color: Color) -> Self {
        Self {
            value,
            marker_type,
            color,
            text: String::new(),
        }
    }
}

/// Visibility, shape and color for one tick tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub visible: bool,
    pub mark_type: TickMarkType,
    /// Falls back to the shared tick mark color when unset
    #[serde(default)]
    pub color: Option<Color>,
}

impl Default for TierStyle {
    fn default() -> Self {
        Self {
            visible: true,
            mark_type: TickMarkType::Line,
            color: None,
        }
    }
}

impl TierStyle {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    pub fn with_type(mark_type: TickMarkType) -> Self {
        Self {
            mark_type,
            ..Self::default()
        }
    }
}

// ============================================================================
// GAUGE CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    // Domain
    #[builder(default = 0.0)]
    pub min: f64,
    #[builder(default = 100.0)]
    pub max: f64,
    #[builder(default = 1)]
    pub decimals: usize,

    // Scale
    #[builder(default = 320.0)]
    pub start_angle: f64,
    #[builder(default = 280.0)]
    pub angle_range: f64,
    #[builder(default)]
    pub scale_direction: ScaleDirection,
    #[builder(default = 1.0)]
    pub minor_tick_space: f64,
    #[builder(default = 10.0)]
    pub major_tick_space: f64,

    // Tick marks
    #[builder(default)]
    pub major_tick_mark: TierStyle,
    #[builder(default)]
    pub medium_tick_mark: TierStyle,
    #[builder(default)]
    pub minor_tick_mark: TierStyle,
    #[builder(default = Color::new(0x1e, 0x1e, 0x1e))]
    pub tick_mark_color: Color,
    #[builder(default = Color::new(0x1e, 0x1e, 0x1e))]
    pub tick_label_color: Color,
    #[builder(default = Color::new(0xd7, 0x1e, 0x1e))]
    pub zero_color: Color,
    #[builder(default = true)]
    pub tick_labels_visible: bool,
    #[builder(default)]
    pub tick_label_location: TickLabelLocation,
    #[builder(default)]
    pub tick_label_orientation: TickLabelOrientation,
    #[builder(default)]
    pub tick_mark_sections: Vec<Section>,
    #[builder(default = false)]
    pub tick_mark_sections_visible: bool,
    #[builder(default)]
    pub tick_label_sections: Vec<Section>,
    #[builder(default = false)]
    pub tick_label_sections_visible: bool,

    // Sections, areas, markers
    #[builder(default)]
    pub sections: Vec<Section>,
    #[builder(default = true)]
    pub sections_visible: bool,
    #[builder(default)]
    pub areas: Vec<Section>,
    #[builder(default = true)]
    pub areas_visible: bool,
    #[builder(default)]
    pub markers: Vec<Marker>,
    #[builder(default = true)]
    pub markers_visible: bool,
    #[builder(default = 100.0)]
    pub threshold: f64,
    #[builder(default = false)]
    pub threshold_visible: bool,
    #[builder(default = Color::new(0xff, 0x00, 0x00))]
    pub threshold_color: Color,
    #[builder(default = false)]
    pub check_sections_for_value: bool,
    #[builder(default = false)]
    pub check_areas_for_value: bool,

    // Needle & knob
    #[builder(default)]
    pub needle_size: NeedleSize,
    #[builder(default = Color::new(0xc8, 0x00, 0x00))]
    pub needle_color: Color,
    #[builder(default = true)]
    pub knob_visible: bool,
    #[builder(default = Color::new(0xcc, 0xcc, 0xcc))]
    pub knob_color: Color,

    // Background
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    #[builder(default = Color::new(0xe1, 0xe1, 0xe1))]
    pub border_color: Color,

    // Text
    #[builder(into, default)]
    pub title: String,
    #[builder(into, default)]
    pub sub_title: String,
    #[builder(into, default)]
    pub unit: String,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub title_color: Color,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub sub_title_color: Color,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub unit_color: Color,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub value_color: Color,
    #[builder(default = true)]
    pub value_visible: bool,

    // LED lamp & LCD panel
    #[builder(default = false)]
    pub led_visible: bool,
    #[builder(default = Color::new(0xff, 0x00, 0x00))]
    pub led_color: Color,
    #[builder(default = false)]
    pub lcd_visible: bool,
    #[builder(default = Color::new(0xc8, 0xd4, 0xb4))]
    pub lcd_background: Color,
    #[builder(default = Color::new(0x1a, 0x1a, 0x1a))]
    pub lcd_foreground: Color,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Degrees of arc per unit of value, zero for a degenerate domain.
    pub fn angle_step(&self) -> f64 {
        if self.max > self.min {
            self.angle_range / self.range()
        } else {
            0.0
        }
    }

    pub fn spans_zero(&self) -> bool {
        self.min < 0.0 && self.max > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let config = GaugeConfig::default();
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 100.0);
        assert_eq!(config.start_angle, 320.0);
        assert_eq!(config.angle_range, 280.0);
        assert!((config.angle_step() - 2.8).abs() < 1e-12);
        assert_eq!(config.major_tick_mark.mark_type, TickMarkType::Line);
    }

    #[test]
    fn degenerate_domain_has_zero_step() {
        let config = GaugeConfig::builder().min(10.0).max(10.0).build();
        assert_eq!(config.angle_step(), 0.0);
    }

    #[test]
    fn deserializes_partial_json() {
        let json = r#"{
            "min": -50.0,
            "max": 50.0,
            "scale_direction": "counter_clockwise",
            "tick_label_location": "outside",
            "major_tick_mark": { "visible": true, "mark_type": "text_as_mark" },
            "sections": [{ "start": 0.0, "stop": 10.0, "color": { "r": 255, "g": 0, "b": 0 } }]
        }"#;
        let config: GaugeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.scale_direction, ScaleDirection::CounterClockwise);
        assert_eq!(config.tick_label_location, TickLabelLocation::Outside);
        assert_eq!(config.major_tick_mark.mark_type, TickMarkType::TextAsMark);
        assert_eq!(config.sections[0].color.a, 0xff);
        assert_eq!(config.angle_range, 280.0);
        assert!(config.spans_zero());
    }

    #[test]
    fn darker_scales_channels() {
        let color = Color::new(100, 200, 50).darker();
        assert_eq!(color, Color::new(70, 140, 35));
    }

    #[test]
    fn first_matching_section_wins() {
        let sections = vec![
            Section::new(0.0, 50.0, Color::new(1, 0, 0)),
            Section::new(25.0, 75.0, Color::new(2, 0, 0)),
        ];
        assert_eq!(color_of_section(&sections, 30.0, Color::BLACK), Color::new(1, 0, 0));
        assert_eq!(color_of_section(&sections, 60.0, Color::BLACK), Color::new(2, 0, 0));
        assert_eq!(color_of_section(&sections, 90.0, Color::BLACK), Color::BLACK);
    }
}
