//! LED lamp, LCD panel and the text captions around the dial.

use crate::config::{Color, GaugeConfig};
use crate::layout::Disk;
use crate::plan::{DrawCommand, Point, Stroke, TextAlign, TextCommand};

const LED_SIZE: f64 = 0.06;
const LED_X: f64 = 0.65;
const LED_Y: f64 = 0.47;

const LCD_WIDTH: f64 = 0.4;
const LCD_HEIGHT: f64 = 0.114;
const LCD_Y: f64 = 0.583;
const LCD_CORNER: f64 = 0.0125;

const LED_FRAME: Color = Color::rgba(0x29, 0x29, 0x29, 0xa6);
const LED_HIGHLIGHT: Color = Color::rgba(0xff, 0xff, 0xff, 0x59);
const LCD_BORDER: Color = Color::new(0x4d, 0x4d, 0x4d);

/// Lamp made of a frame, a main disc lit or dimmed by `on`, and a highlight.
pub fn led(disk: &Disk, color: Color, on: bool) -> Vec<DrawCommand> {
    let size = disk.scaled(LED_SIZE);
    let corner = disk.at(LED_X, LED_Y);
    let disc = |offset: f64, diameter: f64, fill: Color| {
        let radius = size * diameter * 0.5;
        DrawCommand::Circle {
            center: Point::new(
                corner.x + size * offset + radius,
                corner.y + size * offset + radius,
            ),
            radius,
            fill,
            stroke: None,
        }
    };
    let main = if on { color } else { color.scale_brightness(0.2) };
    vec![
        disc(0.0, 1.0, LED_FRAME),
        disc(0.14, 0.72, main),
        disc(0.21, 0.58, LED_HIGHLIGHT),
    ]
}

pub fn lcd_panel(disk: &Disk, config: &GaugeConfig) -> DrawCommand {
    let width = disk.scaled(LCD_WIDTH);
    DrawCommand::RoundedRect {
        origin: Point::new(
            disk.origin.x + (disk.size - width) * 0.5,
            disk.origin.y + disk.scaled(LCD_Y),
        ),
        width,
        height: disk.scaled(LCD_HEIGHT),
        corner: disk.scaled(LCD_CORNER),
        fill: config.lcd_background,
        stroke: Some(Stroke {
            color: LCD_BORDER,
            width: 1.0,
        }),
    }
}

fn caption(disk: &Disk, text: &str, y: f64, font: f64, max_width: f64, color: Color) -> DrawCommand {
    DrawCommand::Text(TextCommand {
        position: disk.at(0.5, y),
        text: text.to_string(),
        font_size: disk.scaled(font),
        bold: false,
        rotation: 0.0,
        align: TextAlign::Center,
        max_width: Some(disk.scaled(max_width)),
        color,
    })
}

/// Title, subtitle and unit, skipping empty strings.
pub fn captions(disk: &Disk, config: &GaugeConfig) -> Vec<DrawCommand> {
    [
        (&config.title, 0.26, 0.06, 0.3, config.title_color),
        (&config.sub_title, 0.76, 0.05, 0.25, config.sub_title_color),
        (&config.unit, 0.35, 0.05, 0.3, config.unit_color),
    ]
    .into_iter()
    .filter(|(text, ..)| !text.is_empty())
    .map(|(text, y, font, max_width, color)| caption(disk, text, y, font, max_width, color))
    .collect()
}

/// The numeric readout; drawn on the LCD when one is shown.
pub fn value_readout(disk: &Disk, config: &GaugeConfig, value: f64) -> TextCommand {
    let text = format!("{:.*}", config.decimals, value);
    if config.lcd_visible {
        let panel_right = 0.5 + LCD_WIDTH * 0.5;
        TextCommand {
            position: disk.at(panel_right - 0.009, 0.64),
            text,
            font_size: disk.scaled(0.09),
            bold: false,
            rotation: 0.0,
            align: TextAlign::Right,
            max_width: Some(disk.scaled(LCD_WIDTH * 0.95)),
            color: config.lcd_foreground,
        }
    } else {
        TextCommand {
            position: disk.at(0.5, 0.65),
            text,
            font_size: disk.scaled(0.1),
            bold: false,
            rotation: 0.0,
            align: TextAlign::Center,
            max_width: Some(disk.scaled(0.5)),
            color: config.value_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk() -> Disk {
        Disk::new(Point::default(), 200.0)
    }

    #[test]
    fn led_dims_when_off() {
        let red = Color::new(200, 0, 0);
        let on = led(&disk(), red, true);
        let off = led(&disk(), red, false);
        let fill = |commands: &[DrawCommand]| match &commands[1] {
            DrawCommand::Circle { fill, .. } => *fill,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(fill(&on), red);
        assert_eq!(fill(&off), Color::new(40, 0, 0));
    }

    #[test]
    fn led_sits_right_of_center() {
        let commands = led(&disk(), Color::BLACK, true);
        let DrawCommand::Circle { center, radius, .. } = &commands[0] else {
            panic!("expected the frame disc");
        };
        assert!((center.x - 136.0).abs() < 1e-9);
        assert!((center.y - 100.0).abs() < 1e-9);
        assert!((radius - 6.0).abs() < 1e-9);
    }

    #[test]
    fn lcd_is_centered_horizontally() {
        let DrawCommand::RoundedRect { origin, width, .. } = lcd_panel(&disk(), &GaugeConfig::default())
        else {
            panic!("expected a rounded rect");
        };
        assert!((origin.x - 60.0).abs() < 1e-9);
        assert!((width - 80.0).abs() < 1e-9);
    }

    #[test]
    fn captions_skip_empty_text() {
        let config = GaugeConfig::builder().title("Speed").unit("km/h").build();
        let commands = captions(&disk(), &config);
        let texts: Vec<_> = commands
            .iter()
            .map(|c| match c {
                DrawCommand::Text(t) => t.text.as_str(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(texts, ["Speed", "km/h"]);
    }

    #[test]
    fn readout_moves_onto_the_lcd() {
        let plain = value_readout(&disk(), &GaugeConfig::default(), 42.0);
        assert_eq!(plain.text, "42.0");
        assert_eq!(plain.align, TextAlign::Center);

        let config = GaugeConfig::builder().lcd_visible(true).decimals(2).build();
        let lcd = value_readout(&disk(), &config, 42.0);
        assert_eq!(lcd.text, "42.00");
        assert_eq!(lcd.align, TextAlign::Right);
        assert_eq!(lcd.color, config.lcd_foreground);
        assert!((lcd.position.x - 138.2).abs() < 1e-9);
    }
}
