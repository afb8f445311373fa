use gauge_dial::{
    Color, Gauge, GaugeCommand, GaugeConfig, GaugeWindow, Marker, MarkerType, Section,
    TickLabelLocation, TickMarkType, TierStyle, WindowConfig,
};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = GaugeConfig::builder()
        .min(-20.0)
        .max(120.0)
        .title("Coolant")
        .unit("°C")
        .tick_label_location(TickLabelLocation::Outside)
        .major_tick_mark(TierStyle::with_type(TickMarkType::Triangle))
        .sections(vec![
            Section::new(90.0, 105.0, Color::new(0xff, 0xa5, 0x00)),
            Section::new(105.0, 120.0, Color::new(0xd7, 0x1e, 0x1e)),
        ])
        .areas(vec![Section::new(-20.0, 0.0, Color::new(0xcc, 0xe5, 0xff))])
        .markers(vec![Marker::new(85.0, MarkerType::Standard, Color::new(0x00, 0x80, 0x00))])
        .threshold(100.0)
        .threshold_visible(true)
        .check_sections_for_value(true)
        .led_visible(true)
        .lcd_visible(true)
        .build();

    let window = GaugeWindow::new(
        Gauge::new(config),
        WindowConfig::builder().title("random gauge").width(400).height(400).build(),
    );
    let window = match std::env::args().nth(1) {
        Some(path) => window.with_font(gauge_dial::window::load_font(path.as_ref())?),
        None => window,
    };

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = rng.random_range(-20.0..120.0);
            let commands = [
                GaugeCommand::SetValue(value),
                GaugeCommand::SetLed(value > 100.0),
            ];

            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(500));
        }
    });

    println!("Displaying a gauge with a randomly moving needle");
    println!("Pass a .ttf path as the first argument to draw text");
    println!("Press Ctrl+C to exit");

    window.show_with_commands(receiver)?;
    Ok(())
}
