use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use gauge_dial::window::load_font;
use gauge_dial::{Gauge, GaugeCommand, GaugeConfig, GaugeError, GaugeWindow, WindowConfig};
use log::{debug, info, warn};
use rand::Rng;

/// Circular gauge driven by numbers read from stdin, one per line
#[derive(Parser, Debug)]
#[command(name = "gauge-dial", version)]
struct Args {
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    min: f64,
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    max: f64,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    unit: String,
    /// TrueType/OpenType font used for all text
    #[arg(long)]
    font: Option<PathBuf>,
    /// Feed random values instead of reading stdin
    #[arg(long)]
    random: bool,
    /// Initial window edge length in logical pixels
    #[arg(long, default_value_t = 300)]
    size: u32,
}

fn main() -> Result<(), GaugeError> {
    env_logger::init();
    let args = Args::parse();
    let (min, max) = (args.min.min(args.max), args.min.max(args.max));

    let config = GaugeConfig::builder()
        .min(min)
        .max(max)
        .title(args.title.clone())
        .unit(args.unit)
        .build();
    let window_config = WindowConfig::builder()
        .title(if args.title.is_empty() {
            "Gauge".to_string()
        } else {
            args.title
        })
        .width(args.size)
        .height(args.size)
        .build();

    let mut window = GaugeWindow::new(Gauge::new(config), window_config);
    if let Some(path) = &args.font {
        window = window.with_font(load_font(path)?);
        info!("loaded font {}", path.display());
    }

    let (sender, receiver) = mpsc::channel();
    if args.random {
        thread::spawn(move || {
            let mut rng = rand::rng();
            loop {
                let value = rng.random_range(min..=max);
                if sender.send(GaugeCommand::SetValue(value)).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(750));
            }
        });
    } else {
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("stopped reading stdin: {err}");
                        break;
                    }
                };
                match line.trim().parse::<f64>() {
                    Ok(value) => {
                        if sender.send(GaugeCommand::SetValue(value)).is_err() {
                            break;
                        }
                    }
                    Err(_) => debug!("ignoring non-numeric input {line:?}"),
                }
            }
        });
    }

    window.show_with_commands(receiver)
}
