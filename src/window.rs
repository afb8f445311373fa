// ============================================================================
// WINDOW HOST
// ============================================================================
//
// Presents a Gauge in a winit window through a pixels surface. Commands may
// arrive from any thread; they are drained on the event-loop thread before
// each frame so bursts coalesce into a single layout.

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use log::{error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::canvas::Canvas;
use crate::config::{Color, Marker, Section};
use crate::error::GaugeError;
use crate::gauge::{Gauge, GaugeEvent};

/// Updates a running gauge window accepts
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetValue(f64),
    SetRange(f64, f64),
    SetTitle(String),
    SetUnit(String),
    SetSections(Vec<Section>),
    SetAreas(Vec<Section>),
    SetMarkers(Vec<Marker>),
    SetThreshold(f64),
    SetLed(bool),
    ResetMeasuredValues,
}

#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    #[builder(into, default = "Gauge".to_string())]
    pub title: String,
    #[builder(default = 300)]
    pub width: u32,
    #[builder(default = 300)]
    pub height: u32,
    #[builder(default = true)]
    pub resizable: bool,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// Fraction of the remaining distance the needle covers per frame
    #[builder(default = 0.1)]
    pub needle_lerp_factor: f64,
    #[builder(default = Color::WHITE)]
    pub clear_color: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub fn load_font(path: &Path) -> Result<Font<'static>, GaugeError> {
    let bytes = std::fs::read(path)?;
    Font::try_from_vec(bytes).ok_or_else(|| GaugeError::Font(path.to_path_buf()))
}

/// Applies one command to the gauge.
pub fn apply_command(gauge: &mut Gauge, command: GaugeCommand) {
    match command {
        GaugeCommand::SetValue(value) => gauge.set_value(value),
        GaugeCommand::SetRange(min, max) => gauge.set_range(min.min(max), min.max(max)),
        GaugeCommand::SetTitle(title) => gauge.set_title(title),
        GaugeCommand::SetUnit(unit) => gauge.set_unit(unit),
        GaugeCommand::SetSections(sections) => gauge.set_sections(sections),
        GaugeCommand::SetAreas(areas) => gauge.set_areas(areas),
        GaugeCommand::SetMarkers(markers) => gauge.set_markers(markers),
        GaugeCommand::SetThreshold(threshold) => gauge.set_threshold(threshold),
        GaugeCommand::SetLed(on) => gauge.set_led_on(on),
        GaugeCommand::ResetMeasuredValues => gauge.reset_measured_values(),
    }
}

fn lerp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// Eases the needle toward the target value by one frame.
pub fn step_needle(gauge: &mut Gauge, factor: f64) -> Vec<GaugeEvent> {
    let target = gauge.value();
    let current = gauge.current_value();
    if current == target {
        return Vec::new();
    }
    let range = gauge.config().range().abs().max(f64::EPSILON);
    let mut next = lerp(current, target, factor.clamp(0.0, 1.0));
    if (target - next).abs() < range * 1e-4 {
        next = target;
    }
    gauge.set_current_value(next)
}

pub struct GaugeWindow {
    gauge: Gauge,
    config: WindowConfig,
    font: Option<Font<'static>>,
}

impl GaugeWindow {
    pub fn new(gauge: Gauge, config: WindowConfig) -> Self {
        Self {
            gauge,
            config,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn gauge_mut(&mut self) -> &mut Gauge {
        &mut self.gauge
    }

    pub fn show(self) -> Result<(), GaugeError> {
        self.run_window(None)
    }

    pub fn show_with_commands(self, receiver: Receiver<GaugeCommand>) -> Result<(), GaugeError> {
        self.run_window(Some(receiver))
    }

    fn run_window(self, receiver: Option<Receiver<GaugeCommand>>) -> Result<(), GaugeError> {
        let GaugeWindow {
            mut gauge,
            config,
            font,
        } = self;
        if font.is_none() {
            warn!("no font loaded, text will not be drawn");
        }

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
            .with_resizable(config.resizable)
            .build(&event_loop)?;
        let window = Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        info!("opened {}x{} gauge window", size.width, size.height);

        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!("failed to resize pixel buffer: {err}");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!("failed to resize surface: {err}");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                apply_command(&mut gauge, command);
                            }
                        }
                        for event in step_needle(&mut gauge, config.needle_lerp_factor) {
                            info!("{event:?}");
                        }

                        let plan = gauge.frame(fb_width as f64, fb_height as f64);
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height)
                            .with_font(font.as_ref());
                        canvas.clear(config.clear_color);
                        canvas.render(plan);
                        if let Err(err) = pixels.render() {
                            error!("failed to present frame: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
