use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};

use gfxblend::config::MqttConfig;
use gfxblend::error::SinkError;
use gfxblend::stream::{MqttSink, WriteSink};
use gfxblend::{ChunkSink, Config, DisplayStream, Framebuffer, GfxBlend, Progress, Rotation};

mod control;
mod demos;
mod util;

use control::{Command, Controller};
use demos::{Demo, Gfx};
use util::FrameClock;

#[derive(Parser, Debug)]
#[command(name = "gfxblend")]
#[command(author, version, about = "Blended shape demos on an RGB565 framebuffer, streamed as BMP snapshots")]
struct Args {
    /// Config file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Native framebuffer width
    #[arg(long)]
    width: Option<u32>,

    /// Native framebuffer height
    #[arg(long)]
    height: Option<u32>,

    /// Screen rotation in degrees: 0, 90, 180 or 270
    #[arg(short, long)]
    rotation: Option<u16>,

    /// Render, write one BMP snapshot to this file and exit
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frames to render before stopping (with --output: before the snapshot)
    #[arg(short, long)]
    frames: Option<u32>,

    /// Demo to start with
    #[arg(short, long, default_value = "0")]
    demo: usize,

    /// Stream snapshots to this MQTT broker
    #[arg(long)]
    mqtt_host: Option<String>,

    /// MQTT base topic
    #[arg(long)]
    topic: Option<String>,

    /// Show the framebuffer in a window
    #[cfg(feature = "preview")]
    #[arg(long)]
    preview: bool,

    /// Preview window scale factor
    #[cfg(feature = "preview")]
    #[arg(long, default_value = "2")]
    scale: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("gfxblend=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let framebuffer = Framebuffer::with_rotation(config.width, config.height, config.rotation);
    let gfx = GfxBlend::new(framebuffer);
    gfx.dump_config();

    let mut app = App::new(gfx, &config, args.demo);

    if let Some(path) = &args.output {
        return app.render_to_file(path, args.frames.unwrap_or(30));
    }

    if let Some(mqtt) = &config.mqtt {
        match MqttSink::connect(&mqtt.host, mqtt.port, &mqtt.topic) {
            Ok(sink) => app.sink = Some(Box::new(sink)),
            Err(e) => warn!(host = %mqtt.host, error = %e, "mqtt unavailable, snapshots disabled"),
        }
    }

    app.controller = match Controller::new() {
        Ok(controller) => {
            info!(socket = %controller.socket_path().display(), "control socket listening");
            Some(controller)
        },
        Err(e) => {
            warn!(error = %e, "control socket unavailable");
            None
        },
    };

    #[cfg(feature = "preview")]
    if args.preview {
        return run_preview(&mut app, args.scale, args.frames);
    }

    run_headless(&mut app, args.frames)
}

/// Config file (or defaults) with command line overrides applied
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(degrees) = args.rotation {
        config.rotation =
            Rotation::from_degrees(degrees).ok_or_else(|| anyhow!("unsupported rotation {degrees}"))?;
    }
    if let Some(host) = &args.mqtt_host {
        let mqtt = config.mqtt.get_or_insert_with(MqttConfig::default);
        mqtt.host.clone_from(host);
    }
    if let Some(topic) = &args.topic {
        let mqtt = config.mqtt.get_or_insert_with(MqttConfig::default);
        mqtt.topic.clone_from(topic);
    }

    config.validate()?;
    Ok(config)
}

struct App {
    gfx: Gfx,
    stream: DisplayStream,
    sink: Option<Box<dyn ChunkSink>>,
    controller: Option<Controller>,
    demos: Vec<Box<dyn Demo>>,
    current: usize,
    frame_interval: Duration,
    chunks_per_frame: usize,
    sink_retries: u32,
}

impl App {
    fn new(gfx: Gfx, config: &Config, demo: usize) -> Self {
        let stream = DisplayStream::for_surface(gfx.surface(), config.max_chunk_size);
        let demos = demos::all();
        let current = demo.min(demos.len().saturating_sub(1));
        Self {
            gfx,
            stream,
            sink: None,
            controller: None,
            demos,
            current,
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            chunks_per_frame: config.chunks_per_frame.max(1),
            sink_retries: config.sink_retries,
        }
    }

    /// Apply one command. Returns false to quit.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Snapshot => {
                if self.sink.is_some() {
                    self.stream.start_streaming();
                } else {
                    warn!("snapshot requested but no sink is connected");
                }
            },
            Command::Next => self.select((self.current + 1) % self.demos.len()),
            Command::Prev => self.select((self.current + self.demos.len() - 1) % self.demos.len()),
            Command::Demo(idx) if idx < self.demos.len() => self.select(idx),
            Command::Demo(idx) => warn!(idx, "no such demo"),
            Command::Quit => return false,
        }
        true
    }

    fn select(&mut self, idx: usize) {
        self.current = idx;
        info!(demo = self.demos[idx].name(), "demo selected");
    }

    /// Render one frame and move the stream forward. Returns false to quit.
    fn frame(&mut self, dt: f32) -> bool {
        let commands = self.controller.as_ref().map(Controller::poll).unwrap_or_default();
        for command in commands {
            if !self.handle(command) {
                return false;
            }
        }

        let demo = &mut self.demos[self.current];
        demo.update(dt);
        demo.render(&mut self.gfx);

        // The frame is complete here, so the capture never sees a half-drawn picture
        if self.stream.needs_snapshot() {
            if let Err(e) = self.stream.take_snapshot(self.gfx.surface().as_bytes()) {
                error!(error = %e, "snapshot failed");
            }
        }

        if let Some(sink) = self.sink.as_deref_mut() {
            if let Err(e) = pump(&mut self.stream, sink, self.chunks_per_frame, self.sink_retries) {
                error!(error = %e, "sink failed, snapshots disabled");
                self.sink = None;
            }
        }
        true
    }

    /// Render `frames` frames at the configured frame interval, then stream
    /// one snapshot into a BMP file
    fn render_to_file(&mut self, path: &Path, frames: u32) -> Result<()> {
        let dt = self.frame_interval.as_secs_f32();
        for _ in 0..frames.max(1) {
            let demo = &mut self.demos[self.current];
            demo.update(dt);
            demo.render(&mut self.gfx);
        }

        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        let mut sink = WriteSink::new(BufWriter::new(file));

        self.stream.start_streaming();
        self.stream.take_snapshot(self.gfx.surface().as_bytes())?;
        while send_with_retry(&mut self.stream, &mut sink, self.sink_retries)?.is_pending() {}
        sink.flush()?;

        info!(
            path = %path.display(),
            bytes = sink.written(),
            demo = self.demos[self.current].name(),
            "snapshot written"
        );
        Ok(())
    }
}

/// Offer the sink one chunk, retrying while it reports backpressure
fn send_with_retry<K: ChunkSink + ?Sized>(
    stream: &mut DisplayStream,
    sink: &mut K,
    retries: u32,
) -> Result<Progress, SinkError> {
    let mut attempt = 0;
    loop {
        match stream.get_next_chunk(sink) {
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                thread::sleep(Duration::from_millis(2));
            },
            result => return result,
        }
    }
}

/// Send up to `max_chunks` chunks. A sink still busy after its retries is
/// left for the next frame.
fn pump<K: ChunkSink + ?Sized>(
    stream: &mut DisplayStream,
    sink: &mut K,
    max_chunks: usize,
    retries: u32,
) -> Result<(), SinkError> {
    for _ in 0..max_chunks {
        match send_with_retry(stream, sink, retries) {
            Ok(Progress::More) => {},
            Ok(Progress::Waiting | Progress::Done) => break,
            Err(e) if e.is_transient() => {
                debug!(position = stream.position(), "sink still busy, deferring");
                break;
            },
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn run_headless(app: &mut App, frames: Option<u32>) -> Result<()> {
    let mut clock = FrameClock::new(60);
    let mut rendered = 0u32;

    info!(demos = app.demos.len(), "running headless, send commands to the control socket");

    loop {
        let started = Instant::now();
        let dt = clock.tick();
        if !app.frame(dt) {
            break;
        }

        rendered += 1;
        if frames.is_some_and(|limit| rendered >= limit) {
            break;
        }
        if rendered % 300 == 0 {
            debug!(fps = clock.avg_fps(), "frame rate");
        }

        if let Some(rest) = app.frame_interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    info!(frames = rendered, "stopped");
    Ok(())
}

#[cfg(feature = "preview")]
fn run_preview(app: &mut App, scale: u32, frames: Option<u32>) -> Result<()> {
    use gfxblend::display::{InputEvent, PreviewTarget, PreviewWindow};
    use gfxblend::Canvas;
    use sdl2::keyboard::Keycode;

    let (width, height) = (app.gfx.surface().width(), app.gfx.surface().height());
    let (mut window, texture_creator) =
        PreviewWindow::open("gfxblend", width, height, scale).map_err(|e| anyhow!(e))?;
    let mut target = PreviewTarget::new(&texture_creator, width, height).map_err(|e| anyhow!(e))?;

    info!("Controls: Left/Right cycle demos, S snapshot, Escape quit");

    let mut clock = FrameClock::new(60);
    let mut rendered = 0u32;

    'main: loop {
        let dt = clock.tick();

        for event in window.poll_events() {
            let command = match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => Command::Quit,
                InputEvent::KeyDown(Keycode::Left) => Command::Prev,
                InputEvent::KeyDown(Keycode::Right) => Command::Next,
                InputEvent::KeyDown(Keycode::S) => Command::Snapshot,
                InputEvent::KeyDown(_) => continue,
            };
            if !app.handle(command) {
                break 'main;
            }
        }

        if !app.frame(dt) {
            break;
        }
        window
            .present(&mut target, app.gfx.surface())
            .map_err(|e| anyhow!(e))?;

        rendered += 1;
        if frames.is_some_and(|limit| rendered >= limit) {
            break;
        }
    }

    info!(frames = rendered, fps = clock.avg_fps(), "stopped");
    Ok(())
}
