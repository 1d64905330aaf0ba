use fren::backend::Backend;
use fren::config::Config;
use fren::display::{Display, InputEvent, PixelBuffer, RenderTarget};
use fren::model::Model;
use fren::{Context, Fixed32, Mat4};
use sdl2::keyboard::Keycode;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "fren.json";

/// Parse command line arguments on top of the loaded config
fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();

    // --config has to be resolved before the other flags override it
    let config_path = args
        .iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .map_or(CONFIG_PATH, String::as_str);
    let mut config = match Config::load(config_path) {
        Ok(config) => {
            info!(path = config_path, "config loaded");
            config
        },
        Err(e) => {
            if config_path != CONFIG_PATH {
                warn!(path = config_path, error = %e, "failed to load config, using defaults");
            }
            Config::default()
        },
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => config.vsync = false,
            "--config" | "-c" => i += 1,
            "--model" | "-m" => {
                if let Some(path) = args.get(i + 1) {
                    config.model = Some(path.clone());
                    i += 1;
                }
            },
            "--width" | "-w" => {
                if let Some(Ok(w)) = args.get(i + 1).map(|s| s.parse::<u16>()) {
                    config.width = w;
                }
                i += 1;
            },
            "--height" | "-h" => {
                if let Some(Ok(h)) = args.get(i + 1).map(|s| s.parse::<u16>()) {
                    config.height = h;
                }
                i += 1;
            },
            "--scale" | "-s" => {
                if let Some(Ok(s)) = args.get(i + 1).map(|s| s.parse::<u32>()) {
                    config.scale = s;
                }
                i += 1;
            },
            "--resolution" | "-r" => {
                // WxH, e.g. 320x240
                if let Some((w, h)) = args.get(i + 1).and_then(|s| s.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse::<u16>(), h.parse::<u16>()) {
                        config.width = w;
                        config.height = h;
                    }
                }
                i += 1;
            },
            "--help" => {
                println!("Usage: fren [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config PATH, -c PATH    Config file (default: {})", CONFIG_PATH);
                println!("  --model PATH, -m PATH     Wireframe model JSON (default: cube)");
                println!("  --width W, -w W           Canvas width (default: {})", config.width);
                println!("  --height H, -h H          Canvas height (default: {})", config.height);
                println!("  --resolution WxH, -r WxH  Canvas size (e.g., 320x240)");
                println!("  --scale N, -s N           Window pixels per canvas pixel");
                println!("  --no-vsync                Disable VSync");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            other => warn!(arg = other, "ignoring unknown argument"),
        }
        i += 1;
    }

    config
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();
    let viewport = config.viewport().map_err(|e| e.to_string())?;
    let model = match &config.model {
        Some(path) => Model::load(path).map_err(|e| format!("{}: {}", path, e))?,
        None => Model::cube(),
    };

    let (window_width, window_height) = config.window_size();
    let (mut display, texture_creator) =
        Display::with_options("fren", window_width, window_height, config.vsync)?;
    let canvas_width = u32::from(viewport.width());
    let canvas_height = u32::from(viewport.height());
    let mut target = RenderTarget::with_size(&texture_creator, canvas_width, canvas_height)?;
    let mut buffer = PixelBuffer::with_size(canvas_width, canvas_height);
    buffer.set_clear_color(config.background_555());

    let mut ctx = Context::new(viewport);
    let aspect = f32::from(viewport.width()) / f32::from(viewport.height());
    let projection = Mat4::perspective(std::f32::consts::FRAC_PI_3, aspect, 0.5, 20.0);
    let camera = Mat4::translation(Fixed32::ZERO, Fixed32::ZERO, Fixed32::from_int(-3));

    println!("=== fren ===");
    println!(
        "Canvas: {}x{} (window {}x{})",
        canvas_width,
        canvas_height,
        display.width(),
        display.height()
    );
    println!("Model: {} ({} vertices)", model.name, model.vertex_count());
    println!("Controls:");
    println!("  Space   - Pause rotation");
    println!("  P       - Cycle draw mode");
    println!("  F       - Log frame rate");
    println!("  Escape  - Quit");

    let mut mode = model.mode;
    let mut paused = false;
    let mut angle = 0.0_f32;
    let mut last_frame = Instant::now();
    let mut frames = 0_u32;
    let mut frames_since = Instant::now();

    'main: loop {
        let now = Instant::now();
        let dt = (now - last_frame).as_secs_f32();
        last_frame = now;
        frames += 1;

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::Space) => paused = !paused,
                InputEvent::KeyDown(Keycode::P) => {
                    mode = mode.next();
                    info!(?mode, "draw mode");
                },
                InputEvent::KeyDown(Keycode::F) => {
                    let elapsed = frames_since.elapsed().as_secs_f32();
                    info!(fps = frames as f32 / elapsed.max(f32::EPSILON), "frame rate");
                    frames = 0;
                    frames_since = Instant::now();
                },
                InputEvent::KeyDown(_) => {},
            }
        }

        if !paused {
            angle = (angle + dt) % std::f32::consts::TAU;
        }
        let a = Fixed32::from_f32(angle);
        let mvp = projection
            * camera
            * Mat4::rotation_y(a)
            * Mat4::rotation_x(Fixed32::from_f32(angle * 0.7));
        ctx.set_vertex_function(move |v| mvp * v);

        buffer.clear();
        model
            .draw_as(&mut ctx, &mut buffer, mode)
            .map_err(|e| e.to_string())?;
        display.present(&mut target, &buffer)?;
    }

    Ok(())
}
