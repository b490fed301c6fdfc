use clap::Parser;
use dual_rasterizer::core::pipeline::Toggle;
use dual_rasterizer::io::config::Config;
use dual_rasterizer::io::image::save_framebuffer;
use dual_rasterizer::pipeline::renderer::Renderer;
use dual_rasterizer::scene::camera::CameraInput;
use dual_rasterizer::scene::loader::init_scene;
use log::{error, info};
use std::time::Instant;

/// Headless driver: loads a scene, renders a number of frames and saves the last one.
#[derive(Parser, Debug)]
#[command(name = "dual_rasterizer")]
#[command(about = "TOML-driven software rasterizer")]
struct Cli {
    /// Scene file (TOML). The built-in vehicle scene is used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image path, overrides `render.output`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Number of frames to simulate, overrides `render.frames`.
    #[arg(short, long)]
    frames: Option<usize>,

    /// Seconds per frame, overrides `render.frame_time`.
    #[arg(long)]
    frame_time: Option<f32>,

    /// State transition applied before the first frame; may be repeated.
    #[arg(short, long = "toggle", value_enum)]
    toggles: Vec<Toggle>,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config file: {path}");
            Config::load(path).map_err(|e| {
                error!("{e}");
                "Failed to load config".to_string()
            })?
        }
        None => {
            info!("Using default scene");
            Config::default()
        }
    };

    let mut settings = config.render.settings();
    for &toggle in &cli.toggles {
        settings.apply(toggle);
    }

    let frames = cli.frames.unwrap_or(config.render.frames).max(1);
    let frame_time = cli.frame_time.unwrap_or(config.render.frame_time);
    let output = cli.output.unwrap_or_else(|| config.render.output.clone());

    let mut scene = init_scene(&config);
    let mut renderer = Renderer::new(config.render.width, config.render.height, settings);
    let input = CameraInput::default();

    let start_time = Instant::now();
    for frame in 0..frames {
        let frame_start = Instant::now();
        scene.update(&input, frame_time, renderer.settings.rotate);
        renderer.render_frame(&mut scene).map_err(|e| {
            error!("Frame {frame} failed: {e}");
            "Rendering failed".to_string()
        })?;
        info!(
            "Frame {} rendered in {:.2} ms",
            frame + 1,
            frame_start.elapsed().as_secs_f64() * 1000.0
        );
    }
    info!(
        "Rendered {} frames in {:.2?}",
        frames,
        start_time.elapsed()
    );

    save_framebuffer(&renderer.framebuffer, &output).map_err(|e| {
        error!("{e}");
        "Failed to save image".to_string()
    })?;

    Ok(())
}
