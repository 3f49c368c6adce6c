use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use pollux::{
    expect,
    integrators::IntegratorType,
    pollux_info,
    renderer::{RenderStatus, Renderer},
    scene::BuiltinScene,
    settings::{InitialSettings, LogLevel},
};

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "pollux")]
#[command(about = "Headless wavefront path tracer", long_about = None)]
struct Cli {
    /// YAML settings file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output EXR, overrides the settings file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Built-in scene to render
    #[arg(long)]
    scene: Option<BuiltinScene>,

    #[arg(short, long)]
    integrator: Option<IntegratorType>,

    /// Samples per pixel
    #[arg(long)]
    iterations: Option<u32>,

    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .chain(std::fs::File::create("pollux.log")?)
        .apply()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => expect!(InitialSettings::load(path), "Failed to load settings"),
        None => InitialSettings::default(),
    };
    if let Some(scene) = cli.scene {
        settings.scene.scene = scene;
    }
    if let Some(integrator) = cli.integrator {
        settings.render.integrator = integrator;
    }
    if let Some(iterations) = cli.iterations {
        settings.render.iterations = iterations;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }
    if cli.output.is_some() {
        settings.output = cli.output;
    }

    if let Err(why) = setup_logger(settings.log_level.into()) {
        panic!("{}", why);
    };

    pollux_info!(
        "Rendering {} at {}x{} with {} integrator, {} iterations",
        settings.scene.scene,
        settings.render.width,
        settings.render.height,
        settings.render.integrator,
        settings.render.iterations
    );

    let scene = expect!(
        settings.scene.scene.build(settings.scene.bvh),
        "Failed to build scene"
    );

    let mut renderer = Renderer::new();
    expect!(
        renderer.launch(Arc::new(scene), settings.render),
        "Failed to launch render"
    );

    while renderer.is_active() {
        match renderer.check_status() {
            Some(RenderStatus::Progress {
                iterations_done,
                iterations_total,
                approx_remaining_s,
                current_rays_per_s,
            }) => {
                pollux_info!(
                    "{}/{} iterations, {:.1}s remaining, {:.2} Mrays/s",
                    iterations_done,
                    iterations_total,
                    approx_remaining_s,
                    current_rays_per_s * 1e-6
                );
            }
            Some(RenderStatus::Finished { .. }) => break,
            None => std::thread::sleep(STATUS_POLL_INTERVAL),
        }
    }

    let result = expect!(renderer.wait_result(), "Render failed");
    pollux_info!(
        "Render took {:.2}s, {} iterations, {:.2} Mrays/s",
        result.secs,
        result.iterations,
        (result.ray_count as f32) / result.secs.max(f32::EPSILON) * 1e-6
    );

    let path = settings.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}_{}.exr",
            settings.scene.scene,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    expect!(result.film.write_exr(&path), "Failed to write output");
}
