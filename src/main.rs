use glam::Vec2;
use liquid_ether::{
    AnalysisRecorder, ImageExporter, InputEvent, LiquidEtherApp, Orchestrator, PointerHub,
    Renderer, SimulationParams,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);

struct Options {
    headless: bool,
    config: Option<PathBuf>,
    frames: u64,
    out_dir: PathBuf,
}

fn parse_args() -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        headless: false,
        config: None,
        frames: 240,
        out_dir: PathBuf::from("frames"),
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "headless" => options.headless = true,
            "--config" => options.config = Some(args.next().ok_or("--config needs a path")?.into()),
            "--frames" => options.frames = args.next().ok_or("--frames needs a count")?.parse()?,
            "--out" => options.out_dir = args.next().ok_or("--out needs a directory")?.into(),
            other => return Err(format!("unknown argument {other:?}").into()),
        }
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    let params = match &options.config {
        Some(path) => SimulationParams::from_json_file(path)?,
        None => SimulationParams::default(),
    };

    if options.headless {
        run_headless(params, options.frames, &options.out_dir)?;
    } else {
        run_gui_app(params)?;
    }

    Ok(())
}

/// Sweeps a pointer around a circle for the first half of the run, then
/// leaves the viewport so the autopilot can take over once idle.
fn run_headless(
    params: SimulationParams,
    frames: u64,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("running {frames} headless frames into {}", out_dir.display());

    let hub = PointerHub::new();
    let mut simulation = Orchestrator::new(params, 512, 512, &hub)?.with_autopilot_seed(7);
    let exporter = ImageExporter::with_size(Renderer::default(), 512, 512);
    let mut recorder = AnalysisRecorder::new();
    let boundary = simulation.params().boundary_mode;

    for frame in 0..frames {
        if frame < frames / 2 {
            let angle = frame as f32 * 0.08;
            hub.publish(InputEvent::PointerMove(Vec2::new(angle.cos(), angle.sin()) * 0.5));
        } else if frame == frames / 2 {
            hub.publish(InputEvent::PointerLeave);
        }

        simulation.tick(FRAME);

        if frame % 10 == 0 {
            exporter.export_frame(simulation.velocity(), out_dir, "velocity", frame)?;
            recorder
                .record_frame(simulation.velocity(), boundary, frame)
                .log_summary();
        }
    }

    recorder.log_trends();
    log::info!(
        "finished at t={:.2}s in {:?} mode",
        simulation.time(),
        simulation.pointer_mode()
    );
    Ok(())
}

fn run_gui_app(params: SimulationParams) -> Result<(), Box<dyn std::error::Error>> {
    params.validate()?;
    let (width, height) = (1024, 768);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_title("liquid-ether"),
        ..Default::default()
    };

    eframe::run_native(
        "liquid-ether",
        options,
        Box::new(move |cc| {
            match LiquidEtherApp::from_creation_context(cc, params, width, height) {
                Ok(app) => Box::new(app) as Box<dyn eframe::App>,
                Err(e) => {
                    log::error!("failed to start simulation: {e}");
                    std::process::exit(1);
                }
            }
        }),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
