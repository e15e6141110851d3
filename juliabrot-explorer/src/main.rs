use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, warn};

use juliabrot_explorer::{Command, Explorer, ExplorerError, ExplorerSettings, RenderEvent};

/// Drive a juliabrot explorer from the command line.
///
/// Each command waits for its render to finish before the next one runs.
#[derive(Debug, Parser)]
#[command(name = "juliabrot", version, about)]
struct Cli {
    /// JSON settings file; missing or invalid files fall back to defaults.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Write the effective settings to this file before exploring.
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// Seconds to wait for each render.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Commands: left right up down in out undo reset mandelbrot
    /// julia:PX,PY brush:KIND offset:F iterations:N rect:X,Y,W,H
    commands: Vec<Command>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> juliabrot_explorer::Result<()> {
    let mut settings = cli
        .settings
        .as_deref()
        .map(ExplorerSettings::load)
        .unwrap_or_default();
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(path) = &cli.save_settings {
        settings.save(path)?;
        info!("Wrote settings to {}", path.display());
    }

    let timeout = Duration::from_secs(cli.timeout);
    let mut explorer = Explorer::new(settings)?;
    settle(&mut explorer, timeout)?;
    report(&explorer, "start");

    for command in &cli.commands {
        if let Some(seed) = command.apply(&mut explorer)? {
            info!("{seed}");
        }
        settle(&mut explorer, timeout)?;
        report(&explorer, &command.to_string());
    }
    Ok(())
}

fn settle(explorer: &mut Explorer, timeout: Duration) -> juliabrot_explorer::Result<()> {
    let Some(event) = explorer.wait(timeout) else {
        return if explorer.is_rendering() {
            Err(ExplorerError::Timeout(timeout))
        } else {
            Ok(())
        };
    };
    let generation = event.generation();
    match event {
        RenderEvent::Failed { error, .. } => {
            warn!(generation, "Render failed, keeping previous frame: {error}")
        }
        RenderEvent::Published { elapsed, .. } => {
            debug!(generation, elapsed_ms = elapsed.as_millis() as u64, "Render settled")
        }
    }
    Ok(())
}

fn report(explorer: &Explorer, step: &str) {
    let viewport = explorer.viewport();
    info!(
        step,
        mode = explorer.mode().label(),
        center = %format_args!("{:.12}", viewport.center),
        zoom = %format_args!("{:.3e}", explorer.zoom_level()),
        max_iterations = viewport.max_iterations,
        brush = explorer.brush_kind().label(),
        elapsed_ms = explorer.last_render_time().map(|d| d.as_millis() as u64),
        "View settled"
    );
}
