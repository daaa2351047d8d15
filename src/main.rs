//! spanwall - span one wallpaper image across all attached displays.
//!
//! Entry point for the command-line tool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{info, warn};

use spanwall::config::{self, Settings};
use spanwall::{DisplaySource, SystemDisplays, composite, resolve};

/// Command-line arguments for spanwall
#[derive(Parser, Debug)]
#[command(name = "spanwall")]
#[command(version, about = "Span one image across all attached displays", long_about = None)]
struct Args {
    /// Source image
    input: Option<PathBuf>,

    /// Where to write the composed wallpaper (format from extension)
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let parsed = Args::try_parse();

    let (settings, config_path, warnings) = load_settings();
    init_logging(settings.debug);
    match &config_path {
        Some(path) => info!("config: {}", path.display()),
        None => info!("config: none found, using defaults"),
    }
    for warning in &warnings {
        warn!("config: {warning}");
    }

    let args = match parsed {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            print_usage();
            print_diagnostics(None);
            return Ok(());
        }
        // --help / --version
        Err(e) => e.exit(),
    };

    match (args.input, args.output) {
        (Some(input), Some(output)) => run(&settings, &input, &output),
        (input, _) => {
            print_usage();
            print_diagnostics(input.as_deref());
            Ok(())
        }
    }
}

fn run(settings: &Settings, input: &Path, output: &Path) -> Result<()> {
    let records = SystemDisplays::new()
        .displays()
        .context("failed to enumerate displays")?;
    let layout = resolve(&records, &settings.hints);
    info!("resolved {} displays", layout.len());

    let image = image::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    info!("source: {} ({}×{})", input.display(), image.width(), image.height());

    let composed = composite(&layout, Some(&image), &settings.composition)
        .context("failed to compose wallpaper")?;
    composed
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {} ({}×{})", output.display(), composed.width(), composed.height());

    if settings.debug {
        let copy = std::env::temp_dir().join("spanwall.png");
        match composed.save(&copy) {
            Ok(()) => info!("debug copy: {}", copy.display()),
            Err(e) => warn!("failed to write debug copy {}: {e}", copy.display()),
        }
        #[cfg(feature = "svg")]
        {
            let svg_path = std::env::temp_dir().join("spanwall-layout.svg");
            match std::fs::write(&svg_path, spanwall::svg::render_layout_svg(&layout)) {
                Ok(()) => info!("layout visualization: {}", svg_path.display()),
                Err(e) => warn!("failed to write {}: {e}", svg_path.display()),
            }
        }
    }
    Ok(())
}

/// Settings from the first configuration file found, or defaults.
fn load_settings() -> (Settings, Option<PathBuf>, Vec<String>) {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let candidates = config::candidates(
        std::env::var_os(config::CONFIG_ENV).map(PathBuf::from),
        dirs::config_local_dir().into_iter().chain(exe_dir),
    );
    let Some(path) = config::locate(&candidates) else {
        return (Settings::default(), None, Vec::new());
    };

    match config::load(path) {
        Ok((settings, warnings)) => (
            settings,
            Some(path.to_path_buf()),
            warnings.iter().map(ToString::to_string).collect(),
        ),
        Err(e) => (
            Settings::default(),
            Some(path.to_path_buf()),
            vec![format!("cannot read {}: {e}", path.display())],
        ),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn print_usage() {
    println!("{}", Args::command().render_usage());
}

/// List enumerated displays and, given a path, the decoded image dimensions.
fn print_diagnostics(input: Option<&Path>) {
    match SystemDisplays::new().displays() {
        Ok(records) => records.iter().for_each(|record| println!("{record}")),
        Err(e) => println!("cannot enumerate displays: {e}"),
    }
    if let Some(input) = input {
        match image::image_dimensions(input) {
            Ok((w, h)) => println!("{}: {w}×{h}", input.display()),
            Err(e) => println!("cannot read {}: {e}", input.display()),
        }
    }
}
