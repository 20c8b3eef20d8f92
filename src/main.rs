use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use termlife::command::CommandInterpreter;
use termlife::config::{LifeConfig, Overrides};
use termlife::controller::Controller;
use termlife::error::Result;
use termlife::grid::Grid;
use termlife::logging::{self, LogTarget};
use termlife::pattern::{self, BuiltinPatterns, DirPatterns, PatternFormat, PatternStore};
use termlife::settings::Settings;
use termlife::tui;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "termlife")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Conway's Game of Life in the terminal, driven by typed commands", long_about = None)]
struct Cli {
    /// Pattern file to start from (defaults to a glider)
    pattern: Option<PathBuf>,

    /// Character marking live cells in the pattern file
    #[arg(requires = "dead")]
    alive: Option<String>,

    /// Character marking dead cells in the pattern file
    dead: Option<String>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between generations while animating
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Wrap around the grid edges instead of treating them as dead
    #[arg(short, long)]
    wrap: bool,

    /// Start paused instead of animating
    #[arg(short, long)]
    paused: bool,

    /// Directory of pattern files offered by `set` and `templates`
    #[arg(long)]
    patterns_dir: Option<PathBuf>,

    /// Print this many generations to stdout (no interactive display)
    #[arg(long, value_name = "GENERATIONS")]
    print: Option<u64>,

    /// Log file for the interactive session
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("termlife: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| settings.log_file.clone())
        .unwrap_or_else(logging::default_log_path);
    if cli.print.is_some() {
        logging::init_logging(LogTarget::Stderr, "warn")?;
    } else {
        logging::init_logging(LogTarget::File(&log_file), "info")?;
    }
    if let Some(e) = settings_error {
        warn!(error = %e, path = %Settings::config_path().display(), "ignoring unreadable settings");
    }

    let overrides = Overrides {
        pattern_file: cli.pattern,
        alive_token: cli.alive,
        dead_token: cli.dead,
        width: cli.width,
        height: cli.height,
        interval_ms: cli.interval_ms,
        wrap: cli.wrap,
        paused: cli.paused,
        patterns_dir: cli.patterns_dir,
    };
    let config = LifeConfig::resolve(overrides, &settings)?;

    let grid = starting_grid(&config)?;
    let controller = Arc::new(Controller::new(grid, &config.simulation, config.display));
    info!(
        width = config.simulation.width,
        height = config.simulation.height,
        boundary = %config.simulation.boundary,
        population = controller.with_grid(|g| g.population()),
        "simulation ready"
    );

    if let Some(generations) = cli.print {
        return print_generations(&controller, generations);
    }

    let store = pattern_store(&config)?;
    let interpreter = CommandInterpreter::new(controller.clone(), store, config.format);
    if !config.simulation.start_paused {
        controller.play()?;
    }

    tui::run(
        controller,
        interpreter,
        config.simulation.interval,
        config.display.alive_glyph,
    )
}

/// Grid from the pattern file, or the built-in glider
fn starting_grid(config: &LifeConfig) -> Result<Grid> {
    match &config.pattern_file {
        Some(path) => {
            let text = pattern::read_pattern_file(path)?;
            info!(path = %path.display(), "loading pattern file");
            Grid::from_pattern(&text, &config.format)
        }
        None => Grid::from_pattern(pattern::DEFAULT_PATTERN, &PatternFormat::default()),
    }
}

/// Templates come from a directory when one is configured. It must be
/// readable at startup.
fn pattern_store(config: &LifeConfig) -> Result<Arc<dyn PatternStore>> {
    match &config.patterns_dir {
        Some(dir) => {
            let store = DirPatterns::new(dir);
            let names = store.names()?;
            info!(dir = %store.root().display(), count = names.len(), "pattern directory ready");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(BuiltinPatterns)),
    }
}

/// Headless mode: write each generation followed by a blank line
fn print_generations(controller: &Controller, generations: u64) -> Result<()> {
    let mut out = io::stdout().lock();
    let mut frame = controller.frame();

    for _ in 0..=generations {
        writeln!(out, "generation {} (population {})", frame.generation, frame.population)?;
        for line in &frame.lines {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;

        if frame.generation == generations {
            break;
        }
        controller.request_step()?;
        if let Some(next) = controller.advance() {
            frame = next;
        }
    }

    out.flush()?;
    Ok(())
}
