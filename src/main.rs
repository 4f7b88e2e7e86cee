use anyhow::{Context, Result};
use clap::Parser;
use dla_aggregation::app::App;
use dla_aggregation::config::RunConfig;
use dla_aggregation::lattice::Lattice;
use dla_aggregation::report::{RunDirectory, RunRecord, RunSink};
use dla_aggregation::rng::SeededSource;
use dla_aggregation::simulation::{AggregationEngine, RunSummary};
use dla_aggregation::ui;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "dla-aggregation")]
#[command(about = "Grow an on-lattice diffusion-limited aggregation cluster and save a report")]
struct Args {
    /// Run name; names the output directory and files (no whitespace)
    #[arg(short = 'n', long = "name")]
    run_name: Option<String>,

    /// Lattice side length (must be > 10)
    #[arg(short = 'l', long)]
    length: Option<usize>,

    /// Random seed for a reproducible run (default: OS entropy)
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// JSON config file (default: the per-user config, if present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Directory the run directory is created in
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Replace an existing run directory of the same name
    #[arg(long)]
    replace: bool,

    /// Skip the colormap PNG
    #[arg(long = "no-image")]
    no_image: bool,

    /// Also write an animated GIF of the growth
    #[arg(long)]
    gif: bool,

    /// Show the finished cluster in the terminal
    #[arg(long)]
    view: bool,

    /// Write the resolved configuration to the per-user config file
    #[arg(long = "save-config")]
    save_config: bool,
}

/// Defaults, then the config file, then command-line flags
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match RunConfig::default_path().filter(|p| p.exists()) {
            Some(path) => {
                info!("using config {}", path.display());
                RunConfig::load_from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?
            }
            None => RunConfig::default(),
        },
    };

    if let Some(name) = &args.run_name {
        config.settings.run_name = name.clone();
    }
    if let Some(length) = args.length {
        config.settings.length = length;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dir) = &args.out_dir {
        config.output.base_dir = dir.clone();
    }
    config.output.replace_existing |= args.replace;
    config.output.write_image &= !args.no_image;
    config.output.write_animation |= args.gif;

    config.settings.validate()?;
    Ok(config)
}

/// What a finished run hands to the viewer
struct RunOutput {
    /// The configuration as run, seed included
    config: RunConfig,
    summary: RunSummary,
    lattice: Lattice,
}

/// Optionally save the user config, then grow the cluster and write the run
/// directory. The user config is saved before the seed is pinned.
fn execute(mut config: RunConfig, save_config_to: Option<&Path>) -> Result<RunOutput> {
    if let Some(path) = save_config_to {
        config.save_to_file(path)?;
        info!("saved config to {}", path.display());
    }

    let run_name = config.settings.run_name.clone();
    let mut sink = RunDirectory::create(
        &config.output.base_dir,
        &run_name,
        config.output.replace_existing,
    )?
    .with_image(config.output.write_image)
    .with_animation(config.output.write_animation);
    info!("writing results to {}", sink.path().display());

    let source = match config.seed {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::from_entropy(),
    };
    info!("seeding random walk with {}", source.seed());
    config.seed = Some(source.seed());

    let mut engine = AggregationEngine::new(config.settings.length, source)?;
    let summary = engine.run()?;
    let lattice = engine.into_lattice();

    config.save_to_file(&sink.file_for(&run_name, "config.json"))?;
    sink.save(&RunRecord {
        run_name: &run_name,
        summary: &summary,
        lattice: &lattice,
    })?;

    Ok(RunOutput {
        config,
        summary,
        lattice,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let save_path = if args.save_config {
        Some(RunConfig::default_path().context("no config directory on this platform")?)
    } else {
        None
    };
    let output = execute(config, save_path.as_deref())?;

    if args.view {
        let run_name = output.config.settings.run_name.clone();
        let mut app = App::new(run_name, output.summary, output.lattice);
        run_viewer(&mut app)?;
    }

    Ok(())
}

/// Show the finished cluster until the user quits
fn run_viewer(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal viewer failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit()
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
