//! # C300 Panel
//!
//! Headless front end for the simulated C300 manipulator panel.
//!
//! The controller runs on virtual time; this binary advances that clock
//! from the wall clock, so steps and moves happen in real time. The
//! controller is shared between the timer loop, the Ctrl-C handler and the
//! stdin reader through one `parking_lot::Mutex`.

use c300_common::config::{ConfigError, LogLevel};
use c300_common::panel::axis::Axis;
use c300_common::panel::state::{ExecutionMode, OperationMode, RunState};
use c300_panel::config::PanelConfig;
use c300_panel::controller::{Collaborators, PanelController};
use c300_panel::notify::TracingNotifier;
use c300_panel::scheduler::TimerQueue;
use c300_panel::state::executor::LogLineHandler;
use c300_panel::store::{ProgramSource, TextProgram, TomlIoStore, TomlPositionStore};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

type Panel = PanelController;

/// Wall-clock polling period of the timer loop.
const TICK: Duration = Duration::from_millis(10);

/// C300 Panel: simulated four-axis manipulator control panel
#[derive(Parser, Debug)]
#[command(name = "c300_panel")]
#[command(version)]
#[command(about = "Jog, move and run programs on a simulated four-axis manipulator")]
struct Args {
    /// Path to the panel configuration (panel.toml).
    #[arg(short, long, default_value = "config/panel.toml")]
    config: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program file in automatic mode.
    Run {
        program: PathBuf,

        /// Pause after every line; press Enter to continue.
        #[arg(long)]
        single_step: bool,
    },
    /// Move to a stored position.
    MoveTo { name: String },
    /// Move to typed coordinates.
    Goto {
        #[arg(allow_hyphen_values = true)]
        x: String,
        #[arg(allow_hyphen_values = true)]
        y: String,
        #[arg(allow_hyphen_values = true)]
        z: String,
        #[arg(allow_hyphen_values = true)]
        c: String,
    },
    /// Append lines to a program file, creating it if missing.
    Write {
        program: PathBuf,
        lines: Vec<String>,

        /// Save to this file instead and keep the original untouched.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the panel status as JSON.
    Status,
    /// List stored positions.
    Positions,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args.config);
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("C300 Panel v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

/// Load `panel.toml`; a missing file means defaults next to it.
fn load_config(path: &Path) -> Result<PanelConfig, ConfigError> {
    match PanelConfig::load_from(path) {
        Err(ConfigError::FileNotFound) => {
            let mut config = PanelConfig::default();
            if let Some(dir) = path.parent() {
                config.resolve_storage(dir);
            }
            Ok(config)
        }
        other => other,
    }
}

fn run(args: &Args, config: PanelConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, step_interval={}ms, positions={}, io={}",
        config.shared.service_name,
        config.program.step_interval_ms,
        config.storage.positions.display(),
        config.storage.io.display(),
    );

    let program = match &args.command {
        Command::Write {
            program,
            lines,
            output,
        } => return write_program(program, lines, output.as_deref()),
        Command::Run { program, .. } => TextProgram::open(program)?,
        _ => TextProgram::from_text(""),
    };
    let collaborators = Collaborators {
        program: Box::new(program),
        io: Box::new(TomlIoStore::new(&config.storage.io)),
        positions: Box::new(TomlPositionStore::new(&config.storage.positions)),
        line_handler: Box::new(LogLineHandler),
    };
    let panel = PanelController::new(
        &config,
        collaborators,
        &mut rand::thread_rng(),
        TimerQueue::new(),
        TracingNotifier,
    );
    let panel = Arc::new(Mutex::new(panel));

    match &args.command {
        Command::Run { single_step, .. } => run_program(&panel, *single_step),
        Command::MoveTo { name } => {
            let started = panel.lock().move_to_position(name);
            started?;
            drive(&panel, |p| !p.is_moving());
            print_coordinates(&panel.lock());
            Ok(())
        }
        Command::Goto { x, y, z, c } => {
            let started = panel.lock().move_to_values([x.as_str(), y.as_str(), z.as_str(), c.as_str()]);
            started?;
            drive(&panel, |p| !p.is_moving());
            print_coordinates(&panel.lock());
            Ok(())
        }
        Command::Write { .. } => Ok(()),
        Command::Status => {
            println!("{}", serde_json::to_string_pretty(&panel.lock().status())?);
            Ok(())
        }
        Command::Positions => {
            for position in panel.lock().positions() {
                println!("{:<16} {}", position.name, position.coords);
            }
            Ok(())
        }
    }
}

fn run_program(panel: &Arc<Mutex<Panel>>, single_step: bool) -> Result<(), Box<dyn std::error::Error>> {
    {
        let mut p = panel.lock();
        if p.modes().operation != OperationMode::Auto {
            p.toggle_operation_mode()?;
        }
        if single_step && p.modes().execution != ExecutionMode::SingleStep {
            p.toggle_execution_mode()?;
        }
    }

    let stopper = Arc::clone(panel);
    ctrlc::set_handler(move || {
        info!("Received stop signal");
        if let Err(e) = stopper.lock().stop() {
            warn!("stop rejected: {e}");
        }
    })?;

    let started = panel.lock().start();
    started?;

    if single_step {
        let resumer = Arc::clone(panel);
        thread::spawn(move || resume_on_enter(&resumer, std::io::stdin().lock()));
    }

    drive(panel, |p| p.run_state().is_stopped());
    info!("Program run complete");
    Ok(())
}

/// Resume a single-step run on every input line. When the input ends the
/// run is stopped, since nothing can resume it any more.
fn resume_on_enter(panel: &Mutex<Panel>, input: impl BufRead) {
    for line in input.lines() {
        if let Err(e) = line {
            warn!("stdin read failed: {e}");
            break;
        }
        let mut p = panel.lock();
        match p.run_state() {
            RunState::Stopped => return,
            RunState::SingleStepPaused => {
                if let Err(e) = p.start() {
                    debug!("resume rejected: {e}");
                }
            }
            other => debug!("Enter ignored while {}", other.label()),
        }
    }
    let mut p = panel.lock();
    if !p.run_state().is_stopped() {
        info!("stdin closed, stopping program");
        if let Err(e) = p.stop() {
            warn!("stop rejected: {e}");
        }
    }
}

fn write_program(
    path: &Path,
    lines: &[String],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut program = if path.exists() {
        TextProgram::open(path)?
    } else {
        TextProgram::from_text("")
    };
    for line in lines {
        program.append_line(line);
    }
    match output {
        Some(target) => program.save_as(target)?,
        None if program.path().is_some() => {
            program.save()?;
        }
        None => program.save_as(path)?,
    }
    info!(lines = program.load()?.len(), "program written");
    Ok(())
}

/// Advance the virtual clock with the wall clock until `done` holds.
fn drive(panel: &Mutex<Panel>, done: impl Fn(&Panel) -> bool) {
    let epoch = Instant::now();
    let offset = panel.lock().now();
    loop {
        {
            let mut p = panel.lock();
            p.advance_to(offset + epoch.elapsed());
            if done(&p) {
                return;
            }
        }
        thread::sleep(TICK);
    }
}

fn print_coordinates(panel: &Panel) {
    let coords = panel.coordinates();
    for axis in Axis::ALL {
        println!("{axis}: {}", coords.format_axis(axis));
    }
}

fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        match configured {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
