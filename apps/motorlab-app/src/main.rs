//! motorlab DC motor modeling CLI.
//!
//! Provides three modes of operation:
//! - `build`: Print the transfer function and state-space model of a motor
//! - `step`: Simulate and print the open-loop step response
//! - `presets`: List the built-in motor parameter sets

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use motorlab_model::prelude::*;
use serde::Serialize;
use tracing::{Level, debug, info};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Build transfer-function and state-space models of a DC motor.
#[derive(Parser, Debug)]
#[command(name = "motorlab", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print both model representations, poles and DC gain.
    Build {
        #[command(flatten)]
        motor: MotorArgs,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Simulate the open-loop response to a voltage step.
    Step {
        #[command(flatten)]
        motor: MotorArgs,

        /// Simulated time span (s).
        #[arg(long)]
        duration: Option<f64>,

        /// Sample period (s).
        #[arg(long)]
        dt: Option<f64>,

        /// Step height (V).
        #[arg(long)]
        amplitude: Option<f64>,

        /// Number of table rows to print (evenly spaced).
        #[arg(long, default_value_t = 20)]
        rows: usize,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List built-in parameter sets.
    Presets,
}

/// Where the motor constants come from.  Individual flags override the
/// config file or preset.
#[derive(Args, Debug, Default)]
struct MotorArgs {
    /// TOML file with a [motor] table and optional [simulation] table.
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in parameter set (speed, position).
    #[arg(short, long)]
    preset: Option<String>,

    /// Rotor inertia J (kg·m²).
    #[arg(short = 'J', long, allow_negative_numbers = true)]
    inertia: Option<f64>,

    /// Viscous friction b (N·m·s).
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    damping: Option<f64>,

    /// Torque / back-EMF constant K.
    #[arg(short = 'K', long, allow_negative_numbers = true)]
    motor_constant: Option<f64>,

    /// Armature resistance R (Ω).
    #[arg(short = 'R', long, allow_negative_numbers = true)]
    resistance: Option<f64>,

    /// Armature inductance L (H).
    #[arg(short = 'L', long, allow_negative_numbers = true)]
    inductance: Option<f64>,
}

impl MotorArgs {
    /// Resolve file/preset/defaults, apply overrides, validate.
    fn resolve(&self) -> Result<MotorConfig, MotorError> {
        let mut config = match (&self.config, &self.preset) {
            (Some(path), _) => {
                info!(path = %path.display(), "loading motor config");
                MotorConfig::from_file(path)?
            }
            (None, Some(name)) => MotorConfig {
                motor: presets::by_name(name)?,
                ..MotorConfig::default()
            },
            (None, None) => MotorConfig::default(),
        };

        let mut builder = MotorModelBuilder::from_parameters(&config.motor);
        if let Some(v) = self.inertia {
            builder = builder.with_inertia(v);
        }
        if let Some(v) = self.damping {
            builder = builder.with_damping(v);
        }
        if let Some(v) = self.motor_constant {
            builder = builder.with_motor_constant(v);
        }
        if let Some(v) = self.resistance {
            builder = builder.with_resistance(v);
        }
        if let Some(v) = self.inductance {
            builder = builder.with_inductance(v);
        }
        config.motor = builder.parameters()?;
        debug!(?config, "resolved motor config");
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// JSON reports
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BuildReport<'a> {
    model: &'a MotorModel,
    /// `[re, im]` pairs.
    poles: Vec<[f64; 2]>,
    dc_gain: Option<f64>,
}

#[derive(Serialize)]
struct StepReport<'a> {
    response: &'a StepResponse,
    metrics: Option<StepMetrics>,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_build(motor: &MotorArgs, json: bool) -> Result<(), MotorError> {
    let config = motor.resolve()?;
    let model = MotorModel::from_parameters(config.motor);
    let tf = model.transfer_function();
    let poles = tf.poles()?;

    if json {
        let report = BuildReport {
            model: &model,
            poles: poles.iter().map(|z| [z.re, z.im]).collect(),
            dc_gain: tf.dc_gain(),
        };
        print_json(&report);
        return Ok(());
    }

    print_parameters(model.parameters());
    println!();
    println!("Transfer function  ω(s)/V(s):");
    println!("{tf}");
    println!();
    println!("State-space model  x = [ω, i], u = V, y = ω:");
    println!("{}", model.state_space());
    println!();
    println!("Poles:");
    for z in &poles {
        println!("  {}", format_complex(*z));
    }
    match tf.dc_gain() {
        Some(g) => println!("DC gain: {g:.6} (rad/s)/V"),
        None => println!("DC gain: unbounded"),
    }
    Ok(())
}

fn run_step(
    motor: &MotorArgs,
    duration: Option<f64>,
    dt: Option<f64>,
    amplitude: Option<f64>,
    rows: usize,
    json: bool,
) -> Result<(), MotorError> {
    let mut config = motor.resolve()?;
    if let Some(v) = duration {
        config.simulation.duration = v;
    }
    if let Some(v) = dt {
        config.simulation.dt = v;
    }
    if let Some(v) = amplitude {
        config.simulation.amplitude = v;
    }
    config.validate()?;

    let ss = build_state_space(&config.motor);
    let response = ss.step_response_with(&config.simulation)?;
    let metrics = response.metrics();
    info!(samples = response.len(), "step response complete");

    if json {
        print_json(&StepReport {
            response: &response,
            metrics,
        });
        return Ok(());
    }

    print_parameters(&config.motor);
    println!(
        "Step: {} V for {} s, dt = {} s",
        config.simulation.amplitude, config.simulation.duration, config.simulation.dt
    );
    println!();
    println!("{:>10} {:>14} {:>14}", "t (s)", "ω (rad/s)", "i (A)");
    println!("{:-<10} {:-<14} {:-<14}", "", "", "");
    for k in table_rows(response.len(), rows) {
        println!(
            "{:>10.4} {:>14.6} {:>14.6}",
            response.time[k], response.output[k], response.states[k][1]
        );
    }
    println!();

    match metrics {
        Some(m) => {
            println!("Final value:   {:.6} rad/s", m.final_value);
            println!("Peak:          {:.6} rad/s at {:.4} s", m.peak, m.peak_time);
            println!("Overshoot:     {:.3} %", m.overshoot);
            println!("Rise time:     {}", format_time(m.rise_time));
            println!("Settling time: {}", format_time(m.settling_time));
        }
        None => println!("No steady state to characterize (zero or unbounded DC gain)."),
    }
    Ok(())
}

/// Evenly spaced sample indices for the step table, always ending on the
/// last sample so the settled value is shown.
fn table_rows(len: usize, rows: usize) -> Vec<usize> {
    let Some(last) = len.checked_sub(1) else {
        return Vec::new();
    };
    let stride = (len / rows.max(1)).max(1);
    let mut indices: Vec<usize> = (0..last).step_by(stride).collect();
    indices.push(last);
    indices
}

fn run_presets() {
    for name in presets::NAMES {
        if let Ok(p) = presets::by_name(name) {
            println!("{name}:");
            println!(
                "  J={:e} b={:e} K={:e} R={:e} L={:e}",
                p.inertia(),
                p.damping(),
                p.motor_constant(),
                p.resistance(),
                p.inductance()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

fn print_parameters(p: &PhysicalParameters) {
    println!(
        "Motor: J={} kg·m², b={} N·m·s, K={}, R={} Ω, L={} H",
        p.inertia(),
        p.damping(),
        p.motor_constant(),
        p.resistance(),
        p.inductance()
    );
    println!(
        "Time constants: mechanical J/b = {}, electrical L/R = {}",
        format_time(p.mechanical_time_constant()),
        format_time(p.electrical_time_constant())
    );
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}

fn format_complex(z: Complex<f64>) -> String {
    if z.im == 0.0 {
        format!("{:.6}", z.re)
    } else {
        let sign = if z.im < 0.0 { '-' } else { '+' };
        format!("{:.6} {sign} {:.6}j", z.re, z.im.abs())
    }
}

fn format_time(t: Option<f64>) -> String {
    t.map_or_else(|| "n/a".to_owned(), |t| format!("{t:.4} s"))
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to init logging. {e}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Build { motor, json } => run_build(motor, *json),
        Commands::Step {
            motor,
            duration,
            dt,
            amplitude,
            rows,
            json,
        } => run_step(motor, *duration, *dt, *amplitude, *rows, *json),
        Commands::Presets => {
            run_presets();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
