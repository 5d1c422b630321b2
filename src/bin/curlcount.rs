//! curlcount - Command-line interface for the curl counter
//!
//! Commands:
//! - count: Count repetitions in recorded landmark frames (batch mode)
//! - run: Count repetitions from landmark frames on stdin (streaming mode)
//! - validate: Validate landmark frames against the schema and the tracked joints
//! - config: Print a preset exercise configuration
//! - doctor: Diagnose installation and configuration

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use curl_counter::encoder::{snapshots_to_ndjson, SessionEncoder, REPORT_VERSION};
use curl_counter::rehearsal::rehearse_curls;
use curl_counter::schema::{LandmarkAdapter, LandmarkFrame, SCHEMA_VERSION};
use curl_counter::types::FrameSnapshot;
use curl_counter::{CounterError, CurlSession, ExerciseConfig, Side};
use curl_counter::{COUNTER_VERSION, PRODUCER_NAME};

/// curlcount - Pose-driven repetition counter
#[derive(Parser)]
#[command(name = "curlcount")]
#[command(version = COUNTER_VERSION)]
#[command(about = "Count bicep curl repetitions from pose landmarks", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count repetitions in recorded landmark frames (batch mode)
    Count {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Exercise configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Arm to track when no configuration file is given
        #[arg(long, default_value = "right")]
        side: SideArg,

        /// Emit only the session report instead of per-frame snapshots
        #[arg(long)]
        summary: bool,
    },

    /// Count repetitions from landmark frames on stdin (streaming mode)
    Run {
        /// Exercise configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Arm to track when no configuration file is given
        #[arg(long, default_value = "right")]
        side: SideArg,

        /// Flush output after each frame (`--flush false` to buffer)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        flush: bool,
    },

    /// Validate landmark frames against the schema and the tracked joints
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Exercise configuration whose joints must be present
        #[arg(long)]
        config: Option<PathBuf>,

        /// Arm to check when no configuration file is given
        #[arg(long, default_value = "right")]
        side: SideArg,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a preset exercise configuration
    Config {
        /// Arm to track
        #[arg(long, default_value = "right")]
        side: SideArg,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Diagnose installation and configuration
    Doctor {
        /// Check an exercise configuration file (both presets otherwise)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
    /// JSON array of frames
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Left => Side::Left,
            SideArg::Right => Side::Right,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CurlCliError> {
    match cli.command {
        Commands::Count {
            input,
            output,
            input_format,
            output_format,
            config,
            side,
            summary,
        } => cmd_count(
            &input,
            &output,
            input_format,
            output_format,
            load_config(config.as_deref(), side)?,
            summary,
        ),

        Commands::Run { config, side, flush } => {
            cmd_run(load_config(config.as_deref(), side)?, flush)
        }

        Commands::Validate {
            input,
            input_format,
            config,
            side,
            json,
        } => cmd_validate(
            &input,
            input_format,
            &load_config(config.as_deref(), side)?,
            json,
        ),

        Commands::Config { side, output } => cmd_config(side, output.as_deref()),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn load_config(path: Option<&Path>, side: SideArg) -> Result<ExerciseConfig, CurlCliError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading exercise config");
            Ok(ExerciseConfig::load(path)?)
        }
        None => Ok(ExerciseConfig::bicep_curl(side.into())),
    }
}

fn read_input(input: &Path) -> Result<String, CurlCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_frames(data: &str, format: InputFormat) -> Result<Vec<LandmarkFrame>, CurlCliError> {
    let frames = match format {
        InputFormat::Ndjson => LandmarkAdapter::parse_ndjson(data)?,
        InputFormat::Json => LandmarkAdapter::parse_array(data)?,
    };
    Ok(frames)
}

fn cmd_count(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: ExerciseConfig,
    summary: bool,
) -> Result<(), CurlCliError> {
    let data = read_input(input)?;
    let mut session = CurlSession::new(config)?;
    let snapshots = match input_format {
        InputFormat::Ndjson => session.run_ndjson(&data),
        InputFormat::Json => session.run_frames(&LandmarkAdapter::parse_array(&data)?),
    };

    if snapshots.is_empty() {
        return Err(CurlCliError::NoFrames);
    }

    info!(
        frames = snapshots.len(),
        dropped = session.summary().frames_dropped,
        reps = session.rep_count(),
        "Counting finished"
    );

    let output_data = if summary {
        let encoder = SessionEncoder::new();
        match output_format {
            OutputFormat::Ndjson | OutputFormat::Json => {
                encoder.encode_to_json(&session.summary(), &[])? + "\n"
            }
            OutputFormat::JsonPretty => {
                encoder.encode_to_json_pretty(&session.summary(), &[])? + "\n"
            }
        }
    } else {
        format_snapshots(&snapshots, &output_format)?
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(config: ExerciseConfig, flush: bool) -> Result<(), CurlCliError> {
    let mut session = CurlSession::new(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if atty::is(atty::Stream::Stdin) {
        warn!("Reading landmark frames from a terminal; pipe NDJSON into 'curlcount run'");
    }

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let snapshot = session.process_line(&line);

        writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    let report = SessionEncoder::new().encode_to_json(&session.summary(), &[])?;
    writeln!(stdout, "{}", report)?;
    stdout.flush()?;

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    config: &ExerciseConfig,
    json: bool,
) -> Result<(), CurlCliError> {
    let frames = parse_frames(&read_input(input)?, input_format)?;
    let report = validation_report(&frames, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}: {} frames for '{}', {} invalid, {} without a person, {} missing {}",
            report.schema,
            report.total_frames,
            report.exercise,
            report.invalid_frames,
            report.frames_without_detection,
            report.frames_missing_joints,
            report.joints.join("/"),
        );
        for err in &report.errors {
            let frame = err
                .frame_index
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  line {} frame {}: {}", err.index + 1, frame, err.error);
        }
    }

    if report.invalid_frames > 0 {
        Err(CurlCliError::ValidationFailed(report.invalid_frames))
    } else {
        Ok(())
    }
}

/// Schema errors plus how many frames could never reach the counter
fn validation_report(frames: &[LandmarkFrame], config: &ExerciseConfig) -> ValidationReport {
    let results = LandmarkAdapter::validate_frames(frames);
    let joints = config.joints.joints();

    let valid = frames
        .iter()
        .enumerate()
        .filter(|(i, _)| !results.iter().any(|r| r.index == *i))
        .map(|(_, frame)| frame);
    let (mut frames_without_detection, mut frames_missing_joints) = (0, 0);
    for frame in valid {
        if !frame.has_detection() {
            frames_without_detection += 1;
        } else if !joints
            .iter()
            .all(|id| frame.landmarks.iter().any(|l| l.joint == *id))
        {
            frames_missing_joints += 1;
        }
    }

    ValidationReport {
        schema: SCHEMA_VERSION.to_string(),
        exercise: config.name.clone(),
        joints: joints.iter().map(|id| id.to_string()).collect(),
        total_frames: frames.len(),
        invalid_frames: results.len(),
        frames_without_detection,
        frames_missing_joints,
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                frame_index: r.frame_index,
                error: r.result.as_ref().map(|e| e.to_string()).unwrap_or_default(),
            })
            .collect(),
    }
}

fn cmd_config(side: SideArg, output: Option<&Path>) -> Result<(), CurlCliError> {
    let config = ExerciseConfig::bicep_curl(side.into());
    match output {
        Some(path) => config.save(path)?,
        None => println!("{}", config.to_json()?),
    }
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), CurlCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "counter_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("curl-counter version {}", COUNTER_VERSION),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Input schema: {}, report: {}", SCHEMA_VERSION, REPORT_VERSION),
    });

    match config {
        Some(config_path) => match ExerciseConfig::load(config_path) {
            Ok(loaded) => {
                checks.push(DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config '{}' valid (angles {}-{}, joints {}/{}/{})",
                        loaded.name,
                        loaded.calibration.angle_min,
                        loaded.calibration.angle_max,
                        loaded.joints.first,
                        loaded.joints.vertex,
                        loaded.joints.last
                    ),
                });
                checks.push(rehearsal_check("rehearsal", &loaded));
            }
            Err(e) => checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid config: {}", e),
            }),
        },
        None => {
            for side in [Side::Right, Side::Left] {
                let name = format!("rehearsal_{}", side.as_str());
                checks.push(rehearsal_check(&name, &ExerciseConfig::bicep_curl(side)));
            }
        }
    }

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: COUNTER_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("curlcount Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CurlCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

const REHEARSAL_CURLS: u32 = 2;

/// Scripted curls through `config`: every curl must count and the percent must span the bar
fn rehearsal_check(name: &str, config: &ExerciseConfig) -> DoctorCheck {
    let (status, message) = match rehearse_curls(config, REHEARSAL_CURLS) {
        Ok(r) if !r.is_applicable() => (
            CheckStatus::Warning,
            format!(
                "joints {}/{}/{} are not arm joints, skipped",
                config.joints.first, config.joints.vertex, config.joints.last
            ),
        ),
        Ok(r) => {
            let lo = r.percent_min.unwrap_or(0.0);
            let hi = r.percent_max.unwrap_or(0.0);
            if r.counts_every_curl() {
                (
                    CheckStatus::Ok,
                    format!(
                        "counted {}/{} rehearsal curls, percent {:.0}-{:.0}",
                        r.rep_count, r.curls, lo, hi
                    ),
                )
            } else {
                (
                    CheckStatus::Error,
                    format!(
                        "counted {}/{} rehearsal curls; percent stays within {:.0}-{:.0}, check joint order and calibration",
                        r.rep_count, r.curls, lo, hi
                    ),
                )
            }
        }
        Err(e) => (CheckStatus::Error, e.to_string()),
    };

    DoctorCheck {
        name: name.to_string(),
        status,
        message,
    }
}

fn format_snapshots(
    snapshots: &[FrameSnapshot],
    format: &OutputFormat,
) -> Result<String, CurlCliError> {
    match format {
        OutputFormat::Ndjson => Ok(snapshots_to_ndjson(snapshots)?),
        OutputFormat::Json => Ok(serde_json::to_string(snapshots)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(snapshots)? + "\n"),
    }
}

// Error types

#[derive(Debug)]
enum CurlCliError {
    Io(io::Error),
    Counter(CounterError),
    Json(serde_json::Error),
    NoFrames,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for CurlCliError {
    fn from(e: io::Error) -> Self {
        CurlCliError::Io(e)
    }
}

impl From<CounterError> for CurlCliError {
    fn from(e: CounterError) -> Self {
        CurlCliError::Counter(e)
    }
}

impl From<serde_json::Error> for CurlCliError {
    fn from(e: serde_json::Error) -> Self {
        CurlCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CurlCliError> for CliError {
    fn from(e: CurlCliError) -> Self {
        match e {
            CurlCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CurlCliError::Counter(e) => counter_error(e),
            CurlCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CurlCliError::NoFrames => CliError {
                code: "NO_FRAMES".to_string(),
                message: "No landmark frames found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CurlCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} frames failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            CurlCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn counter_error(e: CounterError) -> CliError {
    let (code, hint) = match &e {
        CounterError::InvalidCalibration(_)
        | CounterError::InvalidThresholds(_)
        | CounterError::InvalidConfig(_) => (
            "CONFIG_ERROR",
            "Run 'curlcount config' for a working configuration",
        ),
        CounterError::ParseError(_) | CounterError::JsonError(_) => (
            "PARSE_ERROR",
            "Ensure input matches pose.landmark_frame.v1 schema",
        ),
        CounterError::InvalidFrame(_) => {
            ("VALIDATION_ERROR", "Run 'curlcount validate' for details")
        }
        CounterError::Io(_) => ("IO_ERROR", "Check file paths and permissions"),
    };
    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint.to_string()),
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    schema: String,
    exercise: String,
    joints: Vec<String>,
    total_frames: usize,
    invalid_frames: usize,
    frames_without_detection: usize,
    /// Valid frames lacking one of the configured joints
    frames_missing_joints: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    frame_index: Option<u64>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
