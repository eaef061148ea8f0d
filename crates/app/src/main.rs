use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::{ImportMode, TrainingMode};
use services::{Clock, QuestionStore};
use storage::FileStore;
use storage::KeyValueStore;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod terminal;

const DEFAULT_DATA_PATH: &str = "quiz-data.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidQuota { raw: String },
    InvalidDataPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(
                f,
                "invalid --mode value: {raw} (expected normal, memorize or wrong_only)"
            ),
            ArgsError::InvalidQuota { raw } => write!(f, "invalid --quota value: {raw}"),
            ArgsError::InvalidDataPath { raw } => write!(f, "invalid --data value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--data <path>] [--import <file> [--append]] [--mode <mode>] [--quota <bytes>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data {DEFAULT_DATA_PATH}");
    eprintln!("  --quota 5242880");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DATA_PATH, QUIZ_MODE, QUIZ_QUOTA_BYTES, QUIZ_LOG (log filter, default warn)");
}

#[derive(Debug)]
struct Args {
    data_path: PathBuf,
    import: Option<PathBuf>,
    import_mode: ImportMode,
    mode: Option<TrainingMode>,
    quota: Option<usize>,
}

fn parse_mode(raw: String) -> Result<TrainingMode, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidMode { raw })
}

fn parse_quota(raw: String) -> Result<usize, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidQuota { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_path = std::env::var("QUIZ_DATA_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from);
        let mut mode = std::env::var("QUIZ_MODE").ok().map(parse_mode).transpose()?;
        let mut quota = std::env::var("QUIZ_QUOTA_BYTES")
            .ok()
            .map(parse_quota)
            .transpose()?;
        let mut import = None;
        let mut import_mode = ImportMode::Replace;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    let value = require_value(args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataPath { raw: value });
                    }
                    data_path = PathBuf::from(value);
                }
                "--import" => import = Some(PathBuf::from(require_value(args, "--import")?)),
                "--append" => import_mode = ImportMode::Append,
                "--mode" => mode = Some(parse_mode(require_value(args, "--mode")?)?),
                "--quota" => quota = Some(parse_quota(require_value(args, "--quota")?)?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_path,
            import,
            import_mode,
            mode,
            quota,
        })
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            log_fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut file_store = FileStore::open(&args.data_path)?;
    if let Some(quota) = args.quota {
        file_store = file_store.with_quota(quota);
    }
    let kv: Arc<dyn KeyValueStore> = Arc::new(file_store);
    tracing::info!(path = %args.data_path.display(), "using quiz data file");

    let mut store = QuestionStore::load(kv, Clock::default_clock());

    if let Some(path) = &args.import {
        let text = std::fs::read_to_string(path)?;
        store.import_json(&text, args.import_mode)?;
    }
    if let Some(mode) = args.mode {
        store.set_training_mode(mode);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    terminal::Terminal::new(&mut store).run(stdin.lock(), stdout.lock())?;
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
