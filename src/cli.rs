use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub records: Option<PathBuf>,
    pub space: Option<u32>,
    pub window_size: Option<usize>,
    pub remove_outliers: bool,
    pub now: Option<DateTime<Utc>>,
    pub series_out: Option<PathBuf>,
    pub forecast_out: Option<PathBuf>,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--records" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --records (expected a CSV path)")?;
                opts.records = Some(PathBuf::from(path));
            }
            "--space" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --space (expected a space id)")?;
                let id = raw
                    .parse::<u32>()
                    .map_err(|_| format!("--space value \"{raw}\" is not a valid space id"))?;
                opts.space = Some(id);
            }
            "--window-size" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --window-size")?;
                let w = raw
                    .parse::<usize>()
                    .map_err(|_| format!("--window-size value \"{raw}\" is not an integer"))?;
                if w == 0 {
                    return Err("--window-size must be at least 1".to_string());
                }
                opts.window_size = Some(w);
            }
            "--remove-outliers" => opts.remove_outliers = true,
            "--now" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --now (expected RFC 3339)")?;
                let now = DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| format!("--now value \"{raw}\" is not RFC 3339: {e}"))?;
                opts.now = Some(now.with_timezone(&Utc));
            }
            "--series-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --series-out (expected a path)")?;
                opts.series_out = Some(PathBuf::from(path));
            }
            "--forecast-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --forecast-out (expected a path)")?;
                opts.forecast_out = Some(PathBuf::from(path));
            }
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    // Exports cover a single space.
    if (opts.series_out.is_some() || opts.forecast_out.is_some()) && opts.space.is_none() {
        return Err("--series-out and --forecast-out require --space".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("occupancy-analytics: history, correlation and forecasts for shared spaces");
    eprintln!();
    eprintln!("Usage: occupancy-analytics [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, smoothed)");
    eprintln!("  --records <path>         Read records from CSV instead of generating them");
    eprintln!("  --space <id>             Report on a single space");
    eprintln!("  --window-size <n>        Smoothing window in records (>= 1)");
    eprintln!("  --remove-outliers        Drop records with |z| >= 2 before smoothing");
    eprintln!("  --now <rfc3339>          Reference instant for the forecast");
    eprintln!("  --series-out <path>      Export the history series to CSV (needs --space)");
    eprintln!("  --forecast-out <path>    Export the forecast to CSV (needs --space)");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the REST API after reporting");
        eprintln!("  --port <u16>             API server port (default from config)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If neither --config nor --preset is given, the baseline preset is used.");
}
