//! Occupancy analytics entry point: CLI wiring, record loading and reporting.

mod cli;

use std::process;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use occupancy_analytics::analytics::report::SpaceReport;
use occupancy_analytics::config::AnalyticsConfig;
use occupancy_analytics::io::export::{export_forecast_csv, export_series_csv};
use occupancy_analytics::io::import::read_records_file;
use occupancy_analytics::space::SpaceInfo;
use occupancy_analytics::store::RecordStore;
use occupancy_analytics::synthetic::generate_history;

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });

    // --config takes priority, then --preset, then the baseline default
    let mut config = if let Some(ref path) = opts.config {
        AnalyticsConfig::from_toml_file(path).unwrap_or_else(|e| exit_with(e))
    } else if let Some(ref name) = opts.preset {
        AnalyticsConfig::from_preset(name).unwrap_or_else(|e| exit_with(e))
    } else {
        AnalyticsConfig::baseline()
    };

    if let Some(w) = opts.window_size {
        config.analysis.window_size = w;
    }
    if opts.remove_outliers {
        config.analysis.remove_outliers = true;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let now = opts.now.unwrap_or_else(Utc::now);

    let records = match opts.records {
        Some(ref path) => read_records_file(path).unwrap_or_else(|e| exit_with(e)),
        None => {
            let records: Vec<_> = config
                .spaces
                .iter()
                .flat_map(|space| {
                    generate_history(space, &config.synthetic, now)
                        .into_iter()
                        .map(|rec| (space.id, rec))
                })
                .collect();
            info!(
                records = records.len(),
                days = config.synthetic.days,
                "synthetic history generated"
            );
            records
        }
    };

    let store = RecordStore::new(config.spaces.clone(), records);

    let selected: Vec<&SpaceInfo> = match opts.space {
        Some(id) => vec![store.space(id).unwrap_or_else(|e| exit_with(e))],
        None => store.spaces().collect(),
    };

    for space in selected {
        let set = store.records(space.id).unwrap_or_else(|e| exit_with(e));
        let report = SpaceReport::build(space, &set, config.analysis, now)
            .unwrap_or_else(|e| exit_with(e));
        println!("{report}");

        if let Some(ref path) = opts.series_out {
            let points = report.history.points().unwrap_or_default();
            if points.is_empty() {
                warn!(space_id = space.id, "history has no data; writing header only");
            }
            if let Err(e) = export_series_csv(points, path) {
                exit_with(format_args!("failed to write series CSV: {e}"));
            }
            eprintln!("History series written to {}", path.display());
        }
        if let Some(ref path) = opts.forecast_out {
            if let Err(e) = export_forecast_csv(&report.forecast.points, path) {
                exit_with(format_args!("failed to write forecast CSV: {e}"));
            }
            eprintln!("Forecast written to {}", path.display());
        }
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if opts.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let port = opts.port.unwrap_or(config.server.port);
        let state = Arc::new(occupancy_analytics::api::AppState { store });
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| exit_with(format_args!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(occupancy_analytics::api::serve(state, addr)) {
            exit_with(format_args!("API server failed: {e}"));
        }
    }
}
