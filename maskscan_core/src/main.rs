use std::{process::ExitCode, time::Duration};

use clap::{Parser, ValueEnum};
use log::{LevelFilter, error, info, warn};
use stopwatch::Stopwatch;

use maskscan_core::{
    Backend, FilterParams, OwnedColumns,
    configuration::Configuration,
    core::{
        column_file::{read_column_file, write_column_file},
        date::{format_date, parse_date},
        generate::generate_lineitem,
        kernel::filter_with_backend,
        mask::{count_selected, selectivity},
        params::{TPCH_Q6_MAX_DISCOUNT, TPCH_Q6_MAX_QUANTITY, TPCH_Q6_MIN_DISCOUNT},
    },
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    /// Best backend the CPU supports.
    Auto,
    /// Portable branchless loop.
    Scalar,
    /// AVX2 intrinsics (x86_64 only).
    Avx2,
    /// AVX-512F intrinsics (x86_64 only).
    Avx512,
}

impl BackendArg {
    fn resolve(self) -> Backend {
        match self {
            BackendArg::Auto => Backend::detect(),
            BackendArg::Scalar => Backend::Scalar,
            BackendArg::Avx2 => Backend::Avx2,
            BackendArg::Avx512 => Backend::Avx512,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "maskscan_core", version, about = "Branchless lineitem filter scan")]
struct Args {
    /// Rows to generate when no input file is given (default: 6000000)
    #[arg(long, default_value_t = 6_000_000)]
    rows: usize,

    /// Seed for generated rows (default: 1)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Column file to scan instead of generated rows
    #[arg(long, value_name = "PATH")]
    input: Option<String>,

    /// Save the scanned columns to this column file
    #[arg(long, value_name = "PATH")]
    write: Option<String>,

    /// Inclusive lower ship date, YYYY-MM-DD
    #[arg(long = "min-date", default_value = "1994-01-01")]
    min_date: String,

    /// Exclusive upper ship date, YYYY-MM-DD
    #[arg(long = "max-date", default_value = "1995-01-01")]
    max_date: String,

    /// Inclusive lower discount (percent)
    #[arg(long = "min-discount", default_value_t = TPCH_Q6_MIN_DISCOUNT, allow_negative_numbers = true)]
    min_discount: i64,

    /// Exclusive upper discount (percent)
    #[arg(long = "max-discount", default_value_t = TPCH_Q6_MAX_DISCOUNT, allow_negative_numbers = true)]
    max_discount: i64,

    /// Exclusive upper quantity (scaled by 100)
    #[arg(long = "max-quantity", default_value_t = TPCH_Q6_MAX_QUANTITY, allow_negative_numbers = true)]
    max_quantity: i64,

    /// Kernel backend
    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    backend: BackendArg,

    /// Split the scan into row ranges across threads
    #[arg(long)]
    parallel: bool,

    /// Rows per parallel batch (default: 65536)
    #[arg(long = "batch-size", alias = "batch_size", value_name = "N")]
    batch_size: Option<usize>,

    /// Number of worker threads for --parallel (default: one per core)
    #[arg(long = "concurrent-threads", alias = "concurrent_threads", value_name = "N")]
    concurrent_threads: Option<usize>,

    /// Number of timed scans (default: 10)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Logging level off, error, warn, info, debug, trace (default: info)
    #[arg(long = "log-level", alias = "log_level", value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.unwrap_or(LevelFilter::Info))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> maskscan_core::Result<()> {
    let params = FilterParams::new(
        parse_date(&args.min_date)?,
        parse_date(&args.max_date)?,
        args.min_discount,
        args.max_discount,
        args.max_quantity,
    );

    let config = Configuration {
        batch_size: args.batch_size,
        concurrent_threads: args.concurrent_threads,
        min_parallel_rows: None,
    };

    let columns: OwnedColumns = match &args.input {
        Some(path) => read_column_file(path)?,
        None => generate_lineitem(args.rows, args.seed),
    };

    if let Some(path) = &args.write {
        write_column_file(path, &columns.as_columns())?;
    }

    let backend = args.backend.resolve();
    info!(
        "Scanning {} rows with backend {}: ship_date in [{}, {}), discount in [{}, {}), quantity < {}",
        columns.len(),
        backend.name(),
        format_date(params.min_date)?,
        format_date(params.max_date)?,
        params.min_discount,
        params.max_discount,
        params.max_quantity
    );

    let rows = columns.len();
    let view = columns.as_columns();
    let mut mask = vec![0u8; rows];
    let iterations = args.iterations.max(1);

    let mut stopwatch = Stopwatch::new();

    if args.parallel {
        scan_parallel(rows, &view, &params, &mut mask, &config, iterations, &mut stopwatch, backend)?;
    } else {
        for _ in 0..iterations {
            stopwatch.start();
            filter_with_backend(backend, rows, &view, &params, &mut mask)?;
            stopwatch.stop();
        }
    }

    let elapsed = stopwatch.elapsed();
    let per_scan = mean_scan_time(elapsed, iterations);
    let rows_per_second = if per_scan.as_secs_f64() > 0.0 {
        rows as f64 / per_scan.as_secs_f64()
    } else {
        f64::INFINITY
    };

    println!("Matched rows: {}", count_selected(&mask));
    println!("Selectivity: {:.4}", selectivity(&mask));
    println!("Elapsed {:?} over {} scans ({:?} per scan)", elapsed, iterations, per_scan);
    println!("Throughput: {:.0} rows/s", rows_per_second);

    Ok(())
}

fn mean_scan_time(elapsed: Duration, iterations: usize) -> Duration {
    elapsed.div_f64(iterations.max(1) as f64)
}

#[cfg(feature = "enable_parallelism")]
#[allow(clippy::too_many_arguments)]
fn scan_parallel(
    rows: usize,
    view: &maskscan_core::LineItemColumns<'_>,
    params: &FilterParams,
    mask: &mut [u8],
    config: &Configuration,
    iterations: usize,
    stopwatch: &mut Stopwatch,
    backend: Backend,
) -> maskscan_core::Result<()> {
    use maskscan_core::core::parallel::{build_thread_pool, filter_parallel};

    if backend != Backend::detect() {
        warn!("--parallel always uses the detected backend {}", Backend::detect().name());
    }

    let config = Configuration {
        min_parallel_rows: Some(0),
        ..config.clone()
    };
    let pool = build_thread_pool(&config)?;

    pool.install(|| {
        for _ in 0..iterations {
            stopwatch.start();
            filter_parallel(rows, view, params, mask, &config)?;
            stopwatch.stop();
        }
        Ok(())
    })
}

#[cfg(not(feature = "enable_parallelism"))]
#[allow(clippy::too_many_arguments)]
fn scan_parallel(
    rows: usize,
    view: &maskscan_core::LineItemColumns<'_>,
    params: &FilterParams,
    mask: &mut [u8],
    _config: &Configuration,
    iterations: usize,
    stopwatch: &mut Stopwatch,
    backend: Backend,
) -> maskscan_core::Result<()> {
    warn!("Built without enable_parallelism; scanning on one thread");
    for _ in 0..iterations {
        stopwatch.start();
        filter_with_backend(backend, rows, view, params, mask)?;
        stopwatch.stop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_scan_time_handles_iteration_counts_beyond_u32() {
        let iterations = u32::MAX as usize + 1;
        let elapsed = Duration::from_secs(iterations as u64);
        assert_eq!(mean_scan_time(elapsed, iterations), Duration::from_secs(1));
        assert_eq!(mean_scan_time(Duration::from_secs(30), 3), Duration::from_secs(10));
    }
}
