//! Runs the insert / find-min / delete-min workload over every heap variant
//! and prints a per-operation cost table.
//!
//! Configured through `HEAP_BENCH_ITERATIONS`, `HEAP_BENCH_SEED` and
//! `HEAP_BENCH_VARIANTS`; log output is controlled with `RUST_LOG`.

use std::process::ExitCode;

use alloc_measurement::CountingAllocator;
use log::*;
use mergeable_heaps::driver::{self, DriverConfig};

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn main() -> ExitCode {
    env_logger::init();
    debug!("envlogger init");
    info!("Starting benchmark");

    let config = match DriverConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Benchmark configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let probe = || CountingAllocator::snapshot().requests();
    match driver::run(&config, &probe) {
        Ok(reports) => {
            print!("{}", driver::render_table(&reports));
            println!("Benchmark done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Benchmark received error: {}", e);
            println!("Benchmark exiting due to error.");
            ExitCode::FAILURE
        }
    }
}
