/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use dsi_progress_logger::no_logging;
use pixel_ccl::prelude::*;

/// Builds a small test thread pool, mirroring the thread-pool-construction
/// idiom used throughout this crate family's tests and CLIs.
pub fn thread_pool(num_threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .expect("failed to build test thread pool")
}

pub fn cell(channel0: i32, channel1: i32, activation: f64, module_id: u64) -> Cell {
    Cell {
        channel0,
        channel1,
        activation,
        time: 0.0,
        module_id,
    }
}

pub fn module(module_id: u64, cells: Vec<Cell>) -> ModuleCells {
    ModuleCells { module_id, cells }
}

/// Runs the full pipeline over a single module on a 4-thread pool with
/// logging disabled, returning that module's measurements.
pub fn cluster_one_module(module_id: u64, cells: Vec<Cell>) -> anyhow::Result<Vec<Measurement>> {
    let pool = thread_pool(4);
    let modules = vec![module(module_id, cells)];
    let mut results = cluster(&pool, &modules, no_logging![])?;
    Ok(results.remove(0).measurements)
}

/// Sorts measurements by `(module_id, channel0, channel1)` so assertions
/// don't depend on cluster-discovery order.
pub fn sort_measurements(mut measurements: Vec<Measurement>) -> Vec<Measurement> {
    measurements.sort_by(|a, b| {
        a.module_id
            .cmp(&b.module_id)
            .then_with(|| a.channel0.total_cmp(&b.channel0))
            .then_with(|| a.channel1.total_cmp(&b.channel1))
    });
    measurements
}
