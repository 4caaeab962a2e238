/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ties the other components together: builds the Cell SoA and partition
//! list, dispatches one task per partition on a `rayon` thread pool, and
//! demultiplexes the flat measurement buffer back into per-module results.
//!
//! This is the only component that would, on an executor with a real
//! host/device boundary, touch it; every other component is a pure data
//! transform over buffers it is handed.

use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;
use dsi_progress_logger::ConcurrentProgressLog;
use rayon::prelude::*;
use sync_cell_slice::SyncSlice;

use crate::adjacency;
use crate::aggregate::{self, Measurement};
use crate::cell::{Cell, CellSoA};
use crate::error::CclError;
use crate::partition::build_partitions;
use crate::propagate;

/// A caller-supplied per-module cell list, sorted as required by
/// [`CellSoA`]'s invariant.
pub struct ModuleCells {
    pub module_id: u64,
    pub cells: Vec<Cell>,
}

/// The per-module measurement lists produced by [`cluster`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMeasurements {
    pub module_id: u64,
    pub measurements: Vec<Measurement>,
}

/// Clusters every module's cells and returns one [`ModuleMeasurements`] per
/// input module, in the same order as `modules`.
///
/// Partitions are dispatched as independent tasks on `pool`; each produces
/// a local measurement vector and reserves a disjoint slice of a shared
/// output buffer with a single atomic fetch-add, mirroring the two-atomics
/// reservation scheme described for the source GPU kernel (a local count
/// of owners, then one global reservation) collapsed into the one atomic
/// this executor actually needs, since a partition's local owner count is
/// already known before it touches the shared counter.
pub fn cluster(
    pool: &rayon::ThreadPool,
    modules: &[ModuleCells],
    pl: &mut impl ConcurrentProgressLog,
) -> Result<Vec<ModuleMeasurements>, CclError> {
    let soa = CellSoA::from_modules(modules)?;
    let partitions = build_partitions(&soa)?;

    log::debug!(
        "clustering {} modules, {} cells, {} partitions",
        modules.len(),
        soa.len(),
        partitions.len()
    );

    let mut output: Box<[MaybeUninit<Measurement>]> = Box::new_uninit_slice(soa.len());
    let reserved = CachePadded::new(AtomicUsize::new(0));
    let sync_output = output.as_sync_slice();

    pl.item_name("partition");
    pl.expected_updates(Some(partitions.len()));
    pl.start("Clustering partitions...");

    pool.install(|| {
        partitions.par_iter().for_each(|&partition| {
            let adjacency = adjacency::reduce(&soa, partition);
            let f = propagate::fast_sv(partition.size, &adjacency);
            let local = aggregate::aggregate(&soa, partition, &f);

            let base = reserved.fetch_add(local.len(), Ordering::Relaxed);
            for (offset, measurement) in local.into_iter().enumerate() {
                unsafe {
                    sync_output[base + offset].set(MaybeUninit::new(measurement));
                }
            }
            pl.light_update();
        });
    });

    pl.done();

    let total = reserved.load(Ordering::Relaxed);
    // SAFETY: every index in [0, total) was written exactly once: the
    // partitions' reservations are disjoint ranges of [0, total) because
    // `reserved` only ever grows by each partition's own local length, and
    // together the local lengths sum to `total`.
    let mut flat = Vec::with_capacity(total);
    for slot in output.iter().take(total) {
        flat.push(unsafe { slot.assume_init_read() });
    }

    Ok(demultiplex(modules, flat))
}

/// Groups a flat measurement list back per module in `O(N)`, using each
/// module's position in `modules` rather than rescanning the measurement
/// list once per module.
fn demultiplex(modules: &[ModuleCells], flat: Vec<Measurement>) -> Vec<ModuleMeasurements> {
    let mut results: Vec<ModuleMeasurements> = modules
        .iter()
        .map(|m| ModuleMeasurements {
            module_id: m.module_id,
            measurements: Vec::new(),
        })
        .collect();

    let mut index_of_module = std::collections::HashMap::with_capacity(modules.len());
    for (i, m) in modules.iter().enumerate() {
        index_of_module.insert(m.module_id, i);
    }

    for measurement in flat {
        if let Some(&i) = index_of_module.get(&measurement.module_id) {
            results[i].measurements.push(measurement);
        }
    }

    results
}
