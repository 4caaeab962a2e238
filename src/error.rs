/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error kinds surfaced by the clustering pipeline.
//!
//! There is no local recovery anywhere in this crate: the computation is
//! deterministic given fixed inputs, so a caller that gets an [`CclError`]
//! back gains nothing from retrying and should instead fix the input or the
//! executor configuration that produced it.

use thiserror::Error;

/// Errors that can abort a call to [`crate::orchestrate::cluster`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CclError {
    /// A module contains an uninterrupted run of cells (no `channel1` gap)
    /// longer than [`crate::constants::MAX_CELLS_PER_PARTITION`]. The caller
    /// must either raise the cap or pre-split the module.
    #[error(
        "module {module_id} has an uninterrupted run of {run_len} cells starting at offset \
         {start}, which exceeds the per-partition cap of {cap}"
    )]
    PartitionTooLarge {
        module_id: u64,
        start: usize,
        run_len: usize,
        cap: usize,
    },

    /// The input violated the required `(module_id, channel1, channel0)`
    /// sort order. Only detected in debug builds; in release builds a
    /// violation is undefined behavior at the algorithm level, per the
    /// adjacency reducer's reliance on the sort invariant.
    #[error(
        "cells are not sorted as required: module {module_id}, cell index {index} has \
         channel1={channel1} which is out of order with its predecessor"
    )]
    InputNotSorted {
        module_id: u64,
        index: usize,
        channel1: i32,
    },

    /// The `rayon` thread pool could not be built or a task on it panicked.
    #[error("parallel executor failure: {0}")]
    ExecutorFailure(String),
}

impl From<rayon::ThreadPoolBuildError> for CclError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        CclError::ExecutorFailure(e.to_string())
    }
}
