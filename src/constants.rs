/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Resource bounds shared by the partitioner and the label propagator.
//!
//! These mirror the fixed GPU launch configuration of the system this crate
//! is adapted from: a thread-block of [`THREADS_PER_BLOCK`] work-items
//! cooperating on a partition of at most [`MAX_CELLS_PER_PARTITION`] cells.
//! On this crate's CPU/`rayon` executor neither bound allocates hardware
//! shared memory, but both remain correctness-relevant: the first bounds
//! the size of a single partition (and is the threshold for
//! [`crate::error::CclError::PartitionTooLarge`]), and the second is the
//! partition-size floor the partitioner uses to amortize per-partition
//! overhead.

/// Maximum number of cells a single partition may contain.
pub const MAX_CELLS_PER_PARTITION: usize = 2048;

/// Nominal work-group size. Partitions are grown to at least
/// `2 * THREADS_PER_BLOCK` cells where the input allows it.
pub const THREADS_PER_BLOCK: usize = 256;
