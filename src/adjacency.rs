/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! For each cell in a partition, finds every other cell in the same
//! partition that is 8-adjacent to it, exploiting the `channel1` sort order
//! to bound the scan.

use crate::cell::is_adjacent;
use crate::cell::CellSoA;
use crate::partition::Partition;

/// Maximum possible neighbors of a cell in a 2D 8-neighborhood grid.
const MAX_NEIGHBORS: usize = 8;

/// Adjacency lists for every cell of one partition, indexed by local cell
/// index (`0..partition.size`). Neighbor indices are also local.
pub struct Adjacency {
    size: usize,
    adjc: Box<[u8]>,
    adjv: Box<[u32]>,
}

impl Adjacency {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn count(&self, tid: usize) -> usize {
        self.adjc[tid] as usize
    }

    #[inline(always)]
    pub fn neighbors(&self, tid: usize) -> &[u32] {
        let base = tid * MAX_NEIGHBORS;
        &self.adjv[base..base + self.count(tid)]
    }
}

/// Computes the adjacency lists of every cell in `partition`.
///
/// Because cells are sorted by `channel1` within a partition, a cell's
/// neighbors lie in a contiguous window around it: scanning backward and
/// forward from `tid` can stop as soon as `channel1` diverges by more than
/// one (or the module changes, which cannot happen inside one partition but
/// is checked defensively since partitions are caller-supplied data).
pub fn reduce(soa: &CellSoA, partition: Partition) -> Adjacency {
    let size = partition.size;
    let mut adjc = vec![0u8; size].into_boxed_slice();
    let mut adjv = vec![0u32; size * MAX_NEIGHBORS].into_boxed_slice();

    for tid in 0..size {
        let global_tid = partition.start + tid;
        let this = soa.cell_at(global_tid);
        let mut n = 0usize;

        // Backward scan.
        let mut j = tid;
        while j > 0 {
            j -= 1;
            let global_j = partition.start + j;
            let other = soa.cell_at(global_j);
            if other.module_id != this.module_id || other.channel1 + 1 < this.channel1 {
                break;
            }
            if is_adjacent(&this, &other) {
                adjc_push(&mut adjv, &mut n, tid, j as u32);
            }
        }

        // Forward scan.
        let mut j = tid + 1;
        while j < size {
            let global_j = partition.start + j;
            let other = soa.cell_at(global_j);
            if other.module_id != this.module_id || other.channel1 > this.channel1 + 1 {
                break;
            }
            if is_adjacent(&this, &other) {
                adjc_push(&mut adjv, &mut n, tid, j as u32);
            }
            j += 1;
        }

        debug_assert!(n <= MAX_NEIGHBORS, "cell {tid} has {n} neighbors, more than 8");
        adjc[tid] = n as u8;
    }

    Adjacency { size, adjc, adjv }
}

#[inline(always)]
fn adjc_push(adjv: &mut [u32], n: &mut usize, tid: usize, neighbor: u32) {
    debug_assert!(*n < MAX_NEIGHBORS, "cell {tid} has more than 8 neighbors");
    if *n < MAX_NEIGHBORS {
        adjv[tid * MAX_NEIGHBORS + *n] = neighbor;
        *n += 1;
    }
}
