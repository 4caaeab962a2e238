/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Slices the global [`CellSoA`] into independently clusterable partitions.

use crate::cell::CellSoA;
use crate::constants::{MAX_CELLS_PER_PARTITION, THREADS_PER_BLOCK};
use crate::error::CclError;

/// A contiguous, non-overlapping run `[start, start + size)` into a
/// [`CellSoA`], processed as one independent work unit. No 8-adjacent pair
/// of cells ever spans two partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: usize,
    pub size: usize,
}

impl Partition {
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.start + self.size
    }
}

/// Walks `soa` in order and returns the ordered list of partitions covering
/// every cell exactly once.
///
/// A split point is declared between cell `i-1` and cell `i` iff either (a)
/// `i` is the first cell of a new module — mandatory, since adjacency never
/// crosses modules — or (b) `channel1[i]` jumps by more than one past the
/// previous cell's `channel1` *and* the partition being grown already has
/// at least `2 * THREADS_PER_BLOCK` cells. Condition (b) is safe because a
/// `channel1` jump of more than one means no cell to the left can be
/// 8-adjacent to any cell to the right; the size threshold exists only to
/// avoid over-splitting small, sparse modules.
pub fn build_partitions(soa: &CellSoA) -> Result<Vec<Partition>, CclError> {
    let n = soa.len();
    let mut partitions = Vec::new();
    if n == 0 {
        return Ok(partitions);
    }

    let mut start = 0usize;
    let mut last_mid = soa.channel1(0);
    let mut last_module = soa.module_id(0);

    for i in 1..n {
        let cur_mid = soa.channel1(i);
        let cur_module = soa.module_id(i);
        let size = i - start;

        let forced_by_module = cur_module != last_module;
        let gap = cur_mid > last_mid + 1;

        if forced_by_module {
            log::trace!("split at {i}: module boundary ({last_module} -> {cur_module})");
            push_partition(&mut partitions, soa, start, size)?;
            start = i;
        } else if gap && size >= 2 * THREADS_PER_BLOCK {
            log::trace!("split at {i}: channel1 gap ({last_mid} -> {cur_mid}), size={size}");
            push_partition(&mut partitions, soa, start, size)?;
            start = i;
        }

        last_mid = cur_mid;
        last_module = cur_module;
    }

    if start < n {
        push_partition(&mut partitions, soa, start, n - start)?;
    }

    Ok(partitions)
}

fn push_partition(
    partitions: &mut Vec<Partition>,
    soa: &CellSoA,
    start: usize,
    size: usize,
) -> Result<(), CclError> {
    if size > MAX_CELLS_PER_PARTITION {
        return Err(CclError::PartitionTooLarge {
            module_id: soa.module_id(start),
            start,
            run_len: size,
            cap: MAX_CELLS_PER_PARTITION,
        });
    }
    partitions.push(Partition { start, size });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::orchestrate::ModuleCells;

    fn dense_run(module_id: u64, n: usize) -> ModuleCells {
        ModuleCells {
            module_id,
            cells: (0..n)
                .map(|i| Cell {
                    channel0: (i % 4) as i32,
                    channel1: (i / 4) as i32,
                    activation: 1.0,
                    time: 0.0,
                    module_id,
                })
                .collect(),
        }
    }

    #[test]
    fn a_module_boundary_always_forces_a_split_even_when_small() {
        let modules = [
            ModuleCells {
                module_id: 1,
                cells: vec![Cell {
                    channel0: 0,
                    channel1: 0,
                    activation: 1.0,
                    time: 0.0,
                    module_id: 1,
                }],
            },
            ModuleCells {
                module_id: 2,
                cells: vec![Cell {
                    channel0: 0,
                    channel1: 0,
                    activation: 1.0,
                    time: 0.0,
                    module_id: 2,
                }],
            },
        ];
        let soa = CellSoA::from_modules(&modules).unwrap();
        let partitions = build_partitions(&soa).unwrap();
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0], Partition { start: 0, size: 1 });
        assert_eq!(partitions[1], Partition { start: 1, size: 1 });
    }

    #[test]
    fn an_uninterrupted_dense_run_past_the_cap_is_rejected() {
        let modules = [dense_run(1, MAX_CELLS_PER_PARTITION + 1)];
        let soa = CellSoA::from_modules(&modules).unwrap();
        let err = build_partitions(&soa).expect_err("should reject an oversized dense run");
        assert!(matches!(err, CclError::PartitionTooLarge { module_id: 1, .. }));
    }

    #[test]
    fn a_dense_run_exactly_at_the_cap_is_accepted() {
        let modules = [dense_run(1, MAX_CELLS_PER_PARTITION)];
        let soa = CellSoA::from_modules(&modules).unwrap();
        let partitions = build_partitions(&soa).unwrap();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].size, MAX_CELLS_PER_PARTITION);
    }
}
