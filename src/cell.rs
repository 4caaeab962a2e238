/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The cell data model: a single detector pixel activation, and the flat
//! structure-of-arrays buffer the rest of the pipeline operates on.

use crate::error::CclError;
use crate::orchestrate::ModuleCells;

/// One activation at a detector pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Integer pixel index on axis 0.
    pub channel0: i32,
    /// Integer pixel index on axis 1. Cells are ordered by this field
    /// (ties broken by `channel0`) within a module.
    pub channel1: i32,
    /// Nonnegative signal weight.
    pub activation: f64,
    /// Passed through; never read by the clustering core.
    pub time: f64,
    /// Opaque identifier of the detector module this cell belongs to.
    pub module_id: u64,
}

/// Two cells are 8-adjacent iff they differ by at most one pixel on each
/// axis and belong to the same module. A cell is never its own neighbor.
#[inline]
pub(crate) fn is_adjacent(a: &Cell, b: &Cell) -> bool {
    a.module_id == b.module_id
        && (a.channel0 - b.channel0).abs() <= 1
        && (a.channel1 - b.channel1).abs() <= 1
}

/// A flat, column-major buffer of all cells across all modules, produced
/// once on the host and read-only for the remainder of the pipeline.
///
/// Invariant: cells are grouped by `module_id` and, within a module, sorted
/// by `channel1` ascending with ties broken by `channel0` ascending. This
/// invariant is the partitioner's and the adjacency reducer's precondition;
/// [`CellSoA::from_modules`] validates it in debug builds only (the check
/// is `O(n)` but the reducer's reliance on the order is a hot path, so the
/// cost is paid only when debug assertions are enabled, matching the
/// caller contract in [`crate::error::CclError::InputNotSorted`]).
pub struct CellSoA {
    channel0: Vec<i32>,
    channel1: Vec<i32>,
    activation: Vec<f64>,
    time: Vec<f64>,
    module_id: Vec<u64>,
}

impl CellSoA {
    /// Builds a `CellSoA` from a caller's per-module cell lists, in order.
    /// Modules are concatenated in the order given, which by construction
    /// satisfies the "grouped by module" half of the sort invariant; the
    /// "sorted within a module" half is the caller's responsibility and is
    /// validated here only when `cfg!(debug_assertions)`.
    pub fn from_modules(modules: &[ModuleCells]) -> Result<Self, CclError> {
        let total: usize = modules.iter().map(|m| m.cells.len()).sum();
        let mut soa = CellSoA {
            channel0: Vec::with_capacity(total),
            channel1: Vec::with_capacity(total),
            activation: Vec::with_capacity(total),
            time: Vec::with_capacity(total),
            module_id: Vec::with_capacity(total),
        };

        for module in modules {
            if cfg!(debug_assertions) {
                let mut prev: Option<(i32, i32)> = None;
                for (local_index, cell) in module.cells.iter().enumerate() {
                    debug_assert!(
                        cell.activation >= 0.0,
                        "cell {local_index} of module {} has negative activation {}",
                        module.module_id,
                        cell.activation
                    );
                    debug_assert_eq!(
                        cell.module_id, module.module_id,
                        "cell {local_index} carries module_id {} but was placed under module {}",
                        cell.module_id, module.module_id
                    );
                    if let Some((c1, c0)) = prev {
                        if (cell.channel1, cell.channel0) < (c1, c0) {
                            return Err(CclError::InputNotSorted {
                                module_id: module.module_id,
                                index: soa.channel0.len(),
                                channel1: cell.channel1,
                            });
                        }
                    }
                    prev = Some((cell.channel1, cell.channel0));
                }
            }

            for cell in &module.cells {
                soa.channel0.push(cell.channel0);
                soa.channel1.push(cell.channel1);
                soa.activation.push(cell.activation);
                soa.time.push(cell.time);
                soa.module_id.push(cell.module_id);
            }
        }

        Ok(soa)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.channel0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.channel0.is_empty()
    }

    #[inline(always)]
    pub fn channel0(&self, index: usize) -> i32 {
        self.channel0[index]
    }

    #[inline(always)]
    pub fn channel1(&self, index: usize) -> i32 {
        self.channel1[index]
    }

    #[inline(always)]
    pub fn activation(&self, index: usize) -> f64 {
        self.activation[index]
    }

    #[inline(always)]
    pub fn module_id(&self, index: usize) -> u64 {
        self.module_id[index]
    }

    #[inline(always)]
    pub(crate) fn cell_at(&self, index: usize) -> Cell {
        Cell {
            channel0: self.channel0[index],
            channel1: self.channel1[index],
            activation: self.activation[index],
            time: self.time[index],
            module_id: self.module_id[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(channel0: i32, channel1: i32, activation: f64, module_id: u64) -> Cell {
        Cell {
            channel0,
            channel1,
            activation,
            time: 0.0,
            module_id,
        }
    }

    #[test]
    fn accepts_a_correctly_sorted_module() {
        let modules = [ModuleCells {
            module_id: 1,
            cells: vec![
                cell(0, 0, 1.0, 1),
                cell(5, 0, 1.0, 1),
                cell(0, 1, 1.0, 1),
            ],
        }];
        assert!(CellSoA::from_modules(&modules).is_ok());
    }

    #[test]
    #[cfg_attr(not(debug_assertions), ignore)]
    fn rejects_a_module_out_of_channel1_order() {
        let modules = [ModuleCells {
            module_id: 1,
            cells: vec![cell(0, 5, 1.0, 1), cell(0, 0, 1.0, 1)],
        }];
        let err = CellSoA::from_modules(&modules).expect_err("should detect out-of-order cells");
        assert!(matches!(err, CclError::InputNotSorted { module_id: 1, .. }));
    }

    #[test]
    #[cfg_attr(not(debug_assertions), ignore)]
    fn rejects_a_module_out_of_channel0_order_on_a_channel1_tie() {
        let modules = [ModuleCells {
            module_id: 1,
            cells: vec![cell(5, 0, 1.0, 1), cell(0, 0, 1.0, 1)],
        }];
        assert!(CellSoA::from_modules(&modules).is_err());
    }

    #[test]
    fn is_adjacent_requires_the_same_module() {
        let a = cell(0, 0, 1.0, 1);
        let b = cell(0, 0, 1.0, 2);
        assert!(!is_adjacent(&a, &b));
    }

    #[test]
    fn is_adjacent_excludes_a_cell_two_steps_away() {
        let a = cell(0, 0, 1.0, 1);
        let b = cell(2, 0, 1.0, 1);
        assert!(!is_adjacent(&a, &b));
    }
}
