/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

pub mod constants;
pub mod error;

pub mod cell;
pub mod partition;
pub mod adjacency;
pub mod propagate;
pub mod aggregate;
pub mod orchestrate;

pub mod prelude {
    pub use crate::aggregate::Measurement;
    pub use crate::cell::{Cell, CellSoA};
    pub use crate::error::CclError;
    pub use crate::orchestrate::{cluster, ModuleCells, ModuleMeasurements};
    pub use crate::partition::Partition;
}
