//! Test utilities and mock types for Slick development.
//!
//! Provides deterministic mesh [`fixtures`] and a [`MockSnapshot`]
//! implementing [`SnapshotAccess`] for exercising exporters, comparators,
//! and accumulators without running an engine.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use slick_core::{SnapshotAccess, StepId};

/// Mock snapshot implementing [`SnapshotAccess`].
#[derive(Clone, Debug, PartialEq)]
pub struct MockSnapshot {
    time: f64,
    step: StepId,
    quantities: Vec<f64>,
}

impl MockSnapshot {
    pub fn new(step: u64, time: f64, quantities: Vec<f64>) -> Self {
        Self {
            time,
            step: StepId(step),
            quantities,
        }
    }

    /// Overwrite one cell's quantity.
    pub fn set(&mut self, cell: usize, value: f64) {
        self.quantities[cell] = value;
    }
}

impl SnapshotAccess for MockSnapshot {
    fn time(&self) -> f64 {
        self.time
    }

    fn step(&self) -> StepId {
        self.step
    }

    fn quantities(&self) -> &[f64] {
        &self.quantities
    }
}
