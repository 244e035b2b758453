/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Ionic contribution to the frequency-dependent dielectric tensor, and
//! mode effective charges, from the zone-center phonons and the Born
//! effective charges of a crystal.
//!
//! Both quantities follow Gonze & Lee, PRB 55, 10355 (1997).
//!
//! The phonon eigensolver and the source of Born charges are external;
//! see [`DynamicalSolver`] and [`BornChargeProvider`].

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[cfg(test)]
#[macro_use] extern crate dielec_assert_close;

pub mod units;
mod provider;
mod grid;
mod engine;
mod mode_charge;

pub use crate::provider::{
    PrimitiveCell, Eigensols, DynamicalSolver,
    BornChargeProvider, BornCharges, require_born_charges,
};
pub use crate::grid::{GridBounds, DielecConfig, FrequencyGrid, Dielec};
pub use crate::engine::{DielectricSeries, compute_dielectric_function};
pub use crate::mode_charge::{
    get_zstar_mode, compute_mode_effective_charge, mode_effective_charges,
};

pub use num_complex::Complex64;

pub type FailResult<T> = Result<T, failure::Error>;

/// Cartesian vector.
pub type V3 = [f64; 3];
/// 3x3 matrix, row-major.
pub type M33 = [[f64; 3]; 3];

/// Diagnostic verbosity for lazy setup of collaborators.  Never affects results.
pub type Verbosity = u32;

pub const ZONE_CENTER: V3 = [0.0; 3];

/// The three lowest modes at the zone center are the acoustic translations.
pub const NUM_ACOUSTIC_MODES: usize = 3;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DielecError {
    #[error("{operation}: Born charge information required (born-info must be set when dielectric = true)")]
    MissingBornCharges { operation: &'static str },
}
