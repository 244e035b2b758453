/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{FailResult, DielecError, ZONE_CENTER};
use crate::provider::{BornChargeProvider, DynamicalSolver, PrimitiveCell, require_born_charges};
use crate::engine::{DielectricSeries, compute_dielectric_function};
use dielec_dist::{Root, Broadcast, derive_broadcast};

/// Bounds of the spectrum, in cm^-1, as provided by the density-of-states setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub emin: f64,
    pub emax: f64,
    pub delta_e: f64,
}

impl GridBounds {
    /// `floor((emax - emin) / delta_e)`.  Empty ranges give zero.
    pub fn nomega(&self) -> usize {
        ((self.emax - self.emin) / self.delta_e) as usize
    }
}

derive_broadcast! {
    /// Settings that must agree on every process before any of them computes anything.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DielecConfig {
        pub calc_dielectric_constant: bool,
        pub nomega: usize,
        pub emin: f64,
        pub emax: f64,
        pub delta_e: f64,
    }
}

impl Default for DielecConfig {
    fn default() -> Self {
        DielecConfig {
            calc_dielectric_constant: false,
            nomega: 1,
            emin: 0.0,
            emax: 1.0,
            delta_e: 1.0,
        }
    }
}

impl DielecConfig {
    pub fn new(calc_dielectric_constant: bool, bounds: GridBounds) -> Self {
        let GridBounds { emin, emax, delta_e } = bounds;
        DielecConfig { calc_dielectric_constant, nomega: bounds.nomega(), emin, emax, delta_e }
    }

    /// Construct the config on the coordinator and hand it to everybody.
    ///
    /// # Collective
    ///
    /// Must be called on every process.  `local` must be `Some` on the
    /// coordinator and is ignored elsewhere.
    pub fn distribute(root: &impl Root, local: Option<(bool, GridBounds)>) -> Self {
        let local = local.map(|(enabled, bounds)| DielecConfig::new(enabled, bounds));
        Broadcast::broadcast(root, local)
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds { emin: self.emin, emax: self.emax, delta_e: self.delta_e }
    }
}

/// Uniform sampling `omega[i] = emin + i * delta_e` in cm^-1.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    omega: Vec<f64>,
}

impl FrequencyGrid {
    pub fn new(nomega: usize, emin: f64, delta_e: f64) -> Self {
        let omega = (0..nomega).map(|i| emin + delta_e * i as f64).collect();
        FrequencyGrid { omega }
    }

    pub fn from_config(config: &DielecConfig) -> Self
    { FrequencyGrid::new(config.nomega, config.emin, config.delta_e) }

    pub fn omega(&self) -> &[f64] { &self.omega }
    pub fn len(&self) -> usize { self.omega.len() }
    pub fn is_empty(&self) -> bool { self.omega.is_empty() }
}

/// A dielectric-function session: the distributed config, the grid built
/// from it, and the most recently computed spectrum.
#[derive(Debug, Clone)]
pub struct Dielec {
    config: DielecConfig,
    grid: FrequencyGrid,
    dielec: Option<DielectricSeries>,
}

impl Dielec {
    /// Distribute the grid settings and prepare for `run_dielec_calculation`.
    ///
    /// `local` is read on the coordinator only; see [`DielecConfig::distribute`].
    /// When the calculation is enabled, a Born charge source is required, and
    /// it is initialized here if it has not been already.
    ///
    /// The bounds must be finite with a positive step.
    ///
    /// # Collective
    ///
    /// Must be called on every process.
    pub fn init(
        root: &impl Root,
        local: Option<(bool, GridBounds)>,
        born: &mut impl BornChargeProvider,
    ) -> FailResult<Dielec> {
        let config = DielecConfig::distribute(root, local);

        let GridBounds { emin, emax, delta_e } = config.bounds();
        ensure!(
            delta_e > 0.0 && delta_e.is_finite() && emin.is_finite() && emax.is_finite(),
            "invalid frequency grid (emin = {}, emax = {}, delta_e = {})", emin, emax, delta_e,
        );

        if config.calc_dielectric_constant {
            // every process holds the same flag, so every process fails together
            if !born.is_configured() {
                if root.is_root() {
                    error!("dielectric = true, but no Born charges were provided");
                }
                return Err(DielecError::MissingBornCharges { operation: "Dielec::init" }.into());
            }
        }

        let grid = FrequencyGrid::from_config(&config);

        if config.calc_dielectric_constant {
            if root.is_root() {
                info!(
                    "Dielectric function on {} frequencies from {} to {} cm^-1 (step {})",
                    grid.len(), config.emin, config.emax, config.delta_e,
                );
            }
            let verbosity = if root.is_root() { 1 } else { 0 };
            require_born_charges(born, "Dielec::init", verbosity)?;
        }

        Ok(Dielec { config, grid, dielec: None })
    }

    pub fn config(&self) -> &DielecConfig { &self.config }

    pub fn is_enabled(&self) -> bool { self.config.calc_dielectric_constant }

    pub fn nomega(&self) -> usize { self.config.nomega }

    pub fn omega_grid(&self) -> &[f64] { self.grid.omega() }

    /// `None` until `run_dielec_calculation` has succeeded.
    pub fn dielectric_function(&self) -> Option<&DielectricSeries> { self.dielec.as_ref() }

    /// Compute the dielectric tensor on every grid point from the zone-center phonons.
    ///
    /// Nothing is computed if the Born charge source is missing.
    pub fn run_dielec_calculation(
        &mut self,
        solver: &impl DynamicalSolver,
        born: &mut impl BornChargeProvider,
        cell: &PrimitiveCell,
    ) -> FailResult<&DielectricSeries> {
        let zstar = require_born_charges(born, "Dielec::run_dielec_calculation", 0)?;
        ensure!(
            zstar.len() == cell.num_atoms(),
            "{} Born charge tensors for {} atoms", zstar.len(), cell.num_atoms(),
        );

        let sols = solver.eval_k(ZONE_CENTER)?;
        sols.check_shape(cell.num_modes())?;

        let series = compute_dielectric_function(
            self.grid.omega(),
            &sols.eigenvalues,
            sols.eigenvectors,
            zstar,
            cell,
        );
        Ok(&*self.dielec.insert(series))
    }
}
