/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{FailResult, DielecError, Verbosity, V3, M33};
use crate::units::AMU_RY;
use num_complex::Complex64;

/// The data of the primitive cell that enters the dielectric sum.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveCell {
    masses: Vec<f64>,
    volume: f64,
}

impl PrimitiveCell {
    /// Masses in the internal (Rydberg) unit, volume in bohr^3.
    pub fn new(masses: Vec<f64>, volume: f64) -> Self
    { PrimitiveCell { masses, volume } }

    /// Masses in AMU, volume in bohr^3.
    pub fn from_amu(masses: &[f64], volume: f64) -> Self
    { PrimitiveCell::new(masses.iter().map(|m| m * AMU_RY).collect(), volume) }

    /// Internal (Rydberg) unit.
    pub fn masses(&self) -> &[f64] { &self.masses }
    /// bohr^3
    pub fn volume(&self) -> f64 { self.volume }
    pub fn num_atoms(&self) -> usize { self.masses.len() }
    pub fn num_modes(&self) -> usize { 3 * self.masses.len() }
}

/// Solution of the dynamical matrix at one wavevector.
///
/// `eigenvectors[is]` is the (mass-weighted) eigenvector of mode `is`, with one
/// component per Cartesian degree of freedom of the primitive cell
/// (`3 * atom + axis`).  Modes are in ascending order of eigenvalue.
///
/// # Zone center
///
/// At q = 0 the eigenvectors must be real up to a global phase per mode.
/// The dielectric and mode-charge sums read only the real part, so callers
/// must remove any such phase beforehand.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigensols {
    pub eigenvalues: Vec<f64>,
    pub eigenvectors: Vec<Vec<Complex64>>,
}

impl Eigensols {
    pub fn num_modes(&self) -> usize { self.eigenvalues.len() }

    /// Verify that this is a complete solution for a cell with `ns` degrees of freedom.
    pub fn check_shape(&self, ns: usize) -> FailResult<()> {
        ensure!(
            self.eigenvalues.len() == ns,
            "expected {} eigenvalues, got {}", ns, self.eigenvalues.len(),
        );
        check_eigenvector_shape(&self.eigenvectors, ns)
    }
}

pub(crate) fn check_eigenvector_shape(eigenvectors: &[Vec<Complex64>], ns: usize) -> FailResult<()> {
    ensure!(
        eigenvectors.len() == ns,
        "expected {} eigenvectors, got {}", ns, eigenvectors.len(),
    );
    if let Some(bad) = eigenvectors.iter().position(|ev| ev.len() != ns) {
        bail!("eigenvector {} has {} components, expected {}", bad, eigenvectors[bad].len(), ns);
    }
    Ok(())
}

/// External diagonalizer of the dynamical matrix.
pub trait DynamicalSolver {
    /// Number of eigenvalues (three times the number of atoms in the primitive cell).
    fn num_modes(&self) -> usize;

    /// Diagonalize the dynamical matrix at `qpoint` (fractional reciprocal coordinates).
    fn eval_k(&self, qpoint: V3) -> FailResult<Eigensols>;

    /// Directions along which degenerate eigenvectors should be resolved.
    ///
    /// When this is nonempty, mode effective charges use
    /// [`DynamicalSolver::project_degenerate_eigenvectors`] instead of [`DynamicalSolver::eval_k`].
    fn projection_directions(&self) -> &[Vec<f64>] { &[] }

    /// Eigenvectors at `qpoint`, with each degenerate subspace rotated to align
    /// with `directions`, which are given in the same mass-weighted basis
    /// as the eigenvectors.
    fn project_degenerate_eigenvectors(
        &self,
        qpoint: V3,
        directions: &[Vec<f64>],
    ) -> FailResult<Vec<Vec<Complex64>>>;
}

/// A precomputed zone-center solution.
impl DynamicalSolver for Eigensols {
    fn num_modes(&self) -> usize { self.eigenvalues.len() }

    fn eval_k(&self, qpoint: V3) -> FailResult<Eigensols> {
        ensure!(qpoint == crate::ZONE_CENTER, "only the zone center is available (requested {:?})", qpoint);
        Ok(self.clone())
    }

    fn project_degenerate_eigenvectors(
        &self,
        _: V3,
        _: &[Vec<f64>],
    ) -> FailResult<Vec<Vec<Complex64>>> {
        bail!("precomputed eigensolutions cannot be projected onto directions")
    }
}

/// External owner of the Born effective charge tensors.
///
/// Tensors are indexed `[atom][field direction][displacement direction]`.
pub trait BornChargeProvider {
    /// Whether a source of Born charges exists at all.
    fn is_configured(&self) -> bool;

    /// Whether the charges have been materialized.
    fn is_initialized(&self) -> bool;

    /// Materialize the charges.  `verbosity` only controls diagnostic output.
    fn setup_dielectric(&mut self, verbosity: Verbosity) -> FailResult<()>;

    /// `None` until initialized.
    fn born_charges(&self) -> Option<&[M33]>;
}

/// Born charges that are already in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct BornCharges(pub Vec<M33>);

impl BornChargeProvider for BornCharges {
    fn is_configured(&self) -> bool { true }
    fn is_initialized(&self) -> bool { true }
    fn setup_dielectric(&mut self, _: Verbosity) -> FailResult<()> { Ok(()) }
    fn born_charges(&self) -> Option<&[M33]> { Some(&self.0) }
}

/// `None` stands for a source that was never configured.
impl<B: BornChargeProvider> BornChargeProvider for Option<B> {
    fn is_configured(&self) -> bool
    { self.as_ref().map_or(false, |b| b.is_configured()) }

    fn is_initialized(&self) -> bool
    { self.as_ref().map_or(false, |b| b.is_initialized()) }

    fn setup_dielectric(&mut self, verbosity: Verbosity) -> FailResult<()> {
        match self {
            Some(b) => b.setup_dielectric(verbosity),
            None => bail!("no Born charge source to set up"),
        }
    }

    fn born_charges(&self) -> Option<&[M33]>
    { self.as_ref().and_then(|b| b.born_charges()) }
}

/// Check that a Born charge source is configured, initialize it if needed,
/// and borrow the charges.
///
/// `operation` names the caller in the error.
pub fn require_born_charges<'b, B: BornChargeProvider + ?Sized>(
    born: &'b mut B,
    operation: &'static str,
    verbosity: Verbosity,
) -> FailResult<&'b [M33]> {
    if !born.is_configured() {
        return Err(DielecError::MissingBornCharges { operation }.into());
    }

    if !born.is_initialized() {
        born.setup_dielectric(verbosity)?;
    }

    let born: &'b B = born;
    match born.born_charges() {
        Some(charges) => Ok(charges),
        None => bail!("{}: Born charge source failed to initialize", operation),
    }
}
