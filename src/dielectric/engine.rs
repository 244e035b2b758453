/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{V3, M33, NUM_ACOUSTIC_MODES};
use crate::provider::PrimitiveCell;
use crate::units::KAYSER_TO_RY_SQ;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Dielectric tensor at each point of a frequency grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DielectricSeries {
    omega: Vec<f64>,
    tensors: Vec<M33>,
}

impl DielectricSeries {
    /// cm^-1
    pub fn omega(&self) -> &[f64] { &self.omega }
    pub fn tensors(&self) -> &[M33] { &self.tensors }
    pub fn len(&self) -> usize { self.omega.len() }
    pub fn is_empty(&self) -> bool { self.omega.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item=(f64, &M33)> + '_
    { self.omega.iter().cloned().zip(&self.tensors) }
}

/// Ionic contribution to the dielectric tensor,
///
/// ```text
///                8 pi           Z_i(s) Z_j(s)
/// eps_ij(w) = ---------  sum  ----------------
///              V_prim    s>=3   w_s^2 - w^2
/// ```
///
/// where `Z(s)` is the Born charge projected onto the displacement pattern of
/// mode `s`.  There is no damping; the tensor diverges at the mode frequencies.
///
/// `omega_grid` is in cm^-1 and `eigenvalues` in the internal unit.
/// `eigenvectors` are mass-weighted, and are consumed because they are
/// converted to displacements in place.  Only their real part is used
/// (see [`Eigensols`](crate::Eigensols)).
///
/// # Panics
///
/// Panics if the dimensions of the inputs disagree with `cell`.
pub fn compute_dielectric_function(
    omega_grid: &[f64],
    eigenvalues: &[f64],
    mut eigenvectors: Vec<Vec<Complex64>>,
    born_charges: &[M33],
    cell: &PrimitiveCell,
) -> DielectricSeries {
    let ns = cell.num_modes();
    assert_eq!(eigenvalues.len(), ns, "wrong number of eigenvalues!");
    assert_eq!(eigenvectors.len(), ns, "wrong number of eigenvectors!");
    assert_eq!(born_charges.len(), cell.num_atoms(), "wrong number of Born charges!");

    // mass-weighted coordinates -> displacements
    let masses = cell.masses();
    for evec in &mut eigenvectors {
        assert_eq!(evec.len(), ns, "wrong eigenvector length!");
        for (j, x) in evec.iter_mut().enumerate() {
            *x /= f64::sqrt(masses[j / 3]);
        }
    }

    let zstar_u: Vec<V3> = eigenvectors.iter()
        .map(|evec| project_born_charges(born_charges, evec))
        .collect();

    for (is, z) in zstar_u.iter().enumerate() {
        trace!("Zstar_u[{:>4}] = {:>15.8e} {:>15.8e} {:>15.8e}", is, z[0], z[1], z[2]);
    }

    let s_born: Vec<M33> = zstar_u.iter()
        .map(|z| {
            let mut s = [[0.0; 3]; 3];
            for i in 0..3 {
                for j in 0..3 {
                    s[i][j] = z[i] * z[j];
                }
            }
            s
        })
        .collect();

    let factor = 8.0 * PI / cell.volume();
    let tensors = omega_grid.iter()
        .map(|&omega| {
            let w2 = omega * omega * KAYSER_TO_RY_SQ;

            let mut tensor = [[0.0; 3]; 3];
            for i in 0..3 {
                for j in 0..3 {
                    let mut sum = 0.0;
                    for is in NUM_ACOUSTIC_MODES..ns {
                        sum += s_born[is][i][j] / (eigenvalues[is] - w2);
                    }
                    tensor[i][j] = sum * factor;
                }
            }
            tensor
        })
        .collect();

    DielectricSeries { omega: omega_grid.to_vec(), tensors }
}

/// `sum_j Z[j / 3][i][j % 3] * Re(u_j)` for each field direction `i`.
pub(crate) fn project_born_charges(born_charges: &[M33], evec: &[Complex64]) -> V3 {
    let mut out = [0.0; 3];
    for i in 0..3 {
        for (j, x) in evec.iter().enumerate() {
            out[i] += born_charges[j / 3][i][j % 3] * x.re;
        }
    }
    out
}
