/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{FailResult, V3, M33, ZONE_CENTER};
use crate::engine::project_born_charges;
use crate::provider::{
    BornChargeProvider, DynamicalSolver, PrimitiveCell,
    require_born_charges, check_eigenvector_shape,
};
use crate::units::AMU_RY;
use num_complex::Complex64;

/// Unnormalized mode effective charges of every zone-center mode.
pub fn get_zstar_mode(
    solver: &impl DynamicalSolver,
    born: &mut impl BornChargeProvider,
    cell: &PrimitiveCell,
) -> FailResult<Vec<V3>> {
    compute_mode_effective_charge(solver, born, cell, false)
}

/// Mode effective charges at q = 0, Eq. (53) of Gonze & Lee (1997)
/// or, without `do_normalize`, its numerator.
///
/// Acoustic modes are included.  If the solver has projection directions,
/// degenerate eigenvectors are resolved along them first.
pub fn compute_mode_effective_charge(
    solver: &impl DynamicalSolver,
    born: &mut impl BornChargeProvider,
    cell: &PrimitiveCell,
    do_normalize: bool,
) -> FailResult<Vec<V3>> {
    let zstar_atom = require_born_charges(born, "compute_mode_effective_charge", 0)?;
    ensure!(
        zstar_atom.len() == cell.num_atoms(),
        "{} Born charge tensors for {} atoms", zstar_atom.len(), cell.num_atoms(),
    );

    let directions = solver.projection_directions();
    let eigenvectors = match directions.is_empty() {
        true => solver.eval_k(ZONE_CENTER)?.eigenvectors,
        false => {
            debug!("resolving degenerate modes along {} direction(s)", directions.len());
            solver.project_degenerate_eigenvectors(ZONE_CENTER, directions)?
        },
    };
    check_eigenvector_shape(&eigenvectors, cell.num_modes())?;

    Ok(mode_effective_charges(eigenvectors, zstar_atom, cell, do_normalize))
}

/// The kernel of [`compute_mode_effective_charge`], for eigenvectors that are
/// already at hand.
///
/// Eigenvectors are divided by `sqrt(mass / AMU_RY)`, i.e. the square root of the
/// mass in AMU.  (Not the same normalization as the dielectric function, which
/// uses the mass in internal units.)  A mode with a vanishing norm is left
/// unnormalized.
///
/// # Panics
///
/// Panics if the dimensions of the inputs disagree with `cell`.
pub fn mode_effective_charges(
    mut eigenvectors: Vec<Vec<Complex64>>,
    born_charges: &[M33],
    cell: &PrimitiveCell,
    do_normalize: bool,
) -> Vec<V3> {
    let ns = cell.num_modes();
    assert_eq!(eigenvectors.len(), ns, "wrong number of eigenvectors!");
    assert_eq!(born_charges.len(), cell.num_atoms(), "wrong number of Born charges!");

    let masses = cell.masses();
    eigenvectors.iter_mut()
        .map(|evec| {
            assert_eq!(evec.len(), ns, "wrong eigenvector length!");
            for (j, x) in evec.iter_mut().enumerate() {
                *x /= f64::sqrt(masses[j / 3] / AMU_RY);
            }

            let mut zmode = project_born_charges(born_charges, evec);
            let norm: f64 = evec.iter().map(|x| x.norm_sqr()).sum();
            if do_normalize && norm > 0.0 {
                for z in &mut zmode {
                    *z /= f64::sqrt(norm);
                }
            }
            zmode
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BornCharges, DielecError, Eigensols};

    const EYE: M33 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn c(re: f64) -> Complex64 { Complex64::new(re, 0.0) }

    // Some orthonormal-ish vectors; the charges don't care.
    fn eigensols() -> Eigensols {
        let eigenvectors = vec![
            vec![c(0.6), c(0.0), c(0.0), c(0.8), c(0.0), c(0.0)],
            vec![c(0.0), c(0.6), c(0.0), c(0.0), c(0.8), c(0.0)],
            vec![c(0.0), c(0.0), c(0.6), c(0.0), c(0.0), c(0.8)],
            vec![c(0.8), c(0.0), c(0.0), c(-0.6), c(0.0), c(0.0)],
            vec![c(0.0), c(0.8), c(0.3), c(0.0), c(-0.6), c(0.1)],
            vec![c(0.2), c(0.1), c(0.8), c(-0.1), c(0.0), c(-0.6)],
        ];
        Eigensols { eigenvalues: vec![0.0, 0.0, 0.0, 1e-6, 2e-6, 3e-6], eigenvectors }
    }

    #[test]
    fn zero_charges() {
        let cell = PrimitiveCell::from_amu(&[12.0, 1.0], 80.0);
        let mut born = BornCharges(vec![[[0.0; 3]; 3]; 2]);
        let zmode = get_zstar_mode(&eigensols(), &mut born, &cell).unwrap();
        assert_eq!(zmode, vec![[0.0; 3]; 6]);
    }

    #[test]
    fn includes_acoustic_modes() {
        // Uniform charges on a uniform translation give the sum of the charges.
        let cell = PrimitiveCell::from_amu(&[1.0, 1.0], 80.0);
        let mut born = BornCharges(vec![EYE, EYE]);
        let zmode = get_zstar_mode(&eigensols(), &mut born, &cell).unwrap();
        assert_eq!(zmode.len(), 6);
        assert_close!(rel=1e-12, zmode[0], [1.4, 0.0, 0.0]);
        assert_close!(rel=1e-12, zmode[3], [0.2, 0.0, 0.0]);
    }

    #[test]
    fn mass_normalization_uses_amu() {
        let cell = PrimitiveCell::from_amu(&[4.0, 16.0], 80.0);
        let mut born = BornCharges(vec![EYE, EYE]);
        let zmode = get_zstar_mode(&eigensols(), &mut born, &cell).unwrap();
        // 0.6 / sqrt(4) + 0.8 / sqrt(16)
        assert_close!(rel=1e-12, zmode[0][0], 0.5);
    }

    #[test]
    fn normalized_single_atom_charges_are_unit() {
        // One atom with identity charge: zmode is the displacement itself.
        let cell = PrimitiveCell::from_amu(&[7.0], 80.0);
        let r3 = f64::sqrt(1.0 / 3.0);
        let eigenvectors = vec![
            vec![c(1.0), c(0.0), c(0.0)],
            vec![c(0.0), c(-0.6), c(0.8)],
            vec![c(r3), c(r3), c(-r3)],
        ];
        let sols = Eigensols { eigenvalues: vec![0.0; 3], eigenvectors };
        let mut born = BornCharges(vec![EYE]);

        let zmode = compute_mode_effective_charge(&sols, &mut born, &cell, true).unwrap();
        for z in zmode {
            assert_close!(rel=1e-12, z.iter().map(|x| x * x).sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn zero_norm_mode_is_left_alone() {
        let cell = PrimitiveCell::from_amu(&[7.0], 80.0);
        let eigenvectors = vec![vec![c(0.0); 3]; 3];
        let out = mode_effective_charges(eigenvectors, &[EYE], &cell, true);
        assert_eq!(out, vec![[0.0; 3]; 3]);
    }

    #[test]
    fn requires_born_charges() {
        let cell = PrimitiveCell::from_amu(&[12.0, 1.0], 80.0);
        let mut born = None::<BornCharges>;
        let err = get_zstar_mode(&eigensols(), &mut born, &cell).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DielecError>(),
            Some(DielecError::MissingBornCharges { operation: "compute_mode_effective_charge" })
        ));
    }

    struct Projecting {
        sols: Eigensols,
        directions: Vec<Vec<f64>>,
    }

    impl DynamicalSolver for Projecting {
        fn num_modes(&self) -> usize { self.sols.num_modes() }
        fn eval_k(&self, _: V3) -> FailResult<Eigensols> {
            panic!("should have projected")
        }
        fn projection_directions(&self) -> &[Vec<f64>] { &self.directions }
        fn project_degenerate_eigenvectors(&self, _: V3, directions: &[Vec<f64>]) -> FailResult<Vec<Vec<Complex64>>> {
            assert_eq!(directions.len(), 1);
            let mut evecs = self.sols.eigenvectors.clone();
            evecs.reverse();
            Ok(evecs)
        }
    }

    #[test]
    fn uses_projection_when_directions_exist() {
        let cell = PrimitiveCell::from_amu(&[1.0, 1.0], 80.0);
        let solver = Projecting { sols: eigensols(), directions: vec![vec![1.0; 6]] };
        let mut born = BornCharges(vec![EYE, EYE]);

        let direct = get_zstar_mode(&eigensols(), &mut born, &cell).unwrap();
        let mut projected = get_zstar_mode(&solver, &mut born, &cell).unwrap();
        projected.reverse();
        assert_eq!(direct, projected);
    }
}
