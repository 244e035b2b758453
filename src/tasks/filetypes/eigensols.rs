/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of dielec is provided under this permissive        **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

use crate::FailResult;
use dielec_dielectric::{Complex64, DynamicalSolver, Eigensols, V3, ZONE_CENTER};
use dielec_dielectric::units::eigenvalue_to_kayser;
use std::path::Path;

// Serializable form of a zone-center eigensolution, as written by an
// external diagonalizer.
//
// Each **row** is a column eigenvector, split into real and imaginary parts.
// Eigenvalues are in the internal (Rydberg) unit, ascending.

type Eigenvalue = f64;

#[derive(Debug, Clone)]
#[derive(Serialize, Deserialize)]
pub struct Raw(pub Vec<Eigenvalue>, pub (Vec<Vec<f64>>, Vec<Vec<f64>>));

impl Raw {
    pub fn into_eigensols(self) -> FailResult<Eigensols> {
        let Raw(vals, (real, imag)) = self;

        if vals.len() != real.len() || vals.len() != imag.len() {
            bail!("mismatched lengths in eigensols file")
        }

        let mut eigenvectors = vec![];
        for (real, imag) in real.into_iter().zip(imag) {
            ensure!(real.len() == imag.len(), "mismatched real and imaginary parts in eigensols file");
            eigenvectors.push({
                real.into_iter().zip(imag)
                    .map(|(re, im)| Complex64::new(re, im))
                    .collect::<Vec<_>>()
            });
        }
        Ok(Eigensols { eigenvalues: vals, eigenvectors })
    }

    pub fn from_eigensols(sols: &Eigensols) -> Raw {
        let real = sols.eigenvectors.iter().map(|ev| ev.iter().map(|c| c.re).collect()).collect();
        let imag = sols.eigenvectors.iter().map(|ev| ev.iter().map(|c| c.im).collect()).collect();
        Raw(sols.eigenvalues.clone(), (real, imag))
    }

    pub fn load(path: impl AsRef<Path>) -> FailResult<Raw> {
        let path = path.as_ref();
        let file = dielec_fs_util::open(path)?;
        serde_json::from_reader(file)
            .map_err(|e| format_err!("while reading '{}': {}", path.display(), e))
    }
}

/// Eigensolutions loaded from disk, acting as the dynamical solver.
///
/// Only the zone center is available.
#[derive(Debug, Clone)]
pub struct EigensolFile {
    sols: Eigensols,
    directions: Vec<Vec<f64>>,
    /// cm^-1
    degeneracy_tol: f64,
}

impl EigensolFile {
    pub fn new(sols: Eigensols) -> Self
    { EigensolFile { sols, directions: vec![], degeneracy_tol: 1e-3 } }

    pub fn load(path: impl AsRef<Path>) -> FailResult<Self>
    { Ok(EigensolFile::new(Raw::load(path)?.into_eigensols()?)) }

    pub fn with_projection_directions(mut self, directions: Vec<Vec<f64>>) -> Self
    { self.directions = directions; self }

    pub fn with_degeneracy_tol(mut self, tol: f64) -> Self
    { self.degeneracy_tol = tol; self }

    pub fn eigensols(&self) -> &Eigensols { &self.sols }

    /// Ranges of consecutive modes whose frequencies agree within the tolerance.
    pub fn degenerate_groups(&self) -> Vec<std::ops::Range<usize>> {
        let freqs: Vec<_> = self.sols.eigenvalues.iter().cloned().map(eigenvalue_to_kayser).collect();
        let mut groups = vec![];
        let mut start = 0;
        for i in 1..=freqs.len() {
            if i == freqs.len() || (freqs[i] - freqs[i - 1]).abs() > self.degeneracy_tol {
                groups.push(start..i);
                start = i;
            }
        }
        groups
    }
}

impl DynamicalSolver for EigensolFile {
    fn num_modes(&self) -> usize { self.sols.num_modes() }

    fn eval_k(&self, qpoint: V3) -> FailResult<Eigensols> {
        ensure!(qpoint == ZONE_CENTER, "eigensols file only has the zone center (requested {:?})", qpoint);
        Ok(self.sols.clone())
    }

    fn projection_directions(&self) -> &[Vec<f64>] { &self.directions }

    fn project_degenerate_eigenvectors(
        &self,
        qpoint: V3,
        directions: &[Vec<f64>],
    ) -> FailResult<Vec<Vec<Complex64>>> {
        ensure!(qpoint == ZONE_CENTER, "eigensols file only has the zone center (requested {:?})", qpoint);
        let ns = self.num_modes();
        if let Some(bad) = directions.iter().position(|d| d.len() != ns) {
            bail!("projection direction {} has {} components, expected {}", bad, directions[bad].len(), ns);
        }

        let mut out = self.sols.eigenvectors.clone();
        for group in self.degenerate_groups() {
            if group.len() < 2 {
                continue;
            }
            let original = &self.sols.eigenvectors[group.clone()];
            let projected = project_into_span(original, directions);
            trace!("modes {}..{}: {} of {} vectors fixed by projection", group.start, group.end, projected.len(), group.len());
            let completed = complete_basis(projected, original);
            for (slot, vec) in out[group].iter_mut().zip(completed) {
                *slot = vec;
            }
        }
        Ok(out)
    }
}

const ZERO_NORM: f64 = 1e-8;

fn dot(a: &[Complex64], b: &[Complex64]) -> Complex64
{ a.iter().zip(b).map(|(a, b)| a.conj() * b).sum() }

fn norm(a: &[Complex64]) -> f64
{ a.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt() }

/// Remove the components along `basis` (orthonormal) and normalize.
///
/// `None` if nothing is left.
fn orthonormalize_against(mut v: Vec<Complex64>, basis: &[Vec<Complex64>]) -> Option<Vec<Complex64>> {
    for b in basis {
        let coeff = dot(b, &v);
        for (x, y) in v.iter_mut().zip(b) {
            *x -= coeff * y;
        }
    }
    let norm = norm(&v);
    if norm < ZERO_NORM {
        return None;
    }
    v.iter_mut().for_each(|x| *x /= norm);
    Some(v)
}

/// Orthonormal vectors in the span of `space` obtained from `directions`.
fn project_into_span(space: &[Vec<Complex64>], directions: &[Vec<f64>]) -> Vec<Vec<Complex64>> {
    let mut found: Vec<Vec<Complex64>> = vec![];
    for direction in directions {
        if found.len() == space.len() {
            break;
        }
        let direction: Vec<_> = direction.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        let mut projection = vec![Complex64::new(0.0, 0.0); direction.len()];
        for e in space {
            let coeff = dot(e, &direction);
            for (p, x) in projection.iter_mut().zip(e) {
                *p += coeff * x;
            }
        }
        if let Some(v) = orthonormalize_against(projection, &found) {
            found.push(v);
        }
    }
    found
}

/// Extend an orthonormal set to span the same space as `space`.
fn complete_basis(mut found: Vec<Vec<Complex64>>, space: &[Vec<Complex64>]) -> Vec<Vec<Complex64>> {
    for e in space {
        if found.len() == space.len() {
            break;
        }
        if let Some(v) = orthonormalize_against(e.clone(), &found) {
            found.push(v);
        }
    }
    found
}
