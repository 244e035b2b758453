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

//! BORNINFO files.
//!
//! Whitespace-separated numbers.  The first nine are the high-frequency
//! dielectric tensor (row-major), followed by nine for each atom of the
//! primitive cell: the Born charge tensor with rows indexed by field
//! direction and columns by displacement direction.  Anything after a `#`
//! on a line is a comment.

use crate::FailResult;
use dielec_dielectric::{BornChargeProvider, Verbosity, M33};
use slice_of_array::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct BornInfo {
    pub epsilon_inf: M33,
    pub born_charges: Vec<M33>,
}

impl BornInfo {
    pub fn from_text(text: &str) -> FailResult<BornInfo> {
        let mut values = vec![];
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("");
            for word in line.split_whitespace() {
                let value: f64 = word.parse().map_err(|_| {
                    format_err!("line {}: expected a number, found {:?}", lineno + 1, word)
                })?;
                values.push(value);
            }
        }

        ensure!(
            values.len() % 9 == 0 && values.len() >= 18,
            "expected the dielectric tensor and at least one Born charge tensor \
             (a multiple of 9 numbers, at least 18), found {} numbers",
            values.len(),
        );

        let tensors: &[M33] = values.nest::<[_; 3]>().nest::<[_; 3]>();
        Ok(BornInfo {
            epsilon_inf: tensors[0],
            born_charges: tensors[1..].to_vec(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> FailResult<BornInfo> {
        let path = path.as_ref();
        let text = dielec_fs_util::read_to_string(path)?;
        BornInfo::from_text(&text).map_err(|e| format_err!("in '{}': {}", path.display(), e))
    }

    pub fn num_atoms(&self) -> usize { self.born_charges.len() }

    /// `sum_atoms Z*`, which vanishes for exact charges (acoustic sum rule).
    pub fn charge_sum(&self) -> M33 {
        let mut sum = [[0.0; 3]; 3];
        for z in &self.born_charges {
            for i in 0..3 {
                for j in 0..3 {
                    sum[i][j] += z[i][j];
                }
            }
        }
        sum
    }

    /// Spread the violation of the acoustic sum rule evenly over the atoms.
    pub fn impose_sum_rule(&mut self) {
        let sum = self.charge_sum();
        let natoms = self.num_atoms() as f64;
        for z in &mut self.born_charges {
            for i in 0..3 {
                for j in 0..3 {
                    z[i][j] -= sum[i][j] / natoms;
                }
            }
        }
    }
}

/// Born charges read lazily from a BORNINFO file.
///
/// No path means that no source was configured.
#[derive(Debug, Clone)]
pub struct BornInfoFile {
    path: Option<PathBuf>,
    sum_rule: bool,
    num_atoms: usize,
    data: Option<BornInfo>,
}

impl BornInfoFile {
    pub fn new(path: Option<PathBuf>, num_atoms: usize) -> Self
    { BornInfoFile { path, sum_rule: false, num_atoms, data: None } }

    pub fn impose_sum_rule(mut self, sum_rule: bool) -> Self
    { self.sum_rule = sum_rule; self }

    /// `None` until initialized.
    pub fn epsilon_inf(&self) -> Option<&M33>
    { self.data.as_ref().map(|d| &d.epsilon_inf) }
}

impl BornChargeProvider for BornInfoFile {
    fn is_configured(&self) -> bool { self.path.is_some() }

    fn is_initialized(&self) -> bool { self.data.is_some() }

    fn setup_dielectric(&mut self, verbosity: Verbosity) -> FailResult<()> {
        let path = match &self.path {
            Some(path) => path,
            None => bail!("no BORNINFO file was configured"),
        };
        let mut data = BornInfo::load(path)?;
        ensure!(
            data.num_atoms() == self.num_atoms,
            "'{}' has Born charges for {} atoms, but the primitive cell has {}",
            path.display(), data.num_atoms(), self.num_atoms,
        );

        if verbosity > 0 {
            info!("Dielectric constant tensor in Cartesian coordinate:");
            log_tensor(&data.epsilon_inf);
            info!("Born effective charge tensor in Cartesian coordinate:");
            for (atom, z) in data.born_charges.iter().enumerate() {
                info!("  Atom {}:", atom + 1);
                log_tensor(z);
            }
        }

        let sum = data.charge_sum();
        let violation = sum.iter().flat_map(|row| row.iter()).fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if verbosity > 0 {
            info!("Sum of Born charges (should vanish):");
            log_tensor(&sum);
        }
        if self.sum_rule {
            data.impose_sum_rule();
            if verbosity > 0 {
                info!("Acoustic sum rule imposed on Born charges (max violation was {:.3e})", violation);
            }
        } else if violation > 1e-2 {
            warn!("Born charges violate the acoustic sum rule by up to {:.3e}; consider born-sum-rule", violation);
        }

        self.data = Some(data);
        Ok(())
    }

    fn born_charges(&self) -> Option<&[M33]>
    { self.data.as_ref().map(|d| &d.born_charges[..]) }
}

fn log_tensor(m: &M33) {
    for row in m {
        info!("  {:>15.8} {:>15.8} {:>15.8}", row[0], row[1], row[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEXT: &str = "\
        # epsilon_inf
        3.0 0.0 0.0
        0.0 3.0 0.0
        0.0 0.0 3.5
        2.0 0.1 0.0   # atom 1
        0.0 2.0 0.0
        0.0 0.0 2.2
        -1.9 -0.1 0.0
        0.0 -2.1 0.0
        0.0 0.0 -2.0
    ";

    #[test]
    fn parse() {
        let born = BornInfo::from_text(TEXT).unwrap();
        assert_eq!(born.epsilon_inf[2][2], 3.5);
        assert_eq!(born.num_atoms(), 2);
        assert_eq!(born.born_charges[0][0], [2.0, 0.1, 0.0]);
        assert_eq!(born.born_charges[1][1][1], -2.1);
    }

    #[test]
    fn parse_errors() {
        assert!(BornInfo::from_text("1 2 3").is_err());
        assert!(BornInfo::from_text(&TEXT.replace("2.2", "two")).is_err());
    }

    #[test]
    fn sum_rule() {
        let mut born = BornInfo::from_text(TEXT).unwrap();
        assert_close!(abs=1e-12, born.charge_sum()[0][0], 0.1);
        born.impose_sum_rule();
        assert_close!(abs=1e-12, born.charge_sum(), [[0.0; 3]; 3]);
        assert_close!(abs=1e-12, born.born_charges[0][0][0], 1.95);
    }

    #[test]
    fn lazy_file() {
        let dir = tempdir::TempDir::new("dielec-born").unwrap();
        let path = dir.path().join("BORNINFO");
        std::fs::File::create(&path).unwrap().write_all(TEXT.as_bytes()).unwrap();

        let mut born = BornInfoFile::new(Some(path.clone()), 2);
        assert!(born.is_configured());
        assert!(!born.is_initialized());
        assert!(born.born_charges().is_none());

        born.setup_dielectric(0).unwrap();
        assert_eq!(born.born_charges().unwrap().len(), 2);
        assert_eq!(born.epsilon_inf().unwrap()[0][0], 3.0);

        let mut wrong_size = BornInfoFile::new(Some(path), 3);
        assert!(wrong_size.setup_dielectric(0).is_err());
    }

    #[test]
    fn unconfigured() {
        let born = BornInfoFile::new(None, 2);
        assert!(!born.is_configured());
    }
}
