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

//! Plain-text outputs (`PREFIX.dielec`, `PREFIX.zmode`).

use crate::FailResult;
use dielec_dielectric::{DielectricSeries, M33, V3};
use dielec_dielectric::units::eigenvalue_to_kayser;
use std::io::Write;

/// One line per grid point: the frequency, then the nine components of the
/// total tensor `eps_inf + eps_ion(w)`, row-major.
pub fn write_dielectric_function(
    mut w: impl Write,
    series: &DielectricSeries,
    epsilon_inf: &M33,
) -> FailResult<()> {
    writeln!(w, "# Frequency-dependent dielectric tensor (ionic contribution + eps_inf)")?;
    writeln!(w, "# eps_inf:")?;
    for row in epsilon_inf {
        writeln!(w, "#   {:>15.8} {:>15.8} {:>15.8}", row[0], row[1], row[2])?;
    }
    writeln!(w, "# Omega (cm^-1), eps_xx, eps_xy, eps_xz, eps_yx, eps_yy, eps_yz, eps_zx, eps_zy, eps_zz")?;
    for (omega, eps) in series.iter() {
        write!(w, "{:>10.4}", omega)?;
        for i in 0..3 {
            for j in 0..3 {
                write!(w, " {:>15.7e}", epsilon_inf[i][j] + eps[i][j])?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// One line per mode: the 1-based index, the frequency, and the mode charge.
pub fn write_mode_charges(
    mut w: impl Write,
    eigenvalues: &[f64],
    zmode: &[V3],
) -> FailResult<()> {
    ensure!(
        eigenvalues.len() == zmode.len(),
        "{} eigenvalues but {} mode charges", eigenvalues.len(), zmode.len(),
    );
    writeln!(w, "# Mode effective charges (e/sqrt(amu))")?;
    writeln!(w, "# Mode, Frequency (cm^-1), Z_x, Z_y, Z_z")?;
    for (mode, (&eval, z)) in eigenvalues.iter().zip(zmode).enumerate() {
        writeln!(
            w, "{:>5} {:>12.4} {:>15.7e} {:>15.7e} {:>15.7e}",
            mode + 1, eigenvalue_to_kayser(eval), z[0], z[1], z[2],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dielec_dielectric::{BornCharges, Eigensols, PrimitiveCell, compute_dielectric_function};

    fn data_lines(text: &str) -> Vec<Vec<f64>> {
        text.lines()
            .filter(|line| !line.starts_with('#'))
            .map(|line| line.split_whitespace().map(|x| x.parse().unwrap()).collect())
            .collect()
    }

    #[test]
    fn dielectric_adds_eps_inf() {
        let sols = Eigensols {
            eigenvalues: vec![1e-6; 6],
            eigenvectors: vec![vec![Default::default(); 6]; 6],
        };
        let cell = PrimitiveCell::new(vec![1.0, 1.0], 10.0);
        let born = BornCharges(vec![[[0.0; 3]; 3]; 2]);
        let series = compute_dielectric_function(&[0.0, 5.0], &sols.eigenvalues, sols.eigenvectors, &born.0, &cell);
        let eps_inf = [[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]];

        let mut buf = vec![];
        write_dielectric_function(&mut buf, &series, &eps_inf).unwrap();
        let lines = data_lines(&String::from_utf8(buf).unwrap());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1][0], 5.0);
        assert_close!(lines[1][1..].to_vec(), vec![2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn mode_charges() {
        let mut buf = vec![];
        write_mode_charges(&mut buf, &[0.0, 1.0], &[[0.0; 3], [1.0, -2.0, 0.5]]).unwrap();
        let lines = data_lines(&String::from_utf8(buf).unwrap());
        assert_eq!(lines[1][0], 2.0);
        assert_close!(rel=1e-6, lines[1][1], 109737.3157);
        assert_close!(lines[1][2..].to_vec(), vec![1.0, -2.0, 0.5]);

        assert!(write_mode_charges(vec![], &[0.0], &[]).is_err());
    }
}
