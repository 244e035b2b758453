//! A rocksalt-like diatomic crystal with a triply degenerate optical mode,
//! written to disk in the formats read by `dielec-tasks`.

#![allow(dead_code)]

use dielec_dielectric::Complex64;
use dielec_dielectric::units::{kayser_to_eigenvalue, AMU_RY};
use dielec_tasks::filetypes::RawEigensols;

use std::io::Write;
use std::path::{Path, PathBuf};

pub const MASSES: [f64; 2] = [24.305, 15.999];
pub const VOLUME: f64 = 130.0;
pub const CHARGE: f64 = 2.0;
pub const EPS_INF: f64 = 3.0;
/// cm^-1
pub const OPTICAL_FREQ: f64 = 400.0;

/// Reduced mass, AMU.
pub fn reduced_mass() -> f64 { MASSES[0] * MASSES[1] / (MASSES[0] + MASSES[1]) }

pub fn optical_eigenvalue() -> f64 { kayser_to_eigenvalue(OPTICAL_FREQ) }

/// `eps_xx - eps_inf` at `omega` (cm^-1), in closed form.
pub fn expected_ionic_eps(omega: f64) -> f64 {
    let w2 = kayser_to_eigenvalue(omega);
    let zu_sq = CHARGE * CHARGE / (AMU_RY * reduced_mass());
    8.0 * std::f64::consts::PI / VOLUME * zu_sq / (optical_eigenvalue() - w2)
}

fn c(x: f64) -> Complex64 { Complex64::new(x, 0.0) }

/// Three translations followed by the three optical modes.
pub fn eigensols() -> RawEigensols {
    let total = MASSES[0] + MASSES[1];
    let acoustic = [f64::sqrt(MASSES[0] / total), f64::sqrt(MASSES[1] / total)];
    let optical = [f64::sqrt(MASSES[1] / total), -f64::sqrt(MASSES[0] / total)];

    let mut eigenvalues = vec![];
    let mut eigenvectors = vec![];
    for &(value, weights) in &[(0.0, acoustic), (optical_eigenvalue(), optical)] {
        for axis in 0..3 {
            let mut evec = vec![c(0.0); 6];
            evec[axis] = c(weights[0]);
            evec[3 + axis] = c(weights[1]);
            eigenvalues.push(value);
            eigenvectors.push(evec);
        }
    }
    RawEigensols::from_eigensols(&dielec_dielectric::Eigensols { eigenvalues, eigenvectors })
}

pub fn borninfo_text() -> String {
    let mut s = String::from("# eps_inf\n");
    for row in 0..3 {
        let line = (0..3).map(|col| if row == col { EPS_INF } else { 0.0 });
        s += &line.map(|x| x.to_string()).collect::<Vec<_>>().join(" ");
        s += "\n";
    }
    for (atom, &charge) in [CHARGE, -CHARGE].iter().enumerate() {
        s += &format!("# atom {}\n", atom + 1);
        for row in 0..3 {
            let line = (0..3).map(|col| if row == col { charge } else { 0.0 });
            s += &line.map(|x| x.to_string()).collect::<Vec<_>>().join(" ");
            s += "\n";
        }
    }
    s
}

pub struct Setup {
    pub dielectric: bool,
    pub born_info: bool,
    pub extra: String,
}

impl Default for Setup {
    fn default() -> Self { Setup { dielectric: true, born_info: true, extra: String::new() } }
}

impl Setup {
    /// Returns the path to the settings file.
    pub fn write(&self, dir: &Path) -> PathBuf {
        let json = serde_json::to_string(&eigensols()).unwrap();
        std::fs::write(dir.join("eigensols.json"), json).unwrap();
        std::fs::write(dir.join("BORNINFO"), borninfo_text()).unwrap();

        let mut yaml = String::new();
        yaml += &format!("dielectric: {}\n", self.dielectric);
        if self.born_info {
            yaml += "born-info: BORNINFO\n";
        }
        yaml += "dos: { emin: 0.0, emax: 1000.0, delta-e: 30.0 }\n";
        yaml += &format!("structure: {{ volume: {}, masses: [{}, {}] }}\n", VOLUME, MASSES[0], MASSES[1]);
        yaml += "eigensols: eigensols.json\n";
        yaml += &self.extra;

        let path = dir.join("settings.yaml");
        std::fs::File::create(&path).unwrap().write_all(yaml.as_bytes()).unwrap();
        path
    }
}

/// Data lines of an output file.
pub fn read_table(path: &Path) -> Vec<Vec<f64>> {
    let text = std::fs::read_to_string(path).unwrap();
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split_whitespace().map(|x| x.parse().unwrap()).collect())
        .collect()
}

