/* ********************************************************************** **
**  This file is part of dielec.                                          **
**                                                                        **
**  dielec is free software: you can redistribute it and/or modify it     **
**  under the terms of the GNU General Public License as published by the **
**  Free Software Foundation, either version 3 of the License, or (at     **
**  your option) any later version.                                       **
**                                                                        **
**      http://www.gnu.org/licenses/                                      **
**                                                                        **
** Do note that, while the whole of dielec is licensed under the GPL,     **
** many parts of it are licensed under more permissive terms.             **
** ********************************************************************** */

//! Settings file.
//!
//! Unknown keys are reported (possible typos) but otherwise ignored.

#![allow(non_snake_case)]

// NOTE: Please make sure to use the YamlRead trait!
//       DO NOT USE serde_yaml::from_{reader,value,etc.} OUTSIDE THIS MODULE.

use crate::FailResult;
use dielec_dielectric::GridBounds;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Provides an alternative to serde_yaml::from_reader that warns about unused keys.
pub trait YamlRead: for<'de> serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, serde_yaml::Error> {
        // serde_ignored needs a Deserializer, which serde_yaml only exposes through Value.
        Self::from_value(serde_yaml::from_reader(r)?)
    }

    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: serde_yaml::Value) -> Result<$Type, serde_yaml::Error> {
                serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Compute the frequency-dependent dielectric function.
    #[serde(default)]
    pub dielectric: bool,

    /// BORNINFO file with the high-frequency dielectric tensor and the Born
    /// effective charges of each atom.  Required when `dielectric` is set.
    #[serde(default)]
    pub born_info: Option<PathBuf>,

    /// Impose the acoustic sum rule on the Born charges after reading them.
    #[serde(default)]
    pub born_sum_rule: bool,

    pub dos: Dos,

    pub structure: Structure,

    /// Zone-center eigensolutions of the dynamical matrix.
    pub eigensols: PathBuf,

    /// Vectors in the mass-weighted basis of the eigenvectors (one value per
    /// Cartesian degree of freedom) used to resolve degenerate modes for mode
    /// effective charges.
    #[serde(default)]
    pub projection_directions: Vec<Vec<f64>>,

    /// Modes whose frequencies differ by less than this (cm^-1) are degenerate.
    #[serde(default = "_settings__degeneracy_tol")]
    pub degeneracy_tol: f64,

    /// Divide mode effective charges by the norm of the displacement.
    #[serde(default)]
    pub normalize_zmode: bool,
}
fn _settings__degeneracy_tol() -> f64 { 1e-3 }
derive_yaml_read!{Settings}

/// Spectrum bounds, in cm^-1.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Dos {
    #[serde(default)]
    pub emin: f64,
    pub emax: f64,
    #[serde(default = "_dos__delta_e")]
    pub delta_e: f64,
}
fn _dos__delta_e() -> f64 { 1.0 }

impl Dos {
    pub fn bounds(&self) -> GridBounds {
        GridBounds { emin: self.emin, emax: self.emax, delta_e: self.delta_e }
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Structure {
    /// Volume of the primitive cell, in bohr^3.
    pub volume: f64,
    /// Mass of each atom in the primitive cell, in AMU.
    pub masses: Vec<f64>,
}

/// Settings that passed `Settings::validate`, with paths made absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings(pub Settings);

impl std::ops::Deref for ValidatedSettings {
    type Target = Settings;
    fn deref(&self) -> &Settings { &self.0 }
}

impl Settings {
    /// Read, resolve paths relative to the file's directory, and validate.
    pub fn load(path: impl AsRef<Path>) -> FailResult<ValidatedSettings> {
        let path = path.as_ref();
        let settings: Settings = YamlRead::from_reader(dielec_fs_util::open_text(path)?)
            .map_err(|e| format_err!("in '{}': {}", path.display(), e))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        settings.resolve_paths(base).validate()
    }

    pub fn resolve_paths(mut self, base: &Path) -> Settings {
        self.born_info = self.born_info.map(|p| dielec_fs_util::resolve_relative(base, p));
        self.eigensols = dielec_fs_util::resolve_relative(base, &self.eigensols);
        self
    }

    pub fn validate(self) -> FailResult<ValidatedSettings> {
        let Dos { emin, emax, delta_e } = self.dos;
        ensure!(delta_e > 0.0, "dos.delta-e must be positive (got {})", delta_e);
        ensure!(emax > emin, "dos.emax ({}) must exceed dos.emin ({})", emax, emin);

        ensure!(self.structure.volume > 0.0, "structure.volume must be positive");
        ensure!(!self.structure.masses.is_empty(), "structure.masses is empty");
        if let Some(bad) = self.structure.masses.iter().find(|&&m| !(m > 0.0)) {
            bail!("structure.masses must be positive (found {})", bad);
        }
        ensure!(self.degeneracy_tol >= 0.0, "degeneracy-tol cannot be negative");

        let ns = 3 * self.structure.masses.len();
        for (i, direction) in self.projection_directions.iter().enumerate() {
            ensure!(
                direction.len() == ns,
                "projection direction {} has {} components; expected {} (3 per atom)",
                i, direction.len(), ns,
            );
        }

        if self.dielectric && self.born_info.is_none() {
            // not an error until something actually needs the charges
            warn!("dielectric = true but born-info is not set");
        }
        Ok(ValidatedSettings(self))
    }
}
