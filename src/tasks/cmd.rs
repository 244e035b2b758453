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

use crate::FailResult;
use crate::config::ValidatedSettings;
use crate::filetypes::{BornInfoFile, EigensolFile};
use crate::filetypes::dielec_out::{write_dielectric_function, write_mode_charges};
use dielec_dielectric::{Dielec, PrimitiveCell, BornChargeProvider, V3};
use dielec_dielectric::compute_mode_effective_charge;
use dielec_dist::{Root, this_process_is_root};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything a run reads from disk, in the form the calculation consumes.
pub struct Inputs {
    pub cell: PrimitiveCell,
    pub born: BornInfoFile,
    pub solver: EigensolFile,
}

impl Inputs {
    /// The Born charges are not read until they are needed.
    pub fn from_settings(settings: &ValidatedSettings) -> FailResult<Inputs> {
        let cell = PrimitiveCell::from_amu(&settings.structure.masses, settings.structure.volume);

        let born = {
            BornInfoFile::new(settings.born_info.clone(), cell.num_atoms())
                .impose_sum_rule(settings.born_sum_rule)
        };

        let path = &settings.eigensols;
        let solver = {
            EigensolFile::load(path)?
                .with_projection_directions(settings.projection_directions.clone())
                .with_degeneracy_tol(settings.degeneracy_tol)
        };
        solver.eigensols().check_shape(cell.num_modes())
            .map_err(|e| format_err!("in '{}': {}", path.display(), e))?;

        Ok(Inputs { cell, born, solver })
    }
}

/// `PREFIX.ext`
pub fn output_path(prefix: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(prefix.as_os_str());
    s.push(".");
    s.push(ext);
    s.into()
}

/// The full run: the dielectric function followed by the mode effective charges.
///
/// Must be called on every process.  Output files are written by the root.
pub fn run_dielectric(
    root: &impl Root,
    settings: &ValidatedSettings,
    prefix: &Path,
) -> FailResult<()> {
    let Inputs { cell, mut born, solver } = Inputs::from_settings(settings)?;

    let local = match this_process_is_root(root) {
        true => Some((settings.dielectric, settings.dos.bounds())),
        false => None,
    };
    let mut dielec = Dielec::init(root, local, &mut born)?;
    if !dielec.is_enabled() {
        if this_process_is_root(root) {
            warn!("dielectric is not enabled in the settings; nothing to do");
        }
        return Ok(());
    }

    let series = dielec.run_dielec_calculation(&solver, &mut born, &cell)?;
    let epsilon_inf = match born.epsilon_inf() {
        Some(eps) => *eps,
        None => bail!("BORNINFO was not read"),
    };

    if this_process_is_root(root) {
        let path = output_path(prefix, "dielec");
        let mut file = dielec_fs_util::create(&path)?;
        write_dielectric_function(&mut file, series, &epsilon_inf)?;
        file.flush()?;
        info!("Dielectric function written to '{}'", path.display());
    }

    let zmode = compute_mode_effective_charge(&solver, &mut born, &cell, settings.normalize_zmode)?;
    write_zmode(root, &solver, &zmode, prefix)
}

/// Only the mode effective charges.
///
/// Must be called on every process.  Output files are written by the root.
pub fn run_zmode(
    root: &impl Root,
    settings: &ValidatedSettings,
    prefix: &Path,
    normalize: bool,
) -> FailResult<()> {
    let Inputs { cell, mut born, solver } = Inputs::from_settings(settings)?;

    if !born.is_initialized() {
        // read here for the diagnostics; the calculation itself is silent
        let verbosity = if this_process_is_root(root) { 1 } else { 0 };
        if born.is_configured() {
            born.setup_dielectric(verbosity)?;
        }
    }

    let zmode = compute_mode_effective_charge(&solver, &mut born, &cell, normalize)?;
    write_zmode(root, &solver, &zmode, prefix)
}

fn write_zmode(
    root: &impl Root,
    solver: &EigensolFile,
    zmode: &[V3],
    prefix: &Path,
) -> FailResult<()> {
    if this_process_is_root(root) {
        let path = output_path(prefix, "zmode");
        let mut file = dielec_fs_util::create(&path)?;
        write_mode_charges(&mut file, &solver.eigensols().eigenvalues, zmode)?;
        file.flush()?;
        info!("Mode effective charges written to '{}'", path.display());
    }
    Ok(())
}
