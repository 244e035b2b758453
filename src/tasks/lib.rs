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

//! The application layer: settings, input/output files, the file-backed
//! phonon and Born charge sources, and the binaries' entry points.

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[macro_use] extern crate serde_derive;
#[cfg(test)]
#[macro_use] extern crate dielec_assert_close;

pub type FailResult<T> = Result<T, failure::Error>;

pub mod config;
pub mod filetypes;
pub mod cmd;
pub mod entry_points;
mod ui;

pub use crate::config::{Settings, ValidatedSettings};
pub use crate::cmd::{Inputs, run_dielectric, run_zmode};
pub use crate::ui::logging::GlobalLogger;
