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

pub mod born;
pub mod eigensols;
pub mod dielec_out;

pub use self::born::{BornInfo, BornInfoFile};
pub use self::eigensols::{EigensolFile, Raw as RawEigensols};
