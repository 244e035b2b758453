/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Physical constants and the unit conversions used by the core.
//!
//! Internal units are Rydberg atomic units: lengths in bohr, masses in
//! units of `2 m_e`, and phonon eigenvalues are squared angular frequencies
//! in inverse Rydberg time.  Spectra are sampled in cm^-1 (kayser).

use std::f64::consts::PI;

/// kg
pub const AMU: f64 = 1.660538782e-27;
/// kg
pub const ELECTRON_MASS: f64 = 9.10938215e-31;
/// m/s
pub const C_LIGHT: f64 = 299792458.0;
/// J s
pub const H_PLANCK: f64 = 6.62606896e-34;
/// J
pub const RYDBERG: f64 = 4.35974394e-18 / 2.0;

/// The Rydberg unit of time, in seconds.
pub const TIME_RY: f64 = H_PLANCK / (2.0 * PI) / RYDBERG;

/// Angular frequency in rad/s to wavenumber in cm^-1.
pub const HZ_TO_KAYSER: f64 = 1.0e-2 / (2.0 * PI * C_LIGHT);

/// One atomic mass unit in the internal mass unit.
pub const AMU_RY: f64 = AMU / ELECTRON_MASS / 2.0;

/// Multiplies a squared wavenumber (cm^-2) to give a squared angular
/// frequency in the unit of the phonon eigenvalues.
pub const KAYSER_TO_RY_SQ: f64 = TIME_RY * TIME_RY / (HZ_TO_KAYSER * HZ_TO_KAYSER);

/// Converts an eigenvalue to a frequency in cm^-1.
///
/// Negative eigenvalues (imaginary modes) produce negative frequencies.
pub fn eigenvalue_to_kayser(eigenvalue: f64) -> f64 {
    f64::signum(eigenvalue) * f64::sqrt(f64::abs(eigenvalue)) / TIME_RY * HZ_TO_KAYSER
}

/// Inverse of [`eigenvalue_to_kayser`].
pub fn kayser_to_eigenvalue(kayser: f64) -> f64 {
    f64::signum(kayser) * kayser * kayser * KAYSER_TO_RY_SQ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kayser_roundtrip() {
        for &freq in &[1.0, 345.6, -12.0] {
            assert_close!(rel=1e-12, eigenvalue_to_kayser(kayser_to_eigenvalue(freq)), freq);
        }
    }

    #[test]
    fn known_magnitudes() {
        // (1 Ry / hbar) / (2 pi c) is the Rydberg constant
        assert_close!(rel=1e-8, eigenvalue_to_kayser(1.0), 109737.3157);
        // m_u / (2 m_e)
        assert_close!(rel=1e-8, AMU_RY, 911.444_242_1);
    }
}
