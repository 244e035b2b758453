//! Frequency-dependent dielectric tensor and mode effective charges.
//!
//! The binaries live in `dielec-tasks`; this crate only gathers the workspace.

pub use dielec_dielectric as dielectric;
pub use dielec_tasks as tasks;
