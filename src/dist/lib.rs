/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! One-shot distribution of scalar configuration from a coordinator to
//! every worker.
//!
//! Every process constructs the same value by calling [`Broadcast::broadcast`]
//! at the same point of execution; the coordinator supplies `Some(value)` and
//! everybody else supplies `None`.  This is a blocking collective: nobody gets
//! past it until the coordinator has arrived with its value.
//!
//! After the broadcast there is no further communication.  Each process redoes
//! the full computation on its own copy of the inputs.

#[macro_use]
extern crate log;

pub mod threads;
#[cfg(feature = "mpi-support")]
mod mpi_root;

/// A communicator with a designated coordinator.
///
/// The broadcast methods overwrite `buf` with the coordinator's value on
/// every process, and are no-ops on the coordinator itself.
pub trait Root {
    fn is_root(&self) -> bool;

    fn broadcast_u64(&self, buf: &mut u64);

    fn broadcast_f64(&self, buf: &mut f64) {
        let mut bits = buf.to_bits();
        self.broadcast_u64(&mut bits);
        *buf = f64::from_bits(bits);
    }
}

/// The trivial communicator of a single-process run.
#[derive(Debug, Default, Copy, Clone)]
pub struct SerialRoot;

impl Root for SerialRoot {
    fn is_root(&self) -> bool { true }

    fn broadcast_u64(&self, _: &mut u64) {}

    fn broadcast_f64(&self, _: &mut f64) {}
}

/// Whether the calling process is the coordinator, i.e. the one that
/// supplies broadcast values and writes output.
pub fn this_process_is_root(root: &impl Root) -> bool { root.is_root() }

/// Helper trait to broadcast data from the root process to all processes,
/// including types with no default.
pub trait Broadcast: Sized {
    /// Broadcast a value from the root to other processes.
    ///
    /// The value of `value` is ignored on non-root processes, and must be `Some`
    /// on the root.
    fn broadcast(root: &impl Root, value: Option<Self>) -> Self;
}

// Adapts a `broadcast_into`-style function into a `Broadcast` impl,
// given the existence of a `Default` impl.
fn broadcast_via_mut_ref<T, R>(
    root: &R,
    value: Option<T>,
    broadcast_into: impl FnOnce(&R, &mut T),
) -> T
where
    R: Root,
    T: Default,
{
    if root.is_root() && value.is_none() {
        panic!("root did not provide value to broadcast");
    }
    let mut buf = value.unwrap_or_else(Default::default);
    broadcast_into(root, &mut buf);
    buf
}

impl Broadcast for u64 {
    fn broadcast(root: &impl Root, value: Option<u64>) -> u64
    { broadcast_via_mut_ref(root, value, |root, buf| root.broadcast_u64(buf)) }
}

impl Broadcast for f64 {
    fn broadcast(root: &impl Root, value: Option<f64>) -> f64
    { broadcast_via_mut_ref(root, value, |root, buf| root.broadcast_f64(buf)) }
}

// integers that travel as a u64
macro_rules! impl_broadcast_via_u64 {
    ($($T:ident)*) => {$(
        impl Broadcast for $T {
            fn broadcast(root: &impl Root, value: Option<$T>) -> $T {
                let wide = Broadcast::broadcast(root, value.map(|x| x as u64));
                wide as $T
            }
        }
    )*};
}
impl_broadcast_via_u64! { u32 usize }

impl Broadcast for bool {
    fn broadcast(root: &impl Root, value: Option<bool>) -> bool {
        let flag: u64 = Broadcast::broadcast(root, value.map(|x| x as u64));
        flag != 0
    }
}

/// Defines a struct along with a `Broadcast` impl that broadcasts each field
/// in declaration order.
#[macro_export]
macro_rules! derive_broadcast {
    ($(
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $Field:ty ),* $(,)*
        }
    )*) => {$(
        $(#[$meta])*
        $vis struct $Name { $( $(#[$fmeta])* $fvis $field : $Field ),* }

        impl $crate::Broadcast for $Name {
            fn broadcast(root: &impl $crate::Root, value: Option<Self>) -> Self {
                match value {
                    Some($Name { $($field),* }) => {
                        $(
                            let $field = $crate::Broadcast::broadcast(root, Some($field));
                        )*
                        $Name { $($field),* }
                    },
                    None => {
                        $(
                            let $field = $crate::Broadcast::broadcast(root, None);
                        )*
                        $Name { $($field),* }
                    },
                }
            }
        }
    )*};
}

/// The world communicator's rank-0 process, or the serial root when built
/// without MPI.
///
/// Returned continuation-style because an MPI `Process` borrows the
/// communicator it came from.
#[cfg(not(feature = "mpi-support"))]
pub fn with_default_root<R>(continuation: impl FnOnce(&SerialRoot) -> R) -> R {
    trace!("running without MPI");
    continuation(&SerialRoot)
}

#[cfg(feature = "mpi-support")]
pub use crate::mpi_root::with_default_root;

#[cfg(test)]
mod tests {
    use super::*;

    derive_broadcast! {
        #[derive(Debug, Clone, PartialEq)]
        struct Scalars {
            flag: bool,
            count: usize,
            value: f64,
        }
    }

    #[test]
    fn serial_broadcast_is_identity() {
        let scalars = Scalars { flag: true, count: 7, value: -2.5 };
        let out = Broadcast::broadcast(&SerialRoot, Some(scalars.clone()));
        assert_eq!(out, scalars);
    }

    #[test]
    #[should_panic(expected = "root did not provide")]
    fn root_must_provide() {
        let _: f64 = Broadcast::broadcast(&SerialRoot, None);
    }

    #[test]
    fn threaded_broadcast_reaches_everyone() {
        let roots = threads::ThreadRoot::group(4);
        let handles = roots.into_iter().map(|root| {
            std::thread::spawn(move || {
                let local = match root.is_root() {
                    true => Some(Scalars { flag: true, count: 1000, value: 0.1 + 0.2 }),
                    false => None,
                };
                Scalars::broadcast(&root, local)
            })
        }).collect::<Vec<_>>();

        for handle in handles {
            let out = handle.join().unwrap();
            assert_eq!(out, Scalars { flag: true, count: 1000, value: 0.1 + 0.2 });
            assert_eq!(out.value.to_bits(), (0.1f64 + 0.2).to_bits());
        }
    }
}
