/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Root;
use mpi::topology::{Process, SystemCommunicator};
use mpi::traits::{AsCommunicator, Communicator};

impl<'a, C: Communicator> Root for Process<'a, C> {
    fn is_root(&self) -> bool
    { self.as_communicator().rank() == mpi::traits::Root::root_rank(self) }

    fn broadcast_u64(&self, buf: &mut u64)
    { mpi::traits::Root::broadcast_into(self, buf) }

    fn broadcast_f64(&self, buf: &mut f64)
    { mpi::traits::Root::broadcast_into(self, buf) }
}

// Provides the default root: rank 0 of the world communicator.
//
// It is returned continuation-style because it is impossible to construct one that is `'static`.
pub fn with_default_root<R>(
    continuation: impl FnOnce(&Process<'_, SystemCommunicator>) -> R,
) -> R {
    let world = SystemCommunicator::world();
    trace!("MPI world has {} process(es); this is rank {}", world.size(), world.rank());
    let root = world.process_at_rank(0);
    continuation(&root)
}
