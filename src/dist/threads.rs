/* ************************************************************************ **
** This file is part of dielec, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! A `Root` whose "processes" are threads of this process.
//!
//! Handy for exercising coordinator/worker code paths without an MPI
//! installation.  Every member of the group must make the same sequence
//! of broadcast calls, exactly like MPI ranks.

use crate::Root;
use std::sync::{Arc, Barrier, Mutex};

#[derive(Debug)]
struct Shared {
    barrier: Barrier,
    slot: Mutex<u64>,
}

#[derive(Debug, Clone)]
pub struct ThreadRoot {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl ThreadRoot {
    /// Members of a group of `size` threads.  Member 0 is the coordinator.
    pub fn group(size: usize) -> Vec<ThreadRoot> {
        assert!(size > 0, "empty thread group");
        let shared = Arc::new(Shared {
            barrier: Barrier::new(size),
            slot: Mutex::new(0),
        });
        (0..size).map(|rank| ThreadRoot { rank, size, shared: shared.clone() }).collect()
    }

    pub fn rank(&self) -> usize { self.rank }

    pub fn size(&self) -> usize { self.size }
}

impl Root for ThreadRoot {
    fn is_root(&self) -> bool { self.rank == 0 }

    fn broadcast_u64(&self, buf: &mut u64) {
        if self.is_root() {
            *self.shared.slot.lock().unwrap() = *buf;
        }
        self.shared.barrier.wait();
        if !self.is_root() {
            *buf = *self.shared.slot.lock().unwrap();
        }
        // keep the coordinator from overwriting the slot before everyone has read it
        self.shared.barrier.wait();
    }
}
