use std::sync::atomic::{AtomicBool, Ordering};

/// Current connectivity signal, consulted before choosing between a direct
/// write and the offline queue.
pub trait Connectivity {
    fn is_online(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Online;

impl Connectivity for Online {
    fn is_online(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Connectivity for Offline {
    fn is_online(&self) -> bool {
        false
    }
}

/// A flag flipped by whoever observes the network.
#[derive(Debug, Default)]
pub struct ManualConnectivity {
    online: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Connectivity for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

impl<C: Connectivity + ?Sized> Connectivity for &C {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}
