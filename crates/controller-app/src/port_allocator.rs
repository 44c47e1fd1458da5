//! Per-compute console and UDP tunnel port reservation (§4.1).
//!
//! One allocator instance per registered compute; the Controller Core
//! owns a `DashMap<ComputeId, PortAllocator>` so each compute's ranges
//! are independent and the "compute-scoped mutex" of §5 falls out of
//! dashmap's per-shard locking rather than a hand-rolled lock table.

use std::collections::BTreeSet;
use std::sync::Mutex;

use thiserror::Error;

use gns3_domain_types::ErrorCode;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PortAllocationError {
    #[error("no free port available in the configured range")]
    NoPortAvailable,
    #[error("port {0} is already reserved")]
    AlreadyReserved(u16),
}

impl ErrorCode for PortAllocationError {
    fn code(&self) -> &'static str {
        match self {
            PortAllocationError::NoPortAvailable => "PORT_NO_PORT_AVAILABLE",
            PortAllocationError::AlreadyReserved(_) => "PORT_ALREADY_RESERVED",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

/// Default console range per §4.1.
pub const DEFAULT_CONSOLE_RANGE: PortRange = PortRange::new(5000, 10000);
/// Default UDP tunnel range per §4.1.
pub const DEFAULT_UDP_RANGE: PortRange = PortRange::new(10000, 20000);

struct Ranges {
    console_range: PortRange,
    udp_range: PortRange,
    console_reserved: BTreeSet<u16>,
    udp_reserved: BTreeSet<u16>,
}

/// Holds the two interval-managed port sets for one compute.
pub struct PortAllocator {
    ranges: Mutex<Ranges>,
}

impl PortAllocator {
    pub fn new(console_range: PortRange, udp_range: PortRange) -> Self {
        Self {
            ranges: Mutex::new(Ranges {
                console_range,
                udp_range,
                console_reserved: BTreeSet::new(),
                udp_reserved: BTreeSet::new(),
            }),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CONSOLE_RANGE, DEFAULT_UDP_RANGE)
    }

    pub fn reserve_console(&self) -> Result<u16, PortAllocationError> {
        let mut guard = self.ranges.lock().expect("port allocator mutex poisoned");
        let range = guard.console_range;
        reserve_smallest_free(&mut guard.console_reserved, range)
    }

    pub fn reserve_udp(&self) -> Result<u16, PortAllocationError> {
        let mut guard = self.ranges.lock().expect("port allocator mutex poisoned");
        let range = guard.udp_range;
        reserve_smallest_free(&mut guard.udp_reserved, range)
    }

    pub fn reserve_specific_console(&self, port: u16) -> Result<(), PortAllocationError> {
        let mut guard = self.ranges.lock().expect("port allocator mutex poisoned");
        reserve_specific(&mut guard.console_reserved, port)
    }

    pub fn reserve_specific_udp(&self, port: u16) -> Result<(), PortAllocationError> {
        let mut guard = self.ranges.lock().expect("port allocator mutex poisoned");
        reserve_specific(&mut guard.udp_reserved, port)
    }

    pub fn release_console(&self, port: u16) {
        self.ranges.lock().expect("port allocator mutex poisoned").console_reserved.remove(&port);
    }

    pub fn release_udp(&self, port: u16) {
        self.ranges.lock().expect("port allocator mutex poisoned").udp_reserved.remove(&port);
    }

    /// Marks a port the compute reports in use, but that this allocator
    /// never reserved itself, as externally held so a later
    /// `reserve_*` call never double-allocates it (§4.1 reconnect
    /// reconciliation).
    pub fn mark_externally_held_udp(&self, port: u16) {
        self.ranges.lock().expect("port allocator mutex poisoned").udp_reserved.insert(port);
    }

    pub fn mark_externally_held_console(&self, port: u16) {
        self.ranges.lock().expect("port allocator mutex poisoned").console_reserved.insert(port);
    }
}

fn reserve_smallest_free(reserved: &mut BTreeSet<u16>, range: PortRange) -> Result<u16, PortAllocationError> {
    for port in range.start..range.end {
        if !reserved.contains(&port) {
            reserved.insert(port);
            return Ok(port);
        }
    }
    Err(PortAllocationError::NoPortAvailable)
}

fn reserve_specific(reserved: &mut BTreeSet<u16>, port: u16) -> Result<(), PortAllocationError> {
    if reserved.contains(&port) {
        return Err(PortAllocationError::AlreadyReserved(port));
    }
    reserved.insert(port);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserves_smallest_free_port_first() {
        let allocator = PortAllocator::new(PortRange::new(100, 103), PortRange::new(200, 203));
        assert_eq!(allocator.reserve_console().unwrap(), 100);
        assert_eq!(allocator.reserve_console().unwrap(), 101);
        allocator.release_console(100);
        assert_eq!(allocator.reserve_console().unwrap(), 100);
    }

    #[test]
    fn exhausted_range_fails() {
        let allocator = PortAllocator::new(PortRange::new(100, 101), PortRange::new(200, 203));
        assert_eq!(allocator.reserve_console().unwrap(), 100);
        assert_eq!(allocator.reserve_console().unwrap_err(), PortAllocationError::NoPortAvailable);
    }

    #[test]
    fn reserve_specific_rejects_duplicate() {
        let allocator = PortAllocator::with_defaults();
        allocator.reserve_specific_udp(10005).unwrap();
        assert_eq!(
            allocator.reserve_specific_udp(10005).unwrap_err(),
            PortAllocationError::AlreadyReserved(10005)
        );
    }

    #[test]
    fn externally_held_port_is_not_reallocated() {
        let allocator = PortAllocator::new(PortRange::new(100, 103), PortRange::new(200, 203));
        allocator.mark_externally_held_console(100);
        assert_eq!(allocator.reserve_console().unwrap(), 101);
    }
}
