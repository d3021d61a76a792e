use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::debug;

use crate::utils::time::now_ms;

/// Guards one submit control against double submission.
///
/// At most one request passes at a time. Once it settles the control stays
/// closed for `cooldown_ms` more milliseconds. Times are passed in by the
/// caller so the gate works the same on native and WASM targets.
#[derive(Debug)]
pub struct SubmitGate {
    in_flight: AtomicBool,
    closed_until: AtomicU64,
    cooldown_ms: u64,
}

impl SubmitGate {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            closed_until: AtomicU64::new(0),
            cooldown_ms,
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Claim the gate. Fails while a request is in flight or cooling down.
    pub fn try_acquire(&self, now_ms: u64) -> bool {
        if now_ms < self.closed_until.load(Ordering::Acquire) {
            debug!("Submit dropped during cool-down");
            return false;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submit dropped, request already in flight");
            return false;
        }
        true
    }

    /// Settle the current request and start the cool-down
    pub fn release(&self, now_ms: u64) {
        self.closed_until
            .store(now_ms.saturating_add(self.cooldown_ms), Ordering::Release);
        self.in_flight.store(false, Ordering::Release);
    }

    /// Whether the submit control should be clickable
    pub fn is_enabled(&self, now_ms: u64) -> bool {
        !self.in_flight.load(Ordering::Acquire)
            && now_ms >= self.closed_until.load(Ordering::Acquire)
    }

    /// Claim the gate for the lifetime of the returned pass
    pub fn enter(&self) -> Option<GatePass<'_>> {
        self.try_acquire(now_ms()).then_some(GatePass { gate: self })
    }
}

/// Held while a request is outstanding; releases the gate on drop
#[derive(Debug)]
pub struct GatePass<'a> {
    gate: &'a SubmitGate,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        self.gate.release(now_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submit_dropped_while_in_flight() {
        let gate = SubmitGate::new(1000);
        assert!(gate.try_acquire(0));
        assert!(!gate.try_acquire(10));
        assert!(!gate.is_enabled(10));
    }

    #[test]
    fn test_cooldown_after_settle() {
        let gate = SubmitGate::new(1000);
        assert!(gate.try_acquire(0));
        gate.release(500);
        assert!(!gate.is_enabled(1499));
        assert!(!gate.try_acquire(1499));
        assert!(gate.is_enabled(1500));
        assert!(gate.try_acquire(1500));
    }

    #[test]
    fn test_pass_releases_on_drop() {
        let gate = SubmitGate::new(0);
        {
            let _pass = gate.enter().unwrap();
            assert!(gate.enter().is_none());
        }
        assert!(gate.enter().is_some());
    }
}
