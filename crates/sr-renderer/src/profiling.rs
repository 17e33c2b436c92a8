//! Profiling zones.
//!
//! The renderer reports named zones around each frame phase to an optional
//! [`ProfilingSink`] given at construction.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Receives profiling zone boundaries.
pub trait ProfilingSink: Send + Sync {
    /// Called when a zone is entered.
    fn begin_zone(&self, name: &'static str);

    /// Called when a zone is left. Zones nest strictly.
    fn end_zone(&self, name: &'static str);
}

/// Scope guard that ends its zone when dropped.
pub struct ProfileZone {
    sink: Option<Arc<dyn ProfilingSink>>,
    name: &'static str,
}

impl ProfileZone {
    /// Enters `name` on `sink`, if any.
    pub fn enter(sink: Option<&Arc<dyn ProfilingSink>>, name: &'static str) -> Self {
        if let Some(sink) = sink {
            sink.begin_zone(name);
        }
        Self {
            sink: sink.cloned(),
            name,
        }
    }
}

impl Drop for ProfileZone {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.end_zone(self.name);
        }
    }
}

/// Accumulated timings of one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneStats {
    pub count: u64,
    pub total: Duration,
}

/// Sink that times zones and reports each one through `tracing`.
#[derive(Default)]
pub struct TracingProfiler {
    open: Mutex<Vec<(&'static str, Instant)>>,
    totals: Mutex<BTreeMap<&'static str, ZoneStats>>,
}

impl TracingProfiler {
    /// Creates a profiler with no recorded zones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulated stats of every zone seen so far.
    pub fn report(&self) -> BTreeMap<&'static str, ZoneStats> {
        self.totals.lock().clone()
    }

    /// Returns the stats of one zone.
    pub fn zone(&self, name: &str) -> Option<ZoneStats> {
        self.totals.lock().get(name).copied()
    }

    /// Forgets all accumulated stats.
    pub fn reset(&self) {
        self.totals.lock().clear();
    }
}

impl ProfilingSink for TracingProfiler {
    fn begin_zone(&self, name: &'static str) {
        self.open.lock().push((name, Instant::now()));
    }

    fn end_zone(&self, name: &'static str) {
        let Some((open_name, started)) = self.open.lock().pop() else {
            tracing::warn!(zone = name, "Profile zone ended without being entered");
            return;
        };
        debug_assert_eq!(open_name, name, "profile zones must nest");

        let elapsed = started.elapsed();
        tracing::trace!(zone = name, elapsed_us = elapsed.as_micros() as u64, "profile zone");

        let mut totals = self.totals.lock();
        let stats = totals.entry(name).or_default();
        stats.count += 1;
        stats.total += elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_guard_records() {
        let profiler = Arc::new(TracingProfiler::new());
        let sink: Arc<dyn ProfilingSink> = profiler.clone();
        {
            let _outer = ProfileZone::enter(Some(&sink), "outer");
            for _ in 0..3 {
                let _inner = ProfileZone::enter(Some(&sink), "inner");
            }
        }

        assert_eq!(profiler.zone("outer").unwrap().count, 1);
        assert_eq!(profiler.zone("inner").unwrap().count, 3);
        assert!(profiler.zone("missing").is_none());

        profiler.reset();
        assert!(profiler.report().is_empty());
    }

    #[test]
    fn test_zone_without_sink_is_noop() {
        let _zone = ProfileZone::enter(None, "unused");
    }
}
