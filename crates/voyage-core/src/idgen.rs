//! Compact, time-ordered identifier allocation.
//!
//! Ids are decimal strings: the low-order digits of the Unix second
//! concatenated with a zero-padded per-second sequence counter. With the
//! default widths (9 + 4 digits) the generator issues up to 10,000 ids per
//! second and the timestamp prefix wraps after roughly 31 years.
//!
//! One generator instance is shared per process (the planner holds it in an
//! `Arc`). Each instance starts its per-second sequence at an offset mixed
//! from the process id and the clock's sub-second nanos, so two processes
//! allocating in the same wall second do not both emit `<second>0000`.
//! That keeps collisions improbable, not impossible; the storage layer's
//! primary-key constraints are the hard guarantee.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default number of low-order Unix-second digits in an id.
pub const DEFAULT_TIMESTAMP_DIGITS: u32 = 9;

/// Default number of sequence digits (capacity 10,000 ids/second).
pub const DEFAULT_SEQUENCE_DIGITS: u32 = 4;

#[derive(Debug)]
struct GeneratorState {
    last_second: u64,
    sequence: u64,
}

/// Shared id allocator for all entity kinds.
///
/// On sequence exhaustion within one second the generator advances a
/// *logical* second instead of spin-waiting for the wall clock: the
/// overflowing id borrows the next second's prefix and the sequence resets.
/// Ids stay unique and time-ordered; the logical clock re-synchronizes with
/// the wall clock as soon as real time catches up.
#[derive(Debug)]
pub struct IdGenerator {
    state: Mutex<GeneratorState>,
    timestamp_digits: u32,
    sequence_digits: u32,
    max_sequence: u64,
    /// Where the sequence restarts each second; varies per instance.
    sequence_base: u64,
}

impl IdGenerator {
    /// Creates a generator with the default digit widths.
    pub fn new() -> Self {
        Self::with_digits(DEFAULT_TIMESTAMP_DIGITS, DEFAULT_SEQUENCE_DIGITS)
    }

    /// Creates a generator with custom timestamp/sequence widths.
    pub fn with_digits(timestamp_digits: u32, sequence_digits: u32) -> Self {
        let max_sequence = 10u64.pow(sequence_digits) - 1;
        let sequence_base = sequence_seed(max_sequence);
        Self {
            state: Mutex::new(GeneratorState {
                last_second: 0,
                sequence: sequence_base,
            }),
            timestamp_digits,
            sequence_digits,
            max_sequence,
            sequence_base,
        }
    }

    /// Issues the next id.
    ///
    /// # Panics
    ///
    /// Panics if another thread panicked while holding the internal lock.
    pub fn next_id(&self) -> String {
        let now = unix_seconds();
        let mut state = self.state.lock().expect("id generator lock poisoned");

        if now > state.last_second {
            state.last_second = now;
            state.sequence = self.sequence_base;
        } else if state.sequence >= self.max_sequence {
            // Sequence exhausted within this (possibly logical) second;
            // borrow the next second rather than busy-waiting.
            state.last_second += 1;
            state.sequence = self.sequence_base;
        } else {
            state.sequence += 1;
        }

        let modulus = 10u64.pow(self.timestamp_digits);
        format!(
            "{:0ts$}{:0seq$}",
            state.last_second % modulus,
            state.sequence,
            ts = self.timestamp_digits as usize,
            seq = self.sequence_digits as usize,
        )
    }

    /// Resets the internal counter. Intended for tests.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("id generator lock poisoned");
        state.last_second = 0;
        state.sequence = self.sequence_base;
    }

    // Thin per-kind wrappers over the single shared counter.

    pub fn next_trip_id(&self) -> String {
        self.next_id()
    }

    pub fn next_day_id(&self) -> String {
        self.next_id()
    }

    pub fn next_event_id(&self) -> String {
        self.next_id()
    }

    pub fn next_location_id(&self) -> String {
        self.next_id()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Picks the per-instance sequence offset.
///
/// Mixes the process id with the clock's sub-second nanos so concurrent
/// processes land on different offsets, and a per-process counter so two
/// instances inside one process never share one.
fn sequence_seed(max_sequence: u64) -> u64 {
    static INSTANCES: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()))
        .unwrap_or(0);
    let instance = INSTANCES.fetch_add(1, Ordering::Relaxed);

    (u64::from(std::process::id()) ^ nanos)
        .wrapping_add(instance.wrapping_mul(0x9E37_79B9))
        % (max_sequence + 1)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_have_expected_width() {
        let gen = IdGenerator::new();
        let id = gen.next_id();
        assert_eq!(id.len(), 13);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn ids_are_unique_under_burst_load() {
        let gen = IdGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(gen.next_id()));
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn sequence_overflow_borrows_next_second() {
        let gen = IdGenerator::with_digits(9, 2);
        let mut seen = HashSet::new();
        // 100 ids exhaust a 2-digit sequence; the 101st must roll the
        // timestamp forward instead of duplicating.
        for _ in 0..150 {
            assert!(seen.insert(gen.next_id()));
        }
        assert_eq!(seen.len(), 150);
    }

    #[test]
    fn ids_are_monotonically_increasing() {
        let gen = IdGenerator::new();
        let a: u64 = gen.next_id().parse().unwrap();
        let b: u64 = gen.next_id().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn reset_clears_state() {
        let gen = IdGenerator::new();
        let _ = gen.next_id();
        gen.reset();
        let state = gen.state.lock().unwrap();
        assert_eq!(state.sequence, gen.sequence_base);
        assert_eq!(state.last_second, 0);
    }

    #[test]
    fn separate_generators_start_at_different_offsets() {
        // Two planner processes hitting the same database in the same
        // wall second must not both allocate <second>0000.
        let a = IdGenerator::new();
        let b = IdGenerator::new();
        assert_ne!(a.sequence_base, b.sequence_base);
        assert_ne!(a.next_id(), b.next_id());
    }

    #[test]
    fn unique_across_threads() {
        use std::sync::Arc;

        let gen = Arc::new(IdGenerator::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let gen = Arc::clone(&gen);
            handles.push(std::thread::spawn(move || {
                (0..1_000).map(|_| gen.next_id()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 4_000);
    }
}
