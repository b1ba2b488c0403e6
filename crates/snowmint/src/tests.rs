use crate::{
    Clock, DEFAULT_EPOCH, Error, IdGenStatus, MonotonicClock, SnowmintGenerator, SnowmintId,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;

struct MockTime {
    millis: u64,
}

impl Clock for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

struct FixedTime;
impl Clock for FixedTime {
    fn current_millis(&self) -> u64 {
        0
    }
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl Clock for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.get()]
    }
}

impl SharedMockStepTime {
    fn new(values: Vec<u64>) -> Self {
        Self {
            clock: Rc::new(MockStepTime {
                values,
                index: Cell::new(0),
            }),
        }
    }

    fn step_to(&self, index: usize) {
        self.clock.index.set(index);
    }
}

trait IdGenStatusExt {
    fn unwrap_ready(self) -> SnowmintId;
    fn unwrap_pending(self) -> u64;
}

impl IdGenStatusExt for IdGenStatus {
    fn unwrap_ready(self) -> SnowmintId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_for } => yield_for,
        }
    }
}

#[test]
fn sequence_increments_within_same_tick() {
    let generator = SnowmintGenerator::new(0, MockTime { millis: 42 }).unwrap();

    let id1 = generator.try_next_id().unwrap().unwrap_ready();
    let id2 = generator.try_next_id().unwrap().unwrap_ready();
    let id3 = generator.try_next_id().unwrap().unwrap_ready();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn pending_when_sequence_exhausted() {
    let generator =
        SnowmintGenerator::from_components(0, 0, SnowmintId::max_sequence(), FixedTime);
    let yield_for = generator.try_next_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 1);
}

#[test]
fn sequence_rollover_to_next_tick() {
    let shared_time = SharedMockStepTime::new(vec![42, 43]);
    let generator = SnowmintGenerator::new(1, shared_time.clone()).unwrap();

    // The full 4096-id space of millisecond 42.
    for i in 0..=SnowmintId::max_sequence() {
        let id = generator.try_next_id().unwrap().unwrap_ready();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }

    let yield_for = generator.try_next_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 1);

    shared_time.step_to(1);

    let id = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn clock_regression_waits_instead_of_reminting() {
    let shared_time = SharedMockStepTime::new(vec![42, 40, 41, 42, 43]);
    let generator = SnowmintGenerator::new(7, shared_time.clone()).unwrap();

    let first = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(first.timestamp(), 42);

    // Clock jumps back two milliseconds: Pending until it catches up, never
    // a reused timestamp with sequence 0.
    shared_time.step_to(1);
    assert_eq!(generator.try_next_id().unwrap().unwrap_pending(), 2);
    shared_time.step_to(2);
    assert_eq!(generator.try_next_id().unwrap().unwrap_pending(), 1);

    shared_time.step_to(3);
    let second = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(second.timestamp(), 42);
    assert_eq!(second.sequence(), 1);
    assert!(second > first);

    shared_time.step_to(4);
    let third = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(third.timestamp(), 43);
    assert_eq!(third.sequence(), 0);
    assert!(third > second);
}

#[test]
fn machine_id_bounds_are_enforced() {
    assert!(SnowmintGenerator::new(0, FixedTime).is_ok());
    assert!(SnowmintGenerator::new(1023, FixedTime).is_ok());
    assert!(matches!(
        SnowmintGenerator::new(1024, FixedTime),
        Err(Error::MachineIdOutOfRange {
            machine_id: 1024,
            max: 1023
        })
    ));
}

#[test]
fn timestamp_overflow_fails_loudly() {
    let generator = SnowmintGenerator::new(
        0,
        MockTime {
            millis: SnowmintId::max_timestamp() + 1,
        },
    )
    .unwrap();
    assert!(matches!(
        generator.try_next_id(),
        Err(Error::TimestampOverflow { .. })
    ));

    // The last representable millisecond is still fine.
    let generator = SnowmintGenerator::new(
        0,
        MockTime {
            millis: SnowmintId::max_timestamp(),
        },
    )
    .unwrap();
    let id = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), SnowmintId::max_timestamp());
}

#[test]
fn parse_inverts_encoding() {
    let triples = [
        (0, 0, 0),
        (1, 2, 3),
        (42, 1023, 4095),
        (SnowmintId::max_timestamp(), 0, 4095),
        (SnowmintId::max_timestamp(), 1023, 0),
    ];
    for (ts, machine, seq) in triples {
        let id = SnowmintId::from_components(ts, machine, seq);
        let parts = SnowmintId::parse(id.to_raw(), DEFAULT_EPOCH);
        assert_eq!(parts.offset_ms, ts);
        assert_eq!(parts.machine_id, machine);
        assert_eq!(parts.sequence, seq);
        assert_eq!(parts.timestamp_ms, DEFAULT_EPOCH.as_millis() as u64 + ts);
        assert_eq!(SnowmintId::from_raw(id.to_raw()), id);
    }
}

#[test]
fn parse_matches_generated_id() {
    let clock = MonotonicClock::with_epoch(DEFAULT_EPOCH);
    let generator = SnowmintGenerator::new(23, clock).unwrap();
    let id = generator.next_id().unwrap();

    let parts = SnowmintId::parse(id.to_raw(), DEFAULT_EPOCH);
    assert_eq!(parts.machine_id, 23);
    assert_eq!(parts.offset_ms, id.timestamp());
    assert_eq!(parts.sequence, id.sequence());
}

#[test]
fn sequential_ids_strictly_increase() {
    let clock = MonotonicClock::with_epoch(DEFAULT_EPOCH);
    let generator = SnowmintGenerator::new(1, clock).unwrap();

    let mut last = generator.next_id().unwrap();
    for _ in 0..10_000 {
        let id = generator.next_id().unwrap();
        assert!(id > last, "expected {id:?} > {last:?}");
        last = id;
    }
}

#[test]
fn concurrent_ids_are_unique() {
    // The original deployment's load-test scenario: 50k IDs from 12
    // concurrent callers against one generator, zero duplicates.
    const THREADS: usize = 12;
    const TOTAL_IDS: usize = 50_000;

    let clock = MonotonicClock::with_epoch(DEFAULT_EPOCH);
    let generator = Arc::new(SnowmintGenerator::new(0, clock).unwrap());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for i in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);
            let count = TOTAL_IDS / THREADS + usize::from(i < TOTAL_IDS % THREADS);

            s.spawn(move || {
                for _ in 0..count {
                    let id = generator.next_id().unwrap();
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn independent_generators_do_not_interfere() {
    let a = SnowmintGenerator::new(1, MockTime { millis: 42 }).unwrap();
    let b = SnowmintGenerator::new(2, MockTime { millis: 42 }).unwrap();
    assert_eq!(a.machine_id(), 1);
    assert_eq!(b.machine_id(), 2);

    let id_a = a.try_next_id().unwrap().unwrap_ready();
    let id_b = b.try_next_id().unwrap().unwrap_ready();

    assert_eq!(id_a.sequence(), 0);
    assert_eq!(id_b.sequence(), 0);
    assert_eq!(id_a.machine_id(), 1);
    assert_eq!(id_b.machine_id(), 2);
    assert_ne!(id_a, id_b);
}
