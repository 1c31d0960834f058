//! Microsecond clock tests: epoch latching and the 2^32 carry.

use pretty_assertions::assert_eq;

use lockstep_core::soc::devices::Clock;

use crate::common::harness::ManualMicros;

#[test]
fn epoch_is_latched_on_first_read() {
    let micros = ManualMicros::new();
    let mut clock = Clock::with_source(micros.source());

    micros.set(1_000);
    assert_eq!(clock.read(0), 0, "first read defines time zero");

    micros.set(1_250);
    assert_eq!(clock.read(0), 250);
}

#[test]
fn counter_is_monotonic() {
    let micros = ManualMicros::new();
    let mut clock = Clock::with_source(micros.source());

    let mut last = clock.read(0);
    for step in [10u64, 10, 500, 0, 3] {
        micros.set(micros.get() + step);
        let now = clock.read(0);
        assert!(now >= last, "counter went backwards: {last} -> {now}");
        last = now;
    }
}

#[test]
fn high_word_carries_past_2_to_the_32() {
    let micros = ManualMicros::new();
    let mut clock = Clock::with_source(micros.source());

    micros.set(0);
    assert_eq!(clock.read(0), 0);
    assert_eq!(clock.read(4), 0);

    micros.set((1 << 32) + 5);
    assert_eq!(clock.read(0), 5);
    assert_eq!(clock.read(4), 1);
}

#[test]
fn host_backed_clock_does_not_run_backwards() {
    let mut clock = Clock::new();
    let first = clock.read(0);
    let second = clock.read(0);
    assert!(second >= first);
}
