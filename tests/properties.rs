//! Property tests for the timer and the debouncer over arbitrary inputs.

use led_autotimer::{CountdownTimer, Debouncer};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum TimerOp {
    Start,
    Cancel,
    Tick,
}

fn arb_timer_op() -> impl Strategy<Value = TimerOp> {
    prop_oneof![
        1 => Just(TimerOp::Start),
        1 => Just(TimerOp::Cancel),
        8 => Just(TimerOp::Tick),
    ]
}

proptest! {
    /// A started timer triggers on exactly the threshold-th tick and only once.
    #[test]
    fn timer_triggers_once_at_threshold(threshold in 1u32..500, extra in 0u32..100) {
        let mut timer = CountdownTimer::new(threshold, 1);
        timer.start();
        let mut edges = 0;
        for tick in 1..=threshold + extra {
            let before = timer.triggered();
            timer.tick();
            if timer.triggered() && !before {
                edges += 1;
                prop_assert_eq!(tick, threshold);
            }
        }
        prop_assert_eq!(edges, 1);
        prop_assert_eq!(timer.elapsed(), threshold);
    }

    /// Arbitrary start/cancel/tick sequences keep the timer flags consistent.
    #[test]
    fn timer_flags_stay_consistent(
        threshold in 1u32..20,
        ops in proptest::collection::vec(arb_timer_op(), 0..200),
    ) {
        let mut timer = CountdownTimer::new(threshold, 1);
        let mut since_start: Option<u32> = None;
        for op in ops {
            match op {
                TimerOp::Start => {
                    timer.start();
                    since_start = Some(0);
                    prop_assert!(!timer.triggered());
                }
                TimerOp::Cancel => {
                    timer.cancel();
                    since_start = None;
                    prop_assert!(!timer.triggered());
                    prop_assert!(!timer.is_enabled());
                }
                TimerOp::Tick => {
                    let before = timer;
                    timer.tick();
                    match since_start.as_mut() {
                        None => prop_assert_eq!(timer, before),
                        Some(count) => {
                            *count = (*count + 1).min(threshold);
                            prop_assert_eq!(timer.triggered(), *count >= threshold);
                        }
                    }
                }
            }
            prop_assert!(!(timer.triggered() && timer.is_enabled()));
            prop_assert!(timer.elapsed() <= threshold);
        }
    }

    /// Each run of at least `required` pressed samples produces one press.
    #[test]
    fn debouncer_counts_long_runs(
        required in 1u16..10,
        samples in proptest::collection::vec(any::<bool>(), 0..300),
    ) {
        let mut debouncer = Debouncer::new(required);
        let events = samples
            .iter()
            .filter(|&&pressed| debouncer.sample(pressed).is_some())
            .count();

        let long_runs = samples
            .split(|&pressed| !pressed)
            .filter(|run| run.len() >= usize::from(required))
            .count();
        prop_assert_eq!(events, long_runs);
    }
}
