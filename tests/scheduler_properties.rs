//! Property-based tests for the redraw timer.
//! Random lifecycle sequences on a virtual clock must keep the timer laws.

mod common;

use common::Harness;
use proptest::prelude::*;
use sunshine_watchface::{LifecycleEvent, RenderScheduler, Tap, TapKind, TimerCommand};

#[derive(Debug, Clone, Copy)]
enum Step {
    Visible(bool),
    Ambient(bool),
    Tap,
    Wait(i64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<bool>().prop_map(Step::Visible),
        any::<bool>().prop_map(Step::Ambient),
        Just(Step::Tap),
        (0i64..2_500).prop_map(Step::Wait),
    ]
}

fn run(watch: &mut Harness, step: Step) {
    match step {
        Step::Visible(visible) => watch.signal(LifecycleEvent::VisibilityChanged(visible)),
        Step::Ambient(ambient) => watch.signal(LifecycleEvent::AmbientModeChanged(ambient)),
        Step::Tap => watch.signal(LifecycleEvent::Tap(Tap {
            kind: TapKind::Tap,
            x: 0,
            y: 0,
            time_ms: 0,
        })),
        Step::Wait(ms) => {
            let until = watch.now_ms() + ms;
            watch.advance_to(until);
        }
    }
}

proptest! {
    /// Running iff visible and interactive, and no timer exists while stopped.
    #[test]
    fn running_tracks_visible_and_interactive(
        start in 0i64..10_000_000,
        steps in prop::collection::vec(step(), 0..60),
    ) {
        let mut watch = Harness::new(start);
        for step in steps {
            run(&mut watch, step);
            let gate = watch.engine.lifecycle();
            let running = watch.engine.scheduler_state().running;
            prop_assert_eq!(running, gate.visible() && !gate.ambient());
            prop_assert_eq!(watch.timer().is_some(), running);
            prop_assert_eq!(watch.engine.scheduler_state().next_fire_at.is_some(), running);
        }
    }

    /// While running, fires land on second boundaries at most one interval apart.
    #[test]
    fn ticks_land_on_boundaries(
        start in -5_000_000i64..5_000_000,
        steps in prop::collection::vec(step(), 0..60),
    ) {
        let mut watch = Harness::new(start);
        for step in steps {
            run(&mut watch, step);
            if let Some((_, deadline)) = watch.timer() {
                prop_assert_eq!(deadline.rem_euclid(1_000), 0);
                prop_assert!(deadline > watch.now_ms());
                prop_assert!(deadline - watch.now_ms() <= 1_000);
            }
        }
    }

    /// Stopping and restarting inside one interval leaves only the new timer.
    #[test]
    fn restart_within_interval_keeps_one_timer(
        start in 0i64..1_000_000,
        off_after in 0i64..1_000,
        on_after in 0i64..1_000,
    ) {
        let mut scheduler = RenderScheduler::new(1_000);
        let first = match scheduler.on_lifecycle_changed(true, false, start) {
            TimerCommand::Arm { handle, .. } => handle,
            other => panic!("expected Arm, got {other:?}"),
        };
        prop_assert_eq!(
            scheduler.on_lifecycle_changed(false, false, start + off_after),
            TimerCommand::Cancel
        );
        let restarted = scheduler.on_lifecycle_changed(true, false, start + off_after + on_after);
        let TimerCommand::Arm { handle: second, .. } = restarted else {
            panic!("expected Arm, got {restarted:?}");
        };

        prop_assert_ne!(first, second);
        prop_assert_eq!(scheduler.armed(), Some(second));
        scheduler.take_redraw();
        prop_assert_eq!(scheduler.on_tick(first, start + 1_000), TimerCommand::Keep);
        prop_assert!(!scheduler.redraw_pending());
    }

    /// Duplicate lifecycle signals never re-arm or redraw.
    #[test]
    fn duplicate_signals_are_no_ops(
        start in 0i64..1_000_000,
        visible in any::<bool>(),
        ambient in any::<bool>(),
    ) {
        let mut watch = Harness::new(start);
        watch.signal(LifecycleEvent::VisibilityChanged(visible));
        watch.signal(LifecycleEvent::AmbientModeChanged(ambient));
        let timer = watch.timer();
        let draws = watch.draws.len();

        watch.signal(LifecycleEvent::VisibilityChanged(visible));
        watch.signal(LifecycleEvent::AmbientModeChanged(ambient));
        prop_assert_eq!(watch.timer(), timer);
        prop_assert_eq!(watch.draws.len(), draws);
    }
}
