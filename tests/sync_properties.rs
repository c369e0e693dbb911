//! Property-based tests for companion weather sync.

mod common;

use common::{weather_event, Harness};
use proptest::prelude::*;
use sunshine_watchface::{
    sync::{Path, WEATHER_PATH},
    DataEvent, LifecycleEvent, SyncOutcome,
};

fn visible_watch() -> Harness {
    let mut watch = Harness::new(0);
    watch.signal(LifecycleEvent::VisibilityChanged(true));
    watch
}

proptest! {
    /// Applying the same update twice leaves the weather as after the first.
    #[test]
    fn repeated_update_is_idempotent(text in "[0-9]{1,2}°/[0-9]{1,2}°", id in -1i32..1_000) {
        let mut watch = visible_watch();
        let event = weather_event(&text, id);

        prop_assert_eq!(watch.data(&event), SyncOutcome::Applied);
        let once = watch.engine.display().weather().clone();
        prop_assert_eq!(watch.data(&event), SyncOutcome::Applied);
        prop_assert_eq!(watch.engine.display().weather(), &once);
        prop_assert_eq!(once.high_low(), Some(text.as_str()));
        prop_assert_eq!(once.condition_id(), (id >= 0).then_some(id));
    }

    /// A deletion never changes the weather.
    #[test]
    fn deletion_retains_weather(text in "[0-9]{1,2}°/[0-9]{1,2}°", id in 0i32..1_000) {
        let mut watch = visible_watch();
        watch.data(&weather_event(&text, id));
        let before = watch.engine.display().weather().clone();

        let deleted = DataEvent::deleted(Path::try_from(WEATHER_PATH).unwrap());
        prop_assert_eq!(watch.data(&deleted), SyncOutcome::Retained);
        prop_assert_eq!(watch.engine.display().weather(), &before);
    }
}
