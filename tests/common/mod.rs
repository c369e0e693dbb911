//! Virtual-clock driver for the engine.
//!
//! Plays the role of the firmware's render task: applies timer commands to a
//! single simulated timer, fires it when the clock passes its deadline and
//! records every frame that would have been drawn.

#![allow(dead_code)]

use chrono::FixedOffset;
use sunshine_watchface::{
    face::weather::HighLowText,
    sync::{Key, Path, HIGH_LOW_KEY, WEATHER_ID_KEY, WEATHER_PATH},
    DataEvent, DataMap, DataValue, Engine, FaceConfig, LifecycleEvent, SyncOutcome,
    TimerCommand, TimerHandle,
};

pub struct Harness {
    pub engine: Engine<FixedOffset>,
    now_ms: i64,
    timer: Option<(TimerHandle, i64)>,
    /// Wall-clock time of every drawn frame
    pub draws: Vec<i64>,
}

impl Harness {
    pub fn new(now_ms: i64) -> Self {
        Self {
            engine: Engine::new(&FaceConfig::DEFAULT, utc(), now_ms),
            now_ms,
            timer: None,
            draws: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    /// The simulated timer, as last armed.
    pub fn timer(&self) -> Option<(TimerHandle, i64)> {
        self.timer
    }

    pub fn signal(&mut self, event: LifecycleEvent) {
        let command = self.engine.handle(event, self.now_ms);
        self.apply(command);
        self.pump();
    }

    pub fn data(&mut self, event: &DataEvent) -> SyncOutcome {
        let outcome = self.engine.on_data(event);
        self.pump();
        outcome
    }

    /// Move the clock forward, firing the timer on every deadline passed.
    pub fn advance_to(&mut self, t_ms: i64) {
        loop {
            match self.timer {
                Some((handle, deadline)) if deadline <= t_ms => {
                    self.now_ms = deadline;
                    self.timer = None;
                    let command = self.engine.on_timer(handle, deadline);
                    self.apply(command);
                    self.pump();
                }
                _ => break,
            }
        }
        self.now_ms = t_ms;
    }

    /// Set the wall clock without firing anything, as a clock change would.
    pub fn jump_to(&mut self, t_ms: i64) {
        self.now_ms = t_ms;
    }

    /// Deliver a fire from a timer that may no longer be armed.
    pub fn fire_stale(&mut self, handle: TimerHandle) {
        let command = self.engine.on_timer(handle, self.now_ms);
        self.apply(command);
        self.pump();
    }

    pub fn draws_since(&self, t_ms: i64) -> Vec<i64> {
        self.draws.iter().copied().filter(|&t| t >= t_ms).collect()
    }

    fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Keep => {}
            TimerCommand::Arm {
                handle,
                deadline_ms,
            } => self.timer = Some((handle, deadline_ms)),
            TimerCommand::Cancel => self.timer = None,
        }
        assert_eq!(self.timer, self.engine.next_deadline());
    }

    fn pump(&mut self) {
        if self.engine.take_redraw() {
            self.draws.push(self.now_ms);
        }
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

pub fn weather_payload(high_low: &str, id: Option<i32>) -> DataMap {
    let mut payload = DataMap::new();
    payload
        .insert(
            Key::try_from(HIGH_LOW_KEY).unwrap(),
            DataValue::Text(HighLowText::try_from(high_low).unwrap()),
        )
        .unwrap();
    if let Some(id) = id {
        payload
            .insert(Key::try_from(WEATHER_ID_KEY).unwrap(), DataValue::Int(id))
            .unwrap();
    }
    payload
}

pub fn weather_event(high_low: &str, id: i32) -> DataEvent {
    DataEvent::changed(
        Path::try_from(WEATHER_PATH).unwrap(),
        weather_payload(high_low, Some(id)),
    )
}
