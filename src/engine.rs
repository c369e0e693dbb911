//! Watch face engine
//!
//! All lifecycle signals, timer fires and sync events are processed here, one
//! at a time, on a single execution context. Producers on other tasks hand
//! their inputs over through an [`InputQueue`].

use chrono::FixedOffset;
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

use crate::{
    config::FaceConfig,
    face::{clock::ClockState, DisplayState, Snapshot},
    lifecycle::{LifecycleEvent, LifecycleGate, TapKind},
    scheduler::{RenderScheduler, SchedulerState, TimerCommand, TimerHandle},
    sync::{DataEvent, DataSyncChannel, SyncOutcome},
};

/// Source of the current system time zone.
pub trait ZoneSource {
    fn current_zone(&self) -> FixedOffset;
}

impl ZoneSource for FixedOffset {
    fn current_zone(&self) -> FixedOffset {
        *self
    }
}

impl<Z: ZoneSource> ZoneSource for &Z {
    fn current_zone(&self) -> FixedOffset {
        (**self).current_zone()
    }
}

/// Anything the engine can be asked to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Lifecycle(LifecycleEvent),
    Data(DataEvent),
    /// Companion link came up or went down
    Link(bool),
    /// The timer armed with this handle fired
    Timer(TimerHandle),
}

/// Hand-off queue from producer tasks to the engine's task.
pub type InputQueue<M, const N: usize> = Channel<M, Input, N>;

/// Queue `input` without waiting. Returns `false` if the queue was full and
/// the input was dropped.
///
/// Only for inputs a later one supersedes, such as taps and minute ticks.
pub fn offer<M: RawMutex, const N: usize>(queue: &InputQueue<M, N>, input: Input) -> bool {
    match queue.try_send(input) {
        Ok(()) => true,
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("input queue full, dropped input");
            false
        }
    }
}

/// Queue `input`, waiting while the queue is full.
///
/// Visibility, ambient and companion inputs go through here: losing one would
/// leave the timer running for a face nobody sees.
pub async fn submit<M: RawMutex, const N: usize>(queue: &InputQueue<M, N>, input: Input) {
    queue.send(input).await
}

/// The watch face: display state plus the machinery deciding when to draw it.
pub struct Engine<Z> {
    gate: LifecycleGate,
    display: DisplayState,
    scheduler: RenderScheduler,
    sync: DataSyncChannel,
    zones: Z,
}

impl<Z: ZoneSource> Engine<Z> {
    /// Create a hidden engine showing `now_ms` in the current zone.
    pub fn new(config: &FaceConfig, zones: Z, now_ms: i64) -> Self {
        let clock = ClockState::new(now_ms, zones.current_zone());
        Self {
            gate: LifecycleGate::default(),
            display: DisplayState::new(clock),
            scheduler: RenderScheduler::new(config.interval_ms()),
            sync: DataSyncChannel::default(),
            zones,
        }
    }

    /// Process one input observed at wall-clock `now_ms`.
    pub fn dispatch(&mut self, input: Input, now_ms: i64) -> TimerCommand {
        match input {
            Input::Lifecycle(event) => self.handle(event, now_ms),
            Input::Data(event) => {
                self.display.clock_mut().set_instant(now_ms);
                self.on_data(&event);
                TimerCommand::Keep
            }
            Input::Link(connected) => {
                self.sync.set_link(connected);
                TimerCommand::Keep
            }
            Input::Timer(handle) => self.on_timer(handle, now_ms),
        }
    }

    /// Translate one platform signal. Signals that change nothing are no-ops.
    pub fn handle(&mut self, event: LifecycleEvent, now_ms: i64) -> TimerCommand {
        self.display.clock_mut().set_instant(now_ms);

        match event {
            LifecycleEvent::VisibilityChanged(visible) => {
                if !self.gate.observe_visibility(visible) {
                    return TimerCommand::Keep;
                }
                #[cfg(feature = "defmt")]
                defmt::info!("face visible: {}", visible);
                if visible {
                    self.sync.on_subscribe();
                    // The zone may have changed while hidden
                    let zone = self.zones.current_zone();
                    self.display.clock_mut().set_zone(zone);
                    self.scheduler.request_immediate_redraw();
                } else {
                    self.sync.on_unsubscribe();
                }
                self.reevaluate(now_ms)
            }
            LifecycleEvent::AmbientModeChanged(ambient) => {
                if !self.gate.observe_ambient(ambient) {
                    return TimerCommand::Keep;
                }
                #[cfg(feature = "defmt")]
                defmt::info!("ambient mode: {}", ambient);
                self.display.set_ambient(ambient);
                let command = self.reevaluate(now_ms);
                self.scheduler.request_immediate_redraw();
                command
            }
            LifecycleEvent::PropertiesChanged { low_bit_ambient } => {
                self.display.set_low_bit_ambient(low_bit_ambient);
                TimerCommand::Keep
            }
            LifecycleEvent::WindowInsetsApplied { is_round } => {
                if self.display.set_round(is_round) {
                    self.scheduler.request_immediate_redraw();
                }
                TimerCommand::Keep
            }
            LifecycleEvent::TimeZoneChanged => {
                let zone = self.zones.current_zone();
                if self.display.clock_mut().set_zone(zone) {
                    self.scheduler.request_immediate_redraw();
                }
                TimerCommand::Keep
            }
            LifecycleEvent::TimeTick => {
                self.scheduler.request_immediate_redraw();
                TimerCommand::Keep
            }
            LifecycleEvent::ClockAdjusted => {
                self.scheduler.request_immediate_redraw();
                self.scheduler.realign(now_ms)
            }
            LifecycleEvent::Tap(tap) => {
                if tap.kind == TapKind::Tap {
                    self.display.toggle_tap();
                    self.scheduler.request_immediate_redraw();
                }
                TimerCommand::Keep
            }
        }
    }

    /// The timer armed with `handle` fired at `now_ms`.
    pub fn on_timer(&mut self, handle: TimerHandle, now_ms: i64) -> TimerCommand {
        self.display.clock_mut().set_instant(now_ms);
        self.scheduler.on_tick(handle, now_ms)
    }

    /// Apply a data sync event; a weather change requests one redraw.
    pub fn on_data(&mut self, event: &DataEvent) -> SyncOutcome {
        let outcome = self.sync.on_update(event, self.display.weather_mut());
        if outcome == SyncOutcome::Applied {
            self.scheduler.request_immediate_redraw();
        }
        outcome
    }

    /// Whether a frame should be drawn now. Clears the request.
    ///
    /// Requests made while hidden are dropped; becoming visible draws anyway.
    pub fn take_redraw(&mut self) -> bool {
        self.scheduler.take_redraw() && self.gate.visible()
    }

    /// Wall-clock time the pending timer fires at.
    pub fn next_deadline(&self) -> Option<(TimerHandle, i64)> {
        self.scheduler.armed().zip(self.scheduler.state().next_fire_at)
    }

    /// Give the renderer read access to the display state for one draw.
    pub fn with_snapshot<R>(&self, draw: impl FnOnce(&Snapshot<'_>) -> R) -> R {
        draw(&Snapshot::new(&self.display))
    }

    /// Stop the timer and the sync subscription. Safe to call repeatedly.
    pub fn shutdown(&mut self) -> TimerCommand {
        self.sync.on_unsubscribe();
        self.scheduler.stop()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn lifecycle(&self) -> LifecycleGate {
        self.gate
    }

    pub fn sync(&self) -> &DataSyncChannel {
        &self.sync
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    fn reevaluate(&mut self, now_ms: i64) -> TimerCommand {
        self.scheduler
            .on_lifecycle_changed(self.gate.visible(), self.gate.ambient(), now_ms)
    }
}
