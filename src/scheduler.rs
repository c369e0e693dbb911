//! Render scheduling
//!
//! The periodic redraw timer runs only while the face is visible and
//! interactive. Every fire lands on a wall-clock interval boundary: the delay
//! is recomputed from the current time on each arm, so it never drifts.
//!
//! The scheduler does not own a timer itself. It hands out
//! [`TimerCommand`]s, and whoever runs the timer reports fires back through
//! [`RenderScheduler::on_tick`] with the [`TimerHandle`] it was armed with.
//! Arming bumps the handle, so only the most recent timer is ever honoured.

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u32);

/// What the timer driver has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    /// Leave the current timer (or its absence) as it is.
    Keep,
    /// Replace any pending timer with one firing at `deadline_ms` (wall clock).
    Arm {
        handle: TimerHandle,
        deadline_ms: i64,
    },
    /// Drop the pending timer.
    Cancel,
}

/// Externally visible scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerState {
    pub running: bool,
    pub next_fire_at: Option<i64>,
}

/// Decides when the next redraw is due.
#[derive(Debug)]
pub struct RenderScheduler {
    interval_ms: i64,
    state: SchedulerState,
    armed: Option<TimerHandle>,
    generation: u32,
    redraw_pending: bool,
}

impl RenderScheduler {
    /// Create a stopped scheduler. `interval_ms` is clamped to at least 1.
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            state: SchedulerState::default(),
            armed: None,
            generation: 0,
            redraw_pending: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Handle of the pending timer, if any.
    pub fn armed(&self) -> Option<TimerHandle> {
        self.armed
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    /// Milliseconds from `now_ms` to the next interval boundary, in `1..=interval`.
    pub fn delay_to_boundary(&self, now_ms: i64) -> i64 {
        self.interval_ms - now_ms.rem_euclid(self.interval_ms)
    }

    /// Re-evaluate the run/stop decision after a visibility or ambient change.
    ///
    /// Starting draws once immediately and arms for the next boundary.
    /// A call that doesn't change eligibility leaves the timer alone.
    pub fn on_lifecycle_changed(&mut self, visible: bool, ambient: bool, now_ms: i64) -> TimerCommand {
        let eligible = visible && !ambient;
        match (self.state.running, eligible) {
            (false, true) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("scheduler: start at {=i64}", now_ms);
                self.state.running = true;
                self.request_immediate_redraw();
                self.arm(now_ms)
            }
            (true, false) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("scheduler: stop (visible={}, ambient={})", visible, ambient);
                self.stop()
            }
            _ => TimerCommand::Keep,
        }
    }

    /// The timer armed with `handle` fired.
    ///
    /// Fires from a timer that has since been cancelled or replaced are
    /// ignored, which keeps at most one tick chain alive. A fire that reads
    /// back slightly before its deadline still counts for that boundary, so
    /// the next deadline is always strictly after the one that fired.
    pub fn on_tick(&mut self, handle: TimerHandle, now_ms: i64) -> TimerCommand {
        if self.armed != Some(handle) {
            #[cfg(feature = "defmt")]
            defmt::debug!("scheduler: stale tick {}", handle);
            return TimerCommand::Keep;
        }
        self.armed = None;
        let fired_at = self.state.next_fire_at.take().unwrap_or(now_ms);
        self.request_immediate_redraw();

        if self.state.running {
            self.arm(now_ms.max(fired_at))
        } else {
            TimerCommand::Keep
        }
    }

    /// Re-align a running timer after the wall clock jumped.
    pub fn realign(&mut self, now_ms: i64) -> TimerCommand {
        if self.state.running {
            self.arm(now_ms)
        } else {
            TimerCommand::Keep
        }
    }

    /// Stop and cancel any pending timer. Safe to call repeatedly.
    pub fn stop(&mut self) -> TimerCommand {
        self.state.running = false;
        self.state.next_fire_at = None;
        match self.armed.take() {
            Some(_) => TimerCommand::Cancel,
            None => TimerCommand::Keep,
        }
    }

    /// Ask for one draw outside the periodic cadence.
    ///
    /// Never starts, stops or extends the timer. Requests made before the
    /// next draw collapse into one.
    pub fn request_immediate_redraw(&mut self) {
        self.redraw_pending = true;
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Consume the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        core::mem::take(&mut self.redraw_pending)
    }

    fn arm(&mut self, now_ms: i64) -> TimerCommand {
        self.generation = self.generation.wrapping_add(1);
        let handle = TimerHandle(self.generation);
        let deadline_ms = now_ms.saturating_add(self.delay_to_boundary(now_ms));
        self.armed = Some(handle);
        self.state.next_fire_at = Some(deadline_ms);
        #[cfg(feature = "defmt")]
        defmt::debug!("scheduler: armed {} for {=i64}", handle, deadline_ms);
        TimerCommand::Arm { handle, deadline_ms }
    }
}
