//! Platform lifecycle signals
//!
//! The host (firmware tasks, or a test harness) translates its own callbacks
//! into [`LifecycleEvent`]s. [`LifecycleGate`] keeps the flags that decide
//! whether the redraw timer and the data sync subscription should be active,
//! and tells the engine whether a signal actually changed anything.

/// Phase of a touch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapKind {
    /// A finger went down.
    Touch,
    /// The touch turned into another gesture or was abandoned.
    TouchCancel,
    /// A completed tap.
    Tap,
}

/// A touch gesture on the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tap {
    pub kind: TapKind,
    pub x: i32,
    pub y: i32,
    /// Uptime of the gesture in milliseconds
    pub time_ms: u64,
}

/// Raw signals from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    PropertiesChanged { low_bit_ambient: bool },
    WindowInsetsApplied { is_round: bool },
    /// The system zone changed; the engine reads it from its zone source.
    TimeZoneChanged,
    /// Once-a-minute tick from the host, the only refresh while ambient.
    TimeTick,
    /// The wall clock was set; running timers are re-aligned.
    ClockAdjusted,
    Tap(Tap),
}

/// Visibility and ambient flags with change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LifecycleGate {
    visible: bool,
    ambient: bool,
}

impl LifecycleGate {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn ambient(&self) -> bool {
        self.ambient
    }

    /// The redraw timer should be running.
    pub fn timer_eligible(&self) -> bool {
        self.visible && !self.ambient
    }

    /// Record visibility. Returns whether it changed.
    pub fn observe_visibility(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Record ambient mode. Returns whether it changed.
    pub fn observe_ambient(&mut self, ambient: bool) -> bool {
        let changed = self.ambient != ambient;
        self.ambient = ambient;
        changed
    }
}
