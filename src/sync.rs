//! Companion weather sync
//!
//! The companion pushes key/value data items. Delivery may repeat or arrive
//! out of order; the channel doesn't reorder, the last applied update wins.
//! Updates are only processed while subscribed, i.e. while the face is
//! visible, and missed updates are not replayed on resubscribe.

use heapless::{LinearMap, String};
use serde::{Deserialize, Serialize};

use crate::{
    error::SyncError,
    face::weather::{HighLowText, WeatherState, UNKNOWN_CONDITION},
};

/// Data item path carrying the weather
pub const WEATHER_PATH: &str = "WEATHERDATA";
/// High/low temperature text
pub const HIGH_LOW_KEY: &str = "HIGHLOWDATA";
/// Integer condition code
pub const WEATHER_ID_KEY: &str = "WEATHERID";

pub type Path = String<32>;
pub type Key = String<16>;

/// Maximum number of entries in one payload
pub const PAYLOAD_CAPACITY: usize = 4;

/// A value in a data item payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataValue {
    Int(i32),
    Text(HighLowText),
}

pub type DataMap = LinearMap<Key, DataValue, PAYLOAD_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataEventKind {
    Changed,
    Deleted,
}

/// One data item event from the companion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEvent {
    pub kind: DataEventKind,
    pub path: Path,
    pub payload: DataMap,
}

impl DataEvent {
    pub fn changed(path: Path, payload: DataMap) -> Self {
        Self {
            kind: DataEventKind::Changed,
            path,
            payload,
        }
    }

    pub fn deleted(path: Path) -> Self {
        Self {
            kind: DataEventKind::Deleted,
            path,
            payload: DataMap::new(),
        }
    }
}

/// Result of offering one event to the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Weather replaced; a redraw is due.
    Applied,
    /// Deletion; last-known weather stays on screen.
    Retained,
    /// Not subscribed, or a path this face doesn't use.
    Ignored,
    /// Weather payload that couldn't be decoded.
    Dropped(SyncError),
}

fn lookup<'m>(payload: &'m DataMap, key: &str) -> Option<&'m DataValue> {
    payload
        .iter()
        .find_map(|(k, v)| (k.as_str() == key).then_some(v))
}

/// Decode a weather payload.
///
/// The high/low text is required; a missing condition id means unknown.
pub fn decode_weather(payload: &DataMap) -> Result<WeatherState, SyncError> {
    let high_low = match lookup(payload, HIGH_LOW_KEY) {
        Some(DataValue::Text(text)) => text.clone(),
        Some(_) => return Err(SyncError::WrongType(HIGH_LOW_KEY)),
        None => return Err(SyncError::MissingKey(HIGH_LOW_KEY)),
    };
    let condition_id = match lookup(payload, WEATHER_ID_KEY) {
        Some(DataValue::Int(id)) => *id,
        Some(_) => return Err(SyncError::WrongType(WEATHER_ID_KEY)),
        None => UNKNOWN_CONDITION,
    };
    Ok(WeatherState::new(condition_id, high_low))
}

/// Link between the companion transport and the weather state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataSyncChannel {
    subscribed: bool,
    link_connected: bool,
}

impl DataSyncChannel {
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Companion link state. Informational only, nothing is gated on it.
    pub fn link_connected(&self) -> bool {
        self.link_connected
    }

    /// Start processing updates. Returns whether the state changed.
    pub fn on_subscribe(&mut self) -> bool {
        !core::mem::replace(&mut self.subscribed, true)
    }

    /// Stop processing updates. Safe to call repeatedly.
    pub fn on_unsubscribe(&mut self) -> bool {
        core::mem::replace(&mut self.subscribed, false)
    }

    pub fn set_link(&mut self, connected: bool) {
        if self.link_connected != connected {
            #[cfg(feature = "defmt")]
            defmt::info!("companion link {}", if connected { "up" } else { "down" });
        }
        self.link_connected = connected;
    }

    /// Apply one event to `weather`.
    ///
    /// A recognized change replaces both weather fields at once; anything
    /// else leaves `weather` untouched.
    pub fn on_update(&self, event: &DataEvent, weather: &mut WeatherState) -> SyncOutcome {
        if !self.subscribed || event.path.as_str() != WEATHER_PATH {
            return SyncOutcome::Ignored;
        }
        match event.kind {
            DataEventKind::Deleted => SyncOutcome::Retained,
            DataEventKind::Changed => match decode_weather(&event.payload) {
                Ok(next) => {
                    *weather = next;
                    #[cfg(feature = "defmt")]
                    defmt::info!("weather applied: {}", weather);
                    SyncOutcome::Applied
                }
                Err(err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("weather update dropped: {}", err);
                    SyncOutcome::Dropped(err)
                }
            },
        }
    }
}
