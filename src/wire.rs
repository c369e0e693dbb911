//! Frames pushed by the companion over BLE
//!
//! The companion writes `postcard`-encoded [`WireFrame`]s to the weather
//! characteristic. Current time arrives separately through the standard
//! Current Time Service.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::{error::WireError, sync::DataEvent};

/// Largest frame the weather characteristic accepts
pub const FRAME_CAPACITY: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireFrame {
    /// A data item change or deletion
    Data(DataEvent),
    /// The phone's UTC offset changed
    Zone { offset_secs: i32 },
}

impl WireFrame {
    /// Zone carried by a `Zone` frame, if it is a valid offset.
    pub fn zone(&self) -> Option<FixedOffset> {
        match self {
            Self::Zone { offset_secs } => FixedOffset::east_opt(*offset_secs),
            Self::Data(_) => None,
        }
    }
}

/// Decode one frame. Trailing padding after the message is ignored.
pub fn decode_frame(bytes: &[u8]) -> Result<WireFrame, WireError> {
    postcard::from_bytes(bytes).map_err(|_| WireError::Decode)
}

/// Encode one frame into `buf`, returning the used part.
pub fn encode_frame<'b>(frame: &WireFrame, buf: &'b mut [u8]) -> Result<&'b mut [u8], WireError> {
    postcard::to_slice(frame, buf).map_err(|_| WireError::Encode)
}
