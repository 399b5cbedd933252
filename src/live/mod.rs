//! Live-Update Channel
//!
//! One authenticated push connection per session, delivering typed
//! occupancy and alert events. The codec and feeds are target independent;
//! the tokio-tungstenite connection lives in [`channel`] (native) and the
//! browser crate drives its own `web_sys::WebSocket` with the same codec.

#[cfg(feature = "native")]
pub mod channel;
pub mod event;
pub mod feed;
pub mod frame;

#[cfg(feature = "native")]
pub use channel::{LiveChannel, LiveConfig};
pub use event::{AlertEvent, EventTime, LiveEvent, OccupancyUpdate};
pub use feed::{AlertFeed, OccupancySlot, ALERT_CAPACITY};
pub use frame::{socket_url, FrameError, Packet};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Connection refused by server: {0}")]
    Rejected(String),
}
