use std::time::Duration;

use message::FRAME_SIZE;

/// Receiver tuning. Every field has a default, so any subset may be given.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples retained per station.
    pub history_len: usize,

    /// How far apart in time, in milliseconds, a station's newest sample and
    /// the current instant may be while the station still counts as active.
    pub recent_window_ms: u64,

    /// Receive buffer size. Always kept larger than a frame so that an
    /// oversized datagram is seen as oversized rather than truncated to fit.
    pub recv_buffer_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_len:       100,
            recent_window_ms:  100,
            recv_buffer_bytes: 1500,
        }
    }
}

impl Config {
    #[inline]
    pub fn recent_window(&self) -> Duration {
        Duration::from_millis(self.recent_window_ms)
    }

    #[inline]
    pub(crate) fn recv_buffer_len(&self) -> usize {
        self.recv_buffer_bytes.max(FRAME_SIZE + 1)
    }
}
