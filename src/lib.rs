//! Telemetry receiver for remote sensor stations.
//!
//! Stations send 7-byte UDP frames carrying four 10-bit samples and a
//! per-station sequence number modulo 255. The receiver decodes each frame and
//! accepts it only if its sequence number is ahead of the last one accepted
//! from that station, dropping duplicates and stale replays.

pub use codec;
pub use message;
pub use net;
pub use runtime;

pub use message::{
    Packet,
    FRAME_SIZE,
};
pub use runtime::{
    serve,
    Config,
    Decision,
    Receiver,
    Report,
    SequenceValidator,
    Transmitter,
};

pub mod trace;
