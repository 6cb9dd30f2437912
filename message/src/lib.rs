//! Wire representation of station telemetry packets.
//!
//! A packet carries a station id, a sequence number in the ring ℤ/255ℤ and
//! four 10-bit samples, packed into a fixed 7-byte frame with no header,
//! checksum or version byte.

mod error;
mod packet;
pub mod sequence;

pub use error::{
    Error,
    Result,
};
pub use packet::{
    decode,
    encode,
    Packet,
    Sample,
    StationId,
    WireFrame,
    FRAME_SIZE,
    MAX_SAMPLE,
    SAMPLE_COUNT,
};
pub use sequence::{
    SequenceCounter,
    SequenceNumber,
};
