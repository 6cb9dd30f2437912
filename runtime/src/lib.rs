//! Receiver-side processing of station telemetry: per-station sequence
//! validation, station bookkeeping, and the datagram receive loop.

mod arena;
mod config;
mod error;
mod receiver;
mod registry;
mod transmitter;
mod validator;

pub use config::Config;
pub use error::Error;
pub use receiver::{
    serve,
    Outcome,
    Receiver,
    Report,
};
pub use registry::{
    DataPoint,
    History,
    StationRecord,
    StationRegistry,
    StationStats,
};
pub use transmitter::Transmitter;
pub use validator::{
    Decision,
    SequenceValidator,
    StationSequenceState,
};
