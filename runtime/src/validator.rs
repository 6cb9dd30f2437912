use std::fmt::{
    Display,
    Formatter,
};

use message::{
    sequence::{
        forward_distance,
        HALF_RANGE,
        SEQUENCE_MODULUS,
    },
    SequenceNumber,
    StationId,
};

use crate::arena::StationArena;

/// Outcome of checking a packet's sequence number against its station's
/// history. Rejections are ordinary results under loss and replay, not errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Decision {
    Accept,
    RejectDuplicate,
    RejectStale,
}

impl Decision {
    #[inline]
    pub fn is_accept(self) -> bool {
        self == Decision::Accept
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Decision::Accept => "accept",
            Decision::RejectDuplicate => "duplicate",
            Decision::RejectStale => "stale",
        };

        f.write_str(s)
    }
}

/// Last accepted sequence number of a single station.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StationSequenceState {
    last_accepted: SequenceNumber,
}

impl StationSequenceState {
    #[inline]
    pub const fn new(first: SequenceNumber) -> Self {
        Self {
            last_accepted: first % SEQUENCE_MODULUS,
        }
    }

    #[inline]
    pub const fn last_accepted(&self) -> SequenceNumber {
        self.last_accepted
    }

    /// Compare `seq` with the last accepted number using the half-range
    /// window: up to [`HALF_RANGE`] steps ahead on the ring is new, zero steps
    /// is a duplicate, anything further is behind and stale. Only an accept
    /// moves the state.
    pub fn classify(&mut self, seq: SequenceNumber) -> Decision {
        match forward_distance(self.last_accepted, seq) {
            0 => Decision::RejectDuplicate,
            d if d <= HALF_RANGE => {
                self.last_accepted = seq % SEQUENCE_MODULUS;
                Decision::Accept
            },
            _ => Decision::RejectStale,
        }
    }
}

/// Per-station duplicate and replay filter.
///
/// State for a station is created by its first packet, which is always
/// accepted, and kept for the life of the validator. Calls for the same
/// station are serialized; calls for different stations do not contend.
///
/// A raw sequence byte of 255 is outside what stations produce and is
/// treated as 0.
#[derive(Debug, Default)]
pub struct SequenceValidator {
    stations: StationArena<StationSequenceState>,
}

impl SequenceValidator {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn classify(&self, station_id: StationId, seq: SequenceNumber) -> Decision {
        self.stations.with(station_id, |slot| match slot {
            Some(state) => state.classify(seq),
            None => {
                *slot = Some(StationSequenceState::new(seq));
                Decision::Accept
            },
        })
    }

    #[inline]
    pub fn last_accepted(&self, station_id: StationId) -> Option<SequenceNumber> {
        self.stations.with(station_id, |slot| slot.map(|state| state.last_accepted()))
    }

    /// Stations that have sent at least one packet.
    #[inline]
    pub fn stations(&self) -> Vec<StationId> {
        self.stations.stations()
    }
}
