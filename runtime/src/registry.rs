use std::{
    collections::VecDeque,
    time::{
        Duration,
        Instant,
    },
};

use message::{
    Packet,
    Sample,
    StationId,
};

use crate::{
    arena::StationArena,
    Decision,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DataPoint {
    pub value: Sample,
    pub at:    Instant,
}

/// Bounded record of a station's most recent accepted samples, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    points:       VecDeque<DataPoint>,
    capacity:     usize,
    last_nonzero: Option<Instant>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            last_nonzero: None,
        }
    }

    pub fn push(&mut self, value: Sample, at: Instant) {
        if self.capacity == 0 {
            return;
        }

        if self.points.len() == self.capacity {
            self.points.pop_front();
        }

        self.points.push_back(DataPoint {
            value,
            at,
        });

        if value != 0 && self.last_nonzero.map_or(true, |t| at > t) {
            self.last_nonzero = Some(at);
        }
    }

    #[inline]
    pub fn latest(&self) -> Option<&DataPoint> {
        self.points.back()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DataPoint> + '_ {
        self.points.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Arrival time of the newest non-zero sample ever pushed, even if it has
    /// since been evicted.
    #[inline]
    pub fn last_nonzero(&self) -> Option<Instant> {
        self.last_nonzero
    }

    /// Whether the newest sample arrived within `window` of `now`, in either
    /// direction.
    pub fn is_recent(&self, now: Instant, window: Duration) -> bool {
        self.latest().map_or(false, |point| {
            let elapsed = if now >= point.at { now - point.at } else { point.at - now };
            elapsed <= window
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StationStats {
    pub accepted:   u64,
    pub duplicates: u64,
    pub stale:      u64,
}

impl StationStats {
    #[inline]
    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Accept => self.accepted += 1,
            Decision::RejectDuplicate => self.duplicates += 1,
            Decision::RejectStale => self.stale += 1,
        }
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.duplicates + self.stale
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationRecord<A> {
    pub history:     History,
    pub stats:       StationStats,
    pub last_source: Option<A>,
}

impl<A> StationRecord<A> {
    fn new(history_len: usize) -> Self {
        Self {
            history:     History::new(history_len),
            stats:       StationStats::default(),
            last_source: None,
        }
    }
}

/// What the receiver knows about each station beyond its sequence state.
#[derive(Debug)]
pub struct StationRegistry<A> {
    stations:    StationArena<StationRecord<A>>,
    history_len: usize,
}

impl<A> StationRegistry<A>
where
    A: Clone,
{
    pub fn new(history_len: usize) -> Self {
        Self {
            stations: StationArena::new(),
            history_len,
        }
    }

    /// Book a classified packet. Samples enter the history only on accept,
    /// all four stamped with the packet's arrival time.
    pub fn record(&self, source: &A, packet: &Packet, decision: Decision, at: Instant) {
        self.book(source, packet, at, || decision);
    }

    /// Run `classify` and book its decision while holding the station's slot,
    /// so packets from one station are booked in the order they were
    /// classified even when callers race.
    pub fn book<F>(&self, source: &A, packet: &Packet, at: Instant, classify: F) -> Decision
    where
        F: FnOnce() -> Decision,
    {
        self.stations.with(packet.station_id, |slot| {
            let decision = classify();
            let record = slot.get_or_insert_with(|| StationRecord::new(self.history_len));

            record.stats.record(decision);
            record.last_source = Some(source.clone());

            if decision.is_accept() {
                for &value in &packet.values {
                    record.history.push(value, at);
                }
            }

            decision
        })
    }

    pub fn get(&self, station_id: StationId) -> Option<StationRecord<A>> {
        self.stations.with(station_id, |slot| slot.clone())
    }

    pub fn has_recent_values(&self, station_id: StationId, now: Instant, window: Duration) -> bool {
        self.stations.with(station_id, |slot| {
            slot.as_ref().map_or(false, |record| record.history.is_recent(now, window))
        })
    }

    #[inline]
    pub fn stations(&self) -> Vec<StationId> {
        self.stations.stations()
    }
}
