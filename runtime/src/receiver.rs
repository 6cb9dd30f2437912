use std::{
    fmt::Debug,
    io,
    net::SocketAddr,
    sync::Arc,
    time::Instant,
};

use codec::PacketCodec;
use message::{
    Packet,
    StationId,
};
use net::DatagramReceiver;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    Config,
    Decision,
    Error,
    SequenceValidator,
    StationRecord,
    StationRegistry,
};

pub type Outcome = Result<(Packet, Decision), Error>;

/// Result of ingesting one datagram, for whoever reports on traffic.
#[derive(Debug)]
pub struct Report<A> {
    pub source:  A,
    pub outcome: Outcome,
}

/// Decodes datagrams, filters them through the [`SequenceValidator`] and
/// keeps per-station bookkeeping.
#[derive(Debug)]
pub struct Receiver<A = SocketAddr> {
    config:    Config,
    codec:     PacketCodec,
    validator: SequenceValidator,
    registry:  StationRegistry<A>,
}

impl<A> Receiver<A>
where
    A: Clone + Debug,
{
    pub fn new(config: Config) -> Self {
        Self {
            registry: StationRegistry::new(config.history_len),
            codec: PacketCodec::new(),
            validator: SequenceValidator::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn validator(&self) -> &SequenceValidator {
        &self.validator
    }

    /// Handle one datagram from `source` that arrived at `now`.
    ///
    /// A malformed datagram is returned as an error and touches no station
    /// state. Otherwise the packet is classified and booked under the
    /// station's lock, and returned alongside the decision whether or not it
    /// was accepted. Concurrent calls for one station are booked in the order
    /// they were classified.
    #[tracing::instrument(level = "debug", skip(self, datagram, now), fields(len = datagram.len()))]
    pub fn ingest(&self, source: &A, datagram: &[u8], now: Instant) -> Outcome {
        let packet = match self.codec.decode_datagram(datagram) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, hex = %hex::encode(datagram), "dropping malformed datagram");
                return Err(e.into());
            },
        };

        let mut last_accepted = None;
        let decision = self.registry.book(source, &packet, now, || {
            let decision = self.validator.classify(packet.station_id, packet.sequence_number);
            last_accepted = self.validator.last_accepted(packet.station_id);
            decision
        });

        match decision {
            Decision::Accept => tracing::debug!(%packet, %decision, "packet"),
            Decision::RejectDuplicate | Decision::RejectStale => tracing::info!(
                station = packet.station_id,
                seq = packet.sequence_number,
                %decision,
                ?last_accepted,
                "rejected packet"
            ),
        }

        Ok((packet, decision))
    }

    #[inline]
    pub fn station(&self, station_id: StationId) -> Option<StationRecord<A>> {
        self.registry.get(station_id)
    }

    #[inline]
    pub fn stations(&self) -> Vec<StationId> {
        self.registry.stations()
    }

    /// Whether `station_id` has reported a sample within the configured
    /// recent window of `now`.
    #[inline]
    pub fn has_recent_values(&self, station_id: StationId, now: Instant) -> bool {
        self.registry.has_recent_values(station_id, now, self.config.recent_window())
    }
}

impl<A> Default for Receiver<A>
where
    A: Clone + Debug,
{
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Receive datagrams from `socket` until `shutdown` fires, ingesting each in
/// arrival order and forwarding a [`Report`] for it. Reports are dropped once
/// `reports` is closed. A transport error ends the loop and is returned.
#[tracing::instrument(skip_all)]
pub async fn serve<R>(
    receiver: Arc<Receiver<R::Address>>,
    socket: R,
    reports: mpsc::Sender<Report<R::Address>>,
    shutdown: CancellationToken,
) -> io::Result<()>
where
    R: DatagramReceiver,
    R::Address: Clone + Debug,
{
    let mut buf = vec![0u8; receiver.config().recv_buffer_len()];

    tracing::info!(buf.len = buf.len(), "receiving station packets");

    loop {
        let (len, source) = tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("receiver shutting down");
                return Ok(());
            },
            result = socket.recv_from(&mut buf) => result.map_err(|e| {
                tracing::error!(error = %e, "receiving datagram");
                e
            })?,
        };

        let outcome = receiver.ingest(&source, &buf[..len], Instant::now());

        if !reports.is_closed() {
            let _ = reports
                .send(Report {
                    source,
                    outcome,
                })
                .await;
        }
    }
}
