use bytes::BytesMut;
use codec::{
    tokio_codec::Encoder,
    PacketCodec,
};
use message::{
    sequence,
    Packet,
    Sample,
    SequenceCounter,
    SequenceNumber,
    StationId,
    FRAME_SIZE,
    SAMPLE_COUNT,
};
use net::DatagramSender;

use crate::Error;

/// Station side of the link: numbers packets and puts them on the wire.
///
/// Sample values are sent as given. Values above 1023 are truncated by the
/// frame encoding, so range-check beforehand if that matters.
#[derive(Debug)]
pub struct Transmitter<S> {
    station_id: StationId,
    sender:     S,
    counter:    SequenceCounter,
}

impl<S> Transmitter<S>
where
    S: DatagramSender,
{
    pub fn new(station_id: StationId, sender: S) -> Self {
        Self::starting_at(station_id, sender, 0)
    }

    /// Begin numbering at packet count `start`, reduced onto the ring.
    pub fn starting_at(station_id: StationId, sender: S, start: u64) -> Self {
        Self {
            station_id,
            sender,
            counter: SequenceCounter::new(sequence::reduce(start)),
        }
    }

    #[inline]
    pub fn station_id(&self) -> StationId {
        self.station_id
    }

    /// Sequence number the next [`Transmitter::send`] will use.
    #[inline]
    pub fn next_sequence(&self) -> SequenceNumber {
        self.counter.peek()
    }

    pub async fn send(&self, values: [Sample; SAMPLE_COUNT]) -> Result<Packet, Error> {
        let seq = self.counter.next();
        self.transmit(Packet::new(self.station_id, seq, values)).await
    }

    /// Send with an explicit packet count instead of the running counter,
    /// e.g. to replay an earlier packet. The count is reduced modulo 255.
    pub async fn send_numbered(
        &self,
        packet_number: u64,
        values: [Sample; SAMPLE_COUNT],
    ) -> Result<Packet, Error> {
        let packet = Packet::new(self.station_id, sequence::reduce(packet_number), values);
        self.transmit(packet).await
    }

    #[tracing::instrument(level = "debug", skip(self), fields(station = self.station_id), err)]
    async fn transmit(&self, packet: Packet) -> Result<Packet, Error> {
        let mut buf = BytesMut::with_capacity(FRAME_SIZE);
        PacketCodec::new().encode(&packet, &mut buf)?;

        self.sender.send(&buf).await?;
        tracing::debug!(%packet, "sent packet");

        Ok(packet)
    }
}
