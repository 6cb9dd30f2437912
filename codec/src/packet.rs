use bytes::BytesMut;
use message::{
    Packet,
    FRAME_SIZE,
};
use tokio_util::codec::{
    Decoder,
    Encoder,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Frame(#[from] message::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Frame(message::Error::MalformedFrame { .. }))
    }
}

/// Datagram codec for station packets.
///
/// The decoder treats each buffer it is handed as exactly one datagram, the
/// way [`tokio_util::udp::UdpFramed`] drives it: the first call drains the
/// buffer and yields a packet or an error, and the next call yields `None` so
/// the caller moves on to the following datagram. A datagram that is not
/// exactly [`FRAME_SIZE`] bytes long, including an empty one, yields an error
/// instead of a partial packet.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PacketCodec {
    consumed: bool,
}

impl PacketCodec {
    #[inline]
    pub const fn new() -> Self {
        Self {
            consumed: false,
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(len = datagram.len()), err(Display))]
    pub fn decode_datagram(&self, datagram: &[u8]) -> Result<Packet, Error> {
        let packet = Packet::decode(datagram)?;
        tracing::trace!(%packet, "decoded datagram");

        Ok(packet)
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = Error;

    #[inline]
    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Packet>>::encode(self, &item, dst)
    }
}

impl Encoder<&Packet> for PacketCodec {
    type Error = Error;

    fn encode(&mut self, item: &Packet, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(FRAME_SIZE);
        dst.extend_from_slice(&item.encode());

        Ok(())
    }
}

impl Decoder for PacketCodec {
    type Error = Error;
    type Item = Packet;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if std::mem::take(&mut self.consumed) {
            return Ok(None);
        }

        self.consumed = true;

        let datagram = src.split();
        let result = self.decode_datagram(datagram.as_ref())?;

        Ok(Some(result))
    }
}
