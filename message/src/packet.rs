use std::fmt::{
    Display,
    Formatter,
};

use packed_struct::{
    prelude::*,
    PackedStructInfo,
    PackingResult,
};

use crate::{
    Error,
    Result,
    SequenceNumber,
};

/// Size in bytes of every frame on the wire.
pub const FRAME_SIZE: usize = 7;

/// Number of samples carried by one packet.
pub const SAMPLE_COUNT: usize = 4;

/// Largest sample value representable in a frame (10 bits).
pub const MAX_SAMPLE: Sample = 0x3ff;

pub type StationId = u8;
pub type Sample = u16;
pub type WireFrame = [u8; FRAME_SIZE];

//
// Frame layout:
//
// +---------+---------+-------+-------+-------+-------+-------------+
// | station | seq     | lsb 0 | lsb 1 | lsb 2 | lsb 3 |m0|m1|m2|m3 |
// +---------+---------+-------+-------+-------+-------+-------------+
//
// Byte 6 holds bits 9..8 of each sample, sample 0 in the most significant pair.
//

#[derive(Copy, Clone, Debug, PartialEq, Eq, PackedStruct)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "7", endian = "msb")]
struct RawFrame {
    station: u8,
    seq:     u8,

    lsb0: u8,
    lsb1: u8,
    lsb2: u8,
    lsb3: u8,

    #[packed_field(size_bits = "2")]
    msb0: Integer<u8, packed_bits::Bits::<2>>,
    #[packed_field(size_bits = "2")]
    msb1: Integer<u8, packed_bits::Bits::<2>>,
    #[packed_field(size_bits = "2")]
    msb2: Integer<u8, packed_bits::Bits::<2>>,
    #[packed_field(size_bits = "2")]
    msb3: Integer<u8, packed_bits::Bits::<2>>,
}

#[inline]
fn low_bits(value: Sample) -> u8 {
    (value & 0xff) as u8
}

#[inline]
fn high_bits(value: Sample) -> Integer<u8, packed_bits::Bits::<2>> {
    (((value >> 8) & 0x3) as u8).into()
}

#[inline]
fn join(lsb: u8, msb: Integer<u8, packed_bits::Bits::<2>>) -> Sample {
    (Sample::from(*msb & 0x3) << 8) | Sample::from(lsb)
}

impl From<&Packet> for RawFrame {
    fn from(packet: &Packet) -> Self {
        let [v0, v1, v2, v3] = packet.values;

        Self {
            station: packet.station_id,
            seq:     packet.sequence_number,

            lsb0: low_bits(v0),
            lsb1: low_bits(v1),
            lsb2: low_bits(v2),
            lsb3: low_bits(v3),

            msb0: high_bits(v0),
            msb1: high_bits(v1),
            msb2: high_bits(v2),
            msb3: high_bits(v3),
        }
    }
}

impl From<RawFrame> for Packet {
    fn from(raw: RawFrame) -> Self {
        Self {
            station_id:      raw.station,
            sequence_number: raw.seq,
            values:          [
                join(raw.lsb0, raw.msb0),
                join(raw.lsb1, raw.msb1),
                join(raw.lsb2, raw.msb2),
                join(raw.lsb3, raw.msb3),
            ],
        }
    }
}

/// A single station report.
///
/// `sequence_number` is expected to already be reduced modulo 255 by the
/// producer, and each of `values` to fit in 10 bits. Neither is checked:
/// encoding masks each value to its low 10 bits and writes the sequence byte
/// verbatim, which keeps the on-wire behavior bit-for-bit identical to
/// existing stations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Packet {
    pub station_id:      StationId,
    pub sequence_number: SequenceNumber,
    pub values:          [Sample; SAMPLE_COUNT],
}

impl Packet {
    #[inline]
    pub const fn new(
        station_id: StationId,
        sequence_number: SequenceNumber,
        values: [Sample; SAMPLE_COUNT],
    ) -> Self {
        Self {
            station_id,
            sequence_number,
            values,
        }
    }

    /// Pack into the 7-byte wire frame.
    ///
    /// Never fails. A value above [`MAX_SAMPLE`] is truncated to its low 10
    /// bits, so `v` and `v % 1024` produce identical frames.
    pub fn encode(&self) -> WireFrame {
        // only enum fields can fail to pack and the frame has none
        RawFrame::from(self).pack().unwrap_or_default()
    }

    /// Unpack a received datagram. Anything other than exactly
    /// [`FRAME_SIZE`] bytes is rejected as [`Error::MalformedFrame`].
    #[tracing::instrument(level = "trace", skip_all, fields(len = src.len()), err(Display))]
    pub fn decode(src: &[u8]) -> Result<Self> {
        let malformed = || Error::MalformedFrame {
            len: src.len(),
        };

        let frame = <&WireFrame>::try_from(src).map_err(|_| malformed())?;
        let raw = RawFrame::unpack(frame).map_err(|_| malformed())?;

        Ok(raw.into())
    }
}

#[inline]
pub fn encode(packet: &Packet) -> WireFrame {
    packet.encode()
}

#[inline]
pub fn decode(src: &[u8]) -> Result<Packet> {
    Packet::decode(src)
}

impl From<Packet> for WireFrame {
    #[inline]
    fn from(packet: Packet) -> Self {
        packet.encode()
    }
}

impl PackedStruct for Packet {
    type ByteArray = WireFrame;

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        RawFrame::from(self).pack()
    }

    #[inline]
    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        RawFrame::unpack(src).map(Self::from)
    }
}

impl PackedStructInfo for Packet {
    #[inline]
    fn packed_bits() -> usize {
        RawFrame::packed_bits()
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "station {} [seq {}]: {:?} (0x{})",
            self.station_id,
            self.sequence_number,
            self.values,
            hex::encode(self.encode())
        )
    }
}
