//! Datagram transport seams. The receiver core only ever sees
//! `(source address, raw bytes)` pairs coming out of a [`DatagramReceiver`].

pub use datagram::{
    DatagramOps,
    DatagramReceiver,
    DatagramSender,
};
pub use memory::{
    channel,
    ChannelReceiver,
    ChannelSender,
};

mod datagram;
mod memory;
