pub use ::tokio_util::codec as tokio_codec;

mod packet;

pub use self::packet::*;
